//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of ZiSynth.
//! The ZiSynth project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! # Generator Configuration Module
//!
//! [`ZiGeneratorConfig`] can be built in code or loaded from JSON or YAML.
//! Missing keys take their default values.
//!
//! ```yaml
//! lower_case_ratio: 0.3
//! include_metadata: true
//! ignore_types: [US_DRIVER_LICENSE, IBAN]
//! span_to_tag: true
//! labeling_scheme: BIO
//! seed: 42
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, ZiError};
use crate::tagging::ZiLabelingScheme;

/// Settings for [`crate::generator::ZiFakeDataGenerator`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZiGeneratorConfig {
    /// Probability that a sample is fully lower-cased.
    pub lower_case_ratio: f64,
    /// Attach gender, name set, country, casing and template index.
    pub include_metadata: bool,
    /// Attributes neither renamed into nor derived during pool preparation.
    pub ignore_types: Vec<String>,
    /// Tokenize and tag each sample after consolidation.
    pub span_to_tag: bool,
    pub labeling_scheme: ZiLabelingScheme,
    /// Templates already use `{ENTITY}` notation.
    pub templates_prepared: bool,
    /// Random seed for reproducible generation.
    pub seed: Option<u64>,
}

impl Default for ZiGeneratorConfig {
    fn default() -> Self {
        Self {
            lower_case_ratio: 0.5,
            include_metadata: true,
            ignore_types: Vec::new(),
            span_to_tag: true,
            labeling_scheme: ZiLabelingScheme::Bilou,
            templates_prepared: false,
            seed: None,
        }
    }
}

impl ZiGeneratorConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.lower_case_ratio) {
            return Err(ZiError::validation(format!(
                "lower_case_ratio must be in [0,1], got {}",
                self.lower_case_ratio
            )));
        }
        Ok(())
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a `.json`, `.yaml` or `.yml` file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        let text = fs::read_to_string(path)?;
        match ext.as_str() {
            "json" => Self::from_json_str(&text),
            "yaml" | "yml" => Self::from_yaml_str(&text),
            other => Err(ZiError::validation(format!(
                "unsupported config extension '{other}'"
            ))),
        }
    }
}
