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

//! # Entity Consolidation Module
//!
//! Maps fine-grained entity types onto canonical labels after rendering and
//! before tagging. The mapping is the [`DEFAULT_ENTITY_GROUPS`] table, extended
//! per generator with [`ZiEntityConsolidator::with_mapping`].

use serde::{Deserialize, Serialize};

use crate::sample::ZiSample;

/// Default entity type to canonical label table.
pub const DEFAULT_ENTITY_GROUPS: &[(&str, &str)] = &[
    ("FIRST_NAME", "PERSON"),
    ("LAST_NAME", "PERSON"),
    ("PERSON", "PERSON"),
    ("LOCATION", "LOCATION"),
    ("CITY", "LOCATION"),
    ("STATE", "LOCATION"),
    ("COUNTRY", "LOCATION"),
    ("ADDRESS", "LOCATION"),
    ("STREET", "LOCATION"),
];

/// Rewrites span labels and masked-template tokens to canonical labels.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZiEntityConsolidator {
    groups: Vec<(String, String)>,
}

impl Default for ZiEntityConsolidator {
    fn default() -> Self {
        Self {
            groups: DEFAULT_ENTITY_GROUPS
                .iter()
                .map(|(member, canonical)| (member.to_string(), canonical.to_string()))
                .collect(),
        }
    }
}

impl ZiEntityConsolidator {
    /// A consolidator with no groups; leaves samples untouched.
    pub fn empty() -> Self {
        Self { groups: Vec::new() }
    }

    /// Adds or replaces the canonical label for `member`.
    pub fn with_mapping(mut self, member: impl Into<String>, canonical: impl Into<String>) -> Self {
        let member = member.into();
        let canonical = canonical.into();
        match self.groups.iter_mut().find(|(m, _)| *m == member) {
            Some(entry) => entry.1 = canonical,
            None => self.groups.push((member, canonical)),
        }
        self
    }

    pub fn canonical<'a>(&'a self, entity_type: &str) -> Option<&'a str> {
        self.groups
            .iter()
            .find(|(member, _)| member == entity_type)
            .map(|(_, canonical)| canonical.as_str())
    }

    /// Applies the mapping to spans and to the masked template, in place.
    ///
    /// The masked template is remapped by literal `[MEMBER]` token
    /// substitution; indexed duplicates such as `[CITY2]` keep their name.
    pub fn consolidate(&self, sample: &mut ZiSample) {
        for span in &mut sample.spans {
            if let Some(canonical) = self.canonical(&span.entity_type) {
                if span.entity_type != canonical {
                    span.entity_type = canonical.to_string();
                }
            }
        }

        let mut masked = std::mem::take(&mut sample.masked);
        for (member, canonical) in &self.groups {
            if member != canonical {
                masked = masked.replace(&format!("[{member}]"), &format!("[{canonical}]"));
            }
        }
        sample.masked = masked;
    }
}

/// Consolidates `sample` with the default groups.
pub fn consolidate(sample: &mut ZiSample) {
    ZiEntityConsolidator::default().consolidate(sample);
}
