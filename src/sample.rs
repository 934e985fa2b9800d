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

//! # ZiSynth Sample Module
//!
//! Output types of the generator: labeled spans and rendered samples.
//!
//! All offsets are character offsets (Unicode scalar values), not byte
//! offsets, so `José` occupies four positions. Use [`ZiSample::span_text`] to
//! slice the rendered text by a span.

use serde::{Deserialize, Serialize};

use crate::tagging::ZiToken;

/// A labeled, half-open character range `[start_position, end_position)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZiSpan {
    pub entity_type: String,
    pub entity_value: String,
    pub start_position: usize,
    pub end_position: usize,
}

impl ZiSpan {
    pub fn new(
        entity_type: impl Into<String>,
        entity_value: impl Into<String>,
        start_position: usize,
        end_position: usize,
    ) -> Self {
        Self {
            entity_type: entity_type.into(),
            entity_value: entity_value.into(),
            start_position,
            end_position,
        }
    }

    pub fn len(&self) -> usize {
        self.end_position - self.start_position
    }

    pub fn is_empty(&self) -> bool {
        self.end_position <= self.start_position
    }

    pub fn overlaps(&self, other: &ZiSpan) -> bool {
        self.start_position < other.end_position && other.start_position < self.end_position
    }
}

/// Provenance attached to a sample when metadata is enabled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZiSampleMetadata {
    #[serde(rename = "Gender")]
    pub gender: Option<String>,
    #[serde(rename = "NameSet")]
    pub name_set: Option<String>,
    #[serde(rename = "Country")]
    pub country: Option<String>,
    #[serde(rename = "Lowercase")]
    pub lowercase: bool,
    #[serde(rename = "Template#")]
    pub template_index: usize,
}

/// One generated training sentence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZiSample {
    pub full_text: String,
    pub spans: Vec<ZiSpan>,
    /// Template in bracket notation with consolidated labels.
    pub masked: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<Vec<ZiToken>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ZiSampleMetadata>,
}

impl ZiSample {
    pub fn new(full_text: String, spans: Vec<ZiSpan>, masked: String) -> Self {
        Self {
            full_text,
            spans,
            masked,
            tokens: None,
            tags: None,
            metadata: None,
        }
    }

    /// Returns the slice of `full_text` covered by `span`, if the range is valid.
    pub fn span_text(&self, span: &ZiSpan) -> Option<&str> {
        char_slice(&self.full_text, span.start_position, span.end_position)
    }

    /// Number of characters in `full_text`.
    pub fn char_len(&self) -> usize {
        self.full_text.chars().count()
    }

    /// True when the text has at least one cased character and no upper-case one.
    pub fn is_lowercase(&self) -> bool {
        is_lowercase_text(&self.full_text)
    }
}

pub(crate) fn is_lowercase_text(text: &str) -> bool {
    let mut cased = false;
    for ch in text.chars() {
        if ch.is_uppercase() {
            return false;
        }
        if ch.is_lowercase() {
            cased = true;
        }
    }
    cased
}

/// Slices `text` by character offsets.
pub fn char_slice(text: &str, start: usize, end: usize) -> Option<&str> {
    if start > end {
        return None;
    }
    let byte_at = |pos: usize| {
        if pos == 0 {
            return Some(0);
        }
        text.char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .nth(pos)
    };
    let start_byte = byte_at(start)?;
    let end_byte = byte_at(end)?;
    text.get(start_byte..end_byte)
}
