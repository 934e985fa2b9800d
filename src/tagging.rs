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

//! # Span Tagging Module
//!
//! Converts consolidated spans into aligned token and tag sequences.
//!
//! ## Components
//!
//! - [`ZiLabelingScheme`]: BILOU, BIO or IO tag encoding
//! - [`ZiVocabulary`]: word membership lookup, passed explicitly to the tagger
//! - [`ZiSpanTagger`]: tokenizer plus span-to-tag encoder
//! - [`ZiRegexTagger`]: default tagger splitting on word runs and punctuation

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ZiError};
use crate::sample::ZiSpan;

/// Tag encoding for span boundaries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ZiLabelingScheme {
    #[default]
    Bilou,
    Bio,
    Io,
}

impl ZiLabelingScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZiLabelingScheme::Bilou => "BILOU",
            ZiLabelingScheme::Bio => "BIO",
            ZiLabelingScheme::Io => "IO",
        }
    }

    /// Tags for an entity of `label` covering `len` consecutive tokens.
    pub fn encode(&self, label: &str, len: usize) -> Vec<String> {
        (0..len)
            .map(|i| {
                let prefix = match self {
                    ZiLabelingScheme::Io => "I",
                    ZiLabelingScheme::Bio => {
                        if i == 0 {
                            "B"
                        } else {
                            "I"
                        }
                    }
                    ZiLabelingScheme::Bilou => match (i, len) {
                        (_, 1) => "U",
                        (0, _) => "B",
                        (i, len) if i + 1 == len => "L",
                        _ => "I",
                    },
                };
                format!("{prefix}-{label}")
            })
            .collect()
    }
}

impl fmt::Display for ZiLabelingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ZiLabelingScheme {
    type Err = ZiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "BILOU" => Ok(ZiLabelingScheme::Bilou),
            "BIO" => Ok(ZiLabelingScheme::Bio),
            "IO" => Ok(ZiLabelingScheme::Io),
            other => Err(ZiError::validation(format!(
                "unknown labeling scheme '{other}', expected BILOU, BIO or IO"
            ))),
        }
    }
}

/// Word membership lookup used to flag tokens as in-vocabulary.
pub trait ZiVocabulary: fmt::Debug {
    /// `word` is already lower-cased by the caller.
    fn contains(&self, word: &str) -> bool;
}

impl ZiVocabulary for HashSet<String> {
    fn contains(&self, word: &str) -> bool {
        HashSet::contains(self, word)
    }
}

/// Vocabulary that knows no words.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZiEmptyVocabulary;

impl ZiVocabulary for ZiEmptyVocabulary {
    fn contains(&self, _word: &str) -> bool {
        false
    }
}

/// A token with character offsets into the sample text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZiToken {
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub is_in_vocabulary: bool,
}

/// Aligned tokens and tags; both vectors have equal length.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ZiTagging {
    pub tokens: Vec<ZiToken>,
    pub tags: Vec<String>,
}

/// Tokenizes text and encodes spans as per-token tags.
pub trait ZiSpanTagger: fmt::Debug {
    fn tag(
        &self,
        text: &str,
        spans: &[ZiSpan],
        scheme: ZiLabelingScheme,
        vocabulary: &dyn ZiVocabulary,
    ) -> Result<ZiTagging>;
}

const DEFAULT_TOKEN_PATTERN: &str = r"\w+|[^\w\s]";

/// Tagger splitting text with a token regex.
#[derive(Clone, Debug)]
pub struct ZiRegexTagger {
    pattern: Regex,
}

impl ZiRegexTagger {
    /// Word runs and single punctuation characters.
    pub fn new() -> Result<Self> {
        Self::with_pattern(DEFAULT_TOKEN_PATTERN)
    }

    /// Each regex match becomes one token.
    pub fn with_pattern(pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| ZiError::validation(format!("invalid token pattern: {e}")))?;
        Ok(Self { pattern })
    }

    /// Tokens with character offsets; vocabulary membership is filled in.
    pub fn tokenize(&self, text: &str, vocabulary: &dyn ZiVocabulary) -> Vec<ZiToken> {
        let mut tokens = Vec::new();
        let mut byte_cursor = 0;
        let mut char_cursor = 0;
        for m in self.pattern.find_iter(text) {
            if m.as_str().is_empty() {
                continue;
            }
            char_cursor += text[byte_cursor..m.start()].chars().count();
            let start = char_cursor;
            char_cursor += m.as_str().chars().count();
            byte_cursor = m.end();
            tokens.push(ZiToken {
                text: m.as_str().to_string(),
                start,
                end: char_cursor,
                is_in_vocabulary: vocabulary.contains(&m.as_str().to_lowercase()),
            });
        }
        tokens
    }
}

impl ZiSpanTagger for ZiRegexTagger {
    /// Tokens are split at every span boundary first, so each token lies
    /// wholly inside one span or outside all of them. Adjacent placeholders
    /// (`DanaLevi`) and spans ending inside a word (`Danas`) tag cleanly.
    fn tag(
        &self,
        text: &str,
        spans: &[ZiSpan],
        scheme: ZiLabelingScheme,
        vocabulary: &dyn ZiVocabulary,
    ) -> Result<ZiTagging> {
        let tokens = split_at_boundaries(self.tokenize(text, vocabulary), spans, vocabulary);
        let mut tags = vec!["O".to_string(); tokens.len()];

        for span in spans {
            let covered: Vec<usize> = tokens
                .iter()
                .enumerate()
                .filter(|(_, t)| span.start_position <= t.start && t.end <= span.end_position)
                .map(|(i, _)| i)
                .collect();
            for (i, tag) in covered
                .iter()
                .zip(scheme.encode(&span.entity_type, covered.len()))
            {
                tags[*i] = tag;
            }
        }

        Ok(ZiTagging { tokens, tags })
    }
}

fn split_at_boundaries(
    tokens: Vec<ZiToken>,
    spans: &[ZiSpan],
    vocabulary: &dyn ZiVocabulary,
) -> Vec<ZiToken> {
    let mut boundaries: Vec<usize> = spans
        .iter()
        .flat_map(|s| [s.start_position, s.end_position])
        .collect();
    boundaries.sort_unstable();
    boundaries.dedup();

    let mut out = Vec::with_capacity(tokens.len());
    for token in tokens {
        let cuts: Vec<usize> = boundaries
            .iter()
            .copied()
            .filter(|&b| token.start < b && b < token.end)
            .collect();
        if cuts.is_empty() {
            out.push(token);
            continue;
        }

        let chars: Vec<char> = token.text.chars().collect();
        let mut piece_start = token.start;
        for piece_end in cuts.into_iter().chain(std::iter::once(token.end)) {
            let piece: String = chars[piece_start - token.start..piece_end - token.start]
                .iter()
                .collect();
            out.push(ZiToken {
                is_in_vocabulary: vocabulary.contains(&piece.to_lowercase()),
                text: piece,
                start: piece_start,
                end: piece_end,
            });
            piece_start = piece_end;
        }
    }
    out
}
