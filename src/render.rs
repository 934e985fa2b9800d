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

//! # Sentence Renderer Module
//!
//! Turns a parsed template and a value map into text plus entity spans.
//!
//! Rendering is a left-to-right fold over the template segments into a
//! [`ZiSpanBuilder`]. Each placeholder appends its value at the end of the
//! buffer, so the span recorded for placeholder *i* is never shifted by the
//! edits for placeholders *i+1..n*. The only edit that touches text already
//! written is the indefinite-article fix-up, and it runs before the span for
//! the current placeholder is recorded.
//!
//! The lower-casing decision is a single weighted coin flip per sample. When
//! it comes up, every piece is folded as it is appended, so span values and
//! offsets describe the folded text.

use std::collections::HashMap;

use rand::Rng;

use crate::sample::ZiSpan;
use crate::template::{ZiParsedTemplate, ZiTemplateSegment};

/// Text and spans produced by rendering one template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZiRenderedText {
    pub text: String,
    pub spans: Vec<ZiSpan>,
    pub lowercased: bool,
}

/// Accumulates rendered text and tracks its length in characters.
#[derive(Debug, Default)]
pub struct ZiSpanBuilder {
    buffer: String,
    char_len: usize,
    spans: Vec<ZiSpan>,
    lowercase: bool,
}

impl ZiSpanBuilder {
    pub fn new(lowercase: bool) -> Self {
        Self {
            lowercase,
            ..Self::default()
        }
    }

    pub fn push_literal(&mut self, text: &str) {
        let folded = self.fold(text);
        self.append(&folded);
    }

    /// Appends an entity value and records its span.
    ///
    /// The value is trimmed first. An empty value produces no span since it
    /// would cover no text.
    pub fn push_entity(&mut self, entity_type: &str, value: &str) {
        let value = self.fold(value.trim());
        if value.is_empty() {
            log::warn!("entity {entity_type} rendered empty, no span recorded");
            return;
        }
        if self.needs_article_fix(&value) {
            self.buffer.pop();
            self.buffer.push_str("n ");
            self.char_len += 1;
        }
        let start = self.char_len;
        self.append(&value);
        self.spans
            .push(ZiSpan::new(entity_type, value, start, self.char_len));
    }

    pub fn finish(self) -> ZiRenderedText {
        ZiRenderedText {
            text: self.buffer,
            spans: self.spans,
            lowercased: self.lowercase,
        }
    }

    fn append(&mut self, text: &str) {
        self.buffer.push_str(text);
        self.char_len += text.chars().count();
    }

    fn fold(&self, text: &str) -> String {
        if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        }
    }

    /// `a` directly before a vowel-initial value, either at the very start of
    /// the sentence or after a space, becomes `an`.
    fn needs_article_fix(&self, value: &str) -> bool {
        let starts_with_vowel = value
            .chars()
            .next()
            .map(|c| matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u'))
            .unwrap_or(false);
        if !starts_with_vowel {
            return false;
        }

        let mut tail: Vec<char> = self.buffer.chars().rev().take(3).collect();
        tail.reverse();
        let tail: String = tail.into_iter().collect::<String>().to_lowercase();
        (self.char_len == 2 && tail == "a ") || tail == " a "
    }
}

/// Renders templates with a configurable lower-casing ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZiRenderer {
    lower_case_ratio: f64,
}

impl ZiRenderer {
    pub fn new(lower_case_ratio: f64) -> Self {
        Self {
            lower_case_ratio: lower_case_ratio.clamp(0.0, 1.0),
        }
    }

    pub fn lower_case_ratio(&self) -> f64 {
        self.lower_case_ratio
    }

    /// Flips the lower-casing coin once, then renders.
    pub fn render<R: Rng + ?Sized>(
        &self,
        template: &ZiParsedTemplate,
        values: &HashMap<String, String>,
        rng: &mut R,
    ) -> ZiRenderedText {
        let lowercase = rng.gen::<f64>() < self.lower_case_ratio;
        render_with_case(template, values, lowercase)
    }
}

/// Deterministic rendering with the casing decided by the caller.
///
/// Placeholders are looked up by their disambiguated id (`PERSON2`); spans
/// carry the base entity type (`PERSON`). A missing value renders as the
/// empty string and is logged.
///
/// A missing, empty or whitespace-only value records no span, since a span
/// must cover at least one character. Such a sample has fewer spans than the
/// template has placeholders.
pub fn render_with_case(
    template: &ZiParsedTemplate,
    values: &HashMap<String, String>,
    lowercase: bool,
) -> ZiRenderedText {
    let mut builder = ZiSpanBuilder::new(lowercase);
    for segment in template.segments() {
        match segment {
            ZiTemplateSegment::Literal(text) => builder.push_literal(text),
            ZiTemplateSegment::Placeholder(placeholder) => {
                let value = match values.get(&placeholder.id) {
                    Some(value) => value.as_str(),
                    None => {
                        log::warn!(
                            "entity {} is in the template but not in the identity record, ignoring",
                            placeholder.id
                        );
                        ""
                    }
                };
                builder.push_entity(placeholder.entity_type(), value);
            }
        }
    }
    builder.finish()
}
