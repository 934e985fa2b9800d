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

//! # Template Placeholder Module
//!
//! Templates are sentences with placeholders such as `My name is {PERSON}`.
//! Raw template files use square brackets (`[PERSON]`); [`prepare_templates`]
//! converts them to braces once, at generator construction.
//!
//! [`ZiParsedTemplate::parse`] splits a template into literal and placeholder
//! segments. Repeated entity types are disambiguated left to right: the first
//! `{CITY}` keeps its name, later ones become `{CITY2}`, `{CITY3}`, ... The
//! suffix `1` is never produced.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::errors::{Result, ZiError};

/// One placeholder occurrence inside a template.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZiPlaceholder {
    /// Disambiguated identifier (`CITY`, `CITY2`, ...), used as value lookup key.
    pub id: String,
    /// Name as written in the template, before disambiguation.
    pub name: String,
}

impl ZiPlaceholder {
    /// Entity type reported on spans: the identifier without trailing digits.
    pub fn entity_type(&self) -> &str {
        strip_index(&self.id)
    }
}

/// A piece of a parsed template.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZiTemplateSegment {
    Literal(String),
    Placeholder(ZiPlaceholder),
}

/// Result of scanning a template for placeholders.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZiParsedTemplate {
    /// Template with duplicate placeholders renamed, in brace notation.
    pub template: String,
    /// Placeholder identifiers in left-to-right order.
    pub placeholders: Vec<String>,
    /// Occurrences per entity name as written in the template.
    pub entity_counts: BTreeMap<String, usize>,
    segments: Vec<ZiTemplateSegment>,
}

impl ZiParsedTemplate {
    /// Scans `template` for `{NAME}` placeholders.
    ///
    /// Names may contain ASCII uppercase letters, digits and underscores. An
    /// opening brace without a closing one, an empty name, a nested brace or an
    /// invalid character is a [`ZiError::TemplateSyntax`].
    pub fn parse(template: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();

        let mut chars = template.chars().enumerate();
        while let Some((position, ch)) = chars.next() {
            if ch != '{' {
                literal.push(ch);
                continue;
            }

            let mut name = String::new();
            let mut closed = false;
            for (_, inner) in chars.by_ref() {
                match inner {
                    '}' => {
                        closed = true;
                        break;
                    }
                    c if is_name_char(c) => name.push(c),
                    '{' => {
                        return Err(ZiError::template_syntax(
                            template,
                            position,
                            "nested placeholder",
                        ))
                    }
                    other => {
                        return Err(ZiError::template_syntax(
                            template,
                            position,
                            format!("invalid character '{other}' in placeholder"),
                        ))
                    }
                }
            }
            if !closed {
                return Err(ZiError::template_syntax(
                    template,
                    position,
                    "unterminated placeholder",
                ));
            }
            if name.is_empty() {
                return Err(ZiError::template_syntax(template, position, "empty placeholder"));
            }

            if !literal.is_empty() {
                segments.push(ZiTemplateSegment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(ZiTemplateSegment::Placeholder(ZiPlaceholder {
                id: name.clone(),
                name,
            }));
        }
        if !literal.is_empty() {
            segments.push(ZiTemplateSegment::Literal(literal));
        }

        // Suffixes skip names written literally in the template.
        let written: BTreeSet<String> = segments
            .iter()
            .filter_map(|segment| match segment {
                ZiTemplateSegment::Placeholder(p) => Some(p.name.clone()),
                ZiTemplateSegment::Literal(_) => None,
            })
            .collect();
        let mut entity_counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut next_index: BTreeMap<String, usize> = BTreeMap::new();
        let mut placeholders = Vec::new();
        for segment in &mut segments {
            let ZiTemplateSegment::Placeholder(placeholder) = segment else {
                continue;
            };
            let name = &placeholder.name;
            let count = entity_counts.entry(name.clone()).or_insert(0);
            *count += 1;
            if *count > 1 {
                let index = next_index.entry(name.clone()).or_insert(2);
                while written.contains(&format!("{name}{index}")) {
                    *index += 1;
                }
                placeholder.id = format!("{name}{index}");
                *index += 1;
            }
            placeholders.push(placeholder.id.clone());
        }

        let template = segments
            .iter()
            .map(|segment| match segment {
                ZiTemplateSegment::Literal(text) => text.clone(),
                ZiTemplateSegment::Placeholder(p) => format!("{{{}}}", p.id),
            })
            .collect();

        Ok(Self {
            template,
            placeholders,
            entity_counts,
            segments,
        })
    }

    pub fn segments(&self) -> &[ZiTemplateSegment] {
        &self.segments
    }

    /// Entity names occurring more than once, with their counts.
    pub fn duplicated_entities(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entity_counts
            .iter()
            .filter(|(_, count)| **count > 1)
            .map(|(name, count)| (name.as_str(), *count))
    }

    /// The disambiguated template in bracket notation.
    pub fn masked(&self) -> String {
        self.template.replace('{', "[").replace('}', "]")
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_'
}

/// Removes a trailing duplicate index: `PERSON2` becomes `PERSON`.
pub fn strip_index(id: &str) -> &str {
    id.trim_end_matches(|c: char| c.is_ascii_digit())
}

/// Converts raw `[ENTITY]` templates to `{ENTITY}` notation, trimming each.
pub fn prepare_templates<S: AsRef<str>>(raw_templates: &[S]) -> Vec<String> {
    raw_templates
        .iter()
        .map(|t| t.as_ref().trim().replace('[', "{").replace(']', "}"))
        .collect()
}
