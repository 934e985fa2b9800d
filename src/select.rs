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

//! # Record Selector Module
//!
//! Draws the identity record for one sample and resolves duplicate slots.
//!
//! The primary record is drawn uniformly from the subset of the pool that
//! satisfies a [`ZiRecordFilter`]. Additional values for repeated entity
//! types (`PERSON2`, `PERSON3`, ...) are drawn from the whole, unfiltered pool
//! and attached to a private copy of the primary record; the pool itself is
//! never mutated.

use std::collections::{BTreeMap, BTreeSet};

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ZiError};
use crate::record::{ZiIdentityRecord, ZiRecordPool};
use crate::template::{strip_index, ZiParsedTemplate, ZiTemplateSegment};

/// Categorical constraints: attribute name to allowed values.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZiRecordFilter {
    constraints: BTreeMap<String, BTreeSet<String>>,
}

impl ZiRecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts `attribute` to `allowed`. An empty list adds no constraint.
    pub fn with_allowed<I, S>(mut self, attribute: impl Into<String>, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let allowed: BTreeSet<String> = allowed.into_iter().map(Into::into).collect();
        if !allowed.is_empty() {
            self.constraints.insert(attribute.into(), allowed);
        }
        self
    }

    /// Filter over the `GENDER` and `NAMESET` attributes.
    pub fn by_gender_and_nameset(genders: Option<&[&str]>, namesets: Option<&[&str]>) -> Self {
        let mut filter = Self::new();
        if let Some(genders) = genders {
            filter = filter.with_allowed("GENDER", genders.iter().copied());
        }
        if let Some(namesets) = namesets {
            filter = filter.with_allowed("NAMESET", namesets.iter().copied());
        }
        filter
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn matches(&self, record: &ZiIdentityRecord) -> bool {
        self.constraints.iter().all(|(attribute, allowed)| {
            record
                .get_text(attribute)
                .map(|value| allowed.contains(&value))
                .unwrap_or(false)
        })
    }

    /// Records of `pool` satisfying every constraint.
    pub fn apply<'a>(&self, pool: &'a ZiRecordPool) -> Vec<&'a ZiIdentityRecord> {
        pool.records().iter().filter(|r| self.matches(r)).collect()
    }
}

/// Samples records from a read-only pool.
#[derive(Clone, Copy, Debug)]
pub struct ZiRecordSelector<'a> {
    pool: &'a ZiRecordPool,
}

impl<'a> ZiRecordSelector<'a> {
    pub fn new(pool: &'a ZiRecordPool) -> Self {
        Self { pool }
    }

    /// Draws one record uniformly from the filtered subset.
    ///
    /// Returns a clone so the caller may augment it freely.
    pub fn select<R: Rng + ?Sized>(
        &self,
        filter: &ZiRecordFilter,
        rng: &mut R,
    ) -> Result<ZiIdentityRecord> {
        let subset = filter.apply(self.pool);
        subset.choose(rng).map(|r| (*r).clone()).ok_or_else(|| {
            if self.pool.is_empty() {
                ZiError::empty_pool("identity pool contains no records")
            } else {
                ZiError::empty_pool(format!(
                    "no identity record matches constraints {:?}",
                    filter.constraints
                ))
            }
        })
    }

    /// Attaches a value for every repeated placeholder (`PERSON2`, `PERSON3`, ...).
    ///
    /// Each extra value comes from an independently drawn record of the whole
    /// pool. A drawn record lacking the attribute leaves the slot empty.
    /// Indexed placeholders written directly in the template (`{PERSON2}`) are
    /// filled the same way when the record has no attribute of that name.
    pub fn attach_duplicates<R: Rng + ?Sized>(
        &self,
        record: &mut ZiIdentityRecord,
        template: &ZiParsedTemplate,
        rng: &mut R,
    ) {
        for segment in template.segments() {
            let ZiTemplateSegment::Placeholder(placeholder) = segment else {
                continue;
            };
            let id = &placeholder.id;
            if *id != placeholder.name {
                match self.pool.sample_attribute(&placeholder.name, rng) {
                    Some(value) => record.insert(id.clone(), value),
                    None => {
                        record.remove(id);
                        log::debug!("no additional value drawn for {id}");
                    }
                }
                continue;
            }

            let entity = strip_index(id);
            if entity == id || record.contains(id) {
                continue;
            }
            if let Some(value) = self.pool.sample_attribute(entity, rng) {
                record.insert(id.clone(), value);
            }
        }
    }
}
