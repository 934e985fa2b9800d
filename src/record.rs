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

//! # ZiSynth Record Module
//!
//! Identity records and the pool they are drawn from.
//!
//! A [`ZiIdentityRecord`] maps attribute names (`FIRST_NAME`, `COUNTRY`, `IBAN`, ...)
//! to JSON scalars. Attribute names match placeholder base names, so a template
//! slot `{CITY}` is filled from the record's `CITY` attribute.
//!
//! A [`ZiRecordPool`] is the finite, read-only set of records a generator samples
//! from. After preparation it is never mutated; per-sample duplicate attributes
//! are attached to a private clone of the selected record.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One fabricated identity: attribute name to scalar value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZiIdentityRecord {
    attributes: BTreeMap<String, Value>,
}

impl ZiIdentityRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record from `(name, value)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            attributes: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Returns the attribute rendered as text.
    ///
    /// Strings are returned as-is, numbers and booleans through their display
    /// form, and `null` as an empty string.
    pub fn get_text(&self, name: &str) -> Option<String> {
        self.attributes.get(name).map(value_to_text)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.attributes.remove(name)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.attributes.iter()
    }

    pub(crate) fn attributes_mut(&mut self) -> impl Iterator<Item = (&String, &mut Value)> {
        self.attributes.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

/// Renders a scalar attribute as text.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// The finite set of identity records available for sampling.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZiRecordPool {
    records: Vec<ZiIdentityRecord>,
}

impl ZiRecordPool {
    pub fn new(records: Vec<ZiIdentityRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ZiIdentityRecord] {
        &self.records
    }

    pub(crate) fn records_mut(&mut self) -> &mut [ZiIdentityRecord] {
        &mut self.records
    }

    /// True when at least one record carries `name`.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.records.iter().any(|r| r.contains(name))
    }

    /// Draws one attribute value from a uniformly chosen record of the whole pool.
    ///
    /// Returns `None` when the pool is empty or the drawn record lacks `name`.
    pub fn sample_attribute<R: Rng + ?Sized>(&self, name: &str, rng: &mut R) -> Option<Value> {
        self.records
            .choose(rng)
            .and_then(|record| record.get(name))
            .cloned()
    }
}

impl FromIterator<ZiIdentityRecord> for ZiRecordPool {
    fn from_iter<T: IntoIterator<Item = ZiIdentityRecord>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
