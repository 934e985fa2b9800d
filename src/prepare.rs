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

//! # Record Pool Preparation Module
//!
//! Turns a raw fabricated-identity table into the attribute layout templates
//! expect, once per generator.
//!
//! ## Steps
//!
//! 1. Square brackets in string values become parentheses, since brackets
//!    are placeholder syntax in raw templates.
//! 2. Raw column names (`GivenName`, `CountryFull`, ...) are renamed to
//!    attribute names (`FIRST_NAME`, `COUNTRY`, ...).
//! 3. Built-in [`ZiDerivation`]s add composed attributes (`PERSON`, `ADDRESS`,
//!    `US_SSN`, ...), then `LOCATION` is derived across the pool.
//! 4. User-supplied [`ZiAttributeGenerator`]s run in registration order. This
//!    is where IBAN, company or nationality generators plug in.
//!
//! Every attribute listed in `ignore_types` is neither renamed into nor derived.
//! A derivation whose prerequisite column is absent from the pool is skipped
//! with a warning.

use std::collections::BTreeSet;
use std::fmt;

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use serde_json::Value;

use crate::record::{value_to_text, ZiIdentityRecord, ZiRecordPool};

/// Raw fakenamegenerator column to attribute name.
pub const COLUMN_RENAMES: &[(&str, &str)] = &[
    ("Surname", "LAST_NAME"),
    ("GivenName", "FIRST_NAME"),
    ("Title", "TITLE"),
    ("Gender", "GENDER"),
    ("City", "CITY"),
    ("ZipCode", "ZIP"),
    ("CountryFull", "COUNTRY"),
    ("Occupation", "OCCUPATION"),
    ("TelephoneNumber", "PHONE_NUMBER"),
    ("CCNumber", "CREDIT_CARD"),
    ("Birthday", "BIRTHDAY"),
    ("EmailAddress", "EMAIL_ADDRESS"),
    ("StreetAddress", "FULL_ADDRESS"),
    ("Domain", "DOMAIN_NAME"),
    ("NameSet", "NAMESET"),
];

/// Produces one attribute per record.
pub trait ZiAttributeGenerator: fmt::Debug {
    /// Name of the attribute written to each record.
    fn attribute(&self) -> &str;

    /// Columns that must exist in the pool for this generator to run.
    fn prerequisites(&self) -> &[&str] {
        &[]
    }

    /// Value for `record`, or `None` to leave the attribute absent.
    fn generate(&self, record: &ZiIdentityRecord, rng: &mut dyn RngCore) -> Option<Value>;
}

/// Attributes composed from other columns or synthesized directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZiDerivation {
    /// `FIRST_NAME LAST_NAME`.
    Person,
    /// Copy of `BIRTHDAY`.
    DateTime,
    /// First digit run of `FULL_ADDRESS`.
    StreetNumber,
    /// `FULL_ADDRESS` after the street number.
    Street,
    /// `FULL_ADDRESS, CITY ZIP`.
    Address,
    /// URL built from `DOMAIN_NAME`.
    Url,
    IpAddress,
    UsSsn,
}

impl ZiDerivation {
    pub const BUILT_IN: [ZiDerivation; 8] = [
        ZiDerivation::Person,
        ZiDerivation::DateTime,
        ZiDerivation::StreetNumber,
        ZiDerivation::Street,
        ZiDerivation::Address,
        ZiDerivation::Url,
        ZiDerivation::IpAddress,
        ZiDerivation::UsSsn,
    ];
}

impl ZiAttributeGenerator for ZiDerivation {
    fn attribute(&self) -> &str {
        match self {
            ZiDerivation::Person => "PERSON",
            ZiDerivation::DateTime => "DATE_TIME",
            ZiDerivation::StreetNumber => "STREET_NO",
            ZiDerivation::Street => "STREET",
            ZiDerivation::Address => "ADDRESS",
            ZiDerivation::Url => "URL",
            ZiDerivation::IpAddress => "IP_ADDRESS",
            ZiDerivation::UsSsn => "US_SSN",
        }
    }

    fn prerequisites(&self) -> &[&str] {
        match self {
            ZiDerivation::Person => &["FIRST_NAME", "LAST_NAME"],
            ZiDerivation::DateTime => &["BIRTHDAY"],
            ZiDerivation::StreetNumber | ZiDerivation::Street => &["FULL_ADDRESS"],
            ZiDerivation::Address => &["FULL_ADDRESS", "ZIP", "CITY"],
            ZiDerivation::Url => &["DOMAIN_NAME"],
            ZiDerivation::IpAddress | ZiDerivation::UsSsn => &[],
        }
    }

    fn generate(&self, record: &ZiIdentityRecord, rng: &mut dyn RngCore) -> Option<Value> {
        let text = |name: &str| record.get_text(name);
        let generated = match self {
            ZiDerivation::Person => format!("{} {}", text("FIRST_NAME")?, text("LAST_NAME")?),
            ZiDerivation::DateTime => return record.get("BIRTHDAY").cloned(),
            ZiDerivation::StreetNumber => split_street(&text("FULL_ADDRESS")?)?.0,
            ZiDerivation::Street => split_street(&text("FULL_ADDRESS")?)?.1,
            ZiDerivation::Address => format!(
                "{}, {} {}",
                text("FULL_ADDRESS")?,
                text("CITY")?,
                text("ZIP")?.replace(' ', "")
            ),
            ZiDerivation::Url => {
                let domain = text("DOMAIN_NAME")?;
                let domain = domain.trim();
                if domain.starts_with("http://") || domain.starts_with("https://") {
                    domain.to_string()
                } else if domain.starts_with("www.") {
                    format!("https://{domain}")
                } else {
                    format!("https://www.{domain}")
                }
            }
            ZiDerivation::IpAddress => format!(
                "{}.{}.{}.{}",
                rng.gen_range(1..=223u8),
                rng.gen::<u8>(),
                rng.gen::<u8>(),
                rng.gen_range(1..=254u8)
            ),
            ZiDerivation::UsSsn => {
                let area = loop {
                    let candidate = rng.gen_range(1..=899u16);
                    if candidate != 666 {
                        break candidate;
                    }
                };
                format!(
                    "{:03}-{:02}-{:04}",
                    area,
                    rng.gen_range(1..=99u8),
                    rng.gen_range(1..=9999u16)
                )
            }
        };
        Some(Value::String(generated))
    }
}

/// Splits `"1234 Main Street"` into `("1234", "Main Street")`.
fn split_street(address: &str) -> Option<(String, String)> {
    let start = address.find(|c: char| c.is_ascii_digit())?;
    let rest = &address[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    Some((rest[..end].to_string(), rest[end..].trim().to_string()))
}

/// Title-cases words: the first letter after a non-letter is upper-cased.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_is_letter = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if previous_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(ch);
            previous_is_letter = false;
        }
    }
    out
}

/// Prepares raw identity tables for sampling.
#[derive(Debug, Default)]
pub struct ZiPoolPreparer {
    ignore_types: BTreeSet<String>,
    generators: Vec<Box<dyn ZiAttributeGenerator + Send + Sync>>,
}

impl ZiPoolPreparer {
    pub fn new<I, S>(ignore_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ignore_types: ignore_types.into_iter().map(Into::into).collect(),
            generators: Vec::new(),
        }
    }

    /// Registers a generator that runs after the built-in derivations.
    pub fn with_generator(mut self, generator: Box<dyn ZiAttributeGenerator + Send + Sync>) -> Self {
        self.generators.push(generator);
        self
    }

    pub fn is_ignored(&self, attribute: &str) -> bool {
        self.ignore_types.contains(attribute)
    }

    pub fn prepare(&self, mut pool: ZiRecordPool, rng: &mut dyn RngCore) -> ZiRecordPool {
        log::info!("preparing identity pool of {} records", pool.len());

        for record in pool.records_mut() {
            self.normalize(record);
        }

        for derivation in ZiDerivation::BUILT_IN.iter() {
            self.derive(&mut pool, derivation, rng);
        }
        self.derive_location(&mut pool, rng);
        for generator in &self.generators {
            self.derive(&mut pool, generator.as_ref(), rng);
        }

        log::info!("finished preparing identity pool");
        pool
    }

    fn normalize(&self, record: &mut ZiIdentityRecord) {
        for (_, value) in record.attributes_mut() {
            if let Value::String(text) = value {
                if text.contains(['[', ']']) {
                    *text = text.replace('[', "(").replace(']', ")");
                }
            }
        }
        for (raw, attribute) in COLUMN_RENAMES {
            if self.is_ignored(attribute) {
                continue;
            }
            if let Some(value) = record.remove(raw) {
                record.insert(*attribute, value);
            }
        }
    }

    fn derive(
        &self,
        pool: &mut ZiRecordPool,
        generator: &(dyn ZiAttributeGenerator + Send + Sync),
        rng: &mut dyn RngCore,
    ) {
        let attribute = generator.attribute().to_string();
        if self.is_ignored(&attribute) {
            return;
        }
        if let Some(missing) = generator
            .prerequisites()
            .iter()
            .find(|column| !pool.has_attribute(column))
        {
            log::warn!("cannot generate {attribute}: column {missing} is missing");
            return;
        }

        log::debug!("generating {attribute}");
        for record in pool.records_mut() {
            if let Some(value) = generator.generate(record, rng) {
                record.insert(attribute.clone(), value);
            }
        }
    }

    /// `LOCATION` from either `CITY` or `COUNTRY` (chosen once for the pool),
    /// title-cased and shuffled across records.
    fn derive_location(&self, pool: &mut ZiRecordPool, rng: &mut dyn RngCore) {
        if self.is_ignored("LOCATION") {
            return;
        }
        let sources: Vec<&str> = ["CITY", "COUNTRY"]
            .into_iter()
            .filter(|column| pool.has_attribute(column))
            .collect();
        let Some(source) = sources.choose(rng).copied() else {
            log::warn!("cannot generate LOCATION: neither CITY nor COUNTRY is present");
            return;
        };

        let mut values: Vec<String> = pool
            .records()
            .iter()
            .filter_map(|r| r.get(source))
            .map(|v| title_case(&value_to_text(v)))
            .collect();
        values.shuffle(rng);

        let mut values = values.into_iter();
        for record in pool.records_mut() {
            if record.contains(source) {
                if let Some(value) = values.next() {
                    record.insert("LOCATION", value);
                }
            }
        }
    }
}
