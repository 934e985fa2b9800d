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

//! # ZiSynth IO Module
//!
//! Loading helpers for templates, identity tables and vocabularies, and a
//! JSONL writer for generated samples.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde_json::Value;

use crate::errors::{Result, ZiError};
use crate::record::{ZiIdentityRecord, ZiRecordPool};
use crate::sample::ZiSample;

/// Reads one template per non-empty line.
pub fn load_templates(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let file = File::open(path)?;
    load_templates_reader(BufReader::new(file))
}

pub fn load_templates_reader<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut templates = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            templates.push(trimmed.to_string());
        }
    }
    Ok(templates)
}

/// Reads identity records from JSONL, one flat object per line.
pub fn load_identity_jsonl(path: impl AsRef<Path>) -> Result<ZiRecordPool> {
    let file = File::open(path)?;
    load_identity_jsonl_reader(BufReader::new(file))
}

pub fn load_identity_jsonl_reader<R: BufRead>(reader: R) -> Result<ZiRecordPool> {
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(&line)?;
        let Value::Object(map) = value else {
            return Err(ZiError::validation(format!(
                "line {} must be a JSON object",
                idx + 1
            )));
        };
        records.push(ZiIdentityRecord::from_pairs(map));
    }
    Ok(ZiRecordPool::new(records))
}

/// Reads a CSV identity table; the header row names the attributes.
///
/// Empty cells are left out of the record.
#[cfg(feature = "csv")]
pub fn load_identity_csv(path: impl AsRef<Path>) -> Result<ZiRecordPool> {
    let file = File::open(path)?;
    load_identity_csv_reader(file)
}

#[cfg(feature = "csv")]
pub fn load_identity_csv_reader<R: std::io::Read>(reader: R) -> Result<ZiRecordPool> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        let record = ZiIdentityRecord::from_pairs(
            headers
                .iter()
                .zip(row.iter())
                .filter(|(_, field)| !field.is_empty())
                .map(|(name, field)| (name.to_string(), Value::String(field.to_string()))),
        );
        records.push(record);
    }
    Ok(ZiRecordPool::new(records))
}

/// Reads the `WORD` column of a CSV vocabulary into a lower-cased set.
#[cfg(feature = "csv")]
pub fn load_vocabulary_csv(path: impl AsRef<Path>) -> Result<HashSet<String>> {
    let file = File::open(path)?;
    let mut csv_reader = csv::Reader::from_reader(file);
    let column = csv_reader
        .headers()?
        .iter()
        .position(|h| h == "WORD")
        .ok_or_else(|| ZiError::validation("vocabulary CSV requires a 'WORD' column"))?;

    let mut words = HashSet::new();
    for row in csv_reader.records() {
        let row = row?;
        if let Some(word) = row.get(column) {
            words.insert(word.to_lowercase());
        }
    }
    Ok(words)
}

/// Reads a plain-text vocabulary, one word per line.
pub fn load_vocabulary_lines(path: impl AsRef<Path>) -> Result<HashSet<String>> {
    let file = File::open(path)?;
    let mut words = HashSet::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        let word = line.trim();
        if !word.is_empty() {
            words.insert(word.to_lowercase());
        }
    }
    Ok(words)
}

/// Writes samples as JSON lines.
pub fn write_samples_jsonl(path: impl AsRef<Path>, samples: &[ZiSample]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    for sample in samples {
        serde_json::to_writer(&mut writer, sample)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads samples written by [`write_samples_jsonl`].
pub fn load_samples_jsonl(path: impl AsRef<Path>) -> Result<Vec<ZiSample>> {
    let file = File::open(path)?;
    let mut samples = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        if !line.trim().is_empty() {
            samples.push(serde_json::from_str(&line)?);
        }
    }
    Ok(samples)
}
