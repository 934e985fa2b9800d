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

//! # ZiSynth Core Library
//!
//! ZiSynth synthesizes labeled training sentences for named-entity and PII
//! detection. Placeholders in natural-language templates are replaced with
//! values from a fabricated-identity pool, and every inserted value is
//! reported as an exact character span.
//!
//! ## Module Overview
//!
//! - **template**: placeholder parsing and duplicate disambiguation
//! - **record**: identity records and the record pool
//! - **prepare**: one-time pool preparation (renames and derived attributes)
//! - **select**: filtered record selection and duplicate-entity resolution
//! - **render**: sentence rendering, article fix-up, lower-casing, spans
//! - **consolidate**: mapping fine-grained entity types to canonical labels
//! - **tagging**: tokenization and BILOU/BIO/IO tag encoding
//! - **generator**: the sample orchestrator
//! - **config**: generator configuration (JSON/YAML)
//! - **io**: loading templates and tables, writing samples
//!
//! ## Quick Start
//!
//! ```rust
//! use zisynth::{ZiFakeDataGenerator, ZiGeneratorConfig, ZiIdentityRecord, ZiRecordPool};
//!
//! let pool = ZiRecordPool::new(vec![ZiIdentityRecord::from_pairs([
//!     ("GivenName", "Dana"), ("Surname", "Levi"), ("City", "Haifa"),
//! ])]);
//! let templates = vec!["[PERSON] lives in [CITY]".to_string()];
//! let mut generator = ZiFakeDataGenerator::new(pool, templates, ZiGeneratorConfig::default())?;
//!
//! for sample in generator.sample_examples(10, None, None)? {
//!     let sample = sample?;
//!     for span in &sample.spans {
//!         println!("{} -> {:?}", span.entity_type, sample.span_text(span));
//!     }
//! }
//! # Ok::<(), zisynth::ZiError>(())
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return `Result<T, ZiError>`. Malformed templates and
//! filters that match no record are errors; a placeholder whose attribute is
//! missing renders empty and is reported through `log::warn!`.

pub mod config;
pub mod consolidate;
pub mod errors;
pub mod generator;
pub mod io;
pub mod prepare;
pub mod record;
pub mod render;
pub mod sample;
pub mod select;
pub mod tagging;
pub mod template;

pub use config::ZiGeneratorConfig;
pub use consolidate::{consolidate, ZiEntityConsolidator, DEFAULT_ENTITY_GROUPS};
pub use errors::{Result, ZiError};
pub use generator::{ZiFakeDataGenerator, ZiSampleIter};
pub use prepare::{ZiAttributeGenerator, ZiDerivation, ZiPoolPreparer};
pub use record::{ZiIdentityRecord, ZiRecordPool};
pub use render::{render_with_case, ZiRenderedText, ZiRenderer, ZiSpanBuilder};
pub use sample::{ZiSample, ZiSampleMetadata, ZiSpan};
pub use select::{ZiRecordFilter, ZiRecordSelector};
pub use tagging::{
    ZiEmptyVocabulary, ZiLabelingScheme, ZiRegexTagger, ZiSpanTagger, ZiTagging, ZiToken,
    ZiVocabulary,
};
pub use template::{prepare_templates, strip_index, ZiParsedTemplate, ZiPlaceholder, ZiTemplateSegment};
