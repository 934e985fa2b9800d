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

//! # Sample Generator Module
//!
//! [`ZiFakeDataGenerator`] drives the whole pipeline for each requested sample:
//!
//! 1. choose a template uniformly and parse its placeholders
//! 2. draw a record from the filtered pool and resolve duplicate slots
//! 3. render text and spans
//! 4. attach metadata
//! 5. consolidate entity labels
//! 6. tokenize and tag, when enabled
//!
//! The identity pool is prepared once, on the first request, and is read-only
//! afterwards. Samples are produced lazily by [`ZiSampleIter`]; dropping the
//! iterator early leaves nothing to clean up.
//!
//! ```rust
//! use zisynth::{ZiFakeDataGenerator, ZiGeneratorConfig, ZiIdentityRecord, ZiRecordPool};
//!
//! let pool = ZiRecordPool::new(vec![ZiIdentityRecord::from_pairs([
//!     ("GivenName", "Dana"), ("Surname", "Levi"), ("Gender", "female"),
//! ])]);
//! let mut generator = ZiFakeDataGenerator::new(
//!     pool,
//!     vec!["My name is [PERSON]".to_string()],
//!     ZiGeneratorConfig { seed: Some(1), ..Default::default() },
//! )?;
//! for sample in generator.sample_examples(3, None, None)? {
//!     println!("{}", sample?.full_text);
//! }
//! # Ok::<(), zisynth::ZiError>(())
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::ZiGeneratorConfig;
use crate::consolidate::ZiEntityConsolidator;
use crate::errors::{Result, ZiError};
use crate::prepare::ZiPoolPreparer;
use crate::record::{ZiIdentityRecord, ZiRecordPool};
use crate::render::ZiRenderer;
use crate::sample::{is_lowercase_text, ZiSample, ZiSampleMetadata};
use crate::select::{ZiRecordFilter, ZiRecordSelector};
use crate::tagging::{ZiEmptyVocabulary, ZiRegexTagger, ZiSpanTagger, ZiVocabulary};
use crate::template::{prepare_templates, ZiParsedTemplate};

/// Generates span-annotated sentences from templates and identity records.
#[derive(Debug)]
pub struct ZiFakeDataGenerator {
    config: ZiGeneratorConfig,
    templates: Vec<String>,
    raw_pool: Option<ZiRecordPool>,
    pool: Option<ZiRecordPool>,
    preparer: ZiPoolPreparer,
    renderer: ZiRenderer,
    consolidator: ZiEntityConsolidator,
    tagger: Box<dyn ZiSpanTagger + Send + Sync>,
    vocabulary: Arc<dyn ZiVocabulary + Send + Sync>,
    rng: StdRng,
}

impl ZiFakeDataGenerator {
    /// Creates a generator over a raw identity table.
    ///
    /// Raw `[ENTITY]` templates are converted to `{ENTITY}` here unless
    /// `config.templates_prepared` is set.
    pub fn new(
        raw_pool: ZiRecordPool,
        templates: Vec<String>,
        config: ZiGeneratorConfig,
    ) -> Result<Self> {
        config.validate()?;

        let templates = if config.templates_prepared {
            templates
        } else {
            prepare_templates(&templates)
        };
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            preparer: ZiPoolPreparer::new(config.ignore_types.iter().cloned()),
            renderer: ZiRenderer::new(config.lower_case_ratio),
            consolidator: ZiEntityConsolidator::default(),
            tagger: Box::new(ZiRegexTagger::new()?),
            vocabulary: Arc::new(ZiEmptyVocabulary),
            raw_pool: Some(raw_pool),
            pool: None,
            templates,
            config,
            rng,
        })
    }

    /// Uses `pool` as-is, skipping preparation.
    pub fn with_prepared_pool(mut self, pool: ZiRecordPool) -> Self {
        self.raw_pool = None;
        self.pool = Some(pool);
        self
    }

    pub fn with_preparer(mut self, preparer: ZiPoolPreparer) -> Self {
        self.preparer = preparer;
        self
    }

    pub fn with_vocabulary(mut self, vocabulary: Arc<dyn ZiVocabulary + Send + Sync>) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    pub fn with_tagger(mut self, tagger: Box<dyn ZiSpanTagger + Send + Sync>) -> Self {
        self.tagger = tagger;
        self
    }

    pub fn with_consolidator(mut self, consolidator: ZiEntityConsolidator) -> Self {
        self.consolidator = consolidator;
        self
    }

    pub fn config(&self) -> &ZiGeneratorConfig {
        &self.config
    }

    pub fn templates(&self) -> &[String] {
        &self.templates
    }

    /// Prepares the identity pool on first use and returns it.
    pub fn prepare(&mut self) -> Result<&ZiRecordPool> {
        if self.pool.is_none() {
            let raw = self.raw_pool.take().unwrap_or_default();
            self.pool = Some(self.preparer.prepare(raw, &mut self.rng));
        }
        self.prepared_pool()
    }

    fn prepared_pool(&self) -> Result<&ZiRecordPool> {
        self.pool
            .as_ref()
            .ok_or_else(|| ZiError::internal("identity pool used before preparation"))
    }

    /// Lazily generates `count` samples.
    ///
    /// `genders` and `namesets` restrict the primary record; `None` or an
    /// empty list applies no restriction.
    pub fn sample_examples(
        &mut self,
        count: usize,
        genders: Option<&[&str]>,
        namesets: Option<&[&str]>,
    ) -> Result<ZiSampleIter<'_>> {
        self.sample_with_filter(count, ZiRecordFilter::by_gender_and_nameset(genders, namesets))
    }

    /// Lazily generates `count` samples from records matching `filter`.
    pub fn sample_with_filter(
        &mut self,
        count: usize,
        filter: ZiRecordFilter,
    ) -> Result<ZiSampleIter<'_>> {
        self.ensure_templates()?;
        self.prepare()?;
        let rng = StdRng::from_rng(&mut self.rng)
            .map_err(|e| ZiError::internal(format!("failed to seed sample rng: {e}")))?;

        let generator: &Self = self;
        Ok(ZiSampleIter {
            pool: generator.prepared_pool()?,
            generator,
            filter,
            rng,
            remaining: count,
        })
    }

    /// Generates `count` samples on the rayon thread pool.
    ///
    /// Each sample uses its own RNG seeded from one base seed, so the output
    /// is reproducible for a seeded generator regardless of thread count.
    #[cfg(feature = "parallel")]
    pub fn sample_batch_parallel(
        &mut self,
        count: usize,
        genders: Option<&[&str]>,
        namesets: Option<&[&str]>,
    ) -> Result<Vec<ZiSample>> {
        use rayon::prelude::*;

        self.ensure_templates()?;
        self.prepare()?;
        let base_seed: u64 = self.rng.gen();
        let filter = ZiRecordFilter::by_gender_and_nameset(genders, namesets);

        let generator: &Self = self;
        let pool = generator.prepared_pool()?;
        (0..count)
            .into_par_iter()
            .map(|index| {
                let mut rng = StdRng::seed_from_u64(base_seed.wrapping_add(index as u64));
                generator.generate_one(pool, &filter, &mut rng)
            })
            .collect()
    }

    fn ensure_templates(&self) -> Result<()> {
        if self.templates.is_empty() {
            return Err(ZiError::validation("no templates provided"));
        }
        Ok(())
    }

    fn generate_one<R: Rng + ?Sized>(
        &self,
        pool: &ZiRecordPool,
        filter: &ZiRecordFilter,
        rng: &mut R,
    ) -> Result<ZiSample> {
        let template_index = rng.gen_range(0..self.templates.len());
        log::debug!("rendering template #{template_index}");

        let selector = ZiRecordSelector::new(pool);
        let record = selector.select(filter, rng)?;
        let parsed = ZiParsedTemplate::parse(&self.templates[template_index])?;

        let mut working = record.clone();
        selector.attach_duplicates(&mut working, &parsed, rng);
        let values: HashMap<String, String> = parsed
            .placeholders
            .iter()
            .filter_map(|id| working.get_text(id).map(|value| (id.clone(), value)))
            .collect();

        let rendered = self.renderer.render(&parsed, &values, rng);
        let mut sample = ZiSample::new(rendered.text, rendered.spans, parsed.masked());

        if self.config.include_metadata {
            sample.metadata = Some(metadata_for(&record, &sample.full_text, template_index));
        }

        self.consolidator.consolidate(&mut sample);

        if self.config.span_to_tag {
            let tagging = self.tagger.tag(
                &sample.full_text,
                &sample.spans,
                self.config.labeling_scheme,
                self.vocabulary.as_ref(),
            )?;
            sample.tokens = Some(tagging.tokens);
            sample.tags = Some(tagging.tags);
        }

        Ok(sample)
    }
}

fn metadata_for(record: &ZiIdentityRecord, text: &str, template_index: usize) -> ZiSampleMetadata {
    ZiSampleMetadata {
        gender: record.get_text("GENDER"),
        name_set: record.get_text("NAMESET"),
        country: record.get_text("COUNTRY"),
        lowercase: is_lowercase_text(text),
        template_index,
    }
}

/// Lazy, finite sequence of generated samples.
///
/// Each item is an independent draw; an error for one draw does not end
/// the sequence.
#[derive(Debug)]
pub struct ZiSampleIter<'a> {
    generator: &'a ZiFakeDataGenerator,
    pool: &'a ZiRecordPool,
    filter: ZiRecordFilter,
    rng: StdRng,
    remaining: usize,
}

impl Iterator for ZiSampleIter<'_> {
    type Item = Result<ZiSample>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(
            self.generator
                .generate_one(self.pool, &self.filter, &mut self.rng),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ZiSampleIter<'_> {}
