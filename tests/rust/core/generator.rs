//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of ZiSynth.
//! The ZiSynth project belongs to the Dunimd Team.

use std::collections::HashSet;
use std::sync::Arc;

use rand::RngCore;
use serde_json::{json, Value};
use zisynth::{
    ZiAttributeGenerator, ZiError, ZiFakeDataGenerator, ZiGeneratorConfig, ZiIdentityRecord,
    ZiLabelingScheme, ZiPoolPreparer, ZiRecordFilter, ZiRecordPool, ZiSample,
};

fn identity(given: &str, surname: &str, gender: &str, nameset: &str, city: &str) -> ZiIdentityRecord {
    ZiIdentityRecord::from_pairs([
        ("GivenName", json!(given)),
        ("Surname", json!(surname)),
        ("Gender", json!(gender)),
        ("NameSet", json!(nameset)),
        ("City", json!(city)),
        ("CountryFull", json!("Testland")),
        ("Birthday", json!("3/14/1985")),
    ])
}

fn raw_pool() -> ZiRecordPool {
    ZiRecordPool::new(vec![
        identity("Dana", "Levi", "female", "Hebrew", "Haifa"),
        identity("Tom", "Berg", "male", "Dutch", "Utrecht"),
        identity("Mia", "Rossi", "female", "Italian", "Turin"),
        identity("Kenji", "Sato", "male", "Japanese", "Osaka"),
    ])
}

fn config() -> ZiGeneratorConfig {
    ZiGeneratorConfig {
        lower_case_ratio: 0.0,
        seed: Some(2024),
        ..Default::default()
    }
}

fn generate(templates: &[&str], config: ZiGeneratorConfig, count: usize) -> Vec<ZiSample> {
    let templates = templates.iter().map(|t| t.to_string()).collect();
    let mut generator = ZiFakeDataGenerator::new(raw_pool(), templates, config).unwrap();
    generator
        .sample_examples(count, None, None)
        .unwrap()
        .collect::<zisynth::Result<Vec<_>>>()
        .unwrap()
}

fn assert_spans_valid(sample: &ZiSample) {
    let len = sample.char_len();
    let mut previous_end = 0;
    for span in &sample.spans {
        assert!(span.start_position < span.end_position, "{span:?}");
        assert!(span.end_position <= len, "{span:?}");
        assert!(span.start_position >= previous_end, "spans overlap: {:?}", sample.spans);
        assert_eq!(sample.span_text(span), Some(span.entity_value.as_str()));
        previous_end = span.end_position;
    }
}

#[test]
fn test_one_span_per_placeholder() {
    let samples = generate(&["[PERSON] met [PERSON] at [CITY]"], config(), 25);
    for sample in &samples {
        assert_eq!(sample.spans.len(), 3);
        assert_spans_valid(sample);
        let types: Vec<&str> = sample.spans.iter().map(|s| s.entity_type.as_str()).collect();
        assert_eq!(types, vec!["PERSON", "PERSON", "LOCATION"]);
        assert_eq!(sample.masked, "[PERSON] met [PERSON2] at [LOCATION]");
    }
}

#[test]
fn test_explicitly_indexed_template_keeps_parity() {
    let config = ZiGeneratorConfig {
        templates_prepared: true,
        ..config()
    };
    for sample in generate(&["{PERSON} called {PERSON2} from {CITY}"], config, 20) {
        assert_eq!(sample.spans.len(), 3);
        assert!(sample.spans.iter().all(|s| !s.entity_value.is_empty()));
        assert_eq!(sample.spans[1].entity_type, "PERSON");
        assert_spans_valid(&sample);
    }
}

#[test]
fn test_written_index_and_repeats_render_separately() {
    let config = ZiGeneratorConfig {
        templates_prepared: true,
        ..config()
    };
    let samples = generate(&["{PERSON2} and {PERSON} and {PERSON}"], config, 20);
    for sample in &samples {
        assert_eq!(sample.spans.len(), 3);
        assert_eq!(sample.masked, "[PERSON2] and [PERSON] and [PERSON3]");
        assert_spans_valid(sample);
    }
    assert!(samples
        .iter()
        .any(|s| s.spans[0].entity_value != s.spans[2].entity_value));
}

#[test]
fn test_duplicate_values_are_never_empty() {
    let samples = generate(&["[FIRST_NAME] and [FIRST_NAME] went home"], config(), 25);
    for sample in &samples {
        assert_eq!(sample.spans.len(), 2);
        assert!(sample.spans.iter().all(|s| !s.entity_value.is_empty()));
        assert!(sample.spans.iter().all(|s| s.entity_type == "PERSON"));
    }
}

#[test]
fn test_absent_gender_yields_empty_pool_error() {
    let mut generator =
        ZiFakeDataGenerator::new(raw_pool(), vec!["[PERSON]".into()], config()).unwrap();
    let first = generator
        .sample_examples(1, Some(&["nonbinary"][..]), None)
        .unwrap()
        .next()
        .unwrap();
    assert!(matches!(first, Err(ZiError::EmptyPool { .. })));
}

#[test]
fn test_filters_restrict_primary_record() {
    let mut generator =
        ZiFakeDataGenerator::new(raw_pool(), vec!["[PERSON] says hi".into()], config()).unwrap();
    let samples: Vec<ZiSample> = generator
        .sample_examples(30, Some(&["female"][..]), Some(&["Italian"][..]))
        .unwrap()
        .collect::<zisynth::Result<_>>()
        .unwrap();
    for sample in samples {
        assert_eq!(sample.full_text, "Mia Rossi says hi");
        let metadata = sample.metadata.unwrap();
        assert_eq!(metadata.gender.as_deref(), Some("female"));
        assert_eq!(metadata.name_set.as_deref(), Some("Italian"));
    }
}

#[test]
fn test_empty_filter_lists_do_not_constrain() {
    let mut generator =
        ZiFakeDataGenerator::new(raw_pool(), vec!["[FIRST_NAME]".into()], config()).unwrap();
    let names: HashSet<String> = generator
        .sample_examples(60, Some(&[][..]), Some(&[][..]))
        .unwrap()
        .map(|sample| sample.unwrap().full_text)
        .collect();
    assert!(names.len() > 1);
}

#[test]
fn test_full_lowercase_ratio() {
    let config = ZiGeneratorConfig {
        lower_case_ratio: 1.0,
        ..config()
    };
    for sample in generate(&["Dear [PERSON], welcome to [CITY]"], config, 15) {
        assert_eq!(sample.full_text, sample.full_text.to_lowercase());
        assert!(sample.metadata.as_ref().unwrap().lowercase);
        assert_spans_valid(&sample);
    }
}

#[test]
fn test_bilou_tags_align_with_tokens() {
    let config = ZiGeneratorConfig {
        labeling_scheme: ZiLabelingScheme::Bilou,
        ..config()
    };
    for sample in generate(&["My name is [PERSON]."], config, 10) {
        let tokens = sample.tokens.as_ref().unwrap();
        let tags = sample.tags.as_ref().unwrap();
        assert_eq!(tokens.len(), tags.len());
        assert_eq!(&tags[..3], &["O", "O", "O"]);
        assert_eq!(&tags[3..], &["B-PERSON", "L-PERSON", "O"]);
    }
}

#[test]
fn test_adjacent_placeholders_are_tagged() {
    let mut generator = ZiFakeDataGenerator::new(
        raw_pool(),
        vec!["User [FIRST_NAME][LAST_NAME] logged in".into()],
        config(),
    )
    .unwrap();
    let sample = generator
        .sample_examples(1, Some(&["female"][..]), Some(&["Hebrew"][..]))
        .unwrap()
        .next()
        .unwrap()
        .unwrap();
    assert_eq!(sample.full_text, "User DanaLevi logged in");
    let tokens: Vec<&str> = sample
        .tokens
        .as_ref()
        .unwrap()
        .iter()
        .map(|t| t.text.as_str())
        .collect();
    assert_eq!(tokens, vec!["User", "Dana", "Levi", "logged", "in"]);
    assert_eq!(
        sample.tags.unwrap(),
        vec!["O", "U-PERSON", "U-PERSON", "O", "O"]
    );
}

#[test]
fn test_span_ending_inside_a_word_is_tagged() {
    let mut generator =
        ZiFakeDataGenerator::new(raw_pool(), vec!["[PERSON]s car".into()], config()).unwrap();
    let sample = generator
        .sample_examples(1, Some(&["male"][..]), Some(&["Dutch"][..]))
        .unwrap()
        .next()
        .unwrap()
        .unwrap();
    assert_eq!(sample.full_text, "Tom Bergs car");
    let tokens: Vec<&str> = sample
        .tokens
        .as_ref()
        .unwrap()
        .iter()
        .map(|t| t.text.as_str())
        .collect();
    assert_eq!(tokens, vec!["Tom", "Berg", "s", "car"]);
    assert_eq!(sample.tags.unwrap(), vec!["B-PERSON", "L-PERSON", "O", "O"]);
}

#[test]
fn test_tagging_and_metadata_can_be_disabled() {
    let config = ZiGeneratorConfig {
        span_to_tag: false,
        include_metadata: false,
        ..config()
    };
    for sample in generate(&["[CITY] is busy"], config, 5) {
        assert!(sample.tokens.is_none());
        assert!(sample.tags.is_none());
        assert!(sample.metadata.is_none());
    }
}

#[test]
fn test_missing_attribute_renders_empty() {
    let samples = generate(&["Account [IBAN] closed"], config(), 3);
    for sample in samples {
        assert_eq!(sample.full_text, "Account  closed");
        assert!(sample.spans.is_empty());
        assert_eq!(sample.masked, "Account [IBAN] closed");
    }
}

#[test]
fn test_template_without_placeholders() {
    let samples = generate(&["Nothing to see here."], config(), 2);
    assert!(samples.iter().all(|s| s.full_text == "Nothing to see here." && s.spans.is_empty()));
}

#[derive(Debug)]
struct FixedIban;

impl ZiAttributeGenerator for FixedIban {
    fn attribute(&self) -> &str {
        "IBAN"
    }

    fn generate(&self, _record: &ZiIdentityRecord, _rng: &mut dyn RngCore) -> Option<Value> {
        Some(json!("DE89370400440532013000"))
    }
}

#[test]
fn test_custom_generator_feeds_templates() {
    let preparer = ZiPoolPreparer::new(Vec::<String>::new()).with_generator(Box::new(FixedIban));
    let mut generator =
        ZiFakeDataGenerator::new(raw_pool(), vec!["Pay to [IBAN] now".into()], config())
            .unwrap()
            .with_preparer(preparer);
    let sample = generator
        .sample_examples(1, None, None)
        .unwrap()
        .next()
        .unwrap()
        .unwrap();
    assert_eq!(sample.full_text, "Pay to DE89370400440532013000 now");
    assert_eq!(sample.spans[0].entity_type, "IBAN");
}

#[test]
fn test_ignored_types_are_not_derived() {
    let config = ZiGeneratorConfig {
        ignore_types: vec!["DATE_TIME".to_string()],
        ..config()
    };
    let mut generator =
        ZiFakeDataGenerator::new(raw_pool(), vec!["[DATE_TIME]".into()], config).unwrap();
    let pool = generator.prepare().unwrap();
    assert!(!pool.has_attribute("DATE_TIME"));
    assert!(pool.has_attribute("PERSON"));
}

#[test]
fn test_prepared_pool_skips_preparation() {
    let pool = ZiRecordPool::new(vec![ZiIdentityRecord::from_pairs([
        ("COMPANY", "Acme"),
        ("GENDER", "female"),
    ])]);
    let mut generator = ZiFakeDataGenerator::new(
        ZiRecordPool::default(),
        vec!["{COMPANY} is hiring".into()],
        ZiGeneratorConfig {
            templates_prepared: true,
            ..config()
        },
    )
    .unwrap()
    .with_prepared_pool(pool);
    let sample = generator
        .sample_with_filter(1, ZiRecordFilter::new().with_allowed("GENDER", ["female"]))
        .unwrap()
        .next()
        .unwrap()
        .unwrap();
    assert_eq!(sample.full_text, "Acme is hiring");
    assert_eq!(sample.spans[0].entity_type, "COMPANY");
}

#[test]
fn test_vocabulary_marks_tokens() {
    let vocabulary: HashSet<String> = ["name".to_string()].into_iter().collect();
    let mut generator =
        ZiFakeDataGenerator::new(raw_pool(), vec!["My name is [FIRST_NAME]".into()], config())
            .unwrap()
            .with_vocabulary(Arc::new(vocabulary));
    let sample = generator
        .sample_examples(1, None, None)
        .unwrap()
        .next()
        .unwrap()
        .unwrap();
    let flags: Vec<bool> = sample
        .tokens
        .unwrap()
        .iter()
        .map(|t| t.is_in_vocabulary)
        .collect();
    assert_eq!(flags, vec![false, true, false, false]);
}

#[test]
fn test_seeded_generators_agree() {
    let templates = ["[PERSON] flew from [CITY] to [CITY]", "Call [FIRST_NAME]"];
    assert_eq!(generate(&templates, config(), 20), generate(&templates, config(), 20));
}

#[cfg(feature = "parallel")]
#[test]
fn test_parallel_batch_is_reproducible() {
    let run = || {
        let mut generator = ZiFakeDataGenerator::new(
            raw_pool(),
            vec!["[PERSON] met [PERSON] in [CITY]".into()],
            config(),
        )
        .unwrap();
        generator.sample_batch_parallel(40, None, None).unwrap()
    };
    let first = run();
    assert_eq!(first.len(), 40);
    first.iter().for_each(assert_spans_valid);
    assert_eq!(first, run());
}
