//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of ZiSynth.
//! The ZiSynth project belongs to the Dunimd Team.

use std::fs;

use zisynth::io::{
    load_identity_jsonl, load_samples_jsonl, load_templates, load_vocabulary_lines,
    write_samples_jsonl,
};
use zisynth::{ZiFakeDataGenerator, ZiGeneratorConfig};

#[test]
fn test_generated_samples_survive_jsonl() {
    let dir = tempfile::tempdir().unwrap();
    let templates_path = dir.path().join("templates.txt");
    let pool_path = dir.path().join("identities.jsonl");
    let out_path = dir.path().join("samples.jsonl");

    fs::write(&templates_path, "I am [PERSON] from [CITY]\n\nCall [FIRST_NAME]\n").unwrap();
    fs::write(
        &pool_path,
        concat!(
            "{\"GivenName\": \"Dana\", \"Surname\": \"Levi\", \"City\": \"Haifa\", \"Gender\": \"female\"}\n",
            "{\"GivenName\": \"Tom\", \"Surname\": \"Berg\", \"City\": \"Utrecht\", \"Gender\": \"male\"}\n",
        ),
    )
    .unwrap();

    let templates = load_templates(&templates_path).unwrap();
    assert_eq!(templates.len(), 2);
    let pool = load_identity_jsonl(&pool_path).unwrap();
    assert_eq!(pool.len(), 2);

    let config = ZiGeneratorConfig {
        seed: Some(5),
        ..Default::default()
    };
    let mut generator = ZiFakeDataGenerator::new(pool, templates, config).unwrap();
    let samples: Vec<_> = generator
        .sample_examples(8, None, None)
        .unwrap()
        .collect::<zisynth::Result<_>>()
        .unwrap();

    write_samples_jsonl(&out_path, &samples).unwrap();
    assert_eq!(load_samples_jsonl(&out_path).unwrap(), samples);
}

#[test]
fn test_sample_metadata_keys() {
    let dir = tempfile::tempdir().unwrap();
    let pool_path = dir.path().join("identities.jsonl");
    fs::write(
        &pool_path,
        "{\"GivenName\": \"Dana\", \"Gender\": \"female\", \"NameSet\": \"Hebrew\", \"CountryFull\": \"Israel\"}\n",
    )
    .unwrap();

    let mut generator = ZiFakeDataGenerator::new(
        load_identity_jsonl(&pool_path).unwrap(),
        vec!["Hello [FIRST_NAME]".into()],
        ZiGeneratorConfig {
            lower_case_ratio: 0.0,
            ..Default::default()
        },
    )
    .unwrap();
    let sample = generator
        .sample_examples(1, None, None)
        .unwrap()
        .next()
        .unwrap()
        .unwrap();
    let value = serde_json::to_value(&sample).unwrap();
    let metadata = &value["metadata"];
    assert_eq!(metadata["Gender"], "female");
    assert_eq!(metadata["NameSet"], "Hebrew");
    assert_eq!(metadata["Country"], "Israel");
    assert_eq!(metadata["Lowercase"], false);
    assert_eq!(metadata["Template#"], 0);
}

#[test]
fn test_vocabulary_lines_are_lowercased() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vocab.txt");
    fs::write(&path, "Hello\nworld\n\n").unwrap();
    let vocabulary = load_vocabulary_lines(&path).unwrap();
    assert!(vocabulary.contains("hello"));
    assert!(vocabulary.contains("world"));
    assert_eq!(vocabulary.len(), 2);
}

#[test]
fn test_missing_file_is_io_error() {
    let err = load_templates("/definitely/not/here.txt").unwrap_err();
    assert!(matches!(err, zisynth::ZiError::Io(_)));
}

#[cfg(feature = "csv")]
#[test]
fn test_csv_identity_table() {
    use zisynth::io::{load_identity_csv, load_vocabulary_csv};

    let dir = tempfile::tempdir().unwrap();
    let table = dir.path().join("identities.csv");
    fs::write(&table, "GivenName,Surname,Gender\nDana,Levi,female\nTom,Berg,male\n").unwrap();
    let pool = load_identity_csv(&table).unwrap();
    assert_eq!(pool.len(), 2);
    assert_eq!(pool.records()[1].get_text("Surname").as_deref(), Some("Berg"));

    let vocab = dir.path().join("vocab.csv");
    fs::write(&vocab, "WORD,FREQ\nThe,100\nname,20\n").unwrap();
    let words = load_vocabulary_csv(&vocab).unwrap();
    assert!(words.contains("the") && words.contains("name"));

    let bad = dir.path().join("bad.csv");
    fs::write(&bad, "TOKEN\nfoo\n").unwrap();
    assert!(load_vocabulary_csv(&bad).is_err());
}
