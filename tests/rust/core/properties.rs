//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of ZiSynth.
//! The ZiSynth project belongs to the Dunimd Team.

use std::collections::HashMap;

use proptest::prelude::*;
use proptest::sample::select;
use zisynth::sample::char_slice;
use zisynth::{
    render_with_case, strip_index, ZiEntityConsolidator, ZiParsedTemplate, ZiSample,
};

const ENTITIES: &[&str] = &[
    "PERSON",
    "FIRST_NAME",
    "LAST_NAME",
    "CITY",
    "COUNTRY",
    "STREET",
    "LOCATION",
    "EMAIL_ADDRESS",
    "IBAN",
];

fn template_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(("[a-zA-Zé ,.]{0,8}", select(ENTITIES)), 0..6).prop_flat_map(|parts| {
        "[a-z .!?]{0,6}".prop_map(move |tail| {
            let mut template: String = parts
                .iter()
                .map(|(literal, entity)| format!("{literal}{{{entity}}}"))
                .collect();
            template.push_str(&tail);
            template
        })
    })
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[A-Za-zÄöü]{1,8}( [A-Za-z]{1,8})?"
}

proptest! {
    #[test]
    fn prop_placeholders_round_trip(template in template_strategy()) {
        let parsed = ZiParsedTemplate::parse(&template).unwrap();
        let total: usize = parsed.entity_counts.values().sum();
        prop_assert_eq!(parsed.placeholders.len(), total);
        for id in &parsed.placeholders {
            prop_assert!(parsed.entity_counts.contains_key(strip_index(id)));
        }
    }

    #[test]
    fn prop_rendered_spans_are_valid(
        template in template_strategy(),
        pool in prop::collection::vec(value_strategy(), 1..6),
        lowercase in any::<bool>(),
    ) {
        let parsed = ZiParsedTemplate::parse(&template).unwrap();
        let values: HashMap<String, String> = parsed
            .placeholders
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), pool[i % pool.len()].clone()))
            .collect();
        let rendered = render_with_case(&parsed, &values, lowercase);

        prop_assert_eq!(rendered.spans.len(), parsed.placeholders.len());
        let len = rendered.text.chars().count();
        let mut previous_end = 0;
        for (span, id) in rendered.spans.iter().zip(&parsed.placeholders) {
            prop_assert!(span.start_position < span.end_position);
            prop_assert!(span.end_position <= len);
            prop_assert!(span.start_position >= previous_end);
            prop_assert_eq!(span.entity_type.as_str(), strip_index(id));
            prop_assert_eq!(
                char_slice(&rendered.text, span.start_position, span.end_position),
                Some(span.entity_value.as_str())
            );
            previous_end = span.end_position;
        }
        if lowercase {
            prop_assert_eq!(rendered.text.clone(), rendered.text.to_lowercase());
        }
    }

    #[test]
    fn prop_consolidation_is_idempotent(
        template in template_strategy(),
        value in value_strategy(),
        lowercase in any::<bool>(),
    ) {
        let parsed = ZiParsedTemplate::parse(&template).unwrap();
        let values: HashMap<String, String> = parsed
            .placeholders
            .iter()
            .map(|id| (id.clone(), value.clone()))
            .collect();
        let rendered = render_with_case(&parsed, &values, lowercase);
        let mut once = ZiSample::new(rendered.text, rendered.spans, parsed.masked());

        let consolidator = ZiEntityConsolidator::default();
        consolidator.consolidate(&mut once);
        let mut twice = once.clone();
        consolidator.consolidate(&mut twice);
        prop_assert_eq!(&once, &twice);

        for span in &once.spans {
            if let Some(canonical) = consolidator.canonical(&span.entity_type) {
                prop_assert_eq!(span.entity_type.as_str(), canonical);
            }
        }
    }
}
