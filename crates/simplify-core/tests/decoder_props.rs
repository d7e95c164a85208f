//! Property tests for the response decoder

use proptest::prelude::*;
use simplify_core::{decode_document, decode_section, Document, Section, SimplifyError};

fn section_strategy() -> impl Strategy<Value = Section> {
    (
        "[A-Za-z0-9][A-Za-z0-9 .{}\\[\\]\"\\\\]{0,20}",
        "[A-Za-z0-9 .,{}\\[\\]\"\\\\\n\t]{0,60}",
        "[A-Za-z0-9 .{}\"]{0,30}",
    )
        .prop_map(|(title, body, rationale)| Section::new(title, body, rationale))
}

fn wrapping_strategy() -> impl Strategy<Value = (String, String, bool)> {
    ("[A-Za-z ,.:]{0,30}", "[A-Za-z ,.:]{0,30}", any::<bool>())
}

fn wrap(payload: &str, before: &str, after: &str, fenced: bool) -> String {
    if fenced {
        format!("```json\n{}\n```", payload)
    } else {
        format!("{}\n{}\n{}", before, payload, after)
    }
}

proptest! {
    #[test]
    fn document_decoding_ignores_wrapping(
        sections in prop::collection::vec(section_strategy(), 0..5),
        (before, after, fenced) in wrapping_strategy(),
    ) {
        let document = Document::new(sections);
        let payload = serde_json::to_string(&document).unwrap();

        let plain = decode_document(&payload).unwrap();
        let wrapped = decode_document(&wrap(&payload, &before, &after, fenced)).unwrap();

        prop_assert_eq!(&plain, &document);
        prop_assert_eq!(wrapped, plain);
    }

    #[test]
    fn section_decoding_ignores_wrapping(
        section in section_strategy(),
        (before, after, fenced) in wrapping_strategy(),
    ) {
        let payload = serde_json::to_string_pretty(&section).unwrap();
        let decoded = decode_section(&wrap(&payload, &before, &after, fenced)).unwrap();
        prop_assert_eq!(decoded, section);
    }

    #[test]
    fn objects_without_sections_are_rejected(key in "[a-z]{1,12}") {
        prop_assume!(key != "sections");
        let payload = format!("{{\"{}\": []}}", key);
        let is_validation_error = matches!(
            decode_document(&payload),
            Err(SimplifyError::Validation { .. })
        );
        prop_assert!(is_validation_error);
    }

    #[test]
    fn decoder_never_panics(text in "\\PC{0,200}") {
        let _ = decode_document(&text);
        let _ = decode_section(&text);
    }
}
