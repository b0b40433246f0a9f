// Citation extraction for assistant answers.
//
// Answers cite sources inline as `[AMM: Title - Ref]`, `[EASA: ...]` or
// `[FAA: ...]`. The extractor lifts every well-formed marker into a
// `Reference` and returns the prose with the markers removed. Anything that
// does not match (unknown kind, missing `]`, nested brackets) stays in the
// text untouched.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::chat::{Reference, ReferenceKind};

/// Title used when a marker has no ` - ` separator or an empty title part.
pub const PLACEHOLDER_TITLE: &str = "Reference";

const TITLE_SEPARATOR: &str = " - ";

/// `[KIND:` then a body with no brackets, then `]`.
static MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(AMM|EASA|FAA):([^\[\]]*)\]").expect("citation marker pattern is valid")
});

/// Result of running the extractor over one answer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtractedReferences {
    /// Answer text with all markers removed, trimmed.
    pub text: String,
    /// One entry per marker, in source order.
    pub references: Vec<Reference>,
}

/// Split `raw` into cleaned prose and the citations it contains.
///
/// Total: never fails, and text without markers comes back trimmed and
/// otherwise unchanged with no references.
pub fn extract_references(raw: &str) -> ExtractedReferences {
    let references = MARKER
        .captures_iter(raw)
        .filter_map(|caps| {
            let kind = ReferenceKind::from_token(caps.get(1)?.as_str())?;
            let body = caps.get(2).map_or("", |m| m.as_str());
            Some(parse_body(kind, body))
        })
        .collect();

    let text = MARKER.replace_all(raw, "").trim().to_string();

    ExtractedReferences { text, references }
}

fn parse_body(kind: ReferenceKind, body: &str) -> Reference {
    match body.split_once(TITLE_SEPARATOR) {
        Some((title, code)) => {
            let title = title.trim();
            Reference {
                kind,
                title: if title.is_empty() {
                    PLACEHOLDER_TITLE.to_string()
                } else {
                    title.to_string()
                },
                code: code.trim().to_string(),
            }
        }
        None => Reference {
            kind,
            title: PLACEHOLDER_TITLE.to_string(),
            code: body.trim().to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(kind: ReferenceKind, title: &str, code: &str) -> Reference {
        Reference {
            kind,
            title: title.into(),
            code: code.into(),
        }
    }

    #[test]
    fn mixed_markers_are_extracted_in_order() {
        let out = extract_references("Check [AMM: Elevator Trim - 27-34-00] and [EASA: Cert Req]");
        assert_eq!(out.text, "Check  and");
        assert_eq!(
            out.references,
            vec![
                reference(ReferenceKind::Amm, "Elevator Trim", "27-34-00"),
                reference(ReferenceKind::Easa, "Reference", "Cert Req"),
            ]
        );
    }

    #[test]
    fn text_without_markers_is_only_trimmed() {
        let out = extract_references("  Inspect the aileron hinge.\n");
        assert_eq!(out.text, "Inspect the aileron hinge.");
        assert!(out.references.is_empty());
    }

    #[test]
    fn extraction_is_idempotent_on_cleaned_text() {
        let first = extract_references("See [FAA: AC 43.13 - Ch. 7] now");
        let second = extract_references(&first.text);
        assert_eq!(second.text, first.text);
        assert!(second.references.is_empty());
    }

    #[test]
    fn empty_body_yields_placeholder_and_empty_code() {
        let out = extract_references("a [AMM:] b [FAA:   ]");
        assert_eq!(
            out.references,
            vec![
                reference(ReferenceKind::Amm, "Reference", ""),
                reference(ReferenceKind::Faa, "Reference", ""),
            ]
        );
        assert_eq!(out.text, "a  b");
    }

    #[test]
    fn code_keeps_everything_after_first_separator() {
        let out = extract_references("[AMM: Flap Track - 27-50-00 - Task 2]");
        assert_eq!(
            out.references,
            vec![reference(ReferenceKind::Amm, "Flap Track", "27-50-00 - Task 2")]
        );
        assert_eq!(out.text, "");
    }

    #[test]
    fn blank_title_before_separator_uses_placeholder() {
        let out = extract_references("[EASA:  - CS-25.671]");
        assert_eq!(
            out.references,
            vec![reference(ReferenceKind::Easa, "Reference", "CS-25.671")]
        );
    }

    #[test]
    fn unclosed_marker_is_left_as_text() {
        let raw = "Refer to [AMM: Rudder - 27-20-00 for details";
        let out = extract_references(raw);
        assert_eq!(out.text, raw);
        assert!(out.references.is_empty());
    }

    #[test]
    fn unknown_kind_and_lowercase_are_left_as_text() {
        let out = extract_references("[ICAO: Annex 6] [amm: lower]");
        assert_eq!(out.text, "[ICAO: Annex 6] [amm: lower]");
        assert!(out.references.is_empty());
    }

    #[test]
    fn nested_brackets_are_not_matched() {
        let raw = "[AMM: Spoiler [old] - 27-60-00]";
        let out = extract_references(raw);
        assert!(out.references.is_empty());
        assert_eq!(out.text, raw);
    }

    #[test]
    fn input_is_not_mutated() {
        let raw = String::from("x [FAA: Part 145] y");
        let _ = extract_references(&raw);
        assert_eq!(raw, "x [FAA: Part 145] y");
    }

    #[test]
    fn many_markers_keep_source_order() {
        let raw = "[FAA: one] [AMM: two] [EASA: three] [AMM: four]";
        let codes: Vec<_> = extract_references(raw)
            .references
            .into_iter()
            .map(|r| r.code)
            .collect();
        assert_eq!(codes, vec!["one", "two", "three", "four"]);
    }
}
