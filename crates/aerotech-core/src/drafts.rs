// Work-package drafts from planner output.
//
// The planner's `work_package` section is generated text: sometimes a JSON
// object (often inside a ```json fence), sometimes prose. `parse` turns
// either into a `WorkPackageDraft` that can be submitted as-is. It never
// fails; prose yields a synthetic draft built from the fallback title.

use std::sync::LazyLock;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::DraftPolicy;
use crate::ids;
use crate::models::work_package::{DraftSource, WorkPackageDraft, WorkPackageStatus};

/// Freeform titles taken from the raw text are cut to this many characters.
pub const FREEFORM_TITLE_CHARS: usize = 80;

/// Hard cap on any freeform title.
pub const MAX_TITLE_CHARS: usize = 200;

static FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json)?\s*(.*?)```").expect("fence pattern is valid")
});

/// Planner text after fence stripping, classified.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftInput {
    Structured(Map<String, Value>),
    Freeform(String),
}

impl DraftInput {
    /// Strip one fenced block if present and try to read a JSON object.
    ///
    /// Arrays, scalars and invalid JSON are all freeform.
    pub fn classify(raw: &str) -> DraftInput {
        let trimmed = raw.trim();
        let body = FENCE
            .captures(trimmed)
            .and_then(|caps| caps.get(1))
            .map_or(trimmed, |m| m.as_str().trim());

        match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(map)) => DraftInput::Structured(map),
            _ => DraftInput::Freeform(trimmed.to_string()),
        }
    }
}

/// Build a draft from planner text, timestamped now.
pub fn parse(raw: &str, fallback_title: &str, policy: &DraftPolicy) -> WorkPackageDraft {
    parse_at(raw, fallback_title, policy, Utc::now())
}

/// Build a draft from planner text as of `now`.
pub fn parse_at(
    raw: &str,
    fallback_title: &str,
    policy: &DraftPolicy,
    now: DateTime<Utc>,
) -> WorkPackageDraft {
    let due_date = due_date(now, policy.due_in_days);
    let fallback_title = fallback_title.trim();

    match DraftInput::classify(raw) {
        DraftInput::Structured(fields) => {
            debug!("Work package text parsed as JSON ({} fields)", fields.len());
            let id = first_text(&fields, &["work_package_id", "id"])
                .unwrap_or_else(|| ids::work_package_id(now));
            let title = first_text(&fields, &["component", "title", "aircraft_type"])
                .or_else(|| non_blank(fallback_title))
                .unwrap_or_else(|| policy.placeholder_title.clone());
            let aircraft = first_text(&fields, &["aircraft_type", "aircraft"])
                .unwrap_or_else(|| policy.default_aircraft.clone());
            let ata = first_text(&fields, &["ata"]).unwrap_or_else(|| policy.default_ata.clone());

            WorkPackageDraft {
                id,
                title,
                aircraft,
                ata,
                status: WorkPackageStatus::Pending,
                assigned_to: None,
                due_date,
                source: DraftSource::Structured,
            }
        }
        DraftInput::Freeform(text) => {
            debug!("Work package text is freeform; building synthetic draft");
            let title = non_blank(fallback_title)
                .or_else(|| non_blank(&truncate_chars(&text, FREEFORM_TITLE_CHARS)))
                .unwrap_or_else(|| policy.placeholder_title.clone());

            WorkPackageDraft {
                id: ids::work_package_id(now),
                title: truncate_chars(&title, MAX_TITLE_CHARS),
                aircraft: policy.default_aircraft.clone(),
                ata: policy.default_ata.clone(),
                status: WorkPackageStatus::Pending,
                assigned_to: None,
                due_date,
                source: DraftSource::Freeform,
            }
        }
    }
}

/// `now + days` as a calendar date. An offset past chrono's range falls
/// back to the default policy offset, then to today.
fn due_date(now: DateTime<Utc>, days: u32) -> NaiveDate {
    let offset = |days: u32| {
        Duration::try_days(i64::from(days)).and_then(|d| now.checked_add_signed(d))
    };
    offset(days)
        .or_else(|| {
            warn!("Due date {} days ahead is out of range; using the default", days);
            offset(DraftPolicy::default().due_in_days)
        })
        .unwrap_or(now)
        .date_naive()
}

/// First key whose value renders to non-blank text. Strings are used
/// directly, numbers and booleans are stringified, null and containers skip.
fn first_text(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match fields.get(*key)? {
        Value::String(s) => non_blank(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

fn non_blank(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 22, 30, 0).unwrap()
    }

    fn policy() -> DraftPolicy {
        DraftPolicy::default()
    }

    #[test]
    fn fenced_json_with_id_and_component() {
        let raw = "Here you go:\n```json\n{\"id\":\"X1\",\"component\":\"Elevator\"}\n```";
        let draft = parse_at(raw, "", &policy(), now());
        assert_eq!(draft.id, "X1");
        assert_eq!(draft.title, "Elevator");
        assert_eq!(draft.aircraft, "A320");
        assert_eq!(draft.ata, "27");
        assert_eq!(draft.status, WorkPackageStatus::Pending);
        assert_eq!(draft.assigned_to, None);
        assert_eq!(draft.due_date, NaiveDate::from_ymd_opt(2025, 3, 17).unwrap());
        assert_eq!(draft.source, DraftSource::Structured);
    }

    #[test]
    fn bare_json_without_fence_is_structured() {
        let raw = r#"{"work_package_id":"WP-9","title":"Trim actuator","aircraft_type":"B737","ata":"27-40"}"#;
        let draft = parse_at(raw, "fallback", &policy(), now());
        assert_eq!(draft.id, "WP-9");
        assert_eq!(draft.title, "Trim actuator");
        assert_eq!(draft.aircraft, "B737");
        assert_eq!(draft.ata, "27-40");
    }

    #[test]
    fn work_package_id_wins_over_id() {
        let raw = r#"{"work_package_id":"A","id":"B"}"#;
        assert_eq!(parse_at(raw, "", &policy(), now()).id, "A");
    }

    #[test]
    fn blank_id_is_generated() {
        let raw = r#"{"id":"   ","component":"Flap"}"#;
        let draft = parse_at(raw, "", &policy(), now());
        assert!(draft.id.starts_with("WP-"));
        assert_eq!(draft.id.len(), "WP-".len() + 6 + 1 + 6);
    }

    #[test]
    fn numeric_ata_is_stringified() {
        let raw = r#"{"id":"X","ata":32}"#;
        assert_eq!(parse_at(raw, "", &policy(), now()).ata, "32");
    }

    #[test]
    fn structured_title_falls_back_to_caller_then_placeholder() {
        let raw = r#"{"id":"X"}"#;
        assert_eq!(parse_at(raw, "Elevator jam", &policy(), now()).title, "Elevator jam");
        assert_eq!(parse_at(raw, "  ", &policy(), now()).title, "New work package");
    }

    #[test]
    fn aircraft_type_doubles_as_title_when_nothing_else() {
        let raw = r#"{"aircraft_type":"A321"}"#;
        let draft = parse_at(raw, "", &policy(), now());
        assert_eq!(draft.title, "A321");
        assert_eq!(draft.aircraft, "A321");
    }

    #[test]
    fn freeform_uses_fallback_title() {
        let draft = parse_at("Replace the elevator trim tab.", "Trim fault", &policy(), now());
        assert_eq!(draft.title, "Trim fault");
        assert_eq!(draft.source, DraftSource::Freeform);
        assert!(draft.id.starts_with("WP-"));
    }

    #[test]
    fn freeform_without_fallback_takes_first_80_chars() {
        let raw = "x".repeat(150);
        let draft = parse_at(&raw, "", &policy(), now());
        assert_eq!(draft.title, "x".repeat(80));
    }

    #[test]
    fn freeform_fallback_title_is_capped_at_200_chars() {
        let fallback = "y".repeat(300);
        let draft = parse_at("prose", &fallback, &policy(), now());
        assert_eq!(draft.title.chars().count(), 200);
    }

    #[test]
    fn empty_input_still_yields_usable_draft() {
        let draft = parse_at("", "", &policy(), now());
        assert!(!draft.id.is_empty());
        assert_eq!(draft.title, "New work package");
        assert_eq!(draft.aircraft, "A320");
        assert_eq!(draft.ata, "27");
    }

    #[test]
    fn arrays_and_scalars_are_freeform() {
        assert_eq!(DraftInput::classify("[1,2]"), DraftInput::Freeform("[1,2]".into()));
        assert_eq!(DraftInput::classify("42"), DraftInput::Freeform("42".into()));
        assert!(matches!(DraftInput::classify("{broken"), DraftInput::Freeform(_)));
    }

    #[test]
    fn multibyte_text_is_truncated_on_char_boundaries() {
        let raw = "ğ".repeat(100);
        let draft = parse_at(&raw, "", &policy(), now());
        assert_eq!(draft.title.chars().count(), 80);
    }

    #[test]
    fn policy_overrides_defaults() {
        let policy = DraftPolicy {
            due_in_days: 3,
            default_aircraft: "E190".into(),
            default_ata: "32".into(),
            placeholder_title: "Untitled".into(),
        };
        let draft = parse_at("", "", &policy, now());
        assert_eq!(draft.aircraft, "E190");
        assert_eq!(draft.ata, "32");
        assert_eq!(draft.title, "Untitled");
        assert_eq!(draft.due_date, NaiveDate::from_ymd_opt(2025, 3, 13).unwrap());
    }

    #[test]
    fn out_of_range_due_offset_falls_back_to_default() {
        let policy = DraftPolicy {
            due_in_days: 200_000_000,
            ..DraftPolicy::default()
        };
        let draft = parse_at("prose", "t", &policy, now());
        assert_eq!(draft.due_date, NaiveDate::from_ymd_opt(2025, 3, 17).unwrap());

        let draft = parse_at("prose", "t", &DraftPolicy { due_in_days: u32::MAX, ..policy }, now());
        assert_eq!(draft.due_date, NaiveDate::from_ymd_opt(2025, 3, 17).unwrap());
    }
}
