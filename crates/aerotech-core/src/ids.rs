// Locally generated record identifiers.
//
// The backend accepts client-chosen ids. These are short, time-based and
// readable rather than globally unique.

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::models::resources::ResourceKind;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// `WP-<last 6 base36 digits of epoch millis>-<6 random base36 chars>`.
pub fn work_package_id(now: DateTime<Utc>) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..6)
        .map(|_| char::from(BASE36[rng.gen_range(0..BASE36.len())]))
        .collect();
    format!("WP-{}-{}", millis_stamp(now, 6), suffix)
}

/// Kind prefix plus the last 4 base36 digits of epoch millis, e.g. `T3k9z`.
pub fn resource_id(kind: ResourceKind, now: DateTime<Utc>) -> String {
    format!("{}{}", kind.id_prefix(), millis_stamp(now, 4))
}

/// Last `digits` base36 digits of the epoch milliseconds.
pub fn millis_stamp(now: DateTime<Utc>, digits: usize) -> String {
    let millis = u64::try_from(now.timestamp_millis()).unwrap_or_default();
    let full = to_base36(millis);
    full[full.len().saturating_sub(digits)..].to_string()
}

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".into();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(char::from(BASE36[(n % 36) as usize]));
        n /= 36;
    }
    digits.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn base36_encoding() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_295), "zz");
    }

    #[test]
    fn work_package_ids_have_fixed_shape_and_differ() {
        let now = Utc.timestamp_millis_opt(1_760_000_000_000).unwrap();
        let a = work_package_id(now);
        let b = work_package_id(now);
        assert!(a.starts_with("WP-"));
        assert_eq!(a.len(), "WP-".len() + 6 + 1 + 6);
        assert_eq!(a[..10], b[..10]);
        assert_ne!(a, b);
    }

    #[test]
    fn resource_ids_use_kind_prefix() {
        let now = Utc.timestamp_millis_opt(1_760_000_000_000).unwrap();
        let stamp = millis_stamp(now, 4);
        assert_eq!(resource_id(ResourceKind::Tools, now), format!("T{stamp}"));
        assert_eq!(resource_id(ResourceKind::Parts, now), format!("PRT{stamp}"));
        assert_eq!(stamp.len(), 4);
    }

    #[test]
    fn short_stamp_is_not_padded() {
        let epoch = Utc.timestamp_millis_opt(35).unwrap();
        assert_eq!(millis_stamp(epoch, 6), "z");
    }
}
