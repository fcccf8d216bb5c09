use chrono::{DateTime, TimeZone, Utc};
use fundamentals_core::timestamp::{format_timestamp, parse_timestamp};
use fundamentals_core::TableName;
use proptest::prelude::*;

// 1900-01-01 .. 2100-01-01, microsecond resolution
fn any_timestamp() -> impl Strategy<Value = DateTime<Utc>> {
    (-2_208_988_800i64..4_102_444_800i64, 0u32..1_000_000u32)
        .prop_map(|(secs, micros)| Utc.timestamp_opt(secs, micros * 1_000).unwrap())
}

proptest! {
    #[test]
    fn stored_text_orders_like_time(a in any_timestamp(), b in any_timestamp()) {
        let (fa, fb) = (format_timestamp(&a), format_timestamp(&b));
        prop_assert_eq!(a.cmp(&b), fa.cmp(&fb));
    }

    #[test]
    fn stored_text_parses_back(ts in any_timestamp()) {
        prop_assert_eq!(parse_timestamp(&format_timestamp(&ts)).unwrap(), ts);
    }

    #[test]
    fn accepted_table_names_are_plain_identifiers(name in "[A-Za-z_][A-Za-z0-9_]{0,40}") {
        prop_assume!(!name.to_ascii_lowercase().starts_with("sqlite_"));
        prop_assert!(TableName::parse(&name).is_ok());
    }

    #[test]
    fn names_with_punctuation_are_rejected(
        prefix in "[a-z]{1,8}",
        bad in "[ ;'\"()\\-.*]",
        suffix in "[a-z]{0,8}",
    ) {
        let name = format!("{prefix}{bad}{suffix}");
        prop_assert!(TableName::parse(&name).is_err());
    }
}
