use super::*;
use chrono::{NaiveDate, Timelike};

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, s)
        .unwrap()
}

#[test]
fn test_day_of_both_spellings() {
    assert_eq!(day_of("2025-10-01 13:45:41.632457"), "2025-10-01");
    assert_eq!(day_of("2025-10-01T13:45:41"), "2025-10-01");
}

#[test]
fn test_day_of_malformed_is_truncated_not_rejected() {
    assert_eq!(day_of("yesterday at noon"), "yesterday ");
    assert_eq!(day_of("2025"), "2025");
    assert_eq!(day_of(""), "");
}

#[test]
fn test_day_of_multibyte_does_not_panic() {
    assert_eq!(day_of("２０２５年１０月１日の午後"), "２０２５年１０月１日");
}

#[test]
fn test_parse_space_separated() {
    let parsed = parse_instant("2025-10-01 13:45:41.632457").unwrap();
    assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2025, 10, 1).unwrap());
    assert_eq!(parsed.hour(), 13);
    assert_eq!(parsed.nanosecond(), 632_457_000);
}

#[test]
fn test_parse_t_separated_without_fraction() {
    assert_eq!(
        parse_instant("2025-10-01T10:00:00"),
        Some(at(2025, 10, 1, 10, 0, 0))
    );
    assert_eq!(
        parse_instant("2025-10-01 10:00:00"),
        Some(at(2025, 10, 1, 10, 0, 0))
    );
}

#[test]
fn test_parse_minutes_only() {
    assert_eq!(parse_instant("2025-10-01 10:30"), Some(at(2025, 10, 1, 10, 30, 0)));
}

#[test]
fn test_parse_date_only() {
    assert_eq!(parse_instant("2025-10-01"), Some(at(2025, 10, 1, 0, 0, 0)));
}

#[test]
fn test_parse_rfc3339_with_offset() {
    let parsed = parse_instant("2025-10-01T10:00:00+00:00").unwrap();
    let expected = DateTime::parse_from_rfc3339("2025-10-01T10:00:00+00:00")
        .unwrap()
        .with_timezone(&Local)
        .naive_local();
    assert_eq!(parsed, expected);
}

#[test]
fn test_parse_garbage() {
    assert_eq!(parse_instant("not a date"), None);
    assert_eq!(parse_instant(""), None);
    assert_eq!(parse_instant("2025-13-40 10:00:00"), None);
}

#[test]
fn test_policy_parse() {
    assert_eq!("pass_through".parse::<TimestampPolicy>(), Ok(TimestampPolicy::PassThrough));
    assert_eq!("coerce".parse::<TimestampPolicy>(), Ok(TimestampPolicy::Coerce));
    assert_eq!("reject".parse::<TimestampPolicy>(), Ok(TimestampPolicy::Reject));
    assert_eq!(
        "drop".parse::<TimestampPolicy>(),
        Err(Error::UnknownTimestampPolicy("drop".to_string()))
    );
}

#[test]
fn test_coerce_uses_date_prefix() {
    match TimestampPolicy::Coerce.resolve("2025-10-01 ??:??") {
        Resolved::Parsed(dt) => assert_eq!(dt, at(2025, 10, 1, 0, 0, 0)),
        _ => panic!("expected coerced timestamp"),
    }
    assert!(matches!(
        TimestampPolicy::Coerce.resolve("garbage"),
        Resolved::Unparsed
    ));
}

#[test]
fn test_reject_and_pass_through() {
    assert!(matches!(
        TimestampPolicy::Reject.resolve("garbage"),
        Resolved::Rejected
    ));
    assert!(matches!(
        TimestampPolicy::PassThrough.resolve("garbage"),
        Resolved::Unparsed
    ));
    assert!(matches!(
        TimestampPolicy::Reject.resolve("2025-10-01 10:00:00"),
        Resolved::Parsed(_)
    ));
}
