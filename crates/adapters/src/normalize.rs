//! Helpers shared by the provider adapters

use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime, Time, format_description};

/// Parse a provider timestamp into `OffsetDateTime`.
///
/// Providers disagree on precision: Ghost and Hashnode send full RFC 3339
/// timestamps, Notion date properties may carry a bare `YYYY-MM-DD`. A
/// date-only value is taken as midnight UTC. Unparseable input yields
/// `None`, which downstream treats as a draft.
pub fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(ts) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        return Some(ts);
    }

    let date_format = format_description::parse("[year]-[month]-[day]").ok()?;
    let date = Date::parse(trimmed, &date_format).ok()?;
    Some(date.with_time(Time::MIDNIGHT).assume_utc())
}

/// Collapse an optional provider string field into the empty-string default
/// the `Post` model promises
pub fn text_or_empty(value: Option<String>) -> String {
    value.unwrap_or_default()
}

/// Drop blank optional strings so `None` means "provider has no value"
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rfc3339_timestamp() {
        let ts = parse_timestamp("2024-02-01T12:30:00Z").unwrap();
        assert_eq!(ts.year(), 2024);
        assert_eq!(u8::from(ts.month()), 2);
    }

    #[test]
    fn test_parse_date_only_as_midnight_utc() {
        let ts = parse_timestamp("2024-03-15").unwrap();
        assert_eq!(ts.hour(), 0);
        assert_eq!(ts.day(), 15);
    }

    #[test]
    fn test_unparseable_timestamp_is_none() {
        assert!(parse_timestamp("next tuesday").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  ".to_string())), None);
        assert_eq!(non_blank(Some("x".to_string())), Some("x".to_string()));
        assert_eq!(non_blank(None), None);
    }
}
