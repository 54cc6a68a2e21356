//! Feed timestamp parsing.

use chrono::{DateTime, Utc};
use tracing::warn;

/// Format used by the classic timeline API, e.g.
/// `"Thu Aug 27 07:14:00 +0000 2026"`.
const CLASSIC_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Parse a feed item's `created_at` string into a comparable UTC instant.
///
/// Accepts the classic timeline format and RFC 3339. Returns `None` (with
/// a warning) for anything else; callers skip such items.
pub fn parse_created_at(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_str(raw, CLASSIC_FORMAT) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    warn!(raw, "Unparseable feed timestamp");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_classic_format() {
        let ts = parse_created_at("Thu Aug 27 07:14:00 +0000 2026").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2026, 8, 27, 7, 14, 0).unwrap());
    }

    #[test]
    fn test_parse_classic_format_with_offset() {
        let ts = parse_created_at("Thu Aug 27 09:14:00 +0200 2026").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2026, 8, 27, 7, 14, 0).unwrap());
    }

    #[test]
    fn test_parse_rfc3339() {
        let ts = parse_created_at("2026-08-27T07:14:00Z").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2026, 8, 27, 7, 14, 0).unwrap());
    }

    #[test]
    fn test_parse_garbage_is_none() {
        assert!(parse_created_at("yesterday-ish").is_none());
        assert!(parse_created_at("").is_none());
    }

    #[test]
    fn test_parsed_values_are_ordered() {
        let older = parse_created_at("Thu Aug 27 07:14:00 +0000 2026").unwrap();
        let newer = parse_created_at("Thu Aug 27 07:15:00 +0000 2026").unwrap();
        assert!(newer > older);
    }
}
