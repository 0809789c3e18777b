//! HTTP date handling module
//!
//! IMF-fixdate formatting and parsing (RFC 7231, section 7.1.1.1) on
//! top of `chrono`, plus the If-Modified-Since comparison used for
//! conditional GET.

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};

/// Format a timestamp as an IMF-fixdate string,
/// e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
pub fn format_http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// Parse an HTTP date header value.
///
/// IMF-fixdate is RFC 2822-compatible, including the obsolete `GMT`
/// zone form clients still send.
pub fn parse_http_date(value: &str) -> Option<SystemTime> {
    DateTime::parse_from_rfc2822(value)
        .ok()
        .map(SystemTime::from)
}

/// Whether a file with `mtime` is unchanged for a client that sent the
/// given If-Modified-Since value.
///
/// Compared at second precision, the granularity the header is
/// transmitted with. An unparsable header means "send the full file".
pub fn not_modified_since(if_modified_since: &str, mtime: SystemTime) -> bool {
    let Some(header_time) = parse_http_date(if_modified_since) else {
        return false;
    };

    whole_seconds(mtime) <= whole_seconds(header_time)
}

fn whole_seconds(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const NOV_6_1994: &str = "Sun, 06 Nov 1994 08:49:37 GMT";

    #[test]
    fn test_format_epoch() {
        let time = UNIX_EPOCH + Duration::from_secs(10);
        assert_eq!(format_http_date(time), "Thu, 01 Jan 1970 00:00:10 GMT");
    }

    #[test]
    fn test_parse_fixdate() {
        let parsed = parse_http_date(NOV_6_1994).unwrap();
        let secs = parsed.duration_since(UNIX_EPOCH).unwrap().as_secs();
        assert_eq!(secs, 784_111_777);
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_http_date("not a date").is_none());
        assert!(parse_http_date("").is_none());
    }

    #[test]
    fn test_format_parse_round_trip() {
        let time = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let formatted = format_http_date(time);
        assert_eq!(parse_http_date(&formatted), Some(time));
    }

    #[test]
    fn test_not_modified_since() {
        let header_secs = 784_111_777;
        let same = UNIX_EPOCH + Duration::from_secs(header_secs);
        let older = UNIX_EPOCH + Duration::from_secs(header_secs - 60);
        let newer = UNIX_EPOCH + Duration::from_secs(header_secs + 60);

        assert!(not_modified_since(NOV_6_1994, same));
        assert!(not_modified_since(NOV_6_1994, older));
        assert!(!not_modified_since(NOV_6_1994, newer));
    }

    #[test]
    fn test_not_modified_since_ignores_subseconds() {
        let header_secs = 784_111_777;
        let just_after = UNIX_EPOCH + Duration::from_secs(header_secs) + Duration::from_millis(500);
        assert!(not_modified_since(NOV_6_1994, just_after));
    }

    #[test]
    fn test_not_modified_since_bad_header() {
        assert!(!not_modified_since("yesterday-ish", UNIX_EPOCH));
    }
}
