//! Conversions between stored unix seconds and RFC 3339 strings.

use chrono::{DateTime, Utc};

pub fn now() -> i64 {
    Utc::now().timestamp()
}

/// Whole seconds, rounded up: a stored expiry never precedes the instant given.
pub fn parse_rfc3339(value: &str) -> Result<i64, chrono::ParseError> {
    let dt = DateTime::parse_from_rfc3339(value.trim())?;
    let secs = dt.timestamp();
    Ok(if dt.timestamp_subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    })
}

pub fn to_rfc3339(secs: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp(secs, 0).map(|dt| dt.to_rfc3339())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_offsets_to_utc_seconds() {
        assert_eq!(parse_rfc3339("1970-01-01T00:00:10Z").unwrap(), 10);
        assert_eq!(parse_rfc3339("1970-01-01T01:00:00+01:00").unwrap(), 0);
        assert!(parse_rfc3339("tomorrow").is_err());
    }

    #[test]
    fn fractional_expiry_rounds_up() {
        let whole = parse_rfc3339("2030-01-01T00:00:00Z").unwrap();
        assert_eq!(whole, 1_893_456_000);
        assert_eq!(parse_rfc3339("2030-01-01T00:00:00.900Z").unwrap(), whole + 1);
        assert_eq!(parse_rfc3339("2030-01-01T00:00:00.000000001Z").unwrap(), whole + 1);
        assert_eq!(parse_rfc3339("1969-12-31T23:59:59.500Z").unwrap(), 0);
    }

    #[test]
    fn fractional_expiry_is_not_expired_early() {
        let link = crate::models::LinkRecord {
            id: 1,
            slug: "soon".to_string(),
            original_url: "https://example.com/".to_string(),
            created_at: 0,
            clicks: 0,
            expires_at: Some(parse_rfc3339("2030-01-01T00:00:00.900Z").unwrap()),
        };
        assert!(!link.is_expired_at(1_893_456_000));
        assert!(link.is_expired_at(1_893_456_001));
    }

    #[test]
    fn formats_seconds() {
        assert_eq!(to_rfc3339(0).as_deref(), Some("1970-01-01T00:00:00+00:00"));
    }
}
