use crate::errors::StoreResult;
use chrono::{DateTime, SecondsFormat, Utc};

#[inline]
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Renders an instant as RFC 3339 in UTC, e.g. `2019-08-15T12:30:25.895Z`.
///
/// Whole milliseconds always print three fraction digits. Finer instants keep
/// their full precision so that parsing the text gives back the same instant.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    let format = if ts.timestamp_subsec_nanos() % 1_000_000 == 0 {
        SecondsFormat::Millis
    } else {
        SecondsFormat::AutoSi
    };
    ts.to_rfc3339_opts(format, true)
}

pub fn parse_timestamp(text: &str) -> StoreResult<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(text).map_err(|e| {
        log::error!("Invalid timestamp {}: {}", text, e);
        e
    })?;
    Ok(parsed.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_timestamp_uses_millis_and_z() {
        let ts = Utc.with_ymd_and_hms(2019, 8, 15, 12, 30, 25).unwrap()
            + chrono::Duration::milliseconds(895);
        assert_eq!(format_timestamp(&ts), "2019-08-15T12:30:25.895Z");
    }

    #[test]
    fn test_parse_timestamp_round_trip() {
        let ts = parse_timestamp("2019-08-15T12:30:25.895Z").unwrap();
        assert_eq!(format_timestamp(&ts), "2019-08-15T12:30:25.895Z");
    }

    #[test]
    fn test_format_timestamp_keeps_sub_millisecond_precision() {
        let ts = Utc.with_ymd_and_hms(2019, 8, 15, 12, 30, 25).unwrap()
            + chrono::Duration::microseconds(895_123);
        let text = format_timestamp(&ts);
        assert_eq!(text, "2019-08-15T12:30:25.895123Z");
        assert_eq!(parse_timestamp(&text).unwrap(), ts);

        let now = current_timestamp();
        assert_eq!(parse_timestamp(&format_timestamp(&now)).unwrap(), now);
    }

    #[test]
    fn test_parse_timestamp_with_offset_normalises_to_utc() {
        let ts = parse_timestamp("2019-08-15T14:30:25.000+02:00").unwrap();
        assert_eq!(format_timestamp(&ts), "2019-08-15T12:30:25.000Z");
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        let err = parse_timestamp("yesterday").unwrap_err();
        assert_eq!(err.kind(), &crate::errors::ErrorKind::EncodingError);
    }

    #[test]
    fn test_current_timestamp_is_recent() {
        let before = Utc::now();
        let now = current_timestamp();
        assert!(now >= before);
    }
}
