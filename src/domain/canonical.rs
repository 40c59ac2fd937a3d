//! Date rendering shared by the command model and tests.

use chrono::{Local, NaiveDateTime, Utc};

const TRADE_DATE_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Renders wall-clock fields as `yyyy/MM/dd HH:mm:ss`, zero padded.
pub fn format_timestamp(instant: NaiveDateTime) -> String {
    instant.format(TRADE_DATE_FORMAT).to_string()
}

/// The current local time in trade-date format.
pub fn now_timestamp() -> String {
    format_timestamp(Local::now().naive_local())
}

/// Whole seconds since the Unix epoch.
pub fn unix_timestamp() -> i64 {
    Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(at(2024, 6, 15, 14, 30, 45)), "2024/06/15 14:30:45");
    }

    #[test]
    fn test_format_pads_single_digits() {
        assert_eq!(format_timestamp(at(2024, 1, 5, 9, 5, 3)), "2024/01/05 09:05:03");
        assert_eq!(format_timestamp(at(2024, 12, 31, 0, 0, 0)), "2024/12/31 00:00:00");
        assert_eq!(format_timestamp(at(2024, 12, 31, 23, 59, 59)), "2024/12/31 23:59:59");
    }

    #[test]
    fn test_now_timestamp_shape() {
        let now = now_timestamp();
        assert!(NaiveDateTime::parse_from_str(&now, TRADE_DATE_FORMAT).is_ok());
    }

    #[test]
    fn test_unix_timestamp_is_recent() {
        // 2023-11-14T22:13:20Z
        assert!(unix_timestamp() > 1_700_000_000);
    }
}
