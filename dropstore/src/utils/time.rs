use std::time::SystemTime;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Converts a filesystem timestamp into milliseconds since the Unix epoch.
///
/// This is the raw form kept in the persisted metadata cache.
pub fn system_time_to_millis(time: SystemTime) -> i64 {
    DateTime::<Utc>::from(time).timestamp_millis()
}

/// Rebuilds a UTC timestamp from its raw millisecond form.
/// Returns `None` for values outside chrono's representable range.
pub fn datetime_from_millis(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
}

/// The first instant of `day` in UTC.
pub fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

/// Milliseconds since the epoch for the current instant.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn test_millis_roundtrip() {
        let time = UNIX_EPOCH + Duration::from_millis(1_700_000_000_123);
        let millis = system_time_to_millis(time);
        assert_eq!(millis, 1_700_000_000_123);
        let parsed = datetime_from_millis(millis).unwrap();
        assert_eq!(parsed.timestamp_millis(), millis);
    }

    #[test]
    fn test_start_of_day() {
        let day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(start_of_day(day).to_rfc3339(), "2024-02-29T00:00:00+00:00");
    }
}
