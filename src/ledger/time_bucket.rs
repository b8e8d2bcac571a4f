//! Day bucketing for daily-login accounting
//!
//! Buckets are "YYYY-MM-DD" strings in UTC. Lexicographic order matches
//! calendar order, so comparing buckets compares dates.

use chrono::{DateTime, Datelike, Utc};

/// Compute the UTC day bucket string from a Unix timestamp in milliseconds.
///
/// Returns a string in format "YYYY-MM-DD".
pub fn day_bucket(timestamp_ms: i64) -> String {
    let dt = DateTime::from_timestamp_millis(timestamp_ms).unwrap_or_else(Utc::now);
    format!("{:04}-{:02}-{:02}", dt.year(), dt.month(), dt.day())
}

/// Get the current day bucket.
pub fn current_day_bucket() -> String {
    day_bucket(Utc::now().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_bucket() {
        // 2023-12-28 12:34:56 UTC
        let ts = 1703766896000i64;
        assert_eq!(day_bucket(ts), "2023-12-28");
    }

    #[test]
    fn test_day_bucket_ordering_matches_dates() {
        let dec_28 = day_bucket(1703766896000);
        let dec_29 = day_bucket(1703853296000);
        assert!(dec_28 < dec_29);
    }
}
