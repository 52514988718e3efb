use chrono::{DateTime, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

/// Caller-supplied clock context for time-aware replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeContext {
    /// e.g. "2:45 PM"
    pub current_time: String,
    /// e.g. "Monday, December 23, 2025"
    pub current_date: String,
    /// morning / afternoon / evening / night
    pub time_of_day: String,
}

impl TimeContext {
    /// Build the context from a zoned timestamp.
    pub fn from_datetime<Tz: TimeZone>(at: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        let time = at.format("%I:%M %p").to_string();
        Self {
            current_time: time.trim_start_matches('0').to_string(),
            current_date: at.format("%A, %B %d, %Y").to_string(),
            time_of_day: time_of_day(at.hour()).to_string(),
        }
    }
}

/// Bucket an hour of day (0-23).
pub fn time_of_day(hour: u32) -> &'static str {
    match hour {
        5..=11 => "morning",
        12..=16 => "afternoon",
        17..=20 => "evening",
        _ => "night",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn hour_buckets() {
        assert_eq!(time_of_day(4), "night");
        assert_eq!(time_of_day(5), "morning");
        assert_eq!(time_of_day(12), "afternoon");
        assert_eq!(time_of_day(17), "evening");
        assert_eq!(time_of_day(21), "night");
    }

    #[test]
    fn formats_without_leading_zero() {
        let at = Utc.with_ymd_and_hms(2025, 12, 23, 14, 45, 0).unwrap();
        let ctx = TimeContext::from_datetime(&at);
        assert_eq!(ctx.current_time, "2:45 PM");
        assert_eq!(ctx.current_date, "Tuesday, December 23, 2025");
        assert_eq!(ctx.time_of_day, "afternoon");
    }

    #[test]
    fn respects_offset() {
        let manila = FixedOffset::east_opt(8 * 3600).unwrap();
        let at = Utc
            .with_ymd_and_hms(2025, 12, 23, 14, 0, 0)
            .unwrap()
            .with_timezone(&manila);
        assert_eq!(TimeContext::from_datetime(&at).time_of_day, "night");
    }
}
