use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Timelike, Utc};
use serde::Serialize;
use utoipa::ToSchema;

pub const STEP: Duration = Duration::minutes(1);

/// A UTC calendar date with start and end time-of-day on that date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct TimeWindow {
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeWindow {
    pub fn new(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            date,
            start: truncate_to_minute(start),
            end: truncate_to_minute(end),
        }
    }

    /// Window anchored on the UTC date of `start`. An `end` on a later UTC
    /// date keeps only its time-of-day.
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self::new(start.date_naive(), start.time(), end.time())
    }

    pub fn start_utc(&self) -> DateTime<Utc> {
        self.date.and_time(self.start).and_utc()
    }

    pub fn end_utc(&self) -> DateTime<Utc> {
        self.date.and_time(self.end).and_utc()
    }

    pub fn step_count(&self) -> usize {
        let minutes = (self.end_utc() - self.start_utc()).num_minutes();
        usize::try_from(minutes).unwrap_or(0)
    }

    /// One instant per minute starting at the window start, end excluded.
    pub fn instants(&self) -> Vec<DateTime<Utc>> {
        let start = self.start_utc();
        (0..self.step_count())
            .map(|i| start + STEP * i as i32)
            .collect()
    }
}

fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    time.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(time)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(start: &str, end: &str) -> TimeWindow {
        TimeWindow::new(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveTime::parse_from_str(start, "%H:%M:%S").unwrap(),
            NaiveTime::parse_from_str(end, "%H:%M:%S").unwrap(),
        )
    }

    #[test]
    fn equal_start_and_end_is_empty() {
        let w = window("10:15:00", "10:15:00");
        assert_eq!(w.step_count(), 0);
        assert!(w.instants().is_empty());
    }

    #[test]
    fn negative_span_is_empty() {
        assert!(window("10:15:00", "09:00:00").instants().is_empty());
    }

    #[test]
    fn five_minutes_yield_five_instants() {
        let w = window("10:15:00", "10:20:00");
        let instants = w.instants();
        assert_eq!(instants.len(), 5);
        assert_eq!(instants[0], w.start_utc());
        for pair in instants.windows(2) {
            assert_eq!(pair[1] - pair[0], STEP);
        }
        assert_eq!(instants[4].format("%H:%M:%S").to_string(), "10:19:00");
    }

    #[test]
    fn seconds_are_truncated() {
        let w = window("10:15:42", "10:17:05");
        assert_eq!(w.start, NaiveTime::from_hms_opt(10, 15, 0).unwrap());
        assert_eq!(w.step_count(), 2);
    }

    #[test]
    fn between_keeps_start_date() {
        let start = "2024-03-01T23:58:00Z".parse::<DateTime<Utc>>().unwrap();
        let end = "2024-03-02T00:03:00Z".parse::<DateTime<Utc>>().unwrap();
        let w = TimeWindow::between(start, end);
        assert_eq!(w.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(w.step_count(), 0);
    }
}
