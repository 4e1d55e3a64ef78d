/**
 * Wall-clock time accounting for an exam. The clock is passed in so that tests can
 * control it.
 */
use chrono::{DateTime, Utc};


/// A source of the current time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}


/// The real clock.
pub struct SystemClock;


impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}


/// A fixed start instant and a total number of seconds allowed from then.
#[derive(Debug, Clone, Copy)]
pub struct TimeBudget {
    pub start: DateTime<Utc>,
    pub limit: u64,
}


impl TimeBudget {
    pub fn new(start: DateTime<Utc>, limit: u64) -> Self {
        TimeBudget { start, limit }
    }

    pub fn remaining(&self, now: DateTime<Utc>) -> u64 {
        remaining(self.start, self.limit, now)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.remaining(now) == 0
    }

    /// Whole seconds since the start, or 0 if `now` is before the start.
    pub fn elapsed(&self, now: DateTime<Utc>) -> u64 {
        elapsed(self.start, now)
    }
}


/// Seconds left of `limit` at `now`, never negative and never more than `limit`.
pub fn remaining(start: DateTime<Utc>, limit: u64, now: DateTime<Utc>) -> u64 {
    limit.saturating_sub(elapsed(start, now))
}


fn elapsed(start: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let seconds = now.signed_duration_since(start).num_seconds();
    if seconds > 0 { seconds as u64 } else { 0 }
}


/// Render a number of seconds as "MM:SS".
pub fn format_mmss(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}


#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{Duration, TimeZone};

    #[test]
    fn remaining_counts_down_and_floors_at_zero() {
        let start = epoch();
        assert_eq!(remaining(start, 60, start), 60);
        assert_eq!(remaining(start, 60, at(1)), 59);
        assert_eq!(remaining(start, 60, at(59)), 1);
        assert_eq!(remaining(start, 60, at(60)), 0);
        assert_eq!(remaining(start, 60, at(3600)), 0);
    }

    #[test]
    fn remaining_is_monotonic_and_capped() {
        let start = epoch();
        let mut previous = 90;
        for ms in (-5000..100_000).step_by(250) {
            let now = start + Duration::milliseconds(ms);
            let left = remaining(start, 90, now);
            assert!(left <= 90);
            assert!(left <= previous, "remaining went up at {}ms", ms);
            previous = left;
        }
        assert_eq!(previous, 0);
    }

    #[test]
    fn partial_seconds_do_not_count() {
        let start = epoch();
        let now = start + Duration::milliseconds(1999);
        assert_eq!(remaining(start, 10, now), 9);
    }

    #[test]
    fn remaining_is_idempotent() {
        let budget = TimeBudget::new(epoch(), 60);
        let now = at(17);
        assert_eq!(budget.remaining(now), budget.remaining(now));
        assert_eq!(budget.remaining(now), 43);
    }

    #[test]
    fn budget_reports_expiry() {
        let budget = TimeBudget::new(epoch(), 30);
        assert!(!budget.is_expired(at(29)));
        assert!(budget.is_expired(at(30)));
        assert_eq!(budget.elapsed(at(45)), 45);
        assert_eq!(budget.elapsed(at(-5)), 0);
    }

    #[test]
    fn formats_as_minutes_and_seconds() {
        assert_eq!(format_mmss(0), "00:00");
        assert_eq!(format_mmss(59), "00:59");
        assert_eq!(format_mmss(61), "01:01");
        assert_eq!(format_mmss(135 * 60), "135:00");
    }

    fn epoch() -> DateTime<Utc> {
        Utc.timestamp_opt(1_000_000, 0).unwrap()
    }

    fn at(seconds: i64) -> DateTime<Utc> {
        epoch() + Duration::seconds(seconds)
    }
}
