use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, Utc};

/// Default lower bound for activity listings, in whole weeks.
///
/// The window covers the current week (starting Monday 00:00 UTC) plus the `weeks - 1`
/// preceding ones. It only fills in `after` when the caller did not send one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityWindow {
    weeks: u32,
}

impl ActivityWindow {
    /// `None` for a zero-width window.
    pub fn new(weeks: u32) -> Option<Self> {
        (weeks > 0).then_some(Self { weeks })
    }

    pub fn weeks(&self) -> u32 {
        self.weeks
    }

    /// Clamps to the earliest representable date when the window reaches past it.
    pub fn start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let today = now.date_naive();
        let back = u64::from(today.weekday().num_days_from_monday())
            + u64::from(self.weeks - 1) * 7;
        today
            .checked_sub_days(Days::new(back))
            .unwrap_or(NaiveDate::MIN)
            .and_time(NaiveTime::MIN)
            .and_utc()
    }

    pub fn apply(&self, query: &mut Vec<(String, String)>, now: DateTime<Utc>) {
        if query.iter().any(|(key, _)| key == "after") {
            return;
        }
        query.push(("after".to_string(), self.start(now).timestamp().to_string()));
    }
}
