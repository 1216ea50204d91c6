//! Recurrence evaluation for stamp events.
//!
//! Answers one question: does an event with a given rule, anchored at its
//! start date, occur on a given calendar day? Everything is computed at day
//! granularity from whole-day deltas; time of day never matters here.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// How an event repeats, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceRule {
    Once,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    EveryOtherDay,
    EveryOtherWeek,
    EveryOtherMonth,
    /// Every Monday through Friday.
    Weekday,
    /// Every Saturday and Sunday.
    Weekend,
}

impl RecurrenceRule {
    /// Whether an event anchored at `anchor` occurs on `query`.
    ///
    /// Total over valid dates and side-effect free. Recurrence never looks
    /// backward: any `query` before `anchor` is `false` regardless of rule.
    pub fn occurs(&self, anchor: NaiveDate, query: NaiveDate) -> bool {
        if query < anchor {
            return false;
        }

        let delta_days = (query - anchor).num_days();

        match self {
            RecurrenceRule::Once => delta_days == 0,
            RecurrenceRule::Daily => true,
            RecurrenceRule::Weekly => query.weekday() == anchor.weekday(),
            RecurrenceRule::Monthly => query.day() == anchor.day(),
            RecurrenceRule::Yearly => {
                query.month() == anchor.month() && query.day() == anchor.day()
            }
            RecurrenceRule::EveryOtherDay => delta_days % 2 == 0,
            RecurrenceRule::EveryOtherWeek => {
                (delta_days / 7) % 2 == 0 && query.weekday() == anchor.weekday()
            }
            RecurrenceRule::EveryOtherMonth => {
                months_between(anchor, query) % 2 == 0 && query.day() == anchor.day()
            }
            RecurrenceRule::Weekday => !is_weekend(query),
            RecurrenceRule::Weekend => is_weekend(query),
        }
    }
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), chrono::Weekday::Sat | chrono::Weekday::Sun)
}

/// Whole-month delta, ignoring day-of-month.
fn months_between(anchor: NaiveDate, query: NaiveDate) -> i32 {
    (query.year() - anchor.year()) * 12 + (query.month() as i32 - anchor.month() as i32)
}
