//! Stamp event records.
//!
//! An event is a stamp the user places on their calendar: a symbol, two
//! color tokens, optional media, and a recurrence rule fixed at creation.
//! The core never mutates an event in place; updates replace the whole
//! record keyed by id.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreResult, ErrorKind};
use crate::recurrence::RecurrenceRule;

/// A calendar stamp event.
///
/// `start` and `end` are instants but carry day resolution for all
/// recurrence purposes; they are truncated to calendar days before any
/// occurrence math.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub rule: RecurrenceRule,

    // Display attributes
    pub symbol: String,
    pub color: String,
    pub secondary_color: String,
    pub main_image: Option<String>,
    pub side_image: Option<String>,

    /// The user's reaction to this event ("done", an emoji, ...).
    /// The only field the UI changes after creation.
    pub reaction: Option<String>,
}

impl Event {
    /// Create a new event with a fresh id. Fails with a validation error
    /// unless `start < end`.
    pub fn new(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        rule: RecurrenceRule,
        symbol: impl Into<String>,
        color: impl Into<String>,
        secondary_color: impl Into<String>,
    ) -> CoreResult<Self> {
        let event = Event {
            id: Uuid::new_v4(),
            start,
            end,
            rule,
            symbol: symbol.into(),
            color: color.into(),
            secondary_color: secondary_color.into(),
            main_image: None,
            side_image: None,
            reaction: None,
        };
        event.validate()?;
        Ok(event)
    }

    /// Check the `start < end` invariant. Called again before any upsert,
    /// since the UI constructs events field by field.
    pub fn validate(&self) -> CoreResult<()> {
        if self.start >= self.end {
            return Err(ErrorKind::validation("event must end after it starts"));
        }
        Ok(())
    }

    /// The anchor day recurrence is computed from.
    pub fn anchor_day(&self) -> NaiveDate {
        self.start.date_naive()
    }

    /// Whether this event occurs on the given calendar day.
    pub fn occurs_on(&self, day: NaiveDate) -> bool {
        self.rule.occurs(self.anchor_day(), day)
    }

    /// Whole-record replacement with a new reaction tag.
    pub fn with_reaction(mut self, reaction: Option<String>) -> Self {
        self.reaction = reaction;
        self
    }
}

/// All events from `events` that occur on `day`.
pub fn events_on(events: &[Event], day: NaiveDate) -> Vec<Event> {
    events.iter().filter(|e| e.occurs_on(day)).cloned().collect()
}
