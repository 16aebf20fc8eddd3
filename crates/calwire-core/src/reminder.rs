//! Event reminders.

use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveTime};

use crate::error::{CalendarError, CalendarResult};
use crate::time::EventTime;

/// Default lead time for email reminders, in minutes.
pub const DEFAULT_EMAIL_MINUTES: u32 = 60;
/// Default lead time for popup reminders, in minutes.
pub const DEFAULT_POPUP_MINUTES: u32 = 30;

/// How a reminder is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReminderMethod {
    Email,
    Popup,
}

impl ReminderMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Popup => "popup",
        }
    }
}

impl fmt::Display for ReminderMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReminderMethod {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(Self::Email),
            "popup" => Ok(Self::Popup),
            other => Err(CalendarError::validation(
                "method",
                format!("must be 'email' or 'popup', got '{}'", other),
            )),
        }
    }
}

/// When a reminder fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReminderTiming {
    /// A fixed lead time before the event starts.
    Relative { minutes_before_start: u32 },
    /// A wall-clock time a number of days before the start date.
    Absolute { days_before: u32, at: NaiveTime },
}

/// A single reminder override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Reminder {
    pub method: ReminderMethod,
    pub timing: ReminderTiming,
}

impl Reminder {
    /// Creates a reminder from either a lead time or a `days_before`/`at`
    /// pair. Exactly one of the two forms must be given.
    pub fn new(
        method: ReminderMethod,
        minutes_before_start: Option<u32>,
        days_before: Option<u32>,
        at: Option<NaiveTime>,
    ) -> CalendarResult<Self> {
        let timing = match (minutes_before_start, days_before, at) {
            (Some(minutes), None, None) => ReminderTiming::Relative {
                minutes_before_start: minutes,
            },
            (None, Some(days_before), Some(at)) => ReminderTiming::Absolute { days_before, at },
            (Some(_), _, _) => {
                return Err(CalendarError::validation(
                    "minutes_before_start",
                    "cannot be combined with days_before/at",
                ));
            }
            (None, None, None) => {
                return Err(CalendarError::validation(
                    "minutes_before_start",
                    "either minutes_before_start or days_before with at is required",
                ));
            }
            (None, _, _) => {
                return Err(CalendarError::validation(
                    "days_before",
                    "days_before and at must be given together",
                ));
            }
        };
        Ok(Self { method, timing })
    }

    pub fn relative(method: ReminderMethod, minutes_before_start: u32) -> Self {
        Self {
            method,
            timing: ReminderTiming::Relative {
                minutes_before_start,
            },
        }
    }

    pub fn absolute(method: ReminderMethod, days_before: u32, at: NaiveTime) -> Self {
        Self {
            method,
            timing: ReminderTiming::Absolute { days_before, at },
        }
    }

    pub fn email(minutes_before_start: u32) -> Self {
        Self::relative(ReminderMethod::Email, minutes_before_start)
    }

    pub fn popup(minutes_before_start: u32) -> Self {
        Self::relative(ReminderMethod::Popup, minutes_before_start)
    }

    /// The lead time, for relative reminders.
    pub fn minutes_before_start(&self) -> Option<u32> {
        match self.timing {
            ReminderTiming::Relative {
                minutes_before_start,
            } => Some(minutes_before_start),
            ReminderTiming::Absolute { .. } => None,
        }
    }

    /// Converts an absolute reminder into a relative one for an event
    /// starting at `start`. Relative reminders are returned unchanged.
    ///
    /// The fire time is computed on the start's own wall clock; all-day
    /// starts count from midnight.
    pub fn to_relative(&self, start: &EventTime) -> CalendarResult<Self> {
        let ReminderTiming::Absolute { days_before, at } = self.timing else {
            return Ok(*self);
        };
        let start_local = start.naive_local();
        let fire_date = start_local
            .date()
            .checked_sub_days(Days::new(u64::from(days_before)))
            .ok_or_else(|| {
                CalendarError::validation(
                    "days_before",
                    format!("{} day(s) before {} is out of range", days_before, start_local.date()),
                )
            })?;
        let minutes = (start_local - fire_date.and_time(at)).num_minutes();
        if minutes < 0 {
            return Err(CalendarError::validation(
                "at",
                format!(
                    "reminder at {} {} day(s) before fires after the event starts",
                    at, days_before
                ),
            ));
        }
        let minutes = u32::try_from(minutes).map_err(|_| {
            CalendarError::validation(
                "days_before",
                format!("lead time of {} minutes is too large", minutes),
            )
        })?;
        Ok(Self::relative(self.method, minutes))
    }
}
