//! Free/busy query results.
//!
//! Free/busy data is only ever read from the service. Calendars and groups
//! whose computation failed are reported in separate error maps rather than
//! next to their (absent) data.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};

use crate::error::{CalendarError, CalendarResult};

/// A span during which a calendar is busy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeRange {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl TimeRange {
    pub fn new(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> CalendarResult<Self> {
        if end < start {
            return Err(CalendarError::validation(
                "end",
                format!("busy range ends at {} before it starts at {}", end, start),
            ));
        }
        Ok(Self { start, end })
    }
}

/// Why free/busy information for one calendar or group is missing.
///
/// Known reasons include `groupTooBig`, `tooManyCalendarsRequested`,
/// `notFound` and `internalError`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FreeBusyError {
    pub domain: String,
    pub reason: String,
}

impl FreeBusyError {
    pub fn new(domain: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            reason: reason.into(),
        }
    }
}

/// Free/busy information for calendars and groups over one interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreeBusy {
    pub time_min: DateTime<FixedOffset>,
    pub time_max: DateTime<FixedOffset>,
    /// Group name to the calendar ids it expands to.
    pub groups: BTreeMap<String, Vec<String>>,
    /// Calendar id to its busy ranges.
    pub calendars: BTreeMap<String, Vec<TimeRange>>,
    pub groups_errors: BTreeMap<String, Vec<FreeBusyError>>,
    pub calendars_errors: BTreeMap<String, Vec<FreeBusyError>>,
}

impl FreeBusy {
    pub fn new(time_min: DateTime<FixedOffset>, time_max: DateTime<FixedOffset>) -> Self {
        Self {
            time_min,
            time_max,
            groups: BTreeMap::new(),
            calendars: BTreeMap::new(),
            groups_errors: BTreeMap::new(),
            calendars_errors: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_calendar(mut self, id: impl Into<String>, busy: Vec<TimeRange>) -> Self {
        self.calendars.insert(id.into(), busy);
        self
    }

    #[must_use]
    pub fn with_group(mut self, name: impl Into<String>, calendars: Vec<String>) -> Self {
        self.groups.insert(name.into(), calendars);
        self
    }

    #[must_use]
    pub fn with_calendar_errors(mut self, id: impl Into<String>, errors: Vec<FreeBusyError>) -> Self {
        self.calendars_errors.insert(id.into(), errors);
        self
    }

    #[must_use]
    pub fn with_group_errors(mut self, name: impl Into<String>, errors: Vec<FreeBusyError>) -> Self {
        self.groups_errors.insert(name.into(), errors);
        self
    }

    pub fn has_errors(&self) -> bool {
        !self.calendars_errors.is_empty() || !self.groups_errors.is_empty()
    }

    /// The busy ranges of the single calendar that was queried.
    ///
    /// Fails when no calendar produced data, or when the result covers more
    /// than one calendar; use [`Self::calendars`] then.
    pub fn busy(&self) -> CalendarResult<&[TimeRange]> {
        let mut calendars = self.calendars.values();
        match (calendars.next(), calendars.next()) {
            (None, _) => Err(CalendarError::validation(
                "calendars",
                "no free/busy information was received; check the error maps",
            )),
            (Some(busy), None) if self.calendars_errors.is_empty() => Ok(busy),
            _ => Err(CalendarError::validation(
                "calendars",
                "more than one calendar was queried; read them by id",
            )),
        }
    }
}
