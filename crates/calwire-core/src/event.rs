//! Calendar events.
//!
//! An [`Event`] is only obtainable through [`EventBuilder::build`], which
//! enforces the shape invariants: start and end are both dates or both
//! instants, instants are zoned, and reminder overrides respect the cap and
//! never coexist with calendar-default reminders.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use serde_json::{Map, Value};

use crate::attachment::Attachment;
use crate::conference::ConferenceData;
use crate::error::{CalendarError, CalendarResult};
use crate::person::{Attendee, Person};
use crate::reminder::{DEFAULT_EMAIL_MINUTES, DEFAULT_POPUP_MINUTES, Reminder};
use crate::time::{EventTime, local_zone_name};

/// Maximum number of reminder overrides on one event.
pub const MAX_REMINDER_OVERRIDES: usize = 5;

/// Who can see event details.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// The calendar's default visibility.
    #[default]
    Default,
    Public,
    Private,
    Confidential,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Public => "public",
            Self::Private => "private",
            Self::Confidential => "confidential",
        }
    }
}

impl FromStr for Visibility {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Self::Default),
            "public" => Ok(Self::Public),
            "private" => Ok(Self::Private),
            "confidential" => Ok(Self::Confidential),
            other => Err(CalendarError::validation(
                "visibility",
                format!("unknown visibility '{}'", other),
            )),
        }
    }
}

/// Whether an event blocks time on the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transparency {
    /// Busy.
    Opaque,
    /// Available.
    Transparent,
}

impl Transparency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Opaque => "opaque",
            Self::Transparent => "transparent",
        }
    }
}

impl FromStr for Transparency {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "opaque" => Ok(Self::Opaque),
            "transparent" => Ok(Self::Transparent),
            other => Err(CalendarError::validation(
                "transparency",
                format!("unknown transparency '{}'", other),
            )),
        }
    }
}

/// A calendar event.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    id: Option<String>,
    pub summary: String,
    start: EventTime,
    end: EventTime,
    timezone: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    /// `RRULE`/`EXRULE`/`RDATE`/`EXDATE` lines.
    pub recurrence: Vec<String>,
    pub color_id: Option<String>,
    pub visibility: Visibility,
    pub transparency: Option<Transparency>,
    pub attendees: Vec<Attendee>,
    pub attachments: Vec<Attachment>,
    pub conference_data: Option<ConferenceData>,
    default_reminders: bool,
    reminders: Vec<Reminder>,
    pub guests_can_invite_others: Option<bool>,
    pub guests_can_modify: Option<bool>,
    pub guests_can_see_other_guests: Option<bool>,
    /// Read-only.
    pub creator: Option<Person>,
    /// Read-only.
    pub organizer: Option<Person>,
    /// Read-only.
    pub created: Option<DateTime<FixedOffset>>,
    /// Read-only.
    pub updated: Option<DateTime<FixedOffset>>,
    /// Read-only; set on instances of recurring events.
    pub recurring_event_id: Option<String>,
    /// Wire fields without a typed counterpart, kept for round trips.
    pub extra: Map<String, Value>,
}

impl Event {
    /// Starts building an event.
    pub fn builder(summary: impl Into<String>, start: impl Into<EventTime>) -> EventBuilder {
        EventBuilder::new(summary, start)
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn start(&self) -> &EventTime {
        &self.start
    }

    pub fn end(&self) -> &EventTime {
        &self.end
    }

    /// Zone of instant events; `None` for all-day events.
    pub fn timezone(&self) -> Option<&str> {
        self.timezone.as_deref()
    }

    pub fn is_all_day(&self) -> bool {
        self.start.is_all_day()
    }

    pub fn default_reminders(&self) -> bool {
        self.default_reminders
    }

    pub fn reminders(&self) -> &[Reminder] {
        &self.reminders
    }

    /// Adds a reminder override.
    pub fn add_reminder(&mut self, reminder: Reminder) -> CalendarResult<()> {
        if self.default_reminders {
            return Err(CalendarError::validation(
                "reminders",
                "cannot add overrides to an event using default reminders",
            ));
        }
        if self.reminders.len() >= MAX_REMINDER_OVERRIDES {
            return Err(CalendarError::validation(
                "reminders",
                format!("the maximum number of override reminders is {}", MAX_REMINDER_OVERRIDES),
            ));
        }
        self.reminders.push(reminder);
        Ok(())
    }

    /// Adds an email reminder; `None` uses the 60 minute default.
    pub fn add_email_reminder(&mut self, minutes_before_start: Option<u32>) -> CalendarResult<()> {
        self.add_reminder(Reminder::email(
            minutes_before_start.unwrap_or(DEFAULT_EMAIL_MINUTES),
        ))
    }

    /// Adds a popup reminder; `None` uses the 30 minute default.
    pub fn add_popup_reminder(&mut self, minutes_before_start: Option<u32>) -> CalendarResult<()> {
        self.add_reminder(Reminder::popup(
            minutes_before_start.unwrap_or(DEFAULT_POPUP_MINUTES),
        ))
    }

    /// Switches calendar-default reminders on or off.
    pub fn set_default_reminders(&mut self, enabled: bool) -> CalendarResult<()> {
        if enabled && !self.reminders.is_empty() {
            return Err(CalendarError::validation(
                "default_reminders",
                "cannot use default reminders while overrides are set",
            ));
        }
        self.default_reminders = enabled;
        Ok(())
    }

    pub fn add_attachment(&mut self, attachment: Attachment) {
        self.attachments.push(attachment);
    }

    pub fn add_attendee(&mut self, attendee: impl Into<Attendee>) {
        self.attendees.push(attendee.into());
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start.to_wire_string(), self.summary)
    }
}

/// Builder for [`Event`].
#[derive(Debug, Clone)]
pub struct EventBuilder {
    summary: String,
    start: EventTime,
    end: Option<EventTime>,
    timezone: Option<String>,
    id: Option<String>,
    description: Option<String>,
    location: Option<String>,
    recurrence: Vec<String>,
    color_id: Option<String>,
    visibility: Visibility,
    transparency: Option<Transparency>,
    attendees: Vec<Attendee>,
    attachments: Vec<Attachment>,
    conference_data: Option<ConferenceData>,
    default_reminders: bool,
    reminders: Vec<Reminder>,
    guests_can_invite_others: Option<bool>,
    guests_can_modify: Option<bool>,
    guests_can_see_other_guests: Option<bool>,
    creator: Option<Person>,
    organizer: Option<Person>,
    created: Option<DateTime<FixedOffset>>,
    updated: Option<DateTime<FixedOffset>>,
    recurring_event_id: Option<String>,
    extra: Map<String, Value>,
}

impl EventBuilder {
    pub fn new(summary: impl Into<String>, start: impl Into<EventTime>) -> Self {
        Self {
            summary: summary.into(),
            start: start.into(),
            end: None,
            timezone: None,
            id: None,
            description: None,
            location: None,
            recurrence: Vec::new(),
            color_id: None,
            visibility: Visibility::Default,
            transparency: None,
            attendees: Vec::new(),
            attachments: Vec::new(),
            conference_data: None,
            default_reminders: false,
            reminders: Vec::new(),
            guests_can_invite_others: None,
            guests_can_modify: None,
            guests_can_see_other_guests: None,
            creator: None,
            organizer: None,
            created: None,
            updated: None,
            recurring_event_id: None,
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn with_end(mut self, end: impl Into<EventTime>) -> Self {
        self.end = Some(end.into());
        self
    }

    /// Zone for instant events. Defaults to the host zone.
    #[must_use]
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn with_recurrence(mut self, lines: Vec<String>) -> Self {
        self.recurrence = lines;
        self
    }

    #[must_use]
    pub fn with_color_id(mut self, color_id: impl Into<String>) -> Self {
        self.color_id = Some(color_id.into());
        self
    }

    #[must_use]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    #[must_use]
    pub fn with_transparency(mut self, transparency: Transparency) -> Self {
        self.transparency = Some(transparency);
        self
    }

    #[must_use]
    pub fn with_attendee(mut self, attendee: impl Into<Attendee>) -> Self {
        self.attendees.push(attendee.into());
        self
    }

    #[must_use]
    pub fn with_attendees(mut self, attendees: Vec<Attendee>) -> Self {
        self.attendees = attendees;
        self
    }

    #[must_use]
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    #[must_use]
    pub fn with_attachments(mut self, attachments: Vec<Attachment>) -> Self {
        self.attachments = attachments;
        self
    }

    #[must_use]
    pub fn with_conference(mut self, conference: impl Into<ConferenceData>) -> Self {
        self.conference_data = Some(conference.into());
        self
    }

    #[must_use]
    pub fn with_default_reminders(mut self, enabled: bool) -> Self {
        self.default_reminders = enabled;
        self
    }

    #[must_use]
    pub fn with_reminder(mut self, reminder: Reminder) -> Self {
        self.reminders.push(reminder);
        self
    }

    #[must_use]
    pub fn with_reminders(mut self, reminders: Vec<Reminder>) -> Self {
        self.reminders = reminders;
        self
    }

    #[must_use]
    pub fn with_email_reminder(self, minutes_before_start: u32) -> Self {
        self.with_reminder(Reminder::email(minutes_before_start))
    }

    #[must_use]
    pub fn with_popup_reminder(self, minutes_before_start: u32) -> Self {
        self.with_reminder(Reminder::popup(minutes_before_start))
    }

    #[must_use]
    pub fn with_guests_can_invite_others(mut self, allowed: bool) -> Self {
        self.guests_can_invite_others = Some(allowed);
        self
    }

    #[must_use]
    pub fn with_guests_can_modify(mut self, allowed: bool) -> Self {
        self.guests_can_modify = Some(allowed);
        self
    }

    #[must_use]
    pub fn with_guests_can_see_other_guests(mut self, allowed: bool) -> Self {
        self.guests_can_see_other_guests = Some(allowed);
        self
    }

    #[must_use]
    pub fn with_creator(mut self, creator: Person) -> Self {
        self.creator = Some(creator);
        self
    }

    #[must_use]
    pub fn with_organizer(mut self, organizer: Person) -> Self {
        self.organizer = Some(organizer);
        self
    }

    #[must_use]
    pub fn with_created(mut self, created: DateTime<FixedOffset>) -> Self {
        self.created = Some(created);
        self
    }

    #[must_use]
    pub fn with_updated(mut self, updated: DateTime<FixedOffset>) -> Self {
        self.updated = Some(updated);
        self
    }

    #[must_use]
    pub fn with_recurring_event_id(mut self, id: impl Into<String>) -> Self {
        self.recurring_event_id = Some(id.into());
        self
    }

    /// Keeps an untyped wire field on the event.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    #[must_use]
    pub fn with_extras(mut self, extra: Map<String, Value>) -> Self {
        self.extra = extra;
        self
    }

    /// Validates and builds the event.
    pub fn build(self) -> CalendarResult<Event> {
        let end = match self.end {
            Some(end) => end,
            None => self.start.default_end()?,
        };
        if !self.start.same_kind(&end) {
            return Err(CalendarError::type_mismatch(
                "end",
                "start and end must either both be dates or both be instants",
            ));
        }

        let (start, end, timezone) = if self.start.is_all_day() {
            (self.start, end, None)
        } else {
            let zone = self.timezone.unwrap_or_else(local_zone_name);
            (
                self.start.ensure_zoned(&zone)?,
                end.ensure_zoned(&zone)?,
                Some(zone),
            )
        };

        if self.reminders.len() > MAX_REMINDER_OVERRIDES {
            return Err(CalendarError::validation(
                "reminders",
                format!("the maximum number of override reminders is {}", MAX_REMINDER_OVERRIDES),
            ));
        }
        if self.default_reminders && !self.reminders.is_empty() {
            return Err(CalendarError::validation(
                "reminders",
                "cannot specify both default reminders and overrides",
            ));
        }

        Ok(Event {
            id: self.id.map(|id| id.to_lowercase()),
            summary: self.summary,
            start,
            end,
            timezone,
            description: self.description,
            location: self.location,
            recurrence: self.recurrence,
            color_id: self.color_id,
            visibility: self.visibility,
            transparency: self.transparency,
            attendees: self.attendees,
            attachments: self.attachments,
            conference_data: self.conference_data,
            default_reminders: self.default_reminders,
            reminders: self.reminders,
            guests_can_invite_others: self.guests_can_invite_others,
            guests_can_modify: self.guests_can_modify,
            guests_can_see_other_guests: self.guests_can_see_other_guests,
            creator: self.creator,
            organizer: self.organizer,
            created: self.created,
            updated: self.updated,
            recurring_event_id: self.recurring_event_id,
            extra: self.extra,
        })
    }
}
