//! Calendars and calendar list entries.

use std::fmt;
use std::str::FromStr;

use crate::conference::SolutionType;
use crate::error::{CalendarError, CalendarResult};
use crate::reminder::Reminder;
use crate::time::local_zone_name;

/// The caller's permissions on a calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessRole {
    FreeBusyReader,
    Reader,
    Writer,
    Owner,
}

impl AccessRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FreeBusyReader => "freeBusyReader",
            Self::Reader => "reader",
            Self::Writer => "writer",
            Self::Owner => "owner",
        }
    }
}

impl FromStr for AccessRole {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "freeBusyReader" => Ok(Self::FreeBusyReader),
            "reader" => Ok(Self::Reader),
            "writer" => Ok(Self::Writer),
            "owner" => Ok(Self::Owner),
            other => Err(CalendarError::validation(
                "access_role",
                format!("unknown access role '{}'", other),
            )),
        }
    }
}

impl fmt::Display for AccessRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Calendar notifications delivered by email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationType {
    EventCreation,
    EventChange,
    EventCancellation,
    EventResponse,
    /// Daily agenda, sent in the morning.
    Agenda,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EventCreation => "eventCreation",
            Self::EventChange => "eventChange",
            Self::EventCancellation => "eventCancellation",
            Self::EventResponse => "eventResponse",
            Self::Agenda => "agenda",
        }
    }
}

impl FromStr for NotificationType {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eventCreation" => Ok(Self::EventCreation),
            "eventChange" => Ok(Self::EventChange),
            "eventCancellation" => Ok(Self::EventCancellation),
            "eventResponse" => Ok(Self::EventResponse),
            "agenda" => Ok(Self::Agenda),
            other => Err(CalendarError::validation(
                "notification_types",
                format!("unknown notification type '{}'", other),
            )),
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A calendar's own metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calendar {
    pub id: Option<String>,
    pub summary: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub timezone: Option<String>,
    pub allowed_conference_solution_types: Vec<SolutionType>,
}

impl Calendar {
    /// Creates a calendar in the host's time zone.
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            id: None,
            summary: summary.into(),
            description: None,
            location: None,
            timezone: Some(local_zone_name()),
            allowed_conference_solution_types: Vec::new(),
        }
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
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }

    #[must_use]
    pub fn with_allowed_conference_solution_types(mut self, types: Vec<SolutionType>) -> Self {
        self.allowed_conference_solution_types = types;
        self
    }

    /// Wraps this calendar in a list entry with default list settings.
    ///
    /// Fails when the calendar has no id, since list entries are keyed by it.
    pub fn to_calendar_list_entry(&self) -> CalendarResult<CalendarListEntry> {
        if self.id.is_none() {
            return Err(CalendarError::validation(
                "id",
                "calendar needs an id to become a calendar list entry",
            ));
        }
        Ok(CalendarListEntry::from_calendar(self.clone()))
    }
}

/// A calendar as it appears in the user's calendar list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarListEntry {
    pub calendar: Calendar,
    pub summary_override: Option<String>,
    color_id: Option<String>,
    pub background_color: Option<String>,
    pub foreground_color: Option<String>,
    pub hidden: bool,
    pub selected: bool,
    pub default_reminders: Vec<Reminder>,
    pub notification_types: Vec<NotificationType>,
    /// Read-only.
    pub access_role: Option<AccessRole>,
    /// Read-only.
    pub primary: bool,
    /// Read-only.
    pub deleted: bool,
}

impl CalendarListEntry {
    fn from_calendar(calendar: Calendar) -> Self {
        Self {
            calendar,
            summary_override: None,
            color_id: None,
            background_color: None,
            foreground_color: None,
            hidden: false,
            selected: false,
            default_reminders: Vec::new(),
            notification_types: Vec::new(),
            access_role: None,
            primary: false,
            deleted: false,
        }
    }

    /// Creates an entry for an existing calendar id.
    pub fn new(calendar_id: impl Into<String>) -> Self {
        Self::from_calendar(Calendar {
            id: Some(calendar_id.into()),
            summary: String::new(),
            description: None,
            location: None,
            timezone: None,
            allowed_conference_solution_types: Vec::new(),
        })
    }

    pub fn id(&self) -> Option<&str> {
        self.calendar.id.as_deref()
    }

    pub fn color_id(&self) -> Option<&str> {
        self.color_id.as_deref()
    }

    /// Sets a palette color; explicit background and foreground colors are
    /// dropped since the palette entry supersedes them.
    pub fn set_color_id(&mut self, color_id: Option<String>) {
        self.color_id = color_id;
        self.background_color = None;
        self.foreground_color = None;
    }

    #[must_use]
    pub fn with_color_id(mut self, color_id: impl Into<String>) -> Self {
        self.set_color_id(Some(color_id.into()));
        self
    }

    #[must_use]
    pub fn with_summary_override(mut self, summary: impl Into<String>) -> Self {
        self.summary_override = Some(summary.into());
        self
    }

    #[must_use]
    pub fn with_colors(mut self, background: impl Into<String>, foreground: impl Into<String>) -> Self {
        self.background_color = Some(background.into());
        self.foreground_color = Some(foreground.into());
        self
    }

    #[must_use]
    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    #[must_use]
    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    #[must_use]
    pub fn with_default_reminders(mut self, reminders: Vec<Reminder>) -> Self {
        self.default_reminders = reminders;
        self
    }

    #[must_use]
    pub fn with_notification_types(mut self, types: Vec<NotificationType>) -> Self {
        self.notification_types = types;
        self
    }
}
