//! People on events: creators, organizers and attendees.

use std::fmt;
use std::str::FromStr;

use crate::error::CalendarError;

/// A person referenced by an event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Person {
    pub email: Option<String>,
    pub display_name: Option<String>,
    /// Read-only profile id.
    pub profile_id: Option<String>,
    /// Read-only; whether this is the authenticated user.
    pub is_self: Option<bool>,
}

impl Person {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

/// An attendee's answer to the invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseStatus {
    NeedsAction,
    Declined,
    Tentative,
    Accepted,
}

impl ResponseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NeedsAction => "needsAction",
            Self::Declined => "declined",
            Self::Tentative => "tentative",
            Self::Accepted => "accepted",
        }
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseStatus {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "needsAction" => Ok(Self::NeedsAction),
            "declined" => Ok(Self::Declined),
            "tentative" => Ok(Self::Tentative),
            "accepted" => Ok(Self::Accepted),
            other => Err(CalendarError::validation(
                "response_status",
                format!("unknown response status '{}'", other),
            )),
        }
    }
}

/// An invited person or resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attendee {
    pub person: Person,
    pub comment: Option<String>,
    pub optional: Option<bool>,
    pub is_resource: Option<bool>,
    pub additional_guests: Option<u32>,
    pub response_status: Option<ResponseStatus>,
}

impl Attendee {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            person: Person::new(email),
            comment: None,
            optional: None,
            is_resource: None,
            additional_guests: None,
            response_status: None,
        }
    }

    pub fn email(&self) -> Option<&str> {
        self.person.email.as_deref()
    }

    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.person.display_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    #[must_use]
    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = Some(optional);
        self
    }

    #[must_use]
    pub fn with_resource(mut self, is_resource: bool) -> Self {
        self.is_resource = Some(is_resource);
        self
    }

    #[must_use]
    pub fn with_additional_guests(mut self, count: u32) -> Self {
        self.additional_guests = Some(count);
        self
    }

    #[must_use]
    pub fn with_response_status(mut self, status: ResponseStatus) -> Self {
        self.response_status = Some(status);
        self
    }
}

impl From<&str> for Attendee {
    fn from(email: &str) -> Self {
        Self::new(email)
    }
}
