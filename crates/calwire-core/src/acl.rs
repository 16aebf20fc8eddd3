//! Access control rules on a calendar.

use std::fmt;
use std::str::FromStr;

use crate::error::{CalendarError, CalendarResult};

/// The access a rule grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AclRole {
    /// No access at all.
    None,
    FreeBusyReader,
    /// Private events are visible, their details are not.
    Reader,
    Writer,
    /// Writer access plus managing the rules themselves.
    Owner,
}

impl AclRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::FreeBusyReader => "freeBusyReader",
            Self::Reader => "reader",
            Self::Writer => "writer",
            Self::Owner => "owner",
        }
    }
}

impl fmt::Display for AclRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AclRole {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "freeBusyReader" => Ok(Self::FreeBusyReader),
            "reader" => Ok(Self::Reader),
            "writer" => Ok(Self::Writer),
            "owner" => Ok(Self::Owner),
            other => Err(CalendarError::validation(
                "role",
                format!("unknown access control role '{}'", other),
            )),
        }
    }
}

/// Who a rule applies to.
///
/// Every scope but the public one names its subject.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AclScope {
    /// Everyone.
    Public,
    /// A single user, by email address.
    User(String),
    /// A group, by email address.
    Group(String),
    /// Everyone in a domain, by domain name.
    Domain(String),
}

impl AclScope {
    /// Builds a scope from its wire `type` and `value`.
    pub fn from_parts(scope_type: &str, value: Option<String>) -> CalendarResult<Self> {
        let require = |value: Option<String>| {
            value.filter(|v| !v.is_empty()).ok_or_else(|| {
                CalendarError::validation(
                    "scope_value",
                    format!("a '{}' scope needs a value", scope_type),
                )
            })
        };
        match scope_type {
            "default" => match value {
                None => Ok(Self::Public),
                Some(v) => Err(CalendarError::validation(
                    "scope_value",
                    format!("the default scope takes no value, got '{}'", v),
                )),
            },
            "user" => require(value).map(Self::User),
            "group" => require(value).map(Self::Group),
            "domain" => require(value).map(Self::Domain),
            other => Err(CalendarError::validation(
                "scope_type",
                format!("must be one of default, user, group or domain, got '{}'", other),
            )),
        }
    }

    /// The wire `type` token.
    pub fn type_str(&self) -> &'static str {
        match self {
            Self::Public => "default",
            Self::User(_) => "user",
            Self::Group(_) => "group",
            Self::Domain(_) => "domain",
        }
    }

    /// The email address or domain name, absent for the public scope.
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Public => None,
            Self::User(v) | Self::Group(v) | Self::Domain(v) => Some(v),
        }
    }
}

/// One entry of a calendar's access control list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessControlRule {
    /// Server-assigned, e.g. `user:ada@example.com`.
    pub id: Option<String>,
    pub role: AclRole,
    pub scope: AclScope,
}

impl AccessControlRule {
    pub fn new(role: AclRole, scope: AclScope) -> Self {
        Self {
            id: None,
            role,
            scope,
        }
    }

    /// Shorthand for a rule granting `role` to a single user.
    pub fn user(email: impl Into<String>, role: AclRole) -> Self {
        Self::new(role, AclScope::User(email.into()))
    }

    /// Shorthand for a rule granting `role` to everyone.
    pub fn public(role: AclRole) -> Self {
        Self::new(role, AclScope::Public)
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

impl fmt::Display for AccessControlRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.scope.value().unwrap_or("default"), self.role)
    }
}
