//! Conference data attached to events.
//!
//! An event carries either a resolved [`ConferenceSolution`] (entry points
//! are known) or a [`ConferenceSolutionCreateRequest`] asking the service to
//! generate one. [`ConferenceData`] is the tagged union of the two.

use std::fmt;
use std::str::FromStr;

use tracing::warn;
use uuid::Uuid;

use crate::error::{CalendarError, CalendarResult};

/// Maximum length of conference notes.
pub const MAX_NOTES_LEN: usize = 2048;
/// Maximum length of an entry point label.
pub const MAX_LABEL_LEN: usize = 512;
/// Maximum length of entry point codes (pin, passcode, ...).
pub const MAX_CODE_LEN: usize = 128;

fn check_len(field: &str, value: Option<&str>, max: usize) -> CalendarResult<()> {
    match value {
        Some(v) if v.chars().count() > max => Err(CalendarError::validation(
            field,
            format!("maximum length is {} characters, got {}", max, v.chars().count()),
        )),
        _ => Ok(()),
    }
}

/// How an entry point is joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryPointType {
    Video,
    Phone,
    Sip,
    /// Further joining instructions; never sufficient on its own.
    More,
}

impl EntryPointType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Phone => "phone",
            Self::Sip => "sip",
            Self::More => "more",
        }
    }
}

impl fmt::Display for EntryPointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryPointType {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "video" => Ok(Self::Video),
            "phone" => Ok(Self::Phone),
            "sip" => Ok(Self::Sip),
            "more" => Ok(Self::More),
            other => Err(CalendarError::validation(
                "entry_point_type",
                format!("must be one of video, phone, sip or more, got '{}'", other),
            )),
        }
    }
}

/// One way of joining a conference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    pub entry_point_type: EntryPointType,
    pub uri: Option<String>,
    pub label: Option<String>,
    pub pin: Option<String>,
    pub access_code: Option<String>,
    pub meeting_code: Option<String>,
    pub passcode: Option<String>,
    pub password: Option<String>,
}

impl EntryPoint {
    pub fn new(entry_point_type: EntryPointType) -> Self {
        Self {
            entry_point_type,
            uri: None,
            label: None,
            pin: None,
            access_code: None,
            meeting_code: None,
            passcode: None,
            password: None,
        }
    }

    /// Shorthand for a video entry point at `uri`.
    pub fn video(uri: impl Into<String>) -> Self {
        Self::new(EntryPointType::Video).with_uri(uri)
    }

    /// Shorthand for a phone entry point at `uri` (a `tel:` URI).
    pub fn phone(uri: impl Into<String>) -> Self {
        Self::new(EntryPointType::Phone).with_uri(uri)
    }

    #[must_use]
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_pin(mut self, pin: impl Into<String>) -> Self {
        self.pin = Some(pin.into());
        self
    }

    #[must_use]
    pub fn with_access_code(mut self, code: impl Into<String>) -> Self {
        self.access_code = Some(code.into());
        self
    }

    #[must_use]
    pub fn with_meeting_code(mut self, code: impl Into<String>) -> Self {
        self.meeting_code = Some(code.into());
        self
    }

    #[must_use]
    pub fn with_passcode(mut self, passcode: impl Into<String>) -> Self {
        self.passcode = Some(passcode.into());
        self
    }

    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Checks the length ceilings of the label and the access codes.
    pub fn validate(&self) -> CalendarResult<()> {
        check_len("label", self.label.as_deref(), MAX_LABEL_LEN)?;
        check_len("pin", self.pin.as_deref(), MAX_CODE_LEN)?;
        check_len("access_code", self.access_code.as_deref(), MAX_CODE_LEN)?;
        check_len("meeting_code", self.meeting_code.as_deref(), MAX_CODE_LEN)?;
        check_len("passcode", self.passcode.as_deref(), MAX_CODE_LEN)?;
        check_len("password", self.password.as_deref(), MAX_CODE_LEN)
    }
}

/// The conferencing product behind a solution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SolutionType {
    /// Hangouts for consumers.
    EventHangout,
    /// Classic Hangouts for Workspace users.
    EventNamedHangout,
    /// Google Meet.
    HangoutsMeet,
    /// Third-party conference providers.
    AddOn,
    /// Any other key the service reports.
    Other(String),
}

impl SolutionType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::EventHangout => "eventHangout",
            Self::EventNamedHangout => "eventNamedHangout",
            Self::HangoutsMeet => "hangoutsMeet",
            Self::AddOn => "addOn",
            Self::Other(key) => key,
        }
    }
}

impl From<&str> for SolutionType {
    fn from(key: &str) -> Self {
        match key {
            "eventHangout" => Self::EventHangout,
            "eventNamedHangout" => Self::EventNamedHangout,
            "hangoutsMeet" => Self::HangoutsMeet,
            "addOn" => Self::AddOn,
            other => {
                warn!("unrecognized conference solution type {}", other);
                Self::Other(other.to_string())
            }
        }
    }
}

impl fmt::Display for SolutionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved conference with its entry points.
///
/// Construction enforces the entry point cardinality rules: at least one
/// entry point, at most one each of video, sip and more, and not only `more`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConferenceSolution {
    entry_points: Vec<EntryPoint>,
    pub solution_type: Option<SolutionType>,
    pub name: Option<String>,
    pub icon_uri: Option<String>,
    pub conference_id: Option<String>,
    pub signature: Option<String>,
    /// The request this solution was generated from, once it succeeded.
    /// Only its request id, solution key and status are kept.
    pub create_request: Option<ConferenceSolutionCreateRequest>,
    notes: Option<String>,
}

impl ConferenceSolution {
    pub fn new(entry_points: impl Into<Vec<EntryPoint>>) -> CalendarResult<Self> {
        let entry_points = entry_points.into();
        Self::check_entry_points(&entry_points)?;
        Ok(Self {
            entry_points,
            solution_type: None,
            name: None,
            icon_uri: None,
            conference_id: None,
            signature: None,
            create_request: None,
            notes: None,
        })
    }

    fn check_entry_points(entry_points: &[EntryPoint]) -> CalendarResult<()> {
        if entry_points.is_empty() {
            return Err(CalendarError::validation(
                "entry_points",
                "at least one entry point is required",
            ));
        }
        for ep in entry_points {
            ep.validate()?;
        }

        let count = |t: EntryPointType| {
            entry_points
                .iter()
                .filter(|ep| ep.entry_point_type == t)
                .count()
        };
        for t in [EntryPointType::Video, EntryPointType::Sip, EntryPointType::More] {
            if count(t) > 1 {
                return Err(CalendarError::validation(
                    "entry_points",
                    format!("at most one '{}' entry point is allowed", t),
                ));
            }
        }
        if count(EntryPointType::More) == entry_points.len() {
            return Err(CalendarError::validation(
                "entry_points",
                "a conference cannot consist only of a 'more' entry point",
            ));
        }
        Ok(())
    }

    pub fn entry_points(&self) -> &[EntryPoint] {
        &self.entry_points
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    #[must_use]
    pub fn with_solution_type(mut self, solution_type: SolutionType) -> Self {
        self.solution_type = Some(solution_type);
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_icon_uri(mut self, icon_uri: impl Into<String>) -> Self {
        self.icon_uri = Some(icon_uri.into());
        self
    }

    #[must_use]
    pub fn with_conference_id(mut self, id: impl Into<String>) -> Self {
        self.conference_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }

    #[must_use]
    pub fn with_create_request(mut self, request: ConferenceSolutionCreateRequest) -> Self {
        self.create_request = Some(request);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> CalendarResult<Self> {
        let notes = notes.into();
        check_len("notes", Some(&notes), MAX_NOTES_LEN)?;
        self.notes = Some(notes);
        Ok(self)
    }
}

/// Progress of a conference create request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CreateRequestStatus {
    Pending,
    Success,
    Failure,
    /// Any other status code the service reports.
    Other(String),
}

impl CreateRequestStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Other(code) => code,
        }
    }

    /// Only `success` is terminal; the conference is then resolved.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for CreateRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for CreateRequestStatus {
    fn from(code: &str) -> Self {
        match code {
            "pending" => Self::Pending,
            "success" => Self::Success,
            "failure" => Self::Failure,
            other => {
                warn!("unrecognized create request status {}", other);
                Self::Other(other.to_string())
            }
        }
    }
}

/// A request for the service to generate a conference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConferenceSolutionCreateRequest {
    /// Client-generated id; must be unique per request.
    pub request_id: String,
    pub solution_type: Option<SolutionType>,
    /// Read-only.
    pub status: Option<CreateRequestStatus>,
    pub conference_id: Option<String>,
    pub signature: Option<String>,
    notes: Option<String>,
}

impl ConferenceSolutionCreateRequest {
    /// Creates a request with a fresh random request id.
    pub fn new(solution_type: Option<SolutionType>) -> Self {
        Self {
            request_id: Uuid::new_v4().simple().to_string(),
            solution_type,
            status: None,
            conference_id: None,
            signature: None,
            notes: None,
        }
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: CreateRequestStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn with_conference_id(mut self, id: impl Into<String>) -> Self {
        self.conference_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> CalendarResult<Self> {
        let notes = notes.into();
        check_len("notes", Some(&notes), MAX_NOTES_LEN)?;
        self.notes = Some(notes);
        Ok(self)
    }
}

/// Conference data on an event: resolved, or still being requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConferenceData {
    Solution(ConferenceSolution),
    CreateRequest(ConferenceSolutionCreateRequest),
}

impl From<ConferenceSolution> for ConferenceData {
    fn from(solution: ConferenceSolution) -> Self {
        Self::Solution(solution)
    }
}

impl From<ConferenceSolutionCreateRequest> for ConferenceData {
    fn from(request: ConferenceSolutionCreateRequest) -> Self {
        Self::CreateRequest(request)
    }
}
