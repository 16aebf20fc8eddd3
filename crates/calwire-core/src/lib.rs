//! Core calendar types: event times, recurrence rules, domain model

pub mod acl;
pub mod attachment;
pub mod calendar;
pub mod conference;
pub mod config;
pub mod error;
pub mod event;
pub mod free_busy;
pub mod person;
pub mod recurrence;
pub mod reminder;
pub mod settings;
pub mod time;
pub mod tracing;

pub use acl::{AccessControlRule, AclRole, AclScope};
pub use attachment::{Attachment, SUPPORTED_MIME_TYPES, is_supported_mime_type};
pub use calendar::{AccessRole, Calendar, CalendarListEntry, NotificationType};
pub use conference::{
    ConferenceData, ConferenceSolution, ConferenceSolutionCreateRequest, CreateRequestStatus,
    EntryPoint, EntryPointType, SolutionType,
};
pub use config::CodecConfig;
pub use error::{CalendarError, CalendarResult};
pub use event::{Event, EventBuilder, MAX_REMINDER_OVERRIDES, Transparency, Visibility};
pub use free_busy::{FreeBusy, FreeBusyError, TimeRange};
pub use person::{Attendee, Person, ResponseStatus};
pub use recurrence::{
    Frequency, Period, PeriodDuration, Recurrence, RecurrenceKind, RecurrenceRule, Weekday,
    WeekdayToken, build_dates, build_periods, build_rule, build_times,
};
pub use reminder::{Reminder, ReminderMethod, ReminderTiming};
pub use settings::Settings;
pub use time::EventTime;
pub use self::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
