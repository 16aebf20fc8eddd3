//! One serializer per wire entity.

pub mod acl;
pub mod attachment;
pub mod calendar;
pub mod conference;
pub mod event;
pub mod free_busy;
pub mod person;
pub mod reminder;
pub mod settings;

pub use acl::AccessControlRuleSerializer;
pub use attachment::AttachmentSerializer;
pub use calendar::{CalendarListEntrySerializer, CalendarSerializer};
pub use conference::{
    ConferenceDataSerializer, ConferenceSolutionCreateRequestSerializer,
    ConferenceSolutionSerializer, ConferenceTag, EntryPointSerializer,
};
pub use event::EventSerializer;
pub use free_busy::FreeBusySerializer;
pub use person::{AttendeeSerializer, PersonSerializer};
pub use reminder::ReminderSerializer;
pub use settings::SettingsSerializer;
