//! Reminder override wire format.

use calwire_core::{CalendarError, CodecConfig, Reminder, ReminderMethod};
use serde_json::json;

use crate::contract::{Fields, Serializer, WireObject, wire_object};
use crate::error::ProtocolResult;

/// `{"method": "email"|"popup", "minutes": n}`.
///
/// Only relative reminders have a wire form. Absolute ones must be converted
/// with [`Reminder::to_relative`] first, which the event serializer does.
pub struct ReminderSerializer;

impl Serializer for ReminderSerializer {
    type Target = Reminder;
    const TYPE_NAME: &'static str = "Reminder";
    const PARAM_NAME: &'static str = "reminder";

    fn to_json(reminder: &Reminder) -> ProtocolResult<WireObject> {
        let minutes = reminder.minutes_before_start().ok_or_else(|| {
            CalendarError::validation(
                "minutes_before_start",
                "absolute reminders need an event start to be encoded",
            )
        })?;
        Ok(wire_object([
            ("method", json!(reminder.method.as_str())),
            ("minutes", json!(minutes)),
        ]))
    }

    fn to_object_with(json: &WireObject, _config: &CodecConfig) -> ProtocolResult<Reminder> {
        let f = Fields::new(Self::TYPE_NAME, json);
        let method: ReminderMethod = f.require_str("method")?.parse()?;
        Ok(Reminder::relative(method, f.require_u32("minutes")?))
    }
}
