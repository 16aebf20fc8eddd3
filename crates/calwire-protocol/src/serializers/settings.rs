//! User settings wire format.

use calwire_core::{CodecConfig, Settings};
use serde_json::json;

use crate::contract::{Fields, Serializer, WireObject, wire_object};
use crate::error::ProtocolResult;

/// The flat settings object. Absent keys take the [`Settings`] defaults.
pub struct SettingsSerializer;

impl Serializer for SettingsSerializer {
    type Target = Settings;
    const TYPE_NAME: &'static str = "Settings";
    const PARAM_NAME: &'static str = "settings";

    fn to_json(settings: &Settings) -> ProtocolResult<WireObject> {
        Ok(wire_object([
            ("autoAddHangouts", json!(settings.auto_add_hangouts)),
            ("dateFieldOrder", json!(settings.date_field_order)),
            ("defaultEventLength", json!(settings.default_event_length)),
            ("format24HourTime", json!(settings.format_24_hour_time)),
            ("hideInvitations", json!(settings.hide_invitations)),
            ("hideWeekends", json!(settings.hide_weekends)),
            ("locale", json!(settings.locale)),
            (
                "remindOnRespondedEventsOnly",
                json!(settings.remind_on_responded_events_only),
            ),
            ("showDeclinedEvents", json!(settings.show_declined_events)),
            ("timezone", json!(settings.timezone)),
            ("useKeyboardShortcuts", json!(settings.use_keyboard_shortcuts)),
            ("weekStart", json!(settings.week_start())),
        ]))
    }

    fn to_object_with(json: &WireObject, _config: &CodecConfig) -> ProtocolResult<Settings> {
        let f = Fields::new(Self::TYPE_NAME, json);
        let mut settings = Settings::default();

        let flags = [
            ("autoAddHangouts", &mut settings.auto_add_hangouts),
            ("format24HourTime", &mut settings.format_24_hour_time),
            ("hideInvitations", &mut settings.hide_invitations),
            ("hideWeekends", &mut settings.hide_weekends),
            ("remindOnRespondedEventsOnly", &mut settings.remind_on_responded_events_only),
            ("showDeclinedEvents", &mut settings.show_declined_events),
            ("useKeyboardShortcuts", &mut settings.use_keyboard_shortcuts),
        ];
        for (key, flag) in flags {
            if let Some(value) = f.bool(key)? {
                *flag = value;
            }
        }
        if let Some(order) = f.str("dateFieldOrder")? {
            settings.date_field_order = order;
        }
        if let Some(length) = f.u32("defaultEventLength")? {
            settings.default_event_length = length;
        }
        if let Some(locale) = f.str("locale")? {
            settings.locale = locale;
        }
        if let Some(timezone) = f.str("timezone")? {
            settings.timezone = timezone;
        }
        if let Some(week_start) = f.u32("weekStart")? {
            settings = settings.with_week_start(week_start)?;
        }
        Ok(settings)
    }
}
