//! Calendars and calendar list entries.

use calwire_core::{
    Calendar, CalendarListEntry, CodecConfig, NotificationType, SolutionType,
};
use serde_json::{Value, json};

use crate::contract::{Fields, Serializer, WireObject, encode_list, wire_object};
use crate::error::ProtocolResult;
use crate::serializers::reminder::ReminderSerializer;

pub struct CalendarSerializer;

impl CalendarSerializer {
    fn conference_properties(calendar: &Calendar) -> Value {
        if calendar.allowed_conference_solution_types.is_empty() {
            return Value::Null;
        }
        let types: Vec<&str> = calendar
            .allowed_conference_solution_types
            .iter()
            .map(SolutionType::as_str)
            .collect();
        json!({"allowedConferenceSolutionTypes": types})
    }

    /// Reads the calendar fields shared by both entities; `summary` falls
    /// back to an empty string.
    fn read(f: &Fields<'_>) -> ProtocolResult<Calendar> {
        let allowed = match f.nested("conferenceProperties")? {
            Some(props) => props
                .strings("allowedConferenceSolutionTypes")?
                .iter()
                .map(|key| SolutionType::from(key.as_str()))
                .collect(),
            None => Vec::new(),
        };
        Ok(Calendar {
            id: f.str("id")?,
            summary: f.str("summary")?.unwrap_or_default(),
            description: f.str("description")?,
            location: f.str("location")?,
            timezone: f.str("timeZone")?,
            allowed_conference_solution_types: allowed,
        })
    }
}

impl Serializer for CalendarSerializer {
    type Target = Calendar;
    const TYPE_NAME: &'static str = "Calendar";
    const PARAM_NAME: &'static str = "calendar";

    fn to_json(calendar: &Calendar) -> ProtocolResult<WireObject> {
        Ok(wire_object([
            ("id", json!(calendar.id)),
            ("summary", json!(calendar.summary)),
            ("description", json!(calendar.description)),
            ("location", json!(calendar.location)),
            ("timeZone", json!(calendar.timezone)),
            ("conferenceProperties", Self::conference_properties(calendar)),
        ]))
    }

    fn to_object_with(json: &WireObject, _config: &CodecConfig) -> ProtocolResult<Calendar> {
        let f = Fields::new(Self::TYPE_NAME, json);
        f.require_str("summary")?;
        Self::read(&f)
    }
}

/// Encodes only the user's list settings; the wrapped calendar's own fields
/// and the access flags are read-only here.
pub struct CalendarListEntrySerializer;

impl Serializer for CalendarListEntrySerializer {
    type Target = CalendarListEntry;
    const TYPE_NAME: &'static str = "CalendarListEntry";
    const PARAM_NAME: &'static str = "calendar_list_entry";

    fn to_json(entry: &CalendarListEntry) -> ProtocolResult<WireObject> {
        let notifications = if entry.notification_types.is_empty() {
            Value::Null
        } else {
            let list: Vec<Value> = entry
                .notification_types
                .iter()
                .map(|t| json!({"type": t.as_str(), "method": "email"}))
                .collect();
            json!({"notifications": list})
        };
        Ok(wire_object([
            ("id", json!(entry.id())),
            ("summaryOverride", json!(entry.summary_override)),
            ("colorId", json!(entry.color_id())),
            ("backgroundColor", json!(entry.background_color)),
            ("foregroundColor", json!(entry.foreground_color)),
            ("hidden", json!(entry.hidden)),
            ("selected", json!(entry.selected)),
            (
                "defaultReminders",
                encode_list::<ReminderSerializer>(&entry.default_reminders)?,
            ),
            ("notificationSettings", notifications),
        ]))
    }

    fn to_object_with(json: &WireObject, config: &CodecConfig) -> ProtocolResult<CalendarListEntry> {
        let f = Fields::new(Self::TYPE_NAME, json);
        let mut entry = CalendarListEntry::new(f.require_str("id")?);
        entry.calendar = CalendarSerializer::read(&f)?;

        entry.set_color_id(f.str("colorId")?);
        entry.summary_override = f.str("summaryOverride")?;
        entry.background_color = f.str("backgroundColor")?;
        entry.foreground_color = f.str("foregroundColor")?;
        entry.hidden = f.bool("hidden")?.unwrap_or(false);
        entry.selected = f.bool("selected")?.unwrap_or(false);
        entry.default_reminders = f.list::<ReminderSerializer>("defaultReminders", config)?;

        if let Some(settings) = f.nested("notificationSettings")? {
            entry.notification_types = settings
                .objects("notifications")?
                .into_iter()
                .map(|n| -> ProtocolResult<NotificationType> {
                    Ok(Fields::new(Self::TYPE_NAME, n).require_str("type")?.parse()?)
                })
                .collect::<ProtocolResult<_>>()?;
        }

        entry.access_role = f.parsed("accessRole")?;
        entry.primary = f.bool("primary")?.unwrap_or(false);
        entry.deleted = f.bool("deleted")?.unwrap_or(false);
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calwire_core::{AccessRole, Reminder};
    use crate::error::ProtocolError;

    mod calendar {
        use super::*;

        #[test]
        fn encode() {
            let calendar = Calendar::new("Team")
                .with_id("team@group.example.com")
                .with_timezone("Europe/Prague")
                .with_allowed_conference_solution_types(vec![SolutionType::HangoutsMeet]);
            let json = CalendarSerializer::encode(&calendar).unwrap();
            assert_eq!(
                Value::Object(json),
                json!({
                    "id": "team@group.example.com",
                    "summary": "Team",
                    "timeZone": "Europe/Prague",
                    "conferenceProperties": {"allowedConferenceSolutionTypes": ["hangoutsMeet"]},
                })
            );
        }

        #[test]
        fn round_trip() {
            let calendar = Calendar::new("Home")
                .with_id("home")
                .with_description("family things")
                .with_location("Brno")
                .with_timezone("Europe/Prague");
            let json = CalendarSerializer::encode(&calendar).unwrap();
            assert_eq!(CalendarSerializer::decode(json).unwrap(), calendar);
        }

        #[test]
        fn summary_is_required() {
            let err = CalendarSerializer::decode(json!({"id": "x"})).unwrap_err();
            assert!(matches!(err, ProtocolError::MissingField { field: "summary", .. }));
        }
    }

    mod list_entry {
        use super::*;

        #[test]
        fn encode_settings_only() {
            let calendar = Calendar::new("Team").with_id("team").with_location("Brno");
            let entry = calendar
                .to_calendar_list_entry()
                .unwrap()
                .with_summary_override("My team")
                .with_color_id("7")
                .with_selected(true)
                .with_default_reminders(vec![Reminder::popup(10)])
                .with_notification_types(vec![NotificationType::EventCreation]);
            let json = CalendarListEntrySerializer::encode(&entry).unwrap();
            assert_eq!(
                Value::Object(json),
                json!({
                    "id": "team",
                    "summaryOverride": "My team",
                    "colorId": "7",
                    "hidden": false,
                    "selected": true,
                    "defaultReminders": [{"method": "popup", "minutes": 10}],
                    "notificationSettings": {
                        "notifications": [{"type": "eventCreation", "method": "email"}]
                    },
                })
            );
        }

        #[test]
        fn decode_reads_read_only_fields() {
            let entry = CalendarListEntrySerializer::decode(json!({
                "id": "primary@example.com",
                "summary": "Ada",
                "timeZone": "Europe/London",
                "backgroundColor": "#9fe1e7",
                "foregroundColor": "#000000",
                "accessRole": "owner",
                "primary": true,
                "defaultReminders": [{"method": "email", "minutes": 30}],
            }))
            .unwrap();
            assert_eq!(entry.id(), Some("primary@example.com"));
            assert_eq!(entry.calendar.summary, "Ada");
            assert_eq!(entry.calendar.timezone.as_deref(), Some("Europe/London"));
            assert_eq!(entry.background_color.as_deref(), Some("#9fe1e7"));
            assert_eq!(entry.access_role, Some(AccessRole::Owner));
            assert!(entry.primary);
            assert!(!entry.deleted);
            assert_eq!(entry.default_reminders, vec![Reminder::email(30)]);
        }

        #[test]
        fn missing_summary_defaults_to_empty() {
            let entry = CalendarListEntrySerializer::decode(json!({"id": "x"})).unwrap();
            assert_eq!(entry.calendar.summary, "");
        }

        #[test]
        fn round_trip_of_settings() {
            let entry = CalendarListEntry::new("team")
                .with_colors("#ffffff", "#000000")
                .with_hidden(true)
                .with_notification_types(vec![
                    NotificationType::EventChange,
                    NotificationType::Agenda,
                ]);
            let json = CalendarListEntrySerializer::encode(&entry).unwrap();
            assert_eq!(CalendarListEntrySerializer::decode(json).unwrap(), entry);
        }
    }
}
