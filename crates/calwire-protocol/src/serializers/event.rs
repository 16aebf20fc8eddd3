//! Event wire format.
//!
//! Besides the typed fields, an event carries any keys this crate does not
//! model in [`Event::extra`]; they are written back on encode so payloads
//! fetched from the service survive an update.

use calwire_core::time::{parse_wire_date, parse_wire_datetime};
use calwire_core::{CodecConfig, Event, EventTime, Reminder};
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::contract::{Fields, Serializer, WireObject, encode_list, wire_object};
use crate::error::{ProtocolError, ProtocolResult};
use crate::serializers::attachment::AttachmentSerializer;
use crate::serializers::conference::ConferenceDataSerializer;
use crate::serializers::person::{AttendeeSerializer, PersonSerializer};
use crate::serializers::reminder::ReminderSerializer;

/// Keys with a typed counterpart on [`Event`]. Nothing under these names is
/// kept in, or merged back from, `extra`.
const TYPED_KEYS: &[&str] = &[
    "id",
    "summary",
    "description",
    "location",
    "start",
    "end",
    "recurrence",
    "colorId",
    "visibility",
    "transparency",
    "attendees",
    "attachments",
    "reminders",
    "conferenceData",
    "guestsCanInviteOthers",
    "guestsCanModify",
    "guestsCanSeeOtherGuests",
    "creator",
    "organizer",
    "created",
    "updated",
    "recurringEventId",
];

pub struct EventSerializer;

impl EventSerializer {
    fn time_to_json(time: &EventTime, timezone: Option<&str>) -> Value {
        match time {
            EventTime::Date(_) => json!({"date": time.to_wire_string()}),
            _ => json!({"dateTime": time.to_wire_string(), "timeZone": timezone}),
        }
    }

    fn reminders_to_json(event: &Event) -> ProtocolResult<Value> {
        if event.default_reminders() {
            return Ok(json!({"useDefault": true}));
        }
        let overrides = event
            .reminders()
            .iter()
            .map(|r| r.to_relative(event.start()))
            .collect::<Result<Vec<Reminder>, _>>()?;
        Ok(json!({
            "useDefault": false,
            "overrides": encode_list::<ReminderSerializer>(&overrides)?,
        }))
    }

    fn time_from_json(f: &Fields<'_>, key: &'static str, zone: &str) -> ProtocolResult<Option<EventTime>> {
        let Some(time) = f.nested(key)? else {
            return Ok(None);
        };
        if let Some(date) = time.str("date")? {
            return Ok(Some(EventTime::Date(parse_wire_date(&date)?)));
        }
        match time.str("dateTime")? {
            Some(value) => Ok(Some(parse_wire_datetime(&value, Some(zone))?)),
            None => Err(ProtocolError::MissingField {
                entity: Self::TYPE_NAME,
                field: "dateTime",
            }),
        }
    }

    fn extra_keys(json: &WireObject) -> Map<String, Value> {
        json.iter()
            .filter(|(key, value)| !value.is_null() && !TYPED_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

impl Serializer for EventSerializer {
    type Target = Event;
    const TYPE_NAME: &'static str = "Event";
    const PARAM_NAME: &'static str = "event";

    /// Read-only fields (`creator`, `organizer`, `created`, `updated`,
    /// `recurringEventId`) are never written.
    fn to_json(event: &Event) -> ProtocolResult<WireObject> {
        let recurrence = if event.recurrence.is_empty() {
            Value::Null
        } else {
            json!(event.recurrence)
        };
        let conference = match &event.conference_data {
            Some(data) => Value::Object(ConferenceDataSerializer::to_json(data)?),
            None => Value::Null,
        };

        let mut json = wire_object([
            ("id", json!(event.id())),
            ("summary", json!(event.summary)),
            ("description", json!(event.description)),
            ("location", json!(event.location)),
            ("start", Self::time_to_json(event.start(), event.timezone())),
            ("end", Self::time_to_json(event.end(), event.timezone())),
            ("recurrence", recurrence),
            ("colorId", json!(event.color_id)),
            ("visibility", json!(event.visibility.as_str())),
            ("transparency", json!(event.transparency.map(|t| t.as_str()))),
            ("attendees", encode_list::<AttendeeSerializer>(&event.attendees)?),
            ("attachments", encode_list::<AttachmentSerializer>(&event.attachments)?),
            ("reminders", Self::reminders_to_json(event)?),
            ("conferenceData", conference),
            ("guestsCanInviteOthers", json!(event.guests_can_invite_others)),
            ("guestsCanModify", json!(event.guests_can_modify)),
            ("guestsCanSeeOtherGuests", json!(event.guests_can_see_other_guests)),
        ]);

        for (key, value) in &event.extra {
            if !TYPED_KEYS.contains(&key.as_str()) && !json.contains_key(key) {
                json.insert(key.clone(), value.clone());
            }
        }
        Ok(json)
    }

    /// The event zone is `start.timeZone`, else the configured default, else
    /// the host zone. Naive `dateTime` values are read in their own
    /// `timeZone` or, failing that, the event zone.
    fn to_object_with(json: &WireObject, config: &CodecConfig) -> ProtocolResult<Event> {
        let f = Fields::new(Self::TYPE_NAME, json);

        let start_zone = match f.nested("start")? {
            Some(start) => start.str("timeZone")?,
            None => None,
        };
        let zone = start_zone.unwrap_or_else(|| config.resolved_timezone());
        let end_zone = match f.nested("end")? {
            Some(end) => end.str("timeZone")?,
            None => None,
        }
        .unwrap_or_else(|| zone.clone());

        let start = Self::time_from_json(&f, "start", &zone)?.ok_or(ProtocolError::MissingField {
            entity: Self::TYPE_NAME,
            field: "start",
        })?;
        let summary = f.str("summary")?.unwrap_or_default();

        let end = Self::time_from_json(&f, "end", &end_zone)?;

        let mut builder = Event::builder(summary, start)
            .with_timezone(zone)
            .with_recurrence(f.strings("recurrence")?)
            .with_visibility(f.parsed("visibility")?.unwrap_or_default())
            .with_attendees(f.list::<AttendeeSerializer>("attendees", config)?)
            .with_attachments(f.list::<AttachmentSerializer>("attachments", config)?)
            .with_extras(Self::extra_keys(json));

        if let Some(end) = end {
            builder = builder.with_end(end);
        }
        if let Some(id) = f.str("id")? {
            builder = builder.with_id(id);
        }
        if let Some(description) = f.str("description")? {
            builder = builder.with_description(description);
        }
        if let Some(location) = f.str("location")? {
            builder = builder.with_location(location);
        }
        if let Some(color_id) = f.str("colorId")? {
            builder = builder.with_color_id(color_id);
        }
        if let Some(transparency) = f.parsed("transparency")? {
            builder = builder.with_transparency(transparency);
        }
        if let Some(reminders) = f.nested("reminders")? {
            builder = builder
                .with_default_reminders(reminders.bool("useDefault")?.unwrap_or(false))
                .with_reminders(reminders.list::<ReminderSerializer>("overrides", config)?);
        }
        if let Some(conference) = f.object("conferenceData")? {
            builder = builder.with_conference(ConferenceDataSerializer::to_object_with(conference, config)?);
        }
        if let Some(allowed) = f.bool("guestsCanInviteOthers")? {
            builder = builder.with_guests_can_invite_others(allowed);
        }
        if let Some(allowed) = f.bool("guestsCanModify")? {
            builder = builder.with_guests_can_modify(allowed);
        }
        if let Some(allowed) = f.bool("guestsCanSeeOtherGuests")? {
            builder = builder.with_guests_can_see_other_guests(allowed);
        }
        if let Some(creator) = f.object("creator")? {
            builder = builder.with_creator(PersonSerializer::to_object_with(creator, config)?);
        }
        if let Some(organizer) = f.object("organizer")? {
            builder = builder.with_organizer(PersonSerializer::to_object_with(organizer, config)?);
        }
        if let Some(created) = f.timestamp("created")? {
            builder = builder.with_created(created);
        }
        if let Some(updated) = f.timestamp("updated")? {
            builder = builder.with_updated(updated);
        }
        if let Some(id) = f.str("recurringEventId")? {
            builder = builder.with_recurring_event_id(id);
        }

        let event = builder.build()?;
        if !event.extra.is_empty() {
            debug!(
                id = event.id().unwrap_or_default(),
                keys = ?event.extra.keys().collect::<Vec<_>>(),
                "keeping unrecognized event keys"
            );
        }
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calwire_core::{
        Attachment, Attendee, ConferenceSolution, ConferenceSolutionCreateRequest, EntryPoint,
        Person, ReminderMethod, SolutionType, Transparency, Visibility,
    };
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn naive(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(h, min, 0).unwrap()
    }

    fn encode(event: &Event) -> Value {
        Value::Object(EventSerializer::encode(event).unwrap())
    }

    mod encode {
        use super::*;

        #[test]
        fn all_day_event() {
            let event = Event::builder("Breakfast", date(2019, 9, 28))
                .with_id("Breakfast1")
                .build()
                .unwrap();
            insta::assert_json_snapshot!(encode(&event), @r#"
            {
              "end": {
                "date": "2019-09-29"
              },
              "id": "breakfast1",
              "reminders": {
                "useDefault": false
              },
              "start": {
                "date": "2019-09-28"
              },
              "summary": "Breakfast",
              "visibility": "default"
            }
            "#);
        }

        #[test]
        fn timed_event_with_everything() {
            let event = Event::builder("Planning", naive(2019, 10, 1, 14, 0))
                .with_timezone("Europe/Prague")
                .with_description("Quarterly planning")
                .with_location("Room 4")
                .with_recurrence(vec!["RRULE:FREQ=WEEKLY;WKST=SU".to_string()])
                .with_color_id("5")
                .with_visibility(Visibility::Private)
                .with_transparency(Transparency::Opaque)
                .with_attendee(Attendee::new("ada@example.com").with_optional(true))
                .with_attachment(Attachment::new("https://docs.example.com/d/1"))
                .with_popup_reminder(15)
                .with_guests_can_modify(true)
                .with_creator(Person::new("boss@example.com"))
                .build()
                .unwrap();
            insta::assert_json_snapshot!(encode(&event), @r#"
            {
              "attachments": [
                {
                  "fileUrl": "https://docs.example.com/d/1"
                }
              ],
              "attendees": [
                {
                  "email": "ada@example.com",
                  "optional": true
                }
              ],
              "colorId": "5",
              "description": "Quarterly planning",
              "end": {
                "dateTime": "2019-10-01T15:00:00+02:00",
                "timeZone": "Europe/Prague"
              },
              "guestsCanModify": true,
              "location": "Room 4",
              "recurrence": [
                "RRULE:FREQ=WEEKLY;WKST=SU"
              ],
              "reminders": {
                "overrides": [
                  {
                    "method": "popup",
                    "minutes": 15
                  }
                ],
                "useDefault": false
              },
              "start": {
                "dateTime": "2019-10-01T14:00:00+02:00",
                "timeZone": "Europe/Prague"
              },
              "summary": "Planning",
              "transparency": "opaque",
              "visibility": "private"
            }
            "#);
        }

        #[test]
        fn default_reminders() {
            let event = Event::builder("Standup", date(2020, 1, 6))
                .with_default_reminders(true)
                .build()
                .unwrap();
            assert_eq!(encode(&event)["reminders"], json!({"useDefault": true}));
        }

        #[test]
        fn absolute_reminders_become_relative() {
            let at = NaiveTime::from_hms_opt(18, 0, 0).unwrap();
            let event = Event::builder("Launch", naive(2020, 3, 2, 9, 0))
                .with_timezone("UTC")
                .with_reminder(Reminder::absolute(ReminderMethod::Email, 1, at))
                .build()
                .unwrap();
            assert_eq!(
                encode(&event)["reminders"]["overrides"],
                json!([{"method": "email", "minutes": 900}])
            );
        }

        #[test]
        fn unreachable_absolute_reminder_is_an_error() {
            let at = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
            let event = Event::builder("x", date(2020, 1, 1))
                .with_reminder(Reminder::absolute(ReminderMethod::Email, u32::MAX, at))
                .build()
                .unwrap();
            let err = EventSerializer::encode(&event).unwrap_err();
            assert_eq!(err.as_domain().and_then(|e| e.field()), Some("days_before"));
        }

        #[test]
        fn conference_variants() {
            let solution = ConferenceSolution::new(vec![EntryPoint::video("https://meet.example.com/x")])
                .unwrap()
                .with_solution_type(SolutionType::HangoutsMeet);
            let event = Event::builder("Call", date(2020, 1, 6))
                .with_conference(solution)
                .build()
                .unwrap();
            assert_eq!(
                encode(&event)["conferenceData"]["conferenceSolution"],
                json!({"key": {"type": "hangoutsMeet"}})
            );

            let request = ConferenceSolutionCreateRequest::new(Some(SolutionType::HangoutsMeet))
                .with_request_id("r1");
            let event = Event::builder("Call", date(2020, 1, 6))
                .with_conference(request)
                .build()
                .unwrap();
            assert_eq!(
                encode(&event)["conferenceData"],
                json!({"createRequest": {"requestId": "r1", "conferenceSolutionKey": {"type": "hangoutsMeet"}}})
            );
        }

        #[test]
        fn extras_do_not_override_typed_keys() {
            let event = Event::builder("Real", date(2020, 1, 6))
                .with_extra("summary", json!("Fake"))
                .with_extra("creator", json!({"email": "x@example.com"}))
                .with_extra("iCalUID", json!("abc@example.com"))
                .build()
                .unwrap();
            let json = encode(&event);
            assert_eq!(json["summary"], "Real");
            assert_eq!(json["iCalUID"], "abc@example.com");
            assert!(json.get("creator").is_none());
        }
    }

    mod decode {
        use super::*;

        #[test]
        fn all_day() {
            let event = EventSerializer::decode(json!({
                "summary": "Breakfast",
                "start": {"date": "2019-09-28"},
                "end": {"date": "2019-09-29"},
            }))
            .unwrap();
            assert!(event.is_all_day());
            assert_eq!(event.timezone(), None);
            assert_eq!(*event.end(), EventTime::Date(date(2019, 9, 29)));
        }

        #[test]
        fn naive_times_use_start_zone() {
            let event = EventSerializer::decode(json!({
                "summary": "Planning",
                "start": {"dateTime": "2019-10-01T14:00:00", "timeZone": "Europe/Prague"},
                "end": {"dateTime": "2019-10-01T15:00:00"},
            }))
            .unwrap();
            assert_eq!(event.timezone(), Some("Europe/Prague"));
            assert_eq!(event.start().to_wire_string(), "2019-10-01T14:00:00+02:00");
            assert_eq!(event.end().to_wire_string(), "2019-10-01T15:00:00+02:00");
        }

        #[test]
        fn configured_zone_when_start_has_none() {
            let config = CodecConfig::default().with_default_timezone("America/New_York");
            let event = EventSerializer::decode_with(
                json!({"summary": "x", "start": {"dateTime": "2020-01-06T09:00:00"}}),
                &config,
            )
            .unwrap();
            assert_eq!(event.timezone(), Some("America/New_York"));
            assert_eq!(event.start().to_wire_string(), "2020-01-06T09:00:00-05:00");
            assert_eq!(event.end().to_wire_string(), "2020-01-06T10:00:00-05:00");
        }

        #[test]
        fn read_only_fields() {
            let event = EventSerializer::decode(json!({
                "summary": "x",
                "start": {"date": "2020-01-06"},
                "creator": {"email": "boss@example.com", "self": true},
                "organizer": {"email": "cal@group.example.com", "displayName": "Team"},
                "created": "2019-12-01T10:00:00.000Z",
                "updated": "2019-12-02T10:00:00Z",
                "recurringEventId": "base123",
            }))
            .unwrap();
            assert_eq!(event.creator.and_then(|p| p.is_self), Some(true));
            assert_eq!(event.organizer.and_then(|p| p.display_name).as_deref(), Some("Team"));
            assert_eq!(event.created.map(|c| c.to_rfc3339()).as_deref(), Some("2019-12-01T10:00:00+00:00"));
            assert!(event.updated.is_some());
            assert_eq!(event.recurring_event_id.as_deref(), Some("base123"));
        }

        #[test]
        fn unknown_keys_are_kept() {
            let event = EventSerializer::decode(json!({
                "summary": "x",
                "start": {"date": "2020-01-06"},
                "kind": "calendar#event",
                "etag": "\"3181161784712000\"",
                "htmlLink": null,
            }))
            .unwrap();
            assert_eq!(event.extra.len(), 2);
            assert_eq!(event.extra["kind"], "calendar#event");
        }

        #[test]
        fn reminders_and_guest_flags() {
            let event = EventSerializer::decode(json!({
                "summary": "x",
                "start": {"date": "2020-01-06"},
                "reminders": {"useDefault": false, "overrides": [{"method": "popup", "minutes": 10}]},
                "guestsCanSeeOtherGuests": false,
            }))
            .unwrap();
            assert!(!event.default_reminders());
            assert_eq!(event.reminders(), &[Reminder::popup(10)]);
            assert_eq!(event.guests_can_see_other_guests, Some(false));
            assert_eq!(event.guests_can_invite_others, None);
        }

        #[test]
        fn missing_start() {
            let err = EventSerializer::decode(json!({"summary": "x"})).unwrap_err();
            assert!(matches!(err, ProtocolError::MissingField { field: "start", .. }));
        }

        #[test]
        fn mixed_kinds_are_a_type_error() {
            let err = EventSerializer::decode(json!({
                "summary": "x",
                "start": {"date": "2020-01-06"},
                "end": {"dateTime": "2020-01-06T10:00:00Z"},
            }))
            .unwrap_err();
            assert!(err.as_domain().is_some_and(|e| e.is_type()));
        }

        #[test]
        fn not_an_object() {
            assert!(EventSerializer::decode(json!(["x"])).unwrap_err().is_shape());
        }
    }

    #[test]
    fn round_trip() {
        let event = Event::builder("Review", naive(2021, 6, 1, 9, 30))
            .with_timezone("Europe/London")
            .with_id("rev1")
            .with_attendee("ada@example.com")
            .with_email_reminder(30)
            .with_extra("iCalUID", json!("rev1@example.com"))
            .build()
            .unwrap();
        let json = EventSerializer::encode(&event).unwrap();
        assert_eq!(EventSerializer::decode(json).unwrap(), event);
    }
}
