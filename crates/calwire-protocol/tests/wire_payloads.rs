//! End-to-end checks against payloads shaped like real service responses.

use calwire_core::{
    CodecConfig, ConferenceData, CreateRequestStatus, Event, EventTime, Frequency, Recurrence,
    RecurrenceRule, ResponseStatus, Weekday,
};
use calwire_protocol::{
    AccessControlRuleSerializer, AttachmentSerializer, CalendarListEntrySerializer,
    CalendarSerializer, ConferenceDataSerializer, EventSerializer, ReminderSerializer, Serializer,
    WireInput, verify_registry,
};
use chrono::NaiveDate;
use serde_json::{Value, json};

const FETCHED_EVENT: &str = r#"{
  "kind": "calendar#event",
  "etag": "\"3181161784712000\"",
  "id": "4ug1v2bsd0m7trb2hc5il6q3sd",
  "status": "confirmed",
  "htmlLink": "https://calendar.example.com/event?eid=NHVnMXYy",
  "created": "2020-05-28T09:01:12.000Z",
  "updated": "2020-05-28T09:01:12.356Z",
  "summary": "Sprint review",
  "creator": {"email": "ada@example.com", "self": true},
  "organizer": {"email": "ada@example.com", "self": true},
  "start": {"dateTime": "2020-06-02T15:00:00+02:00", "timeZone": "Europe/Prague"},
  "end": {"dateTime": "2020-06-02T16:00:00+02:00", "timeZone": "Europe/Prague"},
  "recurrence": ["RRULE:FREQ=WEEKLY;BYDAY=TU;WKST=SU"],
  "iCalUID": "4ug1v2bsd0m7trb2hc5il6q3sd@example.com",
  "sequence": 0,
  "attendees": [
    {"email": "ada@example.com", "organizer": true, "self": true, "responseStatus": "accepted"},
    {"email": "bob@example.com", "responseStatus": "needsAction"}
  ],
  "conferenceData": {
    "createRequest": {
      "requestId": "7qxalsvy0e",
      "conferenceSolutionKey": {"type": "hangoutsMeet"},
      "status": {"statusCode": "pending"}
    }
  },
  "reminders": {"useDefault": true}
}"#;

#[test]
fn fetched_event_decodes() {
    let event = EventSerializer::decode_str(FETCHED_EVENT).unwrap();

    assert_eq!(event.id(), Some("4ug1v2bsd0m7trb2hc5il6q3sd"));
    assert_eq!(event.timezone(), Some("Europe/Prague"));
    assert!(event.default_reminders());
    assert_eq!(event.attendees.len(), 2);
    assert_eq!(event.attendees[1].response_status, Some(ResponseStatus::NeedsAction));
    assert_eq!(event.attendees[0].person.is_self, Some(true));
    assert!(matches!(
        event.conference_data,
        Some(ConferenceData::CreateRequest(ref r)) if r.status == Some(CreateRequestStatus::Pending)
    ));
    assert_eq!(event.extra["sequence"], 0);
    assert_eq!(event.extra["status"], "confirmed");
}

#[test]
fn fetched_event_survives_an_update() {
    let mut event = EventSerializer::decode_str(FETCHED_EVENT).unwrap();
    event.summary = "Sprint review (moved)".to_string();

    let json = Value::Object(EventSerializer::encode(&event).unwrap());
    assert_eq!(json["summary"], "Sprint review (moved)");
    assert_eq!(json["iCalUID"], "4ug1v2bsd0m7trb2hc5il6q3sd@example.com");
    assert_eq!(json["etag"], "\"3181161784712000\"");
    assert_eq!(json["start"], json!({"dateTime": "2020-06-02T15:00:00+02:00", "timeZone": "Europe/Prague"}));
    assert_eq!(
        json["conferenceData"]["createRequest"]["status"],
        json!({"statusCode": "pending"})
    );
    for read_only in ["creator", "organizer", "created", "updated"] {
        assert!(json.get(read_only).is_none(), "{} was encoded", read_only);
    }
}

/// Decodes `payload` with `S` and encodes the result again.
fn re_encode<S: Serializer>(payload: &Value) -> Value {
    let decoded = S::decode(payload.clone()).unwrap();
    Value::Object(S::encode(&decoded).unwrap())
}

/// `payload` with the given top-level keys removed.
fn without(mut payload: Value, keys: &[&str]) -> Value {
    if let Some(map) = payload.as_object_mut() {
        for key in keys {
            map.remove(*key);
        }
    }
    payload
}

mod round_trips {
    use super::*;

    #[test]
    fn fetched_event_minus_read_only_keys() {
        let fetched: Value = serde_json::from_str(FETCHED_EVENT).unwrap();
        let mut expected = without(fetched.clone(), &["creator", "organizer", "created", "updated"]);
        for attendee in expected["attendees"].as_array_mut().unwrap() {
            let attendee = attendee.as_object_mut().unwrap();
            attendee.remove("self");
            attendee.remove("organizer");
        }
        expected["visibility"] = json!("default");

        assert_eq!(re_encode::<EventSerializer>(&fetched), expected);
    }

    #[test]
    fn all_day_event_with_overrides() {
        let payload = json!({
            "id": "birthday2019",
            "summary": "Birthday",
            "start": {"date": "2019-09-28"},
            "end": {"date": "2019-09-29"},
            "visibility": "private",
            "transparency": "transparent",
            "reminders": {
                "useDefault": false,
                "overrides": [{"method": "popup", "minutes": 600}],
            },
            "guestsCanInviteOthers": false,
        });
        assert_eq!(re_encode::<EventSerializer>(&payload), payload);
    }

    #[test]
    fn attachment() {
        let payload = json!({
            "fileUrl": "https://docs.example.com/document/d/1",
            "title": "Agenda",
            "mimeType": "application/vnd.google-apps.document",
            "iconLink": "https://docs.example.com/icons/doc.png",
            "fileId": "1",
        });
        assert_eq!(re_encode::<AttachmentSerializer>(&payload), payload);
    }

    #[test]
    fn reminder() {
        let payload = json!({"method": "email", "minutes": 1440});
        assert_eq!(re_encode::<ReminderSerializer>(&payload), payload);
    }

    #[test]
    fn conference_create_request() {
        let payload = json!({
            "createRequest": {
                "requestId": "7qxalsvy0e",
                "conferenceSolutionKey": {"type": "hangoutsMeet"},
                "status": {"statusCode": "pending"},
            },
        });
        assert_eq!(re_encode::<ConferenceDataSerializer>(&payload), payload);
    }

    #[test]
    fn conference_solution() {
        let payload = json!({
            "entryPoints": [
                {
                    "entryPointType": "video",
                    "uri": "https://meet.example.com/abc-defg-hij",
                    "label": "meet.example.com/abc-defg-hij",
                },
                {"entryPointType": "phone", "uri": "tel:+1-555-0100", "pin": "123456"},
                {"entryPointType": "more", "uri": "https://tel.meet.example.com/abc-defg-hij"},
            ],
            "conferenceSolution": {
                "key": {"type": "hangoutsMeet"},
                "name": "Meet",
                "iconUri": "https://meet.example.com/icon.png",
            },
            "conferenceId": "abc-defg-hij",
            "signature": "AGirE/J",
        });
        assert_eq!(re_encode::<ConferenceDataSerializer>(&payload), payload);
    }

    #[test]
    fn calendar() {
        let payload = json!({
            "id": "team@group.example.com",
            "summary": "Team",
            "description": "Shared team calendar",
            "location": "Brno",
            "timeZone": "Europe/Prague",
            "conferenceProperties": {"allowedConferenceSolutionTypes": ["hangoutsMeet"]},
        });
        assert_eq!(re_encode::<CalendarSerializer>(&payload), payload);
    }

    #[test]
    fn calendar_list_entry_minus_read_only_keys() {
        let payload = json!({
            "id": "team@group.example.com",
            "summary": "Team",
            "timeZone": "Europe/Prague",
            "summaryOverride": "My team",
            "colorId": "7",
            "backgroundColor": "#42d692",
            "foregroundColor": "#000000",
            "hidden": false,
            "selected": true,
            "accessRole": "writer",
            "defaultReminders": [{"method": "popup", "minutes": 10}],
            "notificationSettings": {
                "notifications": [{"type": "eventChange", "method": "email"}]
            },
        });
        let expected = without(payload.clone(), &["summary", "timeZone", "accessRole"]);
        assert_eq!(re_encode::<CalendarListEntrySerializer>(&payload), expected);
    }

    #[test]
    fn access_control_rule() {
        let payload = json!({
            "id": "domain:example.com",
            "scope": {"type": "domain", "value": "example.com"},
            "role": "reader",
        });
        assert_eq!(re_encode::<AccessControlRuleSerializer>(&payload), payload);
    }
}

#[test]
fn recurrence_lines_travel_with_the_event() {
    let start = NaiveDate::from_ymd_opt(2020, 6, 2).unwrap();
    let until: EventTime = NaiveDate::from_ymd_opt(2020, 8, 25).unwrap().into();
    let rule = RecurrenceRule::new(Frequency::Weekly)
        .with_by_week_day(Weekday::Tuesday)
        .with_until(until);
    let holiday: Vec<EventTime> = vec![NaiveDate::from_ymd_opt(2020, 7, 7).unwrap().into()];

    let event = Event::builder("Sprint review", start)
        .with_recurrence(vec![
            Recurrence::rule(&rule).unwrap(),
            Recurrence::exclude_dates(&holiday).unwrap(),
        ])
        .build()
        .unwrap();

    let json = Value::Object(EventSerializer::encode(&event).unwrap());
    assert_eq!(
        json["recurrence"],
        json!([
            "RRULE:FREQ=WEEKLY;UNTIL=20200825T000000Z;BYDAY=TU;WKST=SU",
            "EXDATE;VALUE=DATE:20200707",
        ])
    );
    let decoded = EventSerializer::decode(json).unwrap();
    assert_eq!(decoded.recurrence, event.recurrence);
}

#[test]
fn input_shapes() {
    let event = EventSerializer::decode_str(FETCHED_EVENT).unwrap();
    let same = EventSerializer::decode(WireInput::Object(event.clone())).unwrap();
    assert_eq!(same, event);

    assert!(EventSerializer::decode(json!(null)).unwrap_err().is_shape());
    assert!(EventSerializer::decode("\"just a string\"").unwrap_err().is_shape());
}

#[test]
fn strict_config_applies_to_nested_attachments() {
    let config = CodecConfig::default().with_strict_mime_types(true);
    let payload = json!({
        "summary": "x",
        "start": {"date": "2020-06-02"},
        "attachments": [{"fileUrl": "https://example.com/a.zip", "mimeType": "application/zip"}],
    });
    assert!(EventSerializer::decode_with(payload.clone(), &CodecConfig::default()).is_ok());
    assert!(EventSerializer::decode_with(payload, &config).is_err());
}

#[test]
fn registry_verifies() {
    assert_eq!(verify_registry().unwrap(), 14);
}
