//! People: event creators, organizers and attendees.

use calwire_core::{Attendee, CodecConfig, Person};
use serde_json::json;

use crate::contract::{Fields, Serializer, WireObject, wire_object};
use crate::error::ProtocolResult;

/// Encodes `email` and `displayName`; `id` and `self` are read-only.
pub struct PersonSerializer;

impl PersonSerializer {
    fn read(f: &Fields<'_>) -> ProtocolResult<Person> {
        Ok(Person {
            email: f.str("email")?,
            display_name: f.str("displayName")?,
            profile_id: f.str("id")?,
            is_self: f.bool("self")?,
        })
    }
}

impl Serializer for PersonSerializer {
    type Target = Person;
    const TYPE_NAME: &'static str = "Person";
    const PARAM_NAME: &'static str = "person";

    fn to_json(person: &Person) -> ProtocolResult<WireObject> {
        Ok(wire_object([
            ("email", json!(person.email)),
            ("displayName", json!(person.display_name)),
        ]))
    }

    fn to_object_with(json: &WireObject, _config: &CodecConfig) -> ProtocolResult<Person> {
        Self::read(&Fields::new(Self::TYPE_NAME, json))
    }
}

pub struct AttendeeSerializer;

impl Serializer for AttendeeSerializer {
    type Target = Attendee;
    const TYPE_NAME: &'static str = "Attendee";
    const PARAM_NAME: &'static str = "attendee";

    fn to_json(attendee: &Attendee) -> ProtocolResult<WireObject> {
        let mut json = PersonSerializer::to_json(&attendee.person)?;
        json.extend(wire_object([
            ("comment", json!(attendee.comment)),
            ("optional", json!(attendee.optional)),
            ("resource", json!(attendee.is_resource)),
            ("additionalGuests", json!(attendee.additional_guests)),
            (
                "responseStatus",
                json!(attendee.response_status.map(|s| s.as_str())),
            ),
        ]));
        Ok(json)
    }

    /// Unlike a bare person, an attendee must carry `email`.
    fn to_object_with(json: &WireObject, _config: &CodecConfig) -> ProtocolResult<Attendee> {
        let f = Fields::new(Self::TYPE_NAME, json);
        f.require_str("email")?;
        Ok(Attendee {
            person: PersonSerializer::read(&f)?,
            comment: f.str("comment")?,
            optional: f.bool("optional")?,
            is_resource: f.bool("resource")?,
            additional_guests: f.u32("additionalGuests")?,
            response_status: f.parsed("responseStatus")?,
        })
    }
}
