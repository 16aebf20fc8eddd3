//! Conference data: resolved solutions and pending create requests.
//!
//! Both shapes share `conferenceData` on an event. Which one a payload holds
//! is decided once, by [`ConferenceTag::classify`], before any field is read.

use calwire_core::{
    CodecConfig, ConferenceData, ConferenceSolution, ConferenceSolutionCreateRequest,
    CreateRequestStatus, EntryPoint, EntryPointType, SolutionType,
};
use serde_json::{Value, json};
use tracing::debug;

use crate::contract::{Fields, Serializer, WireObject, encode_list, wire_object};
use crate::error::{ProtocolError, ProtocolResult};

pub struct EntryPointSerializer;

impl Serializer for EntryPointSerializer {
    type Target = EntryPoint;
    const TYPE_NAME: &'static str = "EntryPoint";
    const PARAM_NAME: &'static str = "entry_point";

    fn to_json(ep: &EntryPoint) -> ProtocolResult<WireObject> {
        Ok(wire_object([
            ("entryPointType", json!(ep.entry_point_type.as_str())),
            ("uri", json!(ep.uri)),
            ("label", json!(ep.label)),
            ("pin", json!(ep.pin)),
            ("accessCode", json!(ep.access_code)),
            ("meetingCode", json!(ep.meeting_code)),
            ("passcode", json!(ep.passcode)),
            ("password", json!(ep.password)),
        ]))
    }

    fn to_object_with(json: &WireObject, _config: &CodecConfig) -> ProtocolResult<EntryPoint> {
        let f = Fields::new(Self::TYPE_NAME, json);
        let entry_point_type: EntryPointType = f.require_str("entryPointType")?.parse()?;
        let ep = EntryPoint {
            uri: f.str("uri")?,
            label: f.str("label")?,
            pin: f.str("pin")?,
            access_code: f.str("accessCode")?,
            meeting_code: f.str("meetingCode")?,
            passcode: f.str("passcode")?,
            password: f.str("password")?,
            ..EntryPoint::new(entry_point_type)
        };
        ep.validate()?;
        Ok(ep)
    }
}

/// `{"type": key}`, or `null` when no solution type is set.
fn solution_key(solution_type: Option<&SolutionType>) -> Value {
    solution_type.map_or(Value::Null, |t| json!({"type": t.as_str()}))
}

fn read_solution_key(f: &Fields<'_>, key: &str) -> ProtocolResult<Option<SolutionType>> {
    let Some(key) = f.nested(key)? else {
        return Ok(None);
    };
    Ok(key.str("type")?.as_deref().map(SolutionType::from))
}

pub struct ConferenceSolutionSerializer;

impl Serializer for ConferenceSolutionSerializer {
    type Target = ConferenceSolution;
    const TYPE_NAME: &'static str = "ConferenceSolution";
    const PARAM_NAME: &'static str = "conference_solution";

    fn to_json(solution: &ConferenceSolution) -> ProtocolResult<WireObject> {
        let details = wire_object([
            ("key", solution_key(solution.solution_type.as_ref())),
            ("name", json!(solution.name)),
            ("iconUri", json!(solution.icon_uri)),
        ]);
        let details = if details.values().all(Value::is_null) {
            Value::Null
        } else {
            Value::Object(details)
        };
        Ok(wire_object([
            (
                "entryPoints",
                encode_list::<EntryPointSerializer>(solution.entry_points())?,
            ),
            ("conferenceSolution", details),
            (
                "createRequest",
                solution
                    .create_request
                    .as_ref()
                    .map_or(Value::Null, |r| Value::Object(create_block(r))),
            ),
            ("conferenceId", json!(solution.conference_id)),
            ("signature", json!(solution.signature)),
            ("notes", json!(solution.notes())),
        ]))
    }

    fn to_object_with(json: &WireObject, config: &CodecConfig) -> ProtocolResult<ConferenceSolution> {
        let f = Fields::new(Self::TYPE_NAME, json);
        let entry_points = f.list::<EntryPointSerializer>("entryPoints", config)?;
        let mut solution = ConferenceSolution::new(entry_points)?;

        if let Some(details) = f.nested("conferenceSolution")? {
            solution.solution_type = read_solution_key(&details, "key")?;
            solution.name = details.str("name")?;
            solution.icon_uri = details.str("iconUri")?;
        }
        if let Some(create) = f.nested("createRequest")? {
            solution.create_request = Some(read_create_block(&create)?);
        }
        solution.conference_id = f.str("conferenceId")?;
        solution.signature = f.str("signature")?;
        if let Some(notes) = f.str("notes")? {
            solution = solution.with_notes(notes)?;
        }
        Ok(solution)
    }
}

pub struct ConferenceSolutionCreateRequestSerializer;

impl Serializer for ConferenceSolutionCreateRequestSerializer {
    type Target = ConferenceSolutionCreateRequest;
    const TYPE_NAME: &'static str = "ConferenceSolutionCreateRequest";
    const PARAM_NAME: &'static str = "conference_solution_create_request";

    fn to_json(request: &ConferenceSolutionCreateRequest) -> ProtocolResult<WireObject> {
        Ok(wire_object([
            ("createRequest", Value::Object(create_block(request))),
            ("conferenceId", json!(request.conference_id)),
            ("signature", json!(request.signature)),
            ("notes", json!(request.notes())),
        ]))
    }

    /// A missing `requestId` gets a fresh one.
    fn to_object_with(
        json: &WireObject,
        _config: &CodecConfig,
    ) -> ProtocolResult<ConferenceSolutionCreateRequest> {
        let f = Fields::new(Self::TYPE_NAME, json);
        let create = f.nested("createRequest")?.ok_or(ProtocolError::MissingField {
            entity: Self::TYPE_NAME,
            field: "createRequest",
        })?;

        let mut request = read_create_block(&create)?;
        request.conference_id = f.str("conferenceId")?;
        request.signature = f.str("signature")?;
        if let Some(notes) = f.str("notes")? {
            request = request.with_notes(notes)?;
        }
        Ok(request)
    }
}

/// The inner `createRequest` object: request id, solution key and status.
fn create_block(request: &ConferenceSolutionCreateRequest) -> WireObject {
    wire_object([
        ("requestId", json!(request.request_id)),
        (
            "conferenceSolutionKey",
            solution_key(request.solution_type.as_ref()),
        ),
        (
            "status",
            request
                .status
                .as_ref()
                .map_or(Value::Null, |s| json!({"statusCode": s.as_str()})),
        ),
    ])
}

/// A missing `requestId` gets a fresh one.
fn read_create_block(create: &Fields<'_>) -> ProtocolResult<ConferenceSolutionCreateRequest> {
    let mut request =
        ConferenceSolutionCreateRequest::new(read_solution_key(create, "conferenceSolutionKey")?);
    if let Some(request_id) = create.str("requestId")? {
        request = request.with_request_id(request_id);
    }
    request.status = status_code(create)?.as_deref().map(CreateRequestStatus::from);
    Ok(request)
}

fn status_code(create: &Fields<'_>) -> ProtocolResult<Option<String>> {
    match create.nested("status")? {
        Some(status) => status.str("statusCode"),
        None => Ok(None),
    }
}

/// Which conference shape a `conferenceData` payload holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConferenceTag {
    Solution,
    CreateRequest,
}

impl ConferenceTag {
    /// A `createRequest` that has not succeeded yet is still a request;
    /// anything else is read as a resolved solution.
    pub fn classify(json: &WireObject) -> ProtocolResult<Self> {
        let f = Fields::new(ConferenceDataSerializer::TYPE_NAME, json);
        let Some(create) = f.nested("createRequest")? else {
            return Ok(Self::Solution);
        };
        let status = status_code(&create)?;
        let tag = if status.as_deref() == Some("success") {
            Self::Solution
        } else {
            Self::CreateRequest
        };
        debug!(?status, ?tag, "classified conference data");
        Ok(tag)
    }
}

/// Dispatches on the [`ConferenceData`] variant.
pub struct ConferenceDataSerializer;

impl Serializer for ConferenceDataSerializer {
    type Target = ConferenceData;
    const TYPE_NAME: &'static str = "ConferenceData";
    const PARAM_NAME: &'static str = "conference_data";

    fn to_json(data: &ConferenceData) -> ProtocolResult<WireObject> {
        match data {
            ConferenceData::Solution(s) => ConferenceSolutionSerializer::to_json(s),
            ConferenceData::CreateRequest(r) => ConferenceSolutionCreateRequestSerializer::to_json(r),
        }
    }

    fn to_object_with(json: &WireObject, config: &CodecConfig) -> ProtocolResult<ConferenceData> {
        Ok(match ConferenceTag::classify(json)? {
            ConferenceTag::Solution => ConferenceSolutionSerializer::to_object_with(json, config)?.into(),
            ConferenceTag::CreateRequest => {
                ConferenceSolutionCreateRequestSerializer::to_object_with(json, config)?.into()
            }
        })
    }
}
