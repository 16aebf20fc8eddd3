//! Free/busy query response wire format.
//!
//! A calendar or group that reports `errors` lands in the matching error
//! map; its busy ranges, if any, are not trusted.

use std::collections::BTreeSet;

use calwire_core::{CodecConfig, FreeBusy, FreeBusyError, TimeRange};
use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde_json::{Map, Value, json};

use crate::contract::{Fields, Serializer, WireObject, wire_object};
use crate::error::ProtocolResult;

pub struct FreeBusySerializer;

fn timestamp(dt: &DateTime<FixedOffset>) -> Value {
    json!(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

fn errors_to_json(errors: Option<&Vec<FreeBusyError>>) -> Value {
    match errors {
        Some(errors) if !errors.is_empty() => errors
            .iter()
            .map(|e| json!({"domain": e.domain, "reason": e.reason}))
            .collect(),
        _ => Value::Null,
    }
}

fn read_errors(f: &Fields<'_>) -> ProtocolResult<Vec<FreeBusyError>> {
    f.objects("errors")?
        .into_iter()
        .map(|error| -> ProtocolResult<FreeBusyError> {
            let error = Fields::new(FreeBusySerializer::TYPE_NAME, error);
            Ok(FreeBusyError::new(
                error.require_str("domain")?,
                error.require_str("reason")?,
            ))
        })
        .collect()
}

impl FreeBusySerializer {
    fn calendars_to_json(fb: &FreeBusy) -> Value {
        let ids: BTreeSet<&String> = fb.calendars.keys().chain(fb.calendars_errors.keys()).collect();
        let calendars: Map<String, Value> = ids
            .into_iter()
            .map(|id| {
                let busy: Vec<Value> = fb
                    .calendars
                    .get(id)
                    .into_iter()
                    .flatten()
                    .map(|r| json!({"start": timestamp(&r.start), "end": timestamp(&r.end)}))
                    .collect();
                let entry = wire_object([
                    ("busy", Value::Array(busy)),
                    ("errors", errors_to_json(fb.calendars_errors.get(id))),
                ]);
                (id.clone(), Value::Object(entry))
            })
            .collect();
        Value::Object(calendars)
    }

    fn groups_to_json(fb: &FreeBusy) -> Value {
        let names: BTreeSet<&String> = fb.groups.keys().chain(fb.groups_errors.keys()).collect();
        let groups: Map<String, Value> = names
            .into_iter()
            .map(|name| {
                let entry = wire_object([
                    ("calendars", json!(fb.groups.get(name).cloned().unwrap_or_default())),
                    ("errors", errors_to_json(fb.groups_errors.get(name))),
                ]);
                (name.clone(), Value::Object(entry))
            })
            .collect();
        Value::Object(groups)
    }
}

impl Serializer for FreeBusySerializer {
    type Target = FreeBusy;
    const TYPE_NAME: &'static str = "FreeBusy";
    const PARAM_NAME: &'static str = "free_busy";

    fn to_json(fb: &FreeBusy) -> ProtocolResult<WireObject> {
        Ok(wire_object([
            ("timeMin", timestamp(&fb.time_min)),
            ("timeMax", timestamp(&fb.time_max)),
            ("calendars", Self::calendars_to_json(fb)),
            ("groups", Self::groups_to_json(fb)),
        ]))
    }

    fn to_object_with(json: &WireObject, _config: &CodecConfig) -> ProtocolResult<FreeBusy> {
        let f = Fields::new(Self::TYPE_NAME, json);
        let mut fb = FreeBusy::new(f.require_timestamp("timeMin")?, f.require_timestamp("timeMax")?);

        for (id, calendar) in f.entries("calendars")? {
            let errors = read_errors(&calendar)?;
            if !errors.is_empty() {
                fb.calendars_errors.insert(id.to_string(), errors);
                continue;
            }
            let busy = calendar
                .objects("busy")?
                .into_iter()
                .map(|range| -> ProtocolResult<TimeRange> {
                    let range = Fields::new(Self::TYPE_NAME, range);
                    Ok(TimeRange::new(
                        range.require_timestamp("start")?,
                        range.require_timestamp("end")?,
                    )?)
                })
                .collect::<ProtocolResult<Vec<_>>>()?;
            fb.calendars.insert(id.to_string(), busy);
        }

        for (name, group) in f.entries("groups")? {
            let errors = read_errors(&group)?;
            let calendars = group.strings("calendars")?;
            if !calendars.is_empty() || errors.is_empty() {
                fb.groups.insert(name.to_string(), calendars);
            }
            if !errors.is_empty() {
                fb.groups_errors.insert(name.to_string(), errors);
            }
        }
        Ok(fb)
    }
}
