//! Conformance checks over every serializer in the crate.
//!
//! Call [`verify_registry`] once at startup; it is never run on the
//! encode/decode path.

use std::any::type_name;
use std::collections::HashSet;

use tracing::debug;

use crate::contract::Serializer;
use crate::error::{ProtocolError, ProtocolResult};
use crate::serializers::*;

/// What a serializer declares about itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializerDescriptor {
    pub serializer: &'static str,
    pub type_name: &'static str,
    pub param_name: &'static str,
    /// Full path of the Rust target type.
    pub target: &'static str,
}

impl SerializerDescriptor {
    pub fn of<S: Serializer>() -> Self {
        Self {
            serializer: short_name(type_name::<S>()),
            type_name: S::TYPE_NAME,
            param_name: S::PARAM_NAME,
            target: type_name::<S::Target>(),
        }
    }

    /// Checks the declared names against the target type.
    pub fn verify(&self) -> ProtocolResult<()> {
        let fail = |reason: String| ProtocolError::Conformance {
            serializer: self.serializer,
            reason,
        };
        if self.type_name.is_empty() {
            return Err(fail("declares an empty type name".into()));
        }
        if short_name(self.target) != self.type_name {
            return Err(fail(format!(
                "declares type {} but converts {}",
                self.type_name, self.target
            )));
        }
        let expected = snake_case(self.type_name);
        if self.param_name != expected {
            return Err(fail(format!(
                "parameter is named '{}', expected '{}'",
                self.param_name, expected
            )));
        }
        Ok(())
    }
}

/// Every concrete serializer.
pub fn registered_serializers() -> Vec<SerializerDescriptor> {
    vec![
        SerializerDescriptor::of::<AttachmentSerializer>(),
        SerializerDescriptor::of::<PersonSerializer>(),
        SerializerDescriptor::of::<AttendeeSerializer>(),
        SerializerDescriptor::of::<ReminderSerializer>(),
        SerializerDescriptor::of::<EntryPointSerializer>(),
        SerializerDescriptor::of::<ConferenceSolutionSerializer>(),
        SerializerDescriptor::of::<ConferenceSolutionCreateRequestSerializer>(),
        SerializerDescriptor::of::<ConferenceDataSerializer>(),
        SerializerDescriptor::of::<CalendarSerializer>(),
        SerializerDescriptor::of::<CalendarListEntrySerializer>(),
        SerializerDescriptor::of::<EventSerializer>(),
        SerializerDescriptor::of::<AccessControlRuleSerializer>(),
        SerializerDescriptor::of::<FreeBusySerializer>(),
        SerializerDescriptor::of::<SettingsSerializer>(),
    ]
}

/// Verifies every registered serializer, returning how many were checked.
pub fn verify_registry() -> ProtocolResult<usize> {
    let descriptors = registered_serializers();
    let mut seen = HashSet::new();
    for descriptor in &descriptors {
        descriptor.verify()?;
        if !seen.insert(descriptor.type_name) {
            return Err(ProtocolError::Conformance {
                serializer: descriptor.serializer,
                reason: format!("type {} is registered twice", descriptor.type_name),
            });
        }
    }
    debug!(count = descriptors.len(), "serializer registry verified");
    Ok(descriptors.len())
}

/// Last path segment of a type name.
fn short_name(path: &'static str) -> &'static str {
    path.rsplit("::").next().unwrap_or(path)
}

/// `ConferenceSolution` -> `conference_solution`.
fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
