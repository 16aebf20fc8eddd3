//! Access control rule wire format.

use calwire_core::{AccessControlRule, AclRole, AclScope, CodecConfig};
use serde_json::{Value, json};

use crate::contract::{Fields, Serializer, WireObject, wire_object};
use crate::error::{ProtocolError, ProtocolResult};

/// `{"id"?, "scope": {"type", "value"?}, "role"}`.
pub struct AccessControlRuleSerializer;

impl Serializer for AccessControlRuleSerializer {
    type Target = AccessControlRule;
    const TYPE_NAME: &'static str = "AccessControlRule";
    const PARAM_NAME: &'static str = "access_control_rule";

    fn to_json(rule: &AccessControlRule) -> ProtocolResult<WireObject> {
        let scope = wire_object([
            ("type", json!(rule.scope.type_str())),
            ("value", json!(rule.scope.value())),
        ]);
        Ok(wire_object([
            ("id", json!(rule.id)),
            ("scope", Value::Object(scope)),
            ("role", json!(rule.role.as_str())),
        ]))
    }

    fn to_object_with(json: &WireObject, _config: &CodecConfig) -> ProtocolResult<AccessControlRule> {
        let f = Fields::new(Self::TYPE_NAME, json);
        let scope = f.nested("scope")?.ok_or(ProtocolError::MissingField {
            entity: Self::TYPE_NAME,
            field: "scope",
        })?;
        let scope = AclScope::from_parts(&scope.require_str("type")?, scope.str("value")?)?;
        let role: AclRole = f.require_str("role")?.parse()?;

        let mut rule = AccessControlRule::new(role, scope);
        rule.id = f.str("id")?;
        Ok(rule)
    }
}
