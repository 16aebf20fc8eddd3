//! The serializer contract shared by every wire entity.
//!
//! A [`Serializer`] converts one domain type to and from a JSON object.
//! Implementors supply the two raw directions (`to_json`, `to_object_with`);
//! the provided methods add input-shape dispatch and null stripping.

use calwire_core::CodecConfig;
use chrono::{DateTime, FixedOffset};
use serde_json::{Map, Value};
use tracing::trace;

use crate::error::{ProtocolError, ProtocolResult};

/// A JSON object as it appears on the wire.
pub type WireObject = Map<String, Value>;

/// Anything a serializer can decode from.
#[derive(Debug, Clone, PartialEq)]
pub enum WireInput<T> {
    /// An already-decoded value, returned unchanged.
    Object(T),
    /// A parsed JSON value; must be an object.
    Json(Value),
    /// JSON text; must parse to an object.
    Text(String),
}

impl<T> From<Value> for WireInput<T> {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl<T> From<WireObject> for WireInput<T> {
    fn from(map: WireObject) -> Self {
        Self::Json(Value::Object(map))
    }
}

impl<T> From<String> for WireInput<T> {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl<T> From<&str> for WireInput<T> {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// Conversion between a domain type and its wire object.
pub trait Serializer {
    /// The domain type this serializer handles.
    type Target;

    /// Name of the domain type, as declared to the conformance check.
    const TYPE_NAME: &'static str;

    /// Name of the single value a serializer is applied to; the snake_case
    /// form of [`Self::TYPE_NAME`].
    const PARAM_NAME: &'static str;

    /// Builds the wire object. May contain `null` values; see [`Self::encode`].
    fn to_json(obj: &Self::Target) -> ProtocolResult<WireObject>;

    /// Extracts a domain value from a wire object.
    fn to_object_with(json: &WireObject, config: &CodecConfig) -> ProtocolResult<Self::Target>;

    fn to_object(json: &WireObject) -> ProtocolResult<Self::Target> {
        Self::to_object_with(json, &CodecConfig::default())
    }

    /// Encodes `obj` with every `null` removed.
    fn encode(obj: &Self::Target) -> ProtocolResult<WireObject> {
        let mut json = Self::to_json(obj)?;
        strip_nulls(&mut json);
        trace!(entity = Self::TYPE_NAME, keys = json.len(), "encoded");
        Ok(json)
    }

    /// Decodes from an object, JSON value or JSON text.
    fn decode(input: impl Into<WireInput<Self::Target>>) -> ProtocolResult<Self::Target> {
        Self::decode_with(input, &CodecConfig::default())
    }

    fn decode_with(
        input: impl Into<WireInput<Self::Target>>,
        config: &CodecConfig,
    ) -> ProtocolResult<Self::Target> {
        let value = match input.into() {
            WireInput::Object(obj) => return Ok(obj),
            WireInput::Json(value) => value,
            WireInput::Text(text) => serde_json::from_str(&text)?,
        };
        match value {
            Value::Object(map) => {
                trace!(entity = Self::TYPE_NAME, keys = map.len(), "decoding");
                Self::to_object_with(&map, config)
            }
            other => Err(ProtocolError::shape(Self::TYPE_NAME, &other)),
        }
    }

    fn decode_value(value: &Value) -> ProtocolResult<Self::Target> {
        Self::decode(value.clone())
    }

    fn decode_str(text: &str) -> ProtocolResult<Self::Target> {
        Self::decode(text)
    }
}

/// Removes `null` values from `map`, descending into nested objects and arrays.
pub fn strip_nulls(map: &mut WireObject) {
    map.retain(|_, v| !v.is_null());
    for value in map.values_mut() {
        strip_value(value);
    }
}

fn strip_value(value: &mut Value) {
    match value {
        Value::Object(map) => strip_nulls(map),
        Value::Array(items) => items.iter_mut().for_each(strip_value),
        _ => {}
    }
}

/// Builds a wire object from key/value pairs.
pub(crate) fn wire_object<I>(pairs: I) -> WireObject
where
    I: IntoIterator<Item = (&'static str, Value)>,
{
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

/// Encodes a list of values, or `null` for an empty list.
pub(crate) fn encode_list<S: Serializer>(items: &[S::Target]) -> ProtocolResult<Value> {
    if items.is_empty() {
        return Ok(Value::Null);
    }
    items
        .iter()
        .map(|item| S::to_json(item).map(Value::Object))
        .collect::<ProtocolResult<Vec<_>>>()
        .map(Value::Array)
}

/// Typed read access to the fields of one wire object.
///
/// `null` values are treated the same as absent keys.
pub(crate) struct Fields<'a> {
    entity: &'static str,
    map: &'a WireObject,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(entity: &'static str, map: &'a WireObject) -> Self {
        Self { entity, map }
    }

    pub(crate) fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    pub(crate) fn str(&self, key: &str) -> ProtocolResult<Option<String>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(ProtocolError::invalid_field(self.entity, key, "a string", other)),
        }
    }

    pub(crate) fn require_str(&self, key: &'static str) -> ProtocolResult<String> {
        self.str(key)?.ok_or(ProtocolError::MissingField {
            entity: self.entity,
            field: key,
        })
    }

    pub(crate) fn bool(&self, key: &str) -> ProtocolResult<Option<bool>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(ProtocolError::invalid_field(self.entity, key, "a boolean", other)),
        }
    }

    pub(crate) fn u32(&self, key: &str) -> ProtocolResult<Option<u32>> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| {
                    ProtocolError::invalid_field(self.entity, key, "a non-negative integer", value)
                }),
        }
    }

    pub(crate) fn require_u32(&self, key: &'static str) -> ProtocolResult<u32> {
        self.u32(key)?.ok_or(ProtocolError::MissingField {
            entity: self.entity,
            field: key,
        })
    }

    pub(crate) fn object(&self, key: &str) -> ProtocolResult<Option<&'a WireObject>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(Some(map)),
            Some(other) => Err(ProtocolError::invalid_field(self.entity, key, "an object", other)),
        }
    }

    /// Nested fields of `key`, or `None` when it is absent.
    pub(crate) fn nested(&self, key: &str) -> ProtocolResult<Option<Fields<'a>>> {
        Ok(self.object(key)?.map(|map| Fields::new(self.entity, map)))
    }

    /// The objects in the array under `key`; absent means empty.
    pub(crate) fn objects(&self, key: &str) -> ProtocolResult<Vec<&'a WireObject>> {
        match self.get(key) {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| match item {
                    Value::Object(map) => Ok(map),
                    other => Err(ProtocolError::invalid_field(
                        self.entity,
                        format!("{}[{}]", key, i),
                        "an object",
                        other,
                    )),
                })
                .collect(),
            Some(other) => Err(ProtocolError::invalid_field(self.entity, key, "an array", other)),
        }
    }

    /// The members of the object under `key` whose values are themselves
    /// objects, keyed by member name; absent means empty.
    pub(crate) fn entries(&self, key: &str) -> ProtocolResult<Vec<(&'a str, Fields<'a>)>> {
        let Some(map) = self.object(key)? else {
            return Ok(Vec::new());
        };
        map.iter()
            .map(|(name, value)| match value {
                Value::Object(inner) => Ok((name.as_str(), Fields::new(self.entity, inner))),
                other => Err(ProtocolError::invalid_field(
                    self.entity,
                    format!("{}.{}", key, name),
                    "an object",
                    other,
                )),
            })
            .collect()
    }

    /// The strings in the array under `key`; absent means empty.
    pub(crate) fn strings(&self, key: &str) -> ProtocolResult<Vec<String>> {
        match self.get(key) {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| match item {
                    Value::String(s) => Ok(s.clone()),
                    other => Err(ProtocolError::invalid_field(
                        self.entity,
                        format!("{}[{}]", key, i),
                        "a string",
                        other,
                    )),
                })
                .collect(),
            Some(other) => Err(ProtocolError::invalid_field(self.entity, key, "an array", other)),
        }
    }

    /// Decodes each object in the array under `key` with `S`.
    pub(crate) fn list<S: Serializer>(&self, key: &str, config: &CodecConfig) -> ProtocolResult<Vec<S::Target>> {
        self.objects(key)?
            .into_iter()
            .map(|map| S::to_object_with(map, config))
            .collect()
    }

    /// An RFC 3339 timestamp.
    pub(crate) fn timestamp(&self, key: &str) -> ProtocolResult<Option<DateTime<FixedOffset>>> {
        match self.get(key) {
            None => Ok(None),
            Some(value @ Value::String(s)) => DateTime::parse_from_rfc3339(s)
                .map(Some)
                .map_err(|_| ProtocolError::invalid_field(self.entity, key, "an RFC 3339 timestamp", value)),
            Some(other) => Err(ProtocolError::invalid_field(self.entity, key, "a string", other)),
        }
    }

    pub(crate) fn require_timestamp(&self, key: &'static str) -> ProtocolResult<DateTime<FixedOffset>> {
        self.timestamp(key)?.ok_or(ProtocolError::MissingField {
            entity: self.entity,
            field: key,
        })
    }

    /// Parses a string field with `FromStr`, mapping failures to domain errors.
    pub(crate) fn parsed<T>(&self, key: &str) -> ProtocolResult<Option<T>>
    where
        T: std::str::FromStr<Err = calwire_core::CalendarError>,
    {
        match self.str(key)? {
            None => Ok(None),
            Some(s) => Ok(Some(s.parse::<T>()?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Pair;

    /// Minimal serializer used to exercise the provided methods.
    impl Serializer for Pair {
        type Target = (String, u32);
        const TYPE_NAME: &'static str = "Pair";
        const PARAM_NAME: &'static str = "pair";

        fn to_json(obj: &Self::Target) -> ProtocolResult<WireObject> {
            Ok(wire_object([
                ("name", json!(obj.0)),
                ("count", json!(obj.1)),
                ("note", Value::Null),
            ]))
        }

        fn to_object_with(json: &WireObject, _: &CodecConfig) -> ProtocolResult<Self::Target> {
            let f = Fields::new(Self::TYPE_NAME, json);
            Ok((f.require_str("name")?, f.require_u32("count")?))
        }
    }

    mod decode {
        use super::*;

        #[test]
        fn object_is_returned_unchanged() {
            let pair = ("a".to_string(), 1);
            assert_eq!(Pair::decode(WireInput::Object(pair.clone())).unwrap(), pair);
        }

        #[test]
        fn from_value_and_text() {
            let expected = ("a".to_string(), 2);
            assert_eq!(Pair::decode(json!({"name": "a", "count": 2})).unwrap(), expected);
            assert_eq!(Pair::decode_str(r#"{"name": "a", "count": 2}"#).unwrap(), expected);
        }

        #[test]
        fn non_object_is_a_shape_error() {
            assert!(Pair::decode(json!(42)).unwrap_err().is_shape());
            assert!(Pair::decode_str("[1, 2]").unwrap_err().is_shape());
            assert!(Pair::decode_value(&json!("{\"name\": \"a\"}")).unwrap_err().is_shape());
        }

        #[test]
        fn bad_text_is_a_json_error() {
            assert!(matches!(Pair::decode_str("{nope"), Err(ProtocolError::Json(_))));
        }

        #[test]
        fn missing_and_mistyped_fields() {
            assert!(matches!(
                Pair::decode(json!({"name": "a"})),
                Err(ProtocolError::MissingField { field: "count", .. })
            ));
            assert!(matches!(
                Pair::decode(json!({"name": "a", "count": -1})),
                Err(ProtocolError::InvalidField { .. })
            ));
        }
    }

    #[test]
    fn encode_strips_nulls() {
        let json = Pair::encode(&("a".to_string(), 3)).unwrap();
        assert_eq!(Value::Object(json), json!({"name": "a", "count": 3}));
    }

    #[test]
    fn strip_nulls_descends() {
        let mut map = wire_object([
            ("a", json!({"b": null, "c": 1})),
            ("d", json!([{"e": null}])),
            ("f", Value::Null),
        ]);
        strip_nulls(&mut map);
        assert_eq!(Value::Object(map), json!({"a": {"c": 1}, "d": [{}]}));
    }

    #[test]
    fn fields_treat_null_as_absent() {
        let map = wire_object([("x", Value::Null), ("list", json!(["a", "b"]))]);
        let f = Fields::new("Test", &map);
        assert!(f.get("x").is_none());
        assert_eq!(f.str("x").unwrap(), None);
        assert_eq!(f.strings("list").unwrap(), vec!["a", "b"]);
        assert!(f.objects("missing").unwrap().is_empty());
        assert!(f.entries("missing").unwrap().is_empty());
    }

    #[test]
    fn entries_must_be_objects() {
        let map = wire_object([("by_id", json!({"a": {"n": 1}, "b": 2}))]);
        let err = Fields::new("Test", &map).entries("by_id").err().unwrap();
        assert!(matches!(err, ProtocolError::InvalidField { ref field, .. } if field == "by_id.b"));
    }
}
