//! Decoding of response bodies.
//!
//! The API is not consistent about how it shapes a successful response. A
//! listing endpoint may return a bare JSON array, or an object holding the
//! array under `data`. Single resources follow the same rule. Everything that
//! reads a response body goes through this module so callers only ever see the
//! payload.
use serde::de::DeserializeOwned;
use serde_json::Value;

/// The name of the member holding the payload in a wrapped response.
pub const DATA_FIELD: &str = "data";

/// A response body that could not be turned into the expected payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed response: {0}")]
pub struct MalformedResponse(pub String);

impl From<serde_json::Error> for MalformedResponse {
    fn from(value: serde_json::Error) -> Self {
        MalformedResponse(value.to_string())
    }
}

/// A type that can be extracted from a response body.
pub trait Payload: Sized {
    fn from_value(value: Value) -> Result<Self, MalformedResponse>;

    fn from_body(body: &[u8]) -> Result<Self, MalformedResponse> {
        Self::from_value(parse_body(body)?)
    }
}

impl<T: DeserializeOwned> Payload for Vec<T> {
    fn from_value(value: Value) -> Result<Self, MalformedResponse> {
        collection_from_value(value)
    }
}

/// Implements [`Payload`] for single (non-collection) response types.
#[macro_export]
macro_rules! impl_payload {
    ($($ty: ty),* $(,)?) => {
        $(
            impl $crate::envelope::Payload for $ty {
                fn from_value(
                    value: serde_json::Value,
                ) -> Result<Self, $crate::envelope::MalformedResponse> {
                    $crate::envelope::payload_from_value(value)
                }
            }
        )*
    };
}

fn parse_body(body: &[u8]) -> Result<Value, MalformedResponse> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(body)?)
}

fn shape_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Decode a single payload, unwrapping a `data` envelope when present.
pub fn payload_from_value<T: DeserializeOwned>(value: Value) -> Result<T, MalformedResponse> {
    let value = match value {
        Value::Object(mut map) if map.contains_key(DATA_FIELD) => {
            map.remove(DATA_FIELD).unwrap_or(Value::Null)
        }
        other => other,
    };
    Ok(serde_json::from_value(value)?)
}

/// Decode a collection. The body must be a list, or an object holding a list
/// under `data`.
pub fn collection_from_value<T: DeserializeOwned>(
    value: Value,
) -> Result<Vec<T>, MalformedResponse> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove(DATA_FIELD) {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(MalformedResponse(format!(
                    "expected a list under `{DATA_FIELD}`, found {}",
                    shape_of(&other)
                )))
            }
            None => {
                return Err(MalformedResponse(format!(
                    "expected a list or an object with `{DATA_FIELD}`, found an object without it"
                )))
            }
        },
        other => {
            return Err(MalformedResponse(format!(
                "expected a list, found {}",
                shape_of(&other)
            )))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item)
                .map_err(|e| MalformedResponse(format!("item {index}: {e}")))
        })
        .collect()
}

/// Decode a response body into a single payload.
pub fn decode_payload<T: DeserializeOwned>(body: &[u8]) -> Result<T, MalformedResponse> {
    payload_from_value(parse_body(body)?)
}

/// Decode a response body into a collection.
pub fn decode_collection<T: DeserializeOwned>(body: &[u8]) -> Result<Vec<T>, MalformedResponse> {
    collection_from_value(parse_body(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Named {
        name: String,
    }

    #[test]
    fn bare_and_wrapped_lists_decode_the_same() {
        let bare: Vec<Named> = decode_collection(br#"[{"name": "a"}, {"name": "b"}]"#).unwrap();
        let wrapped: Vec<Named> =
            decode_collection(br#"{"data": [{"name": "a"}, {"name": "b"}], "total": 2}"#)
                .unwrap();
        assert_eq!(bare, wrapped);
        assert_eq!(bare.len(), 2);
    }

    #[test]
    fn non_list_collection_is_malformed() {
        let err = decode_collection::<Named>(br#"{"name": "a"}"#).unwrap_err();
        assert!(err.0.contains("without it"), "{err}");

        let err = decode_collection::<Named>(br#"{"data": {"name": "a"}}"#).unwrap_err();
        assert_eq!(err.0, "expected a list under `data`, found an object");

        let err = decode_collection::<Named>(b"42").unwrap_err();
        assert_eq!(err.0, "expected a list, found a number");
    }

    #[test]
    fn bad_item_is_malformed() {
        let err = decode_collection::<Named>(br#"[{"name": "a"}, {"title": "b"}]"#).unwrap_err();
        assert!(err.0.starts_with("item 1:"), "{err}");
    }

    #[test]
    fn single_payload_unwraps_data() {
        let bare: Named = decode_payload(br#"{"name": "a"}"#).unwrap();
        let wrapped: Named = decode_payload(br#"{"data": {"name": "a"}}"#).unwrap();
        assert_eq!(bare, wrapped);
    }

    #[test]
    fn empty_body_is_null() {
        let unit: Option<Named> = decode_payload(b"  ").unwrap();
        assert_eq!(unit, None);
        assert!(decode_payload::<Named>(b"").is_err());
        assert!(decode_payload::<Named>(b"not json").is_err());
    }

    #[test]
    fn vec_payload_uses_collection_rules() {
        let items = <Vec<Named> as Payload>::from_body(br#"{"data": []}"#).unwrap();
        assert!(items.is_empty());
        assert!(<Vec<Named> as Payload>::from_body(br#"{"items": []}"#).is_err());
    }
}
