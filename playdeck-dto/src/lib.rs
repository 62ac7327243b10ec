pub mod auth;
pub mod bookings;
pub mod client;
pub mod consoles;
pub mod dashboard;
pub mod diagnostics;
pub mod envelope;
pub mod error;
pub mod events;
pub mod games;
pub mod params;
pub mod types;
pub mod user;

pub use error::JsonError;

/// The expected response of an end point whose body is not used. Accepts any
/// JSON value, including an empty body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Ok;

impl<'de> serde::Deserialize<'de> for Ok {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde::de::IgnoredAny::deserialize(deserializer)?;
        Result::Ok(Ok)
    }
}

impl envelope::Payload for Ok {
    fn from_value(_value: serde_json::Value) -> Result<Self, envelope::MalformedResponse> {
        Result::Ok(Ok)
    }

    fn from_body(_body: &[u8]) -> Result<Self, envelope::MalformedResponse> {
        Result::Ok(Ok)
    }
}
