use crate::params::PagingParams;
use crate::types::{PlatformType, ResourceId};
use serde::{Deserialize, Serialize};

/// A rentable console station.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Console {
    pub id: ResourceId,
    pub name: String,
    #[serde(alias = "console_type", alias = "type")]
    pub platform: PlatformType,
    #[serde(default)]
    pub description: String,

    /// Price of one hour of play.
    #[serde(default, alias = "hourly_rate", alias = "pricePerHour")]
    pub hourly_rate: f64,

    /// Whether the console can currently be booked.
    #[serde(default = "default_available", alias = "is_available", alias = "isAvailable")]
    pub available: bool,

    #[serde(default, alias = "image_url", alias = "image")]
    pub image_url: Option<String>,
}

fn default_available() -> bool {
    true
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ConsoleListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<PlatformType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,

    #[serde(flatten)]
    pub paging: PagingParams,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleCreateRequest<'a> {
    pub name: &'a str,
    pub platform: PlatformType,
    pub description: &'a str,
    pub hourly_rate: f64,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<&'a str>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleUpdateRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<PlatformType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<&'a str>,
}

crate::impl_payload!(Console);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_defaults_to_available() {
        let console: Console = serde_json::from_value(serde_json::json!({
            "id": 1,
            "name": "Station 1",
            "type": "ps5",
            "pricePerHour": 12.5
        }))
        .unwrap();
        assert!(console.available);
        assert_eq!(console.hourly_rate, 12.5);
        assert_eq!(console.platform, PlatformType::Ps5);
    }
}
