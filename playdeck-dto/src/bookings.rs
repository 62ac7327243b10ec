use crate::params::PagingParams;
use crate::types::{PlatformType, ResourceId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, EnumString, Display)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

/// A reserved session on a console.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: ResourceId,
    #[serde(alias = "console_id")]
    pub console_id: ResourceId,
    #[serde(default, alias = "game_id")]
    pub game_id: Option<ResourceId>,
    #[serde(alias = "customer_name")]
    pub customer_name: String,
    #[serde(alias = "customer_email")]
    pub customer_email: String,
    #[serde(default, alias = "customer_phone")]
    pub customer_phone: Option<String>,
    #[serde(alias = "starts_at", alias = "startTime")]
    pub starts_at: DateTime<Utc>,
    #[serde(alias = "ends_at", alias = "endTime")]
    pub ends_at: DateTime<Utc>,
    #[serde(default = "default_players")]
    pub players: u32,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default, alias = "total_price")]
    pub total_price: Option<f64>,
}

fn default_players() -> u32 {
    1
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BookingStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub console_id: Option<ResourceId>,

    #[serde(flatten)]
    pub paging: PagingParams,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCreateRequest<'a> {
    pub console_id: ResourceId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_id: Option<ResourceId>,
    pub customer_name: &'a str,
    pub customer_email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<&'a str>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub players: u32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BookingStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub players: Option<u32>,
}

/// A time window to check before booking. Either a specific console, or any
/// console of a platform.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub console_id: Option<ResourceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<PlatformType>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResult {
    #[serde(alias = "is_available", alias = "isAvailable")]
    pub available: bool,

    /// Consoles free for the whole window.
    #[serde(default, alias = "available_consoles")]
    pub available_consoles: Vec<ResourceId>,

    #[serde(default)]
    pub message: Option<String>,
}

crate::impl_payload!(Booking, AvailabilityResult);
