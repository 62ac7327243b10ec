use serde::{Deserialize, Serialize};

/// Aggregate figures for the admin dashboard.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    #[serde(alias = "total_bookings")]
    pub total_bookings: u64,
    #[serde(alias = "active_bookings")]
    pub active_bookings: u64,
    #[serde(alias = "total_revenue")]
    pub total_revenue: f64,
    #[serde(alias = "total_games")]
    pub total_games: u64,
    #[serde(alias = "total_consoles")]
    pub total_consoles: u64,
    #[serde(alias = "upcoming_events")]
    pub upcoming_events: u64,
}

crate::impl_payload!(DashboardStats);
