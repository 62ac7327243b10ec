use crate::types::ResourceId;
use serde::{Deserialize, Serialize};

/// An authenticated account.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: ResourceId,
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
}

crate::impl_payload!(User);
