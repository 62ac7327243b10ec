use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumString};

/// The console family a game runs on, or a console belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum PlatformType {
    Ps5,
    Ps4,
    Ps3,
}

/// An identifier as the API hands it out. Depending on the collection this is
/// either a number or an opaque string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Int(i64),
    Text(String),
}

impl ResourceId {
    /// Parse a user-provided identifier. Anything that looks like an integer
    /// is treated as one.
    pub fn parse(value: &str) -> Self {
        match value.parse::<i64>() {
            Ok(id) => ResourceId::Int(id),
            Err(_) => ResourceId::Text(value.to_string()),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ResourceId::Int(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResourceId::Text(id) => Some(id),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Int(id) => write!(f, "{id}"),
            ResourceId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for ResourceId {
    fn from(id: i64) -> Self {
        ResourceId::Int(id)
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        ResourceId::Text(id.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(id: String) -> Self {
        ResourceId::Text(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn resource_id_parses_numbers_first() {
        assert_eq!(ResourceId::parse("42"), ResourceId::Int(42));
        assert_eq!(
            ResourceId::parse("k9x2m1"),
            ResourceId::Text("k9x2m1".to_string())
        );
        assert_eq!(ResourceId::parse("42").to_string(), "42");
    }

    #[test]
    fn resource_id_is_untagged_on_the_wire() {
        let ids: Vec<ResourceId> = serde_json::from_str(r#"[7, "abc"]"#).unwrap();
        assert_eq!(ids, vec![ResourceId::Int(7), ResourceId::from("abc")]);
    }

    #[test]
    fn platform_type_string_forms() {
        assert_eq!(PlatformType::Ps5.to_string(), "ps5");
        assert_eq!(PlatformType::from_str("PS4").unwrap(), PlatformType::Ps4);
        assert_eq!(
            serde_json::to_string(&PlatformType::Ps3).unwrap(),
            r#""ps3""#
        );
    }
}
