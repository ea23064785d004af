//! Entity link references.

use serde::{Deserialize, Serialize};

use crate::types::nullable::null_as_default;

/// A reference to another entity as embedded in remote records.
///
/// The remote service always sends `id` and `type`; `name` is only present
/// when the display name was requested or is cheap to resolve.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkField {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub entity_type: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub name: String,
}

impl LinkField {
    pub fn new(id: i64, entity_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            entity_type: entity_type.into(),
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_is_optional() {
        let link: LinkField = serde_json::from_str(r#"{"id": 12, "type": "Shot"}"#).unwrap();
        assert_eq!(link, LinkField::new(12, "Shot", ""));

        let json = serde_json::to_string(&link).unwrap();
        assert!(!json.contains("name"));
    }
}
