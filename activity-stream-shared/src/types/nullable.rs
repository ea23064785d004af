//! Serde helper for fields the remote service may send as `null`.

use serde::{Deserialize, Deserializer};

/// Deserialize a value, mapping an explicit JSON `null` to `T::default()`.
///
/// Pair with `#[serde(default)]` so that missing keys behave the same way.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "null_as_default")]
        name: String,
        #[serde(default, deserialize_with = "null_as_default")]
        ids: Vec<i64>,
    }

    #[test]
    fn test_null_and_missing_become_default() {
        let sample: Sample = serde_json::from_str(r#"{"name": null}"#).unwrap();
        assert_eq!(sample.name, "");
        assert!(sample.ids.is_empty());
    }

    #[test]
    fn test_present_value_is_kept() {
        let sample: Sample = serde_json::from_str(r#"{"name": "v001", "ids": [1, 2]}"#).unwrap();
        assert_eq!(sample.name, "v001");
        assert_eq!(sample.ids, vec![1, 2]);
    }
}
