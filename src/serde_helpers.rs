use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::Result;

/// Decodes `value`, logging fields the target type does not know about.
#[cfg(feature = "tracing")]
pub(crate) fn deserialize_with_warnings<T: DeserializeOwned>(value: Value) -> Result<T> {
    let mut unknown = Vec::new();
    let deserializer = serde_ignored::Deserializer::new(value, |path| {
        unknown.push(path.to_string());
    });
    let decoded: T = serde_path_to_error::deserialize(deserializer)?;

    if !unknown.is_empty() {
        tracing::warn!(
            type_name = std::any::type_name::<T>(),
            fields = ?unknown,
            "response contained unknown fields"
        );
    }

    Ok(decoded)
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn deserialize_with_warnings<T: DeserializeOwned>(value: Value) -> Result<T> {
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;
    use crate::error::Kind;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Token {
        token: String,
    }

    #[test]
    fn opaque_value_passes_through() {
        let body = json!({ "token": "t-1", "expiresIn": 3600, "nested": [1, 2] });

        let decoded: Value = deserialize_with_warnings(body.clone()).expect("any json decodes");
        assert_eq!(decoded, body);
    }

    #[test]
    fn typed_decode_tolerates_extra_fields() {
        let decoded: Token = deserialize_with_warnings(json!({ "token": "t-1", "extra": true }))
            .expect("extra fields are ignored");
        assert_eq!(decoded, Token { token: "t-1".to_owned() });
    }

    #[test]
    fn shape_mismatch_is_transport_error() {
        let err = deserialize_with_warnings::<Token>(json!({ "token": 7 }))
            .expect_err("wrong field type");
        assert_eq!(err.kind(), Kind::Transport);
    }
}
