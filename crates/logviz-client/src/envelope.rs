//! Response envelope: `{data: {...}} | {errors: [...]}`.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{ClientError, ClientResult};

#[derive(Debug, Deserialize)]
struct QueryError {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    #[serde(default)]
    data: Option<Map<String, Value>>,

    #[serde(default)]
    errors: Option<Vec<QueryError>>,
}

impl Envelope {
    pub(crate) fn parse(body: &str) -> ClientResult<Self> {
        serde_json::from_str(body)
            .map_err(|e| ClientError::invalid(format!("failed to parse response envelope: {}", e)))
    }

    /// Data wins over errors: a partial result with null fields is still data.
    pub(crate) fn into_data(self) -> ClientResult<Map<String, Value>> {
        let messages: Vec<String> = self
            .errors
            .unwrap_or_default()
            .into_iter()
            .map(|e| e.message)
            .collect();

        match self.data {
            Some(data) => {
                if !messages.is_empty() {
                    debug!(errors = ?messages, "partial result, keeping data");
                }
                Ok(data)
            }
            None if !messages.is_empty() => Err(ClientError::Query { messages }),
            None => Err(ClientError::invalid("response has neither data nor errors")),
        }
    }
}

/// Take one field out of `data`. `null` is absence.
pub(crate) fn take_field<T: DeserializeOwned>(
    data: &mut Map<String, Value>,
    field: &str,
) -> ClientResult<Option<T>> {
    match data.remove(field) {
        None => Err(ClientError::invalid(format!(
            "response data is missing field '{}'",
            field
        ))),
        Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| ClientError::invalid(format!("failed to decode '{}': {}", field, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logviz_core::SpecInfo;

    #[test]
    fn null_field_is_absence_even_with_errors() {
        let mut data = Envelope::parse(
            r#"{"data": {"spec": null}, "errors": [{"message": "list index out of range"}]}"#,
        )
        .unwrap()
        .into_data()
        .unwrap();
        let spec: Option<SpecInfo> = take_field(&mut data, "spec").unwrap();
        assert!(spec.is_none());
    }

    #[test]
    fn errors_without_data() {
        let err = Envelope::parse(r#"{"data": null, "errors": [{"message": "boom"}]}"#)
            .unwrap()
            .into_data()
            .unwrap_err();
        assert!(matches!(err, ClientError::Query { ref messages } if messages == &["boom"]));
    }

    #[test]
    fn empty_envelope_is_invalid() {
        let err = Envelope::parse("{}").unwrap().into_data().unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse { .. }));
        assert!(Envelope::parse("<html>").is_err());
    }

    #[test]
    fn missing_or_malformed_field_is_invalid() {
        let mut data = Map::new();
        let err = take_field::<SpecInfo>(&mut data, "spec").unwrap_err();
        assert!(err.to_string().contains("missing field 'spec'"));

        data.insert("spec".into(), Value::from(42));
        let err = take_field::<SpecInfo>(&mut data, "spec").unwrap_err();
        assert!(err.to_string().contains("failed to decode 'spec'"));
    }
}
