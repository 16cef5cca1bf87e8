//! Run data as returned by the query endpoint.
//!
//! Wire decoding is lenient in the places where the upstream server is loose:
//! identifiers may arrive as integers or strings, `sampled` may be a list of
//! completions, and nullable lists or strings collapse to their empty value.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::loose_json::{self, DecodeError};

/// Opaque handle to a run, supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunIdentity(String);

impl RunIdentity {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self(run_id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 1-based page number within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PageIndex(u32);

impl PageIndex {
    pub const FIRST: PageIndex = PageIndex(1);

    /// Returns `None` for page 0.
    pub fn new(page: u32) -> Option<Self> {
        (page >= 1).then_some(Self(page))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn previous(self) -> Option<Self> {
        Self::new(self.0 - 1)
    }

    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for PageIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rejected page number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid page '{input}': pages are numbered from 1")]
pub struct InvalidPageIndex {
    pub input: String,
}

impl FromStr for PageIndex {
    type Err = InvalidPageIndex;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| InvalidPageIndex {
                input: s.to_string(),
            })
    }
}

/// One page of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    pub run_id: String,

    /// Identifier of the sample shown on this page.
    #[serde(default, deserialize_with = "optional_id_from_wire")]
    pub sample_id: Option<String>,

    /// `None` means no metrics were recorded for this sample.
    #[serde(default)]
    pub sample_metrics: Option<Metrics>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub sampling_events: Vec<SamplingEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingEvent {
    #[serde(deserialize_with = "id_from_wire")]
    pub event_id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub data: SamplingEventData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SamplingEventData {
    /// Conversation order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub prompt: Vec<PromptTurn>,

    #[serde(default, deserialize_with = "sampled_from_wire")]
    pub sampled: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTurn {
    pub role: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,

    #[serde(default)]
    pub name: Option<String>,
}

/// A metrics or report blob: loose JSON text, decoded only when rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobPayload {
    #[serde(default, deserialize_with = "blob_from_wire")]
    pub data: String,
}

pub type Metrics = BlobPayload;
pub type Report = BlobPayload;

impl BlobPayload {
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }

    pub fn decode(&self) -> Result<Map<String, Value>, DecodeError> {
        loose_json::decode(&self.data)
    }
}

/// Run-level metadata. Only `num_samples` is requested alongside a page; the
/// remaining fields are filled by the metadata and run-list queries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMetadata {
    #[serde(default)]
    pub run_id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub num_samples: u32,

    #[serde(default)]
    pub eval_name: Option<String>,

    #[serde(default)]
    pub base_eval: Option<String>,

    #[serde(default)]
    pub split: Option<String>,

    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default)]
    pub uploaded_at: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub completion_fns: Vec<String>,
}

/// Run spec shown in the spec panel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub completion_fns: Vec<String>,

    #[serde(default)]
    pub base_eval: Option<String>,

    #[serde(default)]
    pub split: Option<String>,

    #[serde(default)]
    pub created_at: Option<String>,
}

/// A page together with the run metadata fetched in the same round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplePage {
    pub page: PageResult,
    pub metadata: RunMetadata,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn id_from_wire<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    optional_id_from_wire(deserializer)?.ok_or_else(|| de::Error::custom("identifier is null"))
}

fn optional_id_from_wire<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(de::Error::custom(format!(
            "expected string or integer identifier, got {}",
            value_kind(&other)
        ))),
    }
}

fn sampled_from_wire<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Array(items) => Ok(items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n")),
        other => Err(de::Error::custom(format!(
            "expected sampled completion as string or list, got {}",
            value_kind(&other)
        ))),
    }
}

fn blob_from_wire<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        other => Ok(other.to_string()),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn page_index_rejects_zero() {
        assert!(PageIndex::new(0).is_none());
        assert_eq!(PageIndex::new(3).map(PageIndex::get), Some(3));
        assert!("0".parse::<PageIndex>().is_err());
        assert!("abc".parse::<PageIndex>().is_err());
        assert_eq!("7".parse::<PageIndex>().unwrap().get(), 7);
    }

    #[test]
    fn page_index_neighbours() {
        assert_eq!(PageIndex::FIRST.previous(), None);
        let two = PageIndex::new(2).unwrap();
        assert_eq!(two.previous(), Some(PageIndex::FIRST));
        assert_eq!(PageIndex::FIRST.next(), Some(two));
        assert_eq!(PageIndex::new(u32::MAX).unwrap().next(), None);
    }

    #[test]
    fn page_result_accepts_server_shapes() {
        let page: PageResult = serde_json::from_value(json!({
            "run_id": "run-1",
            "sample_id": "match.dev.3",
            "sample_metrics": {"data": "{\"correct\": true}"},
            "sampling_events": [{
                "event_id": 12,
                "data": {
                    "prompt": [
                        {"role": "system", "content": "Be brief.", "name": null},
                        {"role": "user", "content": null}
                    ],
                    "sampled": ["first", "second"]
                }
            }]
        }))
        .unwrap();

        assert_eq!(page.sample_id.as_deref(), Some("match.dev.3"));
        let event = &page.sampling_events[0];
        assert_eq!(event.event_id, "12");
        assert_eq!(event.data.prompt[1].content, "");
        assert_eq!(event.data.sampled, "first\nsecond");
        assert!(page.sample_metrics.is_some());
    }

    #[test]
    fn page_result_null_collections() {
        let page: PageResult = serde_json::from_value(json!({
            "run_id": "run-1",
            "sample_id": 4,
            "sample_metrics": null,
            "sampling_events": null
        }))
        .unwrap();

        assert_eq!(page.sample_id.as_deref(), Some("4"));
        assert!(page.sample_metrics.is_none());
        assert!(page.sampling_events.is_empty());
    }

    #[test]
    fn event_id_must_be_scalar() {
        let result: Result<SamplingEvent, _> = serde_json::from_value(json!({
            "event_id": {"nested": true},
            "data": {"prompt": [], "sampled": "x"}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn blob_accepts_inline_object() {
        let blob: BlobPayload = serde_json::from_value(json!({"data": {"a": 1}})).unwrap();
        assert_eq!(blob.data, "{\"a\":1}");
        assert_eq!(blob.decode().unwrap()["a"], json!(1));
    }

    #[test]
    fn metadata_tolerates_missing_fields() {
        let meta: RunMetadata = serde_json::from_value(json!({"num_samples": 5})).unwrap();
        assert_eq!(meta.num_samples, 5);
        assert!(meta.name.is_none());
        assert!(meta.completion_fns.is_empty());
    }
}
