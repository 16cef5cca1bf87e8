//! Field-list panels: per-sample metrics, final report, run spec.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::loose_json;
use crate::model::{BlobPayload, RunIdentity, SpecInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Panel {
    Metrics,
    FinalReport,
    Spec,
}

impl Panel {
    pub fn title(self) -> &'static str {
        match self {
            Self::Metrics => "Metrics",
            Self::FinalReport => "Final Report",
            Self::Spec => "Spec",
        }
    }

    /// Shown when the panel's payload is absent.
    pub fn empty_placeholder(self) -> &'static str {
        match self {
            Self::Metrics => "No metrics found for this page!",
            Self::FinalReport => "No final report found!",
            Self::Spec => "No spec found!",
        }
    }

    /// Shown when the payload exists but cannot be decoded.
    pub fn unavailable_message(self) -> &'static str {
        match self {
            Self::Metrics => "Metrics unavailable: the payload could not be decoded.",
            Self::FinalReport => "Final report unavailable: the payload could not be decoded.",
            Self::Spec => "Spec unavailable: the payload could not be decoded.",
        }
    }
}

/// One `key: value` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub key: String,
    pub value: String,
}

impl Field {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum SectionBody {
    Fields(Vec<Field>),
    Message(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionView {
    pub panel: Panel,
    pub body: SectionBody,
}

impl SectionView {
    pub fn message(panel: Panel, message: impl Into<String>) -> Self {
        Self {
            panel,
            body: SectionBody::Message(message.into()),
        }
    }

    pub fn fields(&self) -> &[Field] {
        match &self.body {
            SectionBody::Fields(fields) => fields.as_slice(),
            SectionBody::Message(_) => &[],
        }
    }

    /// Rendered lines, one per field, or the message.
    pub fn lines(&self) -> Vec<String> {
        match &self.body {
            SectionBody::Fields(fields) => fields.iter().map(Field::to_string).collect(),
            SectionBody::Message(message) => vec![message.clone()],
        }
    }
}

/// Flatten a decoded mapping in key order. `None` renders the panel placeholder.
pub fn render_fields(panel: Panel, mapping: Option<&Map<String, Value>>) -> SectionView {
    match mapping {
        None => SectionView::message(panel, panel.empty_placeholder()),
        Some(map) => SectionView {
            panel,
            body: SectionBody::Fields(
                map.iter()
                    .map(|(key, value)| Field::new(key.as_str(), format_value(value)))
                    .collect(),
            ),
        },
    }
}

/// Decode a blob and flatten it; decode failures stay inside this panel.
pub fn render_blob(panel: Panel, blob: Option<&BlobPayload>) -> SectionView {
    let Some(blob) = blob else {
        return render_fields(panel, None);
    };
    match blob.decode() {
        Ok(map) => render_fields(panel, Some(&map)),
        Err(e) => {
            warn!(panel = panel.title(), error = %e, "failed to decode panel payload");
            SectionView::message(panel, panel.unavailable_message())
        }
    }
}

/// The spec panel has a fixed field set.
pub fn render_spec(run: &RunIdentity, spec: &SpecInfo) -> SectionView {
    SectionView {
        panel: Panel::Spec,
        body: SectionBody::Fields(vec![
            Field::new("Run ID", run.as_str()),
            Field::new("Solvers", spec.completion_fns.join(", ")),
            Field::new("Eval", display_or_dash(spec.base_eval.as_deref())),
            Field::new("Split", display_or_dash(spec.split.as_deref())),
            Field::new("Created at", display_or_dash(spec.created_at.as_deref())),
        ]),
    }
}

/// Primitives render as plain text, structured values as compact JSON.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => loose_json::encode(value),
    }
}

pub(crate) fn display_or_dash(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "—".to_string(),
    }
}
