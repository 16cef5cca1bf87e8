//! The single rendering layer.
//!
//! Views are plain data; everything user-visible is produced here, either as
//! an HTML document, as terminal text, or as JSON via serde.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

pub mod html;
pub mod text;

pub use html::escape_html;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Html,
    Json,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Html => "html",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown output format '{0}' (expected text, html or json)")]
pub struct UnknownFormat(pub String);

impl FromStr for OutputFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "html" => Ok(Self::Html),
            "json" => Ok(Self::Json),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

/// Implemented by every view that can be written out.
pub trait Render: Serialize {
    fn to_text(&self) -> String;

    /// A standalone HTML document.
    fn to_html(&self) -> String;

    fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

pub fn render<R: Render + ?Sized>(view: &R, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(view.to_text()),
        OutputFormat::Html => Ok(view.to_html()),
        OutputFormat::Json => view.to_json(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::{render_fields, Panel};

    #[test]
    fn format_parsing() {
        assert_eq!("HTML".parse::<OutputFormat>().unwrap(), OutputFormat::Html);
        assert_eq!("txt".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        let err = "yaml".parse::<OutputFormat>().unwrap_err();
        assert!(err.to_string().contains("'yaml'"));
    }

    #[test]
    fn json_output_is_tagged() {
        let view = render_fields(Panel::FinalReport, None);
        let out = render(&view, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["panel"], "final_report");
        assert_eq!(value["body"]["kind"], "message");
        assert_eq!(value["body"]["content"], "No final report found!");
    }
}
