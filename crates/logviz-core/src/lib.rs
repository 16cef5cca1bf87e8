//! View models and rendering for evaluation-run logs.
//!
//! This crate turns run data fetched from a log-viewer query endpoint into
//! immutable view descriptions, and renders those descriptions as HTML,
//! terminal text or JSON:
//!
//! - [`loose_json`] decodes metric and report blobs that are not strict JSON
//! - [`pagination`] computes navigation state for a page of a run
//! - [`transcript`] builds one collapsible table per sampling event
//! - [`section`] flattens decoded mappings into field lists
//! - [`page`] ties the pieces together behind a per-panel state machine
//! - [`render`] is the single rendering layer
//!
//! Nothing here performs I/O. Fetching lives in `logviz-client`.
//!
//! # Example
//!
//! ```
//! use logviz_core::pagination::compute_nav_state;
//! use logviz_core::PageIndex;
//!
//! let nav = compute_nav_state(PageIndex::FIRST, 5);
//! assert!(!nav.prev_enabled);
//! assert!(nav.next_enabled);
//! assert_eq!(nav.label, "Page 1 of 5");
//! ```

pub mod loose_json;
pub mod model;
pub mod page;
pub mod pagination;
pub mod render;
pub mod runs;
pub mod section;
pub mod transcript;

pub use loose_json::{decode, encode, DecodeError};
pub use model::{
    BlobPayload, InvalidPageIndex, Metrics, PageIndex, PageResult, PromptTurn, Report,
    RunIdentity, RunMetadata, SamplePage, SamplingEvent, SamplingEventData, SpecInfo,
};
pub use page::{build_sample_page, PanelState, RunView, SamplePageView};
pub use pagination::{compute_nav_state, NavState};
pub use render::{render, OutputFormat, Render};
pub use runs::{build_run_index, RunIndexView, RunRow};
pub use section::{render_blob, render_fields, render_spec, Field, Panel, SectionBody, SectionView};
pub use transcript::{build_table, build_tables, RowShading, RowView, TableView};
