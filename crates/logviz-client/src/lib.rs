//! Query client for the logviz evaluation-run viewer.
//!
//! This crate talks to the viewer's query endpoint and assembles page views:
//!
//! - HTTP client posting query documents with typed variables
//! - Envelope handling where a `null` field means "not found"
//! - [`RunSource`], implemented by the HTTP client and an in-memory source
//! - Page loads that fetch the sample page, final report and spec concurrently
//!
//! # Quick Start
//!
//! ```no_run
//! use logviz_client::{load_run_view, LogvizClient};
//! use logviz_core::{PageIndex, RunIdentity};
//!
//! # async fn example() -> Result<(), logviz_client::ClientError> {
//! let client = LogvizClient::from_env()?;
//! let run = RunIdentity::new("230401abcd");
//!
//! let view = load_run_view(&client, &run, PageIndex::FIRST).await;
//! if let Some(sample) = view.sample.loaded() {
//!     println!("{}: {} events", sample.nav.label, sample.tables.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `LOGVIZ_URL` | Query endpoint (default: `http://localhost:5001/graphql`) |
//! | `LOGVIZ_TIMEOUT` | Request timeout in seconds (default: 30) |

pub mod client;
pub mod config;
mod envelope;
pub mod error;
pub mod query;
pub mod source;
pub mod view;

pub use client::LogvizClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use source::{MemoryRun, MemorySource, RunSource};
pub use view::{load_run_index, load_run_title, load_run_view, load_sample_panel};
