use anyhow::Context;
use logviz_client::{ClientError, LogvizClient};
use tracing::warn;

use super::args::EndpointArgs;

#[cfg(feature = "tui")]
pub mod browse;
mod dispatch;
pub mod output;
pub mod page;
pub mod report;
pub mod runs;
pub mod spec;
pub mod view;

pub use dispatch::dispatch;

pub(crate) fn client(endpoint: &EndpointArgs) -> anyhow::Result<LogvizClient> {
    LogvizClient::new(endpoint.config())
        .with_context(|| format!("failed to create query client for {}", endpoint.url))
}

/// Report a fetch failure and return its exit code.
pub(crate) fn fetch_failed(what: &str, err: &ClientError) -> i32 {
    warn!(error = %err, "{} failed", what);
    eprintln!("error: {}: {}", what, err);
    err.exit_code()
}
