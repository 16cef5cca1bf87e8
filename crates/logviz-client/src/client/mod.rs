//! Query client for fetching run data.
//!
//! Public API: no status code knowledge. All HTTP/status mapping in http.rs.

use std::time::Duration;

use logviz_core::{
    PageIndex, PageResult, Report, RunIdentity, RunMetadata, SamplePage, SpecInfo,
};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::debug;
use url::Url;

use crate::config::ClientConfig;
use crate::envelope::take_field;
use crate::error::{ClientError, ClientResult};
use crate::query;

mod helpers;
mod http;

use helpers::{page_variables, run_variables};
use http::HttpBackend;

const USER_AGENT_VALUE: &str = concat!("logviz/", env!("CARGO_PKG_VERSION"));

/// Query client for one endpoint.
#[derive(Debug, Clone)]
pub struct LogvizClient {
    http: HttpBackend,
}

impl LogvizClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let endpoint = config.endpoint()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(default_headers)
            .build()
            .map_err(|e| ClientError::Config {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http: HttpBackend { client, endpoint },
        })
    }

    pub fn from_env() -> ClientResult<Self> {
        Self::new(ClientConfig::from_env())
    }

    pub fn endpoint(&self) -> &Url {
        &self.http.endpoint
    }

    /// Fetch one page and the run's sample count in a single round trip.
    ///
    /// A null page or null run metadata is `Ok(None)`.
    pub async fn fetch_page(
        &self,
        run: &RunIdentity,
        page: PageIndex,
    ) -> ClientResult<Option<SamplePage>> {
        debug!(run_id = %run, page = page.get(), "fetching sample page");

        let mut data = self
            .http
            .query(&query::SAMPLE_PAGE, page_variables(run, page))
            .await?;
        let result: Option<PageResult> = take_field(&mut data, "sample_page")?;
        let metadata: Option<RunMetadata> = take_field(&mut data, "metadata")?;

        match (result, metadata) {
            (Some(page), Some(metadata)) => Ok(Some(SamplePage { page, metadata })),
            (page_result, metadata) => {
                debug!(
                    run_id = %run,
                    page = page.get(),
                    page_missing = page_result.is_none(),
                    metadata_missing = metadata.is_none(),
                    "sample page not found"
                );
                Ok(None)
            }
        }
    }

    pub async fn fetch_final_report(&self, run: &RunIdentity) -> ClientResult<Option<Report>> {
        debug!(run_id = %run, "fetching final report");

        let mut data = self
            .http
            .query(&query::FINAL_REPORT, run_variables(run))
            .await?;
        take_field(&mut data, "final_report")
    }

    pub async fn fetch_spec(&self, run: &RunIdentity) -> ClientResult<Option<SpecInfo>> {
        debug!(run_id = %run, "fetching spec");

        let mut data = self.http.query(&query::SPEC, run_variables(run)).await?;
        take_field(&mut data, "spec")
    }

    pub async fn fetch_metadata(&self, run: &RunIdentity) -> ClientResult<Option<RunMetadata>> {
        debug!(run_id = %run, "fetching run metadata");

        let mut data = self
            .http
            .query(&query::METADATA, run_variables(run))
            .await?;
        take_field(&mut data, "metadata")
    }

    /// Every uploaded run, in server order. A null list is empty.
    pub async fn list_runs(&self) -> ClientResult<Vec<RunMetadata>> {
        debug!("listing runs");

        let mut data = self
            .http
            .query(&query::METADATA_LIST, serde_json::json!({}))
            .await?;
        let runs: Option<Vec<RunMetadata>> = take_field(&mut data, "metadata_list")?;
        Ok(runs.unwrap_or_default())
    }
}
