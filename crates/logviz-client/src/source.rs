//! Where run data comes from.

use std::collections::BTreeMap;

use async_trait::async_trait;
use logviz_core::{
    PageIndex, PageResult, Report, RunIdentity, RunMetadata, SamplePage, SpecInfo,
};

use crate::client::LogvizClient;
use crate::error::{ClientError, ClientResult};

/// The five fetch operations. `Ok(None)` means not found.
#[async_trait]
pub trait RunSource: Send + Sync {
    async fn fetch_page(&self, run: &RunIdentity, page: PageIndex)
        -> ClientResult<Option<SamplePage>>;

    async fn fetch_final_report(&self, run: &RunIdentity) -> ClientResult<Option<Report>>;

    async fn fetch_spec(&self, run: &RunIdentity) -> ClientResult<Option<SpecInfo>>;

    async fn fetch_metadata(&self, run: &RunIdentity) -> ClientResult<Option<RunMetadata>>;

    async fn list_runs(&self) -> ClientResult<Vec<RunMetadata>>;
}

#[async_trait]
impl RunSource for LogvizClient {
    async fn fetch_page(
        &self,
        run: &RunIdentity,
        page: PageIndex,
    ) -> ClientResult<Option<SamplePage>> {
        LogvizClient::fetch_page(self, run, page).await
    }

    async fn fetch_final_report(&self, run: &RunIdentity) -> ClientResult<Option<Report>> {
        LogvizClient::fetch_final_report(self, run).await
    }

    async fn fetch_spec(&self, run: &RunIdentity) -> ClientResult<Option<SpecInfo>> {
        LogvizClient::fetch_spec(self, run).await
    }

    async fn fetch_metadata(&self, run: &RunIdentity) -> ClientResult<Option<RunMetadata>> {
        LogvizClient::fetch_metadata(self, run).await
    }

    async fn list_runs(&self) -> ClientResult<Vec<RunMetadata>> {
        LogvizClient::list_runs(self).await
    }
}

/// One run held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryRun {
    pub metadata: RunMetadata,
    /// Page `n` is `pages[n - 1]`.
    pub pages: Vec<PageResult>,
    pub final_report: Option<Report>,
    pub spec: Option<SpecInfo>,
}

/// In-memory source, for offline rendering and tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    runs: BTreeMap<String, MemoryRun>,
    offline: bool,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a run. `num_samples` is taken from the page count when unset.
    pub fn with_run(mut self, run_id: impl Into<String>, mut run: MemoryRun) -> Self {
        let run_id = run_id.into();
        if run.metadata.num_samples == 0 {
            run.metadata.num_samples = u32::try_from(run.pages.len()).unwrap_or(u32::MAX);
        }
        if run.metadata.run_id.is_none() {
            run.metadata.run_id = Some(run_id.clone());
        }
        self.runs.insert(run_id, run);
        self
    }

    /// Every fetch fails with a network error.
    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    fn run(&self, run: &RunIdentity) -> ClientResult<Option<&MemoryRun>> {
        if self.offline {
            return Err(ClientError::Network {
                message: "source is offline".to_string(),
            });
        }
        Ok(self.runs.get(run.as_str()))
    }
}

#[async_trait]
impl RunSource for MemorySource {
    async fn fetch_page(
        &self,
        run: &RunIdentity,
        page: PageIndex,
    ) -> ClientResult<Option<SamplePage>> {
        Ok(self.run(run)?.and_then(|stored| {
            let index = usize::try_from(page.get() - 1).ok()?;
            stored.pages.get(index).map(|result| SamplePage {
                page: result.clone(),
                metadata: stored.metadata.clone(),
            })
        }))
    }

    async fn fetch_final_report(&self, run: &RunIdentity) -> ClientResult<Option<Report>> {
        Ok(self.run(run)?.and_then(|stored| stored.final_report.clone()))
    }

    async fn fetch_spec(&self, run: &RunIdentity) -> ClientResult<Option<SpecInfo>> {
        Ok(self.run(run)?.and_then(|stored| stored.spec.clone()))
    }

    async fn fetch_metadata(&self, run: &RunIdentity) -> ClientResult<Option<RunMetadata>> {
        Ok(self.run(run)?.map(|stored| stored.metadata.clone()))
    }

    async fn list_runs(&self) -> ClientResult<Vec<RunMetadata>> {
        if self.offline {
            return Err(ClientError::Network {
                message: "source is offline".to_string(),
            });
        }
        Ok(self.runs.values().map(|run| run.metadata.clone()).collect())
    }
}
