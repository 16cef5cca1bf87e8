//! Page loads: concurrent fetches settling the panels of a [`RunView`].

use logviz_core::page::page_not_found_message;
use logviz_core::{
    build_run_index, build_sample_page, PageIndex, PanelState, RunIdentity, RunIndexView,
    RunView, SamplePageView,
};
use tracing::debug;

use crate::error::ClientResult;
use crate::source::RunSource;

/// Load one page of a run. The three fetches run concurrently and each panel
/// settles on its own outcome.
pub async fn load_run_view<S>(source: &S, run: &RunIdentity, page: PageIndex) -> RunView
where
    S: RunSource + ?Sized,
{
    debug!(run_id = %run, page = page.get(), "loading run view");

    let (sample, report, spec) = tokio::join!(
        source.fetch_page(run, page),
        source.fetch_final_report(run),
        source.fetch_spec(run),
    );

    let mut view = RunView::new(run.clone(), page);
    view.settle_sample(sample);
    view.settle_final_report(report);
    view.settle_spec(spec);
    view
}

/// Load only the sample panel, as a page move does.
pub async fn load_sample_panel<S>(
    source: &S,
    run: &RunIdentity,
    page: PageIndex,
) -> PanelState<SamplePageView>
where
    S: RunSource + ?Sized,
{
    let outcome = source.fetch_page(run, page).await;
    PanelState::Loading.settle(
        outcome,
        || page_not_found_message(run, page),
        |sample| build_sample_page(&sample, page),
    )
}

/// Title for a run: its name when metadata is available.
pub async fn load_run_title<S>(source: &S, run: &RunIdentity) -> ClientResult<Option<String>>
where
    S: RunSource + ?Sized,
{
    Ok(source
        .fetch_metadata(run)
        .await?
        .and_then(|meta| meta.name.filter(|name| !name.is_empty()))
        .map(|name| format!("Run {} ({})", run, name)))
}

pub async fn load_run_index<S>(source: &S) -> ClientResult<RunIndexView>
where
    S: RunSource + ?Sized,
{
    let runs = source.list_runs().await?;
    debug!(count = runs.len(), "listed runs");
    Ok(build_run_index(&runs))
}
