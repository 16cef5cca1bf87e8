use logviz_client::{load_run_view, RunSource};
use logviz_core::{PageIndex, PanelState, RunIdentity, RunView};
use tracing::{info, warn};

use super::output::{apply_expansion, emit};
use crate::cli::args::{EndpointArgs, ExpandArgs, PageArgs};
use crate::exit_codes::{NOT_FOUND, SUCCESS, TRANSPORT_ERROR};

pub async fn run(endpoint: &EndpointArgs, args: PageArgs) -> anyhow::Result<i32> {
    let client = super::client(endpoint)?;
    let run = args.run.identity();

    let view = assemble(&client, &run, args.page, &args.expand).await;
    emit(&view, &args.output)?;
    Ok(exit_code(&view))
}

async fn assemble<S: RunSource + ?Sized>(
    source: &S,
    run: &RunIdentity,
    page: PageIndex,
    expand: &ExpandArgs,
) -> RunView {
    let mut view = load_run_view(source, run, page).await;
    if let Some(sample) = view.sample.loaded_mut() {
        apply_expansion(sample, expand);
    }
    info!(run_id = %run, page = page.get(), "run view loaded");
    view
}

/// The sample panel decides the exit code; the other panels never fail the view.
fn exit_code(view: &RunView) -> i32 {
    match &view.sample {
        PanelState::Loaded(_) => SUCCESS,
        PanelState::NotFound(message) => {
            eprintln!("{}", message);
            NOT_FOUND
        }
        PanelState::Loading | PanelState::TransportError => {
            warn!(run_id = %view.run_id, "sample panel could not be loaded");
            TRANSPORT_ERROR
        }
    }
}
