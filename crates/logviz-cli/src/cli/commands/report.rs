use logviz_core::{render_blob, Panel};

use super::output::emit;
use crate::cli::args::{EndpointArgs, PanelArgs};
use crate::exit_codes::{NOT_FOUND, SUCCESS};

/// A missing report still renders its placeholder, then exits with NOT_FOUND.
pub async fn run(endpoint: &EndpointArgs, args: PanelArgs) -> anyhow::Result<i32> {
    let client = super::client(endpoint)?;
    let run = args.run.identity();

    let report = match client.fetch_final_report(&run).await {
        Ok(report) => report,
        Err(e) => return Ok(super::fetch_failed("fetching final report", &e)),
    };

    emit(&render_blob(Panel::FinalReport, report.as_ref()), &args.output)?;
    Ok(if report.is_some() { SUCCESS } else { NOT_FOUND })
}
