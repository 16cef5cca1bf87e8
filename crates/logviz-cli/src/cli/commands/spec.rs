use logviz_core::page::spec_not_found_message;
use logviz_core::render_spec;

use super::output::emit;
use crate::cli::args::{EndpointArgs, PanelArgs};
use crate::exit_codes::{NOT_FOUND, SUCCESS};

pub async fn run(endpoint: &EndpointArgs, args: PanelArgs) -> anyhow::Result<i32> {
    let client = super::client(endpoint)?;
    let run = args.run.identity();

    match client.fetch_spec(&run).await {
        Ok(Some(spec)) => {
            emit(&render_spec(&run, &spec), &args.output)?;
            Ok(SUCCESS)
        }
        Ok(None) => {
            eprintln!("{}", spec_not_found_message(&run));
            Ok(NOT_FOUND)
        }
        Err(e) => Ok(super::fetch_failed("fetching spec", &e)),
    }
}
