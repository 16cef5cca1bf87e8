use logviz_client::load_run_index;

use super::output::emit;
use crate::cli::args::{EndpointArgs, RunsArgs};
use crate::exit_codes::SUCCESS;

pub async fn run(endpoint: &EndpointArgs, args: RunsArgs) -> anyhow::Result<i32> {
    let client = super::client(endpoint)?;

    match load_run_index(&client).await {
        Ok(index) => {
            emit(&index, &args.output)?;
            Ok(SUCCESS)
        }
        Err(e) => Ok(super::fetch_failed("listing runs", &e)),
    }
}
