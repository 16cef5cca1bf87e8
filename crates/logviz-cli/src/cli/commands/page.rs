use logviz_core::build_sample_page;
use logviz_core::page::page_not_found_message;
use tracing::info;

use super::output::{apply_expansion, emit};
use crate::cli::args::{EndpointArgs, PageArgs};
use crate::exit_codes::{NOT_FOUND, SUCCESS};

pub async fn run(endpoint: &EndpointArgs, args: PageArgs) -> anyhow::Result<i32> {
    let client = super::client(endpoint)?;
    let run = args.run.identity();

    let sample = match client.fetch_page(&run, args.page).await {
        Ok(Some(sample)) => sample,
        Ok(None) => {
            eprintln!("{}", page_not_found_message(&run, args.page));
            return Ok(NOT_FOUND);
        }
        Err(e) => return Ok(super::fetch_failed("fetching sample page", &e)),
    };

    let mut view = build_sample_page(&sample, args.page);
    apply_expansion(&mut view, &args.expand);
    info!(
        run_id = %run,
        page = args.page.get(),
        tables = view.tables.len(),
        "rendering sample page"
    );

    emit(&view, &args.output)?;
    Ok(SUCCESS)
}
