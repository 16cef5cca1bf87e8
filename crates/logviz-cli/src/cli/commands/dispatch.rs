use super::super::args::*;
use crate::exit_codes::SUCCESS;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    let endpoint = cli.endpoint;
    match cli.cmd {
        Command::Page(args) => super::page::run(&endpoint, args).await,
        Command::Report(args) => super::report::run(&endpoint, args).await,
        Command::Spec(args) => super::spec::run(&endpoint, args).await,
        Command::View(args) => super::view::run(&endpoint, args).await,
        Command::Runs(args) => super::runs::run(&endpoint, args).await,
        #[cfg(feature = "tui")]
        Command::Browse(args) => super::browse::run(&endpoint, args).await,
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(SUCCESS)
        }
    }
}
