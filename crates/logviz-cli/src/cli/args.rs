use clap::{Args, Parser, Subcommand, ValueEnum};
use logviz_client::config::{DEFAULT_TIMEOUT_SECS, DEFAULT_URL};
use logviz_client::ClientConfig;
use logviz_core::{OutputFormat, PageIndex, RunIdentity};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "logviz",
    version,
    about = "Read-only viewer for evaluation-run logs: paginated transcripts, metrics, final reports"
)]
pub struct Cli {
    #[command(flatten)]
    pub endpoint: EndpointArgs,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show one sample page: navigation, transcript tables, metrics
    Page(PageArgs),
    /// Show the final report of a run
    Report(PanelArgs),
    /// Show the spec of a run
    Spec(PanelArgs),
    /// Load a whole page: sample, final report and spec fetched concurrently
    View(PageArgs),
    /// List uploaded runs
    Runs(RunsArgs),
    /// Interactive terminal viewer
    #[cfg(feature = "tui")]
    Browse(BrowseArgs),
    Version,
}

#[derive(Args, Debug, Clone)]
pub struct EndpointArgs {
    /// Query endpoint URL
    #[arg(long, global = true, env = "LOGVIZ_URL", default_value = DEFAULT_URL)]
    pub url: String,

    /// Request timeout in seconds
    #[arg(
        long,
        global = true,
        env = "LOGVIZ_TIMEOUT",
        value_name = "SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    pub timeout: u64,
}

impl EndpointArgs {
    pub fn config(&self) -> ClientConfig {
        ClientConfig::default()
            .with_url(self.url.clone())
            .with_timeout_secs(self.timeout)
    }
}

#[derive(Args, Debug, Clone)]
pub struct RunArg {
    /// Run identifier
    #[arg(long, value_name = "ID")]
    pub run_id: String,
}

impl RunArg {
    pub fn identity(&self) -> RunIdentity {
        RunIdentity::new(self.run_id.clone())
    }
}

#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = FormatArg::Text)]
    pub format: FormatArg,

    /// Write to FILE instead of stdout
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Text,
    Html,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Html => OutputFormat::Html,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct ExpandArgs {
    /// Expand every transcript table
    #[arg(long, conflicts_with = "expand")]
    pub expand_all: bool,

    /// Expand the tables of these events
    #[arg(long, value_name = "EVENT_ID", num_args = 1..)]
    pub expand: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct PageArgs {
    #[command(flatten)]
    pub run: RunArg,

    /// Page number, starting at 1
    #[arg(long, value_name = "N", default_value = "1")]
    pub page: PageIndex,

    #[command(flatten)]
    pub expand: ExpandArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct PanelArgs {
    #[command(flatten)]
    pub run: RunArg,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct RunsArgs {
    #[command(flatten)]
    pub output: OutputArgs,
}

#[cfg(feature = "tui")]
#[derive(Args, Debug, Clone)]
pub struct BrowseArgs {
    #[command(flatten)]
    pub run: RunArg,

    /// Page to open first
    #[arg(long, value_name = "N", default_value = "1")]
    pub page: PageIndex,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn page_defaults_to_first() {
        let cli = Cli::try_parse_from(["logviz", "page", "--run-id", "r"]).unwrap();
        match cli.cmd {
            Command::Page(args) => {
                assert_eq!(args.page, PageIndex::FIRST);
                assert_eq!(args.output.format, FormatArg::Text);
                assert!(!args.expand.expand_all);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn page_zero_is_rejected() {
        let err = Cli::try_parse_from(["logviz", "page", "--run-id", "r", "--page", "0"])
            .unwrap_err();
        assert!(err.to_string().contains("pages are numbered from 1"));
    }

    #[test]
    fn expand_flags_conflict() {
        assert!(Cli::try_parse_from([
            "logviz", "view", "--run-id", "r", "--expand-all", "--expand", "1"
        ])
        .is_err());

        let cli = Cli::try_parse_from(["logviz", "view", "--run-id", "r", "--expand", "1", "4"])
            .unwrap();
        match cli.cmd {
            Command::View(args) => assert_eq!(args.expand.expand, vec!["1", "4"]),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn global_endpoint_flags() {
        let cli = Cli::try_parse_from([
            "logviz",
            "runs",
            "--url",
            "http://example.com/graphql",
            "--timeout",
            "5",
            "--format",
            "json",
        ])
        .unwrap();
        let config = cli.endpoint.config();
        assert_eq!(config.url, "http://example.com/graphql");
        assert_eq!(config.timeout_secs, 5);
    }
}
