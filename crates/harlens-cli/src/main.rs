use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use harlens_capture::{CaptureLimits, DEFAULT_MAX_POST_DATA_BYTES, DEFAULT_MAX_RESPONSE_BODY_BYTES};
use harlens_cli::{OutputFormat, commands};
use harlens_core::report::DEFAULT_MAX_RESPONSE_CHARS;
use harlens_core::{EntrySelection, ReportOptions};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "harlens")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Extract JSON and GraphQL API calls from HAR captures into LLM-friendly reports",
    long_about = "harlens reads HTTP Archive (HAR) data, keeps the requests that carry JSON or \
                  GraphQL payloads and renders them as a compact, deterministic text report."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Args)]
struct ReportArgs {
    /// Report layout
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Tagged)]
    format: OutputFormat,

    /// Include every entry, not only JSON/GraphQL calls
    #[arg(long, conflicts_with = "graphql_only")]
    all: bool,

    /// Only include GraphQL operations
    #[arg(long)]
    graphql_only: bool,

    /// Truncate rendered response bodies after this many characters
    #[arg(
        long,
        env = "HARLENS_MAX_RESPONSE_CHARS",
        default_value_t = DEFAULT_MAX_RESPONSE_CHARS
    )]
    max_response_chars: usize,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl ReportArgs {
    fn selection(&self) -> EntrySelection {
        if self.all {
            EntrySelection::All
        } else if self.graphql_only {
            EntrySelection::Graphql
        } else {
            EntrySelection::Api
        }
    }

    fn options(&self) -> ReportOptions {
        ReportOptions::new(self.format.into()).with_max_response_chars(self.max_response_chars)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Render the API calls in a HAR file as a report
    Report {
        /// Path to the HAR file (reads stdin when omitted or "-")
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// Write a HAR file containing only the API calls
    Filter {
        /// Path to the HAR file (reads stdin when omitted or "-")
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Only keep GraphQL operations
        #[arg(long)]
        graphql_only: bool,

        /// Output filtered HAR to file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build a report from a JSON-lines DevTools network event log
    Events {
        /// Path to the event log ({"method": ..., "params": ...} per line)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        report: ReportArgs,

        /// Also save the captured traffic as a HAR file
        #[arg(long, value_name = "FILE")]
        har_out: Option<PathBuf>,

        /// Cap on captured response body size in bytes
        #[arg(
            long,
            env = "HARLENS_MAX_BODY_BYTES",
            default_value_t = DEFAULT_MAX_RESPONSE_BODY_BYTES
        )]
        max_body_bytes: usize,

        /// Cap on captured request body size in bytes
        #[arg(
            long,
            env = "HARLENS_MAX_POST_DATA_BYTES",
            default_value_t = DEFAULT_MAX_POST_DATA_BYTES
        )]
        max_post_data_bytes: usize,
    },

    /// Generate shell completion scripts
    #[command(after_help = "SUPPORTED SHELLS: bash, zsh, fish, powershell, elvish\n\n\
                            INSTALLATION:\n  \
                            bash: harlens completion --shell bash >> ~/.bashrc\n  \
                            zsh:  harlens completion --shell zsh > ~/.zfunc/_harlens")]
    Completion {
        /// Target shell
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match cli.command {
        Commands::Report { file, report } => {
            commands::report::execute(
                file.as_deref(),
                report.selection(),
                &report.options(),
                report.output.as_deref(),
            )?;
            Ok(())
        }
        Commands::Filter {
            file,
            graphql_only,
            output,
        } => {
            let selection = if graphql_only {
                EntrySelection::Graphql
            } else {
                EntrySelection::Api
            };
            commands::filter::execute(file.as_deref(), selection, output.as_deref())
        }
        Commands::Events {
            file,
            report,
            har_out,
            max_body_bytes,
            max_post_data_bytes,
        } => {
            let limits = CaptureLimits {
                max_response_body_bytes: max_body_bytes,
                max_post_data_bytes,
            };
            commands::events::execute(
                &file,
                limits,
                report.selection(),
                &report.options(),
                har_out.as_deref(),
                report.output.as_deref(),
            )?;
            Ok(())
        }
        Commands::Completion { shell } => {
            commands::completion::execute(shell, &mut Cli::command())
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("harlens=debug,harlens_cli=debug,harlens_core=debug,harlens_capture=debug")
    } else {
        EnvFilter::new("harlens=info,harlens_cli=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
