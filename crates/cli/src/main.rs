mod commands;
mod config;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
const LOG_ENV: &str = "DBU_LOG";

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Rules evaluator and character builder for Dragonbane.
#[derive(Parser)]
#[command(name = "dbu", version, about = "Dragonbane rules evaluator and character builder")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Path to a TOML config file (default: ./dbu.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a ruleset against an input record
    Eval {
        /// Path to the ruleset JSON file
        ruleset: PathBuf,
        /// Path to the inputs JSON file
        #[arg(long)]
        inputs: PathBuf,
    },

    /// Compute derived ratings for a set of attributes and a kin
    Derive {
        /// Path to a JSON file with the six attributes (STR, CON, AGL, INT, WIL, CHA)
        #[arg(long)]
        attributes: PathBuf,
        /// Kin id, e.g. "halfling"
        #[arg(long)]
        kin: String,
        /// Content tables to use instead of the configured or bundled ones
        #[arg(long)]
        content: Option<PathBuf>,
    },

    /// Build a character sheet from a creation request
    Create {
        /// Path to the creation request JSON file
        input: PathBuf,
        /// Content tables to use instead of the configured or bundled ones
        #[arg(long)]
        content: Option<PathBuf>,
    },

    /// Validate a content file against the content schema and table checks
    Validate {
        /// Path to the content JSON file
        content: PathBuf,
    },

    /// Report suspicious constructs in a ruleset
    Lint {
        /// Path to the ruleset JSON file
        ruleset: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            report_error(&e, cli.output, cli.quiet);
            process::exit(1);
        }
    };
    init_logging(config.log_level.as_deref());

    match cli.command {
        Commands::Eval { ruleset, inputs } => {
            commands::eval::cmd_eval(&ruleset, &inputs, cli.output, cli.quiet);
        }
        Commands::Derive {
            attributes,
            kin,
            content,
        } => {
            let content = content.or(config.content);
            commands::derive::cmd_derive(
                &attributes,
                &kin,
                content.as_deref(),
                cli.output,
                cli.quiet,
            );
        }
        Commands::Create { input, content } => {
            let content = content.or(config.content);
            commands::create::cmd_create(&input, content.as_deref(), cli.output, cli.quiet);
        }
        Commands::Validate { content } => {
            commands::validate::cmd_validate(&content, cli.output, cli.quiet);
        }
        Commands::Lint { ruleset } => {
            commands::lint::cmd_lint(&ruleset, cli.output, cli.quiet);
        }
    }
}

/// Install the stderr subscriber. `DBU_LOG` wins over the config's
/// `log_level`, which wins over `warn`.
fn init_logging(config_level: Option<&str>) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(config_level.unwrap_or("warn")))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Report an error in the appropriate output format.
pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
