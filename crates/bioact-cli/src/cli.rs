use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "The bioact Developers",
    version,
    about = "bioact CLI - Predict the bioactivity (pIC50) of small molecules against a biological target from their SMILES strings.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel model inference.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Predict pIC50 values for the molecules listed in one or more input files.
    Predict(PredictArgs),
    /// Manage the local data directory (PaDEL-Descriptor, target models and descriptor lists).
    Data(DataArgs),
}

/// Arguments for the `predict` subcommand.
#[derive(Args, Debug)]
pub struct PredictArgs {
    // --- Core Arguments ---
    /// Input file(s) with one `SMILES name` pair per line and no header.
    #[arg(short, long = "input", required = true, num_args(1..), value_name = "PATH")]
    pub inputs: Vec<PathBuf>,

    /// Path for the prediction CSV. Numbered per input when several inputs are given.
    /// Defaults to the configured file name (prediction.csv) in the current directory.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Model Overrides ---
    /// Name of an installed target (e.g., 'acetylcholinesterase'); selects its model and descriptor list.
    #[arg(short, long, value_name = "NAME")]
    pub target: Option<String>,

    /// Override the model artifact. Can be a path or a target name.
    #[arg(long, value_name = "NAME_OR_PATH")]
    pub model: Option<String>,

    /// Override the descriptor list (feature schema). Can be a path or a target name.
    #[arg(long, value_name = "NAME_OR_PATH")]
    pub schema: Option<String>,

    // --- Descriptor Tool Overrides ---
    /// Kill the descriptor tool if it runs longer than this many seconds.
    #[arg(long = "timeout", value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Keep the descriptor tool's working directory after the run for inspection.
    #[arg(long)]
    pub keep_intermediates: bool,

    // --- Extra Outputs ---
    /// Also write the full descriptor matrix to this path.
    #[arg(long, value_name = "PATH")]
    pub descriptors_out: Option<PathBuf>,

    /// Also write the model's feature subset to this path.
    #[arg(long, value_name = "PATH")]
    pub subset_out: Option<PathBuf>,

    /// Print an HTML download link embedding the predictions as a base64 data URI.
    #[arg(long)]
    pub print_link: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S descriptor-tool.heap=4G
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `data` subcommand.
#[derive(Args, Debug)]
pub struct DataArgs {
    #[command(subcommand)]
    pub command: DataCommands,
}

/// Available commands for data management.
#[derive(Subcommand, Debug)]
pub enum DataCommands {
    /// Show the absolute path to the local data directory.
    Path,
    /// Set a custom absolute path for the local data directory.
    SetPath {
        /// The new path to use for storing data files.
        #[arg(required = true)]
        path: PathBuf,
    },
    /// Reset the data path to its default, OS-specific location.
    ResetPath,
    /// List the targets installed in the data directory.
    Targets,
}
