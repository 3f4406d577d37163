use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use takeoff_core::project::{CutbackPolicy, LabelLanguage};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Beam quantity takeoff - rebar weight, concrete volume and formwork area from beam schedules"
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
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute quantities and write the result table.
    Run(RunArgs),
    /// Load and validate the inputs without computing anything.
    Check(InputArgs),
    /// Combine the three input documents into one project bundle.
    Bundle(BundleArgs),
}

/// Where the inputs come from.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Run configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Project bundle (.tko.json) holding all inputs and settings.
    #[arg(short, long, value_name = "PATH", conflicts_with_all = ["steel", "beams", "counts"])]
    pub project: Option<PathBuf>,

    /// Steel catalog JSON (default: steel_data.json).
    #[arg(long, value_name = "PATH")]
    pub steel: Option<PathBuf>,

    /// Beam specification JSON (default: beam_data.json).
    #[arg(long, value_name = "PATH")]
    pub beams: Option<PathBuf>,

    /// Beam count manifest JSON (default: beam_count.json).
    #[arg(long, value_name = "PATH")]
    pub counts: Option<PathBuf>,
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Output file (default: output.csv).
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Output format; inferred from the output extension when omitted.
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// How to handle end zones longer than the beam.
    #[arg(long, value_enum)]
    pub cutback_policy: Option<PolicyArg>,

    /// Language of row labels.
    #[arg(long, value_enum)]
    pub labels: Option<LanguageArg>,

    /// Add total bar length rows; `--include-lengths=false` overrides the config file.
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub include_lengths: Option<bool>,
}

/// Arguments for the `bundle` subcommand.
#[derive(Args, Debug, Clone)]
pub struct BundleArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Bundle file to write.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    #[arg(long, default_value = "")]
    pub job_id: String,

    #[arg(long, default_value = "")]
    pub estimator: String,

    #[arg(long, default_value = "")]
    pub client: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// item,value,unit table
    Csv,
    /// Full report with metadata and totals
    Json,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyArg {
    Reject,
    Clamp,
}

impl From<PolicyArg> for CutbackPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Reject => CutbackPolicy::Reject,
            PolicyArg::Clamp => CutbackPolicy::Clamp,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageArg {
    English,
    Chinese,
}

impl From<LanguageArg> for LabelLanguage {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::English => LabelLanguage::English,
            LanguageArg::Chinese => LabelLanguage::Chinese,
        }
    }
}
