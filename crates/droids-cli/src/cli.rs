use clap::{Args, Parser, Subcommand};
use droidspp::core::stats::divergence::DivergenceMeasure;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "DROIDS++ CLI - Site-wise comparison of protein dynamics between a reference and a query state, from molecular dynamics fluctuation and correlation outputs.",
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

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare the reference and query ensembles site by site and export the results.
    Compare(CompareArgs),
    /// Build the residue info file from a toolkit atom-info listing.
    Resinfo(ResinfoArgs),
}

/// Arguments for the `compare` subcommand.
#[derive(Args, Debug, Default)]
pub struct CompareArgs {
    // --- Core Arguments ---
    /// Run configuration: a TOML file, or a legacy `DROIDS.ctl` (any `.ctl` file).
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding the toolkit outputs.
    #[arg(short, long, value_name = "DIR")]
    pub input_dir: Option<PathBuf>,

    /// Directory receiving the result tables and viewer files (defaults to the input directory).
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Identifier of the reference system in toolkit file names.
    #[arg(long, value_name = "ID")]
    pub reference_id: Option<String>,

    /// Identifier of the query system in toolkit file names.
    #[arg(long, value_name = "ID")]
    pub query_id: Option<String>,

    /// Number of residues (sites) in the protein.
    #[arg(short = 'L', long, value_name = "INT")]
    pub length: Option<usize>,

    /// Number of subsamples per state.
    #[arg(short = 'n', long, value_name = "INT")]
    pub subsamples: Option<usize>,

    // --- Analysis Overrides ---
    /// Bootstrap seed for the discrepancy analysis (drawn and logged when omitted).
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Divergence functional: generalized, relative-entropy or jensen-shannon.
    #[arg(long, value_name = "NAME")]
    pub measure: Option<DivergenceMeasure>,

    /// Skip the divergence analysis.
    #[arg(long)]
    pub no_divergence: bool,

    /// Skip the discrepancy analysis.
    #[arg(long)]
    pub no_discrepancy: bool,

    /// Prepend the normalized fluctuation to every reduced feature vector.
    #[arg(long)]
    pub include_flux: bool,

    /// Write the reduced features under `feature_*_reduced/`.
    #[arg(long)]
    pub persist_features: bool,

    // --- Visualization Overrides ---
    /// Do not write viewer attribute and control files.
    #[arg(long, conflicts_with = "launch_viewer")]
    pub no_attributes: bool,

    /// Launch ChimeraX once per attribute after exporting.
    #[arg(long)]
    pub launch_viewer: bool,

    /// Directory containing the ChimeraX executable.
    #[arg(long, value_name = "DIR")]
    pub chimerax_dir: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file and flags.
    /// Can be used multiple times. Example: -S discrepancy.resamples=1000
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `resinfo` subcommand.
#[derive(Args, Debug)]
pub struct ResinfoArgs {
    /// Toolkit atom-info listing (`cpptraj_atominfo_<ID>.txt`).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub atominfo: PathBuf,

    /// Output file. Defaults to `resinfo_ref/cpptraj_resinfo_<ID>.txt` next to the input.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}
