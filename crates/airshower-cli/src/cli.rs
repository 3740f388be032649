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
    author = "Tony Kan, Ted Yu",
    version,
    about = "airshower CLI - Ground particle distributions of CORSIKA air showers.",
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
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Bin the ground particles of every shower by species and render them on a 2x2 canvas.
    Plot(PlotArgs),
    /// Print the format, run header and shower summaries of a CORSIKA particle file.
    Info(InfoArgs),
}

/// Arguments for the `plot` subcommand.
#[derive(Args, Debug, Default)]
pub struct PlotArgs {
    /// CORSIKA particle file. Defaults to DAT000002-32 in the example data directory.
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Path of the SVG canvas to write.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding the example data files.
    #[arg(long, env = "AIRSHOWER_DATA_DIR", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Also write each histogram as `<DIR>/<species>.csv`.
    #[arg(long, value_name = "DIR")]
    pub csv_dir: Option<PathBuf>,

    // --- Histogram Overrides ---
    /// Number of bins per axis.
    #[arg(short, long, value_name = "INT")]
    pub bins: Option<usize>,

    /// Full width of the square histogram window.
    #[arg(long, value_name = "FLOAT")]
    pub side: Option<f64>,

    /// Particle positions (cm) are divided by this before filling. Defaults to the bin count.
    #[arg(long, value_name = "FLOAT")]
    pub coordinate_divisor: Option<f64>,

    // --- Selection Overrides ---
    /// Stop after this many particles over the whole file.
    #[arg(short = 'n', long, value_name = "INT")]
    pub max_particles: Option<u64>,

    /// Observation level to read, numbered from 1.
    #[arg(short = 'l', long, value_name = "INT")]
    pub observation_level: Option<u32>,

    /// Count positrons with electrons and positive muons with muons.
    #[arg(long)]
    pub merge_antiparticles: bool,

    /// Keep decayed-muon records instead of dropping them.
    #[arg(long)]
    pub keep_muon_production: bool,

    /// Fill with the thinning weight of each particle instead of 1.
    #[arg(long)]
    pub use_weights: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S histogram.bins=50
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `info` subcommand.
#[derive(Args, Debug, Default)]
pub struct InfoArgs {
    /// CORSIKA particle file. Defaults to DAT000002-32 in the example data directory.
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Directory holding the example data files.
    #[arg(long, env = "AIRSHOWER_DATA_DIR", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Read every shower and report how many particles reach the observation level.
    #[arg(long)]
    pub count_particles: bool,

    /// Observation level used with --count-particles.
    #[arg(short = 'l', long, value_name = "INT", default_value_t = 1)]
    pub observation_level: u32,

    /// Only report the shower with this event number.
    #[arg(short = 'e', long, value_name = "NUMBER")]
    pub event: Option<u32>,

    /// Subtracted from particle arrival times (ns) when counting particles.
    #[arg(long, value_name = "NS", default_value_t = 0.0, allow_negative_numbers = true)]
    pub time_offset: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn plot_accepts_overrides() {
        let cli = Cli::parse_from([
            "airshower",
            "-vv",
            "plot",
            "showers.dat",
            "--bins",
            "50",
            "-n",
            "1000",
            "--merge-antiparticles",
            "-S",
            "histogram.side=500",
        ]);
        assert_eq!(cli.verbose, 2);
        let Commands::Plot(args) = cli.command else {
            panic!("Expected 'plot' subcommand");
        };
        assert_eq!(args.input, Some(PathBuf::from("showers.dat")));
        assert_eq!(args.bins, Some(50));
        assert_eq!(args.max_particles, Some(1000));
        assert!(args.merge_antiparticles);
        assert!(!args.use_weights);
        assert_eq!(args.set_values, vec!["histogram.side=500".to_string()]);
    }

    #[test]
    fn info_defaults_to_first_level() {
        let cli = Cli::parse_from(["airshower", "info", "--count-particles"]);
        let Commands::Info(args) = cli.command else {
            panic!("Expected 'info' subcommand");
        };
        assert!(args.input.is_none());
        assert!(args.count_particles);
        assert_eq!(args.observation_level, 1);
        assert_eq!(args.event, None);
        assert_eq!(args.time_offset, 0.0);
    }

    #[test]
    fn info_accepts_event_and_time_offset() {
        let cli = Cli::parse_from([
            "airshower",
            "info",
            "DAT000002",
            "-e",
            "7",
            "--time-offset",
            "-12.5",
        ]);
        let Commands::Info(args) = cli.command else {
            panic!("Expected 'info' subcommand");
        };
        assert_eq!(args.event, Some(7));
        assert_eq!(args.time_offset, -12.5);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["airshower", "-q", "-v", "info"]).is_err());
    }
}
