use clap::{Args, Parser, Subcommand};
use fepath::engine::config::FitType;
use fepath::engine::integration::IntegrationMethod;
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
    about = "fepath - Free-energy profiles from mean-force data and interpolated image chains between crystal structures.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fit a mean-force table and integrate it into a free-energy profile.
    Integrate(IntegrateArgs),
    /// Interpolate selected atoms between two POSCAR files into a chain of images.
    Interpolate(InterpolateArgs),
}

/// Arguments for the `integrate` subcommand.
#[derive(Args, Debug)]
pub struct IntegrateArgs {
    /// Whitespace-delimited table of `label coordinate mean-force standard-error` rows.
    #[arg(required = true, value_name = "DATA")]
    pub data: PathBuf,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Curve model: 'poly', 'spline' or 'raw'.
    #[arg(long = "fit", value_name = "TYPE")]
    pub fit_type: Option<FitType>,

    /// Polynomial degree (only used with '--fit poly').
    #[arg(short, long, value_name = "INT")]
    pub degree: Option<usize>,

    /// Integration method: 'quad' (q) or 'trapezoid' (t). Ignored in raw mode.
    #[arg(short, long, value_name = "METHOD")]
    pub method: Option<IntegrationMethod>,

    /// Override `integrate.dense` from the config file.
    #[command(flatten)]
    pub dense: DenseSampling,

    /// Override `integrate.invert-axis` from the config file.
    #[command(flatten)]
    pub axis: AxisDirection,

    /// Directory receiving the plot data files.
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S integrate.degree=4
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,
}

/// A group to handle mutually exclusive flags for the sampling grid.
#[derive(Args, Debug, Clone, Copy, Default)]
#[group(required = false, multiple = false)]
pub struct DenseSampling {
    /// Integrate on a dense 500-point grid over the data range.
    #[arg(long)]
    pub dense: bool,
    /// Integrate on the original sample coordinates.
    #[arg(long)]
    pub no_dense: bool,
}

impl DenseSampling {
    pub fn as_override(&self) -> Option<bool> {
        match (self.dense, self.no_dense) {
            (true, false) => Some(true),
            (false, true) => Some(false),
            _ => None,
        }
    }
}

/// On/off pair for the plot x-axis direction.
#[derive(Args, Debug, Clone, Copy, Default)]
#[group(required = false, multiple = false)]
pub struct AxisDirection {
    /// Plot the reaction coordinate from right to left.
    #[arg(long)]
    pub invert_axis: bool,
    /// Plot the reaction coordinate from left to right.
    #[arg(long)]
    pub no_invert_axis: bool,
}

impl AxisDirection {
    pub fn as_override(&self) -> Option<bool> {
        match (self.invert_axis, self.no_invert_axis) {
            (true, false) => Some(true),
            (false, true) => Some(false),
            _ => None,
        }
    }
}

/// Arguments for the `interpolate` subcommand.
#[derive(Args, Debug)]
pub struct InterpolateArgs {
    /// POSCAR file of the initial structure.
    #[arg(long, required = true, value_name = "PATH")]
    pub initial: PathBuf,

    /// POSCAR file of the final structure.
    #[arg(long = "final", required = true, value_name = "PATH")]
    pub final_path: PathBuf,

    /// Comma-separated labels of the atoms to move, e.g. 'O35,H21,H22'.
    #[arg(short, long, value_name = "LIST")]
    pub atoms: Option<String>,

    /// Number of intermediate images.
    #[arg(short = 'n', long, value_name = "INT")]
    pub images: Option<usize>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory receiving the numbered image directories.
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S interpolate.images=5
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn integrate_flags_parse_into_core_types() {
        let cli = Cli::parse_from([
            "fepath", "-vv", "integrate", "data.txt", "--fit", "spline", "-m", "t", "--no-dense",
            "--invert-axis",
        ]);
        assert_eq!(cli.verbose, 2);
        let Commands::Integrate(args) = cli.command else {
            panic!("expected integrate");
        };
        assert_eq!(args.fit_type, Some(FitType::Spline));
        assert_eq!(args.method, Some(IntegrationMethod::Trapezoid));
        assert_eq!(args.dense.as_override(), Some(false));
        assert_eq!(args.axis.as_override(), Some(true));
    }

    #[test]
    fn axis_flags_are_mutually_exclusive_and_optional() {
        let cli = Cli::parse_from(["fepath", "integrate", "data.txt", "--no-invert-axis"]);
        let Commands::Integrate(args) = cli.command else {
            panic!("expected integrate");
        };
        assert_eq!(args.axis.as_override(), Some(false));

        let cli = Cli::parse_from(["fepath", "integrate", "data.txt"]);
        let Commands::Integrate(args) = cli.command else {
            panic!("expected integrate");
        };
        assert_eq!(args.axis.as_override(), None);

        let result = Cli::try_parse_from([
            "fepath", "integrate", "data.txt", "--invert-axis", "--no-invert-axis",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_fit_type_is_rejected_by_the_parser() {
        let result = Cli::try_parse_from(["fepath", "integrate", "data.txt", "--fit", "cubic"]);
        assert!(result.is_err());
    }

    #[test]
    fn dense_flags_are_mutually_exclusive() {
        let result =
            Cli::try_parse_from(["fepath", "integrate", "data.txt", "--dense", "--no-dense"]);
        assert!(result.is_err());
    }

    #[test]
    fn interpolate_requires_both_endpoints() {
        assert!(Cli::try_parse_from(["fepath", "interpolate", "--initial", "a"]).is_err());
        let cli = Cli::parse_from([
            "fepath", "interpolate", "--initial", "a", "--final", "b", "-a", "O35,H21", "-n", "5",
        ]);
        let Commands::Interpolate(args) = cli.command else {
            panic!("expected interpolate");
        };
        assert_eq!(args.final_path, PathBuf::from("b"));
        assert_eq!(args.atoms.as_deref(), Some("O35,H21"));
        assert_eq!(args.images, Some(5));
    }
}
