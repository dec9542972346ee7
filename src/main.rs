//! cv-depth CLI: depth queries and regression checks on stereo image pairs.

use clap::{Args, Parser, Subcommand};
use cv_depth::annotate::annotate_match;
use cv_depth::depth::triangulate;
use cv_depth::prelude::*;
use cv_depth::regression::{self, StereoPair, DEFAULT_TOLERANCE};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "cv-depth")]
#[command(about = "Estimate per-pixel depth from stereo image pairs by block matching")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the depth at a single pixel.
    Depth(DepthArgs),

    /// Check computed depths against regression test cases.
    Check(CheckArgs)
}

#[derive(Debug, Args)]
struct DepthArgs {
    /// Directory within the data directory containing lhs.jpg and rhs.jpg.
    #[arg(long)]
    image_dir: String,

    /// x coordinate of the pixel.
    #[arg(long)]
    x: usize,

    /// y coordinate of the pixel.
    #[arg(long)]
    y: usize,

    /// Displacement between the two cameras.
    #[arg(long, default_value_t = 100.0, allow_negative_numbers = true)]
    displacement: f64,

    /// Root directory of the stereo data sets.
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// JSON parameter file replacing the built-in parameters (and --displacement).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write a side-by-side image of the match to this path.
    #[arg(long)]
    annotate: Option<PathBuf>
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Run every test case in the test directory.
    #[arg(long, conflicts_with = "tests")]
    all: bool,

    /// Test cases to run.
    #[arg(long, num_args = 1..)]
    tests: Vec<String>,

    /// Root directory of the stereo data sets.
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Directory of test case files.
    #[arg(long, default_value = "tests/data")]
    test_dir: PathBuf,

    /// Absolute depth tolerance.
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    tolerance: f64,

    /// JSON parameter file replacing the built-in parameters.
    #[arg(long)]
    config: Option<PathBuf>
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let res = match cli.command {
        Commands::Depth(args) => run_depth(args),
        Commands::Check(args) => run_check(args)
    };

    match res {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&Path>, fallback: StereoConfig) -> CliResult<StereoConfig> {
    match path {
        Some(path) => Ok(StereoConfig::from_json_file(path)?),
        None => Ok(fallback)
    }
}

fn run_depth(args: DepthArgs) -> CliResult<bool> {
    let config = load_config(
        args.config.as_deref(),
        StereoConfig::single_query(args.displacement)
    )?;
    config.depth.validate()?;

    let pair = StereoPair::load(&args.data_dir, &args.image_dir)?;
    let c = Coordinates::new(args.x, args.y);

    let m = search(&pair.lhs, &pair.rhs, c, &config.search)?;

    #[cfg(feature = "statistics")]
    plot_search_statistics(&pair, c, &config.search);

    if let Some(path) = &args.annotate {
        annotate_match(&pair.lhs, &pair.rhs, c, &m, &config.search).save(path)?;
        log::info!("Wrote annotated match to {}", path.display());
    }

    if !m.is_confident() {
        log::warn!(
            "No block scored below {}; depth is based on the search region centre",
            config.search.max_ssd
        );
    }

    let depth = triangulate(c, Raster::width(&pair.lhs), m.coords - c, &config.depth)?;

    println!("{}", depth);

    Ok(true)
}

/// Plot the per-row minimum SSD of the search. Failures are logged and do not fail the query.
#[cfg(feature = "statistics")]
fn plot_search_statistics(pair: &StereoPair, c: Coordinates, params: &SearchParams) {
    use cv_depth::search::row_minima;
    use cv_depth::statistics::{plot_row_minima, ROW_MINIMA_PLOT};

    let res = row_minima(&pair.lhs, &pair.rhs, c, params)
        .and_then(|minima| plot_row_minima(&minima, ROW_MINIMA_PLOT));

    match res {
        Ok(()) => log::info!("Wrote search statistics to {}", ROW_MINIMA_PLOT),
        Err(e) => log::warn!("Could not plot search statistics: {}", e)
    }
}

fn run_check(args: CheckArgs) -> CliResult<bool> {
    let tests = if args.all {
        regression::list_cases(&args.test_dir)?
    }
    else if args.tests.is_empty() {
        return Err("No tests specified - see help for details".into());
    }
    else {
        args.tests
    };

    let config = load_config(args.config.as_deref(), StereoConfig::regression())?;

    let mut all_passed = true;
    for name in &tests {
        let report =
            regression::run_case(&args.data_dir, &args.test_dir, name, &config, args.tolerance)?;

        for failure in report.failures() {
            println!("{}", failure);
        }

        let failed = report.failures().count();
        log::info!(
            "{}: {}/{} samples passed",
            name,
            report.outcomes.len() - failed,
            report.outcomes.len()
        );

        all_passed &= report.passed();
    }

    Ok(all_passed)
}
