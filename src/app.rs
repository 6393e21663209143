//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - fits the retention curve
//! - runs the LTV / ROAS projection
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::cli::{BenchmarkArgs, Command, InputArgs, PlotArgs, ProjectArgs, SweepArgs};
use crate::domain::{LtvConfig, MonetizationInputs, RetentionObservation};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `ltv` binary.
pub fn run() -> Result<(), AppError> {
    init_tracing();

    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Project(args) => handle_project(args),
        Command::Sweep(args) => handle_sweep(args),
        Command::Plot(args) => handle_plot(args),
        Command::Benchmark(args) => handle_benchmark(args),
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_project(args: ProjectArgs) -> Result<(), AppError> {
    let config = config_from_args(&args);
    let run = pipeline::run_projection(&config)?;

    println!("{}", crate::report::format_run_summary(&run.report));

    if config.plot {
        let plot = crate::plot::render_report_plot(&run.report, config.plot_width, config.plot_height);
        println!("{plot}");
    }

    if let Some(path) = &config.export_ltv {
        crate::io::export::write_day_ltv_csv(path, &run.report.result.day_ltv)?;
    }
    if let Some(path) = &config.export_report {
        crate::io::report::write_report_json(path, &run.report)?;
    }

    Ok(())
}

fn handle_sweep(args: SweepArgs) -> Result<(), AppError> {
    if args.cpis.is_empty() || args.goals.is_empty() {
        return Err(AppError::new(2, "Sweep needs at least one CPI and one ROAS goal."));
    }
    let config = config_from_inputs(&args.inputs);
    let (fit, rows) = pipeline::run_sweep(&config, &args.cpis, &args.goals)?;

    println!(
        "Power curve: a={:.6} b={:.6} | ARPDAU: ${}\n",
        fit.params.a, fit.params.b, config.inputs.arpdau
    );
    println!("{}", crate::report::format_scenarios(&rows));
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let report = crate::io::report::read_report_json(&args.report)?;
    let plot = crate::plot::render_report_plot(&report, args.width, args.height);
    println!("{plot}");
    Ok(())
}

fn handle_benchmark(args: BenchmarkArgs) -> Result<(), AppError> {
    let client = crate::data::BenchmarkClient::from_env();
    let table = client.fetch_table()?;

    if args.list || args.genre.is_none() {
        println!("Genres: {}", table.genres().join(", "));
        println!("Geos: {}", table.geos().join(", "));
    }

    if let (Some(genre), Some(geo)) = (&args.genre, &args.geo) {
        let Some(defaults) = table.lookup(genre, geo) else {
            return Err(AppError::new(
                2,
                format!("No benchmark data for genre '{genre}' and geo '{geo}'."),
            ));
        };
        println!("Benchmarks for {} / {}:", defaults.genre, defaults.geo);
        for (day, pct) in &defaults.retention_percent {
            println!("- D{day} retention: {pct:.2}%");
        }
        match defaults.arpdau {
            Some(v) => println!("- ARPDAU: ${v:.3}"),
            None => warn!(genre = %genre, geo = %geo, "no ARPDAU benchmark for pair"),
        }
        println!("(Benchmarks are advisory and do not influence the LTV calculation.)");
    }

    Ok(())
}

/// Retention observations from CLI inputs: D1/D7/D30 plus any `--point` extras.
pub fn observations_from_args(args: &InputArgs) -> Vec<RetentionObservation> {
    let mut out = vec![
        RetentionObservation::from_percent(1, args.d1),
        RetentionObservation::from_percent(7, args.d7),
        RetentionObservation::from_percent(30, args.d30),
    ];
    out.extend(
        args.points
            .iter()
            .map(|&(day, pct)| RetentionObservation::from_percent(day, pct)),
    );
    out.sort_by_key(|o| o.day);
    out
}

pub fn config_from_inputs(args: &InputArgs) -> LtvConfig {
    LtvConfig {
        observations: observations_from_args(args),
        inputs: MonetizationInputs {
            arpdau: args.arpdau,
            cpi: args.cpi,
            roas_goal_percent: args.roas_goal,
            horizon_day: args.horizon,
        },
        allow_non_monotone: args.allow_non_monotone,
        retry_fit: args.retry_fit,
        search: args.search,
        plot: false,
        plot_width: 80,
        plot_height: 20,
        export_ltv: None,
        export_report: None,
    }
}

pub fn config_from_args(args: &ProjectArgs) -> LtvConfig {
    LtvConfig {
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_ltv: args.export_ltv.clone(),
        export_report: args.export_report.clone(),
        ..config_from_inputs(&args.inputs)
    }
}

/// Rewrite argv so `ltv` defaults to `ltv project`.
///
/// Rules:
/// - `ltv`                      -> `ltv project`
/// - `ltv --d1 40 ...`          -> `ltv project --d1 40 ...`
/// - `ltv --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("project".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "project" | "sweep" | "plot" | "benchmark");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "project flags".
    if arg1.starts_with('-') {
        argv.insert(1, "project".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn rewrite_defaults_to_project() {
        assert_eq!(rewrite_args(argv(&["ltv"])), argv(&["ltv", "project"]));
        assert_eq!(
            rewrite_args(argv(&["ltv", "--d1", "40"])),
            argv(&["ltv", "project", "--d1", "40"])
        );
        assert_eq!(rewrite_args(argv(&["ltv", "--help"])), argv(&["ltv", "--help"]));
        assert_eq!(rewrite_args(argv(&["ltv", "sweep"])), argv(&["ltv", "sweep"]));
    }

    #[test]
    fn observations_include_extra_points_sorted() {
        let args = InputArgs {
            points: vec![(14, 6.0), (3, 18.0)],
            ..InputArgs::default()
        };
        let obs = observations_from_args(&args);
        let days: Vec<u32> = obs.iter().map(|o| o.day).collect();
        assert_eq!(days, vec![1, 3, 7, 14, 30]);
        assert!((obs[0].retention - 0.305).abs() < 1e-12);
    }

    #[test]
    fn project_config_respects_no_plot() {
        let args = ProjectArgs {
            inputs: InputArgs::default(),
            plot: true,
            no_plot: true,
            width: 60,
            height: 10,
            export_ltv: None,
            export_report: None,
        };
        let config = config_from_args(&args);
        assert!(!config.plot);
        assert_eq!(config.plot_width, 60);
        assert_eq!(config.inputs.horizon_day, 90);
        assert_eq!(config.observations.len(), 3);
    }
}
