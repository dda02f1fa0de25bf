use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dashboard_analytics::models::ColorOverrides;
use dashboard_analytics::style::ColorAssigner;
use dashboard_analytics::viz::PlacementConfig;
use dashboard_analytics::{Pipeline, stats, storage};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "dashan",
    version,
    about = "Aggregate tabular data into chart series with placed labels"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a chart result from rows and a chart configuration.
    Build(BuildArgs),
}

#[derive(Args, Debug)]
struct BuildArgs {
    /// Input rows (.csv, .tsv or .json array of objects).
    #[arg(short, long)]
    data: PathBuf,
    /// Chart configuration (JSON).
    #[arg(short, long)]
    config: PathBuf,
    /// Colour overrides (JSON: { slot: { title: "#RRGGBB" } }).
    #[arg(long)]
    colors: Option<PathBuf>,
    /// Write the chart result here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Seed for synthesized colours (reproducible output).
    #[arg(long)]
    seed: Option<u64>,
    /// Canvas width used for label placement.
    #[arg(long, default_value_t = 1000.0)]
    width: f64,
    /// Canvas height used for label placement.
    #[arg(long, default_value_t = 400.0)]
    height: f64,
    /// Print per-series statistics to stderr.
    #[arg(long, default_value_t = false)]
    stats: bool,
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            // Format up to 4 decimals, then trim trailing zeros and trailing dot.
            let s = format!("{:.4}", x);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "NA".to_string(),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Build(args) => cmd_build(args),
    }
}

fn cmd_build(args: BuildArgs) -> Result<()> {
    let rows = storage::source_for(&args.data)
        .rows()
        .with_context(|| format!("loading rows from {}", args.data.display()))?;
    let config = storage::load_config(&args.config)?;
    let overrides = match args.colors.as_ref() {
        Some(p) => storage::load_color_overrides(p)?,
        None => ColorOverrides::default(),
    };

    let colors = match args.seed {
        Some(seed) => ColorAssigner::seeded(seed),
        None => ColorAssigner::default(),
    };
    let placement = PlacementConfig {
        width: args.width,
        height: args.height,
        ..PlacementConfig::default()
    };
    let pipeline = Pipeline::new(colors, placement);
    let result = pipeline.try_build(&rows, &config, &overrides)?;

    match args.out.as_ref() {
        Some(path) => {
            storage::save_json(&result, path)?;
            eprintln!("Wrote {} series to {}", result.series.len(), path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&result)?),
    }

    if let Some(decision) = result.grouping.as_ref().filter(|d| d.changed()) {
        eprintln!(
            "Grouping changed from {:?} to {:?}",
            decision.requested, decision.effective
        );
    }

    if args.stats {
        for s in stats::series_summary(&result.series) {
            eprintln!(
                "{}  count={} missing={} labelled={}  min={} max={} mean={} median={}",
                s.title,
                s.count,
                s.missing,
                s.labelled,
                fmt_opt(s.min),
                fmt_opt(s.max),
                fmt_opt(s.mean),
                fmt_opt(s.median)
            );
        }
    }

    Ok(())
}
