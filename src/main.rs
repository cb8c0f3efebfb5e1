use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use hoops_whatif::config::{self, AppConfig};
use hoops_whatif::export::{self, ExportOptions};
use hoops_whatif::fake_league;
use hoops_whatif::ingest;
use hoops_whatif::pipeline::{self, PeriodAnalysis};
use hoops_whatif::season;
use hoops_whatif::stats::PeriodLabel;

#[derive(Parser)]
#[command(name = "hoops_whatif")]
#[command(about = "What-if standings and minimum victory paths for H2H category leagues", long_about = None)]
struct Cli {
    /// Category config JSON (overrides WHATIF_CATEGORY_CONFIG)
    #[arg(long, global = true)]
    categories: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one scoring week
    Week {
        /// Team stats JSON for the week
        #[arg(long)]
        input: PathBuf,

        #[arg(long)]
        week: u32,

        /// Output root (overrides WHATIF_OUTPUT_DIR)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Also write an xlsx workbook
        #[arg(long, default_value = "false")]
        xlsx: bool,
    },

    /// Analyze every week, then the aggregated season
    Season {
        /// Weekly team stats JSON files, in week order
        #[arg(long = "input", required = true)]
        inputs: Vec<PathBuf>,

        /// Week number of the first input
        #[arg(long, default_value_t = 1)]
        first_week: u32,

        #[arg(long)]
        out: Option<PathBuf>,

        #[arg(long, default_value = "false")]
        xlsx: bool,
    },

    /// Run a synthetic league and print the standings
    Demo {
        #[arg(long, default_value_t = 12)]
        teams: usize,

        #[arg(long, default_value_t = 7)]
        seed: u64,
    },
}

fn main() -> Result<()> {
    config::load_dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut cfg = AppConfig::from_env()?;
    if let Some(path) = cli.categories.as_deref() {
        cfg.categories = config::load_category_config(path)?;
    }

    let pool = config::build_pool(cfg.parallelism);
    match pool {
        Some(pool) => pool.install(|| run(cli.command, &cfg)),
        None => run(cli.command, &cfg),
    }
}

fn run(command: Commands, cfg: &AppConfig) -> Result<()> {
    match command {
        Commands::Week {
            input,
            week,
            out,
            xlsx,
        } => {
            let table = ingest::load_period_file(&input, PeriodLabel::Week(week))?;
            let analysis = pipeline::analyze_period(table, &cfg.categories)
                .with_context(|| format!("analyze week {week}"))?;
            let root = out.unwrap_or_else(|| cfg.output_dir.clone());
            let report = export::write_period_outputs(
                &root,
                &analysis,
                ExportOptions {
                    xlsx: xlsx || cfg.write_xlsx,
                },
            )?;
            print_standings(&analysis);
            println!("Wrote {} files to {}", report.files.len(), report.dir.display());
        }

        Commands::Season {
            inputs,
            first_week,
            out,
            xlsx,
        } => {
            let root = out.unwrap_or_else(|| cfg.output_dir.clone());
            let options = ExportOptions {
                xlsx: xlsx || cfg.write_xlsx,
            };

            let mut tables = Vec::with_capacity(inputs.len());
            for (offset, path) in inputs.iter().enumerate() {
                let week = first_week + offset as u32;
                let table = ingest::load_period_file(path, PeriodLabel::Week(week))?;
                // A bad week only loses its own file set.
                match pipeline::analyze_period(table.clone(), &cfg.categories) {
                    Ok(analysis) => {
                        export::write_period_outputs(&root, &analysis, options)?;
                    }
                    Err(err) => warn!(week, %err, "skipping week outputs"),
                }
                tables.push(table);
            }
            if tables.is_empty() {
                return Err(anyhow!("no weekly inputs given"));
            }

            let season_table = season::aggregate_season(&tables)?;
            let analysis = pipeline::analyze_period(season_table, &cfg.categories)
                .context("analyze season aggregate")?;
            let report = export::write_period_outputs(&root, &analysis, options)?;
            info!(weeks = tables.len(), "season aggregate complete");
            print_standings(&analysis);
            println!("Wrote {} files to {}", report.files.len(), report.dir.display());
        }

        Commands::Demo { teams, seed } => {
            let table = fake_league::fake_week(teams.max(1), 1, seed)?;
            let analysis = pipeline::analyze_period(table, &cfg.categories)?;
            print_standings(&analysis);
        }
    }
    Ok(())
}

fn print_standings(analysis: &PeriodAnalysis) {
    println!("Standings ({})", analysis.table.label());
    for (pos, ranked) in analysis.totals.ranking.iter().enumerate() {
        let per_game = analysis.per_game.scores[ranked.index];
        println!(
            "{:>2}. {:<24} score {:>3}  per-game {:>3}",
            pos + 1,
            export::ascii_name(&ranked.name),
            ranked.score,
            per_game
        );
    }

    let keys: Vec<&str> = analysis.mvp.categories.iter().map(|c| c.key()).collect();
    println!();
    println!("MVP deltas: {}", keys.join(" "));
    for row in &analysis.mvp.rows {
        let cells: Vec<String> = row.deltas.iter().map(|d| export::fmt_num(*d)).collect();
        println!("  {:<24} {}", export::ascii_name(&row.name), cells.join(" "));
    }
    if !analysis.mvp.unresolved.is_empty() {
        println!("  ({} pairs could not be resolved)", analysis.mvp.unresolved.len());
    }
}
