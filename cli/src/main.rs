mod report;

use std::path::PathBuf;

use clap::{Parser as ClapParser, Subcommand};
use tracing_subscriber::EnvFilter;

use vigil_core::analysis::{AnalysisResult, Meta, ModuleFailure, Parser};
use vigil_core::modules::{core_meta, tank_meta};
use vigil_core::AnalysisContext;

use report::{ReportError, ReportMeta};

#[derive(ClapParser)]
#[command(version, about = "Combat log analysis pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse one participant's events and print the results
    Analyse {
        /// Run metadata JSON (encounter, actors, subject)
        #[arg(short, long)]
        meta: PathBuf,
        /// Event sequence JSON, time-ascending
        #[arg(short, long)]
        events: PathBuf,
        /// Emit raw JSON instead of the plain-text summary
        #[arg(long)]
        json: bool,
    },
    /// Print the resolved module execution order for a run
    Modules {
        #[arg(short, long)]
        meta: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Analyse { meta, events, json } => analyse(&meta, &events, json).await,
        Commands::Modules { meta } => list_modules(&meta).await,
    }
    .map_err(|e| e.to_string())
}

async fn analyse(
    meta_path: &PathBuf,
    events_path: &PathBuf,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let meta = report::load_meta(meta_path).await?;
    let mut parser = build_parser(meta)?;

    // Fetch the event sequence while modules configure; both must complete
    // before parsing starts. Dropping this future cancels both cleanly.
    let (events, ()) = tokio::try_join!(report::load_events(events_path), async {
        parser.configure().await;
        Ok::<(), ReportError>(())
    })?;

    tracing::debug!("[CLI] parsing {} event(s)", events.len());
    parser.parse_events(events);
    let results = parser.generate_results();

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_summary(&results, parser.failures());
    }
    Ok(())
}

async fn list_modules(meta_path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let meta = report::load_meta(meta_path).await?;
    let parser = build_parser(meta)?;
    for handle in parser.module_order() {
        println!("{handle}");
    }
    Ok(())
}

fn build_parser(meta: ReportMeta) -> Result<Parser, Box<dyn std::error::Error>> {
    let merged = Meta::merge_all(&[core_meta(), tank_meta()])?;
    let ctx = AnalysisContext::new(meta.encounter, meta.actors, meta.subject);
    Ok(Parser::new(&merged, ctx)?)
}

fn print_summary(results: &[AnalysisResult], failures: &[ModuleFailure]) {
    if results.is_empty() {
        println!("No findings.");
    }
    for result in results {
        println!("── {} ──", result.title);
        match serde_json::to_string_pretty(&result.content) {
            Ok(body) => println!("{body}"),
            Err(_) => println!("{:?}", result.content),
        }
        println!();
    }

    if !failures.is_empty() {
        println!(
            "{} analysis module(s) could not complete:",
            failures.len()
        );
        for failure in failures {
            println!("  - {failure}");
        }
    }
}
