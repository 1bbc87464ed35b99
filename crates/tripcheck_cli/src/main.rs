//! CLI entry point for inspecting composed checklists.
//!
//! # Responsibility
//! - Verify `tripcheck_core` linkage (`ping`, version).
//! - Print a destination's composed and annotated checklist as plain text.

use clap::Parser;
use log::info;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::process::ExitCode;
use tripcheck_core::{
    annotate_item, category_report, compose_checklist, init_logging_from_config, CoreConfig,
    DurationSelection, Segment,
};

#[derive(Parser)]
#[command(name = "tripcheck")]
#[command(about = "Print a destination's composed travel checklist")]
struct Cli {
    /// Path to a JSON config file
    #[arg(short, long, env = "TRIPCHECK_CONFIG")]
    config: Option<PathBuf>,

    /// Destination key, e.g. `japan` (overrides config default)
    #[arg(long)]
    country: Option<String>,

    /// Trip length in nights: `1`, `2-3`, `4-6`, `7+`
    #[arg(long)]
    duration: Option<String>,

    /// Item ids to treat as checked when reporting categories
    #[arg(long = "checked", value_delimiter = ',')]
    checked: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("tripcheck: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    println!("tripcheck_core ping={}", tripcheck_core::ping());
    println!("tripcheck_core version={}", tripcheck_core::core_version());

    let config = match &cli.config {
        Some(path) => CoreConfig::load(path).map_err(|err| err.to_string())?,
        None => CoreConfig::default(),
    };
    init_logging_from_config(&config)?;

    let country = cli.country.or_else(|| config.default_country.clone());
    let duration = cli
        .duration
        .as_deref()
        .map(DurationSelection::parse)
        .transpose()
        .map_err(|err| err.to_string())?;

    let dataset = config.dataset().map_err(|err| err.to_string())?;
    let lexicon = config.lexicon().map_err(|err| err.to_string())?;
    info!(
        "event=cli_render module=cli status=start country={} duration={}",
        country.as_deref().unwrap_or("-"),
        cli.duration.as_deref().unwrap_or("-")
    );

    let sections = compose_checklist(&dataset, country.as_deref(), duration);
    for section in &sections {
        println!();
        println!("## {}", section.title);
        for item in &section.items {
            let annotated = annotate_item(&lexicon, item, country.as_deref());
            println!("- [{}] {}", item.id, render(&annotated.title));
            if !item.description.is_empty() {
                println!("    {}", render(&annotated.description));
            }
        }
    }

    let checked: BTreeSet<String> = cli.checked.into_iter().collect();
    let report = category_report(&dataset.categories, &sections, &checked);
    println!();
    println!("categories {}/{} complete", report.completed, report.total);
    for status in &report.categories {
        let mark = if status.completed { "x" } else { " " };
        println!(
            "[{mark}] {} ({}/{})",
            status.label,
            status.checked_count,
            status.matched_ids.len()
        );
    }
    Ok(())
}

fn render(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|segment| match segment {
            Segment::Text { text } => text.clone(),
            Segment::Link { text, url, .. } => format!("[{text}]({url})"),
        })
        .collect()
}
