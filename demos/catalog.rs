//! Print a dataset as a plain-text table
//!
//! Usage:
//!
//! ```text
//! cargo run --example catalog -- [books|episodes] [data.json] [search] [sort]
//! cargo run --example catalog -- episodes demos/data/episodes.json rose rank:desc
//! ```
//!
//! Set `RUST_LOG=recordview=debug` to see each pipeline run.

use anyhow::{Context, Result};
use recordview::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let preset: Preset = args
        .next()
        .unwrap_or_else(|| "episodes".to_string())
        .parse()
        .map_err(anyhow::Error::msg)?;
    let path = args
        .next()
        .unwrap_or_else(|| format!("demos/data/{}.json", preset));
    let text = args.next().unwrap_or_default();
    let sort = args.next();

    let config = ViewConfig::preset(preset)?;
    let records = load_records_file(&path, &config.envelope_keys())
        .with_context(|| format!("Failed to load {}", path))?;
    tracing::info!(dataset = %config.name, records = records.len(), "Loaded dataset");

    let mut state = AppState::new(records, config.schema()).with_text(text);
    if let Some(sort) = sort {
        state = state.with_sort(SortSpec::parse(&sort));
    }

    let view = state.view();
    let registry = &state.schema().registry;
    let headers = ViewOutput::headers(registry);
    let rows = view.display_rows(registry);

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join(" | ")
    };

    println!("{}", line(&headers));
    println!("{}", "-".repeat(widths.iter().sum::<usize>() + 3 * widths.len().saturating_sub(1)));
    for (entry, row) in view.entries.iter().zip(&rows) {
        let flag = if view.warnings_for(entry.index).next().is_some() { " !" } else { "" };
        println!("{}{}", line(row), flag);
    }

    println!("\n{} of {} records shown", view.len(), state.records().len());
    if view.warning_count() > 0 {
        println!("{} warnings:", view.warning_count());
        for warning in &view.warnings {
            println!("  [{}] record {}: {}", warning.code, warning.record.index, warning.message);
        }
    }

    Ok(())
}
