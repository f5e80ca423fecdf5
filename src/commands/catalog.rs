//! Catalog command implementation

use anyhow::Result;
use option_strategy_selector::{MarketViewCategory, StrategyRecord};
use std::io::{self, Write};
use tracing::info;

use super::render;
use super::{AppContext, OutputFormat};

pub fn run(
    config: Option<&str>,
    locale: Option<String>,
    category: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let ctx = AppContext::load(config)?;
    let locale = ctx.locale(locale.as_deref())?;
    let only = category
        .as_deref()
        .map(str::parse::<MarketViewCategory>)
        .transpose()?;

    let catalog = ctx.selector.catalog();
    let records: Vec<StrategyRecord> = catalog
        .categories()
        .filter(|(c, _)| only.map_or(true, |o| o == *c))
        .flat_map(|(c, _)| catalog.category(locale, c))
        .collect();
    info!(
        "Listing {} strategies (locale: {}, category: {})",
        records.len(),
        locale,
        only.map_or_else(|| "all".to_string(), |c| c.to_string())
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Table => {
            render::write_catalog_table(&mut out, ctx.labels(locale)?, catalog, locale, only)?
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &records)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => render::write_csv(&mut out, &records)?,
    }

    Ok(())
}
