//! Questions command implementation

use anyhow::{bail, Result};
use std::io::{self, Write};
use tracing::info;

use super::render;
use super::{AppContext, OutputFormat};

pub fn run(config: Option<&str>, locale: Option<String>, format: OutputFormat) -> Result<()> {
    let ctx = AppContext::load(config)?;
    let locale = ctx.locale(locale.as_deref())?;
    let questions = ctx.selector.get_questions(locale);
    info!("Listing {} questions (locale: {})", questions.len(), locale);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Table => render::write_questions_table(&mut out, questions)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, questions)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => bail!("CSV output is not supported for questions, use table or json"),
    }

    Ok(())
}
