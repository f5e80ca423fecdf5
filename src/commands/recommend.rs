//! Recommend command implementation

use anyhow::{Context, Result};
use option_strategy_selector::{AnswerSet, MatchOutcome, QuestionId};
use std::fs;
use std::io::{self, Write};
use tracing::{debug, info, warn};

use super::render;
use super::{AppContext, OutputFormat};

pub struct RecommendArgs<'a> {
    pub config: Option<&'a str>,
    pub answers_file: Option<String>,
    pub market_view: Option<String>,
    pub price_movement: Option<String>,
    pub volatility_view: Option<String>,
    pub risk_tolerance: Option<String>,
    pub time_horizon: Option<String>,
    pub locale: Option<String>,
    pub symbol: String,
    pub format: OutputFormat,
}

/// Answers from the optional file, overridden by individual flags
fn collect_answers(args: &RecommendArgs) -> Result<AnswerSet> {
    let mut answers = match &args.answers_file {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read answers file {}", path))?;
            let answers: AnswerSet =
                serde_json::from_str(&contents).context("Failed to parse answers JSON")?;
            info!("Loaded {} answers from: {}", answers.len(), path);
            answers
        }
        None => AnswerSet::new(),
    };

    let flags = [
        (QuestionId::MarketView, &args.market_view),
        (QuestionId::PriceMovement, &args.price_movement),
        (QuestionId::VolatilityView, &args.volatility_view),
        (QuestionId::RiskTolerance, &args.risk_tolerance),
        (QuestionId::TimeHorizon, &args.time_horizon),
    ];
    for (question, value) in flags {
        if let Some(value) = value {
            answers.insert_raw(question, value.trim());
        }
    }

    Ok(answers)
}

pub fn run(args: RecommendArgs) -> Result<()> {
    let symbol = super::normalize_symbol(&args.symbol)?;
    let ctx = AppContext::load(args.config)?;
    let locale = ctx.locale(args.locale.as_deref())?;
    let answers = collect_answers(&args)?;
    debug!(?answers, %locale, "Selecting strategies");

    let recommendation = ctx
        .selector
        .select_strategies(&answers, locale)
        .context("Cannot recommend strategies")?;

    match &recommendation.outcome {
        MatchOutcome::Exact { .. } => info!(
            "Matched {} strateg{}",
            recommendation.len(),
            if recommendation.len() == 1 { "y" } else { "ies" }
        ),
        MatchOutcome::Fallback {
            risk_tolerance,
            defaulted,
            ..
        } => warn!(
            %risk_tolerance,
            defaulted,
            "No exact rule matched, using risk-tolerance default"
        ),
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Table => render::write_recommendation_table(
            &mut out,
            ctx.labels(locale)?,
            ctx.selector.question_bank(),
            &symbol,
            &answers,
            &recommendation,
        )?,
        OutputFormat::Json => {
            render::write_recommendation_json(&mut out, &symbol, &answers, &recommendation)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => render::write_csv(&mut out, &recommendation.strategies)?,
    }

    Ok(())
}
