//! Interactive questionnaire on the terminal

use anyhow::{Context, Result};
use option_strategy_selector::{
    AnswerSet, LabelSet, Locale, QuestionnaireSession, Recommendation, Step, StrategySelector,
};
use std::io::{self, BufRead, Write};
use tracing::{debug, info};

use super::render;
use super::AppContext;

/// What the user typed at a prompt
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Choose(usize),
    Back,
    ToggleLocale,
    Restart,
    Quit,
    Invalid,
}

fn parse_input(line: &str) -> Input {
    match line.trim().to_lowercase().as_str() {
        "b" | "back" => Input::Back,
        "l" | "lang" => Input::ToggleLocale,
        "r" | "restart" => Input::Restart,
        "q" | "quit" | "exit" => Input::Quit,
        other => other.parse().map(Input::Choose).unwrap_or(Input::Invalid),
    }
}

fn write_prompt<W: Write>(
    out: &mut W,
    session: &QuestionnaireSession,
    labels: &LabelSet,
) -> Result<()> {
    let labels = labels
        .get(session.locale())
        .with_context(|| format!("No labels for locale '{}'", session.locale()))?;
    let Some(question) = session.current() else {
        return Ok(());
    };
    let chosen = session.current_answer();

    writeln!(out)?;
    writeln!(
        out,
        "[{}/{}] {}",
        session.position() + 1,
        session.total(),
        question.text
    )?;
    for (i, option) in question.options.iter().enumerate() {
        let marker = if chosen == Some(option.value.as_str()) { "*" } else { " " };
        writeln!(out, " {}{}. {}", marker, i + 1, option.label)?;
    }
    writeln!(out, "({})", labels.navigation)?;
    write!(out, "> ")?;
    out.flush()?;
    Ok(())
}

/// Drive a session from `input` until it completes or the user quits.
/// Returns `None` on quit or end of input.
pub fn run_session<R: BufRead, W: Write>(
    selector: &StrategySelector,
    labels: &LabelSet,
    locale: Locale,
    mut input: R,
    out: &mut W,
) -> Result<Option<(AnswerSet, Recommendation)>> {
    let mut session = QuestionnaireSession::new(selector, locale);
    let mut line = String::new();

    loop {
        write_prompt(out, &session, labels)?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(None);
        }

        match parse_input(&line) {
            Input::Choose(position) => match session.choose(position) {
                Some(Step::Next) => {}
                Some(Step::Complete) => {
                    let recommendation = session.finish()?;
                    return Ok(Some((session.answers().clone(), recommendation)));
                }
                None => {
                    if let Some(labels) = labels.get(session.locale()) {
                        writeln!(out, "{}", labels.select_option)?;
                    }
                }
            },
            Input::Back => {
                session.back();
            }
            Input::ToggleLocale => {
                let locale = session.toggle_locale();
                debug!(%locale, "Locale toggled");
            }
            Input::Restart => session.restart(),
            Input::Quit => return Ok(None),
            Input::Invalid => {
                if let Some(labels) = labels.get(session.locale()) {
                    writeln!(out, "{}", labels.select_option)?;
                }
            }
        }
    }
}

pub fn run(config: Option<&str>, locale: Option<String>, symbol: String) -> Result<()> {
    let symbol = super::normalize_symbol(&symbol)?;
    let ctx = AppContext::load(config)?;
    let locale = ctx.locale(locale.as_deref())?;
    info!("Starting interactive session (locale: {})", locale);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let labels = ctx.labels(locale)?;
    writeln!(out, "{}", labels.title)?;
    writeln!(out, "{}", labels.subtitle)?;

    let Some((answers, recommendation)) =
        run_session(&ctx.selector, &ctx.labels, locale, stdin.lock(), &mut out)?
    else {
        info!("Session ended without a recommendation");
        return Ok(());
    };
    info!(
        "Session complete: {:?} ({})",
        recommendation.ids(),
        if recommendation.outcome.is_fallback() { "fallback" } else { "exact" }
    );

    writeln!(out)?;
    render::write_recommendation_table(
        &mut out,
        ctx.labels(recommendation.locale)?,
        ctx.selector.question_bank(),
        &symbol,
        &answers,
        &recommendation,
    )?;

    Ok(())
}
