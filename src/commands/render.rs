//! Text, JSON and CSV rendering of recommendations, catalog and questions

use anyhow::Result;
use itertools::Itertools;
use option_strategy_selector::{
    AnswerSet, Catalog, Labels, Locale, MarketViewCategory, Question, QuestionBank, QuestionId,
    Recommendation, StrategyRecord,
};
use serde::Serialize;
use std::io::Write;

const RULE_WIDTH: usize = 60;

/// JSON document written by `recommend --format json`
#[derive(Serialize)]
struct RecommendationReport<'a> {
    symbol: &'a str,
    answers: &'a AnswerSet,
    #[serde(flatten)]
    recommendation: &'a Recommendation,
}

const CSV_HEADER: [&str; 8] = [
    "id",
    "category",
    "name",
    "description",
    "risk_level",
    "profit_potential",
    "best_for",
    "iv_preference",
];

fn csv_row(record: &StrategyRecord) -> [&str; 8] {
    [
        record.id.as_str(),
        record.category.as_str(),
        record.text.name.as_str(),
        record.text.description.as_str(),
        record.text.risk_level.as_str(),
        record.text.profit_potential.as_str(),
        record.text.best_for.as_str(),
        record.text.iv_preference.as_str(),
    ]
}

pub fn write_csv<'a, W: Write>(
    out: W,
    records: impl IntoIterator<Item = &'a StrategyRecord>,
) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(CSV_HEADER)?;
    for record in records {
        writer.write_record(csv_row(record))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_recommendation_json<W: Write>(
    out: W,
    symbol: &str,
    answers: &AnswerSet,
    recommendation: &Recommendation,
) -> Result<()> {
    let report = RecommendationReport {
        symbol,
        answers,
        recommendation,
    };
    serde_json::to_writer_pretty(out, &report)?;
    Ok(())
}

fn write_strategy<W: Write>(out: &mut W, labels: &Labels, record: &StrategyRecord) -> Result<()> {
    writeln!(out, "{}", record.text.name)?;
    writeln!(out, "  {}", record.text.description)?;
    writeln!(out, "  {}: {}", labels.risk_level, record.text.risk_level)?;
    writeln!(out, "  {}: {}", labels.profit_potential, record.text.profit_potential)?;
    writeln!(out, "  {}: {}", labels.best_for, record.text.best_for)?;
    writeln!(out, "  {}: {}", labels.iv_preference, record.text.iv_preference)?;
    Ok(())
}

/// Human-readable report: symbol, answer summary and one block per strategy
pub fn write_recommendation_table<W: Write>(
    out: &mut W,
    labels: &Labels,
    questions: &QuestionBank,
    symbol: &str,
    answers: &AnswerSet,
    recommendation: &Recommendation,
) -> Result<()> {
    let locale = recommendation.locale;

    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "{}", labels.title)?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "{}: {}", labels.symbol, symbol.to_uppercase())?;
    writeln!(out)?;

    writeln!(out, "{}:", labels.your_view)?;
    for question in QuestionId::ALL {
        let value = answers
            .raw(*question)
            .map(|raw| questions.summary(locale, *question, raw).unwrap_or(raw))
            .unwrap_or(&labels.not_selected);
        writeln!(out, "  {}: {}", labels.summary_title(*question), value)?;
    }
    writeln!(out)?;

    writeln!(out, "{} ({}):", labels.recommended, recommendation.len())?;
    if recommendation.outcome.is_fallback() {
        writeln!(out, "{}", labels.fallback_notice)?;
    }
    let ignored = recommendation.outcome.ignored();
    if !ignored.is_empty() {
        let list = ignored
            .iter()
            .map(|u| format!("{}={}", u.question, u.value))
            .join(", ");
        writeln!(out, "{}: {}", labels.ignored_notice, list)?;
    }
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;

    if recommendation.is_empty() {
        writeln!(out, "{}", labels.no_strategies)?;
    }
    for record in &recommendation.strategies {
        write_strategy(out, labels, record)?;
        writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    }

    Ok(())
}

pub fn write_catalog_table<W: Write>(
    out: &mut W,
    labels: &Labels,
    catalog: &Catalog,
    locale: Locale,
    only: Option<MarketViewCategory>,
) -> Result<()> {
    for (category, _) in catalog.categories() {
        if only.map_or(false, |c| c != category) {
            continue;
        }
        writeln!(out, "[{}]", category)?;
        for record in catalog.category(locale, category) {
            write_strategy(out, labels, &record)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn write_questions_table<W: Write>(out: &mut W, questions: &[Question]) -> Result<()> {
    for (i, question) in questions.iter().enumerate() {
        writeln!(out, "{}. {} [{}]", i + 1, question.text, question.id)?;
        let values = question.options.iter().map(|o| o.value.as_str()).join("|");
        for option in &question.options {
            writeln!(out, "   - {} ({})", option.label, option.value)?;
        }
        writeln!(out, "   values: {}", values)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use option_strategy_selector::{
        LabelSet, MarketView, PriceMovement, RiskTolerance, StrategySelector, TimeHorizon,
        VolatilityView,
    };

    fn answers() -> AnswerSet {
        AnswerSet::new()
            .with(MarketView::Neutral)
            .with(PriceMovement::Small)
            .with(VolatilityView::Stable)
            .with(RiskTolerance::Low)
            .with(TimeHorizon::Long)
    }

    #[test]
    fn test_table_report_en() {
        let selector = StrategySelector::builtin().unwrap();
        let labels = LabelSet::builtin().unwrap();
        let rec = selector.select_strategies(&answers(), Locale::En).unwrap();

        let mut out = Vec::new();
        write_recommendation_table(
            &mut out,
            labels.get(Locale::En).unwrap(),
            selector.question_bank(),
            "nvda",
            &answers(),
            &rec,
        )
        .unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Symbol: NVDA"));
        assert!(text.contains("Market Direction: Neutral"));
        assert!(text.contains("Time Horizon: Long-term"));
        assert!(text.contains("Recommended Strategies (2):"));
        assert!(text.contains("Butterfly Spread"));
        assert!(text.contains("Iron Condor"));
        assert!(!text.contains("No exact match"));
    }

    #[test]
    fn test_table_report_shows_raw_and_missing_answers() {
        let selector = StrategySelector::builtin().unwrap();
        let labels = LabelSet::builtin().unwrap();
        let mut a = answers();
        a.insert_raw(QuestionId::MarketView, "sideways");
        let rec = selector.select_strategies(&a, Locale::Cn).unwrap();
        a.remove(QuestionId::TimeHorizon);

        let mut out = Vec::new();
        write_recommendation_table(
            &mut out,
            labels.get(Locale::Cn).unwrap(),
            selector.question_bank(),
            "aapl",
            &a,
            &rec,
        )
        .unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("市场方向: sideways"));
        assert!(text.contains("时间周期: 未选择"));
        assert!(text.contains("铁鹰 (Iron Condor)"));
        assert!(text.contains("没有完全匹配的策略"));
    }

    #[test]
    fn test_table_report_normalizes_case_and_lists_ignored() {
        let selector = StrategySelector::builtin().unwrap();
        let labels = LabelSet::builtin().unwrap();
        let mut a = answers();
        a.insert_raw(QuestionId::MarketView, "NEUTRAL");
        a.insert_raw(QuestionId::TimeHorizon, "forever");
        let rec = selector.select_strategies(&a, Locale::En).unwrap();

        let mut out = Vec::new();
        write_recommendation_table(
            &mut out,
            labels.get(Locale::En).unwrap(),
            selector.question_bank(),
            "spy",
            &a,
            &rec,
        )
        .unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Market Direction: Neutral"));
        assert!(text.contains("Unrecognized answers were ignored: time_horizon=forever"));
        assert!(!text.contains("No exact match"));
    }

    #[test]
    fn test_csv_output() {
        let catalog = Catalog::builtin().unwrap();
        let records = catalog.category(Locale::En, MarketViewCategory::Bearish);

        let mut out = Vec::new();
        write_csv(&mut out, &records).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("id,category,name"));
        assert!(lines[1].starts_with("long_put,bearish,Long Put,"));
    }

    #[test]
    fn test_json_report() {
        let selector = StrategySelector::builtin().unwrap();
        let rec = selector.select_strategies(&answers(), Locale::En).unwrap();

        let mut out = Vec::new();
        write_recommendation_json(&mut out, "SPY", &answers(), &rec).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["symbol"], "SPY");
        assert_eq!(value["locale"], "en");
        assert_eq!(value["answers"]["market_view"], "neutral");
        assert_eq!(value["outcome"]["kind"], "exact");
        assert_eq!(value["strategies"][1]["id"], "iron_condor");
        assert_eq!(value["strategies"][1]["name"], "Iron Condor");
    }
}
