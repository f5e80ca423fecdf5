//! Answer sets collected from the questionnaire

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{SelectionError, SelectionResult};
use crate::types::{AnswerOption, QuestionId};

/// A typed answer, or the raw value when it is outside the question's domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer<T> {
    Known(T),
    Unrecognized(String),
}

impl<T> Answer<T> {
    pub fn known(self) -> Option<T> {
        match self {
            Answer::Known(value) => Some(value),
            Answer::Unrecognized(_) => None,
        }
    }
}

/// Raw answers keyed by question.
///
/// Values are stored as given so that an out-of-domain answer reaches the
/// selector, which decides whether to fall back or reject it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet {
    values: BTreeMap<QuestionId, String>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style typed insert
    pub fn with<T: AnswerOption>(mut self, value: T) -> Self {
        self.set(value);
        self
    }

    pub fn set<T: AnswerOption>(&mut self, value: T) {
        self.values.insert(T::QUESTION, value.key().to_string());
    }

    /// Store a raw value without checking it against the question's domain
    pub fn insert_raw(&mut self, question: QuestionId, value: impl Into<String>) {
        self.values.insert(question, value.into());
    }

    pub fn remove(&mut self, question: QuestionId) -> Option<String> {
        self.values.remove(&question)
    }

    pub fn raw(&self, question: QuestionId) -> Option<&str> {
        self.values.get(&question).map(String::as_str)
    }

    pub fn contains(&self, question: QuestionId) -> bool {
        self.values.contains_key(&question)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Copy every answer of `other` over this set
    pub fn merge(&mut self, other: &AnswerSet) {
        for (question, value) in &other.values {
            self.values.insert(*question, value.clone());
        }
    }

    /// Questions without an answer, in question order
    pub fn missing(&self) -> Vec<QuestionId> {
        QuestionId::ALL
            .iter()
            .copied()
            .filter(|q| !self.contains(*q))
            .collect()
    }

    /// Fails with the first unanswered question
    pub fn ensure_complete(&self) -> SelectionResult<()> {
        match self.missing().first() {
            Some(question) => Err(SelectionError::MissingAnswer(*question)),
            None => Ok(()),
        }
    }

    /// Answers whose value is outside their question's domain
    pub fn unrecognized(&self) -> Vec<(QuestionId, &str)> {
        self.values
            .iter()
            .filter(|(question, value)| !question.accepts(value))
            .map(|(question, value)| (*question, value.as_str()))
            .collect()
    }

    /// Typed lookup: missing answers are an error, out-of-domain values are
    /// returned as [`Answer::Unrecognized`]
    pub fn get<T: AnswerOption>(&self) -> SelectionResult<Answer<T>> {
        let raw = self
            .raw(T::QUESTION)
            .ok_or(SelectionError::MissingAnswer(T::QUESTION))?;

        Ok(match raw.parse::<T>() {
            Ok(value) => Answer::Known(value),
            Err(_) => Answer::Unrecognized(raw.to_string()),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (QuestionId, &str)> {
        self.values.iter().map(|(q, v)| (*q, v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MarketView, PriceMovement, RiskTolerance, TimeHorizon, VolatilityView};

    fn complete() -> AnswerSet {
        AnswerSet::new()
            .with(MarketView::Bullish)
            .with(PriceMovement::Large)
            .with(VolatilityView::Stable)
            .with(RiskTolerance::Low)
            .with(TimeHorizon::Short)
    }

    #[test]
    fn test_typed_get() {
        let answers = complete();
        assert_eq!(answers.get::<MarketView>().unwrap(), Answer::Known(MarketView::Bullish));
        assert_eq!(answers.raw(QuestionId::PriceMovement), Some("large"));
        assert!(answers.ensure_complete().is_ok());
    }

    #[test]
    fn test_missing_answer_is_reported_in_question_order() {
        let mut answers = complete();
        answers.remove(QuestionId::TimeHorizon);
        answers.remove(QuestionId::PriceMovement);

        assert_eq!(
            answers.missing(),
            vec![QuestionId::PriceMovement, QuestionId::TimeHorizon]
        );
        assert_eq!(
            answers.ensure_complete(),
            Err(SelectionError::MissingAnswer(QuestionId::PriceMovement))
        );
        assert_eq!(
            answers.get::<PriceMovement>(),
            Err(SelectionError::MissingAnswer(QuestionId::PriceMovement))
        );
    }

    #[test]
    fn test_unrecognized_value_is_kept_raw() {
        let mut answers = complete();
        answers.insert_raw(QuestionId::MarketView, "sideways");

        assert_eq!(
            answers.get::<MarketView>().unwrap(),
            Answer::Unrecognized("sideways".to_string())
        );
        assert_eq!(answers.unrecognized(), vec![(QuestionId::MarketView, "sideways")]);
    }

    #[test]
    fn test_json_shape() {
        let answers = AnswerSet::new().with(MarketView::Neutral).with(RiskTolerance::High);
        let json = serde_json::to_string(&answers).unwrap();
        assert_eq!(json, r#"{"market_view":"neutral","risk_tolerance":"high"}"#);

        let parsed: AnswerSet = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, answers);
    }

    #[test]
    fn test_merge_overrides() {
        let mut base = complete();
        let overrides = AnswerSet::new().with(MarketView::Bearish);
        base.merge(&overrides);
        assert_eq!(base.raw(QuestionId::MarketView), Some("bearish"));
        assert_eq!(base.len(), 5);
    }
}
