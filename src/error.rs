//! Error types for catalog loading and strategy selection

use std::path::PathBuf;
use thiserror::Error;

use crate::types::{Locale, MarketViewCategory, QuestionId, StrategyId};

/// Configuration or data problems. Raised while building the catalog,
/// question bank or labels at startup, never during selection.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("category '{0}' has no strategies")]
    EmptyCategory(MarketViewCategory),

    #[error("strategy '{0}' is listed more than once")]
    DuplicateStrategy(StrategyId),

    #[error("no data for locale '{0}'")]
    MissingLocale(Locale),

    #[error("locale '{locale}' has no text for strategy '{id}'")]
    MissingText { locale: Locale, id: StrategyId },

    #[error("locale '{locale}' has text for strategy '{id}' which no category lists")]
    UnknownStrategy { locale: Locale, id: StrategyId },

    #[error("locale '{locale}': field '{field}' of strategy '{id}' is empty")]
    EmptyField {
        locale: Locale,
        id: StrategyId,
        field: &'static str,
    },

    #[error("strategy '{id}' must be listed under '{expected}' (found: {found})")]
    MisplacedStrategy {
        id: StrategyId,
        expected: MarketViewCategory,
        found: String,
    },

    #[error("locale '{locale}': questions must be {expected}")]
    QuestionOrder { locale: Locale, expected: String },

    #[error("locale '{locale}': question '{question}' has no text")]
    EmptyQuestionText { locale: Locale, question: QuestionId },

    #[error("locale '{locale}': question '{question}' offers unknown option '{value}'")]
    UnknownOptionValue {
        locale: Locale,
        question: QuestionId,
        value: String,
    },

    #[error("locale '{locale}': question '{question}' does not offer option '{value}'")]
    MissingOptionValue {
        locale: Locale,
        question: QuestionId,
        value: String,
    },

    #[error("locale '{locale}': label '{label}' is missing or empty")]
    MissingLabel { locale: Locale, label: String },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse data file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Per-request failures returned to the caller, who can re-prompt the user
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("no answer given for '{0}'")]
    MissingAnswer(QuestionId),

    #[error("'{value}' is not a valid answer for '{question}'")]
    UnrecognizedAnswer { question: QuestionId, value: String },
}

pub type CatalogResult<T> = Result<T, CatalogError>;
pub type SelectionResult<T> = Result<T, SelectionError>;
