//! Questionnaire metadata
//!
//! Each locale carries the same five questions in the same order. Option
//! values are the canonical answer keys, so a value picked from any locale's
//! list parses into the matching answer enum.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{CatalogError, CatalogResult};
use crate::types::{Locale, QuestionId};

const BUILTIN_QUESTIONS: &str = include_str!("../data/questions.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    /// Canonical answer key, e.g. `"bullish"`
    pub value: String,
    /// Full option text shown when asking
    pub label: String,
    /// Short text used when summarizing answers
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    pub options: Vec<QuestionOption>,
}

impl Question {
    /// Option by answer key, matched the way answers parse: trimmed and
    /// ASCII case-insensitive
    pub fn option(&self, value: &str) -> Option<&QuestionOption> {
        let value = value.trim();
        self.options
            .iter()
            .find(|o| o.value.eq_ignore_ascii_case(value))
    }

    /// Option by 1-based position, as typed by a user
    pub fn option_at(&self, position: usize) -> Option<&QuestionOption> {
        position.checked_sub(1).and_then(|i| self.options.get(i))
    }
}

/// Validated questions for every supported locale
#[derive(Debug, Clone)]
pub struct QuestionBank {
    by_locale: HashMap<Locale, Vec<Question>>,
}

impl QuestionBank {
    pub fn builtin() -> CatalogResult<Self> {
        Self::from_json(BUILTIN_QUESTIONS)
    }

    pub fn from_file(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loading questions from {}", path.display());
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> CatalogResult<Self> {
        let raw: BTreeMap<Locale, Vec<Question>> = serde_json::from_str(json)?;

        let mut by_locale = HashMap::with_capacity(Locale::ALL.len());
        for locale in Locale::ALL {
            let questions = raw
                .get(locale)
                .ok_or(CatalogError::MissingLocale(*locale))?;
            validate_locale(*locale, questions)?;
            by_locale.insert(*locale, questions.clone());
        }

        debug!(locales = by_locale.len(), "Question bank validated");
        Ok(Self { by_locale })
    }

    /// Questions in asking order
    pub fn questions(&self, locale: Locale) -> &[Question] {
        self.by_locale
            .get(&locale)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn question(&self, locale: Locale, id: QuestionId) -> Option<&Question> {
        self.questions(locale).iter().find(|q| q.id == id)
    }

    /// Short localized summary of an answer value, if the value is known
    pub fn summary(&self, locale: Locale, id: QuestionId, value: &str) -> Option<&str> {
        self.question(locale, id)?
            .option(value)
            .map(|o| o.summary.as_str())
    }
}

fn validate_locale(locale: Locale, questions: &[Question]) -> CatalogResult<()> {
    let ids: Vec<QuestionId> = questions.iter().map(|q| q.id).collect();
    if ids != QuestionId::ALL {
        return Err(CatalogError::QuestionOrder {
            locale,
            expected: QuestionId::ALL
                .iter()
                .map(|q| q.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        });
    }

    for question in questions {
        if question.text.trim().is_empty() {
            return Err(CatalogError::EmptyQuestionText {
                locale,
                question: question.id,
            });
        }

        let expected = question.id.option_keys();
        for option in &question.options {
            if !expected.contains(&option.value.as_str())
                || option.label.trim().is_empty()
                || option.summary.trim().is_empty()
            {
                return Err(CatalogError::UnknownOptionValue {
                    locale,
                    question: question.id,
                    value: option.value.clone(),
                });
            }
        }

        for key in expected {
            let offered = question.options.iter().filter(|o| o.value == key).count();
            if offered != 1 {
                return Err(CatalogError::MissingOptionValue {
                    locale,
                    question: question.id,
                    value: key.to_string(),
                });
            }
        }
    }

    Ok(())
}
