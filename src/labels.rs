//! Localized interface labels used when rendering recommendations

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use crate::error::{CatalogError, CatalogResult};
use crate::types::{Locale, QuestionId};

const BUILTIN_LABELS: &str = include_str!("../data/labels.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labels {
    pub title: String,
    pub subtitle: String,
    pub symbol: String,
    pub your_view: String,
    pub recommended: String,
    pub risk_level: String,
    pub profit_potential: String,
    pub best_for: String,
    pub iv_preference: String,
    pub not_selected: String,
    pub no_strategies: String,
    pub fallback_notice: String,
    pub ignored_notice: String,
    pub select_option: String,
    pub navigation: String,
    /// Heading for each answer in the summary block
    pub summary: BTreeMap<QuestionId, String>,
}

impl Labels {
    pub fn summary_title(&self, question: QuestionId) -> &str {
        self.summary
            .get(&question)
            .map(String::as_str)
            .unwrap_or_else(|| question.as_str())
    }

    fn blank_label(&self) -> Option<String> {
        let plain = [
            ("title", &self.title),
            ("subtitle", &self.subtitle),
            ("symbol", &self.symbol),
            ("your_view", &self.your_view),
            ("recommended", &self.recommended),
            ("risk_level", &self.risk_level),
            ("profit_potential", &self.profit_potential),
            ("best_for", &self.best_for),
            ("iv_preference", &self.iv_preference),
            ("not_selected", &self.not_selected),
            ("no_strategies", &self.no_strategies),
            ("fallback_notice", &self.fallback_notice),
            ("ignored_notice", &self.ignored_notice),
            ("select_option", &self.select_option),
            ("navigation", &self.navigation),
        ];
        if let Some((name, _)) = plain.iter().find(|(_, v)| v.trim().is_empty()) {
            return Some(name.to_string());
        }

        QuestionId::ALL
            .iter()
            .find(|q| self.summary.get(*q).map_or(true, |v| v.trim().is_empty()))
            .map(|q| format!("summary.{}", q))
    }
}

/// Labels for every supported locale
#[derive(Debug, Clone)]
pub struct LabelSet {
    by_locale: HashMap<Locale, Labels>,
}

impl LabelSet {
    pub fn builtin() -> CatalogResult<Self> {
        Self::from_json(BUILTIN_LABELS)
    }

    pub fn from_file(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> CatalogResult<Self> {
        let mut raw: BTreeMap<Locale, Labels> = serde_json::from_str(json)?;

        let mut by_locale = HashMap::with_capacity(Locale::ALL.len());
        for locale in Locale::ALL {
            let labels = raw
                .remove(locale)
                .ok_or(CatalogError::MissingLocale(*locale))?;
            if let Some(label) = labels.blank_label() {
                return Err(CatalogError::MissingLabel {
                    locale: *locale,
                    label,
                });
            }
            by_locale.insert(*locale, labels);
        }

        Ok(Self { by_locale })
    }

    pub fn get(&self, locale: Locale) -> Option<&Labels> {
        self.by_locale.get(&locale)
    }
}
