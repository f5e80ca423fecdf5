//! Strategy catalog
//!
//! A single locale-independent table lists the strategy identifiers of each
//! market-view category in display order. Localized text lives in one table
//! per locale, keyed by identifier. Loading validates that every category is
//! populated, that every locale covers exactly the same identifiers, and that
//! no text field is blank.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{CatalogError, CatalogResult};
use crate::types::{Locale, MarketViewCategory, StrategyId};

const BUILTIN_CATALOG: &str = include_str!("../data/strategies.json");

/// Localized description of one strategy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyText {
    pub name: String,
    pub description: String,
    pub risk_level: String,
    pub profit_potential: String,
    pub best_for: String,
    pub iv_preference: String,
}

impl StrategyText {
    fn fields(&self) -> [(&'static str, &str); 6] {
        [
            ("name", self.name.as_str()),
            ("description", self.description.as_str()),
            ("risk_level", self.risk_level.as_str()),
            ("profit_potential", self.profit_potential.as_str()),
            ("best_for", self.best_for.as_str()),
            ("iv_preference", self.iv_preference.as_str()),
        ]
    }
}

/// A catalog entry rendered in one locale
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategyRecord {
    pub id: StrategyId,
    pub category: MarketViewCategory,
    pub locale: Locale,
    #[serde(flatten)]
    pub text: StrategyText,
}

/// On-disk layout of a catalog file
#[derive(Debug, Deserialize)]
struct CatalogFile {
    categories: BTreeMap<MarketViewCategory, Vec<StrategyId>>,
    locales: BTreeMap<Locale, BTreeMap<StrategyId, StrategyText>>,
}

/// Immutable, validated strategy catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    categories: BTreeMap<MarketViewCategory, Vec<StrategyId>>,
    category_of: HashMap<StrategyId, MarketViewCategory>,
    texts: HashMap<Locale, HashMap<StrategyId, StrategyText>>,
}

impl Catalog {
    /// Catalog compiled into the binary
    pub fn builtin() -> CatalogResult<Self> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Load a catalog from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loading strategy catalog from {}", path.display());
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> CatalogResult<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::from_parts(file.categories, file.locales)
    }

    fn from_parts(
        categories: BTreeMap<MarketViewCategory, Vec<StrategyId>>,
        locales: BTreeMap<Locale, BTreeMap<StrategyId, StrategyText>>,
    ) -> CatalogResult<Self> {
        for category in MarketViewCategory::ALL {
            if categories.get(category).map_or(true, |ids| ids.is_empty()) {
                return Err(CatalogError::EmptyCategory(*category));
            }
        }

        if let Some(id) = categories.values().flatten().duplicates().next() {
            return Err(CatalogError::DuplicateStrategy(*id));
        }

        let category_of: HashMap<StrategyId, MarketViewCategory> = categories
            .iter()
            .flat_map(|(category, ids)| ids.iter().map(move |id| (*id, *category)))
            .collect();

        let mut texts = HashMap::with_capacity(Locale::ALL.len());
        for locale in Locale::ALL {
            let table = locales
                .get(locale)
                .ok_or(CatalogError::MissingLocale(*locale))?;

            // Iterate in category order so the first reported gap is stable
            for id in categories.values().flatten() {
                let text = table.get(id).ok_or(CatalogError::MissingText {
                    locale: *locale,
                    id: *id,
                })?;
                let blank = text.fields().into_iter().find(|(_, v)| v.trim().is_empty());
                if let Some((field, _)) = blank {
                    return Err(CatalogError::EmptyField {
                        locale: *locale,
                        id: *id,
                        field,
                    });
                }
            }

            if let Some(id) = table.keys().find(|id| !category_of.contains_key(*id)) {
                return Err(CatalogError::UnknownStrategy {
                    locale: *locale,
                    id: *id,
                });
            }

            let table: HashMap<StrategyId, StrategyText> =
                table.iter().map(|(id, text)| (*id, text.clone())).collect();
            texts.insert(*locale, table);
        }

        debug!(
            strategies = category_of.len(),
            locales = texts.len(),
            "Strategy catalog validated"
        );

        Ok(Self {
            categories,
            category_of,
            texts,
        })
    }

    /// Identifiers of a category in display order
    pub fn ids(&self, category: MarketViewCategory) -> &[StrategyId] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All records of a category, rendered in `locale`, in display order
    pub fn category(&self, locale: Locale, category: MarketViewCategory) -> Vec<StrategyRecord> {
        self.ids(category)
            .iter()
            .filter_map(|id| self.record(locale, *id))
            .collect()
    }

    pub fn category_of(&self, id: StrategyId) -> Option<MarketViewCategory> {
        self.category_of.get(&id).copied()
    }

    pub fn contains(&self, id: StrategyId) -> bool {
        self.category_of.contains_key(&id)
    }

    pub fn text(&self, locale: Locale, id: StrategyId) -> Option<&StrategyText> {
        self.texts.get(&locale)?.get(&id)
    }

    pub fn record(&self, locale: Locale, id: StrategyId) -> Option<StrategyRecord> {
        Some(StrategyRecord {
            id,
            category: self.category_of(id)?,
            locale,
            text: self.text(locale, id)?.clone(),
        })
    }

    /// Locales with text tables, in a fixed order
    pub fn locales(&self) -> Vec<Locale> {
        self.texts.keys().copied().sorted().collect()
    }

    pub fn categories(&self) -> impl Iterator<Item = (MarketViewCategory, &[StrategyId])> {
        self.categories
            .iter()
            .map(|(category, ids)| (*category, ids.as_slice()))
    }

    /// Number of strategies (per locale)
    pub fn len(&self) -> usize {
        self.category_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.category_of.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn text(name: &str) -> Value {
        json!({
            "name": name,
            "description": "d",
            "risk_level": "r",
            "profit_potential": "p",
            "best_for": "b",
            "iv_preference": "iv"
        })
    }

    fn minimal() -> Value {
        let mut locale = serde_json::Map::new();
        for id in ["long_call", "long_put", "iron_condor", "calendar_spread"] {
            locale.insert(id.to_string(), text(id));
        }
        json!({
            "categories": {
                "bullish": ["long_call"],
                "bearish": ["long_put"],
                "neutral": ["iron_condor"],
                "volatility": ["calendar_spread"]
            },
            "locales": { "cn": locale.clone(), "en": locale }
        })
    }

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.len(), 15);
        assert_eq!(catalog.locales(), vec![Locale::Cn, Locale::En]);
        assert_eq!(
            catalog.ids(MarketViewCategory::Bullish),
            &[
                StrategyId::LongCall,
                StrategyId::BullCallSpread,
                StrategyId::ShortPut,
                StrategyId::CoveredCall
            ]
        );
    }

    #[test]
    fn test_builtin_text_matches_locale() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(
            catalog.text(Locale::En, StrategyId::IronCondor).unwrap().name,
            "Iron Condor"
        );
        assert_eq!(
            catalog.text(Locale::Cn, StrategyId::IronCondor).unwrap().name,
            "铁鹰 (Iron Condor)"
        );
    }

    #[test]
    fn test_category_records_in_order() {
        let catalog = Catalog::builtin().unwrap();
        let records = catalog.category(Locale::En, MarketViewCategory::VolatilityFocused);
        let names: Vec<&str> = records.iter().map(|r| r.text.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Long Straddle/Strangle", "Short Straddle/Strangle", "Calendar Spread"]
        );
        assert!(records
            .iter()
            .all(|r| r.category == MarketViewCategory::VolatilityFocused && r.locale == Locale::En));
    }

    #[test]
    fn test_minimal_catalog_is_valid() {
        let catalog = Catalog::from_json(&minimal().to_string()).unwrap();
        assert_eq!(catalog.len(), 4);
        assert_eq!(
            catalog.category_of(StrategyId::IronCondor),
            Some(MarketViewCategory::Neutral)
        );
        assert!(!catalog.contains(StrategyId::Straddle));
    }

    #[test]
    fn test_empty_category_rejected() {
        let mut data = minimal();
        data["categories"]["neutral"] = json!([]);
        let err = Catalog::from_json(&data.to_string()).unwrap_err();
        assert!(matches!(err, CatalogError::EmptyCategory(MarketViewCategory::Neutral)));

        let mut data = minimal();
        data["categories"].as_object_mut().unwrap().remove("bearish");
        let err = Catalog::from_json(&data.to_string()).unwrap_err();
        assert!(matches!(err, CatalogError::EmptyCategory(MarketViewCategory::Bearish)));
    }

    #[test]
    fn test_duplicate_strategy_rejected() {
        let mut data = minimal();
        data["categories"]["bearish"] = json!(["long_put", "long_call"]);
        let err = Catalog::from_json(&data.to_string()).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateStrategy(StrategyId::LongCall)));
    }

    #[test]
    fn test_locale_parity_enforced() {
        let mut data = minimal();
        data["locales"]["en"].as_object_mut().unwrap().remove("iron_condor");
        let err = Catalog::from_json(&data.to_string()).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::MissingText {
                locale: Locale::En,
                id: StrategyId::IronCondor
            }
        ));

        let mut data = minimal();
        data["locales"]["cn"]["straddle"] = text("straddle");
        let err = Catalog::from_json(&data.to_string()).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::UnknownStrategy {
                locale: Locale::Cn,
                id: StrategyId::Straddle
            }
        ));
    }

    #[test]
    fn test_missing_locale_rejected() {
        let mut data = minimal();
        data["locales"].as_object_mut().unwrap().remove("cn");
        let err = Catalog::from_json(&data.to_string()).unwrap_err();
        assert!(matches!(err, CatalogError::MissingLocale(Locale::Cn)));
    }

    #[test]
    fn test_blank_field_rejected() {
        let mut data = minimal();
        data["locales"]["en"]["long_put"]["best_for"] = json!("   ");
        let err = Catalog::from_json(&data.to_string()).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::EmptyField {
                locale: Locale::En,
                id: StrategyId::LongPut,
                field: "best_for"
            }
        ));
    }

    #[test]
    fn test_unknown_identifier_is_parse_error() {
        let mut data = minimal();
        data["categories"]["bullish"] = json!(["long_callz"]);
        let err = Catalog::from_json(&data.to_string()).unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Catalog::from_file("does/not/exist.json").unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
