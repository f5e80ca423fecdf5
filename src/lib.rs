//! Option Strategy Selector
//!
//! A rule-based recommender that maps a handful of market-view answers to
//! option strategies from a static, bilingual catalog.
//!
//! ## Example
//! ```no_run
//! use option_strategy_selector::{
//!     AnswerSet, Locale, MarketView, PriceMovement, RiskTolerance, StrategySelector,
//!     TimeHorizon, VolatilityView,
//! };
//!
//! fn main() -> anyhow::Result<()> {
//!     let selector = StrategySelector::builtin()?;
//!     let answers = AnswerSet::new()
//!         .with(MarketView::Bullish)
//!         .with(PriceMovement::Moderate)
//!         .with(VolatilityView::Stable)
//!         .with(RiskTolerance::Medium)
//!         .with(TimeHorizon::Short);
//!
//!     let recommendation = selector.select_strategies(&answers, Locale::En)?;
//!     for strategy in &recommendation.strategies {
//!         println!("{}: {}", strategy.text.name, strategy.text.description);
//!     }
//!     Ok(())
//! }
//! ```

pub mod answers;
pub mod catalog;
pub mod config;
pub mod error;
pub mod labels;
pub mod questions;
pub mod selector;
pub mod session;
pub mod types;

pub use answers::{Answer, AnswerSet};
pub use catalog::{Catalog, StrategyRecord, StrategyText};
pub use config::Config;
pub use error::{CatalogError, SelectionError};
pub use labels::{LabelSet, Labels};
pub use questions::{Question, QuestionBank, QuestionOption};
pub use selector::{MatchOutcome, Recommendation, Selection, StrategySelector};
pub use session::{QuestionnaireSession, Step};
pub use types::*;
