//! Strategy selection engine
//!
//! Maps a complete answer set to catalog strategies through a fixed decision
//! tree. All branches are expressed in [`StrategyId`]s; the locale only picks
//! which text is attached to the chosen records.
//!
//! ## Primary rules
//! - bullish: large → long call; moderate → bull call spread, covered call;
//!   small → short put, covered call
//! - bearish: large → long put; moderate → bear put spread; small → short call
//! - neutral: stable volatility → butterfly, iron condor; otherwise iron condor
//! - uncertain: increase → long straddle; decrease → short straddle;
//!   otherwise calendar spread
//!
//! ## Fallback
//! When no primary rule matches, one default strategy is picked by risk
//! tolerance: low → iron condor, medium → bull call spread, high → long
//! straddle. An unrecognized tolerance uses the configured default.

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::answers::{Answer, AnswerSet};
use crate::catalog::{Catalog, StrategyRecord};
use crate::config::{Config, SelectorConfig};
use crate::error::{CatalogError, CatalogResult, SelectionError, SelectionResult};
use crate::questions::{Question, QuestionBank};
use crate::types::{
    Locale, MarketView, MarketViewCategory, PriceMovement, QuestionId, RiskTolerance, StrategyId,
    VolatilityView,
};

use MarketViewCategory::{Bearish, Bullish, Neutral, VolatilityFocused};
use StrategyId::*;

/// Every strategy the decision tree can return, with the category it must
/// be listed under
const RULE_STRATEGIES: &[(StrategyId, MarketViewCategory)] = &[
    (LongCall, Bullish),
    (BullCallSpread, Bullish),
    (ShortPut, Bullish),
    (CoveredCall, Bullish),
    (LongPut, Bearish),
    (BearPutSpread, Bearish),
    (ShortCall, Bearish),
    (ButterflySpread, Neutral),
    (IronCondor, Neutral),
    (LongStraddleStrangle, VolatilityFocused),
    (ShortStraddleStrangle, VolatilityFocused),
    (CalendarSpread, VolatilityFocused),
];

/// An answer that could not be matched by any rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnrecognizedAnswer {
    pub question: QuestionId,
    pub value: String,
}

/// How a recommendation was reached
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchOutcome {
    /// A primary rule matched the answers
    Exact {
        /// Unrecognized answers the matching rule did not branch on
        ignored: Vec<UnrecognizedAnswer>,
    },
    /// No primary rule matched; the risk-tolerance default was used
    Fallback {
        /// The answer that stopped the primary rules
        unrecognized: Option<UnrecognizedAnswer>,
        /// Tolerance the default was picked for
        risk_tolerance: RiskTolerance,
        /// True when the given tolerance was itself unrecognized and the
        /// configured default applied
        defaulted: bool,
        /// Other unrecognized answers, not reported above
        ignored: Vec<UnrecognizedAnswer>,
    },
}

impl MatchOutcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self, MatchOutcome::Fallback { .. })
    }

    /// Unrecognized answers that did not drive the outcome
    pub fn ignored(&self) -> &[UnrecognizedAnswer] {
        match self {
            MatchOutcome::Exact { ignored } | MatchOutcome::Fallback { ignored, .. } => ignored,
        }
    }
}

/// Locale-independent result of the decision tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub strategies: Vec<StrategyId>,
    pub outcome: MatchOutcome,
}

/// Selected strategies rendered in one locale
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub locale: Locale,
    pub strategies: Vec<StrategyRecord>,
    pub outcome: MatchOutcome,
}

impl Recommendation {
    pub fn ids(&self) -> Vec<StrategyId> {
        self.strategies.iter().map(|r| r.id).collect()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

/// Result of the primary rules
enum Primary {
    Matched(MarketViewCategory, &'static [StrategyId]),
    Unmatched(UnrecognizedAnswer),
}

fn unmatched(question: QuestionId, value: String) -> Primary {
    Primary::Unmatched(UnrecognizedAnswer { question, value })
}

/// Rule-based strategy selector.
///
/// Holds no mutable state; share it across threads freely.
#[derive(Debug, Clone)]
pub struct StrategySelector {
    catalog: Arc<Catalog>,
    questions: Arc<QuestionBank>,
    config: SelectorConfig,
}

impl StrategySelector {
    /// Build a selector, checking that the catalog lists every strategy the
    /// rules can return under the expected category
    pub fn new(
        catalog: Arc<Catalog>,
        questions: Arc<QuestionBank>,
        config: SelectorConfig,
    ) -> CatalogResult<Self> {
        for (id, expected) in RULE_STRATEGIES {
            let found = catalog.category_of(*id);
            if found != Some(*expected) {
                return Err(CatalogError::MisplacedStrategy {
                    id: *id,
                    expected: *expected,
                    found: found.map_or_else(|| "nowhere".to_string(), |c| c.to_string()),
                });
            }
        }

        Ok(Self {
            catalog,
            questions,
            config,
        })
    }

    /// Selector over the built-in tables with default policy
    pub fn builtin() -> CatalogResult<Self> {
        Self::new(
            Arc::new(Catalog::builtin()?),
            Arc::new(QuestionBank::builtin()?),
            SelectorConfig::default(),
        )
    }

    /// Selector using the data files and policy named in `config`
    pub fn from_config(config: &Config) -> CatalogResult<Self> {
        let catalog = match &config.data.catalog_path {
            Some(path) => Catalog::from_file(path)?,
            None => Catalog::builtin()?,
        };
        let questions = match &config.data.questions_path {
            Some(path) => QuestionBank::from_file(path)?,
            None => QuestionBank::builtin()?,
        };

        Self::new(
            Arc::new(catalog),
            Arc::new(questions),
            config.selector.clone(),
        )
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn question_bank(&self) -> &QuestionBank {
        &self.questions
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Questions to ask, in order, for `locale`
    pub fn get_questions(&self, locale: Locale) -> &[Question] {
        self.questions.questions(locale)
    }

    /// Select strategies for `answers` and render them in `locale`
    pub fn select_strategies(
        &self,
        answers: &AnswerSet,
        locale: Locale,
    ) -> SelectionResult<Recommendation> {
        let selection = self.plan(answers)?;
        let strategies = selection
            .strategies
            .iter()
            .filter_map(|id| self.catalog.record(locale, *id))
            .collect();

        Ok(Recommendation {
            locale,
            strategies,
            outcome: selection.outcome,
        })
    }

    /// Run the decision tree without rendering any text
    pub fn plan(&self, answers: &AnswerSet) -> SelectionResult<Selection> {
        answers.ensure_complete()?;

        if self.config.strict_answers {
            if let Some((question, value)) = answers.unrecognized().first() {
                return Err(SelectionError::UnrecognizedAnswer {
                    question: *question,
                    value: value.to_string(),
                });
            }
        }

        let (strategies, unrecognized) = match self.primary(answers)? {
            Primary::Matched(category, wanted) => (self.pick(category, wanted), None),
            Primary::Unmatched(answer) => {
                warn!(
                    question = %answer.question,
                    value = %answer.value,
                    "Unrecognized answer, no primary rule applies"
                );
                (Vec::new(), Some(answer))
            }
        };

        if !strategies.is_empty() {
            debug!(?strategies, "Primary rule matched");
            return Ok(Selection {
                strategies,
                outcome: MatchOutcome::Exact {
                    ignored: ignored_answers(answers, &[]),
                },
            });
        }

        self.fallback(answers, unrecognized)
    }

    fn primary(&self, answers: &AnswerSet) -> SelectionResult<Primary> {
        let view = match answers.get::<MarketView>()? {
            Answer::Known(view) => view,
            Answer::Unrecognized(raw) => return Ok(unmatched(QuestionId::MarketView, raw)),
        };

        let primary = match view {
            MarketView::Bullish => match answers.get::<PriceMovement>()? {
                Answer::Known(PriceMovement::Large) => Primary::Matched(Bullish, &[LongCall]),
                Answer::Known(PriceMovement::Moderate) => {
                    Primary::Matched(Bullish, &[BullCallSpread, CoveredCall])
                }
                Answer::Known(PriceMovement::Small) => {
                    Primary::Matched(Bullish, &[ShortPut, CoveredCall])
                }
                Answer::Unrecognized(raw) => unmatched(QuestionId::PriceMovement, raw),
            },
            MarketView::Bearish => match answers.get::<PriceMovement>()? {
                Answer::Known(PriceMovement::Large) => Primary::Matched(Bearish, &[LongPut]),
                Answer::Known(PriceMovement::Moderate) => {
                    Primary::Matched(Bearish, &[BearPutSpread])
                }
                Answer::Known(PriceMovement::Small) => Primary::Matched(Bearish, &[ShortCall]),
                Answer::Unrecognized(raw) => unmatched(QuestionId::PriceMovement, raw),
            },
            // Any outlook other than stable gets the more conservative
            // range-bound strategy only
            MarketView::Neutral => match answers.get::<VolatilityView>()? {
                Answer::Known(VolatilityView::Stable) => {
                    Primary::Matched(Neutral, &[IronCondor, ButterflySpread])
                }
                Answer::Known(
                    VolatilityView::Increase | VolatilityView::Decrease | VolatilityView::Unknown,
                )
                | Answer::Unrecognized(_) => Primary::Matched(Neutral, &[IronCondor]),
            },
            MarketView::Uncertain => match answers.get::<VolatilityView>()? {
                Answer::Known(VolatilityView::Increase) => {
                    Primary::Matched(VolatilityFocused, &[LongStraddleStrangle])
                }
                Answer::Known(VolatilityView::Decrease) => {
                    Primary::Matched(VolatilityFocused, &[ShortStraddleStrangle])
                }
                Answer::Known(VolatilityView::Stable | VolatilityView::Unknown)
                | Answer::Unrecognized(_) => {
                    Primary::Matched(VolatilityFocused, &[CalendarSpread])
                }
            },
        };

        Ok(primary)
    }

    /// Entries of `category` that are in `wanted`, in catalog order
    fn pick(&self, category: MarketViewCategory, wanted: &[StrategyId]) -> Vec<StrategyId> {
        self.catalog
            .ids(category)
            .iter()
            .copied()
            .filter(|id| wanted.contains(id))
            .collect()
    }

    fn fallback(
        &self,
        answers: &AnswerSet,
        unrecognized: Option<UnrecognizedAnswer>,
    ) -> SelectionResult<Selection> {
        let (risk_tolerance, defaulted) = match answers.get::<RiskTolerance>()? {
            Answer::Known(tolerance) => (tolerance, false),
            Answer::Unrecognized(raw) => {
                warn!(
                    value = %raw,
                    default = %self.config.default_risk_tolerance,
                    "Unrecognized risk tolerance, using configured default"
                );
                (self.config.default_risk_tolerance, true)
            }
        };

        let strategy = match risk_tolerance {
            RiskTolerance::Low => IronCondor,
            RiskTolerance::Medium => BullCallSpread,
            RiskTolerance::High => LongStraddleStrangle,
        };

        debug!(%risk_tolerance, %strategy, "Fallback rule applied");

        let mut reported: Vec<QuestionId> = unrecognized.iter().map(|a| a.question).collect();
        if defaulted {
            reported.push(QuestionId::RiskTolerance);
        }
        let ignored = ignored_answers(answers, &reported);

        Ok(Selection {
            strategies: vec![strategy],
            outcome: MatchOutcome::Fallback {
                unrecognized,
                risk_tolerance,
                defaulted,
                ignored,
            },
        })
    }
}

/// Unrecognized answers outside `reported`, each logged once
fn ignored_answers(answers: &AnswerSet, reported: &[QuestionId]) -> Vec<UnrecognizedAnswer> {
    answers
        .unrecognized()
        .into_iter()
        .filter(|(question, _)| !reported.contains(question))
        .map(|(question, value)| {
            warn!(%question, value, "Unrecognized answer ignored");
            UnrecognizedAnswer {
                question,
                value: value.to_string(),
            }
        })
        .collect()
}
