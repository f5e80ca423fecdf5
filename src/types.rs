//! Core domain types shared by the catalog, question bank and selector
//!
//! Every enum here is closed and carries a canonical lowercase key. The key is
//! what appears in data files, configuration, CLI flags and JSON output, so
//! matching never depends on localized display text.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a key does not name any variant of an enum
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseKeyError {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

/// Declares a closed enum keyed by a lowercase string.
///
/// Generates `ALL`, `as_str`, `Display`, `FromStr` (trimmed, case-insensitive)
/// and serde support using the same key.
macro_rules! keyed_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident ($kind:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => $key:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $key)] $variant ),+
        }

        impl $name {
            /// All variants in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $key),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseKeyError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let key = s.trim();
                $(
                    if key.eq_ignore_ascii_case($key) {
                        return Ok($name::$variant);
                    }
                )+
                Err(ParseKeyError {
                    kind: $kind,
                    value: s.to_string(),
                    expected: [$($key),+].join(", "),
                })
            }
        }
    };
}

keyed_enum! {
    /// Display language. Passed explicitly to every query.
    pub enum Locale ("locale") {
        Cn => "cn",
        En => "en",
    }
}

impl Locale {
    /// The other supported locale
    pub fn toggle(self) -> Self {
        match self {
            Locale::Cn => Locale::En,
            Locale::En => Locale::Cn,
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale::Cn
    }
}

keyed_enum! {
    /// Catalog grouping of strategies by the market view they serve
    pub enum MarketViewCategory ("category") {
        Bullish => "bullish",
        Bearish => "bearish",
        Neutral => "neutral",
        VolatilityFocused => "volatility",
    }
}

keyed_enum! {
    /// Identifies one question of the questionnaire
    pub enum QuestionId ("question") {
        MarketView => "market_view",
        PriceMovement => "price_movement",
        VolatilityView => "volatility_view",
        RiskTolerance => "risk_tolerance",
        TimeHorizon => "time_horizon",
    }
}

impl QuestionId {
    /// Keys of every option this question accepts, in presentation order
    pub fn option_keys(self) -> Vec<&'static str> {
        match self {
            QuestionId::MarketView => MarketView::ALL.iter().map(|v| v.as_str()).collect(),
            QuestionId::PriceMovement => PriceMovement::ALL.iter().map(|v| v.as_str()).collect(),
            QuestionId::VolatilityView => VolatilityView::ALL.iter().map(|v| v.as_str()).collect(),
            QuestionId::RiskTolerance => RiskTolerance::ALL.iter().map(|v| v.as_str()).collect(),
            QuestionId::TimeHorizon => TimeHorizon::ALL.iter().map(|v| v.as_str()).collect(),
        }
    }

    /// Whether `value` is a recognized option key for this question
    pub fn accepts(self, value: &str) -> bool {
        match self {
            QuestionId::MarketView => value.parse::<MarketView>().is_ok(),
            QuestionId::PriceMovement => value.parse::<PriceMovement>().is_ok(),
            QuestionId::VolatilityView => value.parse::<VolatilityView>().is_ok(),
            QuestionId::RiskTolerance => value.parse::<RiskTolerance>().is_ok(),
            QuestionId::TimeHorizon => value.parse::<TimeHorizon>().is_ok(),
        }
    }
}

keyed_enum! {
    /// Directional belief about the underlying
    pub enum MarketView ("market view") {
        Bullish => "bullish",
        Bearish => "bearish",
        Neutral => "neutral",
        Uncertain => "uncertain",
    }
}

keyed_enum! {
    /// Expected magnitude of the price move
    pub enum PriceMovement ("price movement") {
        Small => "small",
        Moderate => "moderate",
        Large => "large",
    }
}

keyed_enum! {
    /// Outlook on implied volatility
    pub enum VolatilityView ("volatility view") {
        Increase => "increase",
        Decrease => "decrease",
        Stable => "stable",
        Unknown => "unknown",
    }
}

keyed_enum! {
    pub enum RiskTolerance ("risk tolerance") {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
}

keyed_enum! {
    /// Investment horizon. Collected for display; no rule branches on it.
    pub enum TimeHorizon ("time horizon") {
        Short => "short",
        Medium => "medium",
        Long => "long",
    }
}

keyed_enum! {
    /// Stable, locale-independent identifier of a catalog strategy
    pub enum StrategyId ("strategy") {
        LongCall => "long_call",
        BullCallSpread => "bull_call_spread",
        ShortPut => "short_put",
        CoveredCall => "covered_call",
        LongPut => "long_put",
        BearPutSpread => "bear_put_spread",
        ShortCall => "short_call",
        ProtectivePut => "protective_put",
        Straddle => "straddle",
        Strangle => "strangle",
        ButterflySpread => "butterfly_spread",
        IronCondor => "iron_condor",
        LongStraddleStrangle => "long_straddle_strangle",
        ShortStraddleStrangle => "short_straddle_strangle",
        CalendarSpread => "calendar_spread",
    }
}

/// An enum that answers one specific question
pub trait AnswerOption: Copy + FromStr<Err = ParseKeyError> + fmt::Debug {
    /// The question this type answers
    const QUESTION: QuestionId;

    fn key(&self) -> &'static str;
}

macro_rules! answers_question {
    ($($ty:ident => $question:ident),+ $(,)?) => {
        $(
            impl AnswerOption for $ty {
                const QUESTION: QuestionId = QuestionId::$question;

                fn key(&self) -> &'static str {
                    self.as_str()
                }
            }
        )+
    };
}

answers_question! {
    MarketView => MarketView,
    PriceMovement => PriceMovement,
    VolatilityView => VolatilityView,
    RiskTolerance => RiskTolerance,
    TimeHorizon => TimeHorizon,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_round_trip_through_from_str() {
        for id in StrategyId::ALL {
            assert_eq!(id.as_str().parse::<StrategyId>().unwrap(), *id);
        }
        for q in QuestionId::ALL {
            assert_eq!(q.to_string().parse::<QuestionId>().unwrap(), *q);
        }
    }

    #[test]
    fn test_parse_is_trimmed_and_case_insensitive() {
        assert_eq!(" Bullish ".parse::<MarketView>().unwrap(), MarketView::Bullish);
        assert_eq!("EN".parse::<Locale>().unwrap(), Locale::En);
    }

    #[test]
    fn test_parse_error_lists_expected_keys() {
        let err = "sideways".parse::<MarketView>().unwrap_err();
        assert_eq!(err.kind, "market view");
        assert_eq!(err.value, "sideways");
        assert!(err.to_string().contains("bullish, bearish, neutral, uncertain"));
    }

    #[test]
    fn test_serde_uses_keys() {
        let json = serde_json::to_string(&MarketViewCategory::VolatilityFocused).unwrap();
        assert_eq!(json, "\"volatility\"");
        let id: StrategyId = serde_json::from_str("\"iron_condor\"").unwrap();
        assert_eq!(id, StrategyId::IronCondor);
    }

    #[test]
    fn test_locale_toggle() {
        assert_eq!(Locale::Cn.toggle(), Locale::En);
        assert_eq!(Locale::En.toggle().toggle(), Locale::En);
        assert_eq!(Locale::default(), Locale::Cn);
    }

    #[test]
    fn test_question_option_keys() {
        assert_eq!(
            QuestionId::VolatilityView.option_keys(),
            vec!["increase", "decrease", "stable", "unknown"]
        );
        assert!(QuestionId::TimeHorizon.accepts("long"));
        assert!(!QuestionId::TimeHorizon.accepts("large"));
        assert_eq!(<PriceMovement as AnswerOption>::QUESTION, QuestionId::PriceMovement);
    }
}
