use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::{round_cents, MIN_PRICE};
use crate::errors::{FixtureError, Result};

/// Largest accepted reference price; keeps jittered notional arithmetic
/// well inside `Decimal` range.
pub const MAX_REFERENCE_PRICE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Sample quotes and strategy assignments used when no tables are supplied.
const BUILTIN: [(&str, i64, &str); 4] = [
    ("AMZN", 31968, "Momentum"),
    ("TSLA", 70192, "Reversal"),
    ("AAPL", 15041, "Breakout"),
    ("MSFT", 32160, "Swing"),
];

/// Reference price and strategy tables keyed by symbol.
///
/// Both tables always share the same key set; this is checked once in
/// [`ReferenceTables::new`] so lookups during generation cannot miss.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceTables {
    prices: BTreeMap<String, Decimal>,
    strategies: BTreeMap<String, String>,
}

impl ReferenceTables {
    pub fn new(
        prices: BTreeMap<String, Decimal>,
        strategies: BTreeMap<String, String>,
    ) -> Result<Self> {
        if prices.is_empty() {
            return Err(FixtureError::Configuration(
                "price table has no symbols".into(),
            ));
        }

        let without_strategy: Vec<&str> = prices
            .keys()
            .filter(|s| !strategies.contains_key(*s))
            .map(String::as_str)
            .collect();
        let without_price: Vec<&str> = strategies
            .keys()
            .filter(|s| !prices.contains_key(*s))
            .map(String::as_str)
            .collect();

        if !without_strategy.is_empty() || !without_price.is_empty() {
            return Err(FixtureError::Configuration(format!(
                "reference tables disagree: missing strategy for [{}], missing price for [{}]",
                without_strategy.join(", "),
                without_price.join(", "),
            )));
        }

        if let Some((symbol, price)) = prices
            .iter()
            .find(|(_, p)| round_cents(**p) < MIN_PRICE || **p > MAX_REFERENCE_PRICE)
        {
            return Err(FixtureError::Configuration(format!(
                "reference price for {symbol} must be between {MIN_PRICE} and \
                 {MAX_REFERENCE_PRICE} after rounding to cents, got {price}"
            )));
        }

        Ok(Self { prices, strategies })
    }

    pub fn builtin() -> Self {
        let prices = BUILTIN
            .iter()
            .map(|(symbol, cents, _)| (symbol.to_string(), Decimal::new(*cents, 2)))
            .collect();
        let strategies = BUILTIN
            .iter()
            .map(|(symbol, _, strategy)| (symbol.to_string(), strategy.to_string()))
            .collect();
        Self { prices, strategies }
    }

    /// Symbols in ascending order.
    pub fn symbols(&self) -> Vec<&str> {
        self.prices.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn price(&self, symbol: &str) -> Result<Decimal> {
        self.prices
            .get(symbol)
            .copied()
            .ok_or_else(|| FixtureError::Lookup {
                symbol: symbol.to_string(),
            })
    }

    pub fn strategy(&self, symbol: &str) -> Result<&str> {
        self.strategies
            .get(symbol)
            .map(String::as_str)
            .ok_or_else(|| FixtureError::Lookup {
                symbol: symbol.to_string(),
            })
    }
}

impl Default for ReferenceTables {
    fn default() -> Self {
        Self::builtin()
    }
}
