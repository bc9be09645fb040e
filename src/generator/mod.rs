pub mod random;
pub mod reference;

pub use random::RandomSource;
pub use reference::ReferenceTables;

use chrono::{Duration, NaiveDateTime, SubsecRound, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::errors::{FixtureError, Result};
use crate::metrics;
use crate::models::position::strategy_definition;
use crate::models::{InstrumentType, Position, PositionState, DEFAULT_CURRENCY};

const ORDER_ID_PREFIX: &str = "ORD";
const ORDER_ID_MIN: u32 = 100_000;
const ORDER_ID_MAX: u32 = 999_999;
const MIN_QUANTITY: u32 = 1;
const MAX_QUANTITY: u32 = 50;

/// Smallest price a position can carry: one cent.
pub const MIN_PRICE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Tunable sampling bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorSettings {
    /// A draw `p` in [0, 1] yields a closed position when `p > open_probability`.
    pub open_probability: f64,
    /// Open price = reference × U(1 − j, 1 + j).
    pub open_price_jitter: f64,
    /// Close price = open price × U(1 − k, 1 + k).
    pub close_price_jitter: f64,
    /// Upper bound, in days, for both the age of a position and its holding period.
    pub max_holding_days: u32,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            open_probability: 0.4,
            open_price_jitter: 0.10,
            close_price_jitter: 0.05,
            max_holding_days: 30,
        }
    }
}

impl GeneratorSettings {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.open_probability) {
            return Err(FixtureError::Configuration(format!(
                "open_probability must be within [0, 1], got {}",
                self.open_probability
            )));
        }
        for (name, jitter) in [
            ("open_price_jitter", self.open_price_jitter),
            ("close_price_jitter", self.close_price_jitter),
        ] {
            if !(0.0..1.0).contains(&jitter) {
                return Err(FixtureError::Configuration(format!(
                    "{name} must be within [0, 1), got {jitter}"
                )));
            }
        }
        if self.max_holding_days < 1 {
            return Err(FixtureError::Configuration(
                "max_holding_days must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Builds positions against a fixed set of reference tables and a fixed
/// generation time.
#[derive(Debug, Clone)]
pub struct PositionGenerator<'a> {
    tables: &'a ReferenceTables,
    settings: GeneratorSettings,
    as_of: NaiveDateTime,
}

impl<'a> PositionGenerator<'a> {
    pub fn new(
        tables: &'a ReferenceTables,
        settings: GeneratorSettings,
        as_of: NaiveDateTime,
    ) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            tables,
            settings,
            as_of: as_of.trunc_subsecs(6),
        })
    }

    /// Generator stamped with the current UTC time.
    pub fn now(tables: &'a ReferenceTables, settings: GeneratorSettings) -> Result<Self> {
        Self::new(tables, settings, Utc::now().naive_utc())
    }

    pub fn as_of(&self) -> NaiveDateTime {
        self.as_of
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    pub fn generate<R: RandomSource + ?Sized>(
        &self,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<Position>> {
        let mut positions = Vec::with_capacity(count);
        while positions.len() < count {
            let position = self.synthesize(rng)?;
            metrics::record_position(position.state);
            positions.push(position);
        }

        let summary = BatchSummary::from_positions(&positions);
        tracing::info!(
            total = summary.total,
            open = summary.open,
            closed = summary.closed,
            realized_pnl = %summary.realized_pnl,
            unrealized_pnl = %summary.unrealized_pnl,
            "Position batch generated"
        );

        Ok(positions)
    }

    /// Synthesize one position.
    ///
    /// Draw order: symbol index, quantity, open jitter, age in days, state
    /// draw; then, for closed positions only, close jitter and holding days;
    /// finally the GUID and order number.
    pub fn synthesize<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Result<Position> {
        let symbols = self.tables.symbols();
        let index = rng.choose_index(symbols.len());
        let symbol = *symbols.get(index).ok_or_else(|| FixtureError::Lookup {
            symbol: format!("#{index}"),
        })?;
        let reference = self.tables.price(symbol)?;
        let strategy = self.tables.strategy(symbol)?;

        let quantity = rng.uniform_u32(MIN_QUANTITY, MAX_QUANTITY);
        let qty = Decimal::from(quantity);

        let open_jitter = self.settings.open_price_jitter;
        let open_price = quoted(checked_product(
            reference,
            factor(rng.uniform_f64(1.0 - open_jitter, 1.0 + open_jitter))?,
        )?);
        let current_price = quoted(reference);

        let max_days = self.settings.max_holding_days;
        let open_time = self.as_of - days(rng.uniform_u32(1, max_days));

        let state = if rng.uniform_f64(0.0, 1.0) > self.settings.open_probability {
            PositionState::Closed
        } else {
            PositionState::Open
        };

        let (close_price, close_time, mark_price) = match state {
            PositionState::Closed => {
                let close_jitter = self.settings.close_price_jitter;
                let close_price = quoted(checked_product(
                    open_price,
                    factor(rng.uniform_f64(1.0 - close_jitter, 1.0 + close_jitter))?,
                )?);
                let close_time = open_time + days(rng.uniform_u32(1, max_days));
                (Some(close_price), Some(close_time), close_price)
            }
            PositionState::Open => (None, None, current_price),
        };
        let profit_or_loss = checked_product(checked_difference(mark_price, open_price)?, qty)?;

        let position_guid = rng.uuid();
        let platform_order_id = format!(
            "{ORDER_ID_PREFIX}{}",
            rng.uniform_u32(ORDER_ID_MIN, ORDER_ID_MAX)
        );

        tracing::trace!(%position_guid, symbol, %state, "Position synthesized");

        Ok(Position {
            position_guid,
            symbol: symbol.to_string(),
            instrument_type: InstrumentType::Stock,
            state,
            open_time,
            close_time,
            currency: DEFAULT_CURRENCY.to_string(),
            open_price,
            close_price,
            current_price,
            quantity,
            profit_or_loss: round_cents(profit_or_loss),
            strategy_name: strategy.to_string(),
            strategy_definition: strategy_definition(strategy),
            platform_order_id,
        })
    }
}

/// Generate `count` positions with default settings, stamped with the
/// current time.
pub fn generate<R: RandomSource + ?Sized>(
    count: usize,
    tables: &ReferenceTables,
    rng: &mut R,
) -> Result<Vec<Position>> {
    PositionGenerator::now(tables, GeneratorSettings::default())?.generate(count, rng)
}

/// Round to cents, ties to even.
pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

/// Round to cents, never below one cent.
fn quoted(value: Decimal) -> Decimal {
    round_cents(value).max(MIN_PRICE)
}

fn checked_product(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_mul(b)
        .ok_or_else(|| FixtureError::Configuration(format!("{a} * {b} overflows")))
}

fn checked_difference(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_sub(b)
        .ok_or_else(|| FixtureError::Configuration(format!("{a} - {b} overflows")))
}

fn factor(value: f64) -> Result<Decimal> {
    Decimal::from_f64(value).ok_or_else(|| {
        FixtureError::Configuration(format!("price factor {value} is not representable"))
    })
}

fn days(n: u32) -> Duration {
    Duration::days(i64::from(n))
}

// ---------------------------------------------------------------------------
// BatchSummary
// ---------------------------------------------------------------------------

/// Open/closed split and P&L totals for a batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub open: usize,
    pub closed: usize,
    pub realized_pnl: Decimal,
    pub unrealized_pnl: Decimal,
}

impl BatchSummary {
    pub fn from_positions(positions: &[Position]) -> Self {
        positions.iter().fold(
            BatchSummary {
                total: positions.len(),
                ..Default::default()
            },
            |mut acc, p| {
                match p.state {
                    PositionState::Open => {
                        acc.open += 1;
                        acc.unrealized_pnl += p.profit_or_loss;
                    }
                    PositionState::Closed => {
                        acc.closed += 1;
                        acc.realized_pnl += p.profit_or_loss;
                    }
                }
                acc
            },
        )
    }
}
