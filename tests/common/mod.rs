use std::collections::{BTreeMap, VecDeque};

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use uuid::Uuid;

use position_fixtures::generator::{round_cents, GeneratorSettings, RandomSource, ReferenceTables};
use position_fixtures::models::{close_time_sentinel, PositionRecord};
use position_fixtures::{Position, PositionState};

/// Fixed generation time used across tests.
#[allow(dead_code)]
pub fn as_of() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 15)
        .unwrap()
        .and_hms_opt(16, 0, 0)
        .unwrap()
}

/// Single-symbol tables.
#[allow(dead_code)]
pub fn single_symbol(symbol: &str, price: Decimal, strategy: &str) -> ReferenceTables {
    ReferenceTables::new(
        BTreeMap::from([(symbol.to_string(), price)]),
        BTreeMap::from([(symbol.to_string(), strategy.to_string())]),
    )
    .expect("Valid single-symbol tables")
}

/// Random source that replays queued draws.
///
/// Reals, integers and indices are queued separately, each in the order
/// the generator asks for them. Panics when a queue runs dry or a queued
/// real or integer falls outside the requested range; indices are returned
/// as queued so out-of-range picks reach the generator.
#[allow(dead_code)]
#[derive(Default)]
pub struct ScriptedSource {
    reals: VecDeque<f64>,
    ints: VecDeque<u32>,
    indices: VecDeque<usize>,
    next_id: u128,
}

#[allow(dead_code)]
impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reals(mut self, values: &[f64]) -> Self {
        self.reals.extend(values);
        self
    }

    pub fn ints(mut self, values: &[u32]) -> Self {
        self.ints.extend(values);
        self
    }

    pub fn indices(mut self, values: &[usize]) -> Self {
        self.indices.extend(values);
        self
    }

    pub fn is_drained(&self) -> bool {
        self.reals.is_empty() && self.ints.is_empty() && self.indices.is_empty()
    }
}

impl RandomSource for ScriptedSource {
    fn uniform_f64(&mut self, low: f64, high: f64) -> f64 {
        let v = self.reals.pop_front().expect("Scripted reals exhausted");
        assert!(v >= low && v <= high, "scripted real {v} outside [{low}, {high}]");
        v
    }

    fn uniform_u32(&mut self, low: u32, high: u32) -> u32 {
        let v = self.ints.pop_front().expect("Scripted ints exhausted");
        assert!(v >= low && v <= high, "scripted int {v} outside [{low}, {high}]");
        v
    }

    fn choose_index(&mut self, _len: usize) -> usize {
        self.indices.pop_front().unwrap_or(0)
    }

    fn uuid(&mut self) -> Uuid {
        self.next_id += 1;
        Uuid::from_u128(self.next_id)
    }
}

#[allow(dead_code)]
fn cents() -> Decimal {
    Decimal::new(1, 2)
}

/// Check every per-record invariant of a generated position.
#[allow(dead_code)]
pub fn assert_position_invariants(
    p: &Position,
    tables: &ReferenceTables,
    settings: &GeneratorSettings,
    as_of: NaiveDateTime,
) {
    let reference = tables.price(&p.symbol).expect("Symbol in price table");
    assert_eq!(p.strategy_name, tables.strategy(&p.symbol).expect("Symbol in strategy table"));
    assert_eq!(p.strategy_definition, format!("Buy on {}", p.strategy_name.to_lowercase()));
    assert_eq!(p.currency, "USD");
    assert_eq!(p.current_price, round_cents(reference));
    assert!((1..=50).contains(&p.quantity), "quantity {}", p.quantity);

    for value in [p.open_price, p.current_price, p.profit_or_loss] {
        assert!(value.scale() <= 2, "{value} has more than two decimals");
    }

    let open_jitter = Decimal::try_from(settings.open_price_jitter).unwrap();
    let lo = reference * (Decimal::ONE - open_jitter) - cents();
    let hi = reference * (Decimal::ONE + open_jitter) + cents();
    assert!(
        p.open_price >= lo && p.open_price <= hi,
        "open price {} for {}",
        p.open_price,
        reference
    );

    let max_days = Duration::days(i64::from(settings.max_holding_days));
    assert!(p.open_time >= as_of - max_days && p.open_time <= as_of - Duration::days(1));

    let qty = Decimal::from(p.quantity);
    let record = PositionRecord::from(p);
    match p.state {
        PositionState::Open => {
            assert_eq!(p.close_price, None);
            assert_eq!(p.close_time, None);
            assert_eq!(record.close_price, Decimal::ZERO);
            assert_eq!(record.close_time, close_time_sentinel());
            let expected = (p.current_price - p.open_price) * qty;
            assert!((p.profit_or_loss - expected).abs() <= cents());
        }
        PositionState::Closed => {
            let close = p.close_price.expect("Closed position has close price");
            let close_time = p.close_time.expect("Closed position has close time");
            assert!(close > Decimal::ZERO);
            assert!(close.scale() <= 2);
            assert!(close_time >= p.open_time);
            assert!(close_time <= p.open_time + max_days);
            assert_ne!(record.close_time, close_time_sentinel());

            let close_jitter = Decimal::try_from(settings.close_price_jitter).unwrap();
            let lo = p.open_price * (Decimal::ONE - close_jitter) - cents();
            let hi = p.open_price * (Decimal::ONE + close_jitter) + cents();
            assert!(close >= lo && close <= hi, "close price {close} for open {}", p.open_price);
            assert!((p.profit_or_loss - (close - p.open_price) * qty).abs() <= cents());
        }
    }

    let order_no: u32 = p
        .platform_order_id
        .strip_prefix("ORD")
        .expect("ORD prefix")
        .parse()
        .expect("Numeric order id");
    assert!((100_000..=999_999).contains(&order_no));
}
