use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::fmt;
use uuid::Uuid;

use super::{InstrumentType, PositionState};

/// A synthetic position as produced by the generator.
///
/// Close fields are `Some` exactly when `state` is `Closed`; the wire
/// sentinels only appear in [`super::PositionRecord`].
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub position_guid: Uuid,
    pub symbol: String,
    pub instrument_type: InstrumentType,
    pub state: PositionState,
    pub open_time: NaiveDateTime,
    pub close_time: Option<NaiveDateTime>,
    pub currency: String,
    pub open_price: Decimal,
    pub close_price: Option<Decimal>,
    pub current_price: Decimal,
    pub quantity: u32,
    pub profit_or_loss: Decimal,
    pub strategy_name: String,
    pub strategy_definition: String,
    pub platform_order_id: String,
}

impl Position {
    pub fn is_open(&self) -> bool {
        self.state == PositionState::Open
    }
}

/// Template used for `strategy_definition`.
pub fn strategy_definition(strategy_name: &str) -> String {
    format!("Buy on {}", strategy_name.to_lowercase())
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Position Details:")?;
        writeln!(f, "Position Guid: {}", self.position_guid)?;
        writeln!(f, "Platform OrderId: {}", self.platform_order_id)?;
        writeln!(f, "Symbol: {}", self.symbol)?;
        writeln!(f, "Instrument Type: {}", self.instrument_type)?;
        writeln!(f, "Position State: {}", self.state)?;
        writeln!(f, "Open Time: {}", self.open_time)?;
        match self.close_time {
            Some(t) => writeln!(f, "Close Time: {t}")?,
            None => writeln!(f, "Close Time: -")?,
        }
        writeln!(f, "Currency: {}", self.currency)?;
        writeln!(f, "Open Price: {}", self.open_price)?;
        match self.close_price {
            Some(p) => writeln!(f, "Close Price: {p}")?,
            None => writeln!(f, "Close Price: -")?,
        }
        writeln!(f, "Current Price: {}", self.current_price)?;
        writeln!(f, "Quantity: {}", self.quantity)?;
        writeln!(f, "Profit or Loss: {}", self.profit_or_loss)?;
        writeln!(f, "Strategy Name: {}", self.strategy_name)?;
        write!(f, "Strategy Definition: {}", self.strategy_definition)
    }
}
