pub mod position;
pub mod record;

pub use position::Position;
pub use record::{close_time_sentinel, PositionRecord};

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// PositionState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionState {
    Open,
    Closed,
}

impl PositionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionState::Open => "Open",
            PositionState::Closed => "Closed",
        }
    }
}

impl fmt::Display for PositionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// InstrumentType
// ---------------------------------------------------------------------------

/// Asset class of a position. The generator only ever emits `Stock`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InstrumentType {
    #[default]
    Stock,
    OptionsContract,
    Futures,
    Cryptocurrency,
}

impl InstrumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstrumentType::Stock => "Stock",
            InstrumentType::OptionsContract => "OptionsContract",
            InstrumentType::Futures => "Futures",
            InstrumentType::Cryptocurrency => "Cryptocurrency",
        }
    }
}

impl fmt::Display for InstrumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const DEFAULT_CURRENCY: &str = "USD";
