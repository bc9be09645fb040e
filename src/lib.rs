pub mod config;
pub mod errors;
pub mod generator;
pub mod ledger;
pub mod metrics;
pub mod models;

pub use errors::{FixtureError, Result};
pub use generator::{
    generate, BatchSummary, GeneratorSettings, PositionGenerator, RandomSource, ReferenceTables,
};
pub use ledger::{parse_ledger, read_ledger, serialize, write_ledger};
pub use models::{InstrumentType, Position, PositionRecord, PositionState};
