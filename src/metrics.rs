use metrics::counter;

use crate::models::PositionState;

pub const POSITIONS_GENERATED: &str = "fixture_positions_generated_total";
pub const LEDGER_WRITES: &str = "fixture_ledger_writes_total";

/// Register all fixture counters at zero so they show up in whatever
/// recorder the host process installs, even before the first increment.
pub fn register_metrics() {
    counter!(POSITIONS_GENERATED, "state" => PositionState::Open.as_str()).absolute(0);
    counter!(POSITIONS_GENERATED, "state" => PositionState::Closed.as_str()).absolute(0);
    counter!(LEDGER_WRITES).absolute(0);
}

pub fn record_position(state: PositionState) {
    counter!(POSITIONS_GENERATED, "state" => state.as_str()).increment(1);
}

pub fn record_ledger_write() {
    counter!(LEDGER_WRITES).increment(1);
}
