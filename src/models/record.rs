use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{InstrumentType, Position, PositionState};
use crate::errors::FixtureError;

/// `CloseTime` written for positions that are still open: 0001-01-01T00:00:00.
pub fn close_time_sentinel() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .unwrap_or(NaiveDate::MIN)
        .and_time(NaiveTime::MIN)
}

/// Ledger row as it appears on disk. Field order and casing are part of the
/// file contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PositionRecord {
    pub position_guid: Uuid,
    pub symbol: String,
    pub instrument_type: InstrumentType,
    pub state: PositionState,
    pub open_time: NaiveDateTime,
    pub close_time: NaiveDateTime,
    pub currency: String,
    pub open_price: Decimal,
    pub close_price: Decimal,
    pub current_price: Decimal,
    pub quantity: u32,
    pub profit_or_loss: Decimal,
    pub strategy_name: String,
    pub strategy_definition: String,
    pub platform_order_id: String,
}

impl From<&Position> for PositionRecord {
    fn from(p: &Position) -> Self {
        Self {
            position_guid: p.position_guid,
            symbol: p.symbol.clone(),
            instrument_type: p.instrument_type,
            state: p.state,
            open_time: p.open_time,
            close_time: p.close_time.unwrap_or_else(close_time_sentinel),
            currency: p.currency.clone(),
            open_price: p.open_price,
            close_price: p.close_price.unwrap_or(Decimal::ZERO),
            current_price: p.current_price,
            quantity: p.quantity,
            profit_or_loss: p.profit_or_loss,
            strategy_name: p.strategy_name.clone(),
            strategy_definition: p.strategy_definition.clone(),
            platform_order_id: p.platform_order_id.clone(),
        }
    }
}

impl TryFrom<PositionRecord> for Position {
    type Error = FixtureError;

    fn try_from(r: PositionRecord) -> Result<Self, Self::Error> {
        let sentinel = close_time_sentinel();
        let (close_price, close_time) = match r.state {
            PositionState::Open => {
                if !r.close_price.is_zero() || r.close_time != sentinel {
                    return Err(FixtureError::InvalidRecord(format!(
                        "open position {} carries close price {} / close time {}",
                        r.position_guid, r.close_price, r.close_time
                    )));
                }
                (None, None)
            }
            PositionState::Closed => {
                if r.close_price <= Decimal::ZERO || r.close_time == sentinel {
                    return Err(FixtureError::InvalidRecord(format!(
                        "closed position {} has no close price or close time",
                        r.position_guid
                    )));
                }
                (Some(r.close_price), Some(r.close_time))
            }
        };

        Ok(Position {
            position_guid: r.position_guid,
            symbol: r.symbol,
            instrument_type: r.instrument_type,
            state: r.state,
            open_time: r.open_time,
            close_time,
            currency: r.currency,
            open_price: r.open_price,
            close_price,
            current_price: r.current_price,
            quantity: r.quantity,
            profit_or_loss: r.profit_or_loss,
            strategy_name: r.strategy_name,
            strategy_definition: r.strategy_definition,
            platform_order_id: r.platform_order_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn open_record() -> serde_json::Value {
        json!({
            "PositionGuid": "6f9619ff-8b86-4d01-b42d-00c04fc964ff",
            "Symbol": "TSLA",
            "InstrumentType": "Stock",
            "State": "Open",
            "OpenTime": "2024-05-01T09:30:00.250000",
            "CloseTime": "0001-01-01T00:00:00",
            "Currency": "USD",
            "OpenPrice": 690.12,
            "ClosePrice": 0.0,
            "CurrentPrice": 701.92,
            "Quantity": 3,
            "ProfitOrLoss": 35.4,
            "StrategyName": "Reversal",
            "StrategyDefinition": "Buy on reversal",
            "PlatformOrderId": "ORD482913"
        })
    }

    #[test]
    fn test_sentinel_is_year_one() {
        assert_eq!(close_time_sentinel().to_string(), "0001-01-01 00:00:00");
    }

    #[test]
    fn test_open_record_maps_sentinels_to_none() {
        let record: PositionRecord = serde_json::from_value(open_record()).unwrap();
        let position = Position::try_from(record).unwrap();
        assert!(position.is_open());
        assert_eq!(position.close_price, None);
        assert_eq!(position.close_time, None);
        assert_eq!(position.open_price, Decimal::new(69012, 2));
        assert_eq!(position.quantity, 3);
    }

    #[test]
    fn test_open_record_with_close_price_rejected() {
        let mut value = open_record();
        value["ClosePrice"] = json!(12.5);
        let record: PositionRecord = serde_json::from_value(value).unwrap();
        let err = Position::try_from(record).unwrap_err();
        assert!(matches!(err, FixtureError::InvalidRecord(_)));
    }

    #[test]
    fn test_closed_record_with_sentinel_rejected() {
        let mut value = open_record();
        value["State"] = json!("Closed");
        value["ClosePrice"] = json!(700.0);
        let record: PositionRecord = serde_json::from_value(value).unwrap();
        assert!(Position::try_from(record).is_err());
    }

    #[test]
    fn test_record_writes_pascal_case_and_sentinel() {
        let record: PositionRecord = serde_json::from_value(open_record()).unwrap();
        let position = Position::try_from(record).unwrap();
        let value = serde_json::to_value(PositionRecord::from(&position)).unwrap();
        assert_eq!(value["CloseTime"], "0001-01-01T00:00:00");
        assert_eq!(value["ClosePrice"], json!(0.0));
        assert_eq!(value["OpenTime"], "2024-05-01T09:30:00.250");
        assert_eq!(value["PlatformOrderId"], "ORD482913");
    }
}
