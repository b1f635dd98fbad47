//! Shared fixtures for the MockDatabase-backed integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use sea_orm::{DatabaseConnection, Value};
use slog::{o, Discard, Logger};

use keupon_api::clock::FixedClock;
use keupon_api::AppState;

/// 2011-06-15 00:00:00 UTC; tests pin "now" relative to this day.
pub const DAY_START: i64 = 1_308_096_000;
pub const NOON: i64 = DAY_START + 12 * 3600;

pub type MockRow = BTreeMap<&'static str, Value>;

pub fn discard_logger() -> Logger {
    Logger::root(Discard, o!())
}

/// Wires the service facades over a mock connection with time pinned to
/// [`NOON`].
pub fn app_state(db: DatabaseConnection) -> AppState {
    AppState::with_clock(
        Arc::new(db),
        Arc::new(FixedClock::at_epoch(NOON)),
        discard_logger(),
    )
}

/// Raw-SQL result row for a deal_discounts tier.
pub fn tier_row(quantity: i64, discount: f64, buy_value: f64, commission: f64) -> MockRow {
    BTreeMap::from([
        ("id", Value::BigInt(Some(quantity))),
        ("deal_type_id", Value::BigInt(Some(1))),
        ("quantity", Value::BigInt(Some(quantity))),
        ("discount", Value::Double(Some(discount))),
        ("buy_value", Value::Double(Some(buy_value))),
        ("commission", Value::Double(Some(commission))),
    ])
}

/// Raw-SQL result row for the hot-deals listing.
pub fn hot_deal_row(id: i64, name: &str, no_of_customers: i64) -> MockRow {
    BTreeMap::from([
        ("id", Value::BigInt(Some(id))),
        ("name", Value::String(Some(Box::new(name.to_string())))),
        ("no_of_customers", Value::BigInt(Some(no_of_customers))),
        ("discount", Value::Double(Some(0.0))),
        ("actual_value", Value::Double(Some(100.0))),
        ("save_amount", Value::Double(Some(50.0))),
    ])
}

/// Raw-SQL count row.
pub fn count_row(count: i64) -> MockRow {
    BTreeMap::from([("count", Value::BigInt(Some(count)))])
}

/// Raw-SQL result row for the accounting base query.
pub fn accounting_source_row(
    id: i64,
    merchant_name: &str,
    title: &str,
    actual_price: f64,
    purchased: i64,
) -> MockRow {
    BTreeMap::from([
        ("id", Value::BigInt(Some(id))),
        ("expiry_date", Value::BigInt(Some(DAY_START + 30 * 86_400))),
        (
            "posting_date",
            Value::String(Some(Box::new(DAY_START.to_string()))),
        ),
        (
            "closing_date",
            Value::String(Some(Box::new((DAY_START + 86_400).to_string()))),
        ),
        (
            "merchant_name",
            Value::String(Some(Box::new(merchant_name.to_string()))),
        ),
        ("title", Value::String(Some(Box::new(title.to_string())))),
        ("actual_price", Value::Double(Some(actual_price))),
        ("purchased", Value::BigInt(Some(purchased))),
    ])
}
