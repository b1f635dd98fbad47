mod common;

use std::collections::BTreeMap;
use std::sync::Arc;

use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, Value};

use keupon_api::clock::FixedClock;
use keupon_api::AppState;

use common::{app_state, discard_logger, tier_row, MockRow, NOON};

fn open_row(id: i64, name: &str, no_of_customers: i64) -> MockRow {
    BTreeMap::from([
        ("id", Value::BigInt(Some(id))),
        ("name", Value::String(Some(Box::new(name.to_string())))),
        ("status", Value::String(Some(Box::new("open".to_string())))),
        ("actual_value", Value::Double(Some(100.0))),
        (
            "end_time",
            Value::String(Some(Box::new("1308182400".to_string()))),
        ),
        ("no_of_customers", Value::BigInt(Some(no_of_customers))),
        (
            "address1",
            Value::String(Some(Box::new("1 Main St".to_string()))),
        ),
        ("address2", Value::String(None)),
        ("city", Value::String(Some(Box::new("Austin".to_string())))),
        ("state", Value::String(Some(Box::new("TX".to_string())))),
        (
            "zipcode",
            Value::String(Some(Box::new("78701".to_string()))),
        ),
        ("discount", Value::Double(Some(0.0))),
        ("save_amount", Value::Double(Some(50.0))),
    ])
}

fn open_summary_row(id: i64, name: &str, no_of_customers: i64) -> MockRow {
    BTreeMap::from([
        ("id", Value::BigInt(Some(id))),
        ("name", Value::String(Some(Box::new(name.to_string())))),
        ("actual_value", Value::Double(Some(100.0))),
        (
            "end_time",
            Value::String(Some(Box::new("1308182400".to_string()))),
        ),
        ("no_of_customers", Value::BigInt(Some(no_of_customers))),
        ("discount", Value::Double(Some(0.0))),
        ("save_amount", Value::Double(Some(50.0))),
    ])
}

fn admin_row(id: i64, name: &str, no_of_customers: i64, activated: bool) -> MockRow {
    BTreeMap::from([
        ("id", Value::BigInt(Some(id))),
        ("activated", Value::Bool(Some(activated))),
        ("name", Value::String(Some(Box::new(name.to_string())))),
        (
            "status",
            Value::String(Some(Box::new("expired".to_string()))),
        ),
        ("actual_value", Value::Double(Some(100.0))),
        (
            "start_time",
            Value::String(Some(Box::new("1308096000".to_string()))),
        ),
        (
            "end_time",
            Value::String(Some(Box::new("1308182400".to_string()))),
        ),
        ("no_of_customers", Value::BigInt(Some(no_of_customers))),
        (
            "address1",
            Value::String(Some(Box::new("1 Main St".to_string()))),
        ),
        ("address2", Value::String(None)),
        ("city", Value::String(Some(Box::new("Austin".to_string())))),
        ("state", Value::String(Some(Box::new("TX".to_string())))),
        (
            "zipcode",
            Value::String(Some(Box::new("78701".to_string()))),
        ),
        ("discount", Value::Double(Some(0.0))),
        ("save_amount", Value::Double(Some(50.0))),
        ("preferred", Value::Bool(Some(false))),
        ("admin_preferred", Value::Bool(Some(false))),
    ])
}

/// Builds the state over a shared handle so the test can recover the mock
/// connection and inspect the statements it executed.
fn app_state_with_handle(db: DatabaseConnection) -> (AppState, Arc<DatabaseConnection>) {
    let pool = Arc::new(db);
    let state = AppState::with_clock(
        pool.clone(),
        Arc::new(FixedClock::at_epoch(NOON)),
        discard_logger(),
    );
    (state, pool)
}

fn unwrap_pool(pool: Arc<DatabaseConnection>) -> DatabaseConnection {
    match Arc::try_unwrap(pool) {
        Ok(conn) => conn,
        Err(_) => panic!("connection still shared"),
    }
}

#[tokio::test]
async fn current_open_deals_binds_five_row_limit() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![
            open_row(1, "tacos", 12),
            open_row(2, "massage", 3),
        ]])
        .append_query_results(vec![
            vec![tier_row(10, 40.0, 60.0, 5.0)],
            Vec::<MockRow>::new(),
        ])
        .into_connection();
    let (state, pool) = app_state_with_handle(db);

    let listing = state.deals.current_open_deals().await.unwrap();
    assert_eq!(listing.by_id.len(), 2);

    drop(state);
    let log = unwrap_pool(pool).into_transaction_log();
    let listing_stmt = format!("{:?}", log.first().unwrap());
    assert!(listing_stmt.contains("limit $2"));
    assert!(listing_stmt.contains("BigInt(Some(5))"));
}

#[tokio::test]
async fn hot_and_open_deals_fetch_the_whole_listing() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![open_row(7, "tacos", 25)]])
        .append_query_results(vec![vec![tier_row(20, 35.0, 65.0, 5.0)]])
        .into_connection();
    let (state, pool) = app_state_with_handle(db);

    let listing = state.deals.hot_and_open_deals().await.unwrap();
    assert_eq!(listing.by_id["7"].city, "Austin");
    assert_eq!(listing.discount_ranking, vec![("7".to_string(), 35.0)]);

    drop(state);
    let log = unwrap_pool(pool).into_transaction_log();
    let listing_stmt = format!("{:?}", log.first().unwrap());
    assert!(!listing_stmt.contains("limit"));
}

#[tokio::test]
async fn open_deals_rank_by_current_discount() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![
            open_summary_row(1, "tacos", 15),
            open_summary_row(2, "massage", 40),
        ]])
        .append_query_results(vec![
            vec![tier_row(10, 20.0, 80.0, 5.0)],
            vec![tier_row(30, 60.0, 40.0, 5.0)],
        ])
        .into_connection();
    let state = app_state(db);

    let listing = state.deals.open_deals().await.unwrap();

    assert_eq!(
        listing.discount_ranking,
        vec![("2".to_string(), 60.0), ("1".to_string(), 20.0)]
    );
    assert_eq!(listing.by_id["2"].name, "massage");
}

#[tokio::test]
async fn all_deals_carry_flags_regardless_of_status() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![
            admin_row(1, "live", 5, true),
            admin_row(2, "dormant", 0, false),
        ]])
        .append_query_results(vec![Vec::<MockRow>::new(), Vec::<MockRow>::new()])
        .into_connection();
    let state = app_state(db);

    let listing = state.deals.all_deals().await.unwrap();

    assert_eq!(listing.by_id.len(), 2);
    assert!(listing.by_id["1"].activated);
    assert!(!listing.by_id["2"].activated);
    assert_eq!(listing.by_id["2"].status, "expired");
}
