mod common;

use std::collections::BTreeMap;

use sea_orm::{DatabaseBackend, MockDatabase, Value};

use common::{app_state, tier_row, DAY_START};

fn merchant_deal_row(id: i64, no_of_customers: i64) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([
        ("id", Value::BigInt(Some(id))),
        ("discount", Value::Double(Some(50.0))),
        ("actual_value", Value::Double(Some(100.0))),
        ("save_amount", Value::Double(Some(50.0))),
        ("name", Value::String(Some(Box::new(format!("deal-{id}"))))),
        ("buy", Value::Double(Some(50.0))),
        ("status", Value::String(Some(Box::new("open".to_string())))),
        (
            "start_time",
            Value::String(Some(Box::new(DAY_START.to_string()))),
        ),
        (
            "end_time",
            Value::String(Some(Box::new((DAY_START + 86_400).to_string()))),
        ),
        ("expiry_date", Value::BigInt(Some(DAY_START + 30 * 86_400))),
        ("no_of_customers", Value::BigInt(Some(no_of_customers))),
        (
            "address1",
            Value::String(Some(Box::new("1 Main St".to_string()))),
        ),
        ("address2", Value::String(None)),
        ("city", Value::String(Some(Box::new("Erlangen".to_string())))),
        ("state", Value::String(Some(Box::new("BY".to_string())))),
        ("zipcode", Value::String(Some(Box::new("91052".to_string())))),
    ])
}

fn keupoint_deal_row(id: i64, keupoints_required: i64) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([
        ("id", Value::BigInt(Some(id))),
        ("name", Value::String(Some(Box::new(format!("kp-{id}"))))),
        ("buy", Value::Double(Some(0.0))),
        ("value", Value::Double(Some(20.0))),
        ("discount", Value::Double(Some(0.0))),
        ("status", Value::String(Some(Box::new("open".to_string())))),
        ("expiry_date", Value::BigInt(Some(DAY_START + 30 * 86_400))),
        ("no_of_customers", Value::BigInt(Some(4))),
        ("keupoints_required", Value::BigInt(Some(keupoints_required))),
    ])
}

#[tokio::test]
async fn merchant_listing_folds_into_map_and_ranking() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![
            merchant_deal_row(1, 15),
            merchant_deal_row(2, 40),
        ]])
        .append_query_results(vec![
            vec![tier_row(10, 50.0, 50.0, 5.0)],
            vec![tier_row(40, 70.0, 30.0, 5.0)],
        ])
        .into_connection();
    let state = app_state(db);

    let listing = state.deals.merchant_deals(3).await.unwrap();

    assert_eq!(listing.by_id.len(), 2);
    assert_eq!(listing.by_id["1"].address1, "1 Main St");
    assert_eq!(listing.by_id["1"].address2, None);
    assert_eq!(
        listing.discount_ranking,
        vec![("2".to_string(), 70.0), ("1".to_string(), 50.0)]
    );
}

#[tokio::test]
async fn keupoint_listing_carries_loyalty_price() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![keupoint_deal_row(8, 250)]])
        .into_connection();
    let state = app_state(db);

    let deals = state.deals.keupoint_deals(3).await.unwrap();
    assert_eq!(deals.len(), 1);
    assert_eq!(deals[0].keupoints_required, Some(250));
}

#[tokio::test]
async fn affordable_keupoint_deals_listing_maps_rows() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![BTreeMap::from([
            ("id", Value::BigInt(Some(8))),
            ("name", Value::String(Some(Box::new("kp-8".to_string())))),
        ])]])
        .into_connection();
    let state = app_state(db);

    let deals = state.deals.available_keupoint_deals(300).await.unwrap();
    assert_eq!(deals.len(), 1);
    assert_eq!(deals[0].id, 8);
    assert_eq!(deals[0].name, "kp-8");
}
