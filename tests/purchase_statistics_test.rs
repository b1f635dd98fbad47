mod common;

use std::collections::BTreeMap;

use sea_orm::{DatabaseBackend, MockDatabase, Value};

use common::{app_state, count_row, DAY_START};

fn history_row(deal_name: &str, status: &str) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([
        (
            "deal_name",
            Value::String(Some(Box::new(deal_name.to_string()))),
        ),
        ("purchase_date", Value::BigInt(Some(DAY_START - 86_400))),
        ("expiry_date", Value::BigInt(Some(DAY_START + 86_400))),
        (
            "deal_code",
            Value::String(Some(Box::new(format!("KPN-{deal_name}")))),
        ),
        ("status", Value::String(Some(Box::new(status.to_string())))),
    ])
}

#[tokio::test]
async fn statistics_counts_add_up() {
    // available, used, expired: three independent count queries, in order.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![
            vec![count_row(3)],
            vec![count_row(2)],
            vec![count_row(1)],
        ])
        .into_connection();
    let state = app_state(db);

    let stats = state.customers.purchase_statistics(5).await.unwrap();

    assert_eq!(stats.available, 3);
    assert_eq!(stats.used, 2);
    assert_eq!(stats.expired, 1);
    assert_eq!(stats.total, 6);
    // Loyalty balance is never computed by this layer.
    assert_eq!(stats.keupoints, None);
}

#[tokio::test]
async fn statistics_of_new_customer_are_all_zero() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![
            vec![count_row(0)],
            vec![count_row(0)],
            vec![count_row(0)],
        ])
        .into_connection();
    let state = app_state(db);

    let stats = state.customers.purchase_statistics(5).await.unwrap();
    assert_eq!(stats.total, 0);
}

#[tokio::test]
async fn purchase_history_carries_deal_and_redemption_fields() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![
            history_row("sushi", "available"),
            history_row("spa", "used"),
        ]])
        .into_connection();
    let state = app_state(db);

    let history = state.customers.purchase_history(5).await.unwrap();

    assert_eq!(history.len(), 2);
    assert_eq!(history[0].deal_name, "sushi");
    assert_eq!(history[0].status, "available");
    assert_eq!(history[0].deal_code, "KPN-sushi");
    assert_eq!(history[1].status, "used");
}

#[tokio::test]
async fn empty_history_is_not_an_error() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<BTreeMap<&'static str, Value>>::new()])
        .into_connection();
    let state = app_state(db);

    let history = state.customers.purchase_history(5).await.unwrap();
    assert!(history.is_empty());
}
