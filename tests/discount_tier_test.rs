mod common;

use proptest::prelude::*;
use sea_orm::{DatabaseBackend, MockDatabase};

use keupon_api::entities::deal_discount;
use keupon_api::services::applicable_tier;

use common::{app_state, tier_row, MockRow};

fn tier(quantity: i64, discount: f64) -> deal_discount::Model {
    deal_discount::Model {
        id: quantity,
        deal_type_id: 1,
        quantity,
        discount,
        buy_value: 100.0 - discount,
        commission: discount / 10.0,
    }
}

/// The marketplace's standard ladder: 50..95 percent unlocked at purchase
/// counts 10, 20, ... 100.
fn standard_ladder() -> Vec<deal_discount::Model> {
    (0..10)
        .map(|i| tier(10 * (i + 1), 50.0 + 5.0 * i as f64))
        .collect()
}

#[test]
fn below_lowest_breakpoint_has_no_tier() {
    let ladder = standard_ladder();
    for quantity in 0..10 {
        assert!(applicable_tier(&ladder, quantity).is_none());
    }
}

#[test]
fn breakpoints_are_inclusive() {
    let ladder = standard_ladder();
    assert_eq!(applicable_tier(&ladder, 10).unwrap().discount, 50.0);
    assert_eq!(applicable_tier(&ladder, 100).unwrap().discount, 95.0);
    assert_eq!(applicable_tier(&ladder, 99).unwrap().discount, 90.0);
}

proptest! {
    /// Tier resolution is monotonic non-decreasing in cumulative quantity.
    #[test]
    fn tier_discount_is_monotonic(lo in 0i64..200, delta in 0i64..200) {
        let ladder = standard_ladder();
        let hi = lo + delta;

        let discount_at = |q: i64| applicable_tier(&ladder, q).map(|t| t.discount).unwrap_or(0.0);

        prop_assert!(discount_at(lo) <= discount_at(hi));
    }

    /// The resolved tier is always the greatest breakpoint not exceeding the
    /// quantity.
    #[test]
    fn resolved_tier_is_greatest_reachable(q in 0i64..300) {
        let ladder = standard_ladder();
        match applicable_tier(&ladder, q) {
            Some(t) => {
                prop_assert!(t.quantity <= q);
                for other in &ladder {
                    if other.quantity <= q {
                        prop_assert!(other.quantity <= t.quantity);
                    }
                }
            }
            None => prop_assert!(q < 10),
        }
    }
}

#[tokio::test]
async fn resolve_tier_returns_unlocked_tier() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![tier_row(50, 60.0, 40.0, 12.0)]])
        .into_connection();
    let state = app_state(db);

    let tier = state.discounts.resolve_tier(7, 55).await.unwrap().unwrap();
    assert_eq!(tier.quantity, 50);
    assert_eq!(tier.discount, 60.0);
    assert_eq!(tier.buy_value, 40.0);
    assert_eq!(tier.commission, 12.0);
}

#[tokio::test]
async fn current_discount_defaults_to_zero_without_tier() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<MockRow>::new()])
        .into_connection();
    let state = app_state(db);

    let discount = state.discounts.current_discount(7, 3).await.unwrap();
    assert_eq!(discount, 0.0);
}
