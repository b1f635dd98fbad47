use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One purchase record per customer/deal pair. Quantity is nullable in the
/// legacy schema; aggregation zero-fills it.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customer_deals")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub customer_id: i64,
    pub deal_id: i64,
    pub quantity: Option<i32>,
    /// Seconds since epoch.
    pub purchase_date: i64,
    /// "available" until redeemed, then "used".
    pub status: String,
    pub deal_code: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::deal::Entity",
        from = "Column::DealId",
        to = "super::deal::Column::Id"
    )]
    Deal,
}

impl Related<super::deal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Deal.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Redemption states as stored in `customer_deals.status`.
pub mod status {
    pub const AVAILABLE: &str = "available";
    pub const USED: &str = "used";
}
