use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Discount tier table, keyed by deal type. `quantity` is the cumulative
/// purchase-count threshold that unlocks the tier; thresholds are monotonic
/// within a deal type.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "deal_discounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub deal_type_id: i64,
    pub quantity: i64,
    /// Discount percent on the 0-100 scale.
    pub discount: f64,
    /// Tier-adjusted buy price.
    pub buy_value: f64,
    /// Platform commission percent on the 0-100 scale.
    pub commission: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::deal_type::Entity",
        from = "Column::DealTypeId",
        to = "super::deal_type::Column::Id"
    )]
    DealType,
}

impl Related<super::deal_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DealType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
