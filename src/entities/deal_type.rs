use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "deal_types")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::deal::Entity")]
    Deals,
    #[sea_orm(has_many = "super::deal_discount::Entity")]
    DealDiscounts,
}

impl Related<super::deal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Deals.def()
    }
}

impl Related<super::deal_discount::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DealDiscounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
