use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "deal_categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::deal_sub_category::Entity")]
    DealSubCategories,
}

impl Related<super::deal_sub_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DealSubCategories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
