use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "deal_sub_categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub deal_category_id: i64,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::deal_category::Entity",
        from = "Column::DealCategoryId",
        to = "super::deal_category::Column::Id"
    )]
    DealCategory,
    #[sea_orm(has_many = "super::deal::Entity")]
    Deals,
}

impl Related<super::deal_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DealCategory.def()
    }
}

impl Related<super::deal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Deals.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
