use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Seller identity used for display and report grouping.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "companies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub merchant_profile_id: i64,
    pub name: String,
    pub website: Option<String>,
    pub address1: String,
    pub address2: Option<String>,
    pub city: String,
    pub zipcode: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::merchant_profile::Entity",
        from = "Column::MerchantProfileId",
        to = "super::merchant_profile::Column::Id"
    )]
    MerchantProfile,
}

impl Related<super::merchant_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MerchantProfile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
