use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A merchant-offered coupon deal. Status moves open -> tipped/expired via
/// merchant tooling outside this crate; we only read it.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "deals")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub status: String,
    /// Face value of the voucher.
    pub value: f64,
    /// Price the customer pays.
    pub buy: f64,
    pub save_amount: f64,
    /// Display-only seed discount; the effective discount is resolved from
    /// the tier table at read time.
    pub discount: f64,
    /// Seconds since epoch.
    pub expiry_date: i64,
    pub start_date: i64,
    pub merchant_id: i64,
    pub deal_type_id: i64,
    pub deal_category_id: Option<i64>,
    pub deal_sub_category_id: Option<i64>,
    pub preferred: bool,
    pub admin_preferred: bool,
    pub activated: bool,
    /// Loyalty-currency price for keupoint deals (deal type 4).
    pub keupoints_required: Option<i64>,
    pub rules: Option<String>,
    pub highlights: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::customer_deal::Entity")]
    CustomerDeals,
    #[sea_orm(has_one = "super::deal_schedule::Entity")]
    DealSchedule,
    #[sea_orm(has_one = "super::deal_location_detail::Entity")]
    DealLocationDetail,
    #[sea_orm(
        belongs_to = "super::merchant::Entity",
        from = "Column::MerchantId",
        to = "super::merchant::Column::Id"
    )]
    Merchant,
    #[sea_orm(
        belongs_to = "super::deal_type::Entity",
        from = "Column::DealTypeId",
        to = "super::deal_type::Column::Id"
    )]
    DealType,
    #[sea_orm(
        belongs_to = "super::deal_sub_category::Entity",
        from = "Column::DealSubCategoryId",
        to = "super::deal_sub_category::Column::Id"
    )]
    DealSubCategory,
}

impl Related<super::customer_deal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CustomerDeals.def()
    }
}

impl Related<super::deal_schedule::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DealSchedule.def()
    }
}

impl Related<super::deal_location_detail::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DealLocationDetail.def()
    }
}

impl Related<super::merchant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Merchant.def()
    }
}

impl Related<super::deal_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DealType.def()
    }
}

impl Related<super::deal_sub_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DealSubCategory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Deal lifecycle states as stored in `deals.status`.
pub mod status {
    pub const OPEN: &str = "open";
    pub const TIPPED: &str = "tipped";
    pub const EXPIRED: &str = "expired";
}

/// Well-known deal type ids.
pub mod deal_type_id {
    pub const KEUPOINT: i64 = 4;
    pub const GIFT: i64 = 5;
}
