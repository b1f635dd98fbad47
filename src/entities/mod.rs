//! sea-orm entities mirroring the marketplace schema.
//!
//! The schema itself is owned by external tooling; these definitions only
//! describe the columns this crate reads.

pub mod company;
pub mod customer_deal;
pub mod deal;
pub mod deal_category;
pub mod deal_discount;
pub mod deal_location_detail;
pub mod deal_schedule;
pub mod deal_sub_category;
pub mod deal_type;
pub mod merchant;
pub mod merchant_profile;

pub use company::Entity as Company;
pub use customer_deal::Entity as CustomerDeal;
pub use deal::Entity as Deal;
pub use deal_category::Entity as DealCategory;
pub use deal_discount::Entity as DealDiscount;
pub use deal_location_detail::Entity as DealLocationDetail;
pub use deal_schedule::Entity as DealSchedule;
pub use deal_sub_category::Entity as DealSubCategory;
pub use deal_type::Entity as DealType;
pub use merchant::Entity as Merchant;
pub use merchant_profile::Entity as MerchantProfile;
