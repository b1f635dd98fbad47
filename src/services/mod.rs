//! Service facades over the query layer.
//!
//! Each service owns a [`crate::db::DatabaseAccess`], a
//! [`crate::clock::Clock`] where time matters, and a structured logger.

pub mod customers;
pub mod deals;
pub mod discounts;
pub mod reports;

pub use customers::CustomerService;
pub use deals::{DealListing, DealService};
pub use discounts::{applicable_tier, compute_sales, DiscountService, SalesFigures};
pub use reports::ReportService;
