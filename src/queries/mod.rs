//! Read-only query objects.
//!
//! One struct per operation; each carries its parameters (including any
//! point-in-time inputs, which callers derive from a [`crate::clock::Clock`])
//! and executes against a [`DatabaseAccess`].

use async_trait::async_trait;

use crate::db::DatabaseAccess;
use crate::errors::ServiceError;

pub mod customer_queries;
pub mod deal_queries;
pub mod discount_queries;
pub mod report_queries;

/// Trait representing a generic asynchronous query.
#[async_trait]
pub trait Query: Send + Sync {
    type Result: Send + Sync;

    /// Executes the query using the provided database connection
    async fn execute(&self, db: &DatabaseAccess) -> Result<Self::Result, ServiceError>;
}

/// Zero-filled purchase-count aggregation used by every listing: a deal with
/// no purchase records counts as 0, never as NULL.
pub(crate) const PURCHASE_COUNT: &str =
    "sum(case when cd.quantity is null then 0 else cd.quantity end)";
