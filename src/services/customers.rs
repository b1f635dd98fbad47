use std::sync::Arc;

use slog::Logger;
use tracing::instrument;

use crate::clock::Clock;
use crate::db::DatabaseAccess;
use crate::errors::ServiceError;
use crate::queries::customer_queries::{
    CountExpiredPurchasesQuery, CountPurchasesByStatusQuery, GetPurchaseHistoryQuery,
    PurchaseRecord,
};
use crate::queries::Query;
use crate::reports::PurchaseStatistics;

/// Customer purchase history and statistics.
#[derive(Clone)]
pub struct CustomerService {
    db: DatabaseAccess,
    clock: Arc<dyn Clock>,
    logger: Logger,
}

impl CustomerService {
    pub fn new(db: DatabaseAccess, clock: Arc<dyn Clock>, logger: Logger) -> Self {
        Self { db, clock, logger }
    }

    /// Every purchase the customer has made, with the deal it bought.
    #[instrument(skip(self))]
    pub async fn purchase_history(
        &self,
        customer_id: i64,
    ) -> Result<Vec<PurchaseRecord>, ServiceError> {
        GetPurchaseHistoryQuery { customer_id }.execute(&self.db).await
    }

    /// Counts of the customer's available, used and expired purchases.
    ///
    /// The three counts are independent queries; a purchase or redemption
    /// landing between them can skew the snapshot. Accepted behavior: each
    /// count is consistent with the moment its query ran.
    #[instrument(skip(self))]
    pub async fn purchase_statistics(
        &self,
        customer_id: i64,
    ) -> Result<PurchaseStatistics, ServiceError> {
        let available = CountPurchasesByStatusQuery::available(customer_id)
            .execute(&self.db)
            .await?;
        let used = CountPurchasesByStatusQuery::used(customer_id)
            .execute(&self.db)
            .await?;
        let expired = CountExpiredPurchasesQuery {
            customer_id,
            now: self.clock.now_epoch(),
        }
        .execute(&self.db)
        .await?;

        slog::debug!(self.logger, "purchase statistics";
            "customer_id" => customer_id,
            "available" => available, "used" => used, "expired" => expired);

        Ok(PurchaseStatistics {
            available,
            used,
            expired,
            keupoints: None,
            total: available + used + expired,
        })
    }
}
