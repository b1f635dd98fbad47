use slog::Logger;
use tracing::{debug, instrument};

use crate::db::DatabaseAccess;
use crate::entities::deal_discount;
use crate::errors::ServiceError;
use crate::queries::discount_queries::{GetCurrentTierQuery, GetTierTableQuery};
use crate::queries::Query;

/// Sales figures derived from a resolved tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalesFigures {
    /// `actual_price * purchased`
    pub sales: f64,
    /// `sales * (1 - discount/100) * (1 - commission/100)`
    pub net_sales: f64,
}

/// Picks the tier unlocked by `cumulative_quantity`: the greatest threshold
/// not exceeding it (thresholds are inclusive). `None` below the lowest
/// threshold.
pub fn applicable_tier(
    tiers: &[deal_discount::Model],
    cumulative_quantity: i64,
) -> Option<&deal_discount::Model> {
    tiers
        .iter()
        .filter(|tier| tier.quantity <= cumulative_quantity)
        .max_by_key(|tier| tier.quantity)
}

/// Gross and net sales for one deal.
///
/// Percentages are on the 0-100 scale; all arithmetic is f64, matching the
/// double-precision semantics the reports have always had.
pub fn compute_sales(
    actual_price: f64,
    purchased: i64,
    discount_percent: f64,
    commission_percent: f64,
) -> SalesFigures {
    let sales = actual_price * purchased as f64;
    let net_sales = sales * (1.0 - discount_percent / 100.0) * (1.0 - commission_percent / 100.0);
    SalesFigures { sales, net_sales }
}

/// Resolves discount tiers from current cumulative purchase volume.
///
/// A deal's effective discount is a function of time-varying aggregate
/// state, never a stored attribute of the purchase.
#[derive(Clone)]
pub struct DiscountService {
    db: DatabaseAccess,
    logger: Logger,
}

impl DiscountService {
    pub fn new(db: DatabaseAccess, logger: Logger) -> Self {
        Self { db, logger }
    }

    /// The tier currently applicable to a deal, or `None` when the
    /// cumulative count is below every threshold.
    #[instrument(skip(self))]
    pub async fn resolve_tier(
        &self,
        deal_id: i64,
        cumulative_quantity: i64,
    ) -> Result<Option<deal_discount::Model>, ServiceError> {
        let tier = GetCurrentTierQuery {
            deal_id,
            cumulative_quantity,
        }
        .execute(&self.db)
        .await?;

        if tier.is_none() {
            debug!(deal_id, cumulative_quantity, "No discount tier unlocked");
            slog::debug!(self.logger, "no discount tier unlocked";
                "deal_id" => deal_id, "cumulative_quantity" => cumulative_quantity);
        }

        Ok(tier)
    }

    /// The currently applicable discount percent, zero when no tier matches.
    #[instrument(skip(self))]
    pub async fn current_discount(
        &self,
        deal_id: i64,
        cumulative_quantity: i64,
    ) -> Result<f64, ServiceError> {
        let tier = self.resolve_tier(deal_id, cumulative_quantity).await?;
        Ok(tier.map(|t| t.discount).unwrap_or(0.0))
    }

    /// Full tier table for one deal type, ascending by threshold.
    #[instrument(skip(self))]
    pub async fn tier_table(
        &self,
        deal_type_id: i64,
    ) -> Result<Vec<deal_discount::Model>, ServiceError> {
        GetTierTableQuery { deal_type_id }.execute(&self.db).await
    }
}
