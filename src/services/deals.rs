use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use slog::Logger;
use tracing::{info, instrument};

use crate::clock::{day_start_epoch, Clock};
use crate::db::DatabaseAccess;
use crate::entities::deal;
use crate::errors::ServiceError;
use crate::queries::deal_queries::{
    AdminDealRow, DealNameRow, DealSummaryRow, GetAllDealsQuery, GetAvailableKeupointDealsQuery,
    GetCategoryNameQuery, GetGiftDealsQuery, GetHotDealsQuery, GetHottestDealQuery,
    GetKeupointDealDetailQuery, GetKeupointDealsQuery, GetMerchantDealsQuery,
    GetOpenDealListingQuery, GetOpenDealsQuery, GetRecentDealsQuery,
    GetRecentlyTippedDealIdsQuery, GetTodaysDealQuery, GiftDealRow, HotDealRow, HottestDealRow,
    KeupointDealDetailRow, KeupointDealRow, MerchantDealRow, OpenDealRow, OpenSummaryRow,
    TodaysDeal,
};
use crate::queries::Query;

use super::discounts::DiscountService;

/// How many rows the "current/upcoming" slice shows.
const CURRENT_DEALS_LIMIT: u64 = 5;

/// A folded listing: the rows keyed by deal id (rendered as a string, the
/// shape callers have always consumed) plus a ranking of those deals by
/// their currently applicable tier discount, descending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DealListing<R> {
    pub by_id: HashMap<String, R>,
    pub discount_ranking: Vec<(String, f64)>,
}

/// Deal discovery listings for customers, merchants and admins.
#[derive(Clone)]
pub struct DealService {
    db: DatabaseAccess,
    discounts: DiscountService,
    clock: Arc<dyn Clock>,
    logger: Logger,
}

impl DealService {
    pub fn new(
        db: DatabaseAccess,
        discounts: DiscountService,
        clock: Arc<dyn Clock>,
        logger: Logger,
    ) -> Self {
        Self {
            db,
            discounts,
            clock,
            logger,
        }
    }

    /// Folds listing rows into [`DealListing`]: resolves each deal's current
    /// discount from its aggregated purchase count and ranks descending.
    async fn fold_listing<R>(&self, rows: Vec<R>) -> Result<DealListing<R>, ServiceError>
    where
        R: DealSummaryRow + Send + Sync,
    {
        let mut discount_ranking = Vec::with_capacity(rows.len());
        for row in &rows {
            let discount = self
                .discounts
                .current_discount(row.deal_id(), row.purchase_count())
                .await?;
            discount_ranking.push((row.deal_id().to_string(), discount));
        }
        discount_ranking
            .sort_by(|l, r| r.1.partial_cmp(&l.1).unwrap_or(Ordering::Equal));

        let by_id = rows
            .into_iter()
            .map(|row| (row.deal_id().to_string(), row))
            .collect();

        Ok(DealListing {
            by_id,
            discount_ranking,
        })
    }

    /// Public "hot deals", ranked by purchase count and by current discount.
    #[instrument(skip(self))]
    pub async fn hot_deals(&self) -> Result<DealListing<HotDealRow>, ServiceError> {
        let rows = GetHotDealsQuery.execute(&self.db).await?;
        info!(deals = rows.len(), "Fetched hot deals");
        self.fold_listing(rows).await
    }

    /// Today's single hottest deal. Its discount and buy price are
    /// overwritten from the currently unlocked tier when one exists.
    #[instrument(skip(self))]
    pub async fn hottest_deal_of_today(&self) -> Result<Option<HottestDealRow>, ServiceError> {
        let Some(mut row) = GetHottestDealQuery.execute(&self.db).await? else {
            return Ok(None);
        };

        if let Some(tier) = self
            .discounts
            .resolve_tier(row.id, row.no_of_customers)
            .await?
        {
            row.discount = tier.discount;
            row.buy = tier.buy_value;
        }

        Ok(Some(row))
    }

    /// Open deals with schedule and location, ordered by schedule start.
    #[instrument(skip(self))]
    pub async fn hot_and_open_deals(&self) -> Result<DealListing<OpenDealRow>, ServiceError> {
        let rows = GetOpenDealListingQuery { limit: None }.execute(&self.db).await?;
        self.fold_listing(rows).await
    }

    /// The current/upcoming slice of the open listing.
    #[instrument(skip(self))]
    pub async fn current_open_deals(&self) -> Result<DealListing<OpenDealRow>, ServiceError> {
        let rows = GetOpenDealListingQuery {
            limit: Some(CURRENT_DEALS_LIMIT),
        }
        .execute(&self.db)
        .await?;
        self.fold_listing(rows).await
    }

    /// Every deal regardless of status, for the admin dashboard.
    #[instrument(skip(self))]
    pub async fn all_deals(&self) -> Result<DealListing<AdminDealRow>, ServiceError> {
        let rows = GetAllDealsQuery.execute(&self.db).await?;
        self.fold_listing(rows).await
    }

    /// Open deals outside the admin-preferred rotation.
    #[instrument(skip(self))]
    pub async fn open_deals(&self) -> Result<DealListing<OpenSummaryRow>, ServiceError> {
        let rows = GetOpenDealsQuery.execute(&self.db).await?;
        self.fold_listing(rows).await
    }

    /// Ids of deals that have tipped.
    #[instrument(skip(self))]
    pub async fn recently_tipped_deal_ids(&self) -> Result<Vec<i64>, ServiceError> {
        GetRecentlyTippedDealIdsQuery.execute(&self.db).await
    }

    /// The deal scheduled to start at the beginning of the current day, if
    /// any. An empty day yields `None`, never an error.
    #[instrument(skip(self))]
    pub async fn todays_deal(&self) -> Result<Option<TodaysDeal>, ServiceError> {
        let day_start = day_start_epoch(self.clock.now());
        let deal = GetTodaysDealQuery { day_start }.execute(&self.db).await?;

        if deal.is_none() {
            slog::info!(self.logger, "no deal scheduled for today"; "day_start" => day_start);
        }

        Ok(deal)
    }

    /// Deals whose schedule started before today.
    #[instrument(skip(self))]
    pub async fn recent_deals(&self) -> Result<Vec<deal::Model>, ServiceError> {
        let day_start = day_start_epoch(self.clock.now());
        GetRecentDealsQuery { day_start }.execute(&self.db).await
    }

    /// "Category(SubCategory)" display string for one deal; `None` when the
    /// deal has no sub-category assigned.
    #[instrument(skip(self))]
    pub async fn category_name(&self, deal_id: i64) -> Result<Option<String>, ServiceError> {
        GetCategoryNameQuery { deal_id }.execute(&self.db).await
    }

    /// One merchant's deals with full pricing/schedule/location columns.
    #[instrument(skip(self))]
    pub async fn merchant_deals(
        &self,
        merchant_id: i64,
    ) -> Result<DealListing<MerchantDealRow>, ServiceError> {
        let rows = GetMerchantDealsQuery { merchant_id }.execute(&self.db).await?;
        self.fold_listing(rows).await
    }

    /// One merchant's keupoint-currency deals.
    #[instrument(skip(self))]
    pub async fn keupoint_deals(
        &self,
        merchant_id: i64,
    ) -> Result<Vec<KeupointDealRow>, ServiceError> {
        GetKeupointDealsQuery { merchant_id }.execute(&self.db).await
    }

    /// One merchant's gift deals.
    #[instrument(skip(self))]
    pub async fn gift_deals(&self, merchant_id: i64) -> Result<Vec<GiftDealRow>, ServiceError> {
        GetGiftDealsQuery { merchant_id }.execute(&self.db).await
    }

    /// Open, unexpired keupoint deals a customer can afford.
    #[instrument(skip(self))]
    pub async fn available_keupoint_deals(
        &self,
        keupoints: i64,
    ) -> Result<Vec<DealNameRow>, ServiceError> {
        GetAvailableKeupointDealsQuery {
            keupoints,
            now: self.clock.now_epoch(),
        }
        .execute(&self.db)
        .await
    }

    /// Full detail for one keupoint deal, including the selling company.
    #[instrument(skip(self))]
    pub async fn keupoint_deal(
        &self,
        deal_id: i64,
    ) -> Result<Option<KeupointDealDetailRow>, ServiceError> {
        GetKeupointDealDetailQuery { deal_id }.execute(&self.db).await
    }
}
