use slog::Logger;
use tracing::{info, instrument};

use crate::clock::parse_epoch;
use crate::db::DatabaseAccess;
use crate::errors::ServiceError;
use crate::queries::report_queries::GetAccountingRowsQuery;
use crate::queries::Query;
use crate::reports::{AccountingReport, AccountingRow};

use super::discounts::{compute_sales, DiscountService};

/// Merchant accounting reports.
#[derive(Clone)]
pub struct ReportService {
    db: DatabaseAccess,
    discounts: DiscountService,
    logger: Logger,
}

impl ReportService {
    pub fn new(db: DatabaseAccess, discounts: DiscountService, logger: Logger) -> Self {
        Self {
            db,
            discounts,
            logger,
        }
    }

    /// Accounting report over every deal.
    #[instrument(skip(self))]
    pub async fn accounting(&self) -> Result<AccountingReport, ServiceError> {
        self.build_report(None).await
    }

    /// Accounting report restricted to one merchant's deals.
    #[instrument(skip(self))]
    pub async fn accounting_for_merchant(
        &self,
        merchant_id: i64,
    ) -> Result<AccountingReport, ServiceError> {
        self.build_report(Some(merchant_id)).await
    }

    /// Joins each deal with its schedule and company, resolves the tier
    /// unlocked by its purchase count, and derives sales figures. A deal
    /// with no unlocked tier reports zeroes across the board.
    ///
    /// The base query and the per-deal tier lookups are independent reads;
    /// the report is not a transactional snapshot.
    async fn build_report(
        &self,
        merchant_id: Option<i64>,
    ) -> Result<AccountingReport, ServiceError> {
        let rows = GetAccountingRowsQuery { merchant_id }.execute(&self.db).await?;
        info!(deals = rows.len(), merchant_id = ?merchant_id, "Assembling accounting report");

        let mut report = AccountingReport::with_capacity(rows.len());
        for row in rows {
            let tier = self.discounts.resolve_tier(row.id, row.purchased).await?;

            let (discount, commission, sales, net_sales) = match tier {
                Some(tier) => {
                    let figures =
                        compute_sales(row.actual_price, row.purchased, tier.discount, tier.commission);
                    (tier.discount, tier.commission, figures.sales, figures.net_sales)
                }
                None => (0.0, 0.0, 0.0, 0.0),
            };

            report.insert(
                row.id.to_string(),
                AccountingRow {
                    expiry_date: row.expiry_date,
                    posting_date: parse_epoch(&row.posting_date),
                    closing_date: parse_epoch(&row.closing_date),
                    merchant_name: row.merchant_name,
                    title: row.title,
                    actual_price: row.actual_price,
                    purchased: row.purchased,
                    discount,
                    commission,
                    sales,
                    net_sales,
                },
            );
        }

        slog::debug!(self.logger, "accounting report assembled"; "rows" => report.len());

        Ok(report)
    }
}
