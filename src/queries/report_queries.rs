use async_trait::async_trait;
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::db::DatabaseAccess;
use crate::errors::ServiceError;

use super::{Query, PURCHASE_COUNT};

/// Pre-tier accounting row: one per deal, joined with schedule and the
/// selling company, purchase count zero-filled. Discount, commission and
/// sales figures are derived afterwards by the report assembly.
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize, Deserialize)]
pub struct AccountingSourceRow {
    pub id: i64,
    pub expiry_date: i64,
    /// Schedule start, epoch seconds as a string (legacy schema).
    pub posting_date: String,
    /// Schedule end, epoch seconds as a string (legacy schema).
    pub closing_date: String,
    pub merchant_name: String,
    pub title: String,
    pub actual_price: f64,
    pub purchased: i64,
}

/// Accounting base rows for every deal, or one merchant's deals when scoped.
///
/// Deals without a schedule or company row are silently excluded by the
/// inner joins.
#[derive(Debug, Serialize, Deserialize)]
pub struct GetAccountingRowsQuery {
    pub merchant_id: Option<i64>,
}

#[async_trait]
impl Query for GetAccountingRowsQuery {
    type Result = Vec<AccountingSourceRow>;

    #[instrument(skip(self, db), fields(merchant_id = ?self.merchant_id))]
    async fn execute(&self, db: &DatabaseAccess) -> Result<Self::Result, ServiceError> {
        debug!("Executing GetAccountingRowsQuery");

        let merchant_filter = match self.merchant_id {
            Some(_) => " where d.merchant_id = $1",
            None => "",
        };
        let sql = format!(
            r#"select d.id, d.expiry_date, ds.start_time as posting_date, ds.end_time as closing_date, c.name as merchant_name, d.name as title, d.value as actual_price, {PURCHASE_COUNT} as purchased
               from deals d
               join deal_schedules ds on ds.deal_id = d.id
               join merchant_profiles mp on mp.merchant_id = d.merchant_id
               join companies c on c.merchant_profile_id = mp.id
               left outer join customer_deals cd on cd.deal_id = d.id{merchant_filter}
               group by d.id, ds.id, c.id"#
        );

        let params = match self.merchant_id {
            Some(merchant_id) => vec![merchant_id.into()],
            None => vec![],
        };

        db.query_all_raw(&sql, params).await
    }
}
