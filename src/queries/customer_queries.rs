use async_trait::async_trait;
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::db::DatabaseAccess;
use crate::entities::customer_deal;
use crate::errors::ServiceError;

use super::Query;

/// One line of a customer's purchase history.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize, Deserialize)]
pub struct PurchaseRecord {
    pub deal_name: String,
    pub purchase_date: i64,
    pub expiry_date: i64,
    pub deal_code: String,
    pub status: String,
}

/// Every purchase a customer has made, joined with the deal it bought.
#[derive(Debug, Serialize, Deserialize)]
pub struct GetPurchaseHistoryQuery {
    pub customer_id: i64,
}

#[async_trait]
impl Query for GetPurchaseHistoryQuery {
    type Result = Vec<PurchaseRecord>;

    #[instrument(skip(self, db), fields(customer_id = %self.customer_id))]
    async fn execute(&self, db: &DatabaseAccess) -> Result<Self::Result, ServiceError> {
        debug!("Executing GetPurchaseHistoryQuery");

        let sql = r#"select d.name as deal_name, cd.purchase_date, d.expiry_date, cd.deal_code, cd.status
                     from customer_deals cd
                     join deals d on d.id = cd.deal_id
                     where cd.customer_id = $1"#;

        db.query_all_raw(sql, vec![self.customer_id.into()]).await
    }
}

#[derive(Debug, FromQueryResult)]
struct CountRow {
    count: i64,
}

/// Number of a customer's purchases in one redemption state.
#[derive(Debug, Serialize, Deserialize)]
pub struct CountPurchasesByStatusQuery {
    pub customer_id: i64,
    pub status: String,
}

impl CountPurchasesByStatusQuery {
    pub fn available(customer_id: i64) -> Self {
        Self {
            customer_id,
            status: customer_deal::status::AVAILABLE.to_string(),
        }
    }

    pub fn used(customer_id: i64) -> Self {
        Self {
            customer_id,
            status: customer_deal::status::USED.to_string(),
        }
    }
}

#[async_trait]
impl Query for CountPurchasesByStatusQuery {
    type Result = i64;

    #[instrument(skip(self, db), fields(customer_id = %self.customer_id, status = %self.status))]
    async fn execute(&self, db: &DatabaseAccess) -> Result<Self::Result, ServiceError> {
        debug!("Executing CountPurchasesByStatusQuery");

        let sql = r#"select count(*) as count
                     from customer_deals
                     where customer_id = $1 and status = $2"#;

        let row: Option<CountRow> = db
            .query_one_raw(sql, vec![self.customer_id.into(), self.status.as_str().into()])
            .await?;
        Ok(row.map(|r| r.count).unwrap_or(0))
    }
}

/// Number of a customer's purchases whose deal has expired, regardless of
/// the purchase's own redemption state.
#[derive(Debug, Serialize, Deserialize)]
pub struct CountExpiredPurchasesQuery {
    pub customer_id: i64,
    /// Current time, seconds since epoch.
    pub now: i64,
}

#[async_trait]
impl Query for CountExpiredPurchasesQuery {
    type Result = i64;

    #[instrument(skip(self, db), fields(customer_id = %self.customer_id))]
    async fn execute(&self, db: &DatabaseAccess) -> Result<Self::Result, ServiceError> {
        debug!("Executing CountExpiredPurchasesQuery");

        let sql = r#"select count(*) as count
                     from customer_deals cd
                     join deals d on d.id = cd.deal_id
                     where cd.customer_id = $1 and d.expiry_date < $2"#;

        let row: Option<CountRow> = db
            .query_one_raw(sql, vec![self.customer_id.into(), self.now.into()])
            .await?;
        Ok(row.map(|r| r.count).unwrap_or(0))
    }
}
