use async_trait::async_trait;
use futures::FutureExt;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::db::DatabaseAccess;
use crate::entities::deal_discount;
use crate::errors::ServiceError;

use super::Query;

/// The tier currently unlocked for a deal: the greatest threshold not
/// exceeding the cumulative purchase count. `None` below the lowest
/// threshold (or for deal types with no tier table).
#[derive(Debug, Serialize, Deserialize)]
pub struct GetCurrentTierQuery {
    pub deal_id: i64,
    pub cumulative_quantity: i64,
}

#[async_trait]
impl Query for GetCurrentTierQuery {
    type Result = Option<deal_discount::Model>;

    #[instrument(skip(self, db), fields(deal_id = %self.deal_id, cumulative_quantity = %self.cumulative_quantity))]
    async fn execute(&self, db: &DatabaseAccess) -> Result<Self::Result, ServiceError> {
        debug!("Executing GetCurrentTierQuery");

        let sql = r#"select dd.id, dd.deal_type_id, dd.quantity, dd.discount, dd.buy_value, dd.commission
                     from deal_discounts dd
                     join deals d on d.deal_type_id = dd.deal_type_id
                     where d.id = $1 and dd.quantity <= $2
                     order by dd.quantity desc
                     limit 1"#;

        db.query_one_raw(
            sql,
            vec![self.deal_id.into(), self.cumulative_quantity.into()],
        )
        .await
    }
}

/// Full tier table for one deal type, ordered by ascending threshold.
#[derive(Debug, Serialize, Deserialize)]
pub struct GetTierTableQuery {
    pub deal_type_id: i64,
}

#[async_trait]
impl Query for GetTierTableQuery {
    type Result = Vec<deal_discount::Model>;

    #[instrument(skip(self, db), fields(deal_type_id = %self.deal_type_id))]
    async fn execute(&self, db: &DatabaseAccess) -> Result<Self::Result, ServiceError> {
        debug!("Executing GetTierTableQuery");

        let deal_type_id = self.deal_type_id;
        db.execute("tier_table", move |conn| {
            deal_discount::Entity::find()
                .filter(deal_discount::Column::DealTypeId.eq(deal_type_id))
                .order_by_asc(deal_discount::Column::Quantity)
                .all(conn)
                .boxed()
        })
        .await
    }
}
