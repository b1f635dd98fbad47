use async_trait::async_trait;
use futures::FutureExt;
use sea_orm::{ColumnTrait, EntityTrait, FromQueryResult, QueryFilter, QuerySelect};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::db::DatabaseAccess;
use crate::entities::{deal, deal_schedule};
use crate::errors::ServiceError;

use super::{Query, PURCHASE_COUNT};

/// Common view of a listing row: the listing fold needs the deal id and the
/// aggregated purchase count regardless of which columns the listing carries.
pub trait DealSummaryRow {
    fn deal_id(&self) -> i64;
    fn purchase_count(&self) -> i64;
}

macro_rules! impl_deal_summary_row {
    ($($row:ty),+ $(,)?) => {
        $(impl DealSummaryRow for $row {
            fn deal_id(&self) -> i64 {
                self.id
            }
            fn purchase_count(&self) -> i64 {
                self.no_of_customers
            }
        })+
    };
}

/// Row for the public "hot deals" listing.
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize, Deserialize)]
pub struct HotDealRow {
    pub id: i64,
    pub name: String,
    pub no_of_customers: i64,
    pub discount: f64,
    pub actual_value: f64,
    pub save_amount: f64,
}

/// Row for open-deal listings that carry schedule and location columns.
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize, Deserialize)]
pub struct OpenDealRow {
    pub id: i64,
    pub name: String,
    pub status: String,
    pub actual_value: f64,
    pub end_time: String,
    pub no_of_customers: i64,
    pub address1: String,
    pub address2: Option<String>,
    pub city: String,
    pub state: String,
    pub zipcode: String,
    pub discount: f64,
    pub save_amount: f64,
}

/// Row for the unfiltered admin listing; adds flags and both schedule ends.
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize, Deserialize)]
pub struct AdminDealRow {
    pub id: i64,
    pub activated: bool,
    pub name: String,
    pub status: String,
    pub actual_value: f64,
    pub start_time: String,
    pub end_time: String,
    pub no_of_customers: i64,
    pub address1: String,
    pub address2: Option<String>,
    pub city: String,
    pub state: String,
    pub zipcode: String,
    pub discount: f64,
    pub save_amount: f64,
    pub preferred: bool,
    pub admin_preferred: bool,
}

/// Row for the non-preferred open listing (no location join).
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize, Deserialize)]
pub struct OpenSummaryRow {
    pub id: i64,
    pub name: String,
    pub actual_value: f64,
    pub end_time: String,
    pub no_of_customers: i64,
    pub discount: f64,
    pub save_amount: f64,
}

/// Row for a merchant's dashboard listing.
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize, Deserialize)]
pub struct MerchantDealRow {
    pub id: i64,
    pub discount: f64,
    pub actual_value: f64,
    pub save_amount: f64,
    pub name: String,
    pub buy: f64,
    pub status: String,
    pub start_time: String,
    pub end_time: String,
    pub expiry_date: i64,
    pub no_of_customers: i64,
    pub address1: String,
    pub address2: Option<String>,
    pub city: String,
    pub state: String,
    pub zipcode: String,
}

impl_deal_summary_row!(HotDealRow, OpenDealRow, AdminDealRow, OpenSummaryRow, MerchantDealRow);

/// Today's single hottest deal, before the tier override.
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize, Deserialize)]
pub struct HottestDealRow {
    pub id: i64,
    pub name: String,
    pub no_of_customers: i64,
    pub discount: f64,
    pub buy: f64,
}

/// Keupoint-currency deals of one merchant (deal type 4).
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize, Deserialize)]
pub struct KeupointDealRow {
    pub id: i64,
    pub name: String,
    pub buy: f64,
    pub value: f64,
    pub discount: f64,
    pub status: String,
    pub expiry_date: i64,
    pub no_of_customers: i64,
    pub keupoints_required: Option<i64>,
}

/// Gift deals of one merchant (deal type 5).
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize, Deserialize)]
pub struct GiftDealRow {
    pub id: i64,
    pub name: String,
    pub buy: f64,
    pub value: f64,
    pub discount: f64,
    pub status: String,
    pub expiry_date: i64,
    pub no_of_customers: i64,
}

/// Minimal id/name pair for the keupoint-budget listing.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize, Deserialize)]
pub struct DealNameRow {
    pub id: i64,
    pub name: String,
}

/// Single-deal detail joined with the merchant's company identity.
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize, Deserialize)]
pub struct KeupointDealDetailRow {
    pub id: i64,
    pub start_date: i64,
    pub expiry_date: i64,
    pub address1: String,
    pub address2: Option<String>,
    pub city: String,
    pub zipcode: String,
    pub name: String,
    pub rules: Option<String>,
    pub highlights: Option<String>,
    pub buy: f64,
    pub discount: f64,
    pub save_amount: f64,
    pub company_id: i64,
    pub company_name: String,
    pub website: Option<String>,
}

/// A deal scheduled to start exactly at the beginning of the current day,
/// with its closing time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodaysDeal {
    pub deal: deal::Model,
    pub end_time: String,
}

/// Public "hot deals": open, merchant-preferred and admin-preferred, ordered
/// by descending purchase count.
#[derive(Debug, Serialize, Deserialize)]
pub struct GetHotDealsQuery;

#[async_trait]
impl Query for GetHotDealsQuery {
    type Result = Vec<HotDealRow>;

    #[instrument(skip(self, db))]
    async fn execute(&self, db: &DatabaseAccess) -> Result<Self::Result, ServiceError> {
        debug!("Executing GetHotDealsQuery");

        let sql = format!(
            r#"select d.id, d.name, {PURCHASE_COUNT} as no_of_customers, d.discount, d.value as actual_value, d.save_amount
               from deals d
               join deal_schedules ds on ds.deal_id = d.id
               left outer join customer_deals cd on cd.deal_id = d.id
               where d.status = $1 and d.preferred = true and d.admin_preferred = true
               group by d.id
               order by no_of_customers desc"#
        );

        db.query_all_raw(&sql, vec![deal::status::OPEN.into()]).await
    }
}

/// Today's single hottest deal: the hot-deals filter limited to one row.
#[derive(Debug, Serialize, Deserialize)]
pub struct GetHottestDealQuery;

#[async_trait]
impl Query for GetHottestDealQuery {
    type Result = Option<HottestDealRow>;

    #[instrument(skip(self, db))]
    async fn execute(&self, db: &DatabaseAccess) -> Result<Self::Result, ServiceError> {
        debug!("Executing GetHottestDealQuery");

        let sql = format!(
            r#"select d.id, d.name, {PURCHASE_COUNT} as no_of_customers, d.discount, d.buy
               from deals d
               left outer join customer_deals cd on cd.deal_id = d.id
               where d.status = $1 and d.preferred = true and d.admin_preferred = true
               group by d.id
               order by no_of_customers desc limit 1"#
        );

        db.query_one_raw(&sql, vec![deal::status::OPEN.into()]).await
    }
}

/// Open deals with schedule and location, ordered by schedule start.
/// `limit` trims the listing to a "current/upcoming" slice when set.
#[derive(Debug, Serialize, Deserialize)]
pub struct GetOpenDealListingQuery {
    pub limit: Option<u64>,
}

#[async_trait]
impl Query for GetOpenDealListingQuery {
    type Result = Vec<OpenDealRow>;

    #[instrument(skip(self, db), fields(limit = ?self.limit))]
    async fn execute(&self, db: &DatabaseAccess) -> Result<Self::Result, ServiceError> {
        debug!("Executing GetOpenDealListingQuery");

        let limit_clause = match self.limit {
            Some(_) => " limit $2",
            None => "",
        };
        let sql = format!(
            r#"select d.id, d.name, d.status, d.value as actual_value, ds.end_time, {PURCHASE_COUNT} as no_of_customers, dld.address1, dld.address2, dld.city, dld.state, dld.zipcode, d.discount, d.save_amount
               from deals d
               join deal_schedules ds on ds.deal_id = d.id
               join deal_location_details dld on dld.deal_id = d.id
               left outer join customer_deals cd on cd.deal_id = d.id
               where d.status = $1
               group by d.id, ds.id, dld.id
               order by ds.start_time{limit_clause}"#
        );

        let mut params = vec![sea_orm::Value::from(deal::status::OPEN)];
        if let Some(limit) = self.limit {
            params.push((limit as i64).into());
        }

        db.query_all_raw(&sql, params).await
    }
}

/// Every deal regardless of status, with flags, for the admin listing.
#[derive(Debug, Serialize, Deserialize)]
pub struct GetAllDealsQuery;

#[async_trait]
impl Query for GetAllDealsQuery {
    type Result = Vec<AdminDealRow>;

    #[instrument(skip(self, db))]
    async fn execute(&self, db: &DatabaseAccess) -> Result<Self::Result, ServiceError> {
        debug!("Executing GetAllDealsQuery");

        let sql = format!(
            r#"select d.id, d.activated, d.name, d.status, d.value as actual_value, ds.start_time, ds.end_time, {PURCHASE_COUNT} as no_of_customers, dld.address1, dld.address2, dld.city, dld.state, dld.zipcode, d.discount, d.save_amount, d.preferred, d.admin_preferred
               from deals d
               join deal_schedules ds on ds.deal_id = d.id
               join deal_location_details dld on dld.deal_id = d.id
               left outer join customer_deals cd on cd.deal_id = d.id
               group by d.id, ds.id, dld.id
               order by ds.start_time"#
        );

        db.query_all_raw(&sql, vec![]).await
    }
}

/// Open deals that are not admin-preferred (the rotation below the featured
/// slot). No location join.
#[derive(Debug, Serialize, Deserialize)]
pub struct GetOpenDealsQuery;

#[async_trait]
impl Query for GetOpenDealsQuery {
    type Result = Vec<OpenSummaryRow>;

    #[instrument(skip(self, db))]
    async fn execute(&self, db: &DatabaseAccess) -> Result<Self::Result, ServiceError> {
        debug!("Executing GetOpenDealsQuery");

        let sql = format!(
            r#"select d.id, d.name, d.value as actual_value, ds.end_time, {PURCHASE_COUNT} as no_of_customers, d.discount, d.save_amount
               from deals d
               join deal_schedules ds on ds.deal_id = d.id
               left outer join customer_deals cd on cd.deal_id = d.id
               where d.status = $1 and d.admin_preferred = false
               group by d.id, ds.id
               order by ds.start_time"#
        );

        db.query_all_raw(&sql, vec![deal::status::OPEN.into()]).await
    }
}

/// Ids of deals that have tipped (closed successfully).
#[derive(Debug, Serialize, Deserialize)]
pub struct GetRecentlyTippedDealIdsQuery;

#[async_trait]
impl Query for GetRecentlyTippedDealIdsQuery {
    type Result = Vec<i64>;

    #[instrument(skip(self, db))]
    async fn execute(&self, db: &DatabaseAccess) -> Result<Self::Result, ServiceError> {
        debug!("Executing GetRecentlyTippedDealIdsQuery");

        db.execute("recently_tipped_deal_ids", |conn| {
            deal::Entity::find()
                .select_only()
                .column(deal::Column::Id)
                .filter(deal::Column::Status.eq(deal::status::TIPPED))
                .into_tuple::<i64>()
                .all(conn)
                .boxed()
        })
        .await
    }
}

/// The deal whose schedule starts exactly at the given day boundary.
///
/// Yields `None` when nothing is scheduled for today; an empty marketplace
/// day is not an error.
#[derive(Debug, Serialize, Deserialize)]
pub struct GetTodaysDealQuery {
    /// Epoch second of the start of the current day.
    pub day_start: i64,
}

#[async_trait]
impl Query for GetTodaysDealQuery {
    type Result = Option<TodaysDeal>;

    #[instrument(skip(self, db), fields(day_start = %self.day_start))]
    async fn execute(&self, db: &DatabaseAccess) -> Result<Self::Result, ServiceError> {
        debug!("Executing GetTodaysDealQuery");

        // The legacy schema stores schedule times as epoch-second strings.
        let day_start = self.day_start.to_string();

        let schedule = db
            .execute("todays_deal_schedule", move |conn| {
                deal_schedule::Entity::find()
                    .filter(deal_schedule::Column::StartTime.eq(day_start))
                    .one(conn)
                    .boxed()
            })
            .await?;

        let Some(schedule) = schedule else {
            return Ok(None);
        };

        let deal_id = schedule.deal_id;
        let deal = db
            .execute("todays_deal", move |conn| {
                deal::Entity::find_by_id(deal_id).one(conn).boxed()
            })
            .await?;

        Ok(deal.map(|deal| TodaysDeal {
            deal,
            end_time: schedule.end_time,
        }))
    }
}

/// Deals whose schedule started before the given day boundary.
#[derive(Debug, Serialize, Deserialize)]
pub struct GetRecentDealsQuery {
    /// Epoch second of the start of the current day.
    pub day_start: i64,
}

#[async_trait]
impl Query for GetRecentDealsQuery {
    type Result = Vec<deal::Model>;

    #[instrument(skip(self, db), fields(day_start = %self.day_start))]
    async fn execute(&self, db: &DatabaseAccess) -> Result<Self::Result, ServiceError> {
        debug!("Executing GetRecentDealsQuery");

        let day_start = self.day_start.to_string();

        let schedules = db
            .execute("recent_deal_schedules", move |conn| {
                deal_schedule::Entity::find()
                    .filter(deal_schedule::Column::StartTime.lt(day_start))
                    .all(conn)
                    .boxed()
            })
            .await?;

        if schedules.is_empty() {
            return Ok(Vec::new());
        }

        let deal_ids: Vec<i64> = schedules.iter().map(|s| s.deal_id).collect();

        db.execute("recent_deals", move |conn| {
            deal::Entity::find()
                .filter(deal::Column::Id.is_in(deal_ids))
                .all(conn)
                .boxed()
        })
        .await
    }
}

/// "Category(SubCategory)" display string for one deal.
#[derive(Debug, Serialize, Deserialize)]
pub struct GetCategoryNameQuery {
    pub deal_id: i64,
}

#[derive(Debug, FromQueryResult)]
struct CategoryRow {
    category: String,
}

#[async_trait]
impl Query for GetCategoryNameQuery {
    type Result = Option<String>;

    #[instrument(skip(self, db), fields(deal_id = %self.deal_id))]
    async fn execute(&self, db: &DatabaseAccess) -> Result<Self::Result, ServiceError> {
        debug!("Executing GetCategoryNameQuery");

        let sql = r#"select concat(dc.name, '(', dsc.name, ')') as category
                     from deals d
                     join deal_sub_categories dsc on d.deal_sub_category_id = dsc.id
                     join deal_categories dc on dc.id = dsc.deal_category_id
                     where d.id = $1"#;

        let row: Option<CategoryRow> = db.query_one_raw(sql, vec![self.deal_id.into()]).await?;
        Ok(row.map(|r| r.category))
    }
}

/// All deals of one merchant, with full pricing/schedule/location columns.
#[derive(Debug, Serialize, Deserialize)]
pub struct GetMerchantDealsQuery {
    pub merchant_id: i64,
}

#[async_trait]
impl Query for GetMerchantDealsQuery {
    type Result = Vec<MerchantDealRow>;

    #[instrument(skip(self, db), fields(merchant_id = %self.merchant_id))]
    async fn execute(&self, db: &DatabaseAccess) -> Result<Self::Result, ServiceError> {
        debug!("Executing GetMerchantDealsQuery");

        let sql = format!(
            r#"select d.id, d.discount, d.value as actual_value, d.save_amount, d.name, d.buy, d.status, ds.start_time, ds.end_time, d.expiry_date, {PURCHASE_COUNT} as no_of_customers, dld.address1, dld.address2, dld.city, dld.state, dld.zipcode
               from merchants m
               join deals d on d.merchant_id = m.id
               join deal_types dt on dt.id = d.deal_type_id
               join deal_schedules ds on ds.deal_id = d.id
               join deal_location_details dld on dld.deal_id = d.id
               left outer join customer_deals cd on cd.deal_id = d.id
               where d.merchant_id = $1
               group by d.id, ds.id, dld.id
               order by ds.start_time"#
        );

        db.query_all_raw(&sql, vec![self.merchant_id.into()]).await
    }
}

/// A merchant's keupoint-currency deals (deal type 4).
#[derive(Debug, Serialize, Deserialize)]
pub struct GetKeupointDealsQuery {
    pub merchant_id: i64,
}

#[async_trait]
impl Query for GetKeupointDealsQuery {
    type Result = Vec<KeupointDealRow>;

    #[instrument(skip(self, db), fields(merchant_id = %self.merchant_id))]
    async fn execute(&self, db: &DatabaseAccess) -> Result<Self::Result, ServiceError> {
        debug!("Executing GetKeupointDealsQuery");

        let sql = format!(
            r#"select d.id, d.name, d.buy, d.value, d.discount, d.status, d.expiry_date, {PURCHASE_COUNT} as no_of_customers, d.keupoints_required
               from merchants m
               join deals d on d.merchant_id = m.id
               left outer join customer_deals cd on cd.deal_id = d.id
               where d.merchant_id = $1 and d.deal_type_id = $2
               group by d.id"#
        );

        db.query_all_raw(
            &sql,
            vec![self.merchant_id.into(), deal::deal_type_id::KEUPOINT.into()],
        )
        .await
    }
}

/// A merchant's gift deals (deal type 5).
#[derive(Debug, Serialize, Deserialize)]
pub struct GetGiftDealsQuery {
    pub merchant_id: i64,
}

#[async_trait]
impl Query for GetGiftDealsQuery {
    type Result = Vec<GiftDealRow>;

    #[instrument(skip(self, db), fields(merchant_id = %self.merchant_id))]
    async fn execute(&self, db: &DatabaseAccess) -> Result<Self::Result, ServiceError> {
        debug!("Executing GetGiftDealsQuery");

        let sql = format!(
            r#"select d.id, d.name, d.buy, d.value, d.discount, d.status, d.expiry_date, {PURCHASE_COUNT} as no_of_customers
               from merchants m
               join deals d on d.merchant_id = m.id
               left outer join customer_deals cd on cd.deal_id = d.id
               where d.merchant_id = $1 and d.deal_type_id = $2
               group by d.id"#
        );

        db.query_all_raw(
            &sql,
            vec![self.merchant_id.into(), deal::deal_type_id::GIFT.into()],
        )
        .await
    }
}

/// Open, unexpired keupoint deals affordable within a customer's budget.
#[derive(Debug, Serialize, Deserialize)]
pub struct GetAvailableKeupointDealsQuery {
    pub keupoints: i64,
    /// Current time, seconds since epoch.
    pub now: i64,
}

#[async_trait]
impl Query for GetAvailableKeupointDealsQuery {
    type Result = Vec<DealNameRow>;

    #[instrument(skip(self, db), fields(keupoints = %self.keupoints))]
    async fn execute(&self, db: &DatabaseAccess) -> Result<Self::Result, ServiceError> {
        debug!("Executing GetAvailableKeupointDealsQuery");

        let sql = r#"select d.id, d.name
                     from deals d
                     where d.deal_type_id = $1 and d.keupoints_required <= $2 and d.status = $3 and d.expiry_date > $4"#;

        db.query_all_raw(
            sql,
            vec![
                deal::deal_type_id::KEUPOINT.into(),
                self.keupoints.into(),
                deal::status::OPEN.into(),
                self.now.into(),
            ],
        )
        .await
    }
}

/// Full detail for one keupoint deal, including the selling company.
#[derive(Debug, Serialize, Deserialize)]
pub struct GetKeupointDealDetailQuery {
    pub deal_id: i64,
}

#[async_trait]
impl Query for GetKeupointDealDetailQuery {
    type Result = Option<KeupointDealDetailRow>;

    #[instrument(skip(self, db), fields(deal_id = %self.deal_id))]
    async fn execute(&self, db: &DatabaseAccess) -> Result<Self::Result, ServiceError> {
        debug!("Executing GetKeupointDealDetailQuery");

        let sql = r#"select d.id, d.start_date, d.expiry_date, c.address1, c.address2, c.city, c.zipcode, d.name, d.rules, d.highlights, d.buy, d.discount, d.save_amount, c.id as company_id, c.name as company_name, c.website
                     from deals d
                     join merchant_profiles mp on mp.merchant_id = d.merchant_id
                     join companies c on c.merchant_profile_id = mp.id
                     where d.id = $1"#;

        db.query_one_raw(sql, vec![self.deal_id.into()]).await
    }
}
