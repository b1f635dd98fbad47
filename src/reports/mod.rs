//! Typed report rows returned to callers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One line of the merchant accounting report.
///
/// A deal whose purchase count unlocks no discount tier reports zeroes for
/// discount, commission and both sales figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountingRow {
    pub expiry_date: i64,
    pub posting_date: i64,
    pub closing_date: i64,
    pub merchant_name: String,
    pub title: String,
    pub actual_price: f64,
    pub purchased: i64,
    /// Tier discount percent, 0-100 scale.
    pub discount: f64,
    /// Platform commission percent, 0-100 scale.
    pub commission: f64,
    /// `actual_price * purchased`
    pub sales: f64,
    /// `sales * (1 - discount/100) * (1 - commission/100)`
    pub net_sales: f64,
}

/// The accounting report, keyed by deal id rendered as a string.
pub type AccountingReport = HashMap<String, AccountingRow>;

/// Summary of one customer's purchase history.
///
/// The three counts come from independent queries; they are each consistent
/// with the moment their query ran, not with each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseStatistics {
    /// Purchases not yet redeemed.
    pub available: i64,
    /// Redeemed purchases.
    pub used: i64,
    /// Purchases whose deal has expired.
    pub expired: i64,
    /// Loyalty-currency balance; never computed here, always `None`.
    pub keupoints: Option<i64>,
    /// available + used + expired.
    pub total: i64,
}
