//! Keupon marketplace data-access and reporting layer
//!
//! Read-only queries over the marketplace schema: deal discovery listings,
//! discount-tier resolution from cumulative purchase volume, merchant
//! accounting reports and customer purchase statistics. Invoked in-process
//! by a higher-level service layer; this crate owns no HTTP surface and
//! never writes to the store.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod clock;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod logging;
pub mod queries;
pub mod reports;
pub mod services;

use std::sync::Arc;

use slog::Logger;

use crate::clock::{Clock, SystemClock};
use crate::db::{DatabaseAccess, DbPool};
use crate::services::{CustomerService, DealService, DiscountService, ReportService};

/// The wired service facades, ready for a host application to embed.
#[derive(Clone)]
pub struct AppState {
    pub deals: DealService,
    pub discounts: DiscountService,
    pub customers: CustomerService,
    pub reports: ReportService,
}

impl AppState {
    /// Wires every service against the given pool with the system clock.
    pub fn new(pool: Arc<DbPool>, logger: Logger) -> Self {
        Self::with_clock(pool, Arc::new(SystemClock), logger)
    }

    /// Wires every service with an explicit clock; tests pin time here.
    pub fn with_clock(pool: Arc<DbPool>, clock: Arc<dyn Clock>, logger: Logger) -> Self {
        let db = DatabaseAccess::new(pool);
        let discounts = DiscountService::new(db.clone(), logger.clone());

        Self {
            deals: DealService::new(db.clone(), discounts.clone(), clock.clone(), logger.clone()),
            customers: CustomerService::new(db.clone(), clock, logger.clone()),
            reports: ReportService::new(db, discounts.clone(), logger),
            discounts,
        }
    }
}
