use crate::config::AppConfig;
use crate::errors::{AppError, ServiceError};
use anyhow::Context;
use futures::future::BoxFuture;
use metrics::{counter, gauge, histogram};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, DbErr,
    FromQueryResult, Statement, Value,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Type alias for a database connection pool
pub type DbPool = DatabaseConnection;

/// Configuration for database connection
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections
    pub max_connections: u32,
    /// Minimum number of connections
    pub min_connections: u32,
    /// Connection timeout duration
    pub connect_timeout: Duration,
    /// Idle timeout duration
    pub idle_timeout: Duration,
    /// Acquire connection timeout
    pub acquire_timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            acquire_timeout: Duration::from_secs(8),
        }
    }
}

/// Establishes a connection pool to the database
///
/// # Errors
/// Returns an `AppError` if the connection cannot be established
pub async fn establish_connection(database_url: &str) -> Result<DbPool, AppError> {
    let config = DbConfig {
        url: database_url.to_string(),
        ..Default::default()
    };

    establish_connection_with_config(&config).await
}

/// Establishes a connection pool to the database with custom configuration
pub async fn establish_connection_with_config(config: &DbConfig) -> Result<DbPool, AppError> {
    debug!("Configuring database connection with: {:?}", config);

    let mut opt = ConnectOptions::new(config.url.clone());

    opt.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(config.connect_timeout)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .sqlx_logging(true);

    gauge!("keupon_db.max_connections", config.max_connections as f64);

    info!(
        "Connecting to database with max_connections={}",
        config.max_connections
    );

    let db_pool = Database::connect(opt)
        .await
        .map_err(AppError::DatabaseError)
        .context("Database connection establishment failed")?;

    info!("Database connection pool established successfully");

    Ok(db_pool)
}

impl From<&AppConfig> for DbConfig {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            url: cfg.database_url.clone(),
            max_connections: cfg.db_max_connections,
            min_connections: cfg.db_min_connections,
            connect_timeout: Duration::from_secs(cfg.db_connect_timeout_secs),
            idle_timeout: Duration::from_secs(cfg.db_idle_timeout_secs),
            acquire_timeout: Duration::from_secs(cfg.db_acquire_timeout_secs),
        }
    }
}

/// Establish DB pool using AppConfig tuning
pub async fn establish_connection_from_app_config(cfg: &AppConfig) -> Result<DbPool, AppError> {
    let db_cfg: DbConfig = cfg.into();
    establish_connection_with_config(&db_cfg).await
}

/// Database access wrapper with built-in metrics and error handling.
///
/// All listing and report queries go through the raw-SQL helpers below with
/// bind parameters; identifiers and timestamps are never interpolated into
/// the SQL text.
#[derive(Debug, Clone)]
pub struct DatabaseAccess {
    pool: Arc<DbPool>,
}

impl DatabaseAccess {
    /// Create a new database access instance
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    /// Get a reference to the connection pool
    pub fn get_pool(&self) -> &DbPool {
        &self.pool
    }

    /// Execute parameterized SQL expecting at most one row.
    ///
    /// An empty result is `Ok(None)`, not an error; "no matching row" is a
    /// domain outcome for every caller in this crate.
    pub async fn query_one_raw<T>(
        &self,
        sql: &str,
        params: Vec<Value>,
    ) -> Result<Option<T>, ServiceError>
    where
        T: FromQueryResult + Send + Sync,
    {
        let db = &*self.pool;
        let start = std::time::Instant::now();
        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, params);

        debug!("Executing SQL query: {:?}", stmt);

        let row = db.query_one(stmt).await.map_err(|e| {
            error!("Database error executing raw SQL: {}", e);
            counter!("keupon_db.query.error", 1);
            ServiceError::DatabaseError(e)
        })?;

        let elapsed = start.elapsed();
        histogram!("keupon_db.query.duration", elapsed);
        debug!("Raw SQL query completed in {:?}", elapsed);

        row.map(|r| T::from_query_result(&r, ""))
            .transpose()
            .map_err(|e| {
                error!("Failed to convert query result: {}", e);
                ServiceError::DatabaseError(e)
            })
    }

    /// Execute parameterized SQL returning all rows in query order.
    pub async fn query_all_raw<T>(
        &self,
        sql: &str,
        params: Vec<Value>,
    ) -> Result<Vec<T>, ServiceError>
    where
        T: FromQueryResult + Send + Sync,
    {
        let db = &*self.pool;
        let start = std::time::Instant::now();
        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, params);

        debug!("Executing SQL query: {:?}", stmt);

        let rows = db.query_all(stmt).await.map_err(|e| {
            error!("Database error executing raw SQL: {}", e);
            counter!("keupon_db.query.error", 1);
            ServiceError::DatabaseError(e)
        })?;

        let elapsed = start.elapsed();
        histogram!("keupon_db.query.duration", elapsed);
        debug!("Raw SQL query returned {} rows in {:?}", rows.len(), elapsed);

        rows.iter()
            .map(|r| T::from_query_result(r, ""))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                error!("Failed to convert query result: {}", e);
                ServiceError::DatabaseError(e)
            })
    }

    /// Execute query with metrics and logging
    ///
    /// The closure's future may borrow the connection, so call sites box it
    /// (`.boxed()` from `futures::FutureExt`).
    pub async fn execute<F, T>(&self, operation: &str, f: F) -> Result<T, ServiceError>
    where
        F: for<'a> FnOnce(&'a DbPool) -> BoxFuture<'a, Result<T, DbErr>> + Send,
        T: Send + 'static,
    {
        let db = &*self.pool;
        let start = std::time::Instant::now();

        debug!(operation = %operation, "Starting database operation");

        let result = f(db).await.map_err(|e| {
            error!(operation = %operation, error = %e, "Database operation failed");
            counter!("keupon_db.operation.error", 1, "operation" => operation.to_string());
            ServiceError::DatabaseError(e)
        });

        let elapsed = start.elapsed();
        histogram!("keupon_db.operation.duration", elapsed, "operation" => operation.to_string());

        if result.is_ok() {
            debug!(operation = %operation, duration = ?elapsed, "Database operation completed successfully");
        }

        result
    }
}

/// Checks if the database connection is active
pub async fn check_connection(pool: &DbPool) -> Result<(), AppError> {
    debug!("Checking database connection");
    let start = std::time::Instant::now();

    let result = pool.ping().await.map_err(AppError::DatabaseError);

    let elapsed = start.elapsed();
    match &result {
        Ok(_) => {
            debug!("Database connection check successful in {:?}", elapsed);
            gauge!("keupon_db.connection_latency", elapsed.as_millis() as f64);
        }
        Err(e) => {
            error!(
                "Database connection check failed after {:?}: {}",
                elapsed, e
            );
            counter!("keupon_db.connection_failures", 1);
        }
    }

    result
}

/// Closes the database connection pool
pub async fn close_pool(pool: DbPool) -> Result<(), AppError> {
    info!("Closing database connection pool");

    pool.close().await.map_err(AppError::DatabaseError)
}
