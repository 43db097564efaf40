//! PostgreSQL access for bill-service.

use crate::models::Bill;
use crate::services::metrics::record_db_query;
use crate::services::query::{BillQuery, BindValue, QueryMode};
use crate::services::store::BillStore;
use async_trait::async_trait;
use service_core::error::AppError;
use sqlx::postgres::{PgArguments, PgPool, PgPoolOptions};
use sqlx::Arguments;
use std::time::{Duration, Instant};
use tracing::{info, instrument};

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "bill-service"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }
}

/// Bind parameters in placeholder order.
fn arguments(params: &[BindValue]) -> Result<PgArguments, AppError> {
    let mut args = PgArguments::default();
    for param in params {
        let added = match param {
            BindValue::Text(v) => args.add(v.clone()),
            BindValue::TextArray(v) => args.add(v.clone()),
            BindValue::Date(v) => args.add(*v),
            BindValue::Int(v) => args.add(*v),
        };
        added.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to bind parameter: {}", e))
        })?;
    }
    Ok(args)
}

fn expect_mode(query: &BillQuery, mode: QueryMode) -> Result<(), AppError> {
    if query.mode != mode {
        return Err(AppError::InternalError(anyhow::anyhow!(
            "Expected a {:?} query, got {:?}",
            mode,
            query.mode
        )));
    }
    Ok(())
}

#[async_trait]
impl BillStore for Database {
    #[instrument(skip(self, query), fields(params = query.params.len()))]
    async fn count_bills(&self, query: &BillQuery) -> Result<i64, AppError> {
        expect_mode(query, QueryMode::Count)?;
        let started = Instant::now();

        let total = sqlx::query_scalar_with::<_, i64, _>(&query.sql, arguments(&query.params)?)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to count bills: {}", e))
            })?;

        record_db_query("count_bills", started.elapsed().as_secs_f64());
        Ok(total)
    }

    #[instrument(skip(self, query), fields(params = query.params.len()))]
    async fn fetch_bills(&self, query: &BillQuery) -> Result<Vec<Bill>, AppError> {
        expect_mode(query, QueryMode::Data)?;
        let started = Instant::now();

        let bills = sqlx::query_as_with::<_, Bill, _>(&query.sql, arguments(&query.params)?)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to list bills: {}", e))
            })?;

        record_db_query("fetch_bills", started.elapsed().as_secs_f64());
        Ok(bills)
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), AppError> {
        let started = Instant::now();

        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;

        record_db_query("health_check", started.elapsed().as_secs_f64());
        Ok(())
    }
}
