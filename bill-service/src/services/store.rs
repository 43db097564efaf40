//! Data-access seam for the bill list.

use crate::models::Bill;
use crate::services::query::BillQuery;
use async_trait::async_trait;
use service_core::error::AppError;

/// Executes rendered bill queries.
///
/// Implementations report failures as errors; what a failure means for the
/// caller is decided by [`BillListService`](crate::services::BillListService).
#[async_trait]
pub trait BillStore: Send + Sync {
    /// Run a count-mode query and return the total.
    async fn count_bills(&self, query: &BillQuery) -> Result<i64, AppError>;

    /// Run a data-mode query and return the page of bills.
    async fn fetch_bills(&self, query: &BillQuery) -> Result<Vec<Bill>, AppError>;

    /// Check the backing store is reachable.
    async fn health_check(&self) -> Result<(), AppError>;
}
