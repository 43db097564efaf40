//! Bill list orchestration: count, fetch, and decide the envelope.

use crate::dtos::BillListResponse;
use crate::middleware::CallerContext;
use crate::models::{Bill, BillFilter};
use crate::services::metrics::{record_error, record_list_outcome};
use crate::services::query::{build_query, QueryMode, QueryOptions};
use crate::services::store::BillStore;
use service_core::error::AppError;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// How the list endpoint treats data-access failures and query shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListPolicy {
    /// Report a failed count as 0 and a failed fetch as an empty page
    /// instead of failing the request.
    pub mask_db_errors: bool,
    /// Count approver rows including drafts (historical behaviour).
    pub legacy_approver_count: bool,
    /// Issue the count and data queries concurrently.
    pub concurrent_queries: bool,
}

impl Default for ListPolicy {
    fn default() -> Self {
        Self {
            mask_db_errors: true,
            legacy_approver_count: false,
            concurrent_queries: false,
        }
    }
}

impl ListPolicy {
    fn query_options(&self) -> QueryOptions {
        QueryOptions {
            legacy_approver_count: self.legacy_approver_count,
        }
    }
}

/// Serves `POST /api/v1/bill/list`.
#[derive(Clone)]
pub struct BillListService {
    store: Arc<dyn BillStore>,
    policy: ListPolicy,
}

impl BillListService {
    pub fn new(store: Arc<dyn BillStore>, policy: ListPolicy) -> Self {
        Self { store, policy }
    }

    /// Count matching bills, fetch the requested page, and build the envelope.
    ///
    /// The page is fetched even when the count is zero.
    #[instrument(
        skip(self, caller, filter),
        fields(tenant_id = %caller.tenant_id, login_id = %caller.login_id, role = %caller.role)
    )]
    pub async fn list(
        &self,
        caller: &CallerContext,
        filter: &BillFilter,
    ) -> Result<BillListResponse, AppError> {
        let options = self.policy.query_options();
        let count_query = build_query(filter, caller, QueryMode::Count, options);
        let data_query = build_query(filter, caller, QueryMode::Data, options);

        let (count, data) = if self.policy.concurrent_queries {
            tokio::join!(
                self.store.count_bills(&count_query),
                self.store.fetch_bills(&data_query)
            )
        } else {
            let count = self.store.count_bills(&count_query).await;
            let data = self.store.fetch_bills(&data_query).await;
            (count, data)
        };

        let count = self.settle_count(caller, count)?;
        let data = self.settle_data(caller, data)?;

        if count == 0 {
            warn!(
                "[{}/{}] - no bill list found",
                caller.tenant_id, caller.login_id
            );
            record_list_outcome("empty");
            return Ok(BillListResponse::no_data());
        }

        info!(
            "[{}/{}] - {} bill list found",
            caller.tenant_id, caller.login_id, count
        );
        record_list_outcome("found");
        Ok(BillListResponse::success(count, data))
    }

    fn settle_count(
        &self,
        caller: &CallerContext,
        result: Result<i64, AppError>,
    ) -> Result<i64, AppError> {
        match result {
            Ok(count) => Ok(count),
            Err(e) => {
                error!(
                    tenant_id = %caller.tenant_id,
                    login_id = %caller.login_id,
                    error = %e,
                    "An exception occurred while getting bill list count"
                );
                record_error("count");
                if self.policy.mask_db_errors {
                    Ok(0)
                } else {
                    record_list_outcome("failed");
                    Err(e)
                }
            }
        }
    }

    fn settle_data(
        &self,
        caller: &CallerContext,
        result: Result<Vec<Bill>, AppError>,
    ) -> Result<Vec<Bill>, AppError> {
        match result {
            Ok(bills) => Ok(bills),
            Err(e) => {
                error!(
                    tenant_id = %caller.tenant_id,
                    login_id = %caller.login_id,
                    error = %e,
                    "An exception occurred while getting bill list"
                );
                record_error("fetch");
                if self.policy.mask_db_errors {
                    Ok(Vec::new())
                } else {
                    record_list_outcome("failed");
                    Err(e)
                }
            }
        }
    }
}
