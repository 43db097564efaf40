//! Application startup and lifecycle management.

use crate::config::BillConfig;
use crate::handlers;
use crate::services::{BillListService, BillStore, Database, ListPolicy};
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::metrics::metrics_middleware;
use service_core::middleware::tracing::{http_trace_layer, request_id_middleware};
use service_core::observability::init_metrics;
use std::sync::Arc;
use tokio::net::TcpListener;

pub const BILL_LIST_PATH: &str = "/api/v1/bill/list";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub service_name: String,
    pub store: Arc<dyn BillStore>,
    pub bill_list: Arc<BillListService>,
}

impl AppState {
    pub fn new(service_name: impl Into<String>, store: Arc<dyn BillStore>, policy: ListPolicy) -> Self {
        let bill_list = Arc::new(BillListService::new(store.clone(), policy));
        Self {
            service_name: service_name.into(),
            store,
            bill_list,
        }
    }
}

/// Routes plus the request-id, metrics and trace layers.
pub fn build_router(state: AppState) -> Router {
    init_metrics();

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_handler))
        .route(BILL_LIST_PATH, post(handlers::list_bills))
        .layer(http_trace_layer())
        .layer(from_fn(metrics_middleware))
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Connect, migrate, and bind the listener.
    pub async fn build(config: BillConfig) -> Result<Self, AppError> {
        let db = Database::new(
            &config.database.url,
            config.database.max_connections,
            config.database.min_connections,
        )
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to connect to PostgreSQL");
            e
        })?;

        db.run_migrations().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to run migrations");
            e
        })?;

        tracing::info!(
            mask_db_errors = config.list.mask_db_errors,
            legacy_approver_count = config.list.legacy_approver_count,
            concurrent_queries = config.list.concurrent_queries,
            "Bill list policy"
        );

        let state = AppState::new(config.service_name.clone(), Arc::new(db), config.list);
        let router = build_router(state);

        // Port 0 = random port for testing
        let addr = config.common.socket_addr();
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!(error = %e, addr = %addr, "Failed to bind HTTP listener");
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(http_port = port, "Bill service listener bound");

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the HTTP port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        tracing::info!(
            service = "bill-service",
            version = env!("CARGO_PKG_VERSION"),
            http_port = self.port,
            "Service ready to accept connections"
        );

        axum::serve(self.listener, self.router).await.map_err(|e| {
            tracing::error!(error = %e, "HTTP server error");
            std::io::Error::other(format!("HTTP server error: {}", e))
        })
    }
}
