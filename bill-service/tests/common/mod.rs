//! Common test utilities for bill-service integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use bill_service::middleware::caller::{TENANT_ID_HEADER, USER_ID_HEADER, USER_ROLE_HEADER};
use bill_service::models::Bill;
use bill_service::services::{BillQuery, BillStore, Database, ListPolicy};
use bill_service::startup::BILL_LIST_PATH;
use bill_service::{build_router, AppState};
use http_body_util::BodyExt;
use service_core::error::AppError;
use std::sync::{Arc, Mutex, Once};
use tower::util::ServiceExt;

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,bill_service=debug,sqlx=warn")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// In-memory store with canned results; `None` simulates a database failure.
#[derive(Default)]
pub struct StubStore {
    pub count: Option<i64>,
    pub bills: Option<Vec<Bill>>,
    pub healthy: bool,
    pub queries: Mutex<Vec<BillQuery>>,
}

impl StubStore {
    pub fn with_rows(bills: Vec<Bill>) -> Self {
        Self {
            count: Some(bills.len() as i64),
            bills: Some(bills),
            healthy: true,
            ..Default::default()
        }
    }

    pub fn broken() -> Self {
        Self::default()
    }

    pub fn recorded(&self) -> Vec<BillQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl BillStore for StubStore {
    async fn count_bills(&self, query: &BillQuery) -> Result<i64, AppError> {
        self.queries.lock().unwrap().push(query.clone());
        self.count
            .ok_or_else(|| AppError::DatabaseError(anyhow::anyhow!("connection refused")))
    }

    async fn fetch_bills(&self, query: &BillQuery) -> Result<Vec<Bill>, AppError> {
        self.queries.lock().unwrap().push(query.clone());
        self.bills
            .clone()
            .ok_or_else(|| AppError::DatabaseError(anyhow::anyhow!("connection refused")))
    }

    async fn health_check(&self) -> Result<(), AppError> {
        if self.healthy {
            Ok(())
        } else {
            Err(AppError::DatabaseError(anyhow::anyhow!("connection refused")))
        }
    }
}

pub fn sample_bill(oid: &str, created_by: &str, status: &str) -> Bill {
    Bill {
        oid: oid.to_string(),
        bill_type: "Service".to_string(),
        bill_no: format!("INV-{}", oid),
        description: Some("Office cleaning".to_string()),
        bill_date: "05 Jan, 2024".to_string(),
        image_path: None,
        bill_amount: 250.0,
        status: status.to_string(),
        people_oid: Some("p-1".to_string()),
        created_by: created_by.to_string(),
        company_oid: "acme".to_string(),
        paid_amount: 50.0,
        due_amount: 200.0,
        supplier_name: Some("Invent Corp".to_string()),
    }
}

pub fn router_with(store: Arc<dyn BillStore>, policy: ListPolicy) -> Router {
    init_tracing();
    build_router(AppState::new("bill-service-test", store, policy))
}

/// POST a raw body to the list endpoint as `login` with `role` in tenant `acme`.
pub fn list_request(body: &str, login: &str, role: &str) -> Request<Body> {
    tenant_list_request("acme", body, login, role)
}

pub fn tenant_list_request(tenant: &str, body: &str, login: &str, role: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(BILL_LIST_PATH)
        .header("content-type", "application/json")
        .header(TENANT_ID_HEADER, tenant)
        .header(USER_ID_HEADER, login)
        .header(USER_ROLE_HEADER, role)
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn send(router: Router, request: Request<Body>) -> (u16, serde_json::Value) {
    let response: Response<Body> = router.oneshot(request).await.unwrap();
    let status = response.status().as_u16();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, body)
}

/// Connect to `TEST_DATABASE_URL` and apply migrations.
pub async fn test_database() -> Database {
    init_tracing();
    let database_url = std::env::var("TEST_DATABASE_URL")
        .expect("TEST_DATABASE_URL must be set to run database tests");

    let db = Database::new(&database_url, 2, 1)
        .await
        .expect("Failed to connect to test database");
    db.run_migrations().await.expect("Failed to run migrations");
    db
}

/// Row to insert into `bill_information` for database tests.
pub struct SeedBill<'a> {
    pub oid: &'a str,
    pub bill_no: &'a str,
    pub bill_date: &'a str,
    pub created_on_offset_secs: i64,
    pub status: &'a str,
    pub created_by: &'a str,
    pub bill_amount: f64,
    pub paid_amount: f64,
    pub people_oid: Option<&'a str>,
    pub approved_by: Option<&'a str>,
    pub rejected_by: Option<&'a str>,
}

impl<'a> SeedBill<'a> {
    pub fn new(oid: &'a str, bill_date: &'a str, created_by: &'a str, status: &'a str) -> Self {
        Self {
            oid,
            bill_no: oid,
            bill_date,
            created_on_offset_secs: 0,
            status,
            created_by,
            bill_amount: 100.0,
            paid_amount: 0.0,
            people_oid: None,
            approved_by: None,
            rejected_by: None,
        }
    }
}

/// Ids are prefixed with the tenant so concurrent tests never collide.
pub async fn insert_person(db: &Database, tenant: &str, oid: &str, name: &str) {
    sqlx::query("INSERT INTO people (oid, company_oid, name) VALUES ($1, $2, $3)")
        .bind(format!("{}-{}", tenant, oid))
        .bind(tenant)
        .bind(name)
        .execute(db.pool())
        .await
        .expect("Failed to insert person");
}

pub async fn insert_bill(db: &Database, tenant: &str, bill: SeedBill<'_>) {
    sqlx::query(
        r#"
        INSERT INTO bill_information (
            oid, company_oid, type, bill_no, bill_date, bill_amount, paid_amount, due_amount,
            status, people_oid, created_by, created_on, approved_by, rejected_by
        )
        VALUES ($1, $2, 'Service', $3, $4::date, $5::numeric, $6::numeric, $5::numeric - $6::numeric,
                $7, $8, $9, now() + make_interval(secs => $10::float8), $11, $12)
        "#,
    )
    .bind(format!("{}-{}", tenant, bill.oid))
    .bind(tenant)
    .bind(bill.bill_no)
    .bind(bill.bill_date)
    .bind(bill.bill_amount)
    .bind(bill.paid_amount)
    .bind(bill.status)
    .bind(bill.people_oid.map(|p| format!("{}-{}", tenant, p)))
    .bind(bill.created_by)
    .bind(bill.created_on_offset_secs as f64)
    .bind(bill.approved_by)
    .bind(bill.rejected_by)
    .execute(db.pool())
    .await
    .expect("Failed to insert bill");
}
