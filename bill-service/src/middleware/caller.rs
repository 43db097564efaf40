//! Caller context extracted from gateway-injected headers.
//!
//! The gateway verifies the JWT and forwards the caller's tenant, login and
//! role as `X-Tenant-ID`, `X-User-ID` and `X-User-Role`. Requests that did not
//! pass through it are rejected here.

use crate::models::Role;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use service_core::error::AppError;

pub const TENANT_ID_HEADER: &str = "X-Tenant-ID";
pub const USER_ID_HEADER: &str = "X-User-ID";
pub const USER_ROLE_HEADER: &str = "X-User-Role";

/// Who is asking, and within which tenant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerContext {
    /// Owning company; every query is scoped to it.
    pub tenant_id: String,
    /// Login identifier, compared against `created_by` / `approved_by` / `rejected_by`.
    pub login_id: String,
    pub role: Role,
}

impl CallerContext {
    pub fn new(tenant_id: impl Into<String>, login_id: impl Into<String>, role: Role) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            login_id: login_id.into(),
            role,
        }
    }
}

fn required_header<'a>(parts: &'a Parts, name: &str) -> Result<&'a str, AppError> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            AppError::AuthError(anyhow::anyhow!(
                "Missing {} header (required from gateway)",
                name
            ))
        })
}

#[async_trait]
impl<S> FromRequestParts<S> for CallerContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let tenant_id = required_header(parts, TENANT_ID_HEADER)?;
        let login_id = required_header(parts, USER_ID_HEADER)?;
        let role = Role::from_header(required_header(parts, USER_ROLE_HEADER)?);

        let span = tracing::Span::current();
        span.record("tenant_id", tenant_id);
        span.record("user_id", login_id);

        Ok(CallerContext::new(tenant_id, login_id, role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(req: Request<()>) -> Result<CallerContext, AppError> {
        let (mut parts, _) = req.into_parts();
        CallerContext::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_extracts_all_headers() {
        let req = Request::builder()
            .header(TENANT_ID_HEADER, "acme")
            .header(USER_ID_HEADER, "maker@acme")
            .header(USER_ROLE_HEADER, "maker")
            .body(())
            .unwrap();

        let caller = extract(req).await.unwrap();
        assert_eq!(caller, CallerContext::new("acme", "maker@acme", Role::Maker));
    }

    #[tokio::test]
    async fn test_missing_tenant_is_auth_error() {
        let req = Request::builder()
            .header(USER_ID_HEADER, "maker@acme")
            .header(USER_ROLE_HEADER, "Maker")
            .body(())
            .unwrap();

        assert!(matches!(extract(req).await, Err(AppError::AuthError(_))));
    }

    #[tokio::test]
    async fn test_blank_role_is_rejected() {
        let req = Request::builder()
            .header(TENANT_ID_HEADER, "acme")
            .header(USER_ID_HEADER, "maker@acme")
            .header(USER_ROLE_HEADER, "  ")
            .body(())
            .unwrap();

        assert!(matches!(extract(req).await, Err(AppError::AuthError(_))));
    }
}
