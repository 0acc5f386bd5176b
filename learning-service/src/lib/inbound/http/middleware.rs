use axum::extract::Request;
use axum::extract::State;
use axum::http;
use axum::middleware::Next;
use axum::response::Response;

use crate::access::models::Principal;
use crate::access::policy::Policy;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Validates the bearer access token and stores the caller's [`Principal`]
/// in request extensions. Runs before any policy check.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token_from_header(&req)?;

    let principal = state.access_service.authenticate(token)?;

    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

/// Route-level role check against the policy given as middleware state.
pub async fn require_policy(
    State(policy): State<Policy>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = req.extensions().get::<Principal>().ok_or_else(|| {
        tracing::error!("Policy {} evaluated without an authenticated principal", policy);
        ApiError::Unauthorized("Invalid or expired token".to_string())
    })?;

    if !policy.evaluate(principal).is_allowed() {
        tracing::warn!(
            subject = %principal.subject,
            role = %principal.role,
            policy = %policy,
            "Access denied"
        );
        return Err(ApiError::Forbidden("Forbidden".to_string()));
    }

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, ApiError> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid Authorization header".to_string()))?;

    auth_str.strip_prefix("Bearer ").ok_or_else(|| {
        ApiError::Unauthorized(
            "Invalid Authorization header format. Expected: Bearer <token>".to_string(),
        )
    })
}
