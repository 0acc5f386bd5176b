use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use crate::access::models::Principal;
use crate::inbound::http::router::AppState;

/// The caller's own identity id, as a bare JSON string.
pub async fn current_user_id(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<ApiSuccess<String>, ApiError> {
    let id = state
        .identity_service
        .current_identity_id(&principal)
        .await?;

    Ok(ApiSuccess::new(StatusCode::OK, id.to_string()))
}
