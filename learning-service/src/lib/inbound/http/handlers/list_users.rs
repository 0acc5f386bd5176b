use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::IdentityData;
use crate::inbound::http::router::AppState;

pub async fn list_users(
    State(state): State<AppState>,
) -> Result<ApiSuccess<Vec<IdentityData>>, ApiError> {
    state
        .identity_service
        .list_identities()
        .await
        .map_err(ApiError::from)
        .map(|identities| {
            ApiSuccess::new(
                StatusCode::OK,
                identities.iter().map(IdentityData::from).collect(),
            )
        })
}
