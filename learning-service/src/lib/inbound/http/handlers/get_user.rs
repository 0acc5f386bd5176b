use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::IdentityData;
use crate::domain::identity::models::IdentityId;
use crate::identity::errors::IdentityError;
use crate::inbound::http::router::AppState;

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<IdentityData>, ApiError> {
    let id = IdentityId::from_string(&id).map_err(IdentityError::from)?;

    state
        .identity_service
        .get_identity(&id)
        .await
        .map_err(ApiError::from)
        .map(|identity| ApiSuccess::new(StatusCode::OK, (&identity).into()))
}
