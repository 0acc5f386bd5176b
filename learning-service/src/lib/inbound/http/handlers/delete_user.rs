use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use crate::domain::identity::models::IdentityId;
use crate::identity::errors::IdentityError;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = IdentityId::from_string(&id).map_err(IdentityError::from)?;

    state.identity_service.delete_identity(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}
