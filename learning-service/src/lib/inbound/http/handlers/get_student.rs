use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::IdentityData;
use crate::domain::identity::models::IdentityId;
use crate::inbound::http::router::AppState;

pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<IdentityData>, ApiError> {
    // A malformed id cannot name a student.
    let id = IdentityId::from_string(&id)
        .map_err(|_| ApiError::NotFound("Student not found.".to_string()))?;

    let student = state.identity_service.get_student(&id).await?;

    Ok(ApiSuccess::new(StatusCode::OK, (&student).into()))
}
