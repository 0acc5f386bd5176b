use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::IdentityData;
use crate::inbound::http::router::AppState;

pub async fn list_students(
    State(state): State<AppState>,
) -> Result<ApiSuccess<Vec<IdentityData>>, ApiError> {
    let students = state.identity_service.list_students().await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        students.iter().map(IdentityData::from).collect(),
    ))
}
