use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::JsonBody;
use super::MessageData;
use crate::inbound::http::router::AppState;

pub const FORGOT_PASSWORD_MESSAGE: &str =
    "If the email exists, reset instructions have been sent.";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ForgotPasswordRequestBody {
    email: String,
}

/// Same answer whether or not the email is registered.
pub async fn forgot_password(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ForgotPasswordRequestBody>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    state.access_service.forgot_password(&body.email).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        MessageData::new(FORGOT_PASSWORD_MESSAGE),
    ))
}
