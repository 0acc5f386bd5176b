use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::JsonBody;
use super::MessageData;
use crate::access::models::ResetPasswordCommand;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequestBody {
    token: String,
    new_password: String,
}

pub async fn reset_password(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ResetPasswordRequestBody>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    state
        .access_service
        .reset_password(ResetPasswordCommand {
            token: body.token,
            new_password: body.new_password,
        })
        .await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        MessageData::new("Password has been reset successfully."),
    ))
}
