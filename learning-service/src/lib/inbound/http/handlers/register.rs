use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::login::AuthResponseData;
use super::ApiError;
use super::ApiSuccess;
use super::JsonBody;
use crate::access::models::RegisterCommand;
use crate::domain::identity::models::DisplayName;
use crate::domain::identity::models::EmailAddress;
use crate::identity::errors::IdentityError;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequestBody {
    name: String,
    email: String,
    role: String,
    password: String,
}

impl RegisterRequestBody {
    fn try_into_command(self) -> Result<RegisterCommand, IdentityError> {
        Ok(RegisterCommand {
            name: DisplayName::new(self.name)?,
            email: EmailAddress::new(self.email)?,
            role: self.role,
            password: self.password,
        })
    }
}

pub async fn register(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RegisterRequestBody>,
) -> Result<ApiSuccess<AuthResponseData>, ApiError> {
    let command = body.try_into_command()?;

    let session = state.access_service.register(command).await?;

    Ok(ApiSuccess::new(StatusCode::CREATED, session.into()))
}
