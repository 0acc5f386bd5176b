use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use crate::domain::identity::models::CreateIdentityCommand;
use crate::domain::identity::models::DisplayName;
use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::Role;
use crate::identity::errors::IdentityError;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::IdentityData;
use crate::inbound::http::handlers::JsonBody;
use crate::inbound::http::router::AppState;

/// HTTP request body for an administrator creating an account (raw JSON)
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub role: String,
}

impl CreateUserRequest {
    fn try_into_command(self) -> Result<CreateIdentityCommand, IdentityError> {
        let role = self
            .role
            .parse::<Role>()
            .map_err(|_| IdentityError::RoleNotAssignable)?;

        Ok(CreateIdentityCommand {
            name: DisplayName::new(self.name)?,
            email: EmailAddress::new(self.email)?,
            role,
        })
    }
}

pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateUserRequest>,
) -> Result<ApiSuccess<IdentityData>, ApiError> {
    let command = req.try_into_command()?;

    state
        .identity_service
        .create_identity(command)
        .await
        .map_err(ApiError::from)
        .map(|identity| ApiSuccess::new(StatusCode::CREATED, (&identity).into()))
}
