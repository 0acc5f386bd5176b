use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Deserialize;

use crate::access::models::Principal;
use crate::domain::identity::models::DisplayName;
use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::UpdateIdentityCommand;
use crate::identity::errors::IdentityError;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::JsonBody;
use crate::inbound::http::router::AppState;

/// HTTP request body for updating an identity (raw JSON)
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: String,
    pub email: String,
}

impl UpdateUserRequest {
    fn try_into_command(self) -> Result<UpdateIdentityCommand, IdentityError> {
        Ok(UpdateIdentityCommand {
            name: DisplayName::new(self.name)?,
            email: EmailAddress::new(self.email)?,
        })
    }
}

pub async fn update_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateUserRequest>,
) -> Result<StatusCode, ApiError> {
    let id = IdentityId::from_string(&id).map_err(IdentityError::from)?;
    let command = req.try_into_command()?;

    state
        .identity_service
        .update_identity(&principal, &id, command)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
