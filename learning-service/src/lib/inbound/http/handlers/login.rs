use axum::extract::State;
use axum::http::StatusCode;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::JsonBody;
use crate::access::models::AuthSession;
use crate::access::models::LoginCommand;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginRequestBody>,
) -> Result<ApiSuccess<AuthResponseData>, ApiError> {
    let session = state
        .access_service
        .login(LoginCommand {
            email: body.email,
            password: body.password,
        })
        .await?;

    Ok(ApiSuccess::new(StatusCode::OK, session.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    email: String,
    password: String,
}

/// Returned by both login and register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponseData {
    pub token: String,
    pub role: String,
    pub user_id: String,
    pub name: String,
    pub expires_at: DateTime<Utc>,
}

impl From<AuthSession> for AuthResponseData {
    fn from(session: AuthSession) -> Self {
        Self {
            token: session.token,
            role: session.role.as_str().to_string(),
            user_id: session.user_id.to_string(),
            name: session.name,
            expires_at: session.expires_at,
        }
    }
}
