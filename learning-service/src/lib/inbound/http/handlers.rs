use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::access::errors::AccessError;
use crate::domain::identity::models::Identity;
use crate::identity::errors::IdentityError;

pub mod create_user;
pub mod current_user_id;
pub mod delete_user;
pub mod forgot_password;
pub mod get_student;
pub mod get_user;
pub mod health;
pub mod list_students;
pub mod list_users;
pub mod login;
pub mod register;
pub mod reset_password;
pub mod update_user;

/// Successful response: a status and a bare JSON body.
#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<T>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Forbidden(String),
}

/// `axum::Json` whose rejections come back as `{message}` 400s.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => {
                tracing::error!("Request failed: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
        };

        (status, Json(ApiErrorData { message })).into_response()
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::NotFound(_) => ApiError::NotFound("User not found.".to_string()),
            IdentityError::StudentNotFound(_) => {
                ApiError::NotFound("Student not found.".to_string())
            }
            IdentityError::NoStudents => ApiError::BadRequest(err.to_string()),
            IdentityError::EmailAlreadyExists(_) => {
                ApiError::Conflict("Email already exists".to_string())
            }
            IdentityError::Forbidden(_) => ApiError::Forbidden("Forbidden".to_string()),
            IdentityError::RoleNotAssignable
            | IdentityError::InvalidRole(_)
            | IdentityError::InvalidIdentityId(_) => ApiError::BadRequest(err.to_string()),
            IdentityError::InvalidName(_) | IdentityError::InvalidEmail(_) => {
                ApiError::UnprocessableEntity(err.to_string())
            }
            IdentityError::Password(_)
            | IdentityError::DatabaseError(_)
            | IdentityError::Unknown(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::InvalidCredentials | AccessError::Unauthenticated => {
                ApiError::Unauthorized(err.to_string())
            }
            AccessError::InvalidResetToken | AccessError::InvalidArgument(_) => {
                ApiError::BadRequest(err.to_string())
            }
            AccessError::EmailAlreadyExists => ApiError::Conflict(err.to_string()),
            AccessError::Internal(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

/// Message-only success body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageData {
    pub message: String,
}

impl MessageData {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Public view of an identity. The password hash never leaves the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityData {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl From<&Identity> for IdentityData {
    fn from(identity: &Identity) -> Self {
        Self {
            user_id: identity.id.to_string(),
            name: identity.name.as_str().to_string(),
            email: identity.email.as_str().to_string(),
            role: identity.role.as_str().to_string(),
        }
    }
}
