use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::routing::MethodRouter;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_user::create_user;
use super::handlers::current_user_id::current_user_id;
use super::handlers::delete_user::delete_user;
use super::handlers::forgot_password::forgot_password;
use super::handlers::get_student::get_student;
use super::handlers::get_user::get_user;
use super::handlers::health::health;
use super::handlers::list_students::list_students;
use super::handlers::list_users::list_users;
use super::handlers::login::login;
use super::handlers::register::register;
use super::handlers::reset_password::reset_password;
use super::handlers::update_user::update_user;
use super::middleware::authenticate as auth_middleware;
use super::middleware::require_policy;
use crate::access::policy::Policy;
use crate::access::ports::AccessServicePort;
use crate::identity::ports::IdentityServicePort;

#[derive(Clone)]
pub struct AppState {
    pub access_service: Arc<dyn AccessServicePort>,
    pub identity_service: Arc<dyn IdentityServicePort>,
}

/// Guard a single method with a named role policy.
fn guarded(policy: Policy, route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    route.route_layer(middleware::from_fn_with_state(policy, require_policy))
}

pub fn create_router(
    access_service: Arc<dyn AccessServicePort>,
    identity_service: Arc<dyn IdentityServicePort>,
) -> Router {
    let state = AppState {
        access_service,
        identity_service,
    };

    let public_routes = Router::new()
        .route("/api/health", get(health))
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/auth/forgot-password", post(forgot_password))
        .route("/api/auth/reset-password", post(reset_password));

    let protected_routes = Router::new()
        .route("/api/user", guarded(Policy::RequireAdminRole, get(list_users)))
        .route("/api/user", guarded(Policy::RequireAdminRole, post(create_user)))
        .route("/api/user/email", get(current_user_id))
        .route(
            "/api/user/students",
            guarded(Policy::RequireInstructorRole, get(list_students)),
        )
        .route(
            "/api/user/student/:id",
            guarded(Policy::RequireInstructorRole, get(get_student)),
        )
        .route(
            "/api/user/:id",
            guarded(Policy::RequireAdminOrInstructorOrStudentRole, get(get_user)),
        )
        .route(
            "/api/user/:id",
            guarded(Policy::RequireAdminOrInstructorOrStudentRole, put(update_user)),
        )
        .route(
            "/api/user/:id",
            guarded(Policy::RequireAdminRole, delete(delete_user)),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
