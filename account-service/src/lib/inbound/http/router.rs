use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::Request as HttpRequest;
use axum::http::Response as HttpResponse;
use axum::middleware;
use axum::routing::get;
use axum::routing::patch;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::forgot_password::forgot_password;
use super::handlers::list_users::list_users;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::me::me;
use super::handlers::reset_password::reset_password;
use super::handlers::sign_up::sign_up;
use super::handlers::update_password::update_password;
use super::middleware::authenticate;
use super::middleware::restrict_to;
use crate::domain::user::models::Role;
use crate::user::ports::AuthServicePort;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthServicePort>,
    pub cookie_expiration_days: i64,
}

pub fn create_router(
    auth_service: Arc<dyn AuthServicePort>,
    cookie_expiration_days: i64,
) -> Router {
    let state = AppState {
        auth_service,
        cookie_expiration_days,
    };

    let public_routes = Router::new()
        .route("/api/v1/users/signup", post(sign_up))
        .route("/api/v1/users/login", post(login))
        .route("/api/v1/users/logout", get(logout))
        .route("/api/v1/users/forgotPassword", post(forgot_password))
        .route("/api/v1/users/resetPassword/:token", patch(reset_password));

    let protected_routes = protected(
        state.clone(),
        Router::new()
            .route("/api/v1/users/updateMyPassword", patch(update_password))
            .route("/api/v1/users/me", get(me)),
    );

    let admin_routes = restricted(
        state.clone(),
        &[Role::Admin],
        Router::new().route("/api/v1/users", get(list_users)),
    );

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &HttpRequest<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
            )
        })
        .on_response(
            |response: &HttpResponse<Body>, latency: Duration, _span: &Span| {
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
        .merge(admin_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Wrap routes behind the authenticate stage.
fn protected(state: AppState, routes: Router<AppState>) -> Router<AppState> {
    routes.route_layer(middleware::from_fn_with_state(state, authenticate))
}

/// Wrap routes behind authenticate + restrict-to. The role check is only
/// ever attached inside the authenticate wrapper, so it can never observe a
/// request without an identity.
fn restricted(
    state: AppState,
    allowed: &'static [Role],
    routes: Router<AppState>,
) -> Router<AppState> {
    protected(
        state,
        routes.route_layer(middleware::from_fn(
            move |req: HttpRequest, next: axum::middleware::Next| restrict_to(allowed, req, next),
        )),
    )
}
