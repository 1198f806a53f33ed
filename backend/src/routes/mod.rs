//! Route definitions for the Krishi Sakhi API

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Registration and login (public)
        .route("/farmers", post(handlers::farmer::register))
        .route("/sessions", post(handlers::farmer::login))
        // Weather by place name (public)
        .route("/weather/lookup", get(handlers::weather::lookup))
        // Protected routes
        .merge(protected_routes(state))
}

/// Routes that require a session token
fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/farmers/me", get(handlers::farmer::get_me))
        .route("/farmers/me/token", put(handlers::farmer::update_delivery_token))
        .route("/advice", post(handlers::advisory::ask))
        .route("/advice/history", get(handlers::advisory::history))
        .route("/advice/chat", get(handlers::advisory::chat_log))
        .route("/weather", get(handlers::weather::my_weather))
        .route("/notifications", post(handlers::notification::send_alert))
        .route(
            "/notifications/weather",
            post(handlers::notification::send_weather_alert),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
