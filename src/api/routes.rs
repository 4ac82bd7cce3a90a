use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{control, gesture, health, text};
use super::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // SECURITY: Restrict CORS to localhost only - the control surface must never be reachable remotely
    let cors = CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost"),
            HeaderValue::from_static("http://127.0.0.1"),
            HeaderValue::from_static("capacitor://localhost"),
            HeaderValue::from_static("https://localhost"),
        ])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(tower_http::cors::Any);

    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Control surface
        .route("/control/enable", post(control::enable_control))
        .route("/control/disable", post(control::disable_control))
        .route("/control/status", get(control::control_status))
        // Gestures
        .route("/gesture/click", post(gesture::click))
        .route("/gesture/scroll", post(gesture::scroll))
        .route("/gesture/:gesture_id", get(gesture::get_gesture_status))
        // Text injection
        .route("/text/inject", post(text::inject_text))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
