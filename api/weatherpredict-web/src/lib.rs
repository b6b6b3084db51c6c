use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, StatusCode, header},
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::set_header::SetResponseHeaderLayer;
use weatherpredict_app::Application;

pub mod notification;
pub mod session;
pub mod views;

mod routes;
#[cfg(test)]
mod testing;

#[derive(Clone)]
pub struct AppState {
    pub app: Arc<Application>,
    /// Marks cookies `Secure`; enable behind HTTPS.
    pub secure_cookies: bool,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::landing::landing))
        .route("/auth", get(routes::auth::auth_page))
        .route("/auth/sign-in", post(routes::auth::sign_in))
        .route("/auth/sign-up", post(routes::auth::sign_up))
        .route("/dashboard", get(routes::dashboard::dashboard_page))
        .route("/dashboard/events", get(routes::dashboard::dashboard_events))
        .route(
            "/dashboard/session-events",
            get(routes::dashboard::session_events),
        )
        .route("/sign-out", post(routes::dashboard::sign_out))
        .route(
            "/create-event",
            get(routes::events::create_event_page).post(routes::events::create_event),
        )
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session::refresh_expired_session,
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .with_state(state)
}

pub async fn serve<F>(
    listener: tokio::net::TcpListener,
    state: AppState,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        log::info!("Web server listening on http://{}", addr);
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn not_found() -> ServiceError {
    ServiceError::NotFound("No such page".to_string())
}

#[derive(Debug)]
pub enum ServiceError {
    NotFound(String),
    Unauthorized(String),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ServiceError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::http::Response<axum::body::Body> {
        let (status, msg) = match self {
            ServiceError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ServiceError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
        };
        let body = serde_json::json!({ "error": msg });
        (status, axum::Json(body)).into_response()
    }
}
