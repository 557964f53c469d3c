use anyhow::Context;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

mod api;
mod auth;
mod config;
mod error;
mod handlers;
mod middleware;
mod store;
mod validation;

use crate::config::AuthScheme;
use crate::store::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up TODOS_JWT_SECRET etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!(
        "starting todos API in {:?} mode with {:?} authentication",
        config.environment,
        config.security.auth_scheme
    );

    let app = app(AppState::new());

    // Allow tests or deployments to override port via env
    let port = std::env::var("TODOS_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("todos API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server")?;
    Ok(())
}

fn app(state: AppState) -> Router {
    let config = config::config();

    let todo_routes = Router::new()
        .route(
            "/api/todos",
            get(handlers::todos::todos_get).post(handlers::todos::todos_post),
        )
        .route(
            "/api/todos/:id",
            get(handlers::todos::todo_get)
                .put(handlers::todos::todo_put)
                .delete(handlers::todos::todo_delete),
        );

    // The deployment runs exactly one scheme; the other is never consulted
    let protected = match config.security.auth_scheme {
        AuthScheme::Bearer => todo_routes.layer(axum::middleware::from_fn(middleware::bearer_auth)),
        AuthScheme::Basic => todo_routes.layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::basic_auth,
        )),
    };

    // Anonymous endpoints live outside the protected sub-router, so they are
    // exempt from authentication before any credential parsing happens
    let mut app = Router::new()
        .route("/api/ping", get(ping))
        .route("/api/error", get(error_probe))
        .route("/api/register", post(handlers::auth::register))
        .route("/api/token", post(handlers::auth::token))
        .merge(protected)
        .with_state(state);

    if config.api.enable_cors {
        app = app.layer(CorsLayer::permissive());
    }
    if config.api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }

    // Outermost boundary: any panic below becomes a generic 500
    app.layer(CatchPanicLayer::custom(handle_panic))
}

/// Unauthenticated health check.
async fn ping() -> &'static str {
    "pong!"
}

/// Deliberately panics so the 500 boundary can be exercised end to end.
async fn error_probe() -> &'static str {
    panic!("Ups ... something went wrong.");
}

fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!("request handler panicked: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": true,
            "message": "Internal Server Error",
            "code": "INTERNAL_SERVER_ERROR"
        })),
    )
        .into_response()
}
