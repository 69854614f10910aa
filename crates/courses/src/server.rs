//! HTTP front end for courses.
//!
//! Maps the `/courses` routes onto [`Operation`]s, runs each one on the
//! blocking pool, and writes the resulting [`Outcome`] back as a response.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::Config;
use crate::course::{normalize_title, CourseId};
use crate::error::{Error, Result};
use crate::handler::{
    Handler, Operation, Outcome, Status, COURSE_NOT_FOUND, INTERNAL_ERROR, TITLE_REQUIRED,
};

#[derive(Debug, Default, Deserialize)]
struct ListQuery {
    title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct TitlePayload {
    #[serde(default)]
    title: Option<String>,
}

/// Build the router for all course endpoints.
///
/// An empty `cors_origins` list allows any origin.
pub fn router(handler: Handler, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/courses", get(list_courses).post(create_course))
        .route(
            "/courses/:id",
            get(get_course).put(update_course).delete(delete_course),
        )
        .with_state(handler)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
}

/// Bind the configured address and serve until Ctrl-C.
///
/// # Errors
///
/// Returns [`Error::Server`] if the address cannot be bound or the server
/// stops with an I/O error.
pub async fn serve(config: &Config, handler: Handler) -> Result<()> {
    let addr = config.socket_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| Error::Server {
            addr: addr.clone(),
            source,
        })?;

    info!("Serving courses on http://{}", addr);
    axum::serve(listener, router(handler, &config.server.cors_origins))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|source| Error::Server { addr, source })?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<HeaderValue> = origins.iter().filter_map(|s| s.parse().ok()).collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn list_courses(State(handler): State<Handler>, Query(query): Query<ListQuery>) -> Response {
    run(handler, Operation::List { title: query.title }).await
}

async fn get_course(State(handler): State<Handler>, Path(id): Path<String>) -> Response {
    match parse_id(&id) {
        Some(id) => run(handler, Operation::Get { id }).await,
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn create_course(State(handler): State<Handler>, body: Bytes) -> Response {
    run(
        handler,
        Operation::Create {
            title: title_from(&body),
        },
    )
    .await
}

async fn update_course(
    State(handler): State<Handler>,
    Path(id): Path<String>,
    body: Bytes,
) -> Response {
    let title = title_from(&body);
    match parse_id(&id) {
        Some(id) => run(handler, Operation::Update { id, title }).await,
        None if normalize_title(title.as_deref()).is_err() => {
            error_response(StatusCode::BAD_REQUEST, TITLE_REQUIRED)
        }
        None => error_response(StatusCode::NOT_FOUND, COURSE_NOT_FOUND),
    }
}

async fn delete_course(State(handler): State<Handler>, Path(id): Path<String>) -> Response {
    match parse_id(&id) {
        Some(id) => run(handler, Operation::Delete { id }).await,
        None => error_response(StatusCode::NOT_FOUND, COURSE_NOT_FOUND),
    }
}

/// Run an operation on the blocking pool and convert its outcome.
async fn run(handler: Handler, operation: Operation) -> Response {
    match tokio::task::spawn_blocking(move || handler.handle(operation)).await {
        Ok(outcome) => into_response(outcome),
        Err(e) => {
            error!("Operation task failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR)
        }
    }
}

fn into_response(outcome: Outcome) -> Response {
    let status = StatusCode::from_u16(outcome.status.code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    match outcome.body {
        Some(body) if outcome.status != Status::NoContent => (status, Json(body)).into_response(),
        _ => status.into_response(),
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Ids that are not integers can never match a course.
fn parse_id(raw: &str) -> Option<CourseId> {
    raw.trim().parse().ok()
}

/// A body that is missing, not JSON, or has a non-string title carries no title.
fn title_from(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<TitlePayload>(body)
        .ok()
        .and_then(|payload| payload.title)
}
