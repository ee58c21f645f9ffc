//! HTTP transport for the record service.
//!
//! Requires the `http` feature. Uses axum for routing. Store work runs on
//! the blocking pool so file I/O never stalls the async workers.
//!
//! ## Routes
//!
//! - `GET /` — service banner and endpoint list.
//! - `GET /{collection}` and `GET /{collection}/:id` — for every collection.
//! - `POST /service_tickets`, `PUT|DELETE /service_tickets/:id`.
//! - `POST /guest_interactions`.
//! - `POST /api/alerts/human-needed` — open an escalation alert.
//! - `PUT /alerts/:id/assign`, `PUT /alerts/:id/resolve`.
//! - `GET /alerts/pending`.
//!
//! Request bodies are read as JSON whatever the `Content-Type`; an empty
//! body is an empty record and unparseable JSON is a 400.
//!
//! Failures are `{ "error": message }` with 400, 404 or 500.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{FromRequest, Path, Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put, MethodRouter};
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use super::{RecordError, RecordService};
use crate::document::{Collection, Record};
use crate::store::DocumentStore;

type Shared<S> = Arc<RecordService<S>>;

const ENDPOINTS: &[&str] = &[
    "GET /service_tickets",
    "GET /service_tickets/:id",
    "POST /service_tickets",
    "PUT /service_tickets/:id",
    "DELETE /service_tickets/:id",
    "GET /guest_interactions",
    "GET /guest_interactions/:id",
    "POST /guest_interactions",
    "GET /crm_guests",
    "GET /crm_guests/:id",
    "GET /alerts",
    "GET /alerts/:id",
    "GET /alerts/pending",
    "POST /api/alerts/human-needed",
    "PUT /alerts/:id/assign",
    "PUT /alerts/:id/resolve",
    "GET /dashboard_metrics",
    "GET /dashboard_metrics/:id",
];

/// Body of `GET /`.
pub fn banner() -> Value {
    json!({
        "message": "Hotel API is running",
        "endpoints": ENDPOINTS,
    })
}

/// Build an axum `Router` serving every record route over `service`.
pub fn router<S: DocumentStore + 'static>(service: Shared<S>) -> Router {
    let mut router: Router<Shared<S>> = Router::new()
        .route("/", get(|| async { Json(banner()) }))
        .route("/alerts/pending", get(pending_handler::<S>))
        .route("/api/alerts/human-needed", post(escalate_handler::<S>))
        .route("/alerts/:id/assign", put(assign_handler::<S>))
        .route("/alerts/:id/resolve", put(resolve_handler::<S>));

    for collection in Collection::ALL {
        router = router
            .route(&format!("/{collection}"), collection_routes::<S>(collection))
            .route(&format!("/{collection}/:id"), item_routes::<S>(collection));
    }

    router.with_state(service)
}

/// Serve the record API at `addr` (e.g. `"0.0.0.0:3000"`) until SIGINT or
/// SIGTERM.
pub async fn serve<S: DocumentStore + 'static>(
    service: Shared<S>,
    addr: &str,
) -> Result<(), std::io::Error> {
    let app = router(service);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "hotel API listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("hotel API stopped");
    Ok(())
}

/// `GET /{collection}`, plus `POST` where the collection accepts creates.
fn collection_routes<S: DocumentStore + 'static>(
    collection: Collection,
) -> MethodRouter<Shared<S>> {
    let routes = get(move |State(service): State<Shared<S>>| async move {
        match blocking(service, move |s| s.list(collection)).await {
            Ok(records) => Json(records).into_response(),
            Err(response) => response,
        }
    });

    match collection {
        Collection::ServiceTickets | Collection::GuestInteractions => routes.post(
            move |State(service): State<Shared<S>>, JsonBody(body): JsonBody| async move {
                run(service, StatusCode::CREATED, move |s| s.create(collection, body)).await
            },
        ),
        _ => routes,
    }
}

/// `GET /{collection}/:id`, plus `PUT` and `DELETE` for service tickets.
fn item_routes<S: DocumentStore + 'static>(collection: Collection) -> MethodRouter<Shared<S>> {
    let routes = get(
        move |State(service): State<Shared<S>>, Path(id): Path<String>| async move {
            run(service, StatusCode::OK, move |s| s.get(collection, &id)).await
        },
    );

    match collection {
        Collection::ServiceTickets => routes
            .put(
                move |State(service): State<Shared<S>>,
                      Path(id): Path<String>,
                      JsonBody(patch): JsonBody| async move {
                    run(service, StatusCode::OK, move |s| s.update(collection, &id, patch)).await
                },
            )
            .delete(
                move |State(service): State<Shared<S>>, Path(id): Path<String>| async move {
                    run(service, StatusCode::OK, move |s| s.delete(collection, &id)).await
                },
            ),
        _ => routes,
    }
}

/// `GET /alerts/pending`
async fn pending_handler<S: DocumentStore + 'static>(
    State(service): State<Shared<S>>,
) -> Response {
    match blocking(service, |s| s.pending()).await {
        Ok(alerts) => Json(alerts).into_response(),
        Err(response) => response,
    }
}

/// `POST /api/alerts/human-needed`
async fn escalate_handler<S: DocumentStore + 'static>(
    State(service): State<Shared<S>>,
    JsonBody(body): JsonBody,
) -> Response {
    run(service, StatusCode::CREATED, move |s| s.escalate(body)).await
}

/// `PUT /alerts/:id/assign`
async fn assign_handler<S: DocumentStore + 'static>(
    State(service): State<Shared<S>>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> Response {
    run(service, StatusCode::OK, move |s| s.assign(&id, body)).await
}

/// `PUT /alerts/:id/resolve`
async fn resolve_handler<S: DocumentStore + 'static>(
    State(service): State<Shared<S>>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> Response {
    run(service, StatusCode::OK, move |s| s.resolve(&id, body)).await
}

/// A request body as a record. Empty bodies and non-object JSON yield an
/// empty record.
struct JsonBody(Record);

#[axum::async_trait]
impl<S: Send + Sync> FromRequest<S> for JsonBody {
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| error_body(e.status(), e.body_text()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonBody(Record::new()));
        }
        serde_json::from_slice::<Value>(&bytes)
            .map(|value| JsonBody(Record::from_value(value)))
            .map_err(|e| {
                debug!(error = %e, "rejected request body");
                error_body(StatusCode::BAD_REQUEST, format!("invalid JSON body: {e}"))
            })
    }
}

fn error_body(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Run a record operation off the async workers and map the outcome.
async fn run<S, F>(service: Shared<S>, success: StatusCode, op: F) -> Response
where
    S: DocumentStore + 'static,
    F: FnOnce(&RecordService<S>) -> Result<Record, RecordError> + Send + 'static,
{
    match blocking(service, op).await {
        Ok(Ok(record)) => (success, Json(record)).into_response(),
        Ok(Err(err)) => error_response(err),
        Err(response) => response,
    }
}

async fn blocking<S, T, F>(service: Shared<S>, op: F) -> Result<T, Response>
where
    S: DocumentStore + 'static,
    T: Send + 'static,
    F: FnOnce(&RecordService<S>) -> T + Send + 'static,
{
    tokio::task::spawn_blocking(move || op(service.as_ref()))
        .await
        .map_err(|e| {
            error!(error = %e, "record task failed");
            let body = json!({ "error": "internal error" });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        })
}

fn error_response(err: RecordError) -> Response {
    match &err {
        RecordError::Persistence { source, .. } => {
            error!(error = %source, "{}", err);
        }
        RecordError::NotFound(_) => {}
    }
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = json!({ "error": err.to_string() });
    (status, Json(body)).into_response()
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to register SIGTERM handler");
                ctrl_c.await.ok();
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
    }
    info!("shutdown signal received");
}
