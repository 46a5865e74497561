//! HTTP API server for the course catalog.
//!
//! Thin glue over the `saga` and `store` crates: course CRUD, the multipart
//! create-course-with-video endpoint backed by the creation saga, enrollment
//! endpoints, and health/metrics, with structured logging (tracing) and
//! Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use saga::{CourseSagaCoordinator, Deadlines, TracingInvalidations, TracingNotifications};
use store::{CatalogStore, InMemoryCatalogStore, InMemoryObjectStore, ObjectStore};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::courses::AppState;

/// Uploads may reach 200 MiB; leave headroom for the other form fields.
const BODY_LIMIT_BYTES: usize = 210 * 1024 * 1024;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<C, O>(state: Arc<AppState<C, O>>, metrics_handle: PrometheusHandle) -> Router
where
    C: CatalogStore + 'static,
    O: ObjectStore + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/courses", post(routes::courses::create::<C, O>))
        .route("/courses", get(routes::courses::list::<C, O>))
        .route("/courses/{id}", get(routes::courses::get::<C, O>))
        .route("/courses/{id}", delete(routes::courses::delete::<C, O>))
        .route("/courses/{id}/videos", get(routes::courses::videos::<C, O>))
        .route(
            "/courses/{id}/enrollments",
            post(routes::enrollments::enroll::<C, O>),
        )
        .route(
            "/courses/{id}/enrollments",
            delete(routes::enrollments::unenroll::<C, O>),
        )
        .route("/enrollments", get(routes::enrollments::list::<C, O>))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates application state over the given store backends.
pub fn create_state<C, O>(catalog: C, objects: O, deadlines: Deadlines) -> Arc<AppState<C, O>>
where
    C: CatalogStore + 'static,
    O: ObjectStore + 'static,
{
    let coordinator =
        CourseSagaCoordinator::new(catalog, objects, TracingNotifications, TracingInvalidations)
            .with_deadlines(deadlines);
    Arc::new(AppState { coordinator })
}

/// Creates the default application state with in-memory stores.
pub fn create_default_state() -> Arc<AppState<InMemoryCatalogStore, InMemoryObjectStore>> {
    create_state(
        InMemoryCatalogStore::new(),
        InMemoryObjectStore::new(),
        Deadlines::default(),
    )
}
