//! API server entry point.

use api::config::Config;
use metrics_exporter_prometheus::PrometheusHandle;
use saga::Deadlines;
use store::{
    CatalogStore, HttpObjectStore, InMemoryCatalogStore, InMemoryObjectStore, ObjectStore,
    PostgresCatalogStore,
};
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

async fn serve<C, O>(config: &Config, catalog: C, objects: O, metrics_handle: PrometheusHandle)
where
    C: CatalogStore + 'static,
    O: ObjectStore + 'static,
{
    let state = api::create_state(catalog, objects, Deadlines::from_env());
    let app = api::create_app(state, metrics_handle);

    let addr = config.addr();
    tracing::info!(%addr, "starting API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("server shut down gracefully");
}

#[tokio::main]
async fn main() {
    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Install Prometheus metrics recorder
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Wire store backends from configuration
    let config = Config::from_env();
    match (&config.database_url, &config.storage_url) {
        (Some(database_url), Some(storage_url)) => {
            let pool = sqlx::PgPool::connect(database_url)
                .await
                .expect("failed to connect to database");
            let catalog = PostgresCatalogStore::new(pool);
            catalog
                .run_migrations()
                .await
                .expect("failed to run migrations");

            let mut objects = HttpObjectStore::new(storage_url, &config.storage_bucket);
            if let Some(key) = &config.storage_api_key {
                objects = objects.with_api_key(key);
            }

            serve(&config, catalog, objects, metrics_handle).await;
        }
        (None, None) => {
            tracing::warn!("no backends configured, serving from in-memory stores");
            serve(
                &config,
                InMemoryCatalogStore::new(),
                InMemoryObjectStore::new(),
                metrics_handle,
            )
            .await;
        }
        _ => {
            // Half-configured backends are a deployment mistake; refuse to
            // guess which half was intended.
            panic!("DATABASE_URL and STORAGE_URL must be set together");
        }
    }
}
