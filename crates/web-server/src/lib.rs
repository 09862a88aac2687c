use axum::{
    extract::DefaultBodyLimit,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use api_client::{CurrencyConverter, ExchangeRateClient};
use configuration::Settings;
use database::ProjectStore;
use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowHeaders, AllowOrigin, Any as AnyCors, CorsLayer},
    trace::TraceLayer,
};

pub mod enrichment;
pub mod error;
pub mod handlers;

use error::AppError;

/// The shared application state that all handlers can access.
///
/// Both collaborators are constructed by the caller and injected here, so
/// tests can hand in an in-memory store and a stub rate provider.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProjectStore>,
    pub converter: CurrencyConverter,
}

impl AppState {
    pub fn new(store: Arc<dyn ProjectStore>, converter: CurrencyConverter) -> Self {
        Self { store, converter }
    }

    /// Connects the configured store and builds the live exchange-rate client.
    pub async fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let store = database::connect(&settings.database).await?;
        let rate_client = ExchangeRateClient::new(&settings.currency_api)?;
        Ok(Self::new(store, CurrencyConverter::new(Arc::new(rate_client))))
    }
}

/// Builds the application router with every route and middleware layer attached.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(AnyCors)
        .allow_headers(AllowHeaders::any());

    // --- DEFINE THE APPLICATION ROUTES ---
    Router::new()
        .route("/ok", get(handlers::health))
        .route("/project/budget", post(handlers::create_project))
        .route(
            "/project/budget/currency",
            post(handlers::find_budget_with_currency)
                .get(handlers::currency_segment_as_id)
                .put(handlers::currency_segment_as_id)
                .delete(handlers::currency_segment_as_id),
        )
        .route(
            "/project/budget/:id",
            get(handlers::get_project)
                .put(handlers::update_project)
                .delete(handlers::delete_project),
        )
        .route("/api-conversion", post(handlers::convert_specific_project))
        .fallback(handlers::not_found)
        .with_state(Arc::new(state))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024))
}

/// A panicking handler still answers with the generic internal-error body.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    AppError::Internal(detail).into_response()
}

/// Serves the router on `addr` until Ctrl-C.
pub async fn run_server(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let app = router(state);

    tracing::info!("Web server started and listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Web server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for the shutdown signal.");
        std::future::pending::<()>().await;
    }
}
