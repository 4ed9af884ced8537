use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryLeadStore};
use crate::routes::with_lead_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use estate_ai::config::AppConfig;
use estate_ai::error::AppError;
use estate_ai::telemetry;
use estate_ai::workflows::estimation::{EstimationEngine, HttpInferenceClient};
use estate_ai::workflows::leads::LeadService;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemoryLeadStore::default());
    let inference_client = HttpInferenceClient::new(
        config.estimator.inference_url.clone(),
        config.estimator.timeout(),
    )?;
    let engine = Arc::new(EstimationEngine::new(inference_client));
    let lead_service = Arc::new(LeadService::new(store, engine));

    let app = with_lead_routes(lead_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "lead estimation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
