use crate::cli::ServeArgs;
use crate::infra::{AppState, CasaServices};
use crate::routes::with_casa_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use casa_match::config::AppConfig;
use casa_match::error::AppError;
use casa_match::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry, config.environment)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let services = CasaServices::from_config(&config)?;
    info!(
        listings = services.listings.store().len(),
        profile_dir = %config.profile.directory.display(),
        assistant = config.assistant.api_key.is_some(),
        "casa services initialised"
    );

    let app = with_casa_routes(services)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "casa match service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
