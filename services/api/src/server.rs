use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryApplicationStore, LoggingConfirmationMailer};
use crate::routes::with_enrollment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use expert_intake::config::AppConfig;
use expert_intake::error::AppError;
use expert_intake::telemetry;
use expert_intake::workflows::enrollment::RestGeographyGateway;
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

    let geography = Arc::new(RestGeographyGateway::new(&config.geography)?);
    let store = Arc::new(InMemoryApplicationStore::default());
    let mailer = Arc::new(LoggingConfirmationMailer);

    let app = with_enrollment_routes(geography, store, mailer)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "expert enrollment service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
