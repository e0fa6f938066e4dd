use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemorySessionRepository};
use crate::routes::with_operational_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use docs_wizard::config::AppConfig;
use docs_wizard::error::AppError;
use docs_wizard::telemetry;
use docs_wizard::wizard::{RandomReferenceGenerator, WizardService};
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

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let wizard_service = Arc::new(WizardService::new(
        Arc::new(InMemorySessionRepository::new(&config.sessions)),
        Arc::new(RandomReferenceGenerator),
        &config.wizard,
    ));

    let app = with_operational_routes(wizard_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        checklist_dir = %config.wizard.checklist_dir.display(),
        reset_policy = %config.wizard.reset_policy,
        session_ttl_secs = config.sessions.idle_ttl.as_secs(),
        "document wizard ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
