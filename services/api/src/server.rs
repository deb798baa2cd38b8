use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryPollRepository};
use crate::routes::with_poll_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Utc;
use polls::config::AppConfig;
use polls::error::AppError;
use polls::polls::{PollFixture, PollService};
use polls::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let repository = Arc::new(InMemoryPollRepository::default());
    match &config.storage.fixture {
        Some(path) => {
            let summary =
                PollFixture::from_path(path)?.load_into(repository.as_ref(), Utc::now())?;
            info!(
                fixture = %path.display(),
                polls = summary.polls,
                choices = summary.choices,
                "poll store seeded"
            );
        }
        None => warn!("POLLS_FIXTURE not set; starting with an empty poll store"),
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let poll_service = Arc::new(PollService::new(repository));

    let app = with_poll_routes(poll_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "polls service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
