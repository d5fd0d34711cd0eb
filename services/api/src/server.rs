use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryMessageRepository};
use crate::routes::with_message_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use careervue::config::AppConfig;
use careervue::error::AppError;
use careervue::messages::MessageService;
use careervue::sentiment::SentimentScorer;
use careervue::telemetry;
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

    let lexicon = config.sentiment.load_lexicon()?;
    let lexicon_source = config
        .sentiment
        .lexicon_path
        .as_deref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "builtin".to_string());
    info!(
        positive_terms = lexicon.positive_terms().count(),
        negative_terms = lexicon.negative_terms().count(),
        source = %lexicon_source,
        "sentiment lexicon loaded"
    );
    let scorer = Arc::new(SentimentScorer::new(lexicon));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryMessageRepository::default());
    let message_service = Arc::new(MessageService::new(repository, scorer));

    let app = with_message_routes(message_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "careervue message service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
