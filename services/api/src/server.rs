use crate::cli::ServeArgs;
use crate::demo;
use crate::infra::{
    AppState, CoachBackend, InMemoryChatHistory, InMemoryGoalRepository,
    InMemoryTransactionRepository,
};
use crate::routes::with_system_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use smartsave::coach::{coach_router, CoachService};
use smartsave::config::AppConfig;
use smartsave::error::AppError;
use smartsave::finance::{finance_router, FinanceService, SerenityEngine};
use smartsave::receipts::{receipts_router, ReceiptParser, ReceiptScanner, TesseractCommand};
use smartsave::telemetry;
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

    telemetry::init(config.environment, &config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let engine = SerenityEngine::new(config.scoring.engine.clone());
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        engine: Arc::new(engine.clone()),
    };

    let finance = Arc::new(FinanceService::new(
        Arc::new(InMemoryTransactionRepository::default()),
        Arc::new(InMemoryGoalRepository::default()),
        engine.clone(),
    ));
    if config.seed_demo_data {
        demo::seed(finance.as_ref())?;
        info!("seeded sample transactions and goals");
    }

    let backend = CoachBackend::from_config(&config.coach);
    info!(backend = backend.name(), "coach backend selected");
    let coach = Arc::new(CoachService::new(
        Arc::new(backend),
        Arc::new(InMemoryChatHistory::retaining(config.coach.history_limit)),
        engine,
        config.coach.history_limit,
    ));

    let extractor = TesseractCommand::new(
        config.receipts.tesseract_bin.clone(),
        config.receipts.languages.clone(),
    );
    let scanner = Arc::new(ReceiptScanner::new(
        Arc::new(extractor),
        ReceiptParser::new()?,
    ));

    let default_budget = config.scoring.monthly_budget;
    let api = finance_router(finance.clone(), default_budget)
        .merge(coach_router(coach, finance, default_budget))
        .merge(receipts_router(scanner));

    let app = with_system_routes(api)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "smartsave api ready");

    axum::serve(listener, app).await?;
    Ok(())
}
