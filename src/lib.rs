pub mod api;
pub mod classifier;
pub mod config;
pub mod db;
pub mod doctors;
pub mod history;
pub mod models;
pub mod pipeline;
pub mod precautions;
pub mod report;
pub mod resources;
pub mod vocabulary;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::api::ApiContext;
use crate::config::AppConfig;
use crate::doctors::DoctorRecommender;
use crate::history::SqliteHistoryStore;
use crate::pipeline::Orchestrator;
use crate::report::ReportGenerator;
use crate::resources::ResourceBundle;

/// Load configuration and resources, open the history store, then serve
/// until Ctrl-C. Any startup failure is returned as a message.
pub async fn run() -> Result<(), String> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let cfg = AppConfig::from_env().map_err(|e| e.to_string())?;
    report::cleanup_orphaned_reports(&cfg.scratch_dir());

    let resources = ResourceBundle::load(&cfg.resources_dir).map_err(|e| e.to_string())?;
    let history = SqliteHistoryStore::open(&cfg.db_path())
        .map_err(|e| format!("Cannot open history database: {e}"))?;

    let logo = cfg.logo_path();
    let reports = ReportGenerator::new(logo.exists().then_some(logo), Some(cfg.scratch_dir()));

    let orchestrator = Orchestrator::from_resources(
        resources,
        DoctorRecommender::builtin(),
        Arc::new(history),
        reports,
    );

    api::serve(ApiContext::new(Arc::new(orchestrator)), cfg.bind_addr).await
}
