//! Oncoguard: drug-drug interaction and pharmacogenomic analysis core.
//!
//! The crate is consumed through [`analysis::AnalysisService`]: build one
//! with a [`db::DrugStore`] implementation and [`analysis::ReferenceData`],
//! then run typed [`analysis::AnalysisRequest`]s against it.

pub mod analysis;
pub mod config;
pub mod db;
pub mod models;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for host applications that have no subscriber of
/// their own. Respects RUST_LOG when set.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
}
