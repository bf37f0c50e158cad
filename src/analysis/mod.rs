//! The medication-safety analysis engine.
//!
//! Pipeline: normalize → enumerate pairs → resolve per pair (tiered) →
//! aggregate, with optional pharmacogenomic overlay and alternative
//! ranking. Everything is per-request; the only injected state is the
//! read-only store and the immutable reference data.

pub mod aggregate;
pub mod alternatives;
pub mod dispatcher;
pub mod normalizer;
pub mod pairs;
pub mod pgx;
pub mod quality;
pub mod reference;
pub mod resolver;
pub mod types;

pub use dispatcher::{
    AnalysisPayload, AnalysisRequest, AnalysisService, DataQualityPayload, DdiPayload,
    EvidencePayload, PgxPayload,
};
pub use reference::ReferenceData;
pub use resolver::InteractionResolver;
pub use types::{
    AlternativesReport, AnalysisError, AnalysisOutcome, AnalysisReport, DataQualityReport,
    DdiReport, EvidenceReport, PgxReport, QualityFinding,
};
