use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    AlternativeSuggestion, Confidence, InteractionRecord, PgxOverview, PgxRecommendation,
    RiskLevel,
};

// ---------------------------------------------------------------------------
// AnalysisError
// ---------------------------------------------------------------------------

/// Failures the caller sees. Collaborator outages are deliberately absent:
/// they degrade inside the pipeline (fallback normalization, tier
/// fallthrough) and surface only as reduced confidence.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid request: {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("Reference data load failed ({0}): {1}")]
    ReferenceDataLoad(String, String),

    #[error("Reference data parse failed ({0}): {1}")]
    ReferenceDataParse(String, String),
}

impl AnalysisError {
    pub fn validation(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// Drug-drug interaction analysis result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DdiReport {
    pub overall_risk_level: RiskLevel,
    pub per_pair_interactions: Vec<InteractionRecord>,
    pub confidence: Confidence,
    /// Caller-visible notices: unknown pairs, consolidation, degraded
    /// directory lookups. Never empty silently — a lookup miss is a
    /// visible "no data found", not a false "safe".
    pub notes: Vec<String>,
}

/// Pharmacogenomic analysis result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PgxReport {
    pub pgx_overview: PgxOverview,
    pub per_drug_recommendations: Vec<PgxRecommendation>,
}

/// One data-quality observation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QualityFinding {
    /// Which payload domain the finding concerns (demographics, labs, allergies).
    pub domain: String,
    pub detail: String,
}

/// Data-quality analysis result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQualityReport {
    pub findings: Vec<QualityFinding>,
    pub domains_evaluated: Vec<String>,
}

/// Evidence lookup result for a single named pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceReport {
    pub drug_a: String,
    pub drug_b: String,
    /// `None` means unknown — absence of evidence, not evidence of absence.
    pub record: Option<InteractionRecord>,
    pub notes: Vec<String>,
}

/// Ranked substitute therapies for a flagged pair member.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativesReport {
    pub for_drug: String,
    pub with_drug: String,
    pub suggestions: Vec<AlternativeSuggestion>,
}

/// Closed union of analysis results, one variant per analysis type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AnalysisReport {
    Ddi(DdiReport),
    Pgx(PgxReport),
    DataQuality(DataQualityReport),
    Evidence(EvidenceReport),
}

/// Envelope returned for every completed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOutcome {
    pub request_id: Uuid,
    pub patient_id: String,
    pub completed_at: NaiveDateTime,
    pub processing_time_ms: u64,
    pub report: AnalysisReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_names_the_field() {
        let err = AnalysisError::validation("medications", "at least one medication is required");
        assert_eq!(
            err.to_string(),
            "Invalid request: medications: at least one medication is required"
        );
    }

    #[test]
    fn ddi_report_serializes_wire_field_names() {
        let report = DdiReport {
            overall_risk_level: RiskLevel::High,
            per_pair_interactions: vec![],
            confidence: Confidence::Medium,
            notes: vec![],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["overallRiskLevel"], "high");
        assert!(json["perPairInteractions"].is_array());
    }
}
