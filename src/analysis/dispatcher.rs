use std::sync::Arc;
use std::time::Instant;

use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::DrugStore;
use crate::models::{
    AllergyEntry, Demographics, GenotypeResult, LabValue, MedicationReference, PatientContext,
    PgxOverview,
};

use super::aggregate::aggregate;
use super::alternatives;
use super::normalizer::normalize_all;
use super::pairs::{consolidate_formulations, enumerate_pairs};
use super::pgx::{map_phenotypes, recommend};
use super::quality::{check_allergies, check_demographics, check_labs};
use super::reference::ReferenceData;
use super::resolver::InteractionResolver;
use super::types::{
    AlternativesReport, AnalysisError, AnalysisOutcome, AnalysisReport, DataQualityReport,
    DdiReport, EvidenceReport, PgxReport,
};

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

fn default_consolidate() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DdiPayload {
    pub medications: Vec<MedicationReference>,
    #[serde(default = "default_consolidate")]
    pub consolidate: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PgxPayload {
    pub medications: Vec<MedicationReference>,
    pub genotype_results: Vec<GenotypeResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DataQualityPayload {
    pub demographics: Option<Demographics>,
    #[serde(default)]
    pub labs: Vec<LabValue>,
    #[serde(default)]
    pub allergies: Vec<AllergyEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidencePayload {
    pub drug_a: String,
    pub drug_b: String,
}

/// Closed payload union: one validated shape per analysis type. Adding a
/// type is a compile-time-visible change everywhere it is matched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "analysisType", content = "payload")]
pub enum AnalysisPayload {
    #[serde(rename = "DDI")]
    Ddi(DdiPayload),
    #[serde(rename = "DATA_QUALITY")]
    DataQuality(DataQualityPayload),
    #[serde(rename = "EVIDENCE")]
    Evidence(EvidencePayload),
    #[serde(rename = "PGX")]
    Pgx(PgxPayload),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub patient_id: String,
    #[serde(flatten)]
    pub payload: AnalysisPayload,
}

// ---------------------------------------------------------------------------
// AnalysisService
// ---------------------------------------------------------------------------

/// The dispatch surface of the analysis core. Owns no business rules
/// itself: shape validation, then component composition.
pub struct AnalysisService {
    store: Arc<dyn DrugStore>,
    reference: ReferenceData,
}

impl AnalysisService {
    pub fn new(store: Arc<dyn DrugStore>, reference: ReferenceData) -> Self {
        Self { store, reference }
    }

    /// Validate and run one analysis request.
    ///
    /// Validation failures reject the request before any component runs.
    /// Collaborator outages never fail a valid request; they degrade to
    /// fallback paths and surface as notes and reduced confidence.
    pub async fn run(&self, request: AnalysisRequest) -> Result<AnalysisOutcome, AnalysisError> {
        validate(&request)?;
        let start = Instant::now();

        let report = match &request.payload {
            AnalysisPayload::Ddi(payload) => AnalysisReport::Ddi(self.run_ddi(payload).await),
            AnalysisPayload::Pgx(payload) => AnalysisReport::Pgx(self.run_pgx(payload).await),
            AnalysisPayload::DataQuality(payload) => {
                AnalysisReport::DataQuality(run_data_quality(payload))
            }
            AnalysisPayload::Evidence(payload) => {
                AnalysisReport::Evidence(self.run_evidence(payload).await)
            }
        };

        let processing_time_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            patient_id = %request.patient_id,
            processing_ms = processing_time_ms,
            "analysis request complete"
        );

        Ok(AnalysisOutcome {
            request_id: Uuid::new_v4(),
            patient_id: request.patient_id,
            completed_at: chrono::Local::now().naive_local(),
            processing_time_ms,
            report,
        })
    }

    async fn run_ddi(&self, payload: &DdiPayload) -> DdiReport {
        let (drugs, mut notes) = normalize_all(self.store.as_ref(), &payload.medications).await;

        let drugs = if payload.consolidate {
            let (kept, merged) = consolidate_formulations(drugs);
            notes.extend(merged);
            kept
        } else {
            drugs
        };

        let pairs = enumerate_pairs(&drugs);
        if pairs.is_empty() {
            notes.push(
                "fewer than two distinct medications; no interaction analysis performed".into(),
            );
        }

        let resolver = InteractionResolver::new(self.store.as_ref(), &self.reference);
        let resolutions = join_all(pairs.iter().map(|pair| resolver.resolve(pair))).await;

        let mut records = Vec::new();
        for (pair, resolved) in pairs.iter().zip(resolutions) {
            match resolved {
                Some(record) => records.push(record),
                None => notes.push(format!(
                    "no interaction data found for {}; consult additional sources",
                    pair.display()
                )),
            }
        }

        let summary = aggregate(&records);
        tracing::info!(
            pairs = pairs.len(),
            resolved = records.len(),
            risk = summary.overall_risk_level.as_str(),
            confidence = summary.confidence.as_str(),
            "drug interaction analysis complete"
        );

        DdiReport {
            overall_risk_level: summary.overall_risk_level,
            per_pair_interactions: records,
            confidence: summary.confidence,
            notes,
        }
    }

    async fn run_pgx(&self, payload: &PgxPayload) -> PgxReport {
        let (medications, warnings) =
            normalize_all(self.store.as_ref(), &payload.medications).await;
        for warning in &warnings {
            tracing::warn!(warning = %warning, "degraded normalization during PGx analysis");
        }

        let mapped = map_phenotypes(&payload.genotype_results, &self.reference);
        let recommendations = recommend(&medications, &mapped.resolved, &self.reference);

        tracing::info!(
            genes = mapped.genes_evaluated.len(),
            gaps = mapped.gaps.len(),
            recommendations = recommendations.len(),
            "pharmacogenomic analysis complete"
        );

        PgxReport {
            pgx_overview: PgxOverview {
                genes_evaluated: mapped.genes_evaluated,
                phenotypes: mapped.resolved,
                gaps: mapped.gaps,
            },
            per_drug_recommendations: recommendations,
        }
    }

    async fn run_evidence(&self, payload: &EvidencePayload) -> EvidenceReport {
        let references = [
            MedicationReference::named(payload.drug_a.trim()),
            MedicationReference::named(payload.drug_b.trim()),
        ];
        let (drugs, mut notes) = normalize_all(self.store.as_ref(), &references).await;

        let pair = crate::models::DrugPair::new(drugs[0].clone(), drugs[1].clone());
        let resolver = InteractionResolver::new(self.store.as_ref(), &self.reference);
        let record = resolver.resolve(&pair).await;

        match &record {
            Some(record) => notes.push(format!(
                "evidence resolved from the {} tier ({})",
                record.source_tier.as_str(),
                record.evidence_level
            )),
            None => notes.push(format!(
                "no interaction evidence found for {}; consult additional sources",
                pair.display()
            )),
        }

        let (first, second) = pair.ordered();
        EvidenceReport {
            drug_a: first.canonical_name.clone(),
            drug_b: second.canonical_name.clone(),
            record,
            notes,
        }
    }

    /// Rank substitute therapies for one member of a flagged pair.
    pub fn rank_alternatives(
        &self,
        for_drug: &str,
        with_drug: &str,
        context: &PatientContext,
    ) -> AlternativesReport {
        AlternativesReport {
            for_drug: for_drug.to_lowercase(),
            with_drug: with_drug.to_lowercase(),
            suggestions: alternatives::rank(for_drug, with_drug, context, &self.reference),
        }
    }
}

fn run_data_quality(payload: &DataQualityPayload) -> DataQualityReport {
    let mut findings = Vec::new();
    let mut domains_evaluated = Vec::new();

    if let Some(demographics) = &payload.demographics {
        domains_evaluated.push("demographics".to_string());
        findings.extend(check_demographics(demographics));
    }
    if !payload.labs.is_empty() {
        domains_evaluated.push("labs".to_string());
        findings.extend(check_labs(&payload.labs));
    }
    if !payload.allergies.is_empty() {
        domains_evaluated.push("allergies".to_string());
        findings.extend(check_allergies(&payload.allergies));
    }

    DataQualityReport {
        findings,
        domains_evaluated,
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(request: &AnalysisRequest) -> Result<(), AnalysisError> {
    if request.patient_id.trim().is_empty() {
        return Err(AnalysisError::validation(
            "patientId",
            "a patient identifier is required",
        ));
    }

    match &request.payload {
        AnalysisPayload::Ddi(payload) => {
            if payload.medications.is_empty() {
                return Err(AnalysisError::validation(
                    "payload.medications",
                    "at least one medication is required",
                ));
            }
            validate_medication_names(&payload.medications)?;
        }
        AnalysisPayload::Pgx(payload) => {
            if payload.medications.is_empty() {
                return Err(AnalysisError::validation(
                    "payload.medications",
                    "at least one medication is required",
                ));
            }
            validate_medication_names(&payload.medications)?;
            if payload.genotype_results.is_empty() {
                return Err(AnalysisError::validation(
                    "payload.genotypeResults",
                    "at least one genotype result is required",
                ));
            }
        }
        AnalysisPayload::Evidence(payload) => {
            if payload.drug_a.trim().is_empty() {
                return Err(AnalysisError::validation("payload.drugA", "a drug name is required"));
            }
            if payload.drug_b.trim().is_empty() {
                return Err(AnalysisError::validation("payload.drugB", "a drug name is required"));
            }
        }
        AnalysisPayload::DataQuality(payload) => {
            if payload.demographics.is_none()
                && payload.labs.is_empty()
                && payload.allergies.is_empty()
            {
                return Err(AnalysisError::validation(
                    "payload",
                    "at least one of demographics, labs, or allergies is required",
                ));
            }
        }
    }

    Ok(())
}

fn validate_medication_names(medications: &[MedicationReference]) -> Result<(), AnalysisError> {
    for (index, medication) in medications.iter().enumerate() {
        if medication.name.trim().is_empty() {
            return Err(AnalysisError::validation(
                "payload.medications",
                format!("medication at index {index} has an empty name"),
            ));
        }
    }
    Ok(())
}
