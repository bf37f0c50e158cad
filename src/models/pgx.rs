use serde::{Deserialize, Serialize};

use super::enums::{Phenotype, PgxAction};

/// A genotype observation for one gene, as reported by the testing lab.
/// `phenotype` may be absent (a data gap); the mapper fills it when a
/// deterministic rule exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GenotypeResult {
    pub gene: String,
    pub genotype: Option<String>,
    pub phenotype: Option<Phenotype>,
}

impl GenotypeResult {
    pub fn observed(gene: impl Into<String>, genotype: impl Into<String>) -> Self {
        Self {
            gene: gene.into(),
            genotype: Some(genotype.into()),
            phenotype: None,
        }
    }
}

/// A gene with a settled phenotype classification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GenePhenotype {
    pub gene: String,
    pub phenotype: Phenotype,
}

/// Actionable pharmacogenomic guidance for one medication.
///
/// Construct through [`PgxRecommendation::cited`]; a recommendation without
/// a citation is a rule-authoring defect, not a presentable result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PgxRecommendation {
    pub drug_name: String,
    pub gene: String,
    pub phenotype: Phenotype,
    pub action: PgxAction,
    pub rationale: String,
    pub citations: Vec<String>,
}

impl PgxRecommendation {
    /// Build a recommendation, asserting the citation invariant.
    pub fn cited(
        drug_name: impl Into<String>,
        gene: impl Into<String>,
        phenotype: Phenotype,
        action: PgxAction,
        rationale: impl Into<String>,
        citations: Vec<String>,
    ) -> Self {
        assert!(
            !citations.is_empty(),
            "pharmacogenomic recommendation emitted without a citation"
        );
        Self {
            drug_name: drug_name.into(),
            gene: gene.into(),
            phenotype,
            action,
            rationale: rationale.into(),
            citations,
        }
    }
}

/// Summary of what the PGx evaluation covered and where data was missing.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PgxOverview {
    pub genes_evaluated: Vec<String>,
    pub phenotypes: Vec<GenePhenotype>,
    pub gaps: Vec<String>,
}
