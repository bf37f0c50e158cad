use serde::{Deserialize, Serialize};

use crate::config::BEST_SCORE_GATE;

use super::enums::FormularyStatus;
use super::pgx::GenePhenotype;

/// A substitute therapy proposed for a flagged medication.
///
/// `best` is a hard gate on BOTH component scores, never on the composite:
/// a high-efficacy/low-safety candidate is never marked best. Construct
/// through [`AlternativeSuggestion::scored`] so the gate holds by
/// construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeSuggestion {
    pub name: String,
    pub drug_class: String,
    pub safety_score: u8,
    pub efficacy_score: u8,
    /// Composite: `safety_score + efficacy_score`.
    pub score: u16,
    pub best: bool,
    pub formulary: FormularyStatus,
}

impl AlternativeSuggestion {
    pub fn scored(
        name: impl Into<String>,
        drug_class: impl Into<String>,
        safety_score: u8,
        efficacy_score: u8,
        formulary: FormularyStatus,
    ) -> Self {
        Self {
            name: name.into(),
            drug_class: drug_class.into(),
            safety_score,
            efficacy_score,
            score: u16::from(safety_score) + u16::from(efficacy_score),
            best: safety_score >= BEST_SCORE_GATE && efficacy_score >= BEST_SCORE_GATE,
            formulary,
        }
    }
}

/// Patient facts the alternative ranker may condition on.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PatientContext {
    pub phenotypes: Vec<GenePhenotype>,
}

impl PatientContext {
    pub fn has_phenotype(&self, gene: &str, phenotype: crate::models::Phenotype) -> bool {
        self.phenotypes
            .iter()
            .any(|p| p.gene.eq_ignore_ascii_case(gene) && p.phenotype == phenotype)
    }
}
