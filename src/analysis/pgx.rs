use crate::models::{GenePhenotype, GenotypeResult, NormalizedDrug, PgxRecommendation};

use super::reference::ReferenceData;

/// Outcome of phenotype mapping: settled classifications plus the gaps —
/// genes the evaluation could not classify. Gaps are surfaced, never
/// silently dropped; downstream they are a data-quality signal.
#[derive(Debug, Clone, Default)]
pub struct MappedPhenotypes {
    pub genes_evaluated: Vec<String>,
    pub resolved: Vec<GenePhenotype>,
    pub gaps: Vec<String>,
}

/// Fill absent phenotypes from the deterministic rule table. A reported
/// phenotype is trusted as-is; inference applies only where the lab left
/// the classification open.
pub fn map_phenotypes(results: &[GenotypeResult], reference: &ReferenceData) -> MappedPhenotypes {
    let mut mapped = MappedPhenotypes::default();

    for result in results {
        let gene = result.gene.trim().to_uppercase();
        if gene.is_empty() {
            mapped.gaps.push("genotype result without a gene symbol".into());
            continue;
        }
        mapped.genes_evaluated.push(gene.clone());

        if let Some(phenotype) = result.phenotype {
            mapped.resolved.push(GenePhenotype {
                gene,
                phenotype,
            });
            continue;
        }

        match &result.genotype {
            Some(genotype) => match reference.infer_phenotype(&gene, genotype) {
                Some(phenotype) => {
                    tracing::debug!(gene = %gene, genotype = %genotype, phenotype = phenotype.as_str(), "phenotype inferred");
                    mapped.resolved.push(GenePhenotype { gene, phenotype });
                }
                None => mapped.gaps.push(format!(
                    "{gene}: no phenotype rule for genotype {genotype}; classification unresolved"
                )),
            },
            None => mapped
                .gaps
                .push(format!("{gene}: neither genotype nor phenotype reported")),
        }
    }

    mapped
}

/// Emit per-drug guidance for every actionable (drug, gene, phenotype)
/// combination. Medications and genes are evaluated independently; the
/// result is not deduplicated. Every recommendation carries a citation by
/// construction.
pub fn recommend(
    medications: &[NormalizedDrug],
    phenotypes: &[GenePhenotype],
    reference: &ReferenceData,
) -> Vec<PgxRecommendation> {
    let mut recommendations = Vec::new();

    for medication in medications {
        for observed in phenotypes {
            if let Some(rule) =
                reference.pgx_rule(&medication.canonical_name, &observed.gene, observed.phenotype)
            {
                recommendations.push(PgxRecommendation::cited(
                    medication.canonical_name.clone(),
                    observed.gene.clone(),
                    observed.phenotype,
                    rule.action,
                    rule.rationale.clone(),
                    rule.citations.clone(),
                ));
            }
        }
    }

    recommendations
}
