use crate::models::{AlternativeSuggestion, FormularyStatus, PatientContext};

use super::reference::ReferenceData;

/// Rank substitute therapies for `for_drug`, flagged in combination with
/// `with_drug`. Candidates contraindicated for a known patient phenotype
/// are excluded before scoring, not down-ranked; the pair partner itself
/// is never proposed. Result is sorted by composite score, best first.
pub fn rank(
    for_drug: &str,
    with_drug: &str,
    context: &PatientContext,
    reference: &ReferenceData,
) -> Vec<AlternativeSuggestion> {
    let mut suggestions: Vec<AlternativeSuggestion> = reference
        .alternatives_for(for_drug)
        .into_iter()
        .filter(|candidate| !candidate.name.eq_ignore_ascii_case(with_drug))
        .filter(|candidate| {
            let contraindicated = candidate
                .avoid_phenotypes
                .iter()
                .any(|gp| context.has_phenotype(&gp.gene, gp.phenotype));
            if contraindicated {
                tracing::debug!(
                    candidate = %candidate.name,
                    for_drug,
                    "alternative excluded by patient phenotype"
                );
            }
            !contraindicated
        })
        .map(|candidate| {
            AlternativeSuggestion::scored(
                candidate.name.clone(),
                candidate.drug_class.clone(),
                candidate.safety_score,
                candidate.efficacy_score,
                candidate.formulary,
            )
        })
        .collect();

    suggestions.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.name.cmp(&b.name)));
    suggestions
}

/// Visibility filter on formulary status. Scores and the best flag pass
/// through untouched; coverage never changes the clinical ranking.
pub fn filter_likely_covered(suggestions: &[AlternativeSuggestion]) -> Vec<AlternativeSuggestion> {
    suggestions
        .iter()
        .filter(|s| s.formulary == FormularyStatus::LikelyCovered)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GenePhenotype, Phenotype};

    fn reference() -> ReferenceData {
        ReferenceData::bundled().unwrap()
    }

    #[test]
    fn ranks_by_composite_score_descending() {
        let suggestions = rank("warfarin", "aspirin", &PatientContext::default(), &reference());
        assert!(!suggestions.is_empty());
        for window in suggestions.windows(2) {
            assert!(window[0].score >= window[1].score);
        }
    }

    #[test]
    fn best_gate_requires_both_dimensions() {
        let suggestions = rank("warfarin", "aspirin", &PatientContext::default(), &reference());
        for s in &suggestions {
            assert_eq!(s.best, s.safety_score >= 90 && s.efficacy_score >= 90);
        }
        // apixaban (94/92) passes; rivaroxaban (89/91) must not.
        let apixaban = suggestions.iter().find(|s| s.name == "apixaban").unwrap();
        assert!(apixaban.best);
        let rivaroxaban = suggestions.iter().find(|s| s.name == "rivaroxaban").unwrap();
        assert!(!rivaroxaban.best);
    }

    #[test]
    fn phenotype_contraindication_excludes_before_scoring() {
        let no_context = rank("aspirin", "warfarin", &PatientContext::default(), &reference());
        assert!(no_context.iter().any(|s| s.name == "clopidogrel"));

        let pm_context = PatientContext {
            phenotypes: vec![GenePhenotype {
                gene: "CYP2C19".into(),
                phenotype: Phenotype::PoorMetabolizer,
            }],
        };
        let with_context = rank("aspirin", "warfarin", &pm_context, &reference());
        assert!(
            !with_context.iter().any(|s| s.name == "clopidogrel"),
            "clopidogrel must be excluded for CYP2C19 poor metabolizers"
        );
    }

    #[test]
    fn pair_partner_is_never_proposed() {
        let suggestions = rank("ibuprofen", "acetaminophen", &PatientContext::default(), &reference());
        assert!(!suggestions.iter().any(|s| s.name == "acetaminophen"));
    }

    #[test]
    fn formulary_filter_changes_visibility_only() {
        let all = rank("warfarin", "aspirin", &PatientContext::default(), &reference());
        let covered = filter_likely_covered(&all);

        assert!(covered.len() < all.len(), "dalteparin needs prior auth");
        for kept in &covered {
            let original = all.iter().find(|s| s.name == kept.name).unwrap();
            assert_eq!(original.score, kept.score);
            assert_eq!(original.best, kept.best);
        }
    }

    #[test]
    fn unknown_drug_yields_no_suggestions() {
        let suggestions = rank("oxaliplatin", "aspirin", &PatientContext::default(), &reference());
        assert!(suggestions.is_empty());
    }
}
