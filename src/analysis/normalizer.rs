use std::sync::LazyLock;

use futures_util::future::join_all;
use regex::Regex;

use crate::db::DrugStore;
use crate::models::{MedicationReference, NormalizedDrug};

/// Trailing dose/strength tokens in free-text names ("aspirin 81 mg EC").
static RE_DOSE_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+\d+(\.\d+)?\s*(mg|mcg|g|ml|units?|iu)\b.*$").unwrap()
});

/// Resolve one reference against the directory, falling back to the
/// lowercase-trimmed name. A directory error degrades to the fallback and
/// returns a soft warning; it never aborts the request.
pub async fn normalize_reference(
    store: &dyn DrugStore,
    reference: &MedicationReference,
) -> (NormalizedDrug, Option<String>) {
    let query = reference.name.trim();

    match store.lookup_alias(query).await {
        Ok(Some(alias)) => (
            NormalizedDrug {
                original: reference.clone(),
                canonical_name: alias.canonical_name,
                canonical_code: alias.canonical_code,
            },
            None,
        ),
        Ok(None) => (fallback(reference), None),
        Err(err) => {
            tracing::warn!(
                drug = query,
                error = %err,
                "drug directory lookup failed; using literal name"
            );
            (
                fallback(reference),
                Some(format!(
                    "drug directory unavailable while normalizing \"{query}\"; matched by literal name only"
                )),
            )
        }
    }
}

/// Normalize a medication list. Lookups are independent and run
/// concurrently; output order follows input order.
pub async fn normalize_all(
    store: &dyn DrugStore,
    references: &[MedicationReference],
) -> (Vec<NormalizedDrug>, Vec<String>) {
    let resolved = join_all(
        references
            .iter()
            .map(|reference| normalize_reference(store, reference)),
    )
    .await;

    let mut drugs = Vec::with_capacity(resolved.len());
    let mut warnings = Vec::new();
    for (drug, warning) in resolved {
        drugs.push(drug);
        warnings.extend(warning);
    }
    (drugs, warnings)
}

fn fallback(reference: &MedicationReference) -> NormalizedDrug {
    let lowered = reference.name.trim().to_lowercase();
    let stripped = RE_DOSE_SUFFIX.replace(&lowered, "").trim().to_string();
    NormalizedDrug {
        original: reference.clone(),
        canonical_name: if stripped.is_empty() { lowered } else { stripped },
        canonical_code: None,
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::db::{DrugAlias, InMemoryStore, InteractionRow, StoreError};

    /// Directory whose lookups always fail (collaborator outage).
    struct OutageStore;

    #[async_trait]
    impl DrugStore for OutageStore {
        async fn lookup_alias(&self, _name: &str) -> Result<Option<DrugAlias>, StoreError> {
            Err(StoreError::Unavailable("directory offline".into()))
        }

        async fn lookup_interaction(
            &self,
            _code_a: &str,
            _code_b: &str,
        ) -> Result<Option<InteractionRow>, StoreError> {
            Err(StoreError::Unavailable("directory offline".into()))
        }

        async fn lookup_interaction_by_name(
            &self,
            _name_a: &str,
            _name_b: &str,
        ) -> Result<Option<InteractionRow>, StoreError> {
            Err(StoreError::Unavailable("directory offline".into()))
        }
    }

    #[tokio::test]
    async fn directory_match_carries_code() {
        let store = InMemoryStore::with_test_data();
        let (drug, warning) =
            normalize_reference(&store, &MedicationReference::named("Coumadin")).await;
        assert_eq!(drug.canonical_name, "warfarin");
        assert_eq!(drug.canonical_code.as_deref(), Some("11289"));
        assert!(warning.is_none());
    }

    #[tokio::test]
    async fn no_match_falls_back_to_lowercase_trim() {
        let store = InMemoryStore::with_test_data();
        let (drug, warning) =
            normalize_reference(&store, &MedicationReference::named("  ContrastMedia  ")).await;
        assert_eq!(drug.canonical_name, "contrastmedia");
        assert!(drug.canonical_code.is_none());
        assert!(warning.is_none());
    }

    #[tokio::test]
    async fn fallback_strips_dose_suffix() {
        let store = InMemoryStore::new();
        let (drug, _) =
            normalize_reference(&store, &MedicationReference::named("Enzalutamide 40 mg caps"))
                .await;
        assert_eq!(drug.canonical_name, "enzalutamide");
    }

    #[tokio::test]
    async fn directory_outage_degrades_with_warning() {
        let (drug, warning) =
            normalize_reference(&OutageStore, &MedicationReference::named("Warfarin")).await;
        assert_eq!(drug.canonical_name, "warfarin");
        assert!(drug.canonical_code.is_none());
        assert!(warning.unwrap().contains("directory unavailable"));
    }

    #[tokio::test]
    async fn normalize_all_preserves_input_order() {
        let store = InMemoryStore::with_test_data();
        let refs = vec![
            MedicationReference::named("Tylenol"),
            MedicationReference::named("Coumadin"),
            MedicationReference::named("oxaliplatin"),
        ];
        let (drugs, warnings) = normalize_all(&store, &refs).await;
        let names: Vec<&str> = drugs.iter().map(|d| d.canonical_name.as_str()).collect();
        assert_eq!(names, vec!["acetaminophen", "warfarin", "oxaliplatin"]);
        assert!(warnings.is_empty());
    }
}
