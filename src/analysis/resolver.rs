use crate::db::{DrugStore, InteractionRow};
use crate::models::{DrugPair, InteractionRecord, SourceTier};

use super::reference::{HeuristicInteraction, ReferenceData};

/// Tiered interaction lookup: live cache by code, curated table by name,
/// bundled heuristics. Terminal on first hit; a tier that errors or
/// returns a malformed row is logged and fallen through, never surfaced.
pub struct InteractionResolver<'a> {
    store: &'a dyn DrugStore,
    reference: &'a ReferenceData,
}

impl<'a> InteractionResolver<'a> {
    pub fn new(store: &'a dyn DrugStore, reference: &'a ReferenceData) -> Self {
        Self { store, reference }
    }

    /// Resolve one pair, or `None` for "unknown". Unknown is not "no
    /// interaction": absence of evidence is not evidence of absence.
    pub async fn resolve(&self, pair: &DrugPair) -> Option<InteractionRecord> {
        if let Some(record) = self.cache_tier(pair).await {
            return Some(record);
        }
        if let Some(record) = self.curated_tier(pair).await {
            return Some(record);
        }
        if let Some(record) = self.heuristic_tier(pair) {
            return Some(record);
        }
        tracing::debug!(pair = %pair.display(), "no interaction data in any tier");
        None
    }

    async fn cache_tier(&self, pair: &DrugPair) -> Option<InteractionRecord> {
        let (first, second) = pair.ordered();
        let (code_a, code_b) = match (&first.canonical_code, &second.canonical_code) {
            (Some(a), Some(b)) => (a.as_str(), b.as_str()),
            // Without both codes the cache cannot be keyed; not a degradation.
            _ => return None,
        };

        for (x, y) in [(code_a, code_b), (code_b, code_a)] {
            match self.store.lookup_interaction(x, y).await {
                Ok(Some(row)) => {
                    if let Some(record) = build_record(pair, &row, SourceTier::Cache) {
                        return Some(record);
                    }
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(
                        pair = %pair.display(),
                        error = %err,
                        "cache tier unavailable; falling through to curated table"
                    );
                    break;
                }
            }
        }
        None
    }

    async fn curated_tier(&self, pair: &DrugPair) -> Option<InteractionRecord> {
        let (first, second) = pair.ordered();
        let name_a = first.canonical_name.as_str();
        let name_b = second.canonical_name.as_str();

        for (x, y) in [(name_a, name_b), (name_b, name_a)] {
            match self.store.lookup_interaction_by_name(x, y).await {
                Ok(Some(row)) => {
                    if let Some(record) = build_record(pair, &row, SourceTier::Curated) {
                        return Some(record);
                    }
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(
                        pair = %pair.display(),
                        error = %err,
                        "curated tier unavailable; falling through to heuristics"
                    );
                    break;
                }
            }
        }
        None
    }

    fn heuristic_tier(&self, pair: &DrugPair) -> Option<InteractionRecord> {
        let (first, second) = pair.ordered();
        let entry = self
            .reference
            .lookup_heuristic(&first.canonical_name, &second.canonical_name)?;

        tracing::debug!(
            pair = %pair.display(),
            "resolved from heuristic table; confidence capped at low"
        );
        Some(record_from_heuristic(pair, entry))
    }
}

/// Convert a store row into a record, or `None` (with a warning) when the
/// row is malformed. Drug names are emitted in the pair's symmetric key
/// order so `(A,B)` and `(B,A)` produce identical records.
fn build_record(
    pair: &DrugPair,
    row: &InteractionRow,
    tier: SourceTier,
) -> Option<InteractionRecord> {
    let severity = match row.severity.parse() {
        Ok(severity) => severity,
        Err(err) => {
            tracing::warn!(
                pair = %pair.display(),
                tier = tier.as_str(),
                error = %err,
                "discarding malformed interaction row"
            );
            return None;
        }
    };

    let (first, second) = pair.ordered();
    Some(InteractionRecord {
        drug_a: first.canonical_name.clone(),
        drug_b: second.canonical_name.clone(),
        severity,
        mechanism: row.mechanism.clone(),
        recommendation: row.recommendation.clone(),
        evidence_level: row
            .evidence_level
            .clone()
            .unwrap_or_else(|| "unspecified".into()),
        citations: row.citations.clone(),
        source_tier: tier,
        confidence: tier.confidence(),
    })
}

fn record_from_heuristic(pair: &DrugPair, entry: &HeuristicInteraction) -> InteractionRecord {
    let (first, second) = pair.ordered();
    let mechanism = match &entry.effect {
        Some(effect) => format!("{}; {}", entry.mechanism, effect),
        None => entry.mechanism.clone(),
    };
    InteractionRecord {
        drug_a: first.canonical_name.clone(),
        drug_b: second.canonical_name.clone(),
        severity: entry.severity,
        mechanism: Some(mechanism),
        recommendation: Some(entry.management.clone()),
        evidence_level: entry.evidence_level.clone(),
        citations: entry.sources.clone(),
        source_tier: SourceTier::Heuristic,
        confidence: SourceTier::Heuristic.confidence(),
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::db::{DrugAlias, InMemoryStore, StoreError};
    use crate::models::{Confidence, MedicationReference, NormalizedDrug, Severity};

    fn drug(name: &str, code: Option<&str>) -> NormalizedDrug {
        NormalizedDrug {
            original: MedicationReference::named(name),
            canonical_name: name.into(),
            canonical_code: code.map(str::to_string),
        }
    }

    fn row(a: &str, b: &str, severity: &str) -> InteractionRow {
        InteractionRow {
            drug_a: a.into(),
            drug_b: b.into(),
            severity: severity.into(),
            mechanism: Some("test mechanism".into()),
            recommendation: Some("test recommendation".into()),
            evidence_level: Some("established".into()),
            citations: vec!["test citation".into()],
        }
    }

    #[tokio::test]
    async fn resolves_symmetrically_at_every_tier() {
        let store = InMemoryStore::new()
            .with_cached_interaction("11289", "1191", row("warfarin", "aspirin", "major"));
        let reference = ReferenceData::bundled().unwrap();
        let resolver = InteractionResolver::new(&store, &reference);

        let warfarin = drug("warfarin", Some("11289"));
        let aspirin = drug("aspirin", Some("1191"));

        let ab = resolver
            .resolve(&DrugPair::new(warfarin.clone(), aspirin.clone()))
            .await
            .unwrap();
        let ba = resolver
            .resolve(&DrugPair::new(aspirin, warfarin))
            .await
            .unwrap();

        assert_eq!(ab, ba);
        assert_eq!(ab.source_tier, SourceTier::Cache);
        assert_eq!(ab.drug_a, "aspirin");
        assert_eq!(ab.drug_b, "warfarin");
    }

    #[tokio::test]
    async fn cache_tier_shadows_curated_tier() {
        let store = InMemoryStore::new()
            .with_cached_interaction("11289", "1191", row("warfarin", "aspirin", "moderate"))
            .with_curated_interaction("warfarin", "aspirin", row("warfarin", "aspirin", "major"));
        let reference = ReferenceData::bundled().unwrap();
        let resolver = InteractionResolver::new(&store, &reference);

        let record = resolver
            .resolve(&DrugPair::new(
                drug("warfarin", Some("11289")),
                drug("aspirin", Some("1191")),
            ))
            .await
            .unwrap();

        assert_eq!(record.source_tier, SourceTier::Cache);
        assert_eq!(record.severity, Severity::Moderate);
        assert_eq!(record.confidence, Confidence::High);
    }

    #[tokio::test]
    async fn curated_tier_tries_both_orders() {
        // Stored as (aspirin, warfarin); queried via key order then reversed.
        let store = InMemoryStore::new()
            .with_curated_interaction("warfarin", "aspirin", row("warfarin", "aspirin", "major"));
        let reference = ReferenceData::bundled().unwrap();
        let resolver = InteractionResolver::new(&store, &reference);

        let record = resolver
            .resolve(&DrugPair::new(drug("aspirin", None), drug("warfarin", None)))
            .await
            .unwrap();
        assert_eq!(record.source_tier, SourceTier::Curated);
        assert_eq!(record.confidence, Confidence::Medium);
    }

    #[tokio::test]
    async fn falls_back_to_heuristic_table_and_flags_it() {
        let store = InMemoryStore::new();
        let reference = ReferenceData::bundled().unwrap();
        let resolver = InteractionResolver::new(&store, &reference);

        let record = resolver
            .resolve(&DrugPair::new(
                drug("metformin", None),
                drug("contrastmedia", None),
            ))
            .await
            .unwrap();

        assert_eq!(record.source_tier, SourceTier::Heuristic);
        assert_eq!(record.severity, Severity::Major);
        assert_eq!(record.confidence, Confidence::Low);
        assert!(!record.citations.is_empty());
    }

    #[tokio::test]
    async fn unknown_pair_resolves_to_none() {
        let store = InMemoryStore::new();
        let reference = ReferenceData::bundled().unwrap();
        let resolver = InteractionResolver::new(&store, &reference);

        let resolved = resolver
            .resolve(&DrugPair::new(
                drug("acetaminophen", None),
                drug("oxaliplatin", None),
            ))
            .await;
        assert!(resolved.is_none());
    }

    /// Cache tier errors, curated tier answers: the outage is invisible
    /// except through the lower-tier confidence.
    struct CacheOutageStore {
        curated: InMemoryStore,
    }

    #[async_trait]
    impl DrugStore for CacheOutageStore {
        async fn lookup_alias(&self, name: &str) -> Result<Option<DrugAlias>, StoreError> {
            self.curated.lookup_alias(name).await
        }

        async fn lookup_interaction(
            &self,
            _code_a: &str,
            _code_b: &str,
        ) -> Result<Option<InteractionRow>, StoreError> {
            Err(StoreError::Unavailable("cache offline".into()))
        }

        async fn lookup_interaction_by_name(
            &self,
            name_a: &str,
            name_b: &str,
        ) -> Result<Option<InteractionRow>, StoreError> {
            self.curated.lookup_interaction_by_name(name_a, name_b).await
        }
    }

    #[tokio::test]
    async fn cache_outage_falls_through_to_curated() {
        let store = CacheOutageStore {
            curated: InMemoryStore::new().with_curated_interaction(
                "warfarin",
                "aspirin",
                row("warfarin", "aspirin", "major"),
            ),
        };
        let reference = ReferenceData::bundled().unwrap();
        let resolver = InteractionResolver::new(&store, &reference);

        let record = resolver
            .resolve(&DrugPair::new(
                drug("warfarin", Some("11289")),
                drug("aspirin", Some("1191")),
            ))
            .await
            .unwrap();
        assert_eq!(record.source_tier, SourceTier::Curated);
    }

    #[tokio::test]
    async fn malformed_severity_row_is_discarded_not_fatal() {
        let store = InMemoryStore::new()
            .with_cached_interaction("11289", "1191", row("warfarin", "aspirin", "catastrophic"))
            .with_curated_interaction("warfarin", "aspirin", row("warfarin", "aspirin", "major"));
        let reference = ReferenceData::bundled().unwrap();
        let resolver = InteractionResolver::new(&store, &reference);

        let record = resolver
            .resolve(&DrugPair::new(
                drug("warfarin", Some("11289")),
                drug("aspirin", Some("1191")),
            ))
            .await
            .unwrap();
        // The malformed cache row is skipped; the curated row answers.
        assert_eq!(record.source_tier, SourceTier::Curated);
        assert_eq!(record.severity, Severity::Major);
    }
}
