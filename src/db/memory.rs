use std::collections::HashMap;

use async_trait::async_trait;

use super::store::{DrugAlias, DrugStore, InteractionRow};
use super::StoreError;

/// HashMap-backed store for tests and bundled fixtures.
///
/// Keys are lowercased at insert time; interactions are stored under the
/// pair as given (the resolver queries both orders).
#[derive(Default)]
pub struct InMemoryStore {
    aliases: HashMap<String, DrugAlias>,
    cache: HashMap<(String, String), InteractionRow>,
    curated: HashMap<(String, String), InteractionRow>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an alias (and the canonical name itself) for a drug.
    pub fn with_alias(
        mut self,
        alias: &str,
        canonical_name: &str,
        canonical_code: Option<&str>,
    ) -> Self {
        let entry = DrugAlias {
            canonical_name: canonical_name.to_lowercase(),
            canonical_code: canonical_code.map(str::to_string),
        };
        self.aliases
            .insert(canonical_name.to_lowercase(), entry.clone());
        self.aliases.insert(alias.to_lowercase(), entry);
        self
    }

    /// Seed a cache-tier row keyed by canonical code pair.
    pub fn with_cached_interaction(mut self, code_a: &str, code_b: &str, row: InteractionRow) -> Self {
        self.cache
            .insert((code_a.to_lowercase(), code_b.to_lowercase()), row);
        self
    }

    /// Seed a curated-tier row keyed by canonical name pair.
    pub fn with_curated_interaction(
        mut self,
        name_a: &str,
        name_b: &str,
        row: InteractionRow,
    ) -> Self {
        self.curated
            .insert((name_a.to_lowercase(), name_b.to_lowercase()), row);
        self
    }

    /// Store seeded with the fixture set used across the test suite
    /// (no file or network I/O).
    pub fn with_test_data() -> Self {
        Self::new()
            .with_alias("Coumadin", "warfarin", Some("11289"))
            .with_alias("warfarin sodium", "warfarin", Some("11289"))
            .with_alias("Tylenol", "acetaminophen", Some("161"))
            .with_alias("paracetamol", "acetaminophen", Some("161"))
            .with_alias("Glucophage", "metformin", Some("6809"))
            .with_alias("aspirin", "aspirin", Some("1191"))
            .with_alias("codeine", "codeine", Some("2670"))
            .with_alias("Xeloda", "capecitabine", Some("194000"))
            .with_curated_interaction(
                "warfarin",
                "aspirin",
                InteractionRow {
                    drug_a: "warfarin".into(),
                    drug_b: "aspirin".into(),
                    severity: "major".into(),
                    mechanism: Some(
                        "additive anticoagulant and antiplatelet effect increases bleeding risk"
                            .into(),
                    ),
                    recommendation: Some(
                        "avoid combination; if unavoidable, monitor INR closely".into(),
                    ),
                    evidence_level: Some("established".into()),
                    citations: vec!["Hansten & Horn, Drug Interactions Analysis".into()],
                },
            )
    }
}

#[async_trait]
impl DrugStore for InMemoryStore {
    async fn lookup_alias(&self, name: &str) -> Result<Option<DrugAlias>, StoreError> {
        Ok(self.aliases.get(&name.trim().to_lowercase()).cloned())
    }

    async fn lookup_interaction(
        &self,
        code_a: &str,
        code_b: &str,
    ) -> Result<Option<InteractionRow>, StoreError> {
        let key = (code_a.to_lowercase(), code_b.to_lowercase());
        Ok(self.cache.get(&key).cloned())
    }

    async fn lookup_interaction_by_name(
        &self,
        name_a: &str,
        name_b: &str,
    ) -> Result<Option<InteractionRow>, StoreError> {
        let key = (name_a.to_lowercase(), name_b.to_lowercase());
        Ok(self.curated.get(&key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn alias_lookup_is_case_insensitive() {
        let store = InMemoryStore::with_test_data();
        let hit = store.lookup_alias("  COUMADIN ").await.unwrap().unwrap();
        assert_eq!(hit.canonical_name, "warfarin");
        assert_eq!(hit.canonical_code.as_deref(), Some("11289"));
    }

    #[tokio::test]
    async fn canonical_name_resolves_to_itself() {
        let store = InMemoryStore::with_test_data();
        let hit = store.lookup_alias("warfarin").await.unwrap().unwrap();
        assert_eq!(hit.canonical_name, "warfarin");
    }

    #[tokio::test]
    async fn unknown_alias_returns_none() {
        let store = InMemoryStore::with_test_data();
        assert!(store.lookup_alias("not-a-drug").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn curated_lookup_matches_stored_order_only() {
        let store = InMemoryStore::with_test_data();
        assert!(store
            .lookup_interaction_by_name("warfarin", "aspirin")
            .await
            .unwrap()
            .is_some());
        // Reverse order is the resolver's job, not the store's.
        assert!(store
            .lookup_interaction_by_name("aspirin", "warfarin")
            .await
            .unwrap()
            .is_none());
    }
}
