use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::StoreError;

/// A directory match for a free-text drug name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DrugAlias {
    pub canonical_name: String,
    pub canonical_code: Option<String>,
}

/// A raw interaction row as stored by the collaborator. Severity stays a
/// string here; the resolver parses it and rejects malformed rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionRow {
    pub drug_a: String,
    pub drug_b: String,
    pub severity: String,
    pub mechanism: Option<String>,
    pub recommendation: Option<String>,
    pub evidence_level: Option<String>,
    #[serde(default)]
    pub citations: Vec<String>,
}

/// Read-only lookup capability the analysis core depends on.
///
/// Lookups match the argument order as given; querying both orders of a
/// pair is the resolver's responsibility. All name matching is
/// case-insensitive.
#[async_trait]
pub trait DrugStore: Send + Sync {
    /// Match a free-text name against the alias and canonical-name columns.
    async fn lookup_alias(&self, name: &str) -> Result<Option<DrugAlias>, StoreError>;

    /// Cache-tier lookup by canonical code pair.
    async fn lookup_interaction(
        &self,
        code_a: &str,
        code_b: &str,
    ) -> Result<Option<InteractionRow>, StoreError>;

    /// Curated-tier lookup by canonical substance name pair.
    async fn lookup_interaction_by_name(
        &self,
        name_a: &str,
        name_b: &str,
    ) -> Result<Option<InteractionRow>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Verify the trait is object-safe (the service holds an `Arc<dyn DrugStore>`)
    #[test]
    fn drug_store_is_object_safe() {
        fn _assert(_: &dyn DrugStore) {}
    }
}
