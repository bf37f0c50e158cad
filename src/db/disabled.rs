use async_trait::async_trait;

use super::store::{DrugAlias, DrugStore, InteractionRow};
use super::StoreError;

/// Store stand-in for deployments without a knowledge service.
/// Every lookup misses, so analysis runs on bundled heuristics alone.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledStore;

#[async_trait]
impl DrugStore for DisabledStore {
    async fn lookup_alias(&self, _name: &str) -> Result<Option<DrugAlias>, StoreError> {
        Ok(None)
    }

    async fn lookup_interaction(
        &self,
        _code_a: &str,
        _code_b: &str,
    ) -> Result<Option<InteractionRow>, StoreError> {
        Ok(None)
    }

    async fn lookup_interaction_by_name(
        &self,
        _name_a: &str,
        _name_b: &str,
    ) -> Result<Option<InteractionRow>, StoreError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_lookup_misses() {
        let store = DisabledStore;
        assert!(store.lookup_alias("warfarin").await.unwrap().is_none());
        assert!(store
            .lookup_interaction("11289", "1191")
            .await
            .unwrap()
            .is_none());
        assert!(store
            .lookup_interaction_by_name("warfarin", "aspirin")
            .await
            .unwrap()
            .is_none());
    }
}
