use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::config::REMOTE_STORE_TIMEOUT_SECS;

use super::store::{DrugAlias, DrugStore, InteractionRow};
use super::StoreError;

/// HTTP client for the platform's knowledge service.
///
/// A 404 is a lookup miss, not an error; everything else non-2xx surfaces
/// as a `StoreError` so the resolver can fall through to the next tier.
pub struct RemoteStore {
    base_url: String,
    client: reqwest::Client,
}

impl RemoteStore {
    pub fn new(base_url: impl Into<String>) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REMOTE_STORE_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn get_optional<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<T>, StoreError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.get(&url).query(query).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = response.error_for_status()?.json::<T>().await?;
        Ok(Some(body))
    }
}

#[async_trait]
impl DrugStore for RemoteStore {
    async fn lookup_alias(&self, name: &str) -> Result<Option<DrugAlias>, StoreError> {
        self.get_optional("/v1/drugs/alias", &[("name", name.trim())])
            .await
    }

    async fn lookup_interaction(
        &self,
        code_a: &str,
        code_b: &str,
    ) -> Result<Option<InteractionRow>, StoreError> {
        self.get_optional(
            "/v1/interactions/by-code",
            &[("codeA", code_a), ("codeB", code_b)],
        )
        .await
    }

    async fn lookup_interaction_by_name(
        &self,
        name_a: &str,
        name_b: &str,
    ) -> Result<Option<InteractionRow>, StoreError> {
        self.get_optional(
            "/v1/interactions/by-name",
            &[("nameA", name_a), ("nameB", name_b)],
        )
        .await
    }
}
