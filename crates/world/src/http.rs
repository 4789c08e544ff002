//! HTTP implementation of [`WorldStore`] against a live world server.
//!
//! Collections are listed with `GET {base}/api/{collection}` and documents
//! updated with `PATCH {base}/api/{path}` carrying a flat field-path body.

use std::time::Duration;

use async_trait::async_trait;
use mediashift_core::patch::FieldPatch;
use mediashift_core::world::{Collection, DocRef};

use crate::documents::{SceneDocument, WorldDocument};
use crate::store::{StoreError, WorldStore};

/// Default timeout for a single document API request.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the world server's document API.
pub struct HttpWorldStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpWorldStore {
    /// Create a client for a world server.
    ///
    /// * `base_url` - server root, e.g. `http://localhost:30000`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, DEFAULT_STORE_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build reqwest HTTP client");
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { client, base_url }
    }

    /// Absolute URL of a document API path.
    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    /// List a collection of documents.
    async fn list<T: serde::de::DeserializeOwned>(
        &self,
        collection: Collection,
    ) -> Result<Vec<T>, StoreError> {
        tracing::debug!(collection = %collection, "Listing world collection");
        let response = self
            .client
            .get(self.endpoint(collection.as_str()))
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// Ensure the response has a success status.
    ///
    /// Returns the response unchanged on success, or a [`StoreError::Api`]
    /// containing the status and body text.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(StoreError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, StoreError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl WorldStore for HttpWorldStore {
    async fn actors(&self) -> Result<Vec<WorldDocument>, StoreError> {
        self.list(Collection::Actors).await
    }

    async fn items(&self) -> Result<Vec<WorldDocument>, StoreError> {
        self.list(Collection::Items).await
    }

    async fn journals(&self) -> Result<Vec<WorldDocument>, StoreError> {
        self.list(Collection::Journal).await
    }

    async fn scenes(&self) -> Result<Vec<SceneDocument>, StoreError> {
        self.list(Collection::Scenes).await
    }

    async fn update(&self, doc: &DocRef, patch: &FieldPatch) -> Result<(), StoreError> {
        tracing::debug!(doc = %doc, fields = patch.len(), "Updating world document");
        let response = self
            .client
            .patch(self.endpoint(&doc.api_path()))
            .json(patch)
            .send()
            .await?;
        Self::ensure_success(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_does_not_panic() {
        let _ = HttpWorldStore::new("http://localhost:30000");
    }

    #[test]
    fn trailing_slashes_are_trimmed_from_the_base_url() {
        let store = HttpWorldStore::new("http://localhost:30000//");
        assert_eq!(
            store.endpoint("actors"),
            "http://localhost:30000/api/actors"
        );
    }

    #[test]
    fn endpoint_joins_document_paths() {
        let store = HttpWorldStore::new("http://localhost:30000");
        let doc = DocRef::top(Collection::Scenes, "s1");
        assert_eq!(
            store.endpoint(&doc.api_path()),
            "http://localhost:30000/api/scenes/s1"
        );
    }
}
