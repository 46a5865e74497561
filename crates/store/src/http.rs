//! HTTP object store client.
//!
//! Speaks the Supabase-storage wire shape: objects live in a bucket under a
//! storage base URL, uploads are plain POSTs with the binary as the body, and
//! public addresses are derived from the base URL without a round trip.

use async_trait::async_trait;

use crate::error::{Result, StoreError};
use crate::object::{ObjectStore, UploadOptions};

/// Object store client over HTTP.
#[derive(Debug, Clone)]
pub struct HttpObjectStore {
    client: reqwest::Client,
    base_url: String,
    bucket: String,
    api_key: Option<String>,
}

impl HttpObjectStore {
    /// Creates a client for a bucket under a storage base URL
    /// (e.g. `https://project.example.co/storage/v1`).
    pub fn new(base_url: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bucket: bucket.into(),
            api_key: None,
        }
    }

    /// Attaches a bearer token sent with every request.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/object/{}/{}", self.base_url, self.bucket, key)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => req.bearer_auth(key),
            None => req,
        }
    }

    async fn check_status(key: &str, response: reqwest::Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let message = response.text().await.unwrap_or_default();
        Err(StoreError::Object {
            status: status.as_u16(),
            key: key.to_string(),
            message,
        })
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn upload(&self, key: &str, bytes: &[u8], options: &UploadOptions) -> Result<()> {
        let req = self
            .client
            .post(self.object_url(key))
            .header("content-type", &options.content_type)
            .header(
                "cache-control",
                format!("max-age={}", options.cache_control),
            )
            .header("x-upsert", if options.upsert { "true" } else { "false" })
            .body(bytes.to_vec());

        let response = self.authorize(req).send().await?;
        Self::check_status(key, response).await
    }

    fn public_url(&self, key: &str) -> Option<String> {
        Some(format!(
            "{}/object/public/{}/{}",
            self.base_url, self.bucket, key
        ))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let req = self.client.delete(self.object_url(key));
        let response = self.authorize(req).send().await?;

        // Absent keys are not an error.
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }
        Self::check_status(key, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_url_is_derived_from_base_and_bucket() {
        let store = HttpObjectStore::new("https://project.example.co/storage/v1/", "course-videos");
        assert_eq!(
            store.public_url("abc-1.mp4").unwrap(),
            "https://project.example.co/storage/v1/object/public/course-videos/abc-1.mp4"
        );
    }

    #[test]
    fn object_url_strips_trailing_slash() {
        let store = HttpObjectStore::new("https://s.example.co/storage/v1/", "b");
        assert_eq!(
            store.object_url("k.mp4"),
            "https://s.example.co/storage/v1/object/b/k.mp4"
        );
    }
}
