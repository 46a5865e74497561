//! Binary object store trait.

use async_trait::async_trait;

use crate::error::Result;

/// Options applied to an object upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    /// MIME type stored with the object.
    pub content_type: String,

    /// Cache hint in seconds, forwarded as a `cache-control: max-age` value.
    pub cache_control: String,

    /// Whether an existing object under the same key may be replaced.
    pub upsert: bool,
}

impl UploadOptions {
    /// Non-overwriting upload with a 1-hour cache hint, the settings used by
    /// the creation saga.
    pub fn for_video(content_type: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            cache_control: "3600".to_string(),
            upsert: false,
        }
    }
}

/// Client for the binary object store.
///
/// Keys are opaque to the store; the caller decides the naming scheme.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Uploads a binary under the given key.
    async fn upload(&self, key: &str, bytes: &[u8], options: &UploadOptions) -> Result<()>;

    /// Returns the publicly resolvable address for a key, or `None` when the
    /// store cannot produce one. Computed locally; existence of the object
    /// is not checked.
    fn public_url(&self, key: &str) -> Option<String>;

    /// Deletes the object stored under a key. Deleting an absent key is not
    /// an error.
    async fn delete(&self, key: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_upload_options_are_non_overwriting_with_cache_hint() {
        let opts = UploadOptions::for_video("video/mp4");
        assert_eq!(opts.content_type, "video/mp4");
        assert_eq!(opts.cache_control, "3600");
        assert!(!opts.upsert);
    }
}
