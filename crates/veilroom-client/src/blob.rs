//! Presigned-URL blob store collaborator.
//!
//! The relay grants a time-limited presigned PUT target for uploads;
//! retrieval is a plain GET of the announced URL. Bytes are ciphertext in
//! both directions and this layer treats them as opaque storage.

use thiserror::Error;

/// Blob store errors.
#[derive(Debug, Error)]
pub enum BlobError {
    /// The upload PUT failed or was refused.
    #[error("blob upload failed: {reason}")]
    Upload {
        /// Transport or status diagnostic.
        reason: String,
    },

    /// The retrieval GET failed; the file cannot be fetched.
    #[error("blob download failed: {reason}")]
    Download {
        /// Transport or status diagnostic.
        reason: String,
    },
}

/// HTTP client for the blob store.
#[derive(Clone, Default)]
pub struct BlobStore {
    http: reqwest::Client,
}

impl BlobStore {
    /// Create a blob store client.
    #[must_use]
    pub fn new() -> Self {
        Self { http: reqwest::Client::new() }
    }

    /// PUT a ciphertext blob to a presigned upload URL.
    ///
    /// # Errors
    ///
    /// - `BlobError::Upload` on transport failure or a non-success status
    pub async fn upload(&self, presign_url: &str, body: Vec<u8>) -> Result<(), BlobError> {
        self.http
            .put(presign_url)
            .body(body)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| BlobError::Upload { reason: e.to_string() })?;

        Ok(())
    }

    /// GET a ciphertext blob from a retrieval URL.
    ///
    /// # Errors
    ///
    /// - `BlobError::Download` on transport failure or a non-success status
    pub async fn download(&self, url: &str) -> Result<Vec<u8>, BlobError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| BlobError::Download { reason: e.to_string() })?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| BlobError::Download { reason: e.to_string() })?;

        Ok(bytes.to_vec())
    }
}
