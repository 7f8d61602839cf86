//! # Local media storage
//!
//! Local filesystem implementation of `BlobStore`.
//! Content-addressable: the SHA-256 of the upload is the file name, sharded
//! into two directory levels, so identical pictures are stored once.

use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use domains::{BlobStore, DomainError, DomainResult};
use sha2::{Digest, Sha256};
use tokio::fs;

pub struct LocalBlobStore {
    /// Root directory for all uploads (e.g., "./data/uploads")
    root_path: PathBuf,
    /// Public URL prefix (e.g., "/static/uploads")
    url_prefix: String,
}

impl LocalBlobStore {
    pub fn new(root: PathBuf, url_prefix: String) -> Self {
        Self {
            root_path: root,
            url_prefix: url_prefix.trim_end_matches('/').to_string(),
        }
    }

    /// "ab/cd/abcd...hash.ext", relative to the root.
    fn sharded_name(hash: &str, extension: &str) -> (PathBuf, String) {
        let dir = PathBuf::from(&hash[0..2]).join(&hash[2..4]);
        let file = format!("{hash}.{extension}");
        (dir, file)
    }
}

fn io_error(e: std::io::Error) -> DomainError {
    DomainError::Store(format!("media storage: {e}"))
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn upload(&self, data: Bytes, content_type: &mime::Mime) -> DomainResult<String> {
        if content_type.type_() != mime::IMAGE {
            return Err(DomainError::Validation(format!(
                "unsupported upload type {content_type}"
            )));
        }
        let format = image::guess_format(&data)
            .map_err(|e| DomainError::Validation(format!("upload is not a readable image: {e}")))?;
        let extension = format.extensions_str().first().copied().unwrap_or("img");

        let hash = hex::encode(Sha256::digest(&data));
        let (dir, file) = Self::sharded_name(&hash, extension);

        let target_dir = self.root_path.join(&dir);
        fs::create_dir_all(&target_dir).await.map_err(io_error)?;

        let target_path = target_dir.join(&file);
        if !fs::try_exists(&target_path).await.map_err(io_error)? {
            fs::write(&target_path, &data).await.map_err(io_error)?;
            tracing::info!(path = %target_path.display(), bytes = data.len(), "stored upload");
        }

        Ok(format!(
            "{}/{}/{}/{}",
            self.url_prefix,
            &hash[0..2],
            &hash[2..4],
            file
        ))
    }
}
