//! Media storage for profile photos.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::Rng;
use serde_json::json;
use std::path::PathBuf;

use crate::domain::ports::{MediaStore, StoredMedia};
use crate::error::AppError;

/// Splits an optional `data:<mime>;base64,` prefix off an upload payload,
/// returning the file extension for the mime type and the raw base64 part.
fn parse_data_url(input: &str) -> (&'static str, &str) {
    if let Some(rest) = input.strip_prefix("data:") {
        if let Some((mime, payload)) = rest.split_once(";base64,") {
            let ext = match mime {
                "image/jpeg" => "jpg",
                "image/webp" => "webp",
                _ => "png",
            };
            return (ext, payload);
        }
    }

    ("png", input)
}

/// Filesystem-backed media store.
///
/// Uploaded photos land under a directory served as static content, so the
/// returned URL is immediately fetchable. The public id is the generated file
/// name, enough to delete or replace the object later.
pub struct FsMediaStore {
    root: PathBuf,
    public_base: String,
}

impl FsMediaStore {
    pub fn new(root: impl Into<PathBuf>, public_base: &str) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl MediaStore for FsMediaStore {
    async fn upload(&self, base64_data: &str) -> Result<StoredMedia, AppError> {
        let (ext, payload) = parse_data_url(base64_data);

        let bytes = BASE64.decode(payload.as_bytes()).map_err(|e| {
            AppError::bad_request("Invalid image data", json!({ "source": e.to_string() }))
        })?;

        let file_name = format!("{:032x}.{ext}", rand::rng().random::<u128>());
        let path = self.root.join(&file_name);

        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            AppError::dependency(
                "Failed to prepare media directory",
                json!({ "source": e.to_string() }),
            )
        })?;

        tokio::fs::write(&path, &bytes).await.map_err(|e| {
            AppError::dependency(
                "Failed to store media",
                json!({ "source": e.to_string() }),
            )
        })?;

        Ok(StoredMedia {
            url: format!("{}/{}", self.public_base, file_name),
            public_id: file_name,
        })
    }
}
