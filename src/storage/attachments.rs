//! Avatar files kept next to the tree
//!
//! Nodes only store the file name; bytes live in a flat directory.

use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

use crate::config::AvatarConfig;
use crate::error::{ServerError, ServerResult};

/// Directory-backed avatar storage
#[derive(Debug, Clone)]
pub struct AvatarStore {
    config: AvatarConfig,
}

impl AvatarStore {
    pub fn new(config: AvatarConfig) -> Self {
        Self { config }
    }

    pub fn dir(&self) -> &Path {
        &self.config.dir
    }

    pub fn default_file(&self) -> &str {
        &self.config.default_file
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.config.max_upload_bytes
    }

    /// Persist an uploaded image, returning the stored file name
    ///
    /// The extension is the subtype of the `image/*` content type.
    pub async fn save(&self, bytes: &[u8], content_type: Option<&str>) -> ServerResult<String> {
        let ext = image_extension(content_type)?;
        if bytes.len() > self.config.max_upload_bytes {
            return Err(ServerError::InvalidArgument(format!(
                "avatar exceeds max size of {} bytes",
                self.config.max_upload_bytes
            )));
        }

        tokio::fs::create_dir_all(&self.config.dir).await?;

        let file_name = format!("avatar-{}.{}", Uuid::new_v4(), ext);
        tokio::fs::write(self.config.dir.join(&file_name), bytes).await?;

        debug!(file = %file_name, size = bytes.len(), "Avatar stored");
        Ok(file_name)
    }

    /// Remove a stored avatar (used when the node insert that owned it fails)
    pub async fn remove(&self, name: &str) -> ServerResult<()> {
        let path = self.resolve(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Read an avatar, falling back to the default file when `name` is `None`
    ///
    /// Returns the bytes together with a content type derived from the extension.
    pub async fn read(&self, name: Option<&str>) -> ServerResult<(Vec<u8>, &'static str)> {
        let name = name.unwrap_or(&self.config.default_file);
        let path = self.resolve(name)?;

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ServerError::NodeNotFound(format!("avatar file {}", name)))
            }
            Err(e) => return Err(e.into()),
        };
        Ok((bytes, content_type_for(name)))
    }

    fn resolve(&self, name: &str) -> ServerResult<PathBuf> {
        let plain = Path::new(name)
            .file_name()
            .is_some_and(|file_name| file_name == name);
        if !plain {
            return Err(ServerError::InvalidArgument(format!(
                "invalid avatar file name: {}",
                name
            )));
        }
        Ok(self.config.dir.join(name))
    }
}

/// File extension for an uploaded `image/<subtype>` content type
pub fn image_extension(content_type: Option<&str>) -> ServerResult<String> {
    let content_type = content_type.unwrap_or_default();
    let subtype = content_type
        .split(';')
        .next()
        .and_then(|essence| essence.trim().strip_prefix("image/"))
        .map(|s| s.trim().to_ascii_lowercase())
        .filter(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '+'))
        .ok_or_else(|| ServerError::UnsupportedContentType(content_type.to_string()))?;

    Ok(match subtype.as_str() {
        "svg+xml" => "svg".to_string(),
        _ => subtype,
    })
}

/// Content type served for a stored avatar name
pub fn content_type_for(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
