//! Asset store collaborator
//!
//! Embedded images live outside the document tree. Converters reach them only
//! through an [`AssetStore`]: the DOCX importer pushes extracted pictures into it,
//! the DOCX exporter pulls image bytes back out, and the Markdown exporter asks it
//! for absolute image URLs.
//!
//! Store failures are recoverable. Converters log them and carry on without the
//! image.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use url::Url;

/// Errors reported by an asset store.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(String),

    #[error("asset I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("asset store rejected the request: {0}")]
    Rejected(String),
}

/// An image reference as it appears in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetRef<'a> {
    pub document_id: &'a str,
    /// Absolute URL or document-relative path
    pub src: &'a str,
}

/// External storage for embedded images.
pub trait AssetStore: Send + Sync {
    /// Bytes of the referenced image.
    fn fetch_image_bytes(&self, reference: &AssetRef<'_>) -> Result<Vec<u8>, AssetError>;

    /// Persist an image for a document and return the path the tree should reference.
    fn store_image(&self, document_id: &str, name: &str, bytes: &[u8])
        -> Result<String, AssetError>;

    /// Absolute URL under which the image can be downloaded.
    fn resolve_image_url(&self, path: &str, document_id: &str) -> String;
}

/// Whether `path` is already an absolute http(s) URL.
pub fn is_absolute_url(path: &str) -> bool {
    Url::parse(path)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Map a document-relative image path to the download endpoint of `service_url`.
///
/// Absolute URLs pass through unchanged.
pub fn resolve_image_url(service_url: &str, path: &str, document_id: &str) -> String {
    if is_absolute_url(path) {
        return path.to_string();
    }
    format!(
        "{}/api/v2.1/seadoc/download-image/{}/{}",
        service_url.trim_end_matches('/'),
        document_id,
        path.trim_matches('/')
    )
}

fn images_path(name: &str) -> String {
    format!("/images/{name}")
}

/// `value` as a path below the store root; only plain segments are accepted.
fn contained(value: &str) -> Result<&Path, AssetError> {
    let path = Path::new(value.trim_start_matches('/'));
    let plain = path.components().all(|part| matches!(part, Component::Normal(_)));
    if !plain || path.as_os_str().is_empty() {
        return Err(AssetError::Rejected(format!("'{value}' escapes the store")));
    }
    Ok(path)
}

/// Filesystem-backed store: images of document `d` live under `<root>/<d>/images/`.
#[derive(Debug, Clone)]
pub struct LocalAssetStore {
    root: PathBuf,
    service_url: String,
}

impl LocalAssetStore {
    pub fn new(root: impl Into<PathBuf>, service_url: impl Into<String>) -> Self {
        LocalAssetStore {
            root: root.into(),
            service_url: service_url.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn document_dir(&self, document_id: &str) -> Result<PathBuf, AssetError> {
        Ok(self.root.join(contained(document_id)?))
    }
}

impl AssetStore for LocalAssetStore {
    fn fetch_image_bytes(&self, reference: &AssetRef<'_>) -> Result<Vec<u8>, AssetError> {
        if is_absolute_url(reference.src) {
            return Err(AssetError::Rejected(format!(
                "remote image '{}' cannot be read from a local store",
                reference.src
            )));
        }
        let path = self
            .document_dir(reference.document_id)?
            .join(contained(reference.src)?);
        fs::read(&path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => AssetError::NotFound(path.display().to_string()),
            _ => AssetError::Io(err),
        })
    }

    fn store_image(
        &self,
        document_id: &str,
        name: &str,
        bytes: &[u8],
    ) -> Result<String, AssetError> {
        let images_dir = self.document_dir(document_id)?.join("images");
        let name = contained(name)?;
        fs::create_dir_all(&images_dir)?;
        fs::write(images_dir.join(name), bytes)?;
        Ok(images_path(&name.to_string_lossy()))
    }

    fn resolve_image_url(&self, path: &str, document_id: &str) -> String {
        resolve_image_url(&self.service_url, path, document_id)
    }
}

/// In-memory store keyed by document id and path.
#[derive(Debug, Default)]
pub struct MemoryAssetStore {
    service_url: String,
    images: Mutex<HashMap<(String, String), Vec<u8>>>,
}

impl MemoryAssetStore {
    pub fn new(service_url: impl Into<String>) -> Self {
        MemoryAssetStore {
            service_url: service_url.into(),
            images: Mutex::new(HashMap::new()),
        }
    }

    /// Seed an image, as if it had been stored earlier.
    pub fn insert(&self, document_id: &str, path: &str, bytes: Vec<u8>) {
        if let Ok(mut images) = self.images.lock() {
            images.insert((document_id.to_string(), path.to_string()), bytes);
        }
    }

    /// Paths stored for `document_id`, sorted.
    pub fn paths(&self, document_id: &str) -> Vec<String> {
        let Ok(images) = self.images.lock() else {
            return Vec::new();
        };
        let mut paths: Vec<String> = images
            .keys()
            .filter(|(doc, _)| doc == document_id)
            .map(|(_, path)| path.clone())
            .collect();
        paths.sort();
        paths
    }
}

impl AssetStore for MemoryAssetStore {
    fn fetch_image_bytes(&self, reference: &AssetRef<'_>) -> Result<Vec<u8>, AssetError> {
        let images = self
            .images
            .lock()
            .map_err(|_| AssetError::Rejected("asset map poisoned".to_string()))?;
        images
            .get(&(reference.document_id.to_string(), reference.src.to_string()))
            .cloned()
            .ok_or_else(|| AssetError::NotFound(reference.src.to_string()))
    }

    fn store_image(
        &self,
        document_id: &str,
        name: &str,
        bytes: &[u8],
    ) -> Result<String, AssetError> {
        let path = images_path(name);
        let mut images = self
            .images
            .lock()
            .map_err(|_| AssetError::Rejected("asset map poisoned".to_string()))?;
        images.insert((document_id.to_string(), path.clone()), bytes.to_vec());
        Ok(path)
    }

    fn resolve_image_url(&self, path: &str, document_id: &str) -> String {
        resolve_image_url(&self.service_url, path, document_id)
    }
}
