//! Image resolvers.
//!
//! The tag store never owns image data. It asks an [`ImageResolver`] whether
//! an identifier names an image, both before recording a tag and as the
//! fallback for lookups that miss the index.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use a3s_tag_core::error::{Result, TagError};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Metadata for an image known to the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    /// Full image id
    pub id: String,
    /// Parent image id, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Creation time, if recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    /// Size in bytes, if recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl ImageMetadata {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent: None,
            created: None,
            size: None,
        }
    }
}

/// Resolves an image id (full or unique prefix) to its metadata.
///
/// `Ok(None)` means "no such image"; `Err` is reserved for failures such as
/// unreadable storage or an ambiguous prefix.
pub trait ImageResolver: Send + Sync {
    fn resolve(&self, id_or_prefix: &str) -> Result<Option<ImageMetadata>>;
}

/// Pick the single entry matching a prefix, rejecting ambiguity.
fn unique_prefix_match<'a, I>(prefix: &str, ids: I) -> Result<Option<&'a str>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut matches = ids.into_iter().filter(|id| id.starts_with(prefix));
    let first = matches.next();
    if first.is_some() && matches.next().is_some() {
        return Err(TagError::ResolverError(format!(
            "image id prefix {} is ambiguous",
            prefix
        )));
    }
    Ok(first)
}

/// In-memory resolver, used by embedders that track images themselves.
#[derive(Debug, Default)]
pub struct MemoryResolver {
    images: RwLock<BTreeMap<String, ImageMetadata>>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an image.
    pub fn insert(&self, image: ImageMetadata) {
        self.images.write().insert(image.id.clone(), image);
    }

    /// Forget an image. Returns whether it was known.
    pub fn remove(&self, id: &str) -> bool {
        self.images.write().remove(id).is_some()
    }
}

impl ImageResolver for MemoryResolver {
    fn resolve(&self, id_or_prefix: &str) -> Result<Option<ImageMetadata>> {
        if id_or_prefix.is_empty() {
            return Ok(None);
        }
        let images = self.images.read();
        if let Some(image) = images.get(id_or_prefix) {
            return Ok(Some(image.clone()));
        }
        let found = unique_prefix_match(id_or_prefix, images.keys().map(String::as_str))?;
        Ok(found.and_then(|id| images.get(id).cloned()))
    }
}

/// Resolver over an on-disk image graph: one directory per image id, with
/// optional metadata in `<id>/json`.
#[derive(Debug, Clone)]
pub struct GraphDirResolver {
    root: PathBuf,
}

impl GraphDirResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn load(&self, id: &str) -> Result<ImageMetadata> {
        let meta_path = self.root.join(id).join("json");
        if !meta_path.exists() {
            return Ok(ImageMetadata::new(id));
        }
        let data = std::fs::read_to_string(&meta_path).map_err(|e| {
            TagError::ResolverError(format!(
                "failed to read image metadata {}: {}",
                meta_path.display(),
                e
            ))
        })?;
        let mut meta: ImageMetadata = serde_json::from_str(&data).map_err(|e| {
            TagError::ResolverError(format!(
                "failed to parse image metadata {}: {}",
                meta_path.display(),
                e
            ))
        })?;
        // The directory name is authoritative.
        meta.id = id.to_string();
        Ok(meta)
    }
}

impl ImageResolver for GraphDirResolver {
    fn resolve(&self, id_or_prefix: &str) -> Result<Option<ImageMetadata>> {
        if id_or_prefix.is_empty()
            || id_or_prefix.contains('/')
            || id_or_prefix == "."
            || id_or_prefix == ".."
        {
            return Ok(None);
        }
        if !self.root.exists() {
            return Ok(None);
        }

        if self.root.join(id_or_prefix).is_dir() {
            return self.load(id_or_prefix).map(Some);
        }

        let entries = std::fs::read_dir(&self.root).map_err(|e| {
            TagError::ResolverError(format!(
                "failed to read image graph {}: {}",
                self.root.display(),
                e
            ))
        })?;
        let ids: Vec<String> = entries
            .flatten()
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();

        match unique_prefix_match(id_or_prefix, ids.iter().map(String::as_str))? {
            Some(id) => self.load(id).map(Some),
            None => Ok(None),
        }
    }
}
