//! In-memory repository index.
//!
//! Maps canonical repository names to their tags and digests. The index is
//! also the persisted snapshot: it serializes to
//! `{"Repositories": {...}, "Digests": {...}}`.
//!
//! Names passed to [`RepositoryIndex`] must already be normalized and
//! validated; the [`crate::TagStore`] façade takes care of both.

use std::collections::HashMap;

use a3s_tag_core::error::{Result, TagError};
use serde::{Deserialize, Serialize};

use crate::reference::{join_repository_tag, truncate_id};

/// Tags of one repository: tag → image id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Repository(HashMap<String, String>);

impl Repository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, tag: &str) -> Option<&str> {
        self.0.get(tag).map(String::as_str)
    }

    pub fn contains_tag(&self, tag: &str) -> bool {
        self.0.contains_key(tag)
    }

    /// Set a tag, returning the image id it pointed to before.
    pub fn insert(&mut self, tag: impl Into<String>, image_id: impl Into<String>) -> Option<String> {
        self.0.insert(tag.into(), image_id.into())
    }

    pub fn remove(&mut self, tag: &str) -> Option<String> {
        self.0.remove(tag)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(tag, image id)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(t, id)| (t.as_str(), id.as_str()))
    }

    /// Copy every entry of `other` into this repository.
    pub fn update(&mut self, other: &Repository) {
        for (tag, id) in &other.0 {
            self.0.insert(tag.clone(), id.clone());
        }
    }

    /// True when every entry of `other` is present here with the same id.
    pub fn contains(&self, other: &Repository) -> bool {
        other
            .0
            .iter()
            .all(|(tag, id)| self.0.get(tag).is_some_and(|v| v == id))
    }
}

impl FromIterator<(String, String)> for Repository {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Digests of one repository: digest → image id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DigestRepository(HashMap<String, String>);

impl DigestRepository {
    pub fn get(&self, digest: &str) -> Option<&str> {
        self.0.get(digest).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(d, id)| (d.as_str(), id.as_str()))
    }
}

/// Repository name → tags, and repository name → digests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryIndex {
    #[serde(rename = "Repositories", alias = "repositories", default)]
    repositories: HashMap<String, Repository>,

    #[serde(rename = "Digests", alias = "digests", default)]
    digests: HashMap<String, DigestRepository>,
}

impl RepositoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn repository(&self, name: &str) -> Option<&Repository> {
        self.repositories.get(name)
    }

    pub fn digest_repository(&self, name: &str) -> Option<&DigestRepository> {
        self.digests.get(name)
    }

    /// Iterate over every `(repository name, repository)` pair.
    pub fn repositories(&self) -> impl Iterator<Item = (&str, &Repository)> {
        self.repositories.iter().map(|(n, r)| (n.as_str(), r))
    }

    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty() && self.digests.is_empty()
    }

    /// Resolve a tag, or failing that an image id prefix, within a repository.
    ///
    /// An exact tag match always wins. Otherwise the first image id (in map
    /// iteration order) starting with `tag_or_prefix` is returned; when
    /// several ids share the prefix, which one wins is unspecified. An empty
    /// string matches nothing.
    pub fn image_id(&self, repository: &str, tag_or_prefix: &str) -> Option<&str> {
        if tag_or_prefix.is_empty() {
            return None;
        }
        let repo = self.repositories.get(repository)?;
        if let Some(id) = repo.get(tag_or_prefix) {
            return Some(id);
        }
        repo.iter()
            .map(|(_, id)| id)
            .find(|id| id.starts_with(tag_or_prefix))
    }

    /// Point `repository:tag` at `image_id`.
    ///
    /// Fails with `Conflict` if the tag exists and `force` is false. Returns
    /// the replaced image id when a forced overwrite happened.
    pub fn set_tag(
        &mut self,
        repository: &str,
        tag: &str,
        image_id: &str,
        force: bool,
    ) -> Result<Option<String>> {
        if let Some(old) = self.repositories.get(repository).and_then(|r| r.get(tag)) {
            if !force {
                return Err(TagError::Conflict(format!(
                    "Tag {} is already set to image {}, if you want to replace it, please use -f option",
                    tag, old
                )));
            }
        }
        Ok(self
            .repositories
            .entry(repository.to_string())
            .or_default()
            .insert(tag, image_id))
    }

    /// Record `digest → image_id` for a repository. Digests are immutable:
    /// an existing entry is a `Conflict` even if it names the same image.
    pub fn set_digest(&mut self, repository: &str, digest: &str, image_id: &str) -> Result<()> {
        let repo = self.digests.entry(repository.to_string()).or_default();
        if let Some(old) = repo.0.get(digest) {
            return Err(TagError::Conflict(format!(
                "Digest {} is already set to image {}",
                digest, old
            )));
        }
        repo.0.insert(digest.to_string(), image_id.to_string());
        Ok(())
    }

    /// Remove one tag, or the whole repository when `tag` is empty.
    ///
    /// A repository left without tags is removed as well.
    pub fn delete_tag(&mut self, repository: &str, tag: &str) -> Result<()> {
        let repo = self.repositories.get_mut(repository).ok_or_else(|| {
            TagError::NotFound(format!("No such repository: {}", repository))
        })?;

        if tag.is_empty() {
            self.repositories.remove(repository);
            return Ok(());
        }

        if repo.remove(tag).is_none() {
            return Err(TagError::NotFound(format!(
                "No such tag: {}",
                join_repository_tag(repository, tag)
            )));
        }
        if repo.is_empty() {
            self.repositories.remove(repository);
        }
        Ok(())
    }

    /// Reverse lookup: image id → sorted `repo:tag` names referring to it.
    pub fn by_id(&self) -> HashMap<String, Vec<String>> {
        let mut by_id: HashMap<String, Vec<String>> = HashMap::new();
        for (name, repo) in &self.repositories {
            for (tag, id) in repo.iter() {
                by_id
                    .entry(id.to_string())
                    .or_default()
                    .push(join_repository_tag(name, tag));
            }
        }
        for names in by_id.values_mut() {
            names.sort();
        }
        by_id
    }

    /// `repo:tag` names grouped by truncated image id.
    pub fn repo_refs(&self, short_id_len: usize) -> HashMap<String, Vec<String>> {
        let mut refs: HashMap<String, Vec<String>> = HashMap::new();
        for (name, repo) in &self.repositories {
            for (tag, id) in repo.iter() {
                refs.entry(truncate_id(id, short_id_len))
                    .or_default()
                    .push(join_repository_tag(name, tag));
            }
        }
        for names in refs.values_mut() {
            names.sort();
        }
        refs
    }
}
