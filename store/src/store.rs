//! Persistent tag store.
//!
//! [`TagStore`] maps repository names, tags and digests to image ids and
//! keeps that mapping in a single JSON file. Every operation takes the
//! store lock, reloads the file, works on the fresh index, and (for
//! mutations) writes the full index back before releasing the lock.
//!
//! The lock serializes callers within one process only. Writers in other
//! processes are picked up by the reload, but a reload-mutate-save cycle is
//! not atomic across processes and a concurrent writer's change can be lost.
//!
//! If the final save fails, the in-memory index keeps the mutation while the
//! file does not; the next operation reloads from disk and the mutation is
//! gone.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use a3s_tag_core::config::{StoreConfig, DEFAULT_SHORT_ID_LEN};
use a3s_tag_core::error::{Result, TagError};
use a3s_tag_core::event::{EventEmitter, TagEvent};
use parking_lot::Mutex;

use crate::digest::Digest;
use crate::index::{DigestRepository, Repository, RepositoryIndex};
use crate::normalize::{LocalNameNormalizer, NameNormalizer};
use crate::persist;
use crate::pool::AdmissionPool;
use crate::reference::{
    parse_repository_digest, parse_repository_tag, split_repository_tag, truncate_id, DEFAULT_TAG,
};
use crate::resolver::{GraphDirResolver, ImageMetadata, ImageResolver};
use crate::validate::{validate_digest, validate_repository_name, validate_tag_name};

/// Repository/tag index backed by a JSON file.
pub struct TagStore {
    /// Absolute path of the persisted index
    path: PathBuf,
    /// Source of truth for which image ids exist
    resolver: Arc<dyn ImageResolver>,
    /// Canonicalizes repository names before every lookup or mutation
    normalizer: Arc<dyn NameNormalizer>,
    /// In-memory copy of the index, refreshed on every operation
    index: Mutex<RepositoryIndex>,
    /// In-flight pulls and pushes
    pool: AdmissionPool,
    /// Optional event sink for tag mutations
    events: Option<EventEmitter>,
    /// Length of truncated ids in display names
    short_id_len: usize,
}

impl TagStore {
    /// Open (or create) the store persisted at `path`.
    pub fn new(path: impl AsRef<Path>, resolver: Arc<dyn ImageResolver>) -> Result<Self> {
        Self::with_normalizer(path, resolver, Arc::new(LocalNameNormalizer))
    }

    /// Open (or create) the store with a custom name normalizer.
    ///
    /// A missing index file is created empty; a corrupt one is an error.
    pub fn with_normalizer(
        path: impl AsRef<Path>,
        resolver: Arc<dyn ImageResolver>,
        normalizer: Arc<dyn NameNormalizer>,
    ) -> Result<Self> {
        let path = absolute_path(path.as_ref())?;

        let index = match persist::load(&path)? {
            Some(index) => index,
            None => {
                let index = RepositoryIndex::new();
                persist::save(&path, &index)?;
                tracing::info!(path = %path.display(), "Created repository index");
                index
            }
        };

        Ok(Self {
            path,
            resolver,
            normalizer,
            index: Mutex::new(index),
            pool: AdmissionPool::new(),
            events: None,
            short_id_len: DEFAULT_SHORT_ID_LEN,
        })
    }

    /// Open the store described by `config`, resolving images from its
    /// graph directory.
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        config.validate()?;
        let resolver = Arc::new(GraphDirResolver::new(config.graph_path()));
        Ok(Self::new(config.index_path(), resolver)?.with_short_id_len(config.short_id_len))
    }

    /// Broadcast tag and transfer events on `emitter`.
    pub fn with_events(mut self, emitter: EventEmitter) -> Self {
        self.pool = std::mem::take(&mut self.pool).with_events(emitter.clone());
        self.events = Some(emitter);
        self
    }

    /// Set the length of truncated image ids.
    pub fn with_short_id_len(mut self, len: usize) -> Self {
        self.short_id_len = len.max(1);
        self
    }

    /// Path of the persisted index.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Admission pool guarding in-flight pulls and pushes.
    pub fn pool(&self) -> &AdmissionPool {
        &self.pool
    }

    /// Look up an image by `repo[:tag]`, `repo@digest`, or image id.
    ///
    /// Names that miss the index are handed to the image resolver as-is, so
    /// full or abbreviated image ids resolve too.
    pub fn lookup_image(&self, name: &str) -> Result<Option<ImageMetadata>> {
        if let Some(id) = self.indexed_id(name)? {
            if let Some(image) = self.resolver.resolve(&id)? {
                return Ok(Some(image));
            }
        }
        self.resolver.resolve(name)
    }

    /// Resolve a qualified name to an image id without requiring the
    /// resolver to know the id when the index has it.
    pub fn resolve_name(&self, name: &str) -> Result<Option<String>> {
        if let Some(id) = self.indexed_id(name)? {
            return Ok(Some(id));
        }
        Ok(self.resolver.resolve(name)?.map(|image| image.id))
    }

    /// Image id recorded in the index for `repo@digest` or `repo[:tag]`.
    ///
    /// A missing or empty tag means `latest`.
    fn indexed_id(&self, name: &str) -> Result<Option<String>> {
        if name.contains('@') {
            return self.digest_image_id(name);
        }
        let (repo, tag) = parse_repository_tag(name);
        let tag = tag.filter(|t| !t.is_empty()).unwrap_or(DEFAULT_TAG);
        self.get_image_id(repo, tag)
    }

    /// Image metadata for a tag (or image id prefix) within a repository.
    pub fn get_image(&self, repo: &str, tag_or_id: &str) -> Result<Option<ImageMetadata>> {
        match self.get_image_id(repo, tag_or_id)? {
            Some(id) => self.resolver.resolve(&id),
            None => Ok(None),
        }
    }

    /// Image id for a tag, or for an image id prefix, within a repository.
    ///
    /// An exact tag wins. When several ids in the repository share the
    /// prefix, which one is returned is unspecified.
    pub fn get_image_id(&self, repo: &str, tag_or_prefix: &str) -> Result<Option<String>> {
        let repo = self.normalizer.normalize(repo);
        let mut index = self.index.lock();
        self.reload(&mut index)?;
        Ok(index.image_id(&repo, tag_or_prefix).map(str::to_string))
    }

    /// Copy of a repository's tags, or `None` if it was never tagged.
    pub fn get(&self, repo: &str) -> Result<Option<Repository>> {
        let repo = self.normalizer.normalize(repo);
        let mut index = self.index.lock();
        self.reload(&mut index)?;
        Ok(index.repository(&repo).cloned())
    }

    /// Copy of a repository's recorded digests.
    pub fn get_digests(&self, repo: &str) -> Result<Option<DigestRepository>> {
        let repo = self.normalizer.normalize(repo);
        let mut index = self.index.lock();
        self.reload(&mut index)?;
        Ok(index.digest_repository(&repo).cloned())
    }

    /// Image metadata for a `repo@digest` reference.
    pub fn get_image_by_digest(&self, name: &str) -> Result<Option<ImageMetadata>> {
        match self.digest_image_id(name)? {
            Some(id) => self.resolver.resolve(&id),
            None => Ok(None),
        }
    }

    fn digest_image_id(&self, name: &str) -> Result<Option<String>> {
        let (repo, digest) = parse_repository_digest(name);
        let Some(digest) = digest else {
            return Ok(None);
        };
        let repo = self.normalizer.normalize(repo);

        let mut index = self.index.lock();
        self.reload(&mut index)?;
        Ok(index
            .digest_repository(&repo)
            .and_then(|r| r.get(digest))
            .map(str::to_string))
    }

    /// Point `repo:tag` at the image named by `image_name`.
    ///
    /// An empty tag means `latest`. An existing tag is only replaced when
    /// `force` is set.
    pub fn set_tag(&self, repo: &str, tag: &str, image_name: &str, force: bool) -> Result<()> {
        let image = self
            .lookup_image(image_name)?
            .ok_or_else(|| TagError::NotFound(format!("No such image: {}", image_name)))?;

        let tag = if tag.is_empty() { DEFAULT_TAG } else { tag };
        validate_repository_name(repo)?;
        validate_tag_name(tag)?;
        let repo = self.normalizer.normalize(repo);
        validate_repository_name(&repo)?;

        let replaced = {
            let mut index = self.index.lock();
            self.reload(&mut index)?;
            let replaced = index.set_tag(&repo, tag, &image.id, force)?;
            self.save(&index)?;
            replaced
        };

        tracing::info!(
            repository = %repo,
            tag,
            image = %image.id,
            replaced = ?replaced,
            "Tagged image"
        );
        self.emit(TagEvent::Tagged {
            repository: repo,
            tag: tag.to_string(),
            image_id: image.id,
            replaced,
        });
        Ok(())
    }

    /// Record that `digest` in `repo` refers to `image_id`.
    ///
    /// Digests are immutable: recording one that already exists is a
    /// `Conflict`, even for the same image.
    pub fn set_digest(&self, digest: &str, image_id: &str, repo: &str) -> Result<()> {
        Digest::parse(digest)?;
        validate_digest(digest)?;
        let repo = self.normalizer.normalize(repo);
        validate_repository_name(&repo)?;

        {
            let mut index = self.index.lock();
            self.reload(&mut index)?;
            index.set_digest(&repo, digest, image_id)?;
            self.save(&index)?;
        }

        tracing::info!(repository = %repo, digest, image = image_id, "Recorded digest");
        self.emit(TagEvent::DigestRecorded {
            repository: repo,
            digest: digest.to_string(),
            image_id: image_id.to_string(),
        });
        Ok(())
    }

    /// Remove `repo:tag`, or the whole repository when `tag` is empty.
    pub fn delete_tag(&self, repo: &str, tag: &str) -> Result<bool> {
        let repo = self.normalizer.normalize(repo);

        {
            let mut index = self.index.lock();
            self.reload(&mut index)?;
            index.delete_tag(&repo, tag)?;
            self.save(&index)?;
        }

        if tag.is_empty() {
            tracing::info!(repository = %repo, "Removed repository");
            self.emit(TagEvent::RepositoryRemoved { repository: repo });
        } else {
            tracing::info!(repository = %repo, tag, "Removed tag");
            self.emit(TagEvent::Untagged {
                repository: repo,
                tag: tag.to_string(),
            });
        }
        Ok(true)
    }

    /// Remove every `repo:tag` that refers to `image_id`.
    ///
    /// Names removed concurrently by another caller are skipped.
    pub fn delete_all(&self, image_id: &str) -> Result<()> {
        let Some(names) = self.by_id()?.remove(image_id) else {
            return Ok(());
        };
        for name in names {
            let (repo, tag) = split_repository_tag(&name);
            match self.delete_tag(repo, tag) {
                Ok(_) => {}
                Err(TagError::NotFound(msg)) => {
                    tracing::debug!(name = %name, "Skipping vanished name: {}", msg);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Reverse index: image id → sorted `repo:tag` names.
    pub fn by_id(&self) -> Result<HashMap<String, Vec<String>>> {
        let mut index = self.index.lock();
        self.reload(&mut index)?;
        Ok(index.by_id())
    }

    /// Preferred display name for an image: its first `repo:tag`, or its
    /// truncated id when untagged.
    pub fn image_name(&self, image_id: &str) -> Result<String> {
        let name = self
            .by_id()?
            .remove(image_id)
            .and_then(|names| names.into_iter().next());
        Ok(name.unwrap_or_else(|| truncate_id(image_id, self.short_id_len)))
    }

    /// `repo:tag` names grouped by truncated image id.
    pub fn repo_refs(&self) -> Result<HashMap<String, Vec<String>>> {
        let mut index = self.index.lock();
        self.reload(&mut index)?;
        Ok(index.repo_refs(self.short_id_len))
    }

    /// Replace the in-memory index with the on-disk snapshot.
    fn reload(&self, index: &mut RepositoryIndex) -> Result<()> {
        match persist::load(&self.path)? {
            Some(loaded) => *index = loaded,
            None => {
                tracing::debug!(path = %self.path.display(), "Index file missing, starting empty");
                *index = RepositoryIndex::new();
            }
        }
        Ok(())
    }

    fn save(&self, index: &RepositoryIndex) -> Result<()> {
        persist::save(&self.path, index).map_err(|e| {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to persist repository index; in-memory change will be lost on reload"
            );
            e
        })
    }

    fn emit(&self, event: TagEvent) {
        if let Some(events) = &self.events {
            events.emit(event);
        }
    }
}

impl std::fmt::Debug for TagStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagStore")
            .field("path", &self.path)
            .field("pool", &self.pool)
            .finish()
    }
}

fn absolute_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::MemoryResolver;
    use tempfile::TempDir;

    const IMAGE_A: &str = "sha256abc1230000000000000000000000";
    const IMAGE_B: &str = "fedcba9876543210fedcba9876543210";

    fn temp_store() -> (TempDir, TagStore) {
        let dir = tempfile::tempdir().unwrap();
        let resolver = MemoryResolver::new();
        resolver.insert(ImageMetadata::new(IMAGE_A));
        resolver.insert(ImageMetadata::new(IMAGE_B));
        let store = TagStore::new(dir.path().join("repositories.json"), Arc::new(resolver)).unwrap();
        (dir, store)
    }

    #[test]
    fn test_new_creates_index_file() {
        let (_dir, store) = temp_store();
        assert!(store.path().exists());
        assert!(store.path().is_absolute());
    }

    #[test]
    fn test_new_rejects_corrupt_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("repositories.json");
        std::fs::write(&path, "garbage").unwrap();

        let err = TagStore::new(&path, Arc::new(MemoryResolver::new())).unwrap_err();
        assert!(matches!(err, TagError::CorruptData { .. }));
    }

    #[test]
    fn test_tag_lookup_and_delete_scenario() {
        let (_dir, store) = temp_store();

        store.set_tag("library/foo", "1.0", IMAGE_A, false).unwrap();
        assert_eq!(
            store.get_image_id("library/foo", "1.0").unwrap().as_deref(),
            Some(IMAGE_A)
        );
        assert_eq!(
            store.get_image_id("library/foo", "sha256a").unwrap().as_deref(),
            Some(IMAGE_A)
        );

        assert!(store.delete_tag("library/foo", "1.0").unwrap());
        assert!(store.get("library/foo").unwrap().is_none());
    }

    #[test]
    fn test_set_tag_conflict_then_force() {
        let (_dir, store) = temp_store();
        store.set_tag("foo", "1.0", IMAGE_A, false).unwrap();

        let err = store.set_tag("foo", "1.0", IMAGE_B, false).unwrap_err();
        assert!(err.is_conflict());
        assert!(err.to_string().contains(IMAGE_A));
        assert_eq!(store.get_image_id("foo", "1.0").unwrap().as_deref(), Some(IMAGE_A));

        store.set_tag("foo", "1.0", IMAGE_B, true).unwrap();
        assert_eq!(store.get_image_id("foo", "1.0").unwrap().as_deref(), Some(IMAGE_B));
    }

    #[test]
    fn test_set_tag_defaults_to_latest() {
        let (_dir, store) = temp_store();
        store.set_tag("foo", "", IMAGE_A, false).unwrap();
        assert_eq!(store.get("foo").unwrap().unwrap().get("latest"), Some(IMAGE_A));
    }

    #[test]
    fn test_set_tag_invalid_names() {
        let (_dir, store) = temp_store();
        assert!(matches!(
            store.set_tag("scratch", "x", IMAGE_A, false).unwrap_err(),
            TagError::InvalidName(_)
        ));
        assert!(matches!(
            store.set_tag("", "x", IMAGE_A, false).unwrap_err(),
            TagError::InvalidName(_)
        ));
        assert!(matches!(
            store.set_tag("foo", "-bad", IMAGE_A, false).unwrap_err(),
            TagError::InvalidName(_)
        ));
    }

    #[test]
    fn test_set_tag_unknown_image() {
        let (_dir, store) = temp_store();
        let err = store.set_tag("foo", "1.0", "0000dead", false).unwrap_err();
        assert!(err.is_not_found());
        assert!(store.get("foo").unwrap().is_none());
    }

    #[test]
    fn test_set_tag_from_existing_tag() {
        let (_dir, store) = temp_store();
        store.set_tag("foo", "1.0", IMAGE_A, false).unwrap();
        store.set_tag("bar", "copy", "foo:1.0", false).unwrap();
        assert_eq!(store.get_image_id("bar", "copy").unwrap().as_deref(), Some(IMAGE_A));
    }

    #[test]
    fn test_names_are_normalized() {
        let (_dir, store) = temp_store();
        store
            .set_tag("docker.io/library/nginx", "1.25", IMAGE_A, false)
            .unwrap();
        assert!(store.get("nginx").unwrap().unwrap().contains_tag("1.25"));
        assert!(store.get("library/nginx").unwrap().is_some());
    }

    #[test]
    fn test_set_digest_conflict_keeps_original() {
        let (_dir, store) = temp_store();
        store.set_digest("sha256:deadbeef", "id1", "library/foo").unwrap();

        let err = store
            .set_digest("sha256:deadbeef", "id2", "library/foo")
            .unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(
            store.get_digests("library/foo").unwrap().unwrap().get("sha256:deadbeef"),
            Some("id1")
        );
    }

    #[test]
    fn test_set_digest_invalid() {
        let (_dir, store) = temp_store();
        for digest in ["deadbeef", "sha512:deadbeef", "sha256:", "sha256:DEADBEEF", "md5:aa"] {
            let err = store.set_digest(digest, "id1", "foo").unwrap_err();
            assert!(matches!(err, TagError::InvalidDigest(_)), "{digest}");
        }
    }

    #[test]
    fn test_get_image_by_digest() {
        let (_dir, store) = temp_store();
        store.set_digest("sha256:deadbeef", IMAGE_B, "foo").unwrap();

        let image = store.get_image_by_digest("foo@sha256:deadbeef").unwrap().unwrap();
        assert_eq!(image.id, IMAGE_B);
        assert!(store.get_image_by_digest("foo@sha256:0000").unwrap().is_none());
        assert!(store.get_image_by_digest("bar@sha256:deadbeef").unwrap().is_none());
        assert!(store.get_image_by_digest("foo").unwrap().is_none());

        let image = store.lookup_image("foo@sha256:deadbeef").unwrap().unwrap();
        assert_eq!(image.id, IMAGE_B);
    }

    #[test]
    fn test_lookup_falls_back_to_resolver() {
        let (_dir, store) = temp_store();
        let image = store.lookup_image("fedcba").unwrap().unwrap();
        assert_eq!(image.id, IMAGE_B);
        assert!(store.lookup_image("nothing:here").unwrap().is_none());
    }

    #[test]
    fn test_resolve_name() {
        let (_dir, store) = temp_store();
        store.set_tag("foo", "", IMAGE_A, false).unwrap();
        assert_eq!(store.resolve_name("foo").unwrap().as_deref(), Some(IMAGE_A));
        assert_eq!(store.resolve_name("fedcba").unwrap().as_deref(), Some(IMAGE_B));
        assert!(store.resolve_name("foo:2.0").unwrap().is_none());
    }

    #[test]
    fn test_empty_tag_means_latest() {
        let (_dir, store) = temp_store();
        store.set_tag("foo", "1.0", IMAGE_A, false).unwrap();

        assert!(store.resolve_name("foo:").unwrap().is_none());
        assert!(store.lookup_image("foo:").unwrap().is_none());
        assert!(store
            .set_tag("bar", "x", "foo:", false)
            .unwrap_err()
            .is_not_found());
        assert!(store.get("bar").unwrap().is_none());

        store.set_tag("foo", "latest", IMAGE_B, false).unwrap();
        assert_eq!(store.resolve_name("foo:").unwrap().as_deref(), Some(IMAGE_B));
        assert_eq!(store.lookup_image("foo:").unwrap().unwrap().id, IMAGE_B);
    }

    #[test]
    fn test_resolve_name_by_digest() {
        let (_dir, store) = temp_store();
        store.set_digest("sha256:deadbeef", IMAGE_A, "foo").unwrap();

        assert_eq!(
            store.resolve_name("foo@sha256:deadbeef").unwrap().as_deref(),
            Some(IMAGE_A)
        );
        assert!(store.resolve_name("foo@sha256:0000").unwrap().is_none());
    }

    #[test]
    fn test_delete_missing() {
        let (_dir, store) = temp_store();
        assert!(store.delete_tag("foo", "1.0").unwrap_err().is_not_found());

        store.set_tag("foo", "1.0", IMAGE_A, false).unwrap();
        assert!(store.delete_tag("foo", "2.0").unwrap_err().is_not_found());
    }

    #[test]
    fn test_delete_whole_repository() {
        let (_dir, store) = temp_store();
        store.set_tag("foo", "1.0", IMAGE_A, false).unwrap();
        store.set_tag("foo", "2.0", IMAGE_B, false).unwrap();

        assert!(store.delete_tag("foo", "").unwrap());
        assert!(store.get("foo").unwrap().is_none());
    }

    #[test]
    fn test_delete_all_names_for_image() {
        let (_dir, store) = temp_store();
        store.set_tag("foo", "1.0", IMAGE_A, false).unwrap();
        store.set_tag("bar", "latest", IMAGE_A, false).unwrap();
        store.set_tag("bar", "other", IMAGE_B, false).unwrap();

        store.delete_all(IMAGE_A).unwrap();
        assert!(store.get("foo").unwrap().is_none());
        let bar = store.get("bar").unwrap().unwrap();
        assert_eq!(bar.len(), 1);
        assert_eq!(bar.get("other"), Some(IMAGE_B));

        // No names left: no-op.
        store.delete_all(IMAGE_A).unwrap();
    }

    #[test]
    fn test_image_name() {
        let (_dir, store) = temp_store();
        store.set_tag("zeta", "1", IMAGE_A, false).unwrap();
        store.set_tag("alpha", "1", IMAGE_A, false).unwrap();

        assert_eq!(store.image_name(IMAGE_A).unwrap(), "alpha:1");
        assert_eq!(store.image_name(IMAGE_B).unwrap(), "fedcba987654");
    }

    #[test]
    fn test_repo_refs() {
        let (_dir, store) = temp_store();
        store.set_tag("foo", "1.0", IMAGE_B, false).unwrap();
        store.set_tag("foo", "2.0", IMAGE_B, false).unwrap();

        let refs = store.repo_refs().unwrap();
        assert_eq!(refs["fedcba987654"], vec!["foo:1.0", "foo:2.0"]);
    }

    #[test]
    fn test_get_returns_copy() {
        let (_dir, store) = temp_store();
        store.set_tag("foo", "1.0", IMAGE_A, false).unwrap();

        let mut copy = store.get("foo").unwrap().unwrap();
        copy.insert("sneaky", IMAGE_B);
        assert!(!store.get("foo").unwrap().unwrap().contains_tag("sneaky"));
    }

    #[test]
    fn test_reload_sees_external_writer() {
        let (dir, store) = temp_store();
        let resolver = MemoryResolver::new();
        resolver.insert(ImageMetadata::new(IMAGE_B));
        let other = TagStore::new(dir.path().join("repositories.json"), Arc::new(resolver)).unwrap();

        other.set_tag("foo", "1.0", IMAGE_B, false).unwrap();
        assert_eq!(store.get_image_id("foo", "1.0").unwrap().as_deref(), Some(IMAGE_B));
    }

    #[test]
    fn test_index_file_removed_externally() {
        let (_dir, store) = temp_store();
        store.set_tag("foo", "1.0", IMAGE_A, false).unwrap();
        std::fs::remove_file(store.path()).unwrap();

        assert!(store.get("foo").unwrap().is_none());
        store.set_tag("foo", "1.0", IMAGE_B, false).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_from_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("graph").join(IMAGE_A)).unwrap();
        let config = StoreConfig::with_root(dir.path());

        let store = TagStore::from_config(&config).unwrap();
        store.set_tag("foo", "1.0", "sha256abc", false).unwrap();
        assert_eq!(store.path(), dir.path().join("repositories.json"));
        assert_eq!(store.get_image_id("foo", "1.0").unwrap().as_deref(), Some(IMAGE_A));
    }

    #[tokio::test]
    async fn test_tag_events() {
        let emitter = EventEmitter::new(16);
        let mut rx = emitter.subscribe();
        let (_dir, store) = temp_store();
        let store = store.with_events(emitter);

        store.set_tag("foo", "1.0", IMAGE_A, false).unwrap();
        store.delete_tag("foo", "1.0").unwrap();

        assert_eq!(
            rx.recv().await.unwrap(),
            TagEvent::Tagged {
                repository: "foo".to_string(),
                tag: "1.0".to_string(),
                image_id: IMAGE_A.to_string(),
                replaced: None,
            }
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            TagEvent::Untagged {
                repository: "foo".to_string(),
                tag: "1.0".to_string(),
            }
        );
    }
}
