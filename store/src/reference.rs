//! Qualified name parsing.
//!
//! Splits `repo[:tag]` and `repo@digest` strings. A `:` that appears before
//! the last `/` belongs to a registry host (`host:5000/repo`), not a tag.

/// Default tag when none is specified.
pub const DEFAULT_TAG: &str = "latest";

/// Split `repo[:tag]` into its repository and optional tag.
///
/// A `repo@digest` reference yields the digest in the tag position, so a
/// caller that only understands tags still sees the full reference suffix.
///
/// - `foo` → (`foo`, None)
/// - `foo:1.0` → (`foo`, Some(`1.0`))
/// - `host:5000/foo` → (`host:5000/foo`, None)
/// - `foo@sha256:abc` → (`foo`, Some(`sha256:abc`))
pub fn parse_repository_tag(name: &str) -> (&str, Option<&str>) {
    if let Some((repo, digest)) = name.split_once('@') {
        return (repo, Some(digest));
    }
    match name.rsplit_once(':') {
        Some((repo, tag)) if !tag.contains('/') => (repo, Some(tag)),
        _ => (name, None),
    }
}

/// Split `repo@digest` into its repository and optional digest.
pub fn parse_repository_digest(name: &str) -> (&str, Option<&str>) {
    match name.rsplit_once('@') {
        Some((repo, digest)) => (repo, Some(digest)),
        None => (name, None),
    }
}

/// Join a repository and tag into a `repo:tag` reference.
pub fn join_repository_tag(repository: &str, tag: &str) -> String {
    format!("{}:{}", repository, tag)
}

/// Split a `repo:tag` reference produced by [`join_repository_tag`].
///
/// The split happens at the last `:` so registry ports survive.
pub fn split_repository_tag(name: &str) -> (&str, &str) {
    match name.rsplit_once(':') {
        Some((repo, tag)) if !tag.contains('/') => (repo, tag),
        _ => (name, ""),
    }
}

/// Shorten an image id for display, dropping any `algorithm:` prefix.
pub fn truncate_id(id: &str, len: usize) -> String {
    let hex = id.split_once(':').map(|(_, hex)| hex).unwrap_or(id);
    hex.chars().take(len).collect()
}
