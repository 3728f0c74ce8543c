//! Repository name normalization.
//!
//! Every repository name is canonicalized before it is used as an index key,
//! so `docker.io/library/nginx`, `library/nginx` and `nginx` share one entry.

/// Hostnames that address the default (Docker Hub) index.
const DEFAULT_INDEX_HOSTS: &[&str] = &["docker.io", "index.docker.io", "registry-1.docker.io"];

/// Namespace of official images on the default index.
const OFFICIAL_NAMESPACE: &str = "library/";

/// Canonicalizes a possibly-partial repository name.
pub trait NameNormalizer: Send + Sync {
    fn normalize(&self, name: &str) -> String;
}

/// Collapses default-index spellings to their short local name and leaves
/// names on other registries untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalNameNormalizer;

impl NameNormalizer for LocalNameNormalizer {
    fn normalize(&self, name: &str) -> String {
        let name = name.trim();

        let remote = match name.split_once('/') {
            Some((first, rest)) if DEFAULT_INDEX_HOSTS.contains(&first) => rest,
            Some((first, _)) if is_registry_host(first) => return name.to_string(),
            _ => name,
        };

        match remote.strip_prefix(OFFICIAL_NAMESPACE) {
            Some(short) if !short.is_empty() => short.to_string(),
            _ => remote.to_string(),
        }
    }
}

/// Uses names exactly as given.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityNormalizer;

impl NameNormalizer for IdentityNormalizer {
    fn normalize(&self, name: &str) -> String {
        name.to_string()
    }
}

/// A leading path component names a registry when it looks like a hostname.
fn is_registry_host(component: &str) -> bool {
    component.contains('.') || component.contains(':') || component == "localhost"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_official_spellings_collapse() {
        let n = LocalNameNormalizer;
        assert_eq!(n.normalize("nginx"), "nginx");
        assert_eq!(n.normalize("library/nginx"), "nginx");
        assert_eq!(n.normalize("docker.io/library/nginx"), "nginx");
        assert_eq!(n.normalize("index.docker.io/nginx"), "nginx");
        assert_eq!(n.normalize("  nginx  "), "nginx");
    }

    #[test]
    fn test_user_repository_kept() {
        let n = LocalNameNormalizer;
        assert_eq!(n.normalize("myuser/myimage"), "myuser/myimage");
        assert_eq!(n.normalize("docker.io/myuser/myimage"), "myuser/myimage");
    }

    #[test]
    fn test_other_registries_untouched() {
        let n = LocalNameNormalizer;
        assert_eq!(n.normalize("ghcr.io/org/image"), "ghcr.io/org/image");
        assert_eq!(n.normalize("localhost/library/foo"), "localhost/library/foo");
        assert_eq!(
            n.normalize("myregistry.io:5000/myimage"),
            "myregistry.io:5000/myimage"
        );
    }

    #[test]
    fn test_bare_library_prefix_kept() {
        assert_eq!(LocalNameNormalizer.normalize("library/"), "library/");
    }

    #[test]
    fn test_identity() {
        assert_eq!(IdentityNormalizer.normalize("library/nginx"), "library/nginx");
    }
}
