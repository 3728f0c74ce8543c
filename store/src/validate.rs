//! Name and digest validation.
//!
//! Pure checks applied before any index mutation. None of these touch the
//! index or the disk.

use std::sync::OnceLock;

use a3s_tag_core::error::{Result, TagError};
use regex::Regex;

/// Repository name that can never be tagged.
pub const RESERVED_REPOSITORY: &str = "scratch";

/// The only digest algorithm accepted for recorded digests.
pub const SUPPORTED_DIGEST_ALGORITHM: &str = "sha256";

fn tag_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.-]{0,127}$").expect("tag regex"))
}

fn digest_hex_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-f0-9]*$").expect("digest hex regex"))
}

/// Validate a repository name.
pub fn validate_repository_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(TagError::InvalidName(
            "Repository name can't be empty".to_string(),
        ));
    }
    if name == RESERVED_REPOSITORY {
        return Err(TagError::InvalidName(format!(
            "'{}' is a reserved name",
            RESERVED_REPOSITORY
        )));
    }
    Ok(())
}

/// Validate a tag name: `[A-Za-z0-9_.-]`, must not start with `.` or `-`,
/// 1 to 128 characters.
pub fn validate_tag_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(TagError::InvalidName("Tag name can't be empty".to_string()));
    }
    if !tag_name_re().is_match(name) {
        return Err(TagError::InvalidName(format!(
            "Illegal tag name ({}): only [A-Za-z0-9_.-] are allowed, minimum 1, maximum 128 in length",
            name
        )));
    }
    Ok(())
}

/// Validate a digest string as `sha256:<lowercase hex>`.
pub fn validate_digest(value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(TagError::InvalidDigest("Digest can't be empty".to_string()));
    }
    let (algorithm, hex) = value
        .split_once(':')
        .ok_or_else(|| TagError::InvalidDigest("Missing digest prefix".to_string()))?;

    tracing::debug!(algorithm, hex, "Validating digest");

    if algorithm != SUPPORTED_DIGEST_ALGORITHM {
        return Err(TagError::InvalidDigest(
            "Only SHA256 is currently supported".to_string(),
        ));
    }
    if !digest_hex_re().is_match(hex) {
        return Err(TagError::InvalidDigest(format!(
            "Digest {:?} contains invalid characters",
            hex
        )));
    }
    Ok(())
}
