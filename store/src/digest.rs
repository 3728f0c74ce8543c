//! Content digests (`algorithm:hex`).
//!
//! [`Digest::parse`] applies the general digest grammar (any of the
//! registry-supported SHA-2 algorithms, non-empty hex). Recording a digest
//! in the index additionally requires [`crate::validate::validate_digest`].

use std::fmt;

use a3s_tag_core::error::{Result, TagError};
use sha2::{Digest as _, Sha256};

/// Algorithms accepted by the general digest grammar.
const KNOWN_ALGORITHMS: &[&str] = &["sha256", "sha384", "sha512"];

/// A parsed content digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Digest {
    algorithm: String,
    hex: String,
}

impl Digest {
    /// Parse a digest string such as `sha256:e3b0c442...`.
    pub fn parse(value: &str) -> Result<Self> {
        let (algorithm, hex) = value.split_once(':').ok_or_else(|| {
            TagError::InvalidDigest(format!("invalid digest format: {:?}", value))
        })?;

        let algorithm_ok = !algorithm.is_empty()
            && algorithm
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '.'));
        if !algorithm_ok || hex.is_empty() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TagError::InvalidDigest(format!(
                "invalid digest format: {:?}",
                value
            )));
        }

        if !KNOWN_ALGORITHMS.contains(&algorithm) {
            return Err(TagError::InvalidDigest(format!(
                "unsupported digest algorithm: {}",
                algorithm
            )));
        }

        Ok(Self {
            algorithm: algorithm.to_string(),
            hex: hex.to_string(),
        })
    }

    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    pub fn hex(&self) -> &str {
        &self.hex
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.hex)
    }
}

/// Compute the canonical (`sha256`) digest of some content.
pub fn compute_digest(data: &[u8]) -> String {
    format!("sha256:{}", hex::encode(Sha256::digest(data)))
}
