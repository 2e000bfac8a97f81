//! Untrusted code-package validation.
//!
//! Scans a gzip-compressed tar archive entry by entry and accepts or
//! rejects it as a whole. Validation is fail-fast: the first entry
//! violating either policy aborts with an error identifying it. The
//! archive is read-only during validation.

use flate2::read::GzDecoder;
use kiln_core::error::{KilnError, Result};
use regex::Regex;
use tar::Archive;

/// Allow/deny policy over archive entry paths.
///
/// An entry path is acceptable iff it matches `allow` and does not
/// match `deny`. Deny always wins, so a compiled artifact under an
/// otherwise allowed path is still rejected.
#[derive(Debug, Clone)]
pub struct PathPolicy {
    allow: Regex,
    deny: Regex,
}

impl PathPolicy {
    /// Compile a policy from allow and deny patterns.
    pub fn new(allow: &str, deny: &str) -> Result<Self> {
        let allow = Regex::new(allow)
            .map_err(|e| KilnError::Config(format!("invalid allow pattern: {}", e)))?;
        let deny = Regex::new(deny)
            .map_err(|e| KilnError::Config(format!("invalid deny pattern: {}", e)))?;
        Ok(Self { allow, deny })
    }

    /// Whether a path passes the policy.
    pub fn permits(&self, path: &str) -> bool {
        self.allow.is_match(path) && !self.deny.is_match(path)
    }
}

/// Bitmask of permitted file-mode bits.
///
/// A mode is acceptable iff it carries no bit outside the mask.
#[derive(Debug, Clone, Copy)]
pub struct ModePolicy {
    mask: u32,
}

impl ModePolicy {
    pub const fn new(mask: u32) -> Self {
        Self { mask }
    }

    /// Whether a mode carries only permitted bits.
    pub fn permits(&self, mode: u32) -> bool {
        mode & !self.mask == 0
    }
}

/// Validate an untrusted code package as a whole.
///
/// Empty input is trivially valid: there is nothing to check. A stream
/// that cannot be read as gzip-compressed tar is rejected as
/// [`KilnError::MalformedArchive`], distinct from a policy violation.
pub fn validate_package(code: &[u8], paths: &PathPolicy, modes: ModePolicy) -> Result<()> {
    if code.is_empty() {
        // Nothing to validate when no package was included.
        return Ok(());
    }

    let decoder = GzDecoder::new(code);
    let mut archive = Archive::new(decoder);
    let entries = archive.entries().map_err(|e| {
        KilnError::MalformedArchive(format!("failure opening code package stream: {}", e))
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| {
            KilnError::MalformedArchive(format!("failure reading code package entry: {}", e))
        })?;
        let path = entry
            .path()
            .map_err(|e| {
                KilnError::MalformedArchive(format!("failure reading entry path: {}", e))
            })?
            .to_string_lossy()
            .to_string();

        if !paths.permits(&path) {
            tracing::warn!(path = %path, "Rejecting code package: illegal path");
            return Err(KilnError::PolicyViolation {
                path,
                reason: "path not permitted by source policy".to_string(),
            });
        }

        let header = entry.header();
        if !header.entry_type().is_file() {
            tracing::warn!(path = %path, "Rejecting code package: not a regular file");
            return Err(KilnError::PolicyViolation {
                path,
                reason: "entry is not a regular file".to_string(),
            });
        }

        let mode = header.mode().map_err(|e| {
            KilnError::MalformedArchive(format!("failure reading entry mode: {}", e))
        })?;
        if !modes.permits(mode) {
            tracing::warn!(path = %path, mode = %format!("{:o}", mode), "Rejecting code package: illegal file mode");
            return Err(KilnError::PolicyViolation {
                path,
                reason: format!("file mode {:o} not permitted", mode),
            });
        }
    }

    Ok(())
}
