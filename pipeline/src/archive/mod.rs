//! Deployable-unit archive support.
//!
//! Archives are gzip-compressed tar streams. This module provides the
//! two archive-facing halves of the pipeline:
//!
//! - Validation of untrusted code packages against path and file-mode
//!   policies (`validate`)
//! - Canonical packaging of a source tree with exclusion rules
//!   (`package`)

pub mod package;
pub mod validate;

pub use package::{append_bytes, package_source, ExclusionRules};
pub use validate::{validate_package, ModePolicy, PathPolicy};
