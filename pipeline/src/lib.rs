//! Kiln Pipeline - deployable-unit validation and build packaging.
//!
//! This crate turns an untrusted source archive for a deployable unit
//! into a build artifact consumable by a container image builder:
//!
//! - **Archive validation** - entry-by-entry path and file-mode policy
//!   checks over an untrusted gzip-compressed tar stream
//! - **Source packaging** - canonical archive construction from a source
//!   tree with directory and extension exclusions
//! - **Build orchestration** - drives an injected external build
//!   capability and packages its output as a named artifact entry
//! - **Image specs** - declarative base-image + artifact-placement
//!   instructions for the image build step
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    PlatformRegistry                      │
//! │        kind ("java", ...) → Box<dyn Platform>            │
//! └────────────────────────┬─────────────────────────────────┘
//!                          │
//!         ┌────────────────┼──────────────────┐
//!         ▼                ▼                  ▼
//!   archive::validate  archive::package   build::run_build
//!   (path/mode policy) (exclusion rules)  (BuildExecutor)
//!                                             │
//!                                             ▼
//!                                      image::ImageSpec
//! ```

pub mod archive;
pub mod build;
pub mod image;
pub mod platform;

// Re-export common types
pub use archive::{append_bytes, package_source, validate_package};
pub use archive::{ExclusionRules, ModePolicy, PathPolicy};
pub use build::{run_build, ArtifactInfo, BuildExecutor, BuildSpec, ARTIFACT_ENTRY_NAME};
pub use image::{ImageSpec, ARTIFACT_TARGET_PATH};
pub use platform::{JavaPlatform, Platform, PlatformRegistry};

/// Kiln Pipeline version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
