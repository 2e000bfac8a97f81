//! Deployable-unit platform support.
//!
//! Each deployable-unit kind implements the [`Platform`] capability
//! interface; a [`PlatformRegistry`] maps kind name to implementation.
//! The registry is constructed once at process start, so there is no
//! global mutable registration.

use std::collections::HashMap;
use std::io::Write;

use kiln_core::config::KilnConfig;
use kiln_core::error::Result;
use tar::Builder;

use crate::build::{ArtifactInfo, BuildExecutor};
use crate::image::ImageSpec;

pub mod java;

pub use java::JavaPlatform;

/// Capability interface for one deployable-unit kind.
pub trait Platform: Send + Sync {
    /// Kind name this platform serves.
    fn name(&self) -> &'static str;

    /// Accept or reject an untrusted code package as a whole.
    fn validate_code_package(&self, code: &[u8]) -> Result<()>;

    /// Package a source tree into the canonical deployable archive.
    fn deployment_payload(&self, path: &str) -> Result<Vec<u8>>;

    /// Instructions for assembling the runnable image.
    fn image_spec(&self) -> ImageSpec;

    /// Build the code package and append the artifact entry to `out`.
    ///
    /// `out` is a shared build archive the caller owns and finalizes;
    /// this only contributes the one artifact entry.
    fn generate_build(
        &self,
        code: &[u8],
        executor: &dyn BuildExecutor,
        out: &mut Builder<&mut dyn Write>,
    ) -> Result<ArtifactInfo>;
}

/// Registry mapping deployable-unit kind to its platform.
pub struct PlatformRegistry {
    platforms: HashMap<&'static str, Box<dyn Platform>>,
}

impl PlatformRegistry {
    /// Build the registry with the built-in platforms.
    pub fn new(config: &KilnConfig) -> Result<Self> {
        let mut platforms: HashMap<&'static str, Box<dyn Platform>> = HashMap::new();

        let java = JavaPlatform::new(config)?;
        platforms.insert(java.name(), Box::new(java));

        Ok(Self { platforms })
    }

    /// Look up the platform for a kind.
    pub fn get(&self, kind: &str) -> Option<&dyn Platform> {
        self.platforms.get(kind).map(|p| p.as_ref())
    }

    /// Registered kind names.
    pub fn kinds(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.platforms.keys().copied()
    }
}
