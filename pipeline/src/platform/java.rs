//! Java deployable-unit platform.
//!
//! Binds the generic pipeline machinery to the policy constants of java
//! deployable units: the source path policy, the permitted file-mode
//! mask, the packaging exclusions, and the runtime base image.

use std::io::Write;

use kiln_core::config::KilnConfig;
use kiln_core::error::Result;
use tar::Builder;

use crate::archive::package::{package_source, ExclusionRules};
use crate::archive::validate::{validate_package, ModePolicy, PathPolicy};
use crate::build::{run_build, ArtifactInfo, BuildExecutor};
use crate::image::ImageSpec;
use crate::platform::Platform;

/// Paths permitted in a java code package: the designated source
/// subtree, project metadata, or a build descriptor at the package root.
const SOURCE_ALLOW: &str =
    r"^(/)?src/((src|META-INF)/.*|(build\.gradle|settings\.gradle|pom\.xml))";

/// Compiled artifacts are denied everywhere, even under allowed paths.
const SOURCE_DENY: &str = r".*\.class$";

/// Regular-file type bit plus rw-rw-rw-; anything else is suspect.
const PERMITTED_MODE_BITS: u32 = 0o100666;

/// Directory names pruned while packaging java sources.
const EXCLUDED_DIRS: [&str; 3] = ["target", "build", "out"];

/// File suffixes skipped while packaging java sources.
const EXCLUDED_EXTENSIONS: [&str; 1] = [".class"];

/// Command run inside the build environment.
const BUILD_CMD: &str = "./build.sh";

/// Fallback runtime image when the configuration carries none.
const DEFAULT_RUNTIME_IMAGE: &str = "hyperledger/fabric-javaenv";

/// Platform for java deployable units.
pub struct JavaPlatform {
    paths: PathPolicy,
    modes: ModePolicy,
    exclusions: ExclusionRules,
    runtime_image: String,
}

impl JavaPlatform {
    pub fn new(config: &KilnConfig) -> Result<Self> {
        let runtime_image = config
            .runtime_image("java")
            .unwrap_or(DEFAULT_RUNTIME_IMAGE)
            .to_string();

        Ok(Self {
            paths: PathPolicy::new(SOURCE_ALLOW, SOURCE_DENY)?,
            modes: ModePolicy::new(PERMITTED_MODE_BITS),
            exclusions: ExclusionRules::new(&EXCLUDED_DIRS, &EXCLUDED_EXTENSIONS),
            runtime_image,
        })
    }
}

impl Platform for JavaPlatform {
    fn name(&self) -> &'static str {
        "java"
    }

    fn validate_code_package(&self, code: &[u8]) -> Result<()> {
        validate_package(code, &self.paths, self.modes)
    }

    fn deployment_payload(&self, path: &str) -> Result<Vec<u8>> {
        package_source(path, &self.exclusions)
    }

    fn image_spec(&self) -> ImageSpec {
        ImageSpec::generate(&self.runtime_image)
    }

    fn generate_build(
        &self,
        code: &[u8],
        executor: &dyn BuildExecutor,
        out: &mut Builder<&mut dyn Write>,
    ) -> Result<ArtifactInfo> {
        run_build(executor, &self.runtime_image, BUILD_CMD, code, out)
    }
}
