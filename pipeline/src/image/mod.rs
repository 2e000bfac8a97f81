//! Image-spec generation.
//!
//! Produces the declarative instructions consumed by the external image
//! build step: select a base image, then place the artifact package at
//! its fixed in-image path.

use crate::build::ARTIFACT_ENTRY_NAME;

/// In-image path the artifact package is placed at.
pub const ARTIFACT_TARGET_PATH: &str = "/root/chaincode-java/chaincode";

/// Declarative instructions for assembling a runnable image.
///
/// Immutable once generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSpec {
    instructions: Vec<String>,
}

impl ImageSpec {
    /// Generate the spec for a base image reference.
    ///
    /// Pure function of its input. The reference is passed through
    /// as-is, empty included; validating it is the image builder's
    /// responsibility.
    pub fn generate(base_image: &str) -> Self {
        let instructions = vec![
            format!("FROM {}", base_image),
            format!("ADD {} {}", ARTIFACT_ENTRY_NAME, ARTIFACT_TARGET_PATH),
        ];
        ImageSpec { instructions }
    }

    /// Instruction lines in order.
    pub fn instructions(&self) -> &[String] {
        &self.instructions
    }

    /// Render as newline-joined text.
    pub fn render(&self) -> String {
        self.instructions.join("\n")
    }
}
