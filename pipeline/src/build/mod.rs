//! Build orchestration.
//!
//! Streams a validated source archive into an injected external build
//! capability and packages the resulting binary artifact as a single
//! named entry appended to a caller-owned build archive. All-or-nothing:
//! on failure nothing is appended and no retry is attempted here.

use std::io::{Cursor, Read, Write};

use kiln_core::error::{KilnError, Result};
use sha2::{Digest, Sha256};
use tar::Builder;

use crate::archive::package::append_bytes;

/// Entry name for the packaged build output.
pub const ARTIFACT_ENTRY_NAME: &str = "binpackage.tar";

/// One build invocation handed to a [`BuildExecutor`].
///
/// Consumed exactly once; not reused.
pub struct BuildSpec<'a> {
    /// Build environment image reference
    pub image: String,
    /// Command run against the input archive
    pub cmd: String,
    /// Source archive stream
    pub input: &'a mut dyn Read,
    /// Sink for the produced artifact bytes
    pub output: &'a mut dyn Write,
}

/// External build capability: bytes in, bytes out, error.
///
/// The pipeline blocks on [`execute`](BuildExecutor::execute) until the
/// capability returns; cancellation imposed outside this layer surfaces
/// as an execution error. Implementations can be substituted with an
/// in-process mock for testing.
pub trait BuildExecutor: Send + Sync {
    fn execute(&self, spec: BuildSpec<'_>) -> Result<()>;
}

/// A packaged build artifact.
#[derive(Debug, Clone)]
pub struct ArtifactInfo {
    /// SHA256 digest (hex) of the artifact bytes
    pub digest: String,
    /// Artifact size in bytes
    pub size: u64,
}

/// Run an external build over a source archive and append the artifact.
///
/// The entire output buffer becomes the content of one entry named
/// [`ARTIFACT_ENTRY_NAME`] in `out`, a tar stream the caller owns and
/// finalizes. Executor failure is wrapped as
/// [`KilnError::BuildFailure`]; partial output is discarded.
pub fn run_build<W: Write>(
    executor: &dyn BuildExecutor,
    image: &str,
    cmd: &str,
    code_package: &[u8],
    out: &mut Builder<W>,
) -> Result<ArtifactInfo> {
    let mut input = Cursor::new(code_package);
    let mut artifact: Vec<u8> = Vec::new();

    tracing::debug!(image, cmd, "Executing external build");
    executor
        .execute(BuildSpec {
            image: image.to_string(),
            cmd: cmd.to_string(),
            input: &mut input,
            output: &mut artifact,
        })
        .map_err(|e| {
            tracing::error!(image, error = %e, "External build failed");
            KilnError::BuildFailure(format!("build in {} failed: {}", image, e))
        })?;

    append_bytes(out, ARTIFACT_ENTRY_NAME, &artifact)?;

    let digest = hex::encode(Sha256::digest(&artifact));
    tracing::debug!(digest = %digest, size = artifact.len(), "Packaged build artifact");

    Ok(ArtifactInfo {
        digest,
        size: artifact.len() as u64,
    })
}
