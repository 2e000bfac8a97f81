use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::Result;

/// Default runtime base image for java deployable units.
const DEFAULT_JAVA_RUNTIME: &str = "hyperledger/fabric-javaenv";

/// Kiln pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KilnConfig {
    /// Runtime base image per deployable-unit kind
    pub runtime_images: HashMap<String, String>,
}

impl Default for KilnConfig {
    fn default() -> Self {
        let mut runtime_images = HashMap::new();
        runtime_images.insert("java".to_string(), DEFAULT_JAVA_RUNTIME.to_string());
        Self { runtime_images }
    }
}

impl KilnConfig {
    /// Runtime base image for a deployable-unit kind, if one is configured.
    pub fn runtime_image(&self, kind: &str) -> Option<&str> {
        self.runtime_images.get(kind).map(String::as_str)
    }

    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: KilnConfig = serde_json::from_str(&content)?;
        tracing::debug!(path = %path.display(), "Loaded pipeline configuration");
        Ok(config)
    }
}
