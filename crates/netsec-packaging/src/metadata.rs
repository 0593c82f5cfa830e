//! Package metadata.
//!
//! Defaults describe the `NetworkSecurity` package; `discover` fills in the
//! long description and requirements from a project root.

use crate::error::{PackagingError, PackagingResult};
use crate::requirements::read_requirements;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Description of the package as handed to packaging tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMetadata {
    pub name: String,
    pub version: String,
    pub author: String,
    pub author_email: String,
    pub description: String,
    /// Minimum interpreter/runtime the package supports.
    pub requires_runtime: String,
    /// Contents of the project README, empty when there is none.
    #[serde(default)]
    pub long_description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
}

impl Default for PackageMetadata {
    fn default() -> Self {
        Self {
            name: "NetworkSecurity".to_string(),
            version: "0.0.1".to_string(),
            author: "Acash Tech".to_string(),
            author_email: "acashtech28@gmail.com".to_string(),
            description: "A FastAPI-based data ingestion and ML pipeline with MongoDB integration".to_string(),
            requires_runtime: ">=3.10".to_string(),
            long_description: String::new(),
            requirements: Vec::new(),
        }
    }
}

impl PackageMetadata {
    /// Default metadata filled in from `requirements.txt` and `README.md` under `root`.
    pub fn discover(root: &Path) -> PackagingResult<Self> {
        let readme = root.join("README.md");
        let long_description = if readme.is_file() {
            std::fs::read_to_string(&readme).map_err(|source| PackagingError::Read { path: readme.clone(), source })?
        } else {
            String::new()
        };

        let metadata = Self {
            long_description,
            requirements: read_requirements(&root.join("requirements.txt"))?,
            ..Self::default()
        };
        metadata.validate()?;
        Ok(metadata)
    }

    pub fn validate(&self) -> PackagingResult<()> {
        if self.name.trim().is_empty() {
            return Err(PackagingError::InvalidMetadata("name must not be empty".to_string()));
        }
        if self.version.split('.').any(|part| part.parse::<u64>().is_err()) {
            return Err(PackagingError::InvalidMetadata(format!("version '{}' is not dotted numeric", self.version)));
        }
        Ok(())
    }
}
