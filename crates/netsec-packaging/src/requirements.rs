//! Requirements file reader.

use crate::error::{PackagingError, PackagingResult};
use std::io::ErrorKind;
use std::path::Path;

/// Line that installs the package itself in editable mode; never a dependency.
pub const SELF_INSTALL_MARKER: &str = "-e .";

/// Extracts requirement specifiers from requirements-file text.
///
/// Lines are trimmed. Blank lines, `#` comments and the self-install marker
/// are dropped; everything else is kept verbatim, in order.
pub fn parse_requirements(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && *line != SELF_INSTALL_MARKER)
        .map(str::to_string)
        .collect()
}

/// Reads requirements from `path`.
///
/// A missing file is not an error: it is logged and yields no requirements.
pub fn read_requirements(path: &Path) -> PackagingResult<Vec<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let requirements = parse_requirements(&content);
            tracing::debug!(path = %path.display(), count = requirements.len(), "Read requirements");
            Ok(requirements)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "requirements file not found");
            Ok(Vec::new())
        }
        Err(source) => Err(PackagingError::Read { path: path.to_path_buf(), source }),
    }
}
