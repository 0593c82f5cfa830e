//! Package command implementation.

use netsec_packaging::PackageMetadata;
use std::path::PathBuf;

/// Execute the package command.
pub fn execute(root: Option<PathBuf>) -> anyhow::Result<()> {
    let root = root.unwrap_or_else(|| PathBuf::from("."));
    let metadata = PackageMetadata::discover(&root)?;
    print!("{}", toml::to_string_pretty(&metadata)?);
    Ok(())
}
