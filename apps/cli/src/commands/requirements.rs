//! Requirements command implementation.

use netsec_packaging::read_requirements;
use std::path::PathBuf;

/// Execute the requirements command.
///
/// Prints one requirement per line. A missing file prints nothing.
pub fn execute(path: Option<PathBuf>) -> anyhow::Result<()> {
    let path = path.unwrap_or_else(|| PathBuf::from("requirements.txt"));

    for requirement in read_requirements(&path)? {
        println!("{requirement}");
    }

    Ok(())
}
