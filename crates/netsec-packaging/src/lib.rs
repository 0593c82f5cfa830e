//! Netsec Packaging
//!
//! Build-side helpers kept apart from the error core:
//! - Reading a line-oriented requirements file (`read_requirements`)
//! - Describing the package (`PackageMetadata`)

pub mod error;
pub mod metadata;
pub mod requirements;

pub use error::{PackagingError, PackagingResult};
pub use metadata::PackageMetadata;
pub use requirements::{parse_requirements, read_requirements, SELF_INSTALL_MARKER};
