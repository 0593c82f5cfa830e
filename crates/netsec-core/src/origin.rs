//! Source positions attached to a contextual error.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::Location;

/// Placeholder rendered when the origin of a failure cannot be determined.
pub const UNKNOWN: &str = "Unknown";

/// A file path and line number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourcePosition {
    pub file: String,
    pub line: u32,
}

impl SourcePosition {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self { file: file.into(), line }
    }
}

impl From<&Location<'_>> for SourcePosition {
    fn from(location: &Location<'_>) -> Self {
        Self::new(location.file(), location.line())
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Where a failure was detected.
///
/// File and line are either both known or both unknown; there is no way to
/// hold one without the other.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Origin {
    Known(SourcePosition),
    Unknown,
}

impl Origin {
    /// The source file, or [`UNKNOWN`].
    pub fn file(&self) -> &str {
        match self {
            Self::Known(position) => &position.file,
            Self::Unknown => UNKNOWN,
        }
    }

    /// The line number as rendered text, or [`UNKNOWN`].
    pub fn line(&self) -> LineNumber {
        match self {
            Self::Known(position) => LineNumber::Line(position.line),
            Self::Unknown => LineNumber::Unknown,
        }
    }

    pub fn position(&self) -> Option<&SourcePosition> {
        match self {
            Self::Known(position) => Some(position),
            Self::Unknown => None,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }
}

impl From<SourcePosition> for Origin {
    fn from(position: SourcePosition) -> Self {
        Self::Known(position)
    }
}

impl From<Option<SourcePosition>> for Origin {
    fn from(position: Option<SourcePosition>) -> Self {
        position.map_or(Self::Unknown, Self::Known)
    }
}

/// A line number, or the sentinel when none could be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineNumber {
    Line(u32),
    Unknown,
}

impl LineNumber {
    pub fn get(self) -> Option<u32> {
        match self {
            Self::Line(line) => Some(line),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for LineNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line(line) => write!(f, "{line}"),
            Self::Unknown => f.write_str(UNKNOWN),
        }
    }
}
