//! Failure traces
//!
//! A [`FailureTrace`] is the failure context available at the moment a failure
//! is caught: what kind of failure it was, its rendered value, and the frames
//! that were active when it happened.

use crate::origin::SourcePosition;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::Location;

/// A single frame in a failure trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceFrame {
    pub file: String,
    pub line: u32,
    /// Function or context name, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
}

impl TraceFrame {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self { file: file.into(), line, function: None }
    }

    #[must_use]
    pub fn with_function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }

    pub fn position(&self) -> SourcePosition {
        SourcePosition::new(self.file.clone(), self.line)
    }
}

impl From<&Location<'_>> for TraceFrame {
    fn from(location: &Location<'_>) -> Self {
        Self::new(location.file(), location.line())
    }
}

/// Kind of failure a trace was captured from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// A closure returned `Err`.
    Error,
    /// A closure panicked.
    Panic,
    /// Any other named failure type.
    Named(String),
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => f.write_str("error"),
            Self::Panic => f.write_str("panic"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// Failure kind, failure value and the frames active when it occurred.
///
/// Frames are ordered outermost first; the last frame is where the failure
/// was raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureTrace {
    pub kind: FailureKind,
    pub value: String,
    #[serde(default)]
    pub frames: Vec<TraceFrame>,
}

impl FailureTrace {
    pub fn new(kind: FailureKind, value: impl Into<String>) -> Self {
        Self { kind, value: value.into(), frames: Vec::new() }
    }

    /// A trace with a single frame at `location`.
    pub fn at(kind: FailureKind, value: impl Into<String>, location: &Location<'_>) -> Self {
        Self::new(kind, value).with_frame(TraceFrame::from(location))
    }

    /// A trace for `err` raised at the caller's location.
    #[track_caller]
    pub fn capture<E: fmt::Display + ?Sized>(err: &E) -> Self {
        Self::at(FailureKind::Error, err.to_string(), Location::caller())
    }

    #[must_use]
    pub fn with_frame(mut self, frame: TraceFrame) -> Self {
        self.frames.push(frame);
        self
    }

    pub fn push(&mut self, frame: TraceFrame) {
        self.frames.push(frame);
    }

    pub fn frames(&self) -> &[TraceFrame] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// The deepest frame: where the failure was raised.
    pub fn innermost(&self) -> Option<&TraceFrame> {
        self.frames.last()
    }
}

impl fmt::Display for FailureTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}: {}", self.kind, self.value)?;
        for (i, frame) in self.frames.iter().enumerate() {
            match &frame.function {
                Some(function) => writeln!(f, "{:2}. in {} at {}:{}", i + 1, function, frame.file, frame.line)?,
                None => writeln!(f, "{:2}. at {}:{}", i + 1, frame.file, frame.line)?,
            }
        }
        Ok(())
    }
}
