//! Caller-frame introspection.
//!
//! When a failure arrives without a trace, the origin of a [`ContextualError`]
//! is the code that constructed it. How that code is located is pluggable: a
//! [`CallerProbe`] receives the `#[track_caller]` site of the constructor and
//! may use it, walk the live stack instead, or give up.
//!
//! A probe may fail by returning `None` or by panicking. Either way the error
//! is still built, with an unknown origin.
//!
//! [`ContextualError`]: crate::error::ContextualError

use crate::origin::SourcePosition;
use serde::{Deserialize, Serialize};
use std::backtrace::Backtrace;
use std::fmt;
use std::panic::Location;
use std::str::FromStr;

/// Resolves the position of the code that constructed an error.
pub trait CallerProbe: Send + Sync {
    fn name(&self) -> &'static str;

    /// `site` is the first caller outside `#[track_caller]` wrapper layers.
    fn caller(&self, site: &'static Location<'static>) -> Option<SourcePosition>;
}

/// Uses the compiler-provided caller location.
#[derive(Debug, Default, Clone, Copy)]
pub struct TrackCallerProbe;

impl CallerProbe for TrackCallerProbe {
    fn name(&self) -> &'static str {
        "track_caller"
    }

    fn caller(&self, site: &'static Location<'static>) -> Option<SourcePosition> {
        Some(SourcePosition::from(site))
    }
}

/// Never resolves a caller; every untraced error gets an unknown origin.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledProbe;

impl CallerProbe for DisabledProbe {
    fn name(&self) -> &'static str {
        "disabled"
    }

    fn caller(&self, _site: &'static Location<'static>) -> Option<SourcePosition> {
        None
    }
}

/// Walks a captured backtrace.
///
/// Frames belonging to the runtime and to this crate's error-building code
/// are passed over; the first frame after them is the caller. `skip` moves
/// that many frames further out, for callers that route construction through
/// helpers of their own.
///
/// Needs line tables in the binary. Without them no frame carries a file and
/// the probe resolves nothing.
///
/// Paths are the ones the backtrace prints, with a leading `./` removed. They
/// are relative to the working directory of the process, so they can be a
/// suffix of the path `file!()` reports for the same line.
#[derive(Debug, Default, Clone, Copy)]
pub struct BacktraceProbe {
    skip: usize,
}

/// Symbol prefixes of frames that are never the caller.
const RUNTIME_PREFIXES: &[&str] = &[
    "std::",
    "core::",
    "alloc::",
    "backtrace::",
    "rust_begin_unwind",
    "__rust",
];

/// Modules of this crate that take part in building an error.
const WRAPPER_PREFIXES: &[&str] = &[
    "netsec_core::probe::",
    "netsec_core::error::",
    "netsec_core::reporter::",
    "netsec_core::ambient::",
];

impl BacktraceProbe {
    pub fn new(skip: usize) -> Self {
        Self { skip }
    }

    pub fn skip(&self) -> usize {
        self.skip
    }

    fn is_internal(symbol: &str) -> bool {
        let symbol = symbol.trim_start_matches('<');
        if RUNTIME_PREFIXES.iter().any(|prefix| symbol.starts_with(prefix)) {
            return true;
        }
        // Test modules live inside wrapper modules but are callers.
        WRAPPER_PREFIXES.iter().any(|prefix| symbol.starts_with(prefix)) && !symbol.contains("::tests::")
    }

    /// Picks the caller out of frames ordered innermost first.
    fn select(&self, frames: &[StackEntry]) -> Option<SourcePosition> {
        frames
            .iter()
            .skip_while(|frame| frame.symbol.as_deref().is_none_or(Self::is_internal))
            .filter_map(|frame| frame.position.clone())
            .nth(self.skip)
    }
}

impl CallerProbe for BacktraceProbe {
    fn name(&self) -> &'static str {
        "backtrace"
    }

    fn caller(&self, _site: &'static Location<'static>) -> Option<SourcePosition> {
        let backtrace = Backtrace::force_capture();
        let frames = parse_backtrace(&backtrace.to_string());
        self.select(&frames)
    }
}

/// One frame of a rendered backtrace.
#[derive(Debug, Clone, PartialEq, Eq)]
struct StackEntry {
    symbol: Option<String>,
    position: Option<SourcePosition>,
}

/// Parses the textual form of [`Backtrace`]:
///
/// ```text
///    0: crate::module::function
///              at ./src/module.rs:12:5
/// ```
fn parse_backtrace(rendered: &str) -> Vec<StackEntry> {
    let mut frames: Vec<StackEntry> = Vec::new();

    for line in rendered.lines() {
        let line = line.trim();
        if let Some(location) = line.strip_prefix("at ") {
            if let Some(frame) = frames.last_mut() {
                if frame.position.is_none() {
                    frame.position = parse_location(location);
                }
            }
            continue;
        }

        if let Some((index, symbol)) = line.split_once(": ") {
            if index.chars().all(|c| c.is_ascii_digit()) && !index.is_empty() {
                frames.push(StackEntry { symbol: Some(symbol.trim().to_string()), position: None });
            }
        }
    }

    frames
}

/// Parses `path:line:column` (column optional).
fn parse_location(location: &str) -> Option<SourcePosition> {
    let location = location.strip_prefix("./").unwrap_or(location);
    let mut parts = location.rsplitn(3, ':');
    let last = parts.next()?;
    let middle = parts.next()?;

    match parts.next() {
        Some(file) => {
            let line = middle.parse().ok()?;
            last.parse::<u32>().ok()?;
            Some(SourcePosition::new(file, line))
        }
        None => Some(SourcePosition::new(middle, last.parse().ok()?)),
    }
}

/// Selects a probe from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeKind {
    #[default]
    TrackCaller,
    Backtrace,
    Disabled,
}

impl ProbeKind {
    pub fn build(self, skip_frames: usize) -> Box<dyn CallerProbe> {
        match self {
            Self::TrackCaller => Box::new(TrackCallerProbe),
            Self::Backtrace => Box::new(BacktraceProbe::new(skip_frames)),
            Self::Disabled => Box::new(DisabledProbe),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TrackCaller => "track_caller",
            Self::Backtrace => "backtrace",
            Self::Disabled => "disabled",
        }
    }
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProbeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "track_caller" => Ok(Self::TrackCaller),
            "backtrace" => Ok(Self::Backtrace),
            "disabled" | "none" => Ok(Self::Disabled),
            other => Err(format!("unknown probe '{other}' (expected track_caller, backtrace or disabled)")),
        }
    }
}
