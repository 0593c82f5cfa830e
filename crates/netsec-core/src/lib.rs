//! Netsec Core
//!
//! Contextual error capture:
//! - Wrapping a failure in a [`ContextualError`] that knows its source file and line
//! - Resolving that position from an explicit trace, the thread's current failure,
//!   or the constructor's caller (`CallerProbe`)
//! - Rendering the diagnostic line
//! - Configuration and logging setup for binaries built on top
//!
//! # Example
//!
//! ```rust
//! use netsec_core::{ambient, ContextualError, ErrorDetails};
//!
//! let divisor = std::hint::black_box(0);
//! let failure = ambient::guard_panic(|| 1 / divisor).unwrap_err();
//! let err = ContextualError::new("division by zero", ErrorDetails::none(), Some(failure));
//! assert!(err.describe().ends_with("error message [division by zero]"));
//! ```

pub mod ambient;
pub mod config;
pub mod details;
pub mod error;
pub mod logging;
pub mod origin;
pub mod probe;
pub mod reporter;
pub mod trace;

pub use ambient::{guard_panic, guarded};
pub use config::{
    CaptureConfig, CaptureLayer, ConfigError, ConfigLayer, ConfigResult, LogFormat, LoggingConfig, LoggingLayer,
    NetsecConfig, RenderConfig, RenderLayer,
};
pub use details::{ErrorDetails, ProcessSnapshot};
pub use error::{ContextualError, ErrorReport, ResultExt, DEFAULT_LABEL};
pub use origin::{LineNumber, Origin, SourcePosition, UNKNOWN};
pub use probe::{BacktraceProbe, CallerProbe, DisabledProbe, ProbeKind, TrackCallerProbe};
pub use reporter::Reporter;
pub use trace::{FailureKind, FailureTrace, TraceFrame};
