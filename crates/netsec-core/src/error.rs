//! The contextual error type.

use crate::ambient;
use crate::details::ErrorDetails;
use crate::origin::{LineNumber, Origin};
use crate::reporter::Reporter;
use crate::trace::FailureTrace;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use thiserror::Error;

/// Wording placed before the first bracketed field of a rendered error.
pub const DEFAULT_LABEL: &str = "python script name";

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A failure annotated with the source position it originated from.
///
/// The position comes from, in order: the innermost frame of an explicit
/// [`FailureTrace`], the caller of the constructor as resolved by the
/// reporter's probe, or nothing at all, in which case both file and line
/// render as `Unknown`. Building one never fails and never panics.
///
/// Renders as
///
/// ```text
/// Error occured in python script name [<file>] line number [<line>] error message [<message>]
/// ```
#[derive(Debug, Error)]
pub struct ContextualError {
    message: String,
    origin: Origin,
    details: ErrorDetails,
    label: Cow<'static, str>,
    trace: Option<FailureTrace>,
    #[source]
    source: Option<BoxError>,
}

impl ContextualError {
    /// Wraps a failure described by `message`.
    ///
    /// `trace` takes precedence when it has frames; otherwise the origin is
    /// the code calling this function.
    #[track_caller]
    pub fn new(message: impl Into<String>, details: impl Into<ErrorDetails>, trace: Option<FailureTrace>) -> Self {
        Reporter::default().wrap(message, details, trace)
    }

    /// Wraps a failure using the thread's current failure as its trace.
    ///
    /// Meant for the outermost layer, right after a [`guarded`] region failed.
    /// The current failure is consumed.
    ///
    /// [`guarded`]: crate::ambient::guarded
    #[track_caller]
    pub fn from_current(message: impl Into<String>, details: impl Into<ErrorDetails>) -> Self {
        Self::new(message, details, ambient::take_current())
    }

    /// Wraps `err`, using its rendering as the message and keeping it as the source.
    #[track_caller]
    pub fn from_error<E>(err: E, details: impl Into<ErrorDetails>) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Reporter::default().wrap_error(err, details)
    }

    pub(crate) fn assemble(
        message: String,
        origin: Origin,
        details: ErrorDetails,
        label: Cow<'static, str>,
        trace: Option<FailureTrace>,
        source: Option<BoxError>,
    ) -> Self {
        Self { message, origin, details, label, trace, source }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// The file the failure was detected in, or `Unknown`.
    pub fn source_location(&self) -> &str {
        self.origin.file()
    }

    pub fn line_number(&self) -> LineNumber {
        self.origin.line()
    }

    pub fn details(&self) -> &ErrorDetails {
        &self.details
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// The trace the origin was taken from, if one was supplied.
    pub fn trace(&self) -> Option<&FailureTrace> {
        self.trace.as_ref()
    }

    /// The rendered diagnostic line.
    pub fn describe(&self) -> String {
        self.to_string()
    }

    /// Structured form of the diagnostic, for machine-readable output.
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            source_location: self.origin.file().to_string(),
            line_number: self.origin.line().get(),
            message: self.message.clone(),
            description: self.describe(),
        }
    }
}

impl fmt::Display for ContextualError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error occured in {} [{}] line number [{}] error message [{}]",
            self.label,
            self.origin.file(),
            self.origin.line(),
            self.message
        )
    }
}

/// Serializable view of a [`ContextualError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub source_location: String,
    /// `None` when the line is unknown.
    pub line_number: Option<u32>,
    pub message: String,
    pub description: String,
}

/// Wrap the error of a `Result` at the point it is first handled.
pub trait ResultExt<T> {
    fn contextualize(self, details: impl Into<ErrorDetails>) -> Result<T, ContextualError>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    #[track_caller]
    fn contextualize(self, details: impl Into<ErrorDetails>) -> Result<T, ContextualError> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(ContextualError::from_error(err, details)),
        }
    }
}
