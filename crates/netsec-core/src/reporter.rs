//! Configured construction of contextual errors.

use crate::ambient;
use crate::config::{CaptureConfig, RenderConfig};
use crate::details::ErrorDetails;
use crate::error::{BoxError, ContextualError, DEFAULT_LABEL};
use crate::origin::Origin;
use crate::probe::{CallerProbe, TrackCallerProbe};
use crate::trace::FailureTrace;
use std::borrow::Cow;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Builds [`ContextualError`]s with a chosen probe and wording.
///
/// `ContextualError::new` uses `Reporter::default()`: the `#[track_caller]`
/// probe and the legacy label.
#[derive(Clone)]
pub struct Reporter {
    probe: Arc<dyn CallerProbe>,
    label: Cow<'static, str>,
}

impl Default for Reporter {
    fn default() -> Self {
        Self { probe: Arc::new(TrackCallerProbe), label: Cow::Borrowed(DEFAULT_LABEL) }
    }
}

impl fmt::Debug for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reporter").field("probe", &self.probe.name()).field("label", &self.label).finish()
    }
}

impl Reporter {
    pub fn new(probe: impl CallerProbe + 'static) -> Self {
        Self { probe: Arc::new(probe), ..Self::default() }
    }

    pub fn from_config(capture: &CaptureConfig, render: &RenderConfig) -> Self {
        Self {
            probe: Arc::from(capture.probe.build(capture.skip_frames)),
            label: Cow::Owned(render.label.clone()),
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.label = label.into();
        self
    }

    pub fn probe_name(&self) -> &'static str {
        self.probe.name()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    #[track_caller]
    pub fn wrap(
        &self,
        message: impl Into<String>,
        details: impl Into<ErrorDetails>,
        trace: Option<FailureTrace>,
    ) -> ContextualError {
        self.build(message.into(), details.into(), trace, None, Location::caller())
    }

    /// Like [`wrap`](Self::wrap), reading the thread's current failure.
    #[track_caller]
    pub fn wrap_current(&self, message: impl Into<String>, details: impl Into<ErrorDetails>) -> ContextualError {
        self.build(message.into(), details.into(), ambient::take_current(), None, Location::caller())
    }

    #[track_caller]
    pub fn wrap_error<E>(&self, err: E, details: impl Into<ErrorDetails>) -> ContextualError
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let message = err.to_string();
        self.build(message, details.into(), None, Some(Box::new(err)), Location::caller())
    }

    /// Resolves where a failure originated.
    ///
    /// Total: a probe that fails or panics yields [`Origin::Unknown`].
    pub fn resolve(&self, trace: Option<&FailureTrace>, site: &'static Location<'static>) -> Origin {
        if let Some(frame) = trace.and_then(FailureTrace::innermost) {
            return Origin::Known(frame.position());
        }

        ambient::catch(|| self.probe.caller(site)).ok().flatten().into()
    }

    fn build(
        &self,
        message: String,
        details: ErrorDetails,
        trace: Option<FailureTrace>,
        source: Option<BoxError>,
        site: &'static Location<'static>,
    ) -> ContextualError {
        let origin = self.resolve(trace.as_ref(), site);
        ContextualError::assemble(message, origin, details, self.label.clone(), trace, source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::origin::{LineNumber, SourcePosition};
    use crate::probe::{DisabledProbe, ProbeKind};
    use crate::trace::{FailureKind, TraceFrame};

    struct PanickingProbe;

    impl CallerProbe for PanickingProbe {
        fn name(&self) -> &'static str {
            "panicking"
        }

        fn caller(&self, _site: &'static Location<'static>) -> Option<SourcePosition> {
            panic!("stack is gone")
        }
    }

    struct FixedProbe(SourcePosition);

    impl CallerProbe for FixedProbe {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn caller(&self, _site: &'static Location<'static>) -> Option<SourcePosition> {
            Some(self.0.clone())
        }
    }

    #[test]
    fn test_trace_wins_over_probe() {
        let reporter = Reporter::new(FixedProbe(SourcePosition::new("probe.rs", 1)));
        let trace = FailureTrace::new(FailureKind::Error, "x").with_frame(TraceFrame::new("F", 11));
        let err = reporter.wrap("x", ErrorDetails::none(), Some(trace));
        assert_eq!(err.source_location(), "F");
        assert_eq!(err.line_number(), LineNumber::Line(11));
    }

    #[test]
    fn test_probe_used_without_trace() {
        let reporter = Reporter::new(FixedProbe(SourcePosition::new("probe.rs", 5)));
        let err = reporter.wrap("x", ErrorDetails::none(), None);
        assert_eq!(err.source_location(), "probe.rs");
        assert_eq!(err.line_number(), LineNumber::Line(5));
    }

    #[test]
    fn test_disabled_probe_degrades_to_unknown() {
        let err = Reporter::new(DisabledProbe).wrap("lost", ErrorDetails::none(), None);
        assert_eq!(*err.origin(), Origin::Unknown);
        assert_eq!(
            err.to_string(),
            "Error occured in python script name [Unknown] line number [Unknown] error message [lost]"
        );
    }

    #[test]
    fn test_panicking_probe_degrades_to_unknown() {
        ambient::clear_current();
        let err = Reporter::new(PanickingProbe).wrap("lost", ErrorDetails::none(), None);
        assert_eq!(err.source_location(), "Unknown");
        assert_eq!(err.line_number(), LineNumber::Unknown);
        assert!(ambient::current().is_none());
    }

    #[test]
    fn test_custom_label_keeps_field_order() {
        let reporter = Reporter::default().with_label("source file");
        let trace = FailureTrace::new(FailureKind::Error, "x").with_frame(TraceFrame::new("main", 42));
        let err = reporter.wrap("division by zero", ErrorDetails::none(), Some(trace));
        assert_eq!(
            err.to_string(),
            "Error occured in source file [main] line number [42] error message [division by zero]"
        );
    }

    #[test]
    fn test_wrap_current_consumes_ambient_failure() {
        let line = line!() + 1;
        let _ = ambient::guarded(|| Err::<(), _>("bad"));
        let err = Reporter::default().wrap_current("bad", ErrorDetails::none());
        assert_eq!(err.line_number(), LineNumber::Line(line));
        assert!(ambient::current().is_none());
    }

    #[test]
    fn test_from_config_selects_probe_and_label() {
        let capture = CaptureConfig { probe: ProbeKind::Disabled, skip_frames: 0 };
        let render = RenderConfig { label: "module".to_string() };
        let reporter = Reporter::from_config(&capture, &render);
        assert_eq!(reporter.probe_name(), "disabled");
        assert_eq!(reporter.label(), "module");
    }

    #[test]
    fn test_backtrace_probe_never_panics() {
        let reporter = Reporter::from_config(
            &CaptureConfig { probe: ProbeKind::Backtrace, skip_frames: 0 },
            &RenderConfig::default(),
        );
        let err = reporter.wrap("walked", ErrorDetails::none(), None);
        assert!(err.describe().ends_with("error message [walked]"));
    }
}
