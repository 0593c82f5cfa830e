//! Opaque context handed over alongside a failure.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Caller-supplied context stored with a [`ContextualError`].
///
/// The error keeps the handle for whoever inspects it later and never looks
/// inside. The value is shared: cloning the handle or the error does not copy
/// it, and dropping the error does not end its life.
///
/// [`ContextualError`]: crate::error::ContextualError
#[derive(Clone, Default)]
pub struct ErrorDetails(Option<Arc<dyn Any + Send + Sync>>);

impl ErrorDetails {
    /// No context.
    pub fn none() -> Self {
        Self(None)
    }

    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Some(Arc::new(value) as Arc<dyn Any + Send + Sync>))
    }

    pub fn shared(value: Arc<dyn Any + Send + Sync>) -> Self {
        Self(Some(value))
    }

    /// A snapshot of the running process.
    pub fn process() -> Self {
        Self::new(ProcessSnapshot::capture())
    }

    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.as_deref().and_then(|value| value.downcast_ref::<T>())
    }

    pub fn as_arc(&self) -> Option<&Arc<dyn Any + Send + Sync>> {
        self.0.as_ref()
    }
}

impl fmt::Debug for ErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(_) => f.write_str("ErrorDetails(..)"),
            None => f.write_str("ErrorDetails(None)"),
        }
    }
}

impl<T: Any + Send + Sync> From<Arc<T>> for ErrorDetails {
    fn from(value: Arc<T>) -> Self {
        Self(Some(value as Arc<dyn Any + Send + Sync>))
    }
}

/// Process identity at the time a failure was wrapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSnapshot {
    pub pid: u32,
    pub thread: Option<String>,
    pub args: Vec<String>,
}

impl ProcessSnapshot {
    pub fn capture() -> Self {
        Self {
            pid: std::process::id(),
            thread: std::thread::current().name().map(str::to_string),
            args: std::env::args().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_has_no_value() {
        let details = ErrorDetails::none();
        assert!(details.is_none());
        assert!(details.downcast_ref::<u32>().is_none());
        assert_eq!(format!("{details:?}"), "ErrorDetails(None)");
    }

    #[test]
    fn test_downcast_to_stored_type() {
        let details = ErrorDetails::new(String::from("request-17"));
        assert_eq!(details.downcast_ref::<String>().map(String::as_str), Some("request-17"));
        assert!(details.downcast_ref::<u64>().is_none());
    }

    #[test]
    fn test_clone_shares_value() {
        let shared = Arc::new(42_u32);
        let details = ErrorDetails::from(Arc::clone(&shared));
        let copy = details.clone();
        assert_eq!(Arc::strong_count(&shared), 3);
        assert_eq!(copy.downcast_ref::<u32>(), Some(&42));
    }

    #[test]
    fn test_process_snapshot_carries_pid() {
        let details = ErrorDetails::process();
        let snapshot = details.downcast_ref::<ProcessSnapshot>().unwrap();
        assert_eq!(snapshot.pid, std::process::id());
    }
}
