//! The current failure of a thread.
//!
//! [`guarded`] runs a fallible region and, when it fails, keeps the resulting
//! [`FailureTrace`] as the thread's current failure. Outermost callers read it
//! back with [`take_current`] (or [`ContextualError::from_current`]) instead of
//! threading the trace through by hand. Nothing inside the error type reads
//! this state on its own.
//!
//! Panics inside a guarded region are caught and turned into traces pointing
//! at the panic site, so an integer `1 / 0` reports the line of the division.
//!
//! [`ContextualError::from_current`]: crate::error::ContextualError::from_current

use crate::trace::{FailureKind, FailureTrace, TraceFrame};
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::panic::{self, AssertUnwindSafe, Location};
use std::sync::Once;

static HOOK: Once = Once::new();

thread_local! {
    /// Nesting depth of regions that catch panics on this thread.
    static CATCHING: Cell<usize> = const { Cell::new(0) };
    /// Panic recorded by the hook while catching.
    static LAST_PANIC: RefCell<Option<(String, Option<TraceFrame>)>> = const { RefCell::new(None) };
    static CURRENT: RefCell<Option<FailureTrace>> = const { RefCell::new(None) };
}

/// Runs `f`, turning an `Err` or a panic into a [`FailureTrace`].
///
/// An `Err` is located at the call to `guarded`; a panic at the panic site.
/// The trace becomes the current failure of this thread. Success clears it.
#[track_caller]
pub fn guarded<T, E, F>(f: F) -> Result<T, FailureTrace>
where
    E: fmt::Display,
    F: FnOnce() -> Result<T, E>,
{
    let site = Location::caller();
    let outcome = match catch(f) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(FailureTrace::at(FailureKind::Error, err.to_string(), site)),
        Err(trace) => Err(trace),
    };
    remember(outcome)
}

/// Runs an infallible `f`, turning a panic into a [`FailureTrace`].
pub fn guard_panic<T, F>(f: F) -> Result<T, FailureTrace>
where
    F: FnOnce() -> T,
{
    remember(catch(f))
}

/// A copy of this thread's current failure.
pub fn current() -> Option<FailureTrace> {
    CURRENT.with(|slot| slot.borrow().clone())
}

/// Removes and returns this thread's current failure.
pub fn take_current() -> Option<FailureTrace> {
    CURRENT.with(|slot| slot.borrow_mut().take())
}

pub fn clear_current() {
    CURRENT.with(|slot| slot.borrow_mut().take());
}

/// Replaces this thread's current failure.
pub fn set_current(trace: FailureTrace) {
    CURRENT.with(|slot| *slot.borrow_mut() = Some(trace));
}

fn remember<T>(outcome: Result<T, FailureTrace>) -> Result<T, FailureTrace> {
    match &outcome {
        Ok(_) => clear_current(),
        Err(trace) => set_current(trace.clone()),
    }
    outcome
}

/// Runs `f`, catching a panic without printing it.
///
/// Does not touch the current failure.
pub(crate) fn catch<T, F>(f: F) -> Result<T, FailureTrace>
where
    F: FnOnce() -> T,
{
    install_hook();

    // A panic caught by `f` itself must not be credited to a later unwind.
    forget_last_panic();
    CATCHING.with(|depth| depth.set(depth.get() + 1));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    CATCHING.with(|depth| depth.set(depth.get().saturating_sub(1)));
    let recorded = forget_last_panic();

    result.map_err(|payload| {
        let (message, frame) = recorded.unwrap_or_else(|| (payload_message(&*payload), None));

        let mut trace = FailureTrace::new(FailureKind::Panic, message);
        if let Some(frame) = frame {
            trace.push(frame);
        }
        trace
    })
}

fn forget_last_panic() -> Option<(String, Option<TraceFrame>)> {
    LAST_PANIC.with(|slot| slot.borrow_mut().take())
}

/// Installs a panic hook that records panics raised while catching and
/// defers to the previous hook otherwise.
fn install_hook() {
    HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let catching = CATCHING.try_with(Cell::get).unwrap_or(0) > 0;
            if !catching {
                previous(info);
                return;
            }

            let message = payload_message(info.payload());
            let frame = info.location().map(TraceFrame::from);
            // Ignore a thread that is already tearing down its locals.
            let _ = LAST_PANIC.try_with(|slot| *slot.borrow_mut() = Some((message, frame)));
        }));
    });
}

fn payload_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "Box<dyn Any>".to_string()
    }
}
