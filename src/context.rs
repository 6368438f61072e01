//! Diagnostic sink for planner events.
//!
//! Planner methods take an `Option<&mut dyn Context>`. Passing `None` silences
//! the sink; the planner still emits `log` records at debug and trace level either way.

use std::fmt;

/// Receives human-readable planner events.
///
/// Implementations must not panic and cannot influence the search.
pub trait Context {
    fn log_event(&mut self, message: fmt::Arguments<'_>);
}

/// Forwards planner events to the `log` crate at debug level.
///
/// ```
/// use goap_regress::{Context, LogContext};
///
/// let mut ctx = LogContext::new();
/// ctx.log_event(format_args!("Starting new plan."));
/// assert_eq!(ctx.events(), 1);
/// ```
#[derive(Debug, Default, Clone)]
pub struct LogContext {
    events: usize,
}

impl LogContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of events forwarded so far.
    pub fn events(&self) -> usize {
        self.events
    }
}

impl Context for LogContext {
    fn log_event(&mut self, message: fmt::Arguments<'_>) {
        self.events += 1;
        log::debug!(target: "goap_regress", "{}", message);
    }
}

/// Collects events in memory.
#[derive(Debug, Default, Clone)]
pub struct RecordingContext {
    pub messages: Vec<String>,
}

impl Context for RecordingContext {
    fn log_event(&mut self, message: fmt::Arguments<'_>) {
        self.messages.push(message.to_string());
    }
}

/// Sends an event to an optional sink.
pub(crate) fn emit(ctx: &mut Option<&mut dyn Context>, message: fmt::Arguments<'_>) {
    if let Some(ctx) = ctx.as_deref_mut() {
        ctx.log_event(message);
    }
}

/// Reborrows an optional sink for a nested call without giving it up.
pub(crate) fn reborrow<'s>(ctx: &'s mut Option<&mut dyn Context>) -> Option<&'s mut dyn Context> {
    match ctx {
        Some(inner) => {
            let inner: &'s mut dyn Context = &mut **inner;
            Some(inner)
        }
        None => None,
    }
}
