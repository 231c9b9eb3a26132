//! Errors reported by the dispatcher.

use std::error::Error;
use std::fmt::{self, Display};

use crate::dispatch::Registration;
use crate::widget::WidgetId;

/// A boxed error returned from a fallible callback.
pub type BoxedError = Box<dyn Error + Send + Sync + 'static>;

/// An operation targeted a widget that is not live.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct InvalidWidgetError {
    /// The widget the operation targeted.
    pub widget: WidgetId,
    /// Why the widget is not usable.
    pub reason: InvalidReason,
}

/// The reason a widget is not live.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InvalidReason {
    /// The widget was destroyed.
    Destroyed,
    /// The widget was never created by this dispatcher.
    Unknown,
}

impl Error for InvalidWidgetError {}

impl Display for InvalidWidgetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            InvalidReason::Destroyed => write!(f, "{} has been destroyed", self.widget),
            InvalidReason::Unknown => write!(f, "{} is not known to this dispatcher", self.widget),
        }
    }
}

/// An emission could not be queued by an
/// [`EmitSender`](crate::dispatch::EmitSender).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum QueueError {
    /// The queue is full until the dispatcher processes its pending
    /// emissions.
    Full,
    /// Every handle to the dispatcher has been dropped.
    Disconnected,
}

impl Error for QueueError {}

impl Display for QueueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueError::Full => f.write_str("the pending emission queue is full"),
            QueueError::Disconnected => f.write_str("the dispatcher has been dropped"),
        }
    }
}

/// Why a single callback failed during an emission.
#[derive(Debug)]
pub enum FailureCause {
    /// The callback returned an error.
    Returned(BoxedError),
    /// The callback panicked. Contains the panic message when it was a
    /// string.
    Panicked(String),
    /// The callback was already running further up the stack, so it could not
    /// be invoked again.
    Reentrant,
}

impl Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureCause::Returned(err) => Display::fmt(err, f),
            FailureCause::Panicked(message) => write!(f, "panicked: {message}"),
            FailureCause::Reentrant => f.write_str("callback re-entered while running"),
        }
    }
}

/// A callback that failed during an emission.
#[derive(Debug)]
pub struct CallbackFailure {
    /// The registration whose callback failed.
    pub registration: Registration,
    /// The type name of the callback function.
    pub callback: &'static str,
    /// What went wrong.
    pub cause: FailureCause,
}

impl Display for CallbackFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "callback `{}` failed: {}", self.callback, self.cause)
    }
}

impl Error for CallbackFailure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            FailureCause::Returned(err) => Some(&**err),
            FailureCause::Panicked(_) | FailureCause::Reentrant => None,
        }
    }
}

/// One or more callbacks failed during a single emission.
///
/// Every other callback registered for the emission still ran.
#[derive(Debug)]
pub struct AggregateCallbackError {
    failures: Vec<CallbackFailure>,
}

impl AggregateCallbackError {
    pub(crate) fn new(failures: Vec<CallbackFailure>) -> Self {
        debug_assert!(!failures.is_empty());
        Self { failures }
    }

    /// Returns the failed callbacks in the order they were invoked.
    #[must_use]
    pub fn failures(&self) -> &[CallbackFailure] {
        &self.failures
    }

    /// Returns the failed callbacks in the order they were invoked.
    #[must_use]
    pub fn into_failures(self) -> Vec<CallbackFailure> {
        self.failures
    }

    /// Returns true if the callback registered as `registration` failed.
    #[must_use]
    pub fn contains(&self, registration: Registration) -> bool {
        self.failures
            .iter()
            .any(|failure| failure.registration == registration)
    }
}

impl Display for AggregateCallbackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} callback(s) failed", self.failures.len())?;
        for failure in &self.failures {
            write!(f, "; {failure}")?;
        }
        Ok(())
    }
}

impl Error for AggregateCallbackError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.failures.first().map(|failure| failure as &(dyn Error + 'static))
    }
}

/// An error returned from emitting a signal.
#[derive(Debug)]
pub enum EmitError {
    /// The widget is not live. No callbacks were invoked.
    InvalidWidget(InvalidWidgetError),
    /// All callbacks were invoked, and at least one failed.
    Callbacks(AggregateCallbackError),
}

impl EmitError {
    /// Returns the callback failures, if any callbacks were invoked.
    #[must_use]
    pub fn callbacks(&self) -> Option<&AggregateCallbackError> {
        match self {
            EmitError::Callbacks(aggregate) => Some(aggregate),
            EmitError::InvalidWidget(_) => None,
        }
    }

    /// Returns the invalid widget error, if the emission was rejected.
    #[must_use]
    pub fn invalid_widget(&self) -> Option<&InvalidWidgetError> {
        match self {
            EmitError::InvalidWidget(err) => Some(err),
            EmitError::Callbacks(_) => None,
        }
    }
}

impl Display for EmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmitError::InvalidWidget(err) => Display::fmt(err, f),
            EmitError::Callbacks(err) => Display::fmt(err, f),
        }
    }
}

impl Error for EmitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            EmitError::InvalidWidget(err) => Some(err),
            EmitError::Callbacks(err) => Some(err),
        }
    }
}

impl From<InvalidWidgetError> for EmitError {
    fn from(err: InvalidWidgetError) -> Self {
        EmitError::InvalidWidget(err)
    }
}

impl From<AggregateCallbackError> for EmitError {
    fn from(err: AggregateCallbackError) -> Self {
        EmitError::Callbacks(err)
    }
}
