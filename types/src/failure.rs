use std::fmt;
use std::sync::Arc;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::Frozen;

/// Prefix prepended to the source error's name unless configured otherwise.
pub const DEFAULT_FAILURE_PREFIX: &str = "Immutable";

/// An immutable description of an error condition.
///
/// Holds a name, a message, an opaque trace, and an optional frozen cause. The error it was
/// built from is never retained.
#[derive(Clone)]
pub struct Failure(Arc<FailureFields>);

#[derive(PartialEq)]
struct FailureFields {
    name: Arc<str>,
    message: Arc<str>,
    trace: Arc<str>,
    cause: Option<Frozen>,
}

impl Failure {
    /// Build a failure from its final field values. `name` is stored as given.
    pub fn new(
        name: impl Into<Arc<str>>,
        message: impl Into<Arc<str>>,
        trace: impl Into<Arc<str>>,
        cause: Option<Frozen>,
    ) -> Self {
        Self(Arc::new(FailureFields {
            name: name.into(),
            message: message.into(),
            trace: trace.into(),
            cause,
        }))
    }

    /// Build a failure whose name is `prefix` followed by the source error's name.
    pub fn prefixed(
        prefix: &str,
        source_name: &str,
        message: impl Into<Arc<str>>,
        trace: impl Into<Arc<str>>,
        cause: Option<Frozen>,
    ) -> Self {
        Self::new(format!("{prefix}{source_name}"), message, trace, cause)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.0.message
    }

    #[must_use]
    pub fn trace(&self) -> &str {
        &self.0.trace
    }

    /// The frozen cause, present only when the source error carried one.
    #[must_use]
    pub fn cause(&self) -> Option<&Frozen> {
        self.0.cause.as_ref()
    }

    /// The source error's name, if this failure's name starts with `prefix`.
    #[must_use]
    pub fn source_name<'a>(&'a self, prefix: &str) -> Option<&'a str> {
        self.name().strip_prefix(prefix)
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Failure {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.0 == other.0
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Failure");
        debug
            .field("name", &self.name())
            .field("message", &self.message());
        if let Some(cause) = self.cause() {
            debug.field("cause", cause);
        }
        debug.finish_non_exhaustive()
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message().is_empty() {
            f.write_str(self.name())
        } else {
            write!(f, "{}: {}", self.name(), self.message())
        }
    }
}

impl Serialize for Failure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.cause().is_some() { 4 } else { 3 };
        let mut state = serializer.serialize_struct("Failure", len)?;
        state.serialize_field("name", self.name())?;
        state.serialize_field("message", self.message())?;
        state.serialize_field("trace", self.trace())?;
        if let Some(cause) = self.cause() {
            state.serialize_field("cause", cause)?;
        }
        state.end()
    }
}
