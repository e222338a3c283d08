//! The recursive sanitizer.
//!
//! [`Freezer`] walks a source value, classifies each node, and builds the frozen mirror
//! bottom-up. One call owns one [`CycleTracker`]; nothing is shared between calls.
//!
//! Recursion depth equals the nesting depth of the input. With no `max_depth` configured the
//! bound is the calling thread's stack; set a limit to turn pathological nesting into
//! [`FreezeError::DepthExceeded`] instead.

use std::sync::Arc;

use deepfreeze_config::FreezeSection;
use deepfreeze_types::{DEFAULT_FAILURE_PREFIX, Failure, Frozen, Path, Record, Sequence};

use crate::classify::{Kind, classify};
use crate::diagnostic::{CycleEvent, DiagnosticSink, TracingSink};
use crate::errors::FreezeError;
use crate::heap::{ErrorObject, Handle, Heap, RecordObject};
use crate::tracker::CycleTracker;
use crate::Value;

/// Engine settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreezeOptions {
    /// Prepended to a source error's name to form the frozen failure's name.
    pub failure_prefix: Arc<str>,
    /// Deepest allowed path length for a composite value; `None` is unbounded.
    pub max_depth: Option<usize>,
}

impl Default for FreezeOptions {
    fn default() -> Self {
        Self {
            failure_prefix: DEFAULT_FAILURE_PREFIX.into(),
            max_depth: None,
        }
    }
}

impl FreezeOptions {
    /// Resolve the `[freeze]` config section, falling back to defaults for unset fields.
    #[must_use]
    pub fn from_config(section: &FreezeSection) -> Self {
        let defaults = Self::default();
        Self {
            failure_prefix: section
                .failure_name_prefix
                .as_deref()
                .map_or(defaults.failure_prefix, Arc::from),
            max_depth: section.max_depth.or(defaults.max_depth),
        }
    }
}

/// Freeze `value` with default options, logging cycles through `tracing`.
pub fn create(heap: &Heap, value: &Value) -> Result<Frozen, FreezeError> {
    Freezer::new(heap).freeze(value)
}

/// Produces frozen mirrors of values stored on one [`Heap`].
#[derive(Debug, Clone)]
pub struct Freezer<'h> {
    heap: &'h Heap,
    options: FreezeOptions,
}

impl<'h> Freezer<'h> {
    #[must_use]
    pub fn new(heap: &'h Heap) -> Self {
        Self::with_options(heap, FreezeOptions::default())
    }

    #[must_use]
    pub fn with_options(heap: &'h Heap, options: FreezeOptions) -> Self {
        Self { heap, options }
    }

    #[must_use]
    pub fn options(&self) -> &FreezeOptions {
        &self.options
    }

    /// Freeze `value`, reporting cycles to [`TracingSink`].
    pub fn freeze(&self, value: &Value) -> Result<Frozen, FreezeError> {
        self.freeze_with(value, &mut TracingSink)
    }

    /// Freeze `value`, reporting cycles to `sink`.
    pub fn freeze_with(
        &self,
        value: &Value,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Frozen, FreezeError> {
        let mut walk = self.traversal(sink);
        let result = walk.visit(value, &Path::root());
        match &result {
            Ok(frozen) => tracing::debug!(
                kind = frozen.kind_name(),
                visited = walk.tracker.len(),
                cycles = walk.cycles,
                "Freeze complete"
            ),
            Err(e) => tracing::debug!(error = %e, "Freeze aborted"),
        }
        result
    }

    /// Build a [`Record`] from a record-like value. A value that already is a frozen record is
    /// returned as the same instance.
    pub fn record(&self, value: &Value) -> Result<Record, FreezeError> {
        self.record_with(value, &mut TracingSink)
    }

    /// [`Freezer::record`], reporting cycles to `sink`.
    pub fn record_with(
        &self,
        value: &Value,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Record, FreezeError> {
        match classify(self.heap, value)? {
            Kind::AlreadyImmutable(Frozen::Record(record)) => Ok(record.clone()),
            Kind::Record(handle, record) => {
                let mut walk = self.traversal(sink);
                walk.enter_root(handle);
                walk.record(record, &Path::root())
            }
            other => Err(invalid_argument("record", &other)),
        }
    }

    /// Build a [`Sequence`] from a sequence-like value. A value that already is a frozen
    /// sequence is returned as the same instance.
    pub fn sequence(&self, value: &Value) -> Result<Sequence, FreezeError> {
        self.sequence_with(value, &mut TracingSink)
    }

    /// [`Freezer::sequence`], reporting cycles to `sink`.
    pub fn sequence_with(
        &self,
        value: &Value,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Sequence, FreezeError> {
        match classify(self.heap, value)? {
            Kind::AlreadyImmutable(Frozen::Sequence(sequence)) => Ok(sequence.clone()),
            Kind::Sequence(handle, items) => {
                let mut walk = self.traversal(sink);
                walk.enter_root(handle);
                walk.sequence(items, &Path::root())
            }
            other => Err(invalid_argument("sequence", &other)),
        }
    }

    /// Build a [`Failure`] from an error value. A value that already is a frozen failure is
    /// returned as the same instance.
    pub fn failure(&self, value: &Value) -> Result<Failure, FreezeError> {
        self.failure_with(value, &mut TracingSink)
    }

    /// [`Freezer::failure`], reporting cycles to `sink`.
    pub fn failure_with(
        &self,
        value: &Value,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Failure, FreezeError> {
        match classify(self.heap, value)? {
            Kind::AlreadyImmutable(Frozen::Failure(failure)) => Ok(failure.clone()),
            Kind::Failure(handle, error) => {
                let mut walk = self.traversal(sink);
                walk.enter_root(handle);
                walk.failure(error, &Path::root())
            }
            other => Err(invalid_argument("failure", &other)),
        }
    }

    fn traversal<'a>(&'a self, sink: &'a mut dyn DiagnosticSink) -> Traversal<'a> {
        tracing::debug!(max_depth = ?self.options.max_depth, "Freeze started");
        Traversal {
            heap: self.heap,
            options: &self.options,
            tracker: CycleTracker::new(),
            sink,
            cycles: 0,
        }
    }
}

impl Heap {
    /// Freeze a value stored on this heap with default options.
    pub fn freeze(&self, value: &Value) -> Result<Frozen, FreezeError> {
        create(self, value)
    }
}

fn invalid_argument(expected: &'static str, found: &Kind<'_>) -> FreezeError {
    FreezeError::InvalidArgument {
        expected,
        found: found.label(),
    }
}

/// State of one traversal.
struct Traversal<'a> {
    heap: &'a Heap,
    options: &'a FreezeOptions,
    tracker: CycleTracker,
    sink: &'a mut dyn DiagnosticSink,
    cycles: usize,
}

impl Traversal<'_> {
    fn visit(&mut self, value: &Value, path: &Path) -> Result<Frozen, FreezeError> {
        match classify(self.heap, value)? {
            Kind::Nullish(frozen) | Kind::Primitive(frozen) | Kind::Convertible(frozen) => {
                Ok(frozen)
            }
            Kind::AlreadyImmutable(frozen) => Ok(frozen.clone()),
            Kind::Unsupported(kind) => Err(FreezeError::UnsupportedType {
                kind,
                path: path.clone(),
            }),
            Kind::Sequence(handle, items) => {
                if !self.enter(handle, path)? {
                    return Ok(Frozen::Omitted);
                }
                self.sequence(items, path).map(Frozen::Sequence)
            }
            Kind::Failure(handle, error) => {
                if !self.enter(handle, path)? {
                    return Ok(Frozen::Omitted);
                }
                self.failure(error, path).map(Frozen::Failure)
            }
            Kind::Record(handle, record) => {
                if !self.enter(handle, path)? {
                    return Ok(Frozen::Omitted);
                }
                self.record(record, path).map(Frozen::Record)
            }
        }
    }

    /// Register a composite before descending into it.
    ///
    /// Returns `false` if the handle was already visited in this traversal; the cycle has
    /// been reported and the caller substitutes the omitted marker.
    fn enter(&mut self, handle: Handle, path: &Path) -> Result<bool, FreezeError> {
        if let Some(original) = self.tracker.register(handle, path) {
            self.cycles += 1;
            self.sink.cycle_detected(CycleEvent {
                current: path.clone(),
                original,
            });
            return Ok(false);
        }
        if let Some(limit) = self.options.max_depth
            && path.depth() > limit
        {
            return Err(FreezeError::DepthExceeded {
                limit,
                path: path.clone(),
            });
        }
        Ok(true)
    }

    fn enter_root(&mut self, handle: Handle) {
        let previous = self.tracker.register(handle, &Path::root());
        debug_assert!(previous.is_none(), "root registered twice");
    }

    fn sequence(&mut self, items: &[Value], path: &Path) -> Result<Sequence, FreezeError> {
        let frozen = items
            .iter()
            .enumerate()
            .map(|(i, item)| self.visit(item, &path.child(i)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Sequence::from_vec(frozen))
    }

    fn record(&mut self, record: &RecordObject, path: &Path) -> Result<Record, FreezeError> {
        let entries = record
            .iter()
            .map(|(key, value)| {
                self.visit(value, &path.child(key))
                    .map(|frozen| (key, frozen))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Record::from_entries(entries))
    }

    fn failure(&mut self, error: &ErrorObject, path: &Path) -> Result<Failure, FreezeError> {
        let cause = error
            .cause
            .as_ref()
            .map(|cause| self.visit(cause, &path.child("cause")))
            .transpose()?;
        Ok(Failure::prefixed(
            &self.options.failure_prefix,
            &error.name,
            error.message.as_str(),
            error.stack.as_str(),
            cause,
        ))
    }
}
