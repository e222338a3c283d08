//! Deep immutability engine.
//!
//! Source values live on a mutable [`Heap`]. A [`Freezer`] walks a value, classifies each node,
//! and produces a [`Frozen`] mirror that shares nothing with the heap:
//!
//! ```
//! use deepfreeze_core::{Heap, Value};
//!
//! let mut heap = Heap::new();
//! let user = heap.alloc_record();
//! heap.set(user, "name", "Alice")?;
//! let root = heap.alloc_record();
//! heap.set(root, "user", user)?;
//!
//! let frozen = heap.freeze(&Value::Object(root))?;
//! heap.set(user, "name", "Mallory")?;
//! assert_eq!(frozen["user"]["name"].as_str(), Some("Alice"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Repeated references within one traversal are replaced by [`Frozen::Omitted`] and reported
//! to a [`DiagnosticSink`]. Values with no immutable form (functions, promises, weak
//! containers) abort the call with [`FreezeError::UnsupportedType`].

pub mod classify;
pub mod diagnostic;
pub mod errors;
mod freezer;
pub mod heap;
mod json;
mod tracker;
mod value;

pub use classify::{Kind, UnsupportedKind, classify};
pub use deepfreeze_types::{
    DEFAULT_FAILURE_PREFIX, Failure, Frozen, OMITTED_MARKER, Path, PathSegment, Record, Rewrap,
    Sequence, ViewError, ViewOp,
};
pub use diagnostic::{CollectingSink, CycleEvent, DiagnosticSink, TracingSink};
pub use errors::FreezeError;
pub use freezer::{FreezeOptions, Freezer, create};
pub use heap::{ErrorObject, Handle, Heap, HeapError, HeapObject, PatternObject, RecordObject};
pub use tracker::CycleTracker;
pub use value::Value;
