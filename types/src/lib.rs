//! Frozen value types for deepfreeze.
//!
//! This crate contains the immutable side of the engine with no IO and minimal dependencies:
//! the [`Frozen`] value enum, the three container variants ([`Record`], [`Sequence`],
//! [`Failure`]), traversal [`Path`]s, and the table of read-only [`ViewOp`]s.
//!
//! Every container is reference counted and exposes only `&self` methods, so a value that
//! exists is already deeply immutable and can be shared across threads.

mod failure;
mod frozen;
mod path;
mod record;
mod sequence;
mod view;

pub use failure::{DEFAULT_FAILURE_PREFIX, Failure};
pub use frozen::{Frozen, OMITTED_MARKER};
pub use path::{Path, PathSegment};
pub use record::Record;
pub use sequence::Sequence;
pub use view::{Rewrap, ViewError, ViewOp};
