//! Value classification.
//!
//! [`classify`] decides how a source value is frozen. The checks run in a fixed order: nullish,
//! primitive, already immutable, convertible built-in, sequence, failure, record, and
//! finally unsupported.

use std::fmt;

use deepfreeze_types::Frozen;

use crate::heap::{ErrorObject, Handle, Heap, HeapError, HeapObject, RecordObject};
use crate::Value;

/// Values that have no immutable representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnsupportedKind {
    Function,
    Promise,
    WeakMap,
    WeakSet,
}

impl UnsupportedKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            UnsupportedKind::Function => "function",
            UnsupportedKind::Promise => "promise",
            UnsupportedKind::WeakMap => "weakmap",
            UnsupportedKind::WeakSet => "weakset",
        }
    }
}

impl fmt::Display for UnsupportedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The classification of one source value.
///
/// Leaf kinds carry their frozen form. Composite kinds carry the handle (their identity for
/// cycle tracking) and a borrowed view of their contents.
#[derive(Debug, Clone, PartialEq)]
pub enum Kind<'a> {
    Nullish(Frozen),
    Primitive(Frozen),
    AlreadyImmutable(&'a Frozen),
    /// Date-like or pattern-like built-in, already converted to its primitive form.
    Convertible(Frozen),
    Sequence(Handle, &'a [Value]),
    Failure(Handle, &'a ErrorObject),
    Record(Handle, &'a RecordObject),
    Unsupported(UnsupportedKind),
}

impl Kind<'_> {
    /// Short label used when reporting a shape mismatch.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Kind::Nullish(_) => "nullish",
            Kind::Primitive(_) => "primitive",
            Kind::AlreadyImmutable(frozen) => frozen.kind_name(),
            Kind::Convertible(_) => "convertible",
            Kind::Sequence(..) => "sequence",
            Kind::Failure(..) => "failure",
            Kind::Record(..) => "record",
            Kind::Unsupported(kind) => kind.as_str(),
        }
    }
}

/// Classify `value`, resolving object handles against `heap`.
pub fn classify<'a>(heap: &'a Heap, value: &'a Value) -> Result<Kind<'a>, HeapError> {
    let kind = match value {
        Value::Undefined => Kind::Nullish(Frozen::Undefined),
        Value::Null => Kind::Nullish(Frozen::Null),
        Value::Bool(b) => Kind::Primitive(Frozen::Bool(*b)),
        Value::Number(n) => Kind::Primitive(Frozen::Number(*n)),
        Value::BigInt(n) => Kind::Primitive(Frozen::BigInt(*n)),
        Value::Str(s) => Kind::Primitive(Frozen::from(s.as_str())),
        Value::Frozen(frozen) => Kind::AlreadyImmutable(frozen),
        Value::Object(handle) => classify_object(*handle, heap.get(*handle)?),
    };
    Ok(kind)
}

fn classify_object(handle: Handle, object: &HeapObject) -> Kind<'_> {
    match object {
        HeapObject::Date(millis) => Kind::Convertible(Frozen::Number(*millis)),
        HeapObject::Pattern(pattern) => Kind::Convertible(Frozen::from(pattern.canonical())),
        HeapObject::Array(items) => Kind::Sequence(handle, items),
        HeapObject::Error(error) => Kind::Failure(handle, error),
        HeapObject::Record(record) => Kind::Record(handle, record),
        HeapObject::Function { .. } => Kind::Unsupported(UnsupportedKind::Function),
        HeapObject::Promise => Kind::Unsupported(UnsupportedKind::Promise),
        HeapObject::WeakMap => Kind::Unsupported(UnsupportedKind::WeakMap),
        HeapObject::WeakSet => Kind::Unsupported(UnsupportedKind::WeakSet),
    }
}
