//! Mutable source graph.
//!
//! Input values live in an arena of [`HeapObject`]s addressed by copyable [`Handle`]s. Handles
//! are the reference identity of the graph: two `Value::Object`s with the same handle are the
//! same object, so shared references and cycles are expressed by reusing a handle.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{DateTime, Utc};
use regex::RegexBuilder;
use thiserror::Error;

use crate::Value;

/// Flags a pattern may carry.
const PATTERN_FLAGS: &str = "dgimsuvy";

/// Source of heap ids; every [`Heap::new`] takes the next one.
static NEXT_HEAP_ID: AtomicU32 = AtomicU32::new(0);

/// Opaque handle referencing an object on a [`Heap`].
///
/// A handle carries the id of the heap that allocated it, so looking it up on any other heap
/// is a [`HeapError::DanglingHandle`] even when the slot index is in range. A cloned heap keeps
/// its id and accepts the original's handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Handle {
    heap: u32,
    index: u32,
}

impl Handle {
    #[must_use]
    pub fn index(self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object#{}.{}", self.heap, self.index)
    }
}

#[derive(Debug, Error)]
pub enum HeapError {
    #[error("{0} does not exist on this heap")]
    DanglingHandle(Handle),
    #[error("{handle} is a {found}, expected a {expected}")]
    WrongKind {
        handle: Handle,
        expected: &'static str,
        found: &'static str,
    },
    #[error("invalid pattern /{source_text}/: {error}")]
    InvalidPattern {
        source_text: String,
        #[source]
        error: regex::Error,
    },
    #[error("invalid pattern flags {0:?}")]
    InvalidFlags(String),
}

/// Ordered key → value fields of a plain record. Keys are unique; setting an existing key
/// keeps its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordObject {
    entries: Vec<(String, Value)>,
}

impl RecordObject {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, value)| value)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(candidate, _)| *candidate == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let position = self.entries.iter().position(|(candidate, _)| candidate == key)?;
        Some(self.entries.remove(position).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for RecordObject {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (key, value) in iter {
            record.set(key, value);
        }
        record
    }
}

/// A live, mutable error: name, message, stack text, and an optional cause.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorObject {
    pub name: String,
    pub message: String,
    pub stack: String,
    pub cause: Option<Value>,
}

impl ErrorObject {
    /// New error whose stack is the conventional `name: message` header.
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        let name = name.into();
        let message = message.into();
        let stack = if message.is_empty() {
            name.clone()
        } else {
            format!("{name}: {message}")
        };
        Self {
            name,
            message,
            stack,
            cause: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternObject {
    source: String,
    flags: String,
}

impl PatternObject {
    /// Validate `source` as a regular expression and `flags` against the known flag set.
    pub fn new(source: impl Into<String>, flags: impl Into<String>) -> Result<Self, HeapError> {
        let source = source.into();
        let flags = flags.into();
        let mut seen = String::new();
        for flag in flags.chars() {
            if !PATTERN_FLAGS.contains(flag) || seen.contains(flag) {
                return Err(HeapError::InvalidFlags(flags));
            }
            seen.push(flag);
        }
        RegexBuilder::new(&source)
            .case_insensitive(flags.contains('i'))
            .multi_line(flags.contains('m'))
            .dot_matches_new_line(flags.contains('s'))
            .build()
            .map_err(|error| HeapError::InvalidPattern {
                source_text: source.clone(),
                error,
            })?;
        Ok(Self { source, flags })
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn flags(&self) -> &str {
        &self.flags
    }

    /// Canonical string form, `/source/flags`.
    #[must_use]
    pub fn canonical(&self) -> String {
        format!("/{}/{}", self.source, self.flags)
    }
}

/// Everything a [`Handle`] can point at.
#[derive(Debug, Clone, PartialEq)]
pub enum HeapObject {
    Record(RecordObject),
    Array(Vec<Value>),
    Error(ErrorObject),
    /// Milliseconds since the Unix epoch; `NaN` for an invalid date.
    Date(f64),
    Pattern(PatternObject),
    Function { name: String },
    Promise,
    WeakMap,
    WeakSet,
}

impl HeapObject {
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            HeapObject::Record(_) => "record",
            HeapObject::Array(_) => "array",
            HeapObject::Error(_) => "error",
            HeapObject::Date(_) => "date",
            HeapObject::Pattern(_) => "pattern",
            HeapObject::Function { .. } => "function",
            HeapObject::Promise => "promise",
            HeapObject::WeakMap => "weakmap",
            HeapObject::WeakSet => "weakset",
        }
    }
}

/// Arena owning every object of a source graph.
#[derive(Debug, Clone)]
pub struct Heap {
    id: u32,
    objects: Vec<HeapObject>,
}

impl Default for Heap {
    fn default() -> Self {
        Self {
            id: NEXT_HEAP_ID.fetch_add(1, Ordering::Relaxed),
            objects: Vec::new(),
        }
    }
}

impl Heap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Whether `handle` was allocated by this heap (or the heap it was cloned from).
    #[must_use]
    pub fn owns(&self, handle: Handle) -> bool {
        handle.heap == self.id
    }

    pub fn alloc(&mut self, object: HeapObject) -> Handle {
        let index = u32::try_from(self.objects.len()).unwrap_or(u32::MAX);
        assert!(index < u32::MAX, "heap handle space exhausted");
        let handle = Handle { heap: self.id, index };
        self.objects.push(object);
        handle
    }

    pub fn alloc_record(&mut self) -> Handle {
        self.alloc(HeapObject::Record(RecordObject::new()))
    }

    pub fn alloc_array(&mut self, items: Vec<Value>) -> Handle {
        self.alloc(HeapObject::Array(items))
    }

    pub fn alloc_error(&mut self, name: impl Into<String>, message: impl Into<String>) -> Handle {
        self.alloc(HeapObject::Error(ErrorObject::new(name, message)))
    }

    pub fn alloc_date(&mut self, at: DateTime<Utc>) -> Handle {
        self.alloc(HeapObject::Date(at.timestamp_millis() as f64))
    }

    pub fn alloc_invalid_date(&mut self) -> Handle {
        self.alloc(HeapObject::Date(f64::NAN))
    }

    pub fn alloc_pattern(
        &mut self,
        source: impl Into<String>,
        flags: impl Into<String>,
    ) -> Result<Handle, HeapError> {
        let pattern = PatternObject::new(source, flags)?;
        Ok(self.alloc(HeapObject::Pattern(pattern)))
    }

    pub fn alloc_function(&mut self, name: impl Into<String>) -> Handle {
        self.alloc(HeapObject::Function { name: name.into() })
    }

    pub fn alloc_promise(&mut self) -> Handle {
        self.alloc(HeapObject::Promise)
    }

    pub fn alloc_weak_map(&mut self) -> Handle {
        self.alloc(HeapObject::WeakMap)
    }

    pub fn alloc_weak_set(&mut self) -> Handle {
        self.alloc(HeapObject::WeakSet)
    }

    pub fn get(&self, handle: Handle) -> Result<&HeapObject, HeapError> {
        self.owns(handle)
            .then(|| self.objects.get(handle.index()))
            .flatten()
            .ok_or(HeapError::DanglingHandle(handle))
    }

    pub fn get_mut(&mut self, handle: Handle) -> Result<&mut HeapObject, HeapError> {
        if !self.owns(handle) {
            return Err(HeapError::DanglingHandle(handle));
        }
        self.objects
            .get_mut(handle.index())
            .ok_or(HeapError::DanglingHandle(handle))
    }

    pub fn record_mut(&mut self, handle: Handle) -> Result<&mut RecordObject, HeapError> {
        match self.get_mut(handle)? {
            HeapObject::Record(record) => Ok(record),
            other => Err(wrong_kind(handle, "record", other)),
        }
    }

    pub fn array_mut(&mut self, handle: Handle) -> Result<&mut Vec<Value>, HeapError> {
        match self.get_mut(handle)? {
            HeapObject::Array(items) => Ok(items),
            other => Err(wrong_kind(handle, "array", other)),
        }
    }

    pub fn error_mut(&mut self, handle: Handle) -> Result<&mut ErrorObject, HeapError> {
        match self.get_mut(handle)? {
            HeapObject::Error(error) => Ok(error),
            other => Err(wrong_kind(handle, "error", other)),
        }
    }

    /// Set a record field, keeping the position of an existing key.
    pub fn set(
        &mut self,
        handle: Handle,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<(), HeapError> {
        self.record_mut(handle)?.set(key, value);
        Ok(())
    }

    pub fn remove(&mut self, handle: Handle, key: &str) -> Result<Option<Value>, HeapError> {
        Ok(self.record_mut(handle)?.remove(key))
    }

    /// Append to an array, returning the new length.
    pub fn push(&mut self, handle: Handle, value: impl Into<Value>) -> Result<usize, HeapError> {
        let items = self.array_mut(handle)?;
        items.push(value.into());
        Ok(items.len())
    }

    /// Assign an array slot; writing past the end pads with `Undefined`.
    pub fn set_index(
        &mut self,
        handle: Handle,
        index: usize,
        value: impl Into<Value>,
    ) -> Result<(), HeapError> {
        let items = self.array_mut(handle)?;
        if index >= items.len() {
            items.resize(index + 1, Value::Undefined);
        }
        items[index] = value.into();
        Ok(())
    }

    pub fn set_cause(&mut self, handle: Handle, cause: impl Into<Value>) -> Result<(), HeapError> {
        self.error_mut(handle)?.cause = Some(cause.into());
        Ok(())
    }

    pub fn set_stack(&mut self, handle: Handle, stack: impl Into<String>) -> Result<(), HeapError> {
        self.error_mut(handle)?.stack = stack.into();
        Ok(())
    }
}

fn wrong_kind(handle: Handle, expected: &'static str, found: &HeapObject) -> HeapError {
    HeapError::WrongKind {
        handle,
        expected,
        found: found.kind_name(),
    }
}
