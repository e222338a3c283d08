use std::fmt;
use std::ops::Index;
use std::sync::Arc;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::{Failure, Record, Sequence};

/// Rendering of [`Frozen::Omitted`] in display and serialized output.
pub const OMITTED_MARKER: &str = "[Circular]";

static UNDEFINED: Frozen = Frozen::Undefined;

/// A fully immutable value.
///
/// Primitives are stored inline. Containers are reference counted and expose no mutation API,
/// so cloning a `Frozen` shares the same instance and every reachable value is read-only.
///
/// There is no way to write through an index:
///
/// ```compile_fail
/// use deepfreeze_types::Frozen;
///
/// let tags = Frozen::from(vec![Frozen::from("admin")]);
/// tags[0] = Frozen::from("x");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Frozen {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    BigInt(i128),
    Str(Arc<str>),
    /// Placeholder for a value that was already visited earlier in the same traversal.
    Omitted,
    Record(Record),
    Sequence(Sequence),
    Failure(Failure),
}

impl Frozen {
    /// Short label for the variant, used in error messages and logs.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Frozen::Undefined => "undefined",
            Frozen::Null => "null",
            Frozen::Bool(_) => "boolean",
            Frozen::Number(_) => "number",
            Frozen::BigInt(_) => "bigint",
            Frozen::Str(_) => "string",
            Frozen::Omitted => "omitted",
            Frozen::Record(_) => "record",
            Frozen::Sequence(_) => "sequence",
            Frozen::Failure(_) => "failure",
        }
    }

    #[must_use]
    pub fn is_nullish(&self) -> bool {
        matches!(self, Frozen::Undefined | Frozen::Null)
    }

    #[must_use]
    pub fn is_omitted(&self) -> bool {
        matches!(self, Frozen::Omitted)
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Frozen::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Frozen::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Frozen::Str(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Frozen::Record(record) => Some(record),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Frozen::Sequence(sequence) => Some(sequence),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_failure(&self) -> Option<&Failure> {
        match self {
            Frozen::Failure(failure) => Some(failure),
            _ => None,
        }
    }

    /// Whether both values are the same container instance.
    ///
    /// Always `false` for primitives and the omitted marker, which have no instance identity.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Frozen::Record(a), Frozen::Record(b)) => a.ptr_eq(b),
            (Frozen::Sequence(a), Frozen::Sequence(b)) => a.ptr_eq(b),
            (Frozen::Failure(a), Frozen::Failure(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Strict equality: primitives by value (`NaN` is unequal to itself), containers by
    /// instance.
    #[must_use]
    pub fn strict_equals(&self, other: &Self) -> bool {
        match (self, other) {
            (Frozen::Undefined, Frozen::Undefined)
            | (Frozen::Null, Frozen::Null)
            | (Frozen::Omitted, Frozen::Omitted) => true,
            (Frozen::Bool(a), Frozen::Bool(b)) => a == b,
            (Frozen::Number(a), Frozen::Number(b)) => a == b,
            (Frozen::BigInt(a), Frozen::BigInt(b)) => a == b,
            (Frozen::Str(a), Frozen::Str(b)) => a == b,
            _ => self.ptr_eq(other),
        }
    }

    /// Like [`Frozen::strict_equals`], except `NaN` equals `NaN`.
    #[must_use]
    pub fn same_value_zero(&self, other: &Self) -> bool {
        match (self, other) {
            (Frozen::Number(a), Frozen::Number(b)) if a.is_nan() && b.is_nan() => true,
            _ => self.strict_equals(other),
        }
    }
}

fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_nan() {
        f.write_str("NaN")
    } else if n.is_infinite() {
        f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else if n == 0.0 {
        // Covers -0 as well.
        f.write_str("0")
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{n}")
    }
}

impl fmt::Display for Frozen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frozen::Undefined => f.write_str("undefined"),
            Frozen::Null => f.write_str("null"),
            Frozen::Bool(b) => write!(f, "{b}"),
            Frozen::Number(n) => write_number(f, *n),
            Frozen::BigInt(n) => write!(f, "{n}"),
            Frozen::Str(s) => f.write_str(s),
            Frozen::Omitted => f.write_str(OMITTED_MARKER),
            Frozen::Record(_) => f.write_str("[object Object]"),
            Frozen::Sequence(sequence) => f.write_str(&sequence.join(",")),
            Frozen::Failure(failure) => write!(f, "{failure}"),
        }
    }
}

impl Serialize for Frozen {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Frozen::Undefined | Frozen::Null => serializer.serialize_unit(),
            Frozen::Bool(b) => serializer.serialize_bool(*b),
            Frozen::Number(n) if is_safe_integer(*n) => serializer.serialize_i64(*n as i64),
            Frozen::Number(n) if n.is_finite() => serializer.serialize_f64(*n),
            Frozen::Number(_) => serializer.serialize_unit(),
            Frozen::BigInt(n) => serializer.collect_str(n),
            Frozen::Str(s) => serializer.serialize_str(s),
            Frozen::Omitted => serializer.serialize_str(OMITTED_MARKER),
            Frozen::Record(record) => {
                let mut map = serializer.serialize_map(Some(record.len()))?;
                for (key, value) in record.iter() {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Frozen::Sequence(sequence) => serializer.collect_seq(sequence.iter()),
            Frozen::Failure(failure) => failure.serialize(serializer),
        }
    }
}

/// Integral and within +/- 2^53, so the `i64` conversion is exact.
fn is_safe_integer(n: f64) -> bool {
    const MAX_SAFE: f64 = 9_007_199_254_740_991.0;
    n.fract() == 0.0 && n.abs() <= MAX_SAFE
}

/// Record lookup; anything that is not a record, or a missing key, yields `Undefined`.
impl Index<&str> for Frozen {
    type Output = Frozen;

    fn index(&self, key: &str) -> &Self::Output {
        self.as_record()
            .and_then(|record| record.get(key))
            .unwrap_or(&UNDEFINED)
    }
}

/// Sequence lookup; anything that is not a sequence, or an out-of-range index, yields
/// `Undefined`.
impl Index<usize> for Frozen {
    type Output = Frozen;

    fn index(&self, index: usize) -> &Self::Output {
        self.as_sequence()
            .and_then(|sequence| sequence.get(index))
            .unwrap_or(&UNDEFINED)
    }
}

impl From<bool> for Frozen {
    fn from(value: bool) -> Self {
        Frozen::Bool(value)
    }
}

impl From<f64> for Frozen {
    fn from(value: f64) -> Self {
        Frozen::Number(value)
    }
}

impl From<i32> for Frozen {
    fn from(value: i32) -> Self {
        Frozen::Number(f64::from(value))
    }
}

impl From<u32> for Frozen {
    fn from(value: u32) -> Self {
        Frozen::Number(f64::from(value))
    }
}

impl From<i128> for Frozen {
    fn from(value: i128) -> Self {
        Frozen::BigInt(value)
    }
}

impl From<&str> for Frozen {
    fn from(value: &str) -> Self {
        Frozen::Str(value.into())
    }
}

impl From<String> for Frozen {
    fn from(value: String) -> Self {
        Frozen::Str(value.into())
    }
}

impl From<Arc<str>> for Frozen {
    fn from(value: Arc<str>) -> Self {
        Frozen::Str(value)
    }
}

impl From<Record> for Frozen {
    fn from(value: Record) -> Self {
        Frozen::Record(value)
    }
}

impl From<Sequence> for Frozen {
    fn from(value: Sequence) -> Self {
        Frozen::Sequence(value)
    }
}

impl From<Failure> for Frozen {
    fn from(value: Failure) -> Self {
        Frozen::Failure(value)
    }
}

impl From<Vec<Frozen>> for Frozen {
    fn from(value: Vec<Frozen>) -> Self {
        Frozen::Sequence(Sequence::from_vec(value))
    }
}
