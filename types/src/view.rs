//! Read-only view operations on [`Sequence`].
//!
//! Every whitelisted operation is listed in a fixed table together with how its result is
//! returned: either verbatim (a boolean, an index, an element, a string, a folded value) or
//! re-wrapped into a new [`Sequence`]. Operations that re-wrap run against an ordinary `Vec`
//! copy of the elements and never touch the receiver.
//!
//! Callbacks receive `(element, index, sequence)` strictly sequentially, once per element, in
//! ascending index order; the `*_right` and `find_last*` variants walk in descending order.

use std::cmp::Ordering;
use std::iter;

use thiserror::Error;

use crate::{Frozen, Sequence};

/// How a view operation hands its result back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rewrap {
    /// The result is returned unchanged.
    Verbatim,
    /// The result is an ordered collection and becomes a new [`Sequence`].
    Sequence,
}

/// The whitelist of non-mutating sequence operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewOp {
    Includes,
    IndexOf,
    LastIndexOf,
    Find,
    FindIndex,
    FindLast,
    FindLastIndex,
    At,
    Every,
    Some,
    Reduce,
    ReduceRight,
    ForEach,
    Join,
    Iter,
    Slice,
    Map,
    Filter,
    FlatMap,
    ToSorted,
    ToReversed,
    ToSpliced,
    With,
    Concat,
}

/// Indexed by `ViewOp` discriminant.
const VIEW_TABLE: [(ViewOp, &str, Rewrap); 24] = [
    (ViewOp::Includes, "includes", Rewrap::Verbatim),
    (ViewOp::IndexOf, "index_of", Rewrap::Verbatim),
    (ViewOp::LastIndexOf, "last_index_of", Rewrap::Verbatim),
    (ViewOp::Find, "find", Rewrap::Verbatim),
    (ViewOp::FindIndex, "find_index", Rewrap::Verbatim),
    (ViewOp::FindLast, "find_last", Rewrap::Verbatim),
    (ViewOp::FindLastIndex, "find_last_index", Rewrap::Verbatim),
    (ViewOp::At, "at", Rewrap::Verbatim),
    (ViewOp::Every, "every", Rewrap::Verbatim),
    (ViewOp::Some, "some", Rewrap::Verbatim),
    (ViewOp::Reduce, "reduce", Rewrap::Verbatim),
    (ViewOp::ReduceRight, "reduce_right", Rewrap::Verbatim),
    (ViewOp::ForEach, "for_each", Rewrap::Verbatim),
    (ViewOp::Join, "join", Rewrap::Verbatim),
    (ViewOp::Iter, "iter", Rewrap::Verbatim),
    (ViewOp::Slice, "slice", Rewrap::Sequence),
    (ViewOp::Map, "map", Rewrap::Sequence),
    (ViewOp::Filter, "filter", Rewrap::Sequence),
    (ViewOp::FlatMap, "flat_map", Rewrap::Sequence),
    (ViewOp::ToSorted, "to_sorted", Rewrap::Sequence),
    (ViewOp::ToReversed, "to_reversed", Rewrap::Sequence),
    (ViewOp::ToSpliced, "to_spliced", Rewrap::Sequence),
    (ViewOp::With, "with", Rewrap::Sequence),
    (ViewOp::Concat, "concat", Rewrap::Sequence),
];

impl ViewOp {
    /// Every whitelisted operation, in table order.
    pub const ALL: [ViewOp; 24] = {
        let mut all = [ViewOp::Includes; 24];
        let mut i = 0;
        while i < VIEW_TABLE.len() {
            all[i] = VIEW_TABLE[i].0;
            i += 1;
        }
        all
    };

    #[must_use]
    pub const fn name(self) -> &'static str {
        VIEW_TABLE[self as usize].1
    }

    #[must_use]
    pub const fn rewrap(self) -> Rewrap {
        VIEW_TABLE[self as usize].2
    }

    /// Look up an operation by its table name. Anything outside the whitelist is `None`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        VIEW_TABLE
            .iter()
            .find(|(_, candidate, _)| *candidate == name)
            .map(|(op, _, _)| *op)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("index {index} is out of range for a sequence of length {len}")]
    IndexOutOfRange { index: isize, len: usize },
}

/// Resolve a possibly negative index against `len`, clamped to `0..=len`.
fn relative_index(index: isize, len: usize) -> usize {
    if index < 0 {
        len.saturating_sub(index.unsigned_abs())
    } else {
        index.unsigned_abs().min(len)
    }
}

/// Resolve a possibly negative index against `len`, or `None` if it falls outside `0..len`.
fn absolute_index(index: isize, len: usize) -> Option<usize> {
    let resolved = if index < 0 {
        len.checked_sub(index.unsigned_abs())?
    } else {
        index.unsigned_abs()
    };
    (resolved < len).then_some(resolved)
}

/// Undefined elements always sort last and are never passed to the comparator.
fn sort_with(mut items: Vec<Frozen>, mut compare: impl FnMut(&Frozen, &Frozen) -> Ordering) -> Vec<Frozen> {
    let undefined = items.iter().filter(|item| matches!(item, Frozen::Undefined)).count();
    items.retain(|item| !matches!(item, Frozen::Undefined));
    items.sort_by(|a, b| compare(a, b));
    items.extend(iter::repeat_n(Frozen::Undefined, undefined));
    items
}

impl Sequence {
    pub(crate) fn verbatim<'s, R>(&'s self, op: ViewOp, run: impl FnOnce(&'s [Frozen]) -> R) -> R {
        debug_assert_eq!(op.rewrap(), Rewrap::Verbatim, "{} re-wraps its result", op.name());
        run(self.as_slice())
    }

    fn rewrap(op: ViewOp, items: Vec<Frozen>) -> Sequence {
        debug_assert_eq!(op.rewrap(), Rewrap::Sequence, "{} returns verbatim", op.name());
        Sequence::from_vec(items)
    }

    /// Membership test; `NaN` is found.
    #[must_use]
    pub fn includes(&self, needle: &Frozen) -> bool {
        self.verbatim(ViewOp::Includes, |items| {
            items.iter().any(|item| item.same_value_zero(needle))
        })
    }

    /// First index strictly equal to `needle`.
    #[must_use]
    pub fn index_of(&self, needle: &Frozen) -> Option<usize> {
        self.verbatim(ViewOp::IndexOf, |items| {
            items.iter().position(|item| item.strict_equals(needle))
        })
    }

    #[must_use]
    pub fn last_index_of(&self, needle: &Frozen) -> Option<usize> {
        self.verbatim(ViewOp::LastIndexOf, |items| {
            items.iter().rposition(|item| item.strict_equals(needle))
        })
    }

    pub fn find(&self, mut predicate: impl FnMut(&Frozen, usize, &Sequence) -> bool) -> Option<&Frozen> {
        self.verbatim(ViewOp::Find, |items| {
            items
                .iter()
                .enumerate()
                .find(|(i, item)| predicate(item, *i, self))
                .map(|(_, item)| item)
        })
    }

    pub fn find_index(&self, mut predicate: impl FnMut(&Frozen, usize, &Sequence) -> bool) -> Option<usize> {
        self.verbatim(ViewOp::FindIndex, |items| {
            items
                .iter()
                .enumerate()
                .position(|(i, item)| predicate(item, i, self))
        })
    }

    pub fn find_last(&self, mut predicate: impl FnMut(&Frozen, usize, &Sequence) -> bool) -> Option<&Frozen> {
        self.verbatim(ViewOp::FindLast, |items| {
            items
                .iter()
                .enumerate()
                .rev()
                .find(|(i, item)| predicate(item, *i, self))
                .map(|(_, item)| item)
        })
    }

    pub fn find_last_index(
        &self,
        mut predicate: impl FnMut(&Frozen, usize, &Sequence) -> bool,
    ) -> Option<usize> {
        self.verbatim(ViewOp::FindLastIndex, |items| {
            items
                .iter()
                .enumerate()
                .rev()
                .find(|(i, item)| predicate(item, *i, self))
                .map(|(i, _)| i)
        })
    }

    /// Element at `index`; negative indices count from the end.
    #[must_use]
    pub fn at(&self, index: isize) -> Option<&Frozen> {
        self.verbatim(ViewOp::At, |items| {
            absolute_index(index, items.len()).map(|i| &items[i])
        })
    }

    pub fn every(&self, mut predicate: impl FnMut(&Frozen, usize, &Sequence) -> bool) -> bool {
        self.verbatim(ViewOp::Every, |items| {
            items.iter().enumerate().all(|(i, item)| predicate(item, i, self))
        })
    }

    pub fn some(&self, mut predicate: impl FnMut(&Frozen, usize, &Sequence) -> bool) -> bool {
        self.verbatim(ViewOp::Some, |items| {
            items.iter().enumerate().any(|(i, item)| predicate(item, i, self))
        })
    }

    /// Fold from the first element to the last.
    pub fn reduce<T>(&self, init: T, mut fold: impl FnMut(T, &Frozen, usize, &Sequence) -> T) -> T {
        self.verbatim(ViewOp::Reduce, |items| {
            items
                .iter()
                .enumerate()
                .fold(init, |acc, (i, item)| fold(acc, item, i, self))
        })
    }

    /// Fold from the last element to the first.
    pub fn reduce_right<T>(
        &self,
        init: T,
        mut fold: impl FnMut(T, &Frozen, usize, &Sequence) -> T,
    ) -> T {
        self.verbatim(ViewOp::ReduceRight, |items| {
            items
                .iter()
                .enumerate()
                .rev()
                .fold(init, |acc, (i, item)| fold(acc, item, i, self))
        })
    }

    pub fn for_each(&self, mut visit: impl FnMut(&Frozen, usize, &Sequence)) {
        self.verbatim(ViewOp::ForEach, |items| {
            for (i, item) in items.iter().enumerate() {
                visit(item, i, self);
            }
        });
    }

    /// Join the string forms of the elements; `undefined` and `null` render as empty strings.
    #[must_use]
    pub fn join(&self, separator: &str) -> String {
        self.verbatim(ViewOp::Join, |items| {
            let mut out = String::new();
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(separator);
                }
                if !item.is_nullish() {
                    out.push_str(&item.to_string());
                }
            }
            out
        })
    }

    /// Elements from `start` up to (excluding) `end`; negative bounds count from the end.
    #[must_use]
    pub fn slice(&self, start: isize, end: Option<isize>) -> Sequence {
        let len = self.len();
        let start = relative_index(start, len);
        let end = end.map_or(len, |end| relative_index(end, len));
        let items = if start < end {
            self.as_slice()[start..end].to_vec()
        } else {
            Vec::new()
        };
        Self::rewrap(ViewOp::Slice, items)
    }

    pub fn map<T: Into<Frozen>>(&self, mut transform: impl FnMut(&Frozen, usize, &Sequence) -> T) -> Sequence {
        let items = self
            .iter()
            .enumerate()
            .map(|(i, item)| transform(item, i, self).into())
            .collect();
        Self::rewrap(ViewOp::Map, items)
    }

    pub fn filter(&self, mut predicate: impl FnMut(&Frozen, usize, &Sequence) -> bool) -> Sequence {
        let items = self
            .iter()
            .enumerate()
            .filter(|(i, item)| predicate(item, *i, self))
            .map(|(_, item)| item.clone())
            .collect();
        Self::rewrap(ViewOp::Filter, items)
    }

    /// Map, then flatten sequence results by one level.
    pub fn flat_map<T: Into<Frozen>>(
        &self,
        mut transform: impl FnMut(&Frozen, usize, &Sequence) -> T,
    ) -> Sequence {
        let mut items = Vec::with_capacity(self.len());
        for (i, item) in self.iter().enumerate() {
            let mapped: Frozen = transform(item, i, self).into();
            match mapped {
                Frozen::Sequence(inner) => items.extend(inner.iter().cloned()),
                other => items.push(other),
            }
        }
        Self::rewrap(ViewOp::FlatMap, items)
    }

    /// Sorted copy ordered by string form, `undefined` last.
    #[must_use]
    pub fn to_sorted(&self) -> Sequence {
        let items = sort_with(self.to_vec(), |a, b| a.to_string().cmp(&b.to_string()));
        Self::rewrap(ViewOp::ToSorted, items)
    }

    /// Sorted copy using `compare`; the sort is stable and `undefined` still goes last.
    pub fn to_sorted_by(&self, compare: impl FnMut(&Frozen, &Frozen) -> Ordering) -> Sequence {
        let items = sort_with(self.to_vec(), compare);
        Self::rewrap(ViewOp::ToSorted, items)
    }

    #[must_use]
    pub fn to_reversed(&self) -> Sequence {
        let mut items = self.to_vec();
        items.reverse();
        Self::rewrap(ViewOp::ToReversed, items)
    }

    /// Copy with `delete_count` elements at `start` replaced by `insert`.
    ///
    /// A missing `delete_count` removes everything from `start` to the end.
    pub fn to_spliced(
        &self,
        start: isize,
        delete_count: Option<usize>,
        insert: impl IntoIterator<Item = Frozen>,
    ) -> Sequence {
        let mut items = self.to_vec();
        let start = relative_index(start, items.len());
        let remaining = items.len() - start;
        let delete = delete_count.map_or(remaining, |count| count.min(remaining));
        items.splice(start..start + delete, insert);
        Self::rewrap(ViewOp::ToSpliced, items)
    }

    /// Copy with the element at `index` replaced.
    pub fn with(&self, index: isize, value: impl Into<Frozen>) -> Result<Sequence, ViewError> {
        let mut items = self.to_vec();
        let len = items.len();
        let slot = absolute_index(index, len).ok_or(ViewError::IndexOutOfRange { index, len })?;
        items[slot] = value.into();
        Ok(Self::rewrap(ViewOp::With, items))
    }

    /// Copy with `others` appended; sequence arguments are spread one level.
    pub fn concat(&self, others: impl IntoIterator<Item = Frozen>) -> Sequence {
        let mut items = self.to_vec();
        for other in others {
            match other {
                Frozen::Sequence(inner) => items.extend(inner.iter().cloned()),
                other => items.push(other),
            }
        }
        Self::rewrap(ViewOp::Concat, items)
    }
}
