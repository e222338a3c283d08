use std::fmt;
use std::ops::Index;
use std::slice;
use std::sync::Arc;

use crate::{Frozen, ViewOp};

/// An immutable, fixed-length, 0-indexed list of [`Frozen`] elements.
///
/// Length and elements are fixed at construction. [`Sequence::iter`] can be called any number
/// of times; each pass is independent and yields the same elements in the same order.
///
/// Operations that look like mutation (`with`, `to_sorted`, `to_spliced`, ...) live in the
/// view layer and return a new `Sequence`. Writing through an index does not compile:
///
/// ```compile_fail
/// use deepfreeze_types::{Frozen, Sequence};
///
/// let mut tags = Sequence::from_vec(vec![Frozen::from("admin")]);
/// tags[0] = Frozen::from("x");
/// ```
#[derive(Clone)]
pub struct Sequence(Arc<[Frozen]>);

impl Sequence {
    #[must_use]
    pub fn from_vec(items: Vec<Frozen>) -> Self {
        Self(items.into())
    }

    #[must_use]
    pub fn empty() -> Self {
        Self(Arc::from(Vec::new()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Frozen> {
        self.0.get(index)
    }

    #[must_use]
    pub fn first(&self) -> Option<&Frozen> {
        self.0.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Frozen> {
        self.0.last()
    }

    /// Start a fresh forward pass over the elements.
    pub fn iter(&self) -> slice::Iter<'_, Frozen> {
        self.verbatim(ViewOp::Iter, <[Frozen]>::iter)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Frozen] {
        &self.0
    }

    /// Copy the elements into an ordinary `Vec`. Elements are shared, not deep-copied.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Frozen> {
        self.0.to_vec()
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for Sequence {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.0 == other.0
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl Index<usize> for Sequence {
    type Output = Frozen;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a Frozen;
    type IntoIter = slice::Iter<'a, Frozen>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Into<Frozen>> FromIterator<T> for Sequence {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iteration_is_restartable() {
        let seq: Sequence = [1, 2, 3].into_iter().collect();
        let first: Vec<_> = seq.iter().cloned().collect();
        let second: Vec<_> = seq.iter().cloned().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn partially_consumed_iterator_does_not_affect_new_pass() {
        let seq: Sequence = ["a", "b"].into_iter().collect();
        let mut pass = seq.iter();
        pass.next();
        assert_eq!(seq.iter().next(), Some(&Frozen::from("a")));
        assert_eq!(pass.next(), Some(&Frozen::from("b")));
    }

    #[test]
    fn to_vec_shares_elements() {
        let inner = Sequence::from_vec(vec![Frozen::Null]);
        let outer = Sequence::from_vec(vec![Frozen::from(inner.clone())]);
        let copy = outer.to_vec();
        assert!(copy[0].ptr_eq(&Frozen::from(inner)));
    }

    #[test]
    fn accessors() {
        let seq: Sequence = [true, false].into_iter().collect();
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.first(), Some(&Frozen::Bool(true)));
        assert_eq!(seq.last(), Some(&Frozen::Bool(false)));
        assert_eq!(seq.get(2), None);
        assert!(Sequence::empty().is_empty());
    }
}
