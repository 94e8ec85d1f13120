//! Ordered staker sequences
//!
//! Every read operation of the staking stores hands out a [`StakerIterator`]:
//! a lazy, already-ordered sequence that owns whatever cursors it needs.
//! Releasing it (explicitly with [`StakerIterator::release`] or by dropping
//! it) frees those cursors; release is idempotent.

use crate::staker::Staker;
use std::iter::Peekable;

/// Two-pointer merge of two sequences already sorted by `less`.
///
/// Ties go to the left input.
pub struct MergeSorted<T, L, R, F>
where
    L: Iterator<Item = T>,
    R: Iterator<Item = T>,
{
    left: Peekable<L>,
    right: Peekable<R>,
    less: F,
}

impl<T, L, R, F> MergeSorted<T, L, R, F>
where
    L: Iterator<Item = T>,
    R: Iterator<Item = T>,
    F: Fn(&T, &T) -> bool,
{
    pub fn new(left: L, right: R, less: F) -> Self {
        Self {
            left: left.peekable(),
            right: right.peekable(),
            less,
        }
    }
}

impl<T, L, R, F> Iterator for MergeSorted<T, L, R, F>
where
    L: Iterator<Item = T>,
    R: Iterator<Item = T>,
    F: Fn(&T, &T) -> bool,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let take_right = match (self.left.peek(), self.right.peek()) {
            (Some(l), Some(r)) => (self.less)(r, l),
            (Some(_), None) => false,
            (None, Some(_)) => true,
            (None, None) => return None,
        };
        if take_right {
            self.right.next()
        } else {
            self.left.next()
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (l_lo, l_hi) = self.left.size_hint();
        let (r_lo, r_hi) = self.right.size_hint();
        let hi = match (l_hi, r_hi) {
            (Some(l), Some(r)) => l.checked_add(r),
            _ => None,
        };
        (l_lo.saturating_add(r_lo), hi)
    }
}

/// Releasable, ordered sequence of stakers.
pub struct StakerIterator<'a> {
    inner: Option<Box<dyn Iterator<Item = Staker> + 'a>>,
}

impl<'a> StakerIterator<'a> {
    /// Wrap a sequence the caller guarantees is already in schedule order.
    pub fn new<I>(iter: I) -> Self
    where
        I: Iterator<Item = Staker> + 'a,
    {
        Self {
            inner: Some(Box::new(iter)),
        }
    }

    pub fn empty() -> Self {
        Self { inner: None }
    }

    /// Sequence over a fixed list, sorted into schedule order.
    pub fn from_slice(stakers: &[Staker]) -> Self {
        let mut sorted = stakers.to_vec();
        sorted.sort_by(|a, b| a.cmp_schedule(b));
        Self::new(sorted.into_iter())
    }

    /// Merge with another ordered sequence.
    pub fn merge(self, other: StakerIterator<'a>) -> StakerIterator<'a> {
        match (self.inner.is_some(), other.inner.is_some()) {
            (_, false) => self,
            (false, true) => other,
            (true, true) => {
                let less = |a: &Staker, b: &Staker| a.less(b);
                StakerIterator::new(MergeSorted::new(self, other, less))
            }
        }
    }

    /// Drop every staker for which `hidden` returns true.
    pub fn exclude<F>(self, hidden: F) -> StakerIterator<'a>
    where
        F: Fn(&Staker) -> bool + 'a,
    {
        if self.inner.is_none() {
            return self;
        }
        StakerIterator::new(self.filter(move |staker| !hidden(staker)))
    }

    /// Free the underlying cursors. Calling it again is a no-op.
    pub fn release(&mut self) {
        self.inner = None;
    }

    pub fn is_released(&self) -> bool {
        self.inner.is_none()
    }
}

impl Default for StakerIterator<'_> {
    fn default() -> Self {
        Self::empty()
    }
}

impl Iterator for StakerIterator<'_> {
    type Item = Staker;

    fn next(&mut self) -> Option<Staker> {
        let next = self.inner.as_mut()?.next();
        if next.is_none() {
            self.release();
        }
        next
    }
}
