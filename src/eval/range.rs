//! Lazy integer ranges.

use super::error::EvalError;

/// The integers `start, start + step, ...` up to and including `stop`.
///
/// Nothing is materialized: length and random access are computed, and
/// iteration can be restarted any number of times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntRange {
    start: i64,
    stop: i64,
    step: i64,
}

impl IntRange {
    /// A range with step 1.
    pub fn new(start: i64, stop: i64) -> Self {
        Self {
            start,
            stop,
            step: 1,
        }
    }

    /// A range with an explicit step, which must be positive. The number
    /// of elements must fit in a `usize`.
    pub fn with_step(start: i64, stop: i64, step: i64) -> Result<Self, EvalError> {
        if step <= 0 {
            return Err(EvalError::InvalidStep(step));
        }
        let range = Self { start, stop, step };
        if usize::try_from(range.count()).is_err() {
            return Err(EvalError::RangeTooLarge { start, stop, step });
        }
        Ok(range)
    }

    const EMPTY: IntRange = IntRange {
        start: 1,
        stop: 0,
        step: 1,
    };

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn stop(&self) -> i64 {
        self.stop
    }

    pub fn step(&self) -> i64 {
        self.step
    }

    /// Exact number of elements; `i64::MIN..i64::MAX` holds 2^64.
    fn count(&self) -> i128 {
        if self.start > self.stop {
            return 0;
        }
        let span = i128::from(self.stop) - i128::from(self.start);
        span / i128::from(self.step) + 1
    }

    /// Number of elements, saturating at `usize::MAX` for a range built
    /// with [`IntRange::new`] that holds more.
    pub fn len(&self) -> usize {
        usize::try_from(self.count()).unwrap_or(usize::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// The range without its first element.
    pub fn skip_first(&self) -> IntRange {
        match self.start.checked_add(self.step) {
            Some(start) if !self.is_empty() => IntRange { start, ..*self },
            _ => IntRange::EMPTY,
        }
    }

    /// Element at a 0-based index; negative indices count from the end.
    pub fn at(&self, index: i64) -> Option<i64> {
        let len = self.count();
        let index = i128::from(index);
        let index = if index < 0 { len + index } else { index };
        if index < 0 || index >= len {
            return None;
        }
        Some((i128::from(self.start) + index * i128::from(self.step)) as i64)
    }

    pub fn contains(&self, value: i64) -> bool {
        value >= self.start
            && value <= self.stop
            && (i128::from(value) - i128::from(self.start)) % i128::from(self.step) == 0
    }

    pub fn some(&self, mut predicate: impl FnMut(i64) -> bool) -> bool {
        self.iter().any(&mut predicate)
    }

    pub fn every(&self, mut predicate: impl FnMut(i64) -> bool) -> bool {
        self.iter().all(&mut predicate)
    }

    pub fn iter(&self) -> RangeIter {
        RangeIter {
            next: self.start,
            remaining: self.len(),
            step: self.step,
        }
    }

    pub fn to_vec(&self) -> Vec<i64> {
        self.iter().collect()
    }
}

impl IntoIterator for IntRange {
    type Item = i64;
    type IntoIter = RangeIter;

    fn into_iter(self) -> RangeIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct RangeIter {
    next: i64,
    remaining: usize,
    step: i64,
}

impl Iterator for RangeIter {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        if self.remaining == 0 {
            return None;
        }
        let value = self.next;
        self.remaining -= 1;
        self.next = self.next.saturating_add(self.step);
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for RangeIter {}
