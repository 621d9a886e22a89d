//! Sorted sets of disjoint index ranges.
//!
//! [`IntervalSet`] keeps its intervals ascending, non-overlapping and
//! non-adjacent at all times: inserting a range that touches or overlaps
//! existing intervals coalesces them into one. Queries cost `O(log k)` for
//! `k` intervals regardless of how many indices are covered.

use std::fmt;

/// A non-empty half-open index range `[start, start + len)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    start: usize,
    len: usize,
}

impl Interval {
    /// Returns `None` for an empty range.
    pub fn new(start: usize, len: usize) -> Option<Self> {
        let len = len.min(usize::MAX - start);
        (len > 0).then_some(Self { start, len })
    }

    fn from_bounds(start: usize, end: usize) -> Self {
        debug_assert!(start < end);
        Self {
            start,
            len: end - start,
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`; intervals are never empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Exclusive end.
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Inclusive last index.
    pub fn last(&self) -> usize {
        self.end() - 1
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end()
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end())
    }
}

/// An ordered set of disjoint, non-adjacent intervals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntervalSet {
    intervals: Vec<Interval>,
}

impl IntervalSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored intervals (not indices).
    pub fn interval_count(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Total number of indices covered.
    pub fn count(&self) -> usize {
        self.intervals.iter().map(Interval::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interval> + '_ {
        self.intervals.iter()
    }

    pub fn as_slice(&self) -> &[Interval] {
        &self.intervals
    }

    /// Smallest covered index.
    pub fn min(&self) -> Option<usize> {
        self.intervals.first().map(Interval::start)
    }

    /// Largest covered index.
    pub fn max(&self) -> Option<usize> {
        self.intervals.last().map(Interval::last)
    }

    pub fn contains(&self, index: usize) -> bool {
        let pos = self.intervals.partition_point(|iv| iv.end() <= index);
        self.intervals
            .get(pos)
            .is_some_and(|iv| iv.start() <= index)
    }

    /// Remove every interval.
    pub fn clear(&mut self) {
        self.intervals.clear();
    }

    /// Add `[start, start + len)`, merging with every interval it overlaps or
    /// touches.
    ///
    /// Returns `false` when `len` is zero or the range was already covered.
    pub fn insert(&mut self, start: usize, len: usize) -> bool {
        let Some(new) = Interval::new(start, len) else {
            return false;
        };

        // Intervals in first..last overlap or touch the new one.
        let first = self.intervals.partition_point(|iv| iv.end() < new.start());
        let last = self.intervals.partition_point(|iv| iv.start() <= new.end());

        if first < last {
            let covering = self.intervals[first];
            if last - first == 1 && covering.start() <= new.start() && covering.end() >= new.end()
            {
                return false;
            }
            let merged = Interval::from_bounds(
                covering.start().min(new.start()),
                self.intervals[last - 1].end().max(new.end()),
            );
            self.intervals.splice(first..last, [merged]);
        } else {
            self.intervals.insert(first, new);
        }
        true
    }

    /// Remove `[start, start + len)` from every interval it overlaps.
    ///
    /// Per affected interval: fully covered ones are deleted, one that covers
    /// the whole range is split in two, and partial overlaps are truncated at
    /// the front or back. Returns `false` when nothing overlapped.
    pub fn remove(&mut self, start: usize, len: usize) -> bool {
        let Some(gone) = Interval::new(start, len) else {
            return false;
        };

        let first = self.intervals.partition_point(|iv| iv.end() <= gone.start());
        let last = self.intervals.partition_point(|iv| iv.start() < gone.end());
        if first >= last {
            return false;
        }

        let head = self.intervals[first];
        let tail = self.intervals[last - 1];
        let mut keep = Vec::with_capacity(2);
        if head.start() < gone.start() {
            keep.push(Interval::from_bounds(head.start(), gone.start()));
        }
        if tail.end() > gone.end() {
            keep.push(Interval::from_bounds(gone.end(), tail.end()));
        }
        self.intervals.splice(first..last, keep);
        true
    }

    /// Replace the contents with the single range `[start, start + len)`.
    pub fn set(&mut self, start: usize, len: usize) {
        self.clear();
        self.insert(start, len);
    }

    /// Whether the invariant (ascending, disjoint, non-adjacent) holds.
    pub fn is_normalized(&self) -> bool {
        self.intervals
            .windows(2)
            .all(|pair| pair[0].end() < pair[1].start())
            && self.intervals.iter().all(|iv| !iv.is_empty())
    }
}

impl<'a> IntoIterator for &'a IntervalSet {
    type Item = &'a Interval;
    type IntoIter = std::slice::Iter<'a, Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(set: &IntervalSet) -> Vec<(usize, usize)> {
        set.iter().map(|iv| (iv.start(), iv.end())).collect()
    }

    // -------------------------------------------------------------------------
    // Insertion and merging
    // -------------------------------------------------------------------------

    #[test]
    fn test_adjacent_intervals_merge() {
        let mut set = IntervalSet::new();
        set.insert(4, 3);
        set.insert(7, 2);
        assert_eq!(bounds(&set), vec![(4, 9)]);
    }

    #[test]
    fn test_adjacent_on_the_left_merges() {
        let mut set = IntervalSet::new();
        set.insert(7, 2);
        set.insert(4, 3);
        assert_eq!(bounds(&set), vec![(4, 9)]);
    }

    #[test]
    fn test_disjoint_intervals_stay_sorted() {
        let mut set = IntervalSet::new();
        set.insert(20, 5);
        set.insert(0, 2);
        set.insert(10, 1);
        assert_eq!(bounds(&set), vec![(0, 2), (10, 11), (20, 25)]);
        assert_eq!(set.count(), 8);
    }

    #[test]
    fn test_insert_bridging_many_intervals() {
        let mut set = IntervalSet::new();
        for start in [0, 4, 8, 12] {
            set.insert(start, 2);
        }
        assert_eq!(set.interval_count(), 4);

        set.insert(1, 12);
        assert_eq!(bounds(&set), vec![(0, 14)]);
        assert!(set.is_normalized());
    }

    #[test]
    fn test_insert_already_covered() {
        let mut set = IntervalSet::new();
        set.insert(0, 10);
        assert!(!set.insert(3, 2));
        assert!(!set.insert(5, 0));
        assert_eq!(bounds(&set), vec![(0, 10)]);
    }

    #[test]
    fn test_merge_closure_over_many_inserts() {
        let mut set = IntervalSet::new();
        let mut seed = 17usize;
        for _ in 0..500 {
            seed = seed.wrapping_mul(1103515245).wrapping_add(12345) % 1_000_003;
            let start = seed % 200;
            let len = seed % 7;
            set.insert(start, len);
            assert!(set.is_normalized(), "broken after insert({start}, {len})");
        }
    }

    // -------------------------------------------------------------------------
    // Removal
    // -------------------------------------------------------------------------

    #[test]
    fn test_remove_splits_containing_interval() {
        let mut set = IntervalSet::new();
        set.set(0, 10);
        assert!(set.remove(3, 4));
        assert_eq!(bounds(&set), vec![(0, 3), (7, 10)]);
    }

    #[test]
    fn test_remove_deletes_contained_interval() {
        let mut set = IntervalSet::new();
        set.insert(0, 2);
        set.insert(5, 2);
        set.insert(10, 2);
        set.remove(4, 4);
        assert_eq!(bounds(&set), vec![(0, 2), (10, 12)]);
    }

    #[test]
    fn test_remove_truncates_front_and_back() {
        let mut set = IntervalSet::new();
        set.insert(0, 5);
        set.insert(10, 5);
        set.remove(3, 9);
        assert_eq!(bounds(&set), vec![(0, 3), (12, 15)]);
    }

    #[test]
    fn test_remove_without_overlap() {
        let mut set = IntervalSet::new();
        set.insert(10, 5);
        assert!(!set.remove(0, 10));
        assert!(!set.remove(15, 3));
        assert!(!set.remove(12, 0));
        assert_eq!(bounds(&set), vec![(10, 15)]);
    }

    #[test]
    fn test_remove_everything() {
        let mut set = IntervalSet::new();
        set.insert(2, 3);
        set.insert(8, 3);
        set.remove(0, 100);
        assert!(set.is_empty());
        assert_eq!(set.min(), None);
        assert_eq!(set.max(), None);
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    #[test]
    fn test_contains_and_bounds() {
        let mut set = IntervalSet::new();
        set.insert(3, 2);
        set.insert(9, 1);

        let members: Vec<usize> = (0..12).filter(|&n| set.contains(n)).collect();
        assert_eq!(members, vec![3, 4, 9]);
        assert_eq!(set.min(), Some(3));
        assert_eq!(set.max(), Some(9));
    }

    #[test]
    fn test_interval_display() {
        let iv = Interval::new(4, 5).unwrap();
        assert_eq!(iv.to_string(), "[4, 9)");
        assert_eq!(iv.last(), 8);
        assert!(Interval::new(4, 0).is_none());
    }
}
