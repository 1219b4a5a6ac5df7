use alloc::vec::Vec;

use crate::fenwick::Fenwick;

/// Per-index measured-or-estimated extent storage.
///
/// Every index always has a usable extent: the measured value once the host
/// reported one, otherwise the configured estimate. A Fenwick tree over the
/// current extents answers the prefix-sum queries the rest of the engine is
/// built on (spacer sums, offset → index seeding, scroll-to-index math).
///
/// Measurements survive window changes; they are only dropped by an explicit
/// [`HeightCache::invalidate`]/[`HeightCache::clear`] or remapped by the
/// index-shift operations that accompany item insertion/removal.
#[derive(Clone, Debug)]
pub struct HeightCache {
    extents: Vec<u32>,
    measured: Vec<bool>,
    sums: Fenwick,
    estimate: u32,
}

impl HeightCache {
    pub(crate) fn new(count: usize, estimate: u32) -> Self {
        let extents = alloc::vec![estimate; count];
        let measured = alloc::vec![false; count];
        let sums = Fenwick::from_extents(&extents);
        Self {
            extents,
            measured,
            sums,
            estimate,
        }
    }

    pub fn len(&self) -> usize {
        self.extents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extents.is_empty()
    }

    /// Returns the extent for `index`: the measured value if present,
    /// otherwise the estimate. Out-of-range indices fall back to the estimate.
    pub fn get(&self, index: usize) -> u32 {
        self.extents.get(index).copied().unwrap_or(self.estimate)
    }

    pub fn is_measured(&self, index: usize) -> bool {
        self.measured.get(index).copied().unwrap_or(false)
    }

    /// Records a measured extent for `index`.
    ///
    /// A zero extent is rejected: the prior value stays in place and the slot
    /// remains flagged unmeasured so the next pass retries it. Out-of-range
    /// indices are ignored.
    pub fn set(&mut self, index: usize, extent: u32) {
        if index >= self.extents.len() || extent == 0 {
            return;
        }
        let cur = self.extents[index];
        self.measured[index] = true;
        if cur == extent {
            return;
        }
        self.extents[index] = extent;
        self.sums.add(index, extent as i64 - cur as i64);
    }

    /// Drops the measurement at `index`, reverting it to the estimate.
    pub fn invalidate(&mut self, index: usize) {
        if index >= self.extents.len() {
            return;
        }
        let cur = self.extents[index];
        self.extents[index] = self.estimate;
        self.measured[index] = false;
        if cur != self.estimate {
            self.sums.add(index, self.estimate as i64 - cur as i64);
        }
    }

    /// Remaps every record at `>= at` to `index + 1`, opening an estimated
    /// slot at `at`. No-op when `at` is past the end.
    pub fn shift_insert(&mut self, at: usize) {
        if at > self.extents.len() {
            return;
        }
        self.extents.insert(at, self.estimate);
        self.measured.insert(at, false);
        self.rebuild();
    }

    /// Bulk form of [`HeightCache::shift_insert`]: opens `n` estimated slots
    /// at `at` with a single prefix-sum rebuild.
    pub fn shift_insert_many(&mut self, at: usize, n: usize) {
        if at > self.extents.len() || n == 0 {
            return;
        }
        self.extents
            .splice(at..at, core::iter::repeat_n(self.estimate, n));
        self.measured.splice(at..at, core::iter::repeat_n(false, n));
        self.rebuild();
    }

    /// Drops the record at `at` and remaps every record `> at` to
    /// `index - 1`. No-op when `at` is out of range.
    pub fn shift_remove(&mut self, at: usize) {
        if at >= self.extents.len() {
            return;
        }
        self.extents.remove(at);
        self.measured.remove(at);
        self.rebuild();
    }

    /// Appends an estimated slot at the end.
    pub(crate) fn push_estimate(&mut self) {
        self.extents.push(self.estimate);
        self.measured.push(false);
        self.sums.push(self.estimate as u64);
    }

    /// Resets every record to the estimate for a sequence of `count` items.
    pub(crate) fn reset(&mut self, count: usize) {
        self.extents.clear();
        self.measured.clear();
        self.extents.resize(count, self.estimate);
        self.measured.resize(count, false);
        self.rebuild();
    }

    pub fn clear(&mut self) {
        self.reset(0);
    }

    /// Sum of extents for indices `[0, index)`.
    pub fn extent_before(&self, index: usize) -> u64 {
        self.sums.prefix_sum(index)
    }

    /// Sum of extents for indices `[from, to)`.
    pub fn range_extent(&self, from: usize, to: usize) -> u64 {
        if from >= to {
            return 0;
        }
        self.sums
            .prefix_sum(to)
            .saturating_sub(self.sums.prefix_sum(from))
    }

    pub fn total(&self) -> u64 {
        self.sums.total()
    }

    /// Maps a content offset to the index of the item spanning it (clamped to
    /// the last index). Returns 0 for an empty cache.
    pub fn index_at_offset(&self, offset: u64) -> usize {
        let count = self.extents.len();
        if count == 0 {
            return 0;
        }
        self.sums.lower_bound(offset).min(count - 1)
    }

    fn rebuild(&mut self) {
        self.sums = Fenwick::from_extents(&self.extents);
    }
}
