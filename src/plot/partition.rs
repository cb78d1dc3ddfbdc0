//! Partition of series indices into plot panes
//!
//! A log with `n` columns starts as one pane showing every column. Splitting a
//! pane moves its hidden series into a new pane directly below it. Panes are
//! never merged back individually; [`SeriesPartition::reset`] returns to a
//! single pane.

use serde::{Deserialize, Serialize};

/// Ordered list of disjoint, order-preserving index groups covering `0..len`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPartition {
    len: usize,
    groups: Vec<Vec<usize>>,
}

impl SeriesPartition {
    /// Single group `[0, 1, .., len - 1]`
    pub fn new(len: usize) -> Self {
        Self {
            len,
            groups: vec![(0..len).collect()],
        }
    }

    /// Discard every split
    pub fn reset(&mut self) {
        *self = Self::new(self.len);
    }

    /// Number of series covered
    pub fn series_len(&self) -> usize {
        self.len
    }

    pub fn groups(&self) -> &[Vec<usize>] {
        &self.groups
    }

    pub fn group(&self, index: usize) -> Option<&[usize]> {
        self.groups.get(index).map(Vec::as_slice)
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Replace group `group_index` by `[visible, hidden]`.
    ///
    /// `mask[i]` tells whether the `i`-th member of the group is visible. Order
    /// within each half follows the group's order. A uniform mask yields one
    /// empty group; callers disable the action in that case.
    ///
    /// # Panics
    ///
    /// Panics if `group_index` is out of range or `mask.len()` differs from the
    /// group length.
    pub fn split(&mut self, group_index: usize, mask: &[bool]) {
        assert!(
            group_index < self.groups.len(),
            "group index {} out of range ({} groups)",
            group_index,
            self.groups.len()
        );
        let group = &self.groups[group_index];
        assert_eq!(
            mask.len(),
            group.len(),
            "visibility mask length does not match group {}",
            group_index
        );

        let (visible, hidden): (Vec<(usize, bool)>, Vec<(usize, bool)>) = group
            .iter()
            .copied()
            .zip(mask.iter().copied())
            .partition(|(_, shown)| *shown);
        let visible: Vec<usize> = visible.into_iter().map(|(idx, _)| idx).collect();
        let hidden: Vec<usize> = hidden.into_iter().map(|(idx, _)| idx).collect();

        self.groups[group_index] = visible;
        self.groups.insert(group_index + 1, hidden);

        debug_assert!(self.check_invariants().is_ok());
    }

    /// All indices in group order, then member order
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.groups.iter().flatten().copied()
    }

    /// Verify that the groups form a permutation of `0..len`
    pub fn check_invariants(&self) -> Result<(), String> {
        let mut seen = vec![false; self.len];
        for index in self.indices() {
            match seen.get_mut(index) {
                None => return Err(format!("index {} out of range {}", index, self.len)),
                Some(true) => return Err(format!("index {} appears twice", index)),
                Some(slot) => *slot = true,
            }
        }
        match seen.iter().position(|s| !s) {
            Some(missing) => Err(format!("index {} missing", missing)),
            None => Ok(()),
        }
    }

    /// Whether a restored partition still fits a log with `len` columns
    pub fn fits(&self, len: usize) -> bool {
        self.len == len && self.check_invariants().is_ok()
    }
}

/// True when every entry is the same; splitting on such a mask moves nothing
pub fn is_uniform(mask: &[bool]) -> bool {
    mask.windows(2).all(|w| w[0] == w[1])
}
