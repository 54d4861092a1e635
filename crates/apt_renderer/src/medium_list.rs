//! Priority-ordered stack of the media a ray is travelling through.

use crate::Medium;

/// Maximum number of media a ray can be inside at once.
pub const MAX_MEDIUMS: usize = 16;

/// Fixed-capacity list of medium indices, highest priority first.
///
/// Index 0 is the current medium. Adding to a full list drops the
/// lowest-priority entry, which may be the medium being added.
#[derive(Debug, Clone, Copy)]
pub struct MediumList {
    mediums: [usize; MAX_MEDIUMS],
    n_mediums: usize,
}

impl MediumList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self {
            mediums: [0; MAX_MEDIUMS],
            n_mediums: 0,
        }
    }

    /// Create a list holding `indices` in the given order.
    ///
    /// The caller is responsible for the order. Indices past
    /// [`MAX_MEDIUMS`] are dropped.
    pub fn from_indices(indices: &[usize]) -> Self {
        if indices.len() > MAX_MEDIUMS {
            log::warn!(
                "Medium list truncated from {} to {} entries",
                indices.len(),
                MAX_MEDIUMS
            );
        }

        let mut list = Self::new();
        for &index in indices.iter().take(MAX_MEDIUMS) {
            list.mediums[list.n_mediums] = index;
            list.n_mediums += 1;
        }
        list
    }

    pub fn len(&self) -> usize {
        self.n_mediums
    }

    pub fn is_empty(&self) -> bool {
        self.n_mediums == 0
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.mediums[..self.n_mediums]
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.as_slice().iter().copied()
    }

    /// Index of the current (highest priority) medium.
    ///
    /// # Panics
    ///
    /// Panics if the list is empty.
    #[inline]
    pub fn current(&self) -> usize {
        self.as_slice()[0]
    }

    /// Insert `medium` ahead of every entry whose priority is lower or equal.
    pub fn add<D: Medium>(&mut self, media: &[D], medium: usize) {
        let priority = media[medium].priority();
        let position = self
            .iter()
            .position(|m| media[m].priority() <= priority)
            .unwrap_or(self.n_mediums);

        if position >= MAX_MEDIUMS {
            log::trace!("Medium list full, dropping medium {}", medium);
            return;
        }

        let end = self.n_mediums.min(MAX_MEDIUMS - 1);
        self.mediums.copy_within(position..end, position + 1);
        self.mediums[position] = medium;
        self.n_mediums = (self.n_mediums + 1).min(MAX_MEDIUMS);
    }

    /// Remove the first occurrence of `medium`, if any.
    pub fn remove(&mut self, medium: usize) {
        let found = self.as_slice().iter().position(|&m| m == medium);
        if let Some(position) = found {
            self.mediums.copy_within(position + 1..self.n_mediums, position);
            self.n_mediums -= 1;
        }
    }
}

// Slots past `n_mediums` hold stale values and are not compared.
impl PartialEq for MediumList {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for MediumList {}

impl Default for MediumList {
    fn default() -> Self {
        Self::new()
    }
}
