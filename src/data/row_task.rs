//! A row a rank is responsible for, and the cache of values borrowed from
//! the row above it.

use crate::debug_invariants::DebugInvariants;
use crate::stencil_error::StencilError;

/// Write-once cache of the row above, one entry per column.
///
/// An entry is `Some(value)` once received. A received value is never
/// replaced, so every later read of that column is served locally and the
/// coordinate is never received twice.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DependencyCache {
    entries: Vec<Option<i32>>,
    received: usize,
}

impl DependencyCache {
    /// All `cols` entries unreceived.
    pub fn new(cols: usize) -> Self {
        Self {
            entries: vec![None; cols],
            received: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn get(&self, col: usize) -> Option<i32> {
        self.entries.get(col).copied().flatten()
    }

    pub fn is_received(&self, col: usize) -> bool {
        self.get(col).is_some()
    }

    /// Record a value that arrived from the predecessor. Returns the cached
    /// value, which is the first one stored for `col`.
    pub fn store(&mut self, col: usize, value: i32) -> i32 {
        match self.entries[col] {
            Some(existing) => {
                log::warn!("column {col} of the row above arrived twice; keeping {existing}");
                existing
            }
            None => {
                self.entries[col] = Some(value);
                self.received += 1;
                value
            }
        }
    }

    /// Fill every entry from a locally resident finished row; no receives
    /// are counted.
    pub fn prime(&mut self, row: &[i32]) {
        for (slot, &v) in self.entries.iter_mut().zip(row) {
            slot.get_or_insert(v);
        }
    }

    /// Number of entries filled by [`store`](Self::store).
    pub fn receives(&self) -> usize {
        self.received
    }

    pub fn is_complete(&self) -> bool {
        self.entries.iter().all(Option::is_some)
    }
}

/// One assigned row: its current values (updated in place as columns are
/// resolved), the pristine row below, and the dependency cache for the row above.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowTask {
    pub index: usize,
    pub current: Vec<i32>,
    /// `None` for the grid's last row.
    pub next: Option<Vec<i32>>,
    pub above: DependencyCache,
}

impl RowTask {
    pub fn new(index: usize, current: Vec<i32>, next: Option<Vec<i32>>) -> Self {
        let above = DependencyCache::new(current.len());
        Self {
            index,
            current,
            next,
            above,
        }
    }

    pub fn cols(&self) -> usize {
        self.current.len()
    }

    /// True for grid row 0, which has nothing above it.
    pub fn is_top(&self) -> bool {
        self.index == 0
    }
}

impl DebugInvariants for RowTask {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "RowTask");
    }

    fn validate_invariants(&self) -> Result<(), StencilError> {
        let cols = self.current.len();
        if let Some(next) = &self.next {
            if next.len() != cols {
                return Err(StencilError::RaggedGrid {
                    row: self.index + 1,
                    expected: cols,
                    got: next.len(),
                });
            }
        }
        if self.above.len() != cols {
            return Err(StencilError::RaggedGrid {
                row: self.index.saturating_sub(1),
                expected: cols,
                got: self.above.len(),
            });
        }
        Ok(())
    }
}
