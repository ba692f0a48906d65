// osfab - os/mem.rs
//
// Raw memory blocks addressed by byte count.
//
// Allocation failure is a `None`/`false` result, never an abort: the heap
// is asked with `try_reserve_exact`, which reports refusal instead of
// invoking the global allocation-failure handler.

use crate::util::constants::MAX_ALLOC;
use crate::util::error::{OsLayerError, Result};
use std::ops::{Deref, DerefMut};

/// A block of raw bytes owned by the caller. Freeing consumes the block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MemBlock {
    data: Vec<u8>,
}

impl MemBlock {
    /// Allocate `size` zero-filled bytes.
    ///
    /// Returns `None` when `size` exceeds `MAX_ALLOC` or the heap refuses.
    pub fn alloc(size: usize) -> Option<Self> {
        match Self::try_alloc(size) {
            Ok(block) => Some(block),
            Err(e) => {
                tracing::debug!(size, error = %e, "Allocation failed");
                None
            }
        }
    }

    /// Like `alloc`, reporting the failure as an error.
    pub fn try_alloc(size: usize) -> Result<Self> {
        let mut data = Vec::new();
        reserve(&mut data, size)?;
        data.resize(size, 0);
        Ok(Self { data })
    }

    /// Change the block's size to `new_size` bytes.
    ///
    /// The first `min(old, new)` bytes are preserved and any growth is
    /// zero-filled. Shrinking always succeeds. If growing fails the block
    /// is left exactly as it was and `false` is returned.
    pub fn resize(&mut self, new_size: usize) -> bool {
        let old_size = self.data.len();
        if new_size <= old_size {
            self.data.truncate(new_size);
            self.data.shrink_to_fit();
            return true;
        }
        if let Err(e) = reserve(&mut self.data, new_size) {
            tracing::debug!(old_size, new_size, error = %e, "Resize failed; block unchanged");
            return false;
        }
        self.data.resize(new_size, 0);
        true
    }

    /// Release the block.
    pub fn free(self) {
        drop(self);
    }

    /// Size of the block in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Give up the block as a vector.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}

/// Ensure `data` can hold `total` bytes without reallocating again.
fn reserve(data: &mut Vec<u8>, total: usize) -> Result<()> {
    if total > MAX_ALLOC {
        return Err(OsLayerError::AllocationFailure { requested: total });
    }
    let additional = total.saturating_sub(data.len());
    data.try_reserve_exact(additional)
        .map_err(|_| OsLayerError::AllocationFailure { requested: total })
}

impl Deref for MemBlock {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl DerefMut for MemBlock {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl From<Vec<u8>> for MemBlock {
    fn from(data: Vec<u8>) -> Self {
        Self { data }
    }
}
