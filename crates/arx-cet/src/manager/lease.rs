// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Scoped ownership of a freshly mapped shadow-stack region.
//!
//! Between "the allocator handed us a region" and "the caller can reference
//! it" the region belongs to nobody. A [`RegionLease`] owns it across that
//! window: dropping the lease unmaps the region, `commit` keeps it. Every
//! exit path that does not hand the address to the caller therefore releases
//! the mapping without any handler having to remember to.

use crate::platform::ShadowStackAlloc;
use arx_abi::{AllocError, Vaddr};

/// A mapped region that is released on drop unless committed.
pub struct RegionLease<'a, A: ShadowStackAlloc> {
    alloc: &'a mut A,
    base: Vaddr,
    size: u64,
    committed: bool,
}

impl<'a, A: ShadowStackAlloc> RegionLease<'a, A> {
    /// Maps `size` bytes and takes ownership of the result.
    ///
    /// # Errors
    ///
    /// Passes the allocator's error through unchanged.
    pub fn map(alloc: &'a mut A, size: u64, hint: Vaddr) -> Result<Self, AllocError> {
        let base = alloc.map_shadow_stack(size, hint)?;
        Ok(Self {
            alloc,
            base,
            size,
            committed: false,
        })
    }

    /// Returns the base address of the leased region.
    #[inline]
    #[must_use]
    pub const fn base(&self) -> Vaddr {
        self.base
    }

    /// Hands the region over for good; it will not be unmapped on drop.
    ///
    /// Called only after the base has reached the caller.
    #[must_use]
    pub fn commit(mut self) -> (Vaddr, u64) {
        self.committed = true;
        (self.base, self.size)
    }
}

impl<A: ShadowStackAlloc> Drop for RegionLease<'_, A> {
    fn drop(&mut self) {
        if !self.committed {
            log::warn!(
                "shadow-stack hand-off failed, unmapping {} bytes at {}",
                self.size,
                self.base
            );
            self.alloc.unmap_shadow_stack(self.base, self.size);
        }
    }
}
