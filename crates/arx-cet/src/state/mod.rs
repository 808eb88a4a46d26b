// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Per-thread CET state.
//!
//! A `CetState` belongs to exactly one thread. It is created zero-initialized
//! when the thread is created and mutated only by manager operations issued
//! on behalf of that thread. Releasing a still-owned shadow-stack region at
//! thread teardown is the teardown path's job, not this module's.

use arx_abi::Vaddr;

/// CET feature state for a single thread.
///
/// Invariants:
/// - `shstk_size > 0` iff `shstk_base` is non-null
/// - `locked` only ever transitions false to true
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CetState {
    shstk_base: Vaddr,
    shstk_size: u64,
    ibt_enabled: bool,
    locked: bool,
}

impl CetState {
    /// Creates the zero-initialized state of a fresh thread.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            shstk_base: Vaddr::null(),
            shstk_size: 0,
            ibt_enabled: false,
            locked: false,
        }
    }

    /// Returns true if a shadow-stack region is currently recorded.
    #[inline]
    #[must_use]
    pub const fn has_shstk(&self) -> bool {
        self.shstk_size > 0
    }

    /// Returns the shadow-stack base, null if none is recorded.
    #[inline]
    #[must_use]
    pub const fn shstk_base(&self) -> Vaddr {
        self.shstk_base
    }

    /// Returns the shadow-stack size in bytes, zero if none is recorded.
    #[inline]
    #[must_use]
    pub const fn shstk_size(&self) -> u64 {
        self.shstk_size
    }

    /// Returns true if indirect branch tracking is requested.
    #[inline]
    #[must_use]
    pub const fn ibt_enabled(&self) -> bool {
        self.ibt_enabled
    }

    /// Returns true if the thread has locked its features.
    #[inline]
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.locked
    }

    /// Records a freshly allocated shadow-stack region.
    ///
    /// Called only after both the allocation and the hand-off to the caller
    /// have succeeded.
    pub fn set_shadow_stack(&mut self, base: Vaddr, size: u64) {
        debug_assert!(!base.is_null(), "shadow-stack base must be non-null");
        debug_assert!(size > 0, "shadow-stack size must be non-zero");
        self.shstk_base = base;
        self.shstk_size = size;
    }

    /// Clears the recorded shadow-stack region.
    pub const fn clear_shadow_stack(&mut self) {
        self.shstk_base = Vaddr::null();
        self.shstk_size = 0;
    }

    /// Sets or clears the indirect-branch-tracking request.
    pub const fn set_ibt(&mut self, enabled: bool) {
        self.ibt_enabled = enabled;
    }

    /// Locks the thread's features.
    ///
    /// Monotonic: nothing in this crate ever clears the flag again.
    pub const fn lock(&mut self) {
        self.locked = true;
    }
}

#[cfg(test)]
mod state_test;
