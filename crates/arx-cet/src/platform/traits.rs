// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Collaborator traits.
//!
//! One trait per collaborator class, each independently mockable:
//!
//! - [`CetHw`]: CPU capability probing and enforcement disarming
//! - [`ShadowStackAlloc`]: the guarded-region allocator
//! - [`UserMem`]: the fixed-size transfer boundary to caller memory

use arx_abi::{AllocError, CetFeatures, TransferFault, Vaddr};

/// CPU-level CET control.
///
/// Only the disarm direction appears here: this manager never arms
/// enforcement, it only gates and tears it down. Arming belongs to the
/// enable path of the embedding system.
pub trait CetHw {
    /// Reports whether the running processor supports a feature.
    fn has_capability(&self, feature: CetFeatures) -> bool;

    /// Drops shadow-stack enforcement for the current thread.
    ///
    /// Must be a no-op when enforcement is not active.
    fn disarm_shstk(&mut self);

    /// Drops indirect-branch-tracking enforcement for the current thread.
    ///
    /// Must be a no-op when enforcement is not active.
    fn disarm_ibt(&mut self);
}

/// Allocator for guarded shadow-stack regions.
pub trait ShadowStackAlloc {
    /// Reserves a guarded region of `size` bytes.
    ///
    /// A null `hint` means no placement preference. Returns the stable base
    /// address of the region.
    ///
    /// # Errors
    ///
    /// Returns an [`AllocError`] if the size is unmappable or no room is
    /// left; the manager passes these through to the caller unchanged.
    fn map_shadow_stack(&mut self, size: u64, hint: Vaddr) -> Result<Vaddr, AllocError>;

    /// Releases a previously mapped region.
    ///
    /// Used only to roll back an allocation whose hand-off to the caller
    /// failed.
    fn unmap_shadow_stack(&mut self, base: Vaddr, size: u64);
}

/// Word-sized transfers to and from caller memory.
///
/// Each transfer can fault independently of the logical operation outcome,
/// and a fault must leave manager state unchanged or be compensated.
pub trait UserMem {
    /// Reads one word from caller memory.
    ///
    /// # Errors
    ///
    /// Returns [`TransferFault`] if the caller's location is not readable.
    fn read_word(&self, at: Vaddr) -> Result<u64, TransferFault>;

    /// Writes one word to caller memory.
    ///
    /// # Errors
    ///
    /// Returns [`TransferFault`] if the caller's location is not writable.
    fn write_word(&mut self, at: Vaddr, value: u64) -> Result<(), TransferFault>;

    /// Writes consecutive words to caller memory.
    ///
    /// # Errors
    ///
    /// Returns [`TransferFault`] on the first location that is not writable.
    fn write_words(&mut self, at: Vaddr, words: &[u64]) -> Result<(), TransferFault> {
        for (i, word) in words.iter().enumerate() {
            self.write_word(at.add((i as u64) * 8), *word)?;
        }
        Ok(())
    }
}
