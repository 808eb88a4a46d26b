// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Mock collaborators for host testing.
//!
//! Every mock records the calls it receives, so tests can assert not just on
//! outcomes but on the interaction contract - in particular that a failed
//! hand-off releases the freshly mapped region.

use crate::platform::traits::{CetHw, ShadowStackAlloc, UserMem};
use arx_abi::{AllocError, CetFeatures, TransferFault, Vaddr};

use std::collections::BTreeMap;
use std::vec::Vec;

// =============================================================================
// CPU
// =============================================================================

/// A call received by [`MockCetHw`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HwCall {
    /// `disarm_shstk` was invoked.
    DisarmShstk,
    /// `disarm_ibt` was invoked.
    DisarmIbt,
}

/// Mock CPU with configurable capabilities and a disarm log.
#[derive(Debug, Default)]
pub struct MockCetHw {
    shstk_supported: bool,
    ibt_supported: bool,
    calls: Vec<HwCall>,
}

impl MockCetHw {
    /// Creates a CPU supporting the given capabilities.
    #[must_use]
    pub const fn new(shstk_supported: bool, ibt_supported: bool) -> Self {
        Self {
            shstk_supported,
            ibt_supported,
            calls: Vec::new(),
        }
    }

    /// Creates a CPU supporting both features.
    #[must_use]
    pub const fn full() -> Self {
        Self::new(true, true)
    }

    /// Creates a CPU supporting neither feature.
    #[must_use]
    pub const fn bare() -> Self {
        Self::new(false, false)
    }

    /// Returns the disarm calls received so far, in order.
    #[must_use]
    pub fn calls(&self) -> &[HwCall] {
        &self.calls
    }
}

impl CetHw for MockCetHw {
    fn has_capability(&self, feature: CetFeatures) -> bool {
        if feature == CetFeatures::SHSTK {
            self.shstk_supported
        } else if feature == CetFeatures::IBT {
            self.ibt_supported
        } else {
            false
        }
    }

    fn disarm_shstk(&mut self) {
        self.calls.push(HwCall::DisarmShstk);
    }

    fn disarm_ibt(&mut self) {
        self.calls.push(HwCall::DisarmIbt);
    }
}

// =============================================================================
// Allocator
// =============================================================================

/// A call received by [`MockShadowStackAlloc`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AllocCall {
    /// `map_shadow_stack` was invoked with this size and hint.
    Map {
        /// Requested size in bytes.
        size: u64,
        /// Placement hint (null = none).
        hint: Vaddr,
    },
    /// `unmap_shadow_stack` was invoked for this region.
    Unmap {
        /// Region base.
        base: Vaddr,
        /// Region size in bytes.
        size: u64,
    },
}

/// Bump allocator over a fake address space, with failure injection.
#[derive(Debug)]
pub struct MockShadowStackAlloc {
    next_base: u64,
    fail_with: Option<AllocError>,
    calls: Vec<AllocCall>,
    live: Vec<(Vaddr, u64)>,
}

impl MockShadowStackAlloc {
    /// Base address of the first region handed out.
    pub const FIRST_BASE: u64 = 0x7f00_0000_0000;

    /// Creates an allocator with plenty of fake room.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next_base: Self::FIRST_BASE,
            fail_with: None,
            calls: Vec::new(),
            live: Vec::new(),
        }
    }

    /// Makes every subsequent `map_shadow_stack` fail with `err`.
    pub const fn fail_with(&mut self, err: AllocError) {
        self.fail_with = Some(err);
    }

    /// Returns the calls received so far, in order.
    #[must_use]
    pub fn calls(&self) -> &[AllocCall] {
        &self.calls
    }

    /// Returns the regions that are currently mapped (mapped and never
    /// unmapped).
    #[must_use]
    pub fn live_regions(&self) -> &[(Vaddr, u64)] {
        &self.live
    }

    const fn region_stride(size: u64) -> u64 {
        // Page-align and add a guard gap so consecutive regions never touch.
        ((size + 0xfff) & !0xfff) + 0x1000
    }
}

impl Default for MockShadowStackAlloc {
    fn default() -> Self {
        Self::new()
    }
}

impl ShadowStackAlloc for MockShadowStackAlloc {
    fn map_shadow_stack(&mut self, size: u64, hint: Vaddr) -> Result<Vaddr, AllocError> {
        self.calls.push(AllocCall::Map { size, hint });
        if let Some(err) = self.fail_with {
            return Err(err);
        }
        if size == 0 {
            return Err(AllocError::InvalidSize);
        }
        let base = Vaddr::new(self.next_base);
        self.next_base += Self::region_stride(size);
        self.live.push((base, size));
        Ok(base)
    }

    fn unmap_shadow_stack(&mut self, base: Vaddr, size: u64) {
        self.calls.push(AllocCall::Unmap { base, size });
        self.live.retain(|&(b, s)| !(b == base && s == size));
    }
}

// =============================================================================
// Caller memory
// =============================================================================

/// Word-addressed caller memory with independent read/write failure
/// switches.
#[derive(Debug, Default)]
pub struct MockUserMem {
    words: BTreeMap<u64, u64>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MockUserMem {
    /// Creates empty caller memory; unwritten words read as zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            words: BTreeMap::new(),
            fail_reads: false,
            fail_writes: false,
        }
    }

    /// Seeds a word, as the caller would before issuing an operation.
    pub fn seed_word(&mut self, at: Vaddr, value: u64) {
        self.words.insert(at.as_u64(), value);
    }

    /// Makes every subsequent read fault.
    pub const fn fail_reads(&mut self) {
        self.fail_reads = true;
    }

    /// Makes every subsequent write fault.
    pub const fn fail_writes(&mut self) {
        self.fail_writes = true;
    }

    /// Returns the word at `at`, zero if never written.
    #[must_use]
    pub fn word(&self, at: Vaddr) -> u64 {
        self.words.get(&at.as_u64()).copied().unwrap_or(0)
    }

    /// Returns `count` consecutive words starting at `at`.
    #[must_use]
    pub fn words(&self, at: Vaddr, count: usize) -> Vec<u64> {
        (0..count)
            .map(|i| self.word(at.add((i as u64) * 8)))
            .collect()
    }
}

impl UserMem for MockUserMem {
    fn read_word(&self, at: Vaddr) -> Result<u64, TransferFault> {
        if self.fail_reads {
            return Err(TransferFault);
        }
        Ok(self.word(at))
    }

    fn write_word(&mut self, at: Vaddr, value: u64) -> Result<(), TransferFault> {
        if self.fail_writes {
            return Err(TransferFault);
        }
        self.words.insert(at.as_u64(), value);
        Ok(())
    }
}
