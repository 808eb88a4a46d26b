// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! CET feature bitmask.
//!
//! Bit positions follow the `GNU_PROPERTY_X86_FEATURE_1` encoding that ELF
//! toolchains and userspace runtimes already use, so the same constants flow
//! unchanged from program headers through the manager interface.

use bitflags::bitflags;

bitflags! {
    /// The set of CET features known to the manager.
    ///
    /// Bits outside this set are reserved. A mask carrying a reserved bit is
    /// rejected with `InvalidArgument` before any state is touched.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    pub struct CetFeatures: u64 {
        /// Indirect branch tracking.
        const IBT = 1 << 0;
        /// Shadow call stack.
        const SHSTK = 1 << 1;
    }
}

impl CetFeatures {
    /// Parses a caller-supplied mask, rejecting reserved bits.
    ///
    /// This is a thin wrapper over [`bitflags`]' `from_bits`, named for what
    /// it does at the interface: validate an untrusted word.
    #[inline]
    #[must_use]
    pub const fn from_mask(raw: u64) -> Option<Self> {
        Self::from_bits(raw)
    }
}
