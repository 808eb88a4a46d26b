// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Operation selectors.

use core::fmt;

/// Selector for a CET manager operation.
///
/// Values live in the `0x3000` range of the x86 `arch_prctl` selector space
/// and are a stable external contract.
#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(u64)]
pub enum CetOp {
    /// Copy the 3-word status record to a caller buffer.
    Status = 0x3001,
    /// Disable the features named by a caller-supplied mask.
    Disable = 0x3002,
    /// Permanently forbid disabling features on this thread.
    Lock = 0x3003,
    /// Allocate a shadow-stack region, size in / base out.
    AllocShstk = 0x3004,
}

impl CetOp {
    /// Tries to convert from a raw selector value.
    ///
    /// Returns `None` for unknown selectors; the dispatcher maps that to
    /// `NotImplemented`.
    #[must_use]
    pub const fn from_u64(value: u64) -> Option<Self> {
        match value {
            0x3001 => Some(Self::Status),
            0x3002 => Some(Self::Disable),
            0x3003 => Some(Self::Lock),
            0x3004 => Some(Self::AllocShstk),
            _ => None,
        }
    }

    /// Returns the raw selector value.
    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self as u64
    }

    /// Returns true if this selector is served without the CPU capability
    /// gate.
    ///
    /// Status must stay observable on processors that support neither
    /// feature; every other operation requires at least one capability.
    #[inline]
    #[must_use]
    pub const fn bypasses_capability_gate(self) -> bool {
        matches!(self, Self::Status)
    }
}

impl fmt::Debug for CetOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status => write!(f, "Status"),
            Self::Disable => write!(f, "Disable"),
            Self::Lock => write!(f, "Lock"),
            Self::AllocShstk => write!(f, "AllocShstk"),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn selector_values_are_pinned() {
        // External contract - must never be renumbered.
        assert_eq!(CetOp::Status.as_u64(), 0x3001);
        assert_eq!(CetOp::Disable.as_u64(), 0x3002);
        assert_eq!(CetOp::Lock.as_u64(), 0x3003);
        assert_eq!(CetOp::AllocShstk.as_u64(), 0x3004);
    }

    #[test]
    fn from_u64_round_trips() {
        for op in [
            CetOp::Status,
            CetOp::Disable,
            CetOp::Lock,
            CetOp::AllocShstk,
        ] {
            assert_eq!(CetOp::from_u64(op.as_u64()), Some(op));
        }
    }

    #[test]
    fn from_u64_rejects_unknown() {
        assert_eq!(CetOp::from_u64(0), None);
        assert_eq!(CetOp::from_u64(0x3000), None);
        assert_eq!(CetOp::from_u64(0x3005), None);
        assert_eq!(CetOp::from_u64(u64::MAX), None);
    }

    #[test]
    fn only_status_bypasses_the_gate() {
        assert!(CetOp::Status.bypasses_capability_gate());
        assert!(!CetOp::Disable.bypasses_capability_gate());
        assert!(!CetOp::Lock.bypasses_capability_gate());
        assert!(!CetOp::AllocShstk.bypasses_capability_gate());
    }
}
