// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Error taxonomy for the CET manager.
//!
//! Every failure is a local, reportable outcome; nothing here is fatal.
//! Callers see errors as errno-style result codes, so each variant carries a
//! stable [`CetError::errno`] mapping.

use core::fmt;

/// Result code of a CET manager operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CetError {
    /// The feature class is build-disabled, or the CPU supports neither
    /// shadow stacks nor indirect branch tracking.
    NotSupported,
    /// A disable was attempted after the thread locked its features.
    PermissionDenied,
    /// The feature mask carried reserved bits.
    InvalidArgument,
    /// A copy to or from caller memory failed.
    TransferFault,
    /// Unknown operation selector.
    NotImplemented,
    /// The allocator could not find room for the shadow stack.
    OutOfMemory,
    /// The requested shadow-stack size was rejected by the allocator.
    InvalidSize,
}

impl CetError {
    /// Returns the errno value reported to callers.
    ///
    /// `NotSupported` maps to `EOPNOTSUPP` (95) rather than the
    /// kernel-internal `ENOTSUPP` (524), because glibc only recognizes the
    /// former.
    #[must_use]
    pub const fn errno(self) -> i32 {
        match self {
            Self::NotSupported => 95,
            Self::PermissionDenied => 1,
            Self::InvalidArgument | Self::InvalidSize => 22,
            Self::TransferFault => 14,
            Self::NotImplemented => 38,
            Self::OutOfMemory => 12,
        }
    }
}

impl fmt::Display for CetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::NotSupported => "CET not supported",
            Self::PermissionDenied => "CET features locked",
            Self::InvalidArgument => "reserved bits in feature mask",
            Self::TransferFault => "caller memory transfer failed",
            Self::NotImplemented => "unknown CET operation",
            Self::OutOfMemory => "out of memory for shadow stack",
            Self::InvalidSize => "invalid shadow-stack size",
        };
        f.write_str(text)
    }
}

/// Error reported by the guarded-region allocator.
///
/// These pass through the manager unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// No room for a region of the requested size.
    OutOfMemory,
    /// The requested size is zero or otherwise unmappable.
    InvalidSize,
}

impl From<AllocError> for CetError {
    fn from(err: AllocError) -> Self {
        match err {
            AllocError::OutOfMemory => Self::OutOfMemory,
            AllocError::InvalidSize => Self::InvalidSize,
        }
    }
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory => f.write_str("out of memory"),
            Self::InvalidSize => f.write_str("invalid size"),
        }
    }
}

/// A failed copy across the caller-memory boundary.
///
/// Reads of the requested size and writes of the status record or the
/// allocated base can each fault independently of the logical operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransferFault;

impl From<TransferFault> for CetError {
    fn from(_: TransferFault) -> Self {
        Self::TransferFault
    }
}

impl fmt::Display for TransferFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("transfer fault")
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn errno_values_are_pinned() {
        // External contract - existing callers match on these.
        assert_eq!(CetError::NotSupported.errno(), 95);
        assert_eq!(CetError::PermissionDenied.errno(), 1);
        assert_eq!(CetError::InvalidArgument.errno(), 22);
        assert_eq!(CetError::TransferFault.errno(), 14);
        assert_eq!(CetError::NotImplemented.errno(), 38);
        assert_eq!(CetError::OutOfMemory.errno(), 12);
        assert_eq!(CetError::InvalidSize.errno(), 22);
    }

    #[test]
    fn alloc_errors_pass_through_unchanged() {
        assert_eq!(CetError::from(AllocError::OutOfMemory), CetError::OutOfMemory);
        assert_eq!(CetError::from(AllocError::InvalidSize), CetError::InvalidSize);
    }

    #[test]
    fn transfer_fault_converts() {
        assert_eq!(CetError::from(TransferFault), CetError::TransferFault);
    }
}
