// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Stable wire contract for the Arx CET manager.
//!
//! This crate defines the contract between the CET manager and its callers:
//! - Operation selectors ([`CetOp`])
//! - The feature bitmask ([`CetFeatures`])
//! - The 3-word status record ([`CetStatus`])
//! - The error taxonomy with stable errno mapping ([`CetError`])
//!
//! Every value in here is observed by existing userspace and must never be
//! renumbered. Selector values and feature bit positions match the x86
//! `arch_prctl` CET interface; errno values match what glibc expects.
//!
//! # Design Principles
//!
//! - **No logic**: pure data types, 100% host-testable
//! - **Stable layout**: the status record is exactly 3 fixed-width words
//! - **64-bit only**: Arx targets 64-bit platforms exclusively

#![no_std]

pub mod error;
pub mod features;
pub mod op;
pub mod status;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{AllocError, CetError, TransferFault};
pub use features::CetFeatures;
pub use op::CetOp;
pub use status::CetStatus;
pub use types::Vaddr;
