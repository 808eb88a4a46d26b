// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! # Arx CET manager
//!
//! Per-thread manager for two hardware-backed control-flow-integrity
//! features: the shadow call stack (SHSTK) and indirect branch tracking
//! (IBT).
//!
//! This crate provides:
//! - [`CetState`]: the per-thread feature state, owned by the thread
//! - [`manager::cet_call`]: the selector-dispatched entry point
//! - [`platform`]: trait seams for the CPU, the guarded-region allocator,
//!   and the caller-memory boundary, with host mocks
//!
//! The crate is a security boundary, not an enforcement mechanism: it gates
//! *whether and when* the CPU enforces the protections, and it owns the
//! hand-off of the shadow-stack region to the caller. The two invariants
//! everything else hangs off:
//!
//! - once a thread locks its features, no operation disables them again
//! - a failed hand-off never leaves an unreferenced region mapped
//!
//! State is single-owner. Only the owning thread reaches its own `CetState`
//! through this interface, so there is no locking primitive anywhere; the
//! `locked` flag is a one-way policy gate, not a concurrency lock.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod manager;
pub mod platform;
pub mod state;

// Re-export commonly used types at crate root
pub use arx_abi::{AllocError, CetError, CetFeatures, CetOp, CetStatus, TransferFault, Vaddr};
pub use manager::cet_call;
pub use state::CetState;
