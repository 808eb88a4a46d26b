// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Platform abstraction for the CET manager.
//!
//! This module provides abstractions over the three collaborators the
//! manager talks to - the CPU, the guarded-region allocator, and the
//! caller-memory boundary - allowing the manager to be tested on the host.


// Mocks require heap-backed logs, only available with std or test
#[cfg(any(test, feature = "std"))]
mod mock;
mod traits;

#[cfg(all(feature = "hw", target_arch = "x86_64"))]
mod hw;

#[cfg(any(test, feature = "std"))]
pub use mock::{AllocCall, HwCall, MockCetHw, MockShadowStackAlloc, MockUserMem};
pub use traits::{CetHw, ShadowStackAlloc, UserMem};

#[cfg(all(feature = "hw", target_arch = "x86_64"))]
pub use hw::X86Cet;
