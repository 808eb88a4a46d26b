// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Operation dispatch and the four operation handlers.
//!
//! The operation set is closed and security-sensitive, so dispatch is a
//! plain `match` on the parsed selector with an explicit `NotImplemented`
//! default - no dynamic dispatch anywhere on this path.
//!
//! Gate ordering, checked top to bottom:
//! 1. build-time switch for the whole feature class (`cet` cargo feature)
//! 2. CPU capability, for every selector except `Status` - unknown
//!    selectors included, so a CPU without CET never reports
//!    `NotImplemented` for them
//! 3. selector validity

mod lease;


pub use lease::RegionLease;

use crate::platform::{CetHw, ShadowStackAlloc, UserMem};
use crate::state::CetState;
use arx_abi::{CetError, CetFeatures, CetOp, CetStatus, Vaddr};

/// Whether the CET feature class was compiled in.
pub const BUILD_ENABLED: bool = cfg!(feature = "cet");

/// Services one CET operation on behalf of the owning thread.
///
/// `op` is the raw selector, `arg` its selector-specific argument (a feature
/// mask for `Disable`, a caller buffer address for `Status` and
/// `AllocShstk`, ignored for `Lock`).
///
/// # Errors
///
/// All failures surface as [`CetError`] result codes; allocator errors
/// pass through unchanged. No error is retried internally.
pub fn cet_call<H: CetHw, A: ShadowStackAlloc, U: UserMem>(
    hw: &mut H,
    alloc: &mut A,
    user: &mut U,
    state: &mut CetState,
    op: u64,
    arg: u64,
) -> Result<(), CetError> {
    dispatch(BUILD_ENABLED, hw, alloc, user, state, op, arg)
}

/// Dispatch with the build-time gate as an explicit parameter.
///
/// `cet_call` passes [`BUILD_ENABLED`]; tests pass `false` to exercise the
/// build-disabled behavior without a separate feature-off build.
pub(crate) fn dispatch<H: CetHw, A: ShadowStackAlloc, U: UserMem>(
    enabled: bool,
    hw: &mut H,
    alloc: &mut A,
    user: &mut U,
    state: &mut CetState,
    op: u64,
    arg: u64,
) -> Result<(), CetError> {
    // With the feature class compiled out, nothing is observable - not even
    // status.
    if !enabled {
        return Err(CetError::NotSupported);
    }

    // Status stays serviceable on CPUs that support neither feature; every
    // other selector - valid or not - requires at least one capability, so
    // the gate runs before the selector is even validated.
    let parsed = CetOp::from_u64(op);
    if !parsed.is_some_and(CetOp::bypasses_capability_gate)
        && !hw.has_capability(CetFeatures::SHSTK)
        && !hw.has_capability(CetFeatures::IBT)
    {
        return Err(CetError::NotSupported);
    }

    let Some(op) = parsed else {
        return Err(CetError::NotImplemented);
    };

    match op {
        CetOp::Status => copy_status(user, state, Vaddr::new(arg)),
        CetOp::Disable => disable(hw, state, arg),
        CetOp::Lock => {
            // Idempotent and unconditional.
            state.lock();
            log::debug!("CET features locked");
            Ok(())
        }
        CetOp::AllocShstk => alloc_shstk(alloc, user, state, Vaddr::new(arg)),
    }
}

/// Copies the 3-word status record into the caller's buffer.
fn copy_status<U: UserMem>(user: &mut U, state: &CetState, buf: Vaddr) -> Result<(), CetError> {
    let mut status = CetStatus::default();
    if state.has_shstk() {
        status.features |= CetFeatures::SHSTK;
        status.base = state.shstk_base();
        status.size = state.shstk_size();
    }
    if state.ibt_enabled() {
        status.features |= CetFeatures::IBT;
    }
    user.write_words(buf, &status.to_words())?;
    Ok(())
}

/// Disables the features named by the caller's mask.
///
/// The lock is checked before the mask is even parsed: a locked thread gets
/// `PermissionDenied` no matter what it asked for. The mask is then
/// validated in full before any feature is touched, so an invalid request
/// never half-applies.
fn disable<H: CetHw>(hw: &mut H, state: &mut CetState, raw_mask: u64) -> Result<(), CetError> {
    if state.is_locked() {
        return Err(CetError::PermissionDenied);
    }
    let Some(mask) = CetFeatures::from_mask(raw_mask) else {
        return Err(CetError::InvalidArgument);
    };

    // Disabling an already-disabled feature is a no-op; the disarm calls
    // are unconditional and the hardware treats them as such too.
    if mask.contains(CetFeatures::SHSTK) {
        hw.disarm_shstk();
        state.clear_shadow_stack();
    }
    if mask.contains(CetFeatures::IBT) {
        hw.disarm_ibt();
        state.set_ibt(false);
    }
    Ok(())
}

/// Allocates a shadow-stack region, reading the size from and writing the
/// base back to the caller-supplied word.
///
/// State is recorded only after both the allocation and the write-back
/// succeed, so any failure leaves `CetState` untouched; a write-back
/// failure additionally unmaps the fresh region (via the lease drop) before
/// `TransferFault` surfaces.
fn alloc_shstk<A: ShadowStackAlloc, U: UserMem>(
    alloc: &mut A,
    user: &mut U,
    state: &mut CetState,
    word: Vaddr,
) -> Result<(), CetError> {
    let size = user.read_word(word)?;
    let lease = RegionLease::map(alloc, size, Vaddr::null())?;
    user.write_word(word, lease.base().as_u64())?;
    let (base, size) = lease.commit();
    state.set_shadow_stack(base, size);
    Ok(())
}
