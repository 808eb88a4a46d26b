// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Tests for per-thread CET state.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;

#[test]
fn fresh_state_is_all_zero() {
    let state = CetState::new();
    assert!(!state.has_shstk());
    assert!(state.shstk_base().is_null());
    assert_eq!(state.shstk_size(), 0);
    assert!(!state.ibt_enabled());
    assert!(!state.is_locked());
    assert_eq!(state, CetState::default());
}

#[test]
fn shadow_stack_round_trip() {
    let mut state = CetState::new();
    state.set_shadow_stack(Vaddr::new(0x7f00_0000_0000), 0x4000);

    assert!(state.has_shstk());
    assert_eq!(state.shstk_base().as_u64(), 0x7f00_0000_0000);
    assert_eq!(state.shstk_size(), 0x4000);

    state.clear_shadow_stack();
    assert!(!state.has_shstk());
    assert!(state.shstk_base().is_null());
    assert_eq!(state.shstk_size(), 0);
}

#[test]
fn size_and_base_stay_in_agreement() {
    // The invariant the status record relies on: size > 0 iff base non-null.
    let mut state = CetState::new();
    assert_eq!(state.shstk_size() > 0, !state.shstk_base().is_null());

    state.set_shadow_stack(Vaddr::new(0x1000), 4096);
    assert_eq!(state.shstk_size() > 0, !state.shstk_base().is_null());

    state.clear_shadow_stack();
    assert_eq!(state.shstk_size() > 0, !state.shstk_base().is_null());
}

#[test]
fn ibt_toggle() {
    let mut state = CetState::new();
    state.set_ibt(true);
    assert!(state.ibt_enabled());
    state.set_ibt(false);
    assert!(!state.ibt_enabled());
}

#[test]
fn lock_is_idempotent() {
    let mut state = CetState::new();
    state.lock();
    assert!(state.is_locked());
    state.lock();
    assert!(state.is_locked());
}

#[test]
fn locking_does_not_disturb_features() {
    let mut state = CetState::new();
    state.set_shadow_stack(Vaddr::new(0x2000), 8192);
    state.set_ibt(true);

    state.lock();

    assert!(state.has_shstk());
    assert!(state.ibt_enabled());
}
