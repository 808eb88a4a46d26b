// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! End-to-end CET manager flows.
//!
//! These tests drive the public entry point the way an embedding kernel
//! would: raw selector words in, errno-mapped results out, collaborator
//! mocks underneath.

// Test code prioritizes clarity over defensive programming
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, missing_docs)]

use arx_cet::platform::{MockCetHw, MockShadowStackAlloc, MockUserMem};
use arx_cet::{CetError, CetFeatures, CetOp, CetState, CetStatus, Vaddr, cet_call};

const STATUS_BUF: Vaddr = Vaddr::new(0x1_0000);
const ALLOC_WORD: Vaddr = Vaddr::new(0x2_0000);

struct Thread {
    hw: MockCetHw,
    alloc: MockShadowStackAlloc,
    user: MockUserMem,
    state: CetState,
}

impl Thread {
    fn spawn() -> Self {
        Self {
            hw: MockCetHw::full(),
            alloc: MockShadowStackAlloc::new(),
            user: MockUserMem::new(),
            state: CetState::new(),
        }
    }

    fn call(&mut self, op: u64, arg: u64) -> Result<(), CetError> {
        cet_call(
            &mut self.hw,
            &mut self.alloc,
            &mut self.user,
            &mut self.state,
            op,
            arg,
        )
    }

    fn status(&mut self) -> CetStatus {
        self.call(CetOp::Status.as_u64(), STATUS_BUF.as_u64())
            .unwrap();
        let words = self.user.words(STATUS_BUF, 3);
        CetStatus::from_words([words[0], words[1], words[2]]).unwrap()
    }
}

// ============================================================================
// Allocate, then observe
// ============================================================================

#[test]
fn allocate_then_status_reports_the_region() {
    let mut t = Thread::spawn();
    assert_eq!(t.status(), CetStatus::default());

    t.user.seed_word(ALLOC_WORD, 4096);
    t.call(CetOp::AllocShstk.as_u64(), ALLOC_WORD.as_u64())
        .unwrap();

    let base = t.user.word(ALLOC_WORD);
    assert_ne!(base, 0);

    let status = t.status();
    assert!(status.features.contains(CetFeatures::SHSTK));
    assert_eq!(status.base.as_u64(), base);
    assert_eq!(status.size, 4096);
}

// ============================================================================
// Lock, then try to disable
// ============================================================================

#[test]
fn locked_thread_cannot_drop_its_shadow_stack() {
    let mut t = Thread::spawn();
    t.user.seed_word(ALLOC_WORD, 4096);
    t.call(CetOp::AllocShstk.as_u64(), ALLOC_WORD.as_u64())
        .unwrap();

    t.call(CetOp::Lock.as_u64(), 0).unwrap();

    assert_eq!(
        t.call(CetOp::Disable.as_u64(), CetFeatures::SHSTK.bits()),
        Err(CetError::PermissionDenied)
    );
    assert!(t.status().features.contains(CetFeatures::SHSTK));
}

// ============================================================================
// Disable on a fresh thread
// ============================================================================

#[test]
fn disabling_never_enabled_features_is_a_no_op() {
    let mut t = Thread::spawn();
    let both = CetFeatures::SHSTK | CetFeatures::IBT;
    t.call(CetOp::Disable.as_u64(), both.bits()).unwrap();
    assert_eq!(t.status().features, CetFeatures::empty());
}

// ============================================================================
// Rollback
// ============================================================================

#[test]
fn failed_hand_off_releases_the_region() {
    let mut t = Thread::spawn();
    t.user.seed_word(ALLOC_WORD, 4096);
    t.user.fail_writes();

    assert_eq!(
        t.call(CetOp::AllocShstk.as_u64(), ALLOC_WORD.as_u64()),
        Err(CetError::TransferFault)
    );
    assert!(t.alloc.live_regions().is_empty());
    assert_eq!(t.state, CetState::new());
}

// ============================================================================
// Errno surface
// ============================================================================

#[test]
fn results_map_to_the_stable_errno_contract() {
    let mut t = Thread::spawn();

    let unknown = t.call(0x3fff, 0).unwrap_err();
    assert_eq!(unknown.errno(), 38);

    let invalid = t
        .call(CetOp::Disable.as_u64(), 0x8000)
        .unwrap_err();
    assert_eq!(invalid.errno(), 22);

    t.call(CetOp::Lock.as_u64(), 0).unwrap();
    let denied = t
        .call(CetOp::Disable.as_u64(), CetFeatures::IBT.bits())
        .unwrap_err();
    assert_eq!(denied.errno(), 1);

    let mut bare = Thread::spawn();
    bare.hw = MockCetHw::bare();
    let unsupported = bare.call(CetOp::Lock.as_u64(), 0).unwrap_err();
    assert_eq!(unsupported.errno(), 95);
}

#[test]
fn unknown_selector_on_bare_cpu_reports_not_supported() {
    // Without either CPU feature the capability gate answers first, so
    // the caller sees errno 95 rather than 38 for a selector the manager
    // does not know.
    let mut t = Thread::spawn();
    t.hw = MockCetHw::bare();

    let err = t.call(0x3fff, 0).unwrap_err();
    assert_eq!(err, CetError::NotSupported);
    assert_eq!(err.errno(), 95);
}
