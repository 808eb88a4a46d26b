// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Real x86_64 backend.
//!
//! Capability probing via CPUID leaf 7 and enforcement disarming via the
//! `IA32_U_CET` MSR. This module assumes the thread's CET state is live in
//! the MSRs when it runs (no XSAVES area management here) and that the
//! caller executes at a privilege level that may write them.

use crate::platform::traits::CetHw;
use arx_abi::CetFeatures;
use raw_cpuid::cpuid;
use x86::msr::{rdmsr, wrmsr};

/// User-mode CET configuration MSR.
const IA32_U_CET: u32 = 0x6a0;
/// User-mode shadow-stack pointer MSR.
const IA32_PL3_SSP: u32 = 0x6a7;

/// `CPUID.07H.0H:ECX[7]`: shadow-stack support.
const CPUID_ECX_CET_SS: u32 = 1 << 7;
/// `CPUID.07H.0H:EDX[20]`: indirect-branch-tracking support.
const CPUID_EDX_CET_IBT: u32 = 1 << 20;

/// `IA32_U_CET.SH_STK_EN`: shadow-stack enforcement enable.
const U_CET_SHSTK_EN: u64 = 1 << 0;
/// `IA32_U_CET.WR_SHSTK_EN`: `WRSS` instruction enable, tied to SHSTK.
const U_CET_WRSS_EN: u64 = 1 << 1;
/// `IA32_U_CET.ENDBR_EN`: indirect-branch-tracking enforcement enable.
const U_CET_ENDBR_EN: u64 = 1 << 2;

/// CET control over the running x86_64 processor.
#[derive(Clone, Copy, Debug, Default)]
pub struct X86Cet;

impl X86Cet {
    /// Creates the hardware backend.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn clear_u_cet_bits(bits: u64) {
        // SAFETY: IA32_U_CET is architecturally defined on any CPU that
        // reports a CET capability, and read-modify-write of the enable
        // bits has no effect beyond the enforcement this manager owns.
        unsafe {
            let value = rdmsr(IA32_U_CET);
            wrmsr(IA32_U_CET, value & !bits);
        }
    }
}

impl CetHw for X86Cet {
    fn has_capability(&self, feature: CetFeatures) -> bool {
        let leaf = cpuid!(0x7, 0x0);
        if feature == CetFeatures::SHSTK {
            leaf.ecx & CPUID_ECX_CET_SS != 0
        } else if feature == CetFeatures::IBT {
            leaf.edx & CPUID_EDX_CET_IBT != 0
        } else {
            false
        }
    }

    fn disarm_shstk(&mut self) {
        if !self.has_capability(CetFeatures::SHSTK) {
            return;
        }
        Self::clear_u_cet_bits(U_CET_SHSTK_EN | U_CET_WRSS_EN);
        // SAFETY: same architectural contract as IA32_U_CET; a null SSP is
        // the documented disabled value.
        unsafe {
            wrmsr(IA32_PL3_SSP, 0);
        }
    }

    fn disarm_ibt(&mut self) {
        if !self.has_capability(CetFeatures::IBT) {
            return;
        }
        Self::clear_u_cet_bits(U_CET_ENDBR_EN);
    }
}
