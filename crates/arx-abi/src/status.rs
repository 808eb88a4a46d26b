// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! The status record copied to callers.
//!
//! # Wire Layout
//!
//! The record is exactly three fixed-width words:
//!
//! | Word | Content |
//! |------|---------|
//! | 0 | [`CetFeatures`] bits |
//! | 1 | shadow-stack base (0 when SHSTK clear) |
//! | 2 | shadow-stack size in bytes (0 when SHSTK clear) |

use crate::features::CetFeatures;
use crate::types::Vaddr;

/// Number of words in the status record.
pub const STATUS_WORDS: usize = 3;

/// Snapshot of a thread's CET state, in wire form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CetStatus {
    /// Currently enabled features.
    pub features: CetFeatures,
    /// Shadow-stack base; null unless [`CetFeatures::SHSTK`] is set.
    pub base: Vaddr,
    /// Shadow-stack size in bytes; zero unless [`CetFeatures::SHSTK`] is set.
    pub size: u64,
}

impl CetStatus {
    /// Serializes the record into its wire layout.
    #[must_use]
    pub const fn to_words(self) -> [u64; STATUS_WORDS] {
        [self.features.bits(), self.base.as_u64(), self.size]
    }

    /// Parses a record from its wire layout.
    ///
    /// Returns `None` if the feature word carries reserved bits.
    #[must_use]
    pub const fn from_words(words: [u64; STATUS_WORDS]) -> Option<Self> {
        match CetFeatures::from_mask(words[0]) {
            Some(features) => Some(Self {
                features,
                base: Vaddr::new(words[1]),
                size: words[2],
            }),
            None => None,
        }
    }

    /// Returns true if the record reports an active shadow stack.
    #[inline]
    #[must_use]
    pub const fn has_shstk(self) -> bool {
        self.features.contains(CetFeatures::SHSTK)
    }
}
