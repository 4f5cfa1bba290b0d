// Copyright 2026 The Vellum Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Scope bitmask classifying blots and attributors.
//!
//! The low two bits are the TYPE axis (attribute vs. blot), the high two
//! bits are the LEVEL axis (inline vs. block). Composite masks like
//! [`Scope::INLINE`] keep the full opposite axis set so that a probe such
//! as `query(name, Scope::INLINE)` matches both inline blots and inline
//! attributors.

use bitflags::bitflags;

bitflags! {
    /// Bitmask combining a TYPE axis (attribute, blot) with a LEVEL axis
    /// (inline, block).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Scope: u8 {
        /// Both TYPE bits.
        const TYPE = 0b0011;
        /// Both LEVEL bits.
        const LEVEL = 0b1100;

        /// Any attribute, at any level.
        const ATTRIBUTE = 0b1101;
        /// Any blot, at any level.
        const BLOT = 0b1110;
        /// Anything inline, attribute or blot.
        const INLINE = 0b0111;
        /// Anything block-level, attribute or blot.
        const BLOCK = 0b1011;

        /// A block-level blot.
        const BLOCK_BLOT = 0b1010;
        /// An inline blot.
        const INLINE_BLOT = 0b0110;
        /// A block-level attribute.
        const BLOCK_ATTRIBUTE = 0b1001;
        /// An inline attribute.
        const INLINE_ATTRIBUTE = 0b0101;

        /// Matches everything.
        const ANY = 0b1111;
    }
}

impl Scope {
    /// Whether this scope intersects `probe` on *both* the TYPE and the
    /// LEVEL axis. This is the match rule used by every registry query.
    pub fn matches(self, probe: Scope) -> bool {
        !(self & probe & Scope::LEVEL).is_empty()
            && !(self & probe & Scope::TYPE).is_empty()
    }

    /// Whether the TYPE axis marks this as a blot scope.
    pub fn is_blot(self) -> bool {
        !(self & Scope::BLOT & Scope::TYPE).is_empty()
    }

    /// Whether the TYPE axis marks this as an attribute scope.
    pub fn is_attribute(self) -> bool {
        !(self & Scope::ATTRIBUTE & Scope::TYPE).is_empty()
    }

    /// Whether the LEVEL axis includes the block level.
    pub fn is_block_level(self) -> bool {
        !(self & Scope::BLOCK & Scope::LEVEL).is_empty()
    }

    /// Whether the LEVEL axis includes the inline level.
    pub fn is_inline_level(self) -> bool {
        !(self & Scope::INLINE & Scope::LEVEL).is_empty()
    }
}
