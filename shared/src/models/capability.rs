//! Capability bitmask
//!
//! Each set bit is one grantable permission. Routes declare the bits they
//! require, roles declare the bits they grant.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Capability bitmask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capability(u32);

/// Returned when a bitmask exceeds [`Capability::MAX`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("capability {0:#x} exceeds maximum {max:#x}", max = Capability::MAX.bits())]
pub struct CapabilityOutOfRange(pub u32);

impl Capability {
    /// Widest capability a role may hold: 27 permission bits (2^27 - 1).
    pub const MAX: Capability = Capability((1 << 27) - 1);

    /// Route sentinel: no authentication at all. Outside the role range, so
    /// no role can ever hold it.
    pub const NO_AUTH: Capability = Capability(u32::MAX);

    /// No bits set
    pub const EMPTY: Capability = Capability(0);

    /// Build from raw bits without range checking (route declarations)
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Build from raw bits, rejecting anything above [`Capability::MAX`]
    pub fn try_from_bits(bits: u32) -> Result<Self, CapabilityOutOfRange> {
        if bits > Self::MAX.0 {
            return Err(CapabilityOutOfRange(bits));
        }
        Ok(Self(bits))
    }

    /// Raw bits
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// True when every bit of `required` is present in `self`
    pub const fn contains(self, required: Capability) -> bool {
        required.0 & self.0 == required.0
    }

    /// True when the value fits the role range
    pub const fn is_within_range(self) -> bool {
        self.0 <= Self::MAX.0
    }

    pub const fn is_no_auth(self) -> bool {
        self.0 == Self::NO_AUTH.0
    }
}

impl BitOr for Capability {
    type Output = Capability;

    fn bitor(self, rhs: Self) -> Self::Output {
        Capability(self.0 | rhs.0)
    }
}

impl BitOrAssign for Capability {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Capability {
    type Output = Capability;

    fn bitand(self, rhs: Self) -> Self::Output {
        Capability(self.0 & rhs.0)
    }
}

impl FromIterator<Capability> for Capability {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        iter.into_iter().fold(Capability::EMPTY, |acc, c| acc | c)
    }
}

impl From<Capability> for u32 {
    fn from(c: Capability) -> Self {
        c.0
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#b}", self.0)
    }
}
