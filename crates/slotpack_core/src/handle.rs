//! # Pool Handles
//!
//! Handles are lightweight identifiers consisting of:
//! - A slot index into the pool's slot table
//! - A generation counter for safe reuse

use bytemuck::{Pod, Zeroable};

/// Hard ceiling on the number of slots a pool can address.
///
/// The handle encoding reserves 16 bits for the slot index, so no pool can
/// ever hold more than this many objects. This is a deliberate design
/// constant tied to the compactness of the encoding, not a tunable.
pub const MAX_SLOTS: usize = 0xFFFF;

/// Bit mask extracting the slot index from the packed representation.
const INDEX_MASK: u32 = 0xFFFF;

/// Bit offset of the generation counter in the packed representation.
const GENERATION_SHIFT: u32 = 16;

/// Stable identifier for an object living in a pool.
///
/// The packed value is split into two parts:
/// - Lower 16 bits: index into the pool's slot table
/// - Upper 16 bits: generation counter for detecting stale references
///
/// Two handles are equal only when both parts match exactly. A handle
/// survives pool growth and the relocation of *other* objects; it is
/// invalidated when its own object is removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct Handle(u32);

impl Handle {
    /// Null/invalid handle.
    ///
    /// Its index part is `0xFFFF`, which no pool ever assigns.
    pub const NULL: Self = Self(u32::MAX);

    /// Creates a handle from slot index and generation.
    #[inline]
    #[must_use]
    pub const fn new(index: u16, generation: u16) -> Self {
        Self(((generation as u32) << GENERATION_SHIFT) | index as u32)
    }

    /// Returns the slot index portion of the handle.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u16 {
        (self.0 & INDEX_MASK) as u16
    }

    /// Returns the generation portion of the handle.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u16 {
        (self.0 >> GENERATION_SHIFT) as u16
    }

    /// Returns the packed 32-bit representation.
    #[inline]
    #[must_use]
    pub const fn to_bits(self) -> u32 {
        self.0
    }

    /// Reconstructs a handle from its packed 32-bit representation.
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Checks if this handle is null/invalid.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == u32::MAX
    }

    /// Returns the handle for the same slot with the generation advanced.
    ///
    /// The generation wraps after 2^16 steps, at which point an ancient
    /// handle value could alias a fresh one. That wraparound is a documented
    /// limitation of the compact encoding and is not guarded against.
    #[inline]
    #[must_use]
    pub const fn next_generation(self) -> Self {
        Self::new(self.index(), self.generation().wrapping_add(1))
    }
}

impl Default for Handle {
    fn default() -> Self {
        Self::NULL
    }
}
