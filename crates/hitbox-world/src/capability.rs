//! Gameplay capability tags.
//!
//! A capability marks what role an entity plays to gameplay code (the player
//! pawn, an enemy pawn, a ladder, a damaging trigger, ...). The overlay's
//! classifier tests these tags to decide which visual category an entity's
//! shapes belong to. Stored as a bit-set so an entity can carry several tags
//! and membership tests stay branch-free.

use core::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// A set of gameplay capability tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Capabilities(u16);

impl Capabilities {
    /// The empty set.
    pub const NONE: Capabilities = Capabilities(0);

    /// The player pawn.
    pub const PLAYER: Capabilities = Capabilities(1 << 0);

    /// A hostile pawn.
    pub const ENEMY: Capabilities = Capabilities(1 << 1);

    /// A climbable ladder.
    pub const LADDER: Capabilities = Capabilities(1 << 2);

    /// A tile the player can interact with.
    pub const TILE_INTERACTION: Capabilities = Capabilities(1 << 3);

    /// A player-sensing trigger volume.
    pub const TRIGGER: Capabilities = Capabilities(1 << 4);

    /// A camera confinement/transition zone.
    pub const CAMERA_ZONE: Capabilities = Capabilities(1 << 5);

    /// A trigger that deals damage on contact.
    pub const DAMAGE_TRIGGER: Capabilities = Capabilities(1 << 6);

    /// `true` if every tag in `other` is present in `self`.
    #[inline]
    pub fn contains(self, other: Capabilities) -> bool {
        self.0 & other.0 == other.0
    }

    /// `true` if no tags are set.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Capabilities {
    type Output = Capabilities;
    #[inline]
    fn bitor(self, rhs: Capabilities) -> Capabilities {
        Capabilities(self.0 | rhs.0)
    }
}

impl BitOrAssign for Capabilities {
    #[inline]
    fn bitor_assign(&mut self, rhs: Capabilities) {
        self.0 |= rhs.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_contains_nothing() {
        assert!(Capabilities::NONE.is_empty());
        assert!(!Capabilities::NONE.contains(Capabilities::PLAYER));
    }

    #[test]
    fn union_contains_both_tags() {
        let caps = Capabilities::TRIGGER | Capabilities::CAMERA_ZONE;
        assert!(caps.contains(Capabilities::TRIGGER));
        assert!(caps.contains(Capabilities::CAMERA_ZONE));
        assert!(!caps.contains(Capabilities::ENEMY));
    }

    #[test]
    fn contains_is_subset_test() {
        let caps = Capabilities::PLAYER | Capabilities::TRIGGER;
        assert!(caps.contains(Capabilities::PLAYER | Capabilities::TRIGGER));
        assert!(!caps.contains(Capabilities::PLAYER | Capabilities::ENEMY));
    }

    #[test]
    fn or_assign_accumulates() {
        let mut caps = Capabilities::NONE;
        caps |= Capabilities::LADDER;
        caps |= Capabilities::TILE_INTERACTION;
        assert!(caps.contains(Capabilities::LADDER));
        assert!(caps.contains(Capabilities::TILE_INTERACTION));
    }
}
