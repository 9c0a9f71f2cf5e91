//! Semantic hitbox categories and their fixed draw styling.
//!
//! Each category carries a constant outline color and a constant depth tier.
//! Lower tiers are more important and draw later (on top); categories sharing
//! a tier draw in declaration order. The table is closed configuration, not
//! runtime-derived.

use serde::{Deserialize, Serialize};

/// An RGBA color, each channel in `0.0..=1.0`.
pub type Rgba = [f32; 4];

/// Semantic classification of a hitbox, controlling color and stacking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// The player pawn's own volumes.
    Player,
    /// Hostile pawn volumes.
    Enemy,
    /// Triggers that deal damage on contact.
    DamageTrigger,
    /// Attack/hurt volumes. No discovery rule routes here; hosts insert
    /// attack shapes into the registry explicitly.
    Attack,
    /// Tiles the player can interact with.
    TilePlayerInteraction,
    /// Player-sensing trigger volumes.
    Trigger,
    /// Breakable props. Like [`Category::Attack`], explicit-insert only.
    Breakable,
    /// Climbable ladders.
    Ladder,
    /// Camera confinement/transition zones.
    CameraZone,
    /// Merged terrain surfaces (composite shapes).
    Terrain,
    /// Everything that matched no other rule.
    Other,
}

impl Category {
    /// Number of categories.
    pub const COUNT: usize = 11;

    /// Per-frame iteration order: descending depth tier, so the deepest
    /// tiers draw first and the player draws last, on top of everything.
    pub const DRAW_ORDER: [Category; Category::COUNT] = [
        Category::Other,
        Category::CameraZone,
        Category::Terrain,
        Category::Ladder,
        Category::Breakable,
        Category::Trigger,
        Category::TilePlayerInteraction,
        Category::Attack,
        Category::Enemy,
        Category::DamageTrigger,
        Category::Player,
    ];

    /// The category's fixed outline color.
    pub const fn color(self) -> Rgba {
        match self {
            Category::Player => [1.0, 0.92, 0.016, 1.0], // yellow
            Category::Enemy => [0.8, 0.0, 0.0, 1.0],     // red
            Category::DamageTrigger => [1.0, 1.0, 1.0, 1.0], // white
            Category::Attack => [0.0, 1.0, 1.0, 1.0],    // cyan
            Category::TilePlayerInteraction => [0.0, 0.8, 0.0, 1.0], // green
            Category::Trigger => [0.5, 0.5, 1.0, 1.0],   // blue
            Category::Breakable => [1.0, 0.75, 0.8, 1.0], // pink
            Category::Ladder => [0.0, 0.0, 0.5, 1.0],    // dark blue
            Category::CameraZone => [0.5, 0.0, 0.1, 1.0], // purple
            Category::Terrain => [1.0, 0.0, 1.0, 1.0],   // magenta
            Category::Other => [0.9, 0.6, 0.4, 1.0],     // orange
        }
    }

    /// The category's fixed depth tier. Lower draws later (on top).
    pub const fn depth(self) -> i32 {
        match self {
            Category::Player => 0,
            Category::Enemy | Category::DamageTrigger => 1,
            Category::Attack => 2,
            Category::TilePlayerInteraction => 3,
            Category::Trigger => 4,
            Category::Breakable => 5,
            Category::Ladder => 6,
            Category::CameraZone | Category::Terrain => 7,
            Category::Other => 8,
        }
    }

    /// Dense index for array-backed per-category storage.
    pub const fn index(self) -> usize {
        match self {
            Category::Player => 0,
            Category::Enemy => 1,
            Category::DamageTrigger => 2,
            Category::Attack => 3,
            Category::TilePlayerInteraction => 4,
            Category::Trigger => 5,
            Category::Breakable => 6,
            Category::Ladder => 7,
            Category::CameraZone => 8,
            Category::Terrain => 9,
            Category::Other => 10,
        }
    }
}
