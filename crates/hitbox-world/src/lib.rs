//! Hitbox World -- the 2D scene a collision overlay observes.
//!
//! This crate models the host side of a hitbox visualization tool: a scene
//! graph of entities (parent links, active flags, local transforms), gameplay
//! capability tags, and 2D collision/trigger shapes attached to entities.
//! Handles are generational, so a despawned entity or removed shape leaves
//! all outstanding references detectably stale instead of dangling.
//!
//! The overlay crate consumes this crate purely through queries: enumerate
//! live shapes, enumerate shapes under a subtree, test capability tags, read
//! shape geometry and world transforms. Nothing here renders.
//!
//! # Quick Start
//!
//! ```
//! use hitbox_world::prelude::*;
//!
//! let mut scene = Scene::new();
//! let player = scene.spawn_root();
//! scene.grant(player, Capabilities::PLAYER);
//!
//! let shape = scene
//!     .attach_shape(player, Vec2::zero(), ShapeKind::Box { size: Vec2::new(1.0, 2.0) })
//!     .unwrap();
//!
//! assert!(scene.is_shape_alive(shape));
//! assert!(scene.has_capability(player, Capabilities::PLAYER));
//! ```

#![deny(unsafe_code)]

pub mod capability;
pub mod entity;
pub mod math;
pub mod scene;
pub mod shape;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced by scene operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The entity does not exist (stale generation or never allocated).
    #[error("entity {entity} does not exist (stale or never spawned)")]
    StaleEntity { entity: entity::EntityId },

    /// The shape does not exist (stale generation or never attached).
    #[error("shape {shape} does not exist (stale or never attached)")]
    StaleShape { shape: shape::ShapeId },

    /// A composite-only operation was applied to a non-composite shape.
    #[error("shape {shape} is not a composite shape")]
    NotComposite { shape: shape::ShapeId },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::capability::Capabilities;
    pub use crate::entity::EntityId;
    pub use crate::math::{Aabb, Transform2D, Vec2};
    pub use crate::scene::Scene;
    pub use crate::shape::{CapsuleOrientation, ShapeDef, ShapeId, ShapeKind};
    pub use crate::WorldError;
}
