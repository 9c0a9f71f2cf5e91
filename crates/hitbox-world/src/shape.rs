//! 2D collision/trigger shape descriptors.
//!
//! A [`ShapeDef`] ties a geometric [`ShapeKind`] to its owning entity with a
//! local offset and an enabled flag. Shapes are referenced by generational
//! [`ShapeId`]s handed out by the [`Scene`](crate::scene::Scene); removing a
//! shape (or despawning its owner) makes every outstanding handle stale.
//!
//! All geometry is expressed in the owning entity's local space, centered on
//! the shape's offset. Consumers that need world-space data compose with the
//! owner's world transform.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;
use crate::math::{Aabb, Vec2};

// ---------------------------------------------------------------------------
// ShapeId
// ---------------------------------------------------------------------------

/// A generational shape identifier.
///
/// Layout: `[generation: u32 | index: u32]`, same scheme as
/// [`EntityId`](crate::entity::EntityId) but drawn from the scene's shape
/// slots, so entity and shape indices do not collide.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShapeId(u64);

impl ShapeId {
    /// Construct a `ShapeId` from an index and generation.
    #[inline]
    pub fn new(index: u32, generation: u32) -> Self {
        Self((generation as u64) << 32 | index as u64)
    }

    /// The index portion (low 32 bits).
    #[inline]
    pub fn index(self) -> u32 {
        self.0 as u32
    }

    /// The generation portion (high 32 bits).
    #[inline]
    pub fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Raw `u64` representation.
    #[inline]
    pub fn to_raw(self) -> u64 {
        self.0
    }

    /// Reconstruct from a raw `u64`.
    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Debug for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShapeId({}v{})", self.index(), self.generation())
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index(), self.generation())
    }
}

// ---------------------------------------------------------------------------
// ShapeKind
// ---------------------------------------------------------------------------

/// Which way a capsule's long axis runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapsuleOrientation {
    /// Long axis along local Y; caps at top and bottom.
    Vertical,
    /// Long axis along local X; caps at left and right.
    Horizontal,
}

/// The geometry of a 2D collision/trigger volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShapeKind {
    /// Axis-aligned rectangle with full extents `size`, centered at origin.
    Box {
        /// Full width and height.
        size: Vec2,
    },
    /// An open polyline; consecutive points form edges, no closing edge.
    EdgeChain {
        /// Vertices in order.
        points: Vec<Vec2>,
    },
    /// One or more closed paths (outer rings and holes).
    Polygon {
        /// Each inner vector is one closed path; the closing edge back to
        /// the first point is implicit.
        paths: Vec<Vec<Vec2>>,
    },
    /// A stadium shape: a rectangle capped by two half-circles.
    Capsule {
        /// Full extents of the bounding rectangle.
        size: Vec2,
        /// Which axis the caps sit on.
        orientation: CapsuleOrientation,
    },
    /// A circle centered at origin.
    Circle {
        /// Radius in local units.
        radius: f32,
    },
    /// A merged multi-path surface (terrain). Paths may be rebuilt by the
    /// host at any time, so consumers must re-read them every frame.
    Composite {
        /// Each inner vector is one closed path.
        paths: Vec<Vec<Vec2>>,
    },
}

impl ShapeKind {
    /// `true` for [`ShapeKind::Composite`].
    pub fn is_composite(&self) -> bool {
        matches!(self, ShapeKind::Composite { .. })
    }

    /// The local-space bounding box of the geometry, before the shape offset
    /// is applied. Point-free kinds (an empty chain or path list) produce a
    /// degenerate box at the origin.
    pub fn local_aabb(&self) -> Aabb {
        match self {
            ShapeKind::Box { size } | ShapeKind::Capsule { size, .. } => {
                Aabb::from_half_extents(*size / 2.0)
            }
            ShapeKind::Circle { radius } => {
                Aabb::from_half_extents(Vec2::new(*radius, *radius))
            }
            ShapeKind::EdgeChain { points } => Aabb::from_points(points.iter().copied()),
            ShapeKind::Polygon { paths } | ShapeKind::Composite { paths } => {
                Aabb::from_points(paths.iter().flatten().copied())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// ShapeDef
// ---------------------------------------------------------------------------

/// A shape instance attached to an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeDef {
    /// The entity this shape belongs to.
    pub owner: EntityId,
    /// Offset of the shape's center in the owner's local space.
    pub offset: Vec2,
    /// The geometry.
    pub kind: ShapeKind,
    /// Disabled shapes are skipped by active-shape queries.
    pub enabled: bool,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
