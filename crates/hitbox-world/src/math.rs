//! Minimal 2D math: vectors, affine transforms, axis-aligned bounds.
//!
//! Only the operations the shape queries and the overlay's geometry need.
//! Transforms are translation-rotation-scale; composition applies the parent
//! transform to the child's translation and adds rotations, which is the
//! usual 2D scene-graph convention.

use core::ops::{Add, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Vec2
// ---------------------------------------------------------------------------

/// 2D vector in world or local units.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    /// Horizontal component.
    pub x: f32,
    /// Vertical component.
    pub y: f32,
}

impl Vec2 {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Euclidean length.
    #[inline]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Euclidean distance between two points.
    #[inline]
    pub fn distance(self, other: Vec2) -> f32 {
        (other - self).length()
    }

    /// Component-wise minimum.
    #[inline]
    pub fn min(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x.min(other.x), self.y.min(other.y))
    }

    /// Component-wise maximum.
    #[inline]
    pub fn max(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x.max(other.x), self.y.max(other.y))
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn div(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    #[inline]
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

// ---------------------------------------------------------------------------
// Transform2D
// ---------------------------------------------------------------------------

/// A 2D translation-rotation-scale transform.
///
/// Rotation is in radians, counter-clockwise. Scale is per-axis. Note that a
/// rotated parent with non-uniform scale shears children in ways a TRS form
/// cannot represent; composition here keeps the TRS approximation.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    /// Translation in parent space.
    pub translation: Vec2,
    /// Rotation in radians, counter-clockwise.
    pub rotation: f32,
    /// Per-axis scale factors.
    pub scale: Vec2,
}

impl Transform2D {
    /// The identity transform.
    pub const IDENTITY: Transform2D = Transform2D {
        translation: Vec2::new(0.0, 0.0),
        rotation: 0.0,
        scale: Vec2::new(1.0, 1.0),
    };

    /// A pure translation.
    pub fn from_translation(translation: Vec2) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Map a point from this transform's local space to its parent space:
    /// scale, then rotate, then translate.
    pub fn transform_point(&self, point: Vec2) -> Vec2 {
        let scaled = Vec2::new(point.x * self.scale.x, point.y * self.scale.y);
        let (sin, cos) = self.rotation.sin_cos();
        let rotated = Vec2::new(
            scaled.x * cos - scaled.y * sin,
            scaled.x * sin + scaled.y * cos,
        );
        rotated + self.translation
    }

    /// Compose `self` (parent) with `child`, producing the transform that
    /// maps the child's local space directly into the parent's parent space.
    pub fn compose(&self, child: &Transform2D) -> Transform2D {
        Transform2D {
            translation: self.transform_point(child.translation),
            rotation: self.rotation + child.rotation,
            scale: Vec2::new(
                self.scale.x * child.scale.x,
                self.scale.y * child.scale.y,
            ),
        }
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

// ---------------------------------------------------------------------------
// Aabb
// ---------------------------------------------------------------------------

/// An axis-aligned bounding box.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec2,
    /// Maximum corner.
    pub max: Vec2,
}

impl Aabb {
    /// A degenerate box at the origin.
    pub const ZERO: Aabb = Aabb {
        min: Vec2::new(0.0, 0.0),
        max: Vec2::new(0.0, 0.0),
    };

    /// A box centered at the origin with the given half-extents.
    pub fn from_half_extents(half: Vec2) -> Self {
        Self {
            min: -half,
            max: half,
        }
    }

    /// The smallest box containing all `points`, or [`Aabb::ZERO`] if the
    /// iterator is empty.
    pub fn from_points<I: IntoIterator<Item = Vec2>>(points: I) -> Self {
        let mut iter = points.into_iter();
        let Some(first) = iter.next() else {
            return Self::ZERO;
        };
        let mut aabb = Self {
            min: first,
            max: first,
        };
        for p in iter {
            aabb.min = aabb.min.min(p);
            aabb.max = aabb.max.max(p);
        }
        aabb
    }

    /// Grow to include `other`.
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Shift by `offset`.
    pub fn translated(&self, offset: Vec2) -> Aabb {
        Aabb {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// The four corners: bottom-left, top-left, top-right, bottom-right.
    pub fn corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.min.x, self.min.y),
            Vec2::new(self.min.x, self.max.y),
            Vec2::new(self.max.x, self.max.y),
            Vec2::new(self.max.x, self.min.y),
        ]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
    }

    #[test]
    fn vec2_arithmetic() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(3.0, -1.0);
        assert_eq!(a + b, Vec2::new(4.0, 1.0));
        assert_eq!(a - b, Vec2::new(-2.0, 3.0));
        assert_eq!(a * 2.0, Vec2::new(2.0, 4.0));
        assert_eq!(b / 2.0, Vec2::new(1.5, -0.5));
        assert_eq!(-a, Vec2::new(-1.0, -2.0));
    }

    #[test]
    fn vec2_distance() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < EPS);
    }

    #[test]
    fn identity_transform_is_noop() {
        let p = Vec2::new(4.0, -2.5);
        assert!(approx(Transform2D::IDENTITY.transform_point(p), p));
    }

    #[test]
    fn transform_scales_rotates_then_translates() {
        let t = Transform2D {
            translation: Vec2::new(10.0, 0.0),
            rotation: std::f32::consts::FRAC_PI_2,
            scale: Vec2::new(2.0, 2.0),
        };
        // (1, 0) -> scaled (2, 0) -> rotated 90deg CCW (0, 2) -> translated (10, 2).
        assert!(approx(t.transform_point(Vec2::new(1.0, 0.0)), Vec2::new(10.0, 2.0)));
    }

    #[test]
    fn compose_matches_sequential_application() {
        let parent = Transform2D {
            translation: Vec2::new(5.0, 1.0),
            rotation: 0.3,
            scale: Vec2::new(2.0, 2.0),
        };
        let child = Transform2D {
            translation: Vec2::new(-1.0, 2.0),
            rotation: -0.1,
            scale: Vec2::new(0.5, 0.5),
        };
        let composed = parent.compose(&child);
        let p = Vec2::new(0.7, -0.4);
        assert!(approx(
            composed.transform_point(p),
            parent.transform_point(child.transform_point(p)),
        ));
    }

    #[test]
    fn aabb_from_points_covers_all() {
        let aabb = Aabb::from_points([
            Vec2::new(1.0, 5.0),
            Vec2::new(-2.0, 0.0),
            Vec2::new(3.0, -4.0),
        ]);
        assert_eq!(aabb.min, Vec2::new(-2.0, -4.0));
        assert_eq!(aabb.max, Vec2::new(3.0, 5.0));
    }

    #[test]
    fn aabb_from_no_points_is_zero() {
        assert_eq!(Aabb::from_points([]), Aabb::ZERO);
    }

    #[test]
    fn aabb_corners_ordered() {
        let aabb = Aabb::from_half_extents(Vec2::new(1.0, 2.0));
        let corners = aabb.corners();
        assert_eq!(corners[0], Vec2::new(-1.0, -2.0));
        assert_eq!(corners[1], Vec2::new(-1.0, 2.0));
        assert_eq!(corners[2], Vec2::new(1.0, 2.0));
        assert_eq!(corners[3], Vec2::new(1.0, -2.0));
    }

    #[test]
    fn serializes_to_json() {
        let t = Transform2D::from_translation(Vec2::new(1.0, 2.0));
        let json = serde_json::to_string(&t).expect("should serialize");
        let back: Transform2D = serde_json::from_str(&json).expect("should deserialize");
        assert_eq!(t, back);
    }
}
