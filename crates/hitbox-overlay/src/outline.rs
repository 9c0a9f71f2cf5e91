//! Per-kind outline generation in local space.
//!
//! [`outline_ops`] turns a shape's geometry into an ordered list of
//! [`OutlineOp`]s: point chains whose consecutive pairs become line segments,
//! plus arc and circle ops for the curved parts. Everything stays in the
//! shape's local space; projection happens later, because arc tessellation
//! density depends on the *projected* radius, not world units.
//!
//! Curved ops therefore carry a `segment_divisor`: the renderer measures the
//! on-screen radius in pixels and calls [`arc_segments`] to pick a segment
//! count in `[4, 32]`. Vertical capsule caps and circles divide by 8;
//! horizontal capsule caps divide by 16, trading smoothness for draw calls
//! on the visually wider shape.

use hitbox_world::math::Vec2;
use hitbox_world::shape::{CapsuleOrientation, ShapeKind};

use crate::draw::ArcHalf;

/// Divisor for vertical capsule caps and full circles.
pub const SEGMENT_DIVISOR_ROUND: i32 = 8;

/// Divisor for horizontal capsule caps.
pub const SEGMENT_DIVISOR_WIDE: i32 = 16;

/// Fewest segments an arc or circle may tessellate into.
pub const MIN_SEGMENTS: i32 = 4;

/// Most segments an arc or circle may tessellate into.
pub const MAX_SEGMENTS: i32 = 32;

// ---------------------------------------------------------------------------
// OutlineOp
// ---------------------------------------------------------------------------

/// One drawable piece of a shape's outline, in shape-local space.
#[derive(Debug, Clone, PartialEq)]
pub enum OutlineOp {
    /// Consecutive point pairs are drawn as line segments. Closed loops
    /// repeat their first point at the end; nothing closes implicitly.
    Chain(Vec<Vec2>),
    /// A half-circle cap.
    Arc {
        /// Arc center in local space.
        center: Vec2,
        /// Radius in local units.
        radius: f32,
        /// Which half of the circle to draw.
        half: ArcHalf,
        /// Divisor applied to the projected radius to pick a segment count.
        segment_divisor: i32,
    },
    /// A full circle.
    Circle {
        /// Center in local space.
        center: Vec2,
        /// Radius in local units.
        radius: f32,
        /// Divisor applied to the projected radius to pick a segment count.
        segment_divisor: i32,
    },
}

/// Segment count for a curved primitive with the given projected radius in
/// pixels: `clamp(screen_radius / divisor, 4, 32)`. Small on-screen arcs stay
/// cheap, large ones stay smooth, and the cost per arc is bounded.
pub fn arc_segments(screen_radius: i32, divisor: i32) -> u32 {
    (screen_radius / divisor).clamp(MIN_SEGMENTS, MAX_SEGMENTS) as u32
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Generate the outline ops for one shape kind.
///
/// Produced fresh every frame from the live shape data, so composite path
/// changes are picked up without any invalidation protocol.
pub fn outline_ops(kind: &ShapeKind) -> Vec<OutlineOp> {
    match kind {
        ShapeKind::Box { size } => vec![box_loop(*size)],
        ShapeKind::EdgeChain { points } => vec![OutlineOp::Chain(points.clone())],
        ShapeKind::Polygon { paths } | ShapeKind::Composite { paths } => {
            paths.iter().map(|path| closed_loop(path)).collect()
        }
        ShapeKind::Capsule { size, orientation } => capsule_ops(*size, *orientation),
        ShapeKind::Circle { radius } => vec![OutlineOp::Circle {
            center: Vec2::zero(),
            radius: *radius,
            segment_divisor: SEGMENT_DIVISOR_ROUND,
        }],
    }
}

/// The five-point closed rectangle loop: top-left, top-right, bottom-right,
/// bottom-left, top-left.
fn box_loop(size: Vec2) -> OutlineOp {
    let half = size / 2.0;
    let top_left = Vec2::new(-half.x, half.y);
    let top_right = half;
    let bottom_right = Vec2::new(half.x, -half.y);
    let bottom_left = -half;
    OutlineOp::Chain(vec![top_left, top_right, bottom_right, bottom_left, top_left])
}

/// Close a polygon path by repeating its first point. Empty paths stay
/// empty and draw nothing.
fn closed_loop(path: &[Vec2]) -> OutlineOp {
    let mut points = path.to_vec();
    if let Some(&first) = points.first() {
        points.push(first);
    }
    OutlineOp::Chain(points)
}

/// Two straight flanks plus two half-circle caps.
///
/// The cap radius is half the shorter extent. The flanks run along the long
/// axis with length `long_extent - 2 * radius`, clamped to zero for stubby
/// capsules, and the caps sit centered where the flanks end.
fn capsule_ops(size: Vec2, orientation: CapsuleOrientation) -> Vec<OutlineOp> {
    let radius = 0.5 * size.x.min(size.y);
    let half = size / 2.0;
    match orientation {
        CapsuleOrientation::Vertical => {
            let flank_half = (half.y - radius).max(0.0);
            vec![
                OutlineOp::Chain(vec![
                    Vec2::new(-half.x, flank_half),
                    Vec2::new(-half.x, -flank_half),
                ]),
                OutlineOp::Chain(vec![
                    Vec2::new(half.x, flank_half),
                    Vec2::new(half.x, -flank_half),
                ]),
                OutlineOp::Arc {
                    center: Vec2::new(0.0, flank_half),
                    radius,
                    half: ArcHalf::Upper,
                    segment_divisor: SEGMENT_DIVISOR_ROUND,
                },
                OutlineOp::Arc {
                    center: Vec2::new(0.0, -flank_half),
                    radius,
                    half: ArcHalf::Lower,
                    segment_divisor: SEGMENT_DIVISOR_ROUND,
                },
            ]
        }
        CapsuleOrientation::Horizontal => {
            let flank_half = (half.x - radius).max(0.0);
            vec![
                OutlineOp::Chain(vec![
                    Vec2::new(-flank_half, half.y),
                    Vec2::new(flank_half, half.y),
                ]),
                OutlineOp::Chain(vec![
                    Vec2::new(-flank_half, -half.y),
                    Vec2::new(flank_half, -half.y),
                ]),
                OutlineOp::Arc {
                    center: Vec2::new(flank_half, 0.0),
                    radius,
                    half: ArcHalf::Right,
                    segment_divisor: SEGMENT_DIVISOR_WIDE,
                },
                OutlineOp::Arc {
                    center: Vec2::new(-flank_half, 0.0),
                    radius,
                    half: ArcHalf::Left,
                    segment_divisor: SEGMENT_DIVISOR_WIDE,
                },
            ]
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
