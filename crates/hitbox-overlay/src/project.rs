//! Projection from shape-local space to integer screen pixels.
//!
//! All outline geometry is generated in local space; this module is the only
//! place world and camera transforms are applied, which keeps the generators
//! pure and headless-testable.
//!
//! Screen conventions: the camera projects into a bottom-left-origin pixel
//! space; [`local_to_screen`] flips the vertical axis so final coordinates
//! are top-left-origin, and rounds both axes to the nearest pixel.

use hitbox_world::math::{Transform2D, Vec2};

// ---------------------------------------------------------------------------
// ScreenPoint
// ---------------------------------------------------------------------------

/// An integer pixel position, origin at the top-left of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScreenPoint {
    /// Pixels from the left edge.
    pub x: i32,
    /// Pixels from the top edge.
    pub y: i32,
}

impl ScreenPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`, rounded to the nearest pixel.
    pub fn distance(self, other: ScreenPoint) -> i32 {
        let dx = (other.x - self.x) as f32;
        let dy = (other.y - self.y) as f32;
        (dx * dx + dy * dy).sqrt().round() as i32
    }
}

// ---------------------------------------------------------------------------
// Camera
// ---------------------------------------------------------------------------

/// World-to-screen projection plus viewport dimensions.
///
/// `world_to_screen` returns *unflipped* pixel coordinates (origin at the
/// bottom-left, y up), matching the projection math; the flip to top-left
/// screen space happens in [`local_to_screen`].
pub trait Camera {
    /// Project a world position to bottom-left-origin pixel coordinates.
    fn world_to_screen(&self, world: Vec2) -> Vec2;

    /// Viewport size in pixels `(width, height)`.
    fn viewport(&self) -> (u32, u32);
}

/// A fixed orthographic camera: a centered world-space window mapped onto
/// the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthoCamera {
    /// World position at the center of the view.
    pub center: Vec2,
    /// Width of the visible area in world units.
    pub world_width: f32,
    /// Height of the visible area in world units.
    pub world_height: f32,
    /// Viewport width in pixels.
    pub viewport_width: u32,
    /// Viewport height in pixels.
    pub viewport_height: u32,
}

impl OrthoCamera {
    pub fn new(
        center: Vec2,
        world_width: f32,
        world_height: f32,
        viewport_width: u32,
        viewport_height: u32,
    ) -> Self {
        Self {
            center,
            world_width,
            world_height,
            viewport_width,
            viewport_height,
        }
    }

    /// A camera whose world units are 1:1 with pixels, centered on `center`.
    pub fn pixel_perfect(center: Vec2, viewport_width: u32, viewport_height: u32) -> Self {
        Self::new(
            center,
            viewport_width as f32,
            viewport_height as f32,
            viewport_width,
            viewport_height,
        )
    }
}

impl Camera for OrthoCamera {
    fn world_to_screen(&self, world: Vec2) -> Vec2 {
        let rel = world - self.center;
        Vec2::new(
            (rel.x / self.world_width + 0.5) * self.viewport_width as f32,
            (rel.y / self.world_height + 0.5) * self.viewport_height as f32,
        )
    }

    fn viewport(&self) -> (u32, u32) {
        (self.viewport_width, self.viewport_height)
    }
}

// ---------------------------------------------------------------------------
// local_to_screen
// ---------------------------------------------------------------------------

/// Project a shape-local point to a screen pixel.
///
/// The point is offset into the owner's local space by the shape's offset,
/// carried to world space through the owner's world transform, projected by
/// the camera, flipped vertically (projection origin is bottom-left, screen
/// origin is top-left), and rounded to the nearest integer pixel.
pub fn local_to_screen(
    camera: &impl Camera,
    owner_world: &Transform2D,
    shape_offset: Vec2,
    local: Vec2,
) -> ScreenPoint {
    let world = owner_world.transform_point(local + shape_offset);
    let projected = camera.world_to_screen(world);
    let (_, height) = camera.viewport();
    ScreenPoint::new(
        projected.x.round() as i32,
        (height as f32 - projected.y).round() as i32,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
