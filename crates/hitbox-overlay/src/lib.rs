//! Hitbox Overlay -- draw live 2D collision volumes on screen.
//!
//! A diagnostic overlay for auditing collision geometry in a running scene:
//! it discovers live shapes, classifies them into semantic categories
//! (player, enemy, trigger, terrain, ...), and draws their outlines in
//! category colors every frame, without touching simulation state.
//!
//! The per-frame pass is: iterate categories in draw order, skip stale and
//! off-screen shapes, generate each shape's local-space outline, project it
//! to screen pixels, and submit line/arc primitives to a [`DrawSurface`]
//! backend. Discovery is explicit (a full scan on enable, an incremental
//! subtree scan on spawn), never per-frame.
//!
//! # Quick Start
//!
//! ```
//! use hitbox_overlay::prelude::*;
//! use hitbox_world::prelude::*;
//!
//! let mut scene = Scene::new();
//! let player = scene.spawn_root();
//! scene.grant(player, Capabilities::PLAYER).unwrap();
//! scene
//!     .attach_shape(player, Vec2::zero(), ShapeKind::Box { size: Vec2::new(2.0, 2.0) })
//!     .unwrap();
//!
//! let mut overlay = HitboxRenderer::new(OverlayConfig::default());
//! overlay.enable();
//! overlay.search_hitboxes(&scene);
//!
//! let camera = OrthoCamera::new(Vec2::zero(), 800.0, 600.0, 800, 600);
//! let mut surface = RecordingSurface::new();
//! overlay.draw_all(&scene, &camera, &mut surface);
//! assert!(!surface.calls.is_empty());
//! ```
//!
//! [`DrawSurface`]: crate::draw::DrawSurface

#![deny(unsafe_code)]

pub mod category;
pub mod cull;
pub mod draw;
pub mod outline;
pub mod project;
pub mod registry;
pub mod render;

#[cfg(feature = "renderer")]
pub mod gpu;

/// Re-export the world crate for convenience.
pub use hitbox_world;

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::category::{Category, Rgba};
    pub use crate::draw::{ArcHalf, DrawError, DrawStyle, DrawSurface, RecordingSurface};
    pub use crate::outline::{arc_segments, outline_ops, OutlineOp};
    pub use crate::project::{Camera, OrthoCamera, ScreenPoint};
    pub use crate::registry::{classify, HitboxRegistry};
    pub use crate::render::{HitboxRenderer, OverlayConfig};
}
