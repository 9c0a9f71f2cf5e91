//! The per-frame overlay driver.
//!
//! [`HitboxRenderer`] ties the registry, culler, outline generator, and
//! projector together. While enabled, the host calls
//! [`HitboxRenderer::draw_all`] once per rendered frame; discovery
//! ([`search_hitboxes`](HitboxRenderer::search_hitboxes) /
//! [`update_hitbox`](HitboxRenderer::update_hitbox)) happens only on
//! explicit host action.
//!
//! Failure policy: stale handles are an expected condition -- pruned
//! silently after each category's iteration, never mid-iteration, and no
//! later than the end of the pass. A draw-backend error aborts only the
//! category it occurred in; it is logged in full and the remaining
//! categories still draw. Nothing is retried, because the whole pass is
//! recomputed from scratch next frame.

use serde::{Deserialize, Serialize};

use hitbox_world::entity::EntityId;
use hitbox_world::math::Vec2;
use hitbox_world::scene::Scene;
use hitbox_world::shape::ShapeId;

use crate::category::Category;
use crate::cull;
use crate::draw::{ArcHalf, DrawError, DrawStyle, DrawSurface};
use crate::outline::{arc_segments, outline_ops, OutlineOp};
use crate::project::{local_to_screen, Camera};
use crate::registry::HitboxRegistry;

// ---------------------------------------------------------------------------
// OverlayConfig
// ---------------------------------------------------------------------------

/// Overlay configuration. Fixed for the lifetime of the renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Outline line width in pixels.
    pub line_width: f32,
    /// Submit primitives with the always-on-top depth flag.
    pub depth_test: bool,
    /// Start with the overlay pass enabled.
    pub start_enabled: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            line_width: 1.0,
            depth_test: true,
            start_enabled: false,
        }
    }
}

// ---------------------------------------------------------------------------
// HitboxRenderer
// ---------------------------------------------------------------------------

/// Discovers, classifies, and draws hitbox outlines each frame.
pub struct HitboxRenderer {
    registry: HitboxRegistry,
    config: OverlayConfig,
    enabled: bool,
}

impl HitboxRenderer {
    /// Create a renderer with an empty registry.
    pub fn new(config: OverlayConfig) -> Self {
        let enabled = config.start_enabled;
        Self {
            registry: HitboxRegistry::new(),
            config,
            enabled,
        }
    }

    /// Start running the per-frame pass.
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Stop running the per-frame pass. Registered shapes are kept.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Flip the enabled state and return the new value.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    /// Whether the per-frame pass currently runs.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Read access to the registry, e.g. to inspect category populations or
    /// insert into the explicit-only categories.
    pub fn registry(&self) -> &HitboxRegistry {
        &self.registry
    }

    /// Mutable access to the registry for explicit insertions.
    pub fn registry_mut(&mut self) -> &mut HitboxRegistry {
        &mut self.registry
    }

    /// Full-scene discovery: classify and register every live active shape.
    /// Call on enable or scene load, not per-frame.
    pub fn search_hitboxes(&mut self, scene: &Scene) {
        self.registry.bulk_scan(scene);
    }

    /// Incremental discovery for one entity's subtree, e.g. after a spawn.
    pub fn update_hitbox(&mut self, scene: &Scene, entity: EntityId) {
        self.registry.register_subtree(scene, entity);
    }

    /// Run one overlay pass: iterate categories in draw order, cull, outline,
    /// project, and submit primitives. No-op while disabled.
    pub fn draw_all(
        &mut self,
        scene: &Scene,
        camera: &impl Camera,
        surface: &mut impl DrawSurface,
    ) {
        if !self.enabled {
            return;
        }

        for category in Category::DRAW_ORDER {
            let mut stale = Vec::new();
            let result = self.draw_category(scene, camera, surface, category, &mut stale);

            // Deferred prune: applied after iteration, even if drawing the
            // category failed partway.
            if !stale.is_empty() {
                tracing::trace!(
                    category = ?category,
                    pruned = stale.len(),
                    "pruned stale hitbox handles"
                );
                self.registry.remove_many(category, &stale);
            }

            if let Err(e) = result {
                tracing::error!(
                    category = ?category,
                    error = %e,
                    "hitbox category failed to draw; remaining categories continue"
                );
            }
        }
    }

    /// Draw every live, visible shape of one category. Collects stale
    /// handles into `stale` instead of removing them mid-iteration.
    fn draw_category(
        &self,
        scene: &Scene,
        camera: &impl Camera,
        surface: &mut impl DrawSurface,
        category: Category,
        stale: &mut Vec<ShapeId>,
    ) -> Result<(), DrawError> {
        let style = DrawStyle {
            color: category.color(),
            width: self.config.line_width,
            depth_test: self.config.depth_test,
        };

        for shape in self.registry.iter(category) {
            if !scene.is_shape_alive(shape) {
                stale.push(shape);
                continue;
            }
            if !cull::is_visible(camera, scene, shape) {
                continue;
            }
            self.draw_shape(scene, camera, surface, shape, style)?;
        }
        Ok(())
    }

    /// Generate, project, and submit one shape's outline.
    fn draw_shape(
        &self,
        scene: &Scene,
        camera: &impl Camera,
        surface: &mut impl DrawSurface,
        shape: ShapeId,
        style: DrawStyle,
    ) -> Result<(), DrawError> {
        // Liveness was checked by the caller; a despawn cannot happen
        // mid-pass on the single render thread.
        let Some(def) = scene.shape(shape) else {
            return Ok(());
        };
        let Some(owner_world) = scene.world_transform(def.owner) else {
            return Ok(());
        };

        for op in outline_ops(&def.kind) {
            match op {
                OutlineOp::Chain(points) => {
                    for pair in points.windows(2) {
                        let a = local_to_screen(camera, &owner_world, def.offset, pair[0]);
                        let b = local_to_screen(camera, &owner_world, def.offset, pair[1]);
                        surface.line(a, b, style)?;
                    }
                }
                OutlineOp::Arc {
                    center,
                    radius,
                    half,
                    segment_divisor,
                } => {
                    let center_px = local_to_screen(camera, &owner_world, def.offset, center);
                    let rim_px = local_to_screen(
                        camera,
                        &owner_world,
                        def.offset,
                        center + arc_rim_offset(half, radius),
                    );
                    let screen_radius = center_px.distance(rim_px);
                    surface.half_circle(
                        center_px,
                        screen_radius,
                        half,
                        arc_segments(screen_radius, segment_divisor),
                        style,
                    )?;
                }
                OutlineOp::Circle {
                    center,
                    radius,
                    segment_divisor,
                } => {
                    let center_px = local_to_screen(camera, &owner_world, def.offset, center);
                    let rim_px = local_to_screen(
                        camera,
                        &owner_world,
                        def.offset,
                        center + Vec2::new(radius, 0.0),
                    );
                    let screen_radius = center_px.distance(rim_px);
                    surface.circle(
                        center_px,
                        screen_radius,
                        arc_segments(screen_radius, segment_divisor),
                        style,
                    )?;
                }
            }
        }
        Ok(())
    }
}

/// Local-space offset from an arc's center to a rim reference point. The
/// screen radius is measured between the projections of these two points,
/// along the axis the flat side of the cap runs on.
fn arc_rim_offset(half: ArcHalf, radius: f32) -> Vec2 {
    match half {
        ArcHalf::Upper | ArcHalf::Lower => Vec2::new(radius, 0.0),
        ArcHalf::Left | ArcHalf::Right => Vec2::new(0.0, radius),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
