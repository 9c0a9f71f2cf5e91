//! Screen-space visibility culling.
//!
//! A cheap approximation: take the shape's world-space bounding box, project
//! its four corners, and draw the shape if any corner lands inside the
//! viewport. A shape whose edge crosses the view while all four bound
//! corners sit outside is a false negative this overlay accepts.
//!
//! Composite (terrain) shapes skip the test entirely: their bounds are large
//! and irregular, so a corner test would be both expensive to keep honest
//! and prone to false culling.

use hitbox_world::math::{Aabb, Transform2D};
use hitbox_world::scene::Scene;
use hitbox_world::shape::{ShapeDef, ShapeId};

use crate::project::Camera;

/// The shape's axis-aligned bounds in world space: local bounds offset by
/// the shape offset, carried through the owner transform, re-boxed.
pub fn world_aabb(def: &ShapeDef, owner_world: &Transform2D) -> Aabb {
    let local = def.kind.local_aabb().translated(def.offset);
    Aabb::from_points(
        local
            .corners()
            .into_iter()
            .map(|corner| owner_world.transform_point(corner)),
    )
}

/// `true` if the shape is worth drawing this frame.
///
/// Stale handles report not-visible; the caller prunes them separately.
pub fn is_visible(camera: &impl Camera, scene: &Scene, shape: ShapeId) -> bool {
    let Some(def) = scene.shape(shape) else {
        return false;
    };
    if def.kind.is_composite() {
        return true;
    }
    let Some(owner_world) = scene.world_transform(def.owner) else {
        return false;
    };

    let (width, height) = camera.viewport();
    let bounds = world_aabb(def, &owner_world);
    bounds.corners().into_iter().any(|corner| {
        let p = camera.world_to_screen(corner);
        p.x >= 0.0 && p.x <= width as f32 && p.y >= 0.0 && p.y <= height as f32
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::OrthoCamera;
    use hitbox_world::math::Vec2;
    use hitbox_world::shape::ShapeKind;

    fn camera() -> OrthoCamera {
        OrthoCamera::pixel_perfect(Vec2::zero(), 800, 600)
    }

    fn scene_with_box_at(center: Vec2) -> (Scene, ShapeId) {
        let mut scene = Scene::new();
        let e = scene.spawn_root();
        scene
            .set_transform(e, Transform2D::from_translation(center))
            .unwrap();
        let s = scene
            .attach_shape(
                e,
                Vec2::zero(),
                ShapeKind::Box {
                    size: Vec2::new(10.0, 10.0),
                },
            )
            .unwrap();
        (scene, s)
    }

    #[test]
    fn centered_shape_is_visible() {
        let (scene, s) = scene_with_box_at(Vec2::zero());
        assert!(is_visible(&camera(), &scene, s));
    }

    #[test]
    fn far_offscreen_shape_is_culled() {
        let (scene, s) = scene_with_box_at(Vec2::new(10_000.0, 0.0));
        assert!(!is_visible(&camera(), &scene, s));
    }

    #[test]
    fn one_corner_inside_is_enough() {
        // Box spans x in [395, 405] world; the right viewport edge is at
        // x=400, so only the left corners project inside.
        let (scene, s) = scene_with_box_at(Vec2::new(400.0, 0.0));
        assert!(is_visible(&camera(), &scene, s));
    }

    #[test]
    fn corner_on_viewport_edge_counts_as_inside() {
        // Left corners project exactly onto x = 800 (the inclusive edge).
        let (scene, s) = scene_with_box_at(Vec2::new(405.0, 0.0));
        assert!(is_visible(&camera(), &scene, s));
        // One unit further and every corner is out.
        let (scene, s) = scene_with_box_at(Vec2::new(406.0, 0.0));
        assert!(!is_visible(&camera(), &scene, s));
    }

    #[test]
    fn composite_is_never_culled() {
        let mut scene = Scene::new();
        let e = scene.spawn_root();
        scene
            .set_transform(e, Transform2D::from_translation(Vec2::new(1e6, 1e6)))
            .unwrap();
        let s = scene
            .attach_shape(
                e,
                Vec2::zero(),
                ShapeKind::Composite {
                    paths: vec![vec![Vec2::zero(), Vec2::new(1.0, 0.0)]],
                },
            )
            .unwrap();
        assert!(is_visible(&camera(), &scene, s));
    }

    #[test]
    fn stale_shape_is_not_visible() {
        let (mut scene, s) = scene_with_box_at(Vec2::zero());
        scene.remove_shape(s);
        assert!(!is_visible(&camera(), &scene, s));
    }

    #[test]
    fn world_aabb_includes_offset_and_scale() {
        let mut scene = Scene::new();
        let e = scene.spawn_root();
        scene
            .set_transform(
                e,
                Transform2D {
                    translation: Vec2::new(100.0, 0.0),
                    rotation: 0.0,
                    scale: Vec2::new(2.0, 1.0),
                },
            )
            .unwrap();
        let s = scene
            .attach_shape(
                e,
                Vec2::new(5.0, 0.0),
                ShapeKind::Box {
                    size: Vec2::new(2.0, 2.0),
                },
            )
            .unwrap();

        let def = scene.shape(s).unwrap();
        let world = scene.world_transform(e).unwrap();
        let aabb = world_aabb(def, &world);
        // Local x in [4, 6], scaled by 2 and translated by 100: [108, 112].
        assert_eq!(aabb.min, Vec2::new(108.0, -1.0));
        assert_eq!(aabb.max, Vec2::new(112.0, 1.0));
    }

    #[test]
    fn rotated_shape_bounds_still_cover_it() {
        let mut scene = Scene::new();
        let e = scene.spawn_root();
        scene
            .set_transform(
                e,
                Transform2D {
                    translation: Vec2::zero(),
                    rotation: std::f32::consts::FRAC_PI_4,
                    scale: Vec2::new(1.0, 1.0),
                },
            )
            .unwrap();
        let s = scene
            .attach_shape(
                e,
                Vec2::zero(),
                ShapeKind::Box {
                    size: Vec2::new(2.0, 2.0),
                },
            )
            .unwrap();

        let def = scene.shape(s).unwrap();
        let world = scene.world_transform(e).unwrap();
        let aabb = world_aabb(def, &world);
        let expect = std::f32::consts::SQRT_2;
        assert!((aabb.max.x - expect).abs() < 1e-5);
        assert!((aabb.max.y - expect).abs() < 1e-5);
    }
}
