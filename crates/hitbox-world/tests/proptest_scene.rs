//! Property tests for scene handle lifecycle.
//!
//! Random sequences of spawn/despawn/attach/remove operations, verifying the
//! invariants observers depend on: counts match the survivors, despawned
//! handles never come back alive, and subtree enumeration only returns live
//! shapes.

use hitbox_world::prelude::*;
use proptest::prelude::*;

/// Operations on the scene, indices resolved modulo the tracked handle lists.
#[derive(Debug, Clone)]
enum SceneOp {
    SpawnRoot,
    SpawnChild(usize),
    Despawn(usize),
    AttachShape(usize),
    RemoveShape(usize),
    ToggleActive(usize),
}

fn scene_op_strategy() -> impl Strategy<Value = SceneOp> {
    prop_oneof![
        Just(SceneOp::SpawnRoot),
        (0..64usize).prop_map(SceneOp::SpawnChild),
        (0..64usize).prop_map(SceneOp::Despawn),
        (0..64usize).prop_map(SceneOp::AttachShape),
        (0..64usize).prop_map(SceneOp::RemoveShape),
        (0..64usize).prop_map(SceneOp::ToggleActive),
    ]
}

proptest! {
    #[test]
    fn random_ops_preserve_handle_invariants(
        ops in prop::collection::vec(scene_op_strategy(), 1..80)
    ) {
        let mut scene = Scene::new();
        let mut entities: Vec<EntityId> = Vec::new();
        let mut shapes: Vec<ShapeId> = Vec::new();

        for op in ops {
            match op {
                SceneOp::SpawnRoot => entities.push(scene.spawn_root()),
                SceneOp::SpawnChild(i) => {
                    if entities.is_empty() {
                        continue;
                    }
                    let parent = entities[i % entities.len()];
                    if let Ok(child) = scene.spawn_child(parent) {
                        entities.push(child);
                    }
                }
                SceneOp::Despawn(i) => {
                    if entities.is_empty() {
                        continue;
                    }
                    let target = entities[i % entities.len()];
                    scene.despawn(target);
                }
                SceneOp::AttachShape(i) => {
                    if entities.is_empty() {
                        continue;
                    }
                    let owner = entities[i % entities.len()];
                    if let Ok(shape) = scene.attach_shape(
                        owner,
                        Vec2::zero(),
                        ShapeKind::Circle { radius: 1.0 },
                    ) {
                        shapes.push(shape);
                    }
                }
                SceneOp::RemoveShape(i) => {
                    if shapes.is_empty() {
                        continue;
                    }
                    let target = shapes[i % shapes.len()];
                    scene.remove_shape(target);
                }
                SceneOp::ToggleActive(i) => {
                    if entities.is_empty() {
                        continue;
                    }
                    let target = entities[i % entities.len()];
                    let active = scene.is_active_in_hierarchy(target);
                    let _ = scene.set_active(target, !active);
                }
            }
        }

        // Counts agree with handle-by-handle liveness.
        let live_entities = entities.iter().filter(|&&e| scene.is_alive(e)).count();
        prop_assert_eq!(scene.entity_count(), live_entities);
        let live_shapes = shapes.iter().filter(|&&s| scene.is_shape_alive(s)).count();
        prop_assert_eq!(scene.shape_count(), live_shapes);

        // A dead shape is never active; an active shape has a live owner.
        for &shape in &shapes {
            if !scene.is_shape_alive(shape) {
                prop_assert!(!scene.is_shape_active(shape));
            } else {
                let owner = scene.shape(shape).unwrap().owner;
                prop_assert!(scene.is_alive(owner), "live shape with dead owner");
            }
        }

        // Scene-wide enumeration returns only live, active shapes.
        for shape in scene.shapes() {
            prop_assert!(scene.is_shape_alive(shape));
            prop_assert!(scene.is_shape_active(shape));
        }

        // Subtree enumeration returns only live shapes.
        for &entity in &entities {
            if scene.is_alive(entity) {
                for shape in scene.shapes_in_subtree(entity) {
                    prop_assert!(scene.is_shape_alive(shape));
                }
            }
        }
    }

    #[test]
    fn despawned_handles_stay_dead_forever(spawn_count in 1..20usize) {
        let mut scene = Scene::new();
        let entities: Vec<EntityId> = (0..spawn_count).map(|_| scene.spawn_root()).collect();
        for &e in &entities {
            scene.despawn(e);
        }
        // Respawn as many again, recycling all slots.
        let _fresh: Vec<EntityId> = (0..spawn_count).map(|_| scene.spawn_root()).collect();
        for &e in &entities {
            prop_assert!(!scene.is_alive(e), "recycled slot revived a stale handle");
        }
    }
}
