//! The [`Scene`] owns entities and shapes and answers the queries a hitbox
//! overlay needs: enumerate live shapes, walk subtrees, test capability tags,
//! and compose world transforms.
//!
//! Entities form a tree. Each node has an active flag; an entity is *active
//! in the hierarchy* only if it and all of its ancestors are active. Shape
//! enumeration distinguishes the two host operations the overlay exposes:
//!
//! - [`Scene::shapes`] lists shapes that are currently active, the way a
//!   whole-world scan sees them.
//! - [`Scene::shapes_in_subtree`] lists every shape under a root *including
//!   those on inactive descendants*, the way a spawn-time rescan of one
//!   entity must, since children may activate later.
//!
//! Both entities and shapes live in generation-tracked slots: despawning an
//! entity (recursively, with its subtree and all attached shapes) bumps the
//! slot generations, so handles held by an observer turn stale instead of
//! silently pointing at recycled storage.

use std::collections::VecDeque;

use crate::capability::Capabilities;
use crate::entity::EntityId;
use crate::math::{Transform2D, Vec2};
use crate::shape::{ShapeDef, ShapeId, ShapeKind};
use crate::WorldError;

// ---------------------------------------------------------------------------
// Node storage
// ---------------------------------------------------------------------------

/// Per-entity data. Lives in a slot; `None` slots are free.
#[derive(Debug)]
struct Node {
    parent: Option<EntityId>,
    children: Vec<EntityId>,
    active: bool,
    transform: Transform2D,
    capabilities: Capabilities,
    shapes: Vec<ShapeId>,
}

impl Node {
    fn new(parent: Option<EntityId>) -> Self {
        Self {
            parent,
            children: Vec::new(),
            active: true,
            transform: Transform2D::IDENTITY,
            capabilities: Capabilities::NONE,
            shapes: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// The world container: an entity tree plus attached 2D shapes.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: Vec<Option<Node>>,
    node_generations: Vec<u32>,
    free_nodes: VecDeque<u32>,
    shapes: Vec<Option<ShapeDef>>,
    shape_generations: Vec<u32>,
    free_shapes: VecDeque<u32>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    // -- spawning and despawning --------------------------------------------

    /// Spawn a root entity (no parent), active, with an identity transform.
    pub fn spawn_root(&mut self) -> EntityId {
        self.spawn_node(None)
    }

    /// Spawn a child of `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::StaleEntity`] if `parent` is not alive.
    pub fn spawn_child(&mut self, parent: EntityId) -> Result<EntityId, WorldError> {
        if !self.is_alive(parent) {
            return Err(WorldError::StaleEntity { entity: parent });
        }
        let child = self.spawn_node(Some(parent));
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
        Ok(child)
    }

    fn spawn_node(&mut self, parent: Option<EntityId>) -> EntityId {
        if let Some(index) = self.free_nodes.pop_front() {
            // Generation was bumped on despawn; the recycled slot is fresh.
            self.nodes[index as usize] = Some(Node::new(parent));
            EntityId::new(index, self.node_generations[index as usize])
        } else {
            let index = self.nodes.len() as u32;
            self.nodes.push(Some(Node::new(parent)));
            self.node_generations.push(0);
            EntityId::new(index, 0)
        }
    }

    /// Despawn an entity, its whole subtree, and every shape attached to any
    /// of them. All outstanding handles into the subtree become stale.
    ///
    /// Returns `false` if the entity was already dead.
    pub fn despawn(&mut self, entity: EntityId) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        // Detach from the parent's child list first.
        if let Some(parent) = self.node(entity).and_then(|n| n.parent) {
            if let Some(parent_node) = self.node_mut(parent) {
                parent_node.children.retain(|&c| c != entity);
            }
        }
        let removed = self.despawn_recursive(entity);
        tracing::debug!(entity = %entity, removed, "despawned entity subtree");
        true
    }

    fn despawn_recursive(&mut self, entity: EntityId) -> usize {
        let idx = entity.index() as usize;
        let Some(node) = self.nodes[idx].take() else {
            return 0;
        };
        self.node_generations[idx] = self.node_generations[idx].wrapping_add(1);
        self.free_nodes.push_back(entity.index());

        for shape in &node.shapes {
            self.release_shape_slot(*shape);
        }

        let mut removed = 1;
        for child in node.children {
            removed += self.despawn_recursive(child);
        }
        removed
    }

    /// `true` if `entity` refers to a live entity with a current generation.
    pub fn is_alive(&self, entity: EntityId) -> bool {
        self.node(entity).is_some()
    }

    /// Number of live entities.
    pub fn entity_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    // -- node state ---------------------------------------------------------

    /// Set an entity's own active flag. Descendants keep their flags but are
    /// inactive in the hierarchy while an ancestor is inactive.
    pub fn set_active(&mut self, entity: EntityId, active: bool) -> Result<(), WorldError> {
        let node = self
            .node_mut(entity)
            .ok_or(WorldError::StaleEntity { entity })?;
        node.active = active;
        Ok(())
    }

    /// `true` if `entity` and all of its ancestors are active.
    pub fn is_active_in_hierarchy(&self, entity: EntityId) -> bool {
        let mut current = Some(entity);
        while let Some(id) = current {
            match self.node(id) {
                Some(node) if node.active => current = node.parent,
                _ => return false,
            }
        }
        true
    }

    /// Set an entity's local transform.
    pub fn set_transform(
        &mut self,
        entity: EntityId,
        transform: Transform2D,
    ) -> Result<(), WorldError> {
        let node = self
            .node_mut(entity)
            .ok_or(WorldError::StaleEntity { entity })?;
        node.transform = transform;
        Ok(())
    }

    /// An entity's local transform, if it is alive.
    pub fn transform(&self, entity: EntityId) -> Option<&Transform2D> {
        self.node(entity).map(|n| &n.transform)
    }

    /// The composition of local transforms from the root down to `entity`.
    pub fn world_transform(&self, entity: EntityId) -> Option<Transform2D> {
        let mut chain = Vec::new();
        let mut current = Some(entity);
        while let Some(id) = current {
            let node = self.node(id)?;
            chain.push(node.transform);
            current = node.parent;
        }
        // chain is leaf-to-root; fold root-down.
        let mut world = Transform2D::IDENTITY;
        for local in chain.iter().rev() {
            world = world.compose(local);
        }
        Some(world)
    }

    /// Grant capability tags to an entity (additive).
    pub fn grant(&mut self, entity: EntityId, caps: Capabilities) -> Result<(), WorldError> {
        let node = self
            .node_mut(entity)
            .ok_or(WorldError::StaleEntity { entity })?;
        node.capabilities |= caps;
        Ok(())
    }

    /// `true` if a live `entity` carries every tag in `caps`.
    pub fn has_capability(&self, entity: EntityId, caps: Capabilities) -> bool {
        self.node(entity)
            .map(|n| n.capabilities.contains(caps))
            .unwrap_or(false)
    }

    // -- shapes -------------------------------------------------------------

    /// Attach a shape to `owner` at the given local offset. The shape starts
    /// enabled.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::StaleEntity`] if `owner` is not alive.
    pub fn attach_shape(
        &mut self,
        owner: EntityId,
        offset: Vec2,
        kind: ShapeKind,
    ) -> Result<ShapeId, WorldError> {
        if !self.is_alive(owner) {
            return Err(WorldError::StaleEntity { entity: owner });
        }
        let def = ShapeDef {
            owner,
            offset,
            kind,
            enabled: true,
        };
        let id = if let Some(index) = self.free_shapes.pop_front() {
            self.shapes[index as usize] = Some(def);
            ShapeId::new(index, self.shape_generations[index as usize])
        } else {
            let index = self.shapes.len() as u32;
            self.shapes.push(Some(def));
            self.shape_generations.push(0);
            ShapeId::new(index, 0)
        };
        if let Some(node) = self.node_mut(owner) {
            node.shapes.push(id);
        }
        Ok(id)
    }

    /// Remove a shape. Returns `false` if the handle was already stale.
    pub fn remove_shape(&mut self, shape: ShapeId) -> bool {
        let Some(def) = self.shape(shape) else {
            return false;
        };
        let owner = def.owner;
        if let Some(node) = self.node_mut(owner) {
            node.shapes.retain(|&s| s != shape);
        }
        self.release_shape_slot(shape);
        true
    }

    fn release_shape_slot(&mut self, shape: ShapeId) {
        let idx = shape.index() as usize;
        if self.shapes[idx].take().is_some() {
            self.shape_generations[idx] = self.shape_generations[idx].wrapping_add(1);
            self.free_shapes.push_back(shape.index());
        }
    }

    /// Enable or disable a shape without removing it.
    pub fn set_shape_enabled(&mut self, shape: ShapeId, enabled: bool) -> Result<(), WorldError> {
        let def = self
            .shape_slot_mut(shape)
            .ok_or(WorldError::StaleShape { shape })?;
        def.enabled = enabled;
        Ok(())
    }

    /// Replace the paths of a composite shape in place. The shape handle
    /// stays valid; observers see the new paths on their next read.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::StaleShape`] for a dead handle and
    /// [`WorldError::NotComposite`] for any other shape kind.
    pub fn set_composite_paths(
        &mut self,
        shape: ShapeId,
        new_paths: Vec<Vec<Vec2>>,
    ) -> Result<(), WorldError> {
        let def = self
            .shape_slot_mut(shape)
            .ok_or(WorldError::StaleShape { shape })?;
        match &mut def.kind {
            ShapeKind::Composite { paths } => {
                *paths = new_paths;
                Ok(())
            }
            _ => Err(WorldError::NotComposite { shape }),
        }
    }

    /// A shape's definition, if the handle is current.
    pub fn shape(&self, shape: ShapeId) -> Option<&ShapeDef> {
        let idx = shape.index() as usize;
        if idx >= self.shapes.len() || self.shape_generations[idx] != shape.generation() {
            return None;
        }
        self.shapes[idx].as_ref()
    }

    /// `true` if the handle refers to a live shape.
    pub fn is_shape_alive(&self, shape: ShapeId) -> bool {
        self.shape(shape).is_some()
    }

    /// `true` if the shape is alive, enabled, and its owner is active in the
    /// hierarchy.
    pub fn is_shape_active(&self, shape: ShapeId) -> bool {
        match self.shape(shape) {
            Some(def) => def.enabled && self.is_active_in_hierarchy(def.owner),
            None => false,
        }
    }

    /// Number of live shapes.
    pub fn shape_count(&self) -> usize {
        self.shapes.iter().filter(|s| s.is_some()).count()
    }

    // -- queries consumed by the overlay ------------------------------------

    /// All currently active shapes, the way a whole-scene scan sees them.
    /// Disabled shapes and shapes under inactive entities are skipped.
    pub fn shapes(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.shapes
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| {
                slot.as_ref()
                    .map(|_| ShapeId::new(idx as u32, self.shape_generations[idx]))
            })
            .filter(|&id| self.is_shape_active(id))
    }

    /// Every shape attached to `root` or any descendant, *including* shapes
    /// on inactive or disabled nodes. Callers that only want active shapes
    /// filter with [`Scene::is_shape_active`].
    pub fn shapes_in_subtree(&self, root: EntityId) -> Vec<ShapeId> {
        let mut out = Vec::new();
        if !self.is_alive(root) {
            return out;
        }
        let mut pending = vec![root];
        while let Some(entity) = pending.pop() {
            if let Some(node) = self.node(entity) {
                out.extend(node.shapes.iter().copied());
                pending.extend(node.children.iter().copied());
            }
        }
        out
    }

    // -- slot helpers -------------------------------------------------------

    fn node(&self, entity: EntityId) -> Option<&Node> {
        let idx = entity.index() as usize;
        if idx >= self.nodes.len() || self.node_generations[idx] != entity.generation() {
            return None;
        }
        self.nodes[idx].as_ref()
    }

    fn node_mut(&mut self, entity: EntityId) -> Option<&mut Node> {
        let idx = entity.index() as usize;
        if idx >= self.nodes.len() || self.node_generations[idx] != entity.generation() {
            return None;
        }
        self.nodes[idx].as_mut()
    }

    fn shape_slot_mut(&mut self, shape: ShapeId) -> Option<&mut ShapeDef> {
        let idx = shape.index() as usize;
        if idx >= self.shapes.len() || self.shape_generations[idx] != shape.generation() {
            return None;
        }
        self.shapes[idx].as_mut()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::CapsuleOrientation;

    fn box_kind() -> ShapeKind {
        ShapeKind::Box {
            size: Vec2::new(1.0, 1.0),
        }
    }

    #[test]
    fn spawn_and_despawn_roundtrip() {
        let mut scene = Scene::new();
        let e = scene.spawn_root();
        assert!(scene.is_alive(e));
        assert_eq!(scene.entity_count(), 1);

        assert!(scene.despawn(e));
        assert!(!scene.is_alive(e));
        assert_eq!(scene.entity_count(), 0);
        assert!(!scene.despawn(e), "double despawn is a no-op");
    }

    #[test]
    fn recycled_slot_gets_new_generation() {
        let mut scene = Scene::new();
        let e0 = scene.spawn_root();
        scene.despawn(e0);
        let e1 = scene.spawn_root();
        assert_eq!(e1.index(), e0.index());
        assert_eq!(e1.generation(), e0.generation() + 1);
        assert!(!scene.is_alive(e0), "stale handle stays dead after reuse");
        assert!(scene.is_alive(e1));
    }

    #[test]
    fn despawn_removes_subtree_and_shapes() {
        let mut scene = Scene::new();
        let root = scene.spawn_root();
        let child = scene.spawn_child(root).unwrap();
        let grandchild = scene.spawn_child(child).unwrap();
        let s_root = scene.attach_shape(root, Vec2::zero(), box_kind()).unwrap();
        let s_deep = scene
            .attach_shape(grandchild, Vec2::zero(), box_kind())
            .unwrap();

        scene.despawn(root);

        assert!(!scene.is_alive(child));
        assert!(!scene.is_alive(grandchild));
        assert!(!scene.is_shape_alive(s_root));
        assert!(!scene.is_shape_alive(s_deep));
        assert_eq!(scene.shape_count(), 0);
    }

    #[test]
    fn despawn_child_detaches_from_parent() {
        let mut scene = Scene::new();
        let root = scene.spawn_root();
        let child = scene.spawn_child(root).unwrap();
        let s = scene.attach_shape(child, Vec2::zero(), box_kind()).unwrap();

        assert!(scene.despawn(child));
        assert!(scene.is_alive(root));
        assert!(!scene.is_shape_alive(s));
        assert!(scene.shapes_in_subtree(root).is_empty());
    }

    #[test]
    fn spawn_child_of_dead_parent_fails() {
        let mut scene = Scene::new();
        let e = scene.spawn_root();
        scene.despawn(e);
        assert!(matches!(
            scene.spawn_child(e),
            Err(WorldError::StaleEntity { .. })
        ));
    }

    #[test]
    fn active_in_hierarchy_requires_all_ancestors() {
        let mut scene = Scene::new();
        let root = scene.spawn_root();
        let child = scene.spawn_child(root).unwrap();
        assert!(scene.is_active_in_hierarchy(child));

        scene.set_active(root, false).unwrap();
        assert!(!scene.is_active_in_hierarchy(root));
        assert!(
            !scene.is_active_in_hierarchy(child),
            "inactive ancestor deactivates the child"
        );

        scene.set_active(root, true).unwrap();
        assert!(scene.is_active_in_hierarchy(child));
    }

    #[test]
    fn world_transform_composes_parent_chain() {
        let mut scene = Scene::new();
        let root = scene.spawn_root();
        let child = scene.spawn_child(root).unwrap();
        scene
            .set_transform(root, Transform2D::from_translation(Vec2::new(10.0, 0.0)))
            .unwrap();
        scene
            .set_transform(child, Transform2D::from_translation(Vec2::new(0.0, 5.0)))
            .unwrap();

        let world = scene.world_transform(child).unwrap();
        assert_eq!(world.translation, Vec2::new(10.0, 5.0));
    }

    #[test]
    fn capabilities_accumulate() {
        let mut scene = Scene::new();
        let e = scene.spawn_root();
        scene.grant(e, Capabilities::TRIGGER).unwrap();
        scene.grant(e, Capabilities::CAMERA_ZONE).unwrap();
        assert!(scene.has_capability(e, Capabilities::TRIGGER));
        assert!(scene.has_capability(e, Capabilities::CAMERA_ZONE));
        assert!(!scene.has_capability(e, Capabilities::PLAYER));
    }

    #[test]
    fn has_capability_on_dead_entity_is_false() {
        let mut scene = Scene::new();
        let e = scene.spawn_root();
        scene.grant(e, Capabilities::PLAYER).unwrap();
        scene.despawn(e);
        assert!(!scene.has_capability(e, Capabilities::PLAYER));
    }

    #[test]
    fn removed_shape_handle_goes_stale() {
        let mut scene = Scene::new();
        let e = scene.spawn_root();
        let s = scene.attach_shape(e, Vec2::zero(), box_kind()).unwrap();
        assert!(scene.remove_shape(s));
        assert!(!scene.is_shape_alive(s));
        assert!(!scene.remove_shape(s), "double remove is a no-op");

        // The recycled slot does not revive the old handle.
        let s2 = scene
            .attach_shape(e, Vec2::zero(), ShapeKind::Circle { radius: 1.0 })
            .unwrap();
        assert_eq!(s2.index(), s.index());
        assert!(!scene.is_shape_alive(s));
        assert!(scene.is_shape_alive(s2));
    }

    #[test]
    fn shapes_skips_disabled_and_inactive() {
        let mut scene = Scene::new();
        let root = scene.spawn_root();
        let hidden = scene.spawn_child(root).unwrap();
        scene.set_active(hidden, false).unwrap();

        let visible = scene.attach_shape(root, Vec2::zero(), box_kind()).unwrap();
        let disabled = scene.attach_shape(root, Vec2::zero(), box_kind()).unwrap();
        scene.set_shape_enabled(disabled, false).unwrap();
        let on_inactive = scene.attach_shape(hidden, Vec2::zero(), box_kind()).unwrap();

        let listed: Vec<ShapeId> = scene.shapes().collect();
        assert_eq!(listed, vec![visible]);
        assert!(!scene.is_shape_active(disabled));
        assert!(!scene.is_shape_active(on_inactive));
    }

    #[test]
    fn subtree_includes_inactive_descendants() {
        let mut scene = Scene::new();
        let root = scene.spawn_root();
        let child = scene.spawn_child(root).unwrap();
        scene.set_active(child, false).unwrap();

        let s_root = scene.attach_shape(root, Vec2::zero(), box_kind()).unwrap();
        let s_child = scene.attach_shape(child, Vec2::zero(), box_kind()).unwrap();

        let mut subtree = scene.shapes_in_subtree(root);
        subtree.sort_by_key(|s| s.to_raw());
        let mut expected = vec![s_root, s_child];
        expected.sort_by_key(|s| s.to_raw());
        assert_eq!(subtree, expected);
    }

    #[test]
    fn subtree_of_dead_root_is_empty() {
        let mut scene = Scene::new();
        let e = scene.spawn_root();
        scene.despawn(e);
        assert!(scene.shapes_in_subtree(e).is_empty());
    }

    #[test]
    fn composite_paths_replaced_in_place() {
        let mut scene = Scene::new();
        let e = scene.spawn_root();
        let s = scene
            .attach_shape(
                e,
                Vec2::zero(),
                ShapeKind::Composite {
                    paths: vec![vec![Vec2::zero(), Vec2::new(1.0, 0.0)]],
                },
            )
            .unwrap();

        scene
            .set_composite_paths(s, vec![vec![Vec2::zero()], vec![Vec2::new(2.0, 2.0)]])
            .unwrap();

        match &scene.shape(s).unwrap().kind {
            ShapeKind::Composite { paths } => assert_eq!(paths.len(), 2),
            other => panic!("expected composite, got {other:?}"),
        }
    }

    #[test]
    fn set_composite_paths_rejects_other_kinds() {
        let mut scene = Scene::new();
        let e = scene.spawn_root();
        let s = scene
            .attach_shape(
                e,
                Vec2::zero(),
                ShapeKind::Capsule {
                    size: Vec2::new(1.0, 2.0),
                    orientation: CapsuleOrientation::Vertical,
                },
            )
            .unwrap();
        assert!(matches!(
            scene.set_composite_paths(s, vec![]),
            Err(WorldError::NotComposite { .. })
        ));
    }

    #[test]
    fn attach_shape_to_dead_entity_fails() {
        let mut scene = Scene::new();
        let e = scene.spawn_root();
        scene.despawn(e);
        assert!(matches!(
            scene.attach_shape(e, Vec2::zero(), box_kind()),
            Err(WorldError::StaleEntity { .. })
        ));
    }
}
