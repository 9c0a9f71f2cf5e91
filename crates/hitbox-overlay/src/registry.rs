//! Discovery, classification, and per-category shape bookkeeping.
//!
//! The [`HitboxRegistry`] owns one shape set per [`Category`]. Shapes enter
//! through a full-scene scan ([`HitboxRegistry::bulk_scan`], run on enable)
//! or an incremental subtree scan ([`HitboxRegistry::register_subtree`], run
//! when one entity's shapes may have changed). Insertion is idempotent set
//! insertion, so rescanning a still-registered shape is a no-op.
//!
//! Classification ([`classify`]) is an ordered list of capability tests on
//! the shape's owning entity. The tests are additive -- an entity tagged as
//! both a trigger and a camera zone lands in both sets. The single exception
//! is the damage-trigger test: a shape either damages (DamageTrigger) or
//! falls through to Other, never both. Composite shapes bypass the tag tests
//! entirely and always classify as Terrain.
//!
//! Removal is deferred: the renderer collects stale handles while iterating
//! a category and applies them afterwards via
//! [`HitboxRegistry::remove_many`], so a set is never mutated mid-iteration.

use std::collections::HashSet;

use hitbox_world::capability::Capabilities;
use hitbox_world::entity::EntityId;
use hitbox_world::scene::Scene;
use hitbox_world::shape::ShapeId;

use crate::category::Category;

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Capability tests in evaluation order, paired with the category each one
/// routes to. All of these are additive (non-exclusive).
const ADDITIVE_RULES: [(Capabilities, Category); 6] = [
    (Capabilities::PLAYER, Category::Player),
    (Capabilities::ENEMY, Category::Enemy),
    (Capabilities::LADDER, Category::Ladder),
    (Capabilities::TILE_INTERACTION, Category::TilePlayerInteraction),
    (Capabilities::TRIGGER, Category::Trigger),
    (Capabilities::CAMERA_ZONE, Category::CameraZone),
];

/// Classify a shape into the categories it belongs to.
///
/// Composite shapes always resolve to exactly `[Terrain]`. For every other
/// kind the additive capability rules run first, then the one exclusive
/// pair: DamageTrigger if the owner damages, otherwise Other. Consequently
/// every non-composite, non-damaging shape is also an Other member, which is
/// what makes Other a true fallback.
///
/// Returns an empty list for a stale handle.
pub fn classify(scene: &Scene, shape: ShapeId) -> Vec<Category> {
    let Some(def) = scene.shape(shape) else {
        return Vec::new();
    };
    if def.kind.is_composite() {
        return vec![Category::Terrain];
    }

    let mut categories = Vec::new();
    for (caps, category) in ADDITIVE_RULES {
        if scene.has_capability(def.owner, caps) {
            categories.push(category);
        }
    }
    if scene.has_capability(def.owner, Capabilities::DAMAGE_TRIGGER) {
        categories.push(Category::DamageTrigger);
    } else {
        categories.push(Category::Other);
    }
    categories
}

// ---------------------------------------------------------------------------
// HitboxRegistry
// ---------------------------------------------------------------------------

/// Per-category sets of discovered shape handles.
#[derive(Debug, Default)]
pub struct HitboxRegistry {
    sets: [HashSet<ShapeId>; Category::COUNT],
}

impl HitboxRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a shape into a category. Returns `false` if it was already
    /// present (set semantics).
    pub fn insert(&mut self, category: Category, shape: ShapeId) -> bool {
        self.sets[category.index()].insert(shape)
    }

    /// `true` if the shape is registered under the category.
    pub fn contains(&self, category: Category, shape: ShapeId) -> bool {
        self.sets[category.index()].contains(&shape)
    }

    /// Iterate a category's registered shapes (arbitrary order).
    pub fn iter(&self, category: Category) -> impl Iterator<Item = ShapeId> + '_ {
        self.sets[category.index()].iter().copied()
    }

    /// Number of shapes registered under a category.
    pub fn len(&self, category: Category) -> usize {
        self.sets[category.index()].len()
    }

    /// Total registrations across all categories. A shape in several
    /// categories counts once per membership.
    pub fn total_len(&self) -> usize {
        self.sets.iter().map(HashSet::len).sum()
    }

    /// `true` if no shape is registered anywhere.
    pub fn is_empty(&self) -> bool {
        self.sets.iter().all(HashSet::is_empty)
    }

    /// Apply a deferred removal list to one category.
    pub fn remove_many(&mut self, category: Category, stale: &[ShapeId]) {
        let set = &mut self.sets[category.index()];
        for shape in stale {
            set.remove(shape);
        }
    }

    /// Drop all registrations.
    pub fn clear(&mut self) {
        for set in &mut self.sets {
            set.clear();
        }
    }

    /// Classify and insert one shape, skipping shapes that are stale or not
    /// currently active (disabled, or owned by an inactive entity).
    pub fn try_add(&mut self, scene: &Scene, shape: ShapeId) {
        if !scene.is_shape_active(shape) {
            return;
        }
        for category in classify(scene, shape) {
            self.insert(category, shape);
        }
    }

    /// Classify and insert every currently active shape in the scene.
    /// Invoked on overlay enable, not per-frame; cost is linear in the
    /// number of live shapes.
    pub fn bulk_scan(&mut self, scene: &Scene) {
        let before = self.total_len();
        for shape in scene.shapes() {
            self.try_add(scene, shape);
        }
        tracing::debug!(
            added = self.total_len() - before,
            total = self.total_len(),
            "bulk hitbox scan complete"
        );
    }

    /// Classify and insert the shapes of one entity and its descendants.
    /// The walk includes inactive descendants, but only shapes that are
    /// active right now are inserted; inactive ones are picked up by a later
    /// rescan once they activate.
    pub fn register_subtree(&mut self, scene: &Scene, root: EntityId) {
        for shape in scene.shapes_in_subtree(root) {
            self.try_add(scene, shape);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
