use std::collections::BTreeMap;

use crate::{
    foundation::core::Point, geometry::resolve::resolve_bounding_box, map::model::HitTargetRule,
    map::scene::MapScene,
};

/// Synthetic circular click region for one entity.
///
/// Center and radius are in root coordinate units, so targets keep working
/// across zoom and resize without repositioning.
#[derive(Clone, Debug, PartialEq)]
pub struct HitTarget {
    /// Entity this target selects.
    pub entity_id: String,
    /// Circle center in root coordinate space.
    pub center: Point,
    /// Circle radius in root coordinate units.
    pub radius: f64,
}

/// Hit-Target Overlay Manager.
///
/// Keeps one synthetic target per registered rule, positioned at the entity's
/// resolved bounding-box center. Targets are derived, never authoritative:
/// rebuild whenever the map is (re)loaded or the layout changes in a way that
/// could move bounding boxes. In hit-test priority they sit above native
/// shapes, so a tiny island's ring takes precedence over the large neighbor
/// it overlaps.
#[derive(Clone, Debug, Default)]
pub struct HitTargetOverlay {
    targets: BTreeMap<String, HitTarget>,
}

impl HitTargetOverlay {
    /// Empty overlay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all targets and recreate one per rule.
    ///
    /// Entities whose geometry cannot be resolved (or resolves degenerate)
    /// are skipped with a log-level notice; they never block other entities.
    pub fn rebuild(&mut self, scene: &MapScene, rules: &[HitTargetRule]) {
        self.targets.clear();
        for rule in rules {
            let Some(bbox) = resolve_bounding_box(scene, &rule.entity_id) else {
                tracing::debug!(entity = %rule.entity_id, "hit target skipped: unresolvable geometry");
                continue;
            };
            if !(bbox.width() > 0.0 && bbox.height() > 0.0) {
                tracing::debug!(entity = %rule.entity_id, "hit target skipped: degenerate bounding box");
                continue;
            }
            self.targets.insert(
                rule.entity_id.clone(),
                HitTarget {
                    entity_id: rule.entity_id.clone(),
                    center: bbox.center(),
                    radius: rule.radius,
                },
            );
        }
    }

    /// Target registered for `entity_id`, if one exists.
    pub fn get(&self, entity_id: &str) -> Option<&HitTarget> {
        self.targets.get(entity_id)
    }

    /// Active targets in id order.
    pub fn iter(&self) -> impl Iterator<Item = &HitTarget> {
        self.targets.values()
    }

    /// Number of active targets.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether the overlay holds no targets.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Entity whose target contains `root_pt`, preferring the nearest center
    /// when rings overlap.
    pub fn hit_test(&self, root_pt: Point) -> Option<&str> {
        self.targets
            .values()
            .filter(|t| (t.center - root_pt).hypot() <= t.radius)
            .min_by(|a, b| {
                let da = (a.center - root_pt).hypot();
                let db = (b.center - root_pt).hypot();
                da.total_cmp(&db)
            })
            .map(|t| t.entity_id.as_str())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/targets.rs"]
mod tests;
