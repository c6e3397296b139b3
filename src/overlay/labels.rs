use std::collections::BTreeMap;

use crate::{
    foundation::core::Point, geometry::resolve::resolve_bounding_box, map::model::Entity,
    map::scene::MapScene, overlay::targets::HitTargetOverlay,
};

/// A positioned name label for a correctly answered entity.
///
/// `anchor` is in device space: hosts draw labels in an overlay layer that
/// survives zoom, so anchors must be recomputed whenever the window or canvas
/// changes.
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    /// Entity the label belongs to.
    pub entity_id: String,
    /// Display text.
    pub text: String,
    /// Anchor point in device space.
    pub anchor: Point,
}

/// Label overlay for correct answers.
///
/// Anchors prefer the entity's synthetic hit-target center (tiny islands read
/// better at their ring than at their smeared bounding box) and fall back to
/// the resolved bounding-box center.
#[derive(Clone, Debug, Default)]
pub struct LabelOverlay {
    labels: BTreeMap<String, Label>,
}

impl LabelOverlay {
    /// Empty overlay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a label for `entity` unless one already exists.
    ///
    /// Entities whose anchor cannot be computed are skipped quietly.
    pub fn add_for(&mut self, scene: &MapScene, targets: &HitTargetOverlay, entity: &Entity) {
        if self.labels.contains_key(&entity.id) {
            return;
        }
        let Some(anchor) = anchor_for(scene, targets, &entity.id) else {
            tracing::debug!(entity = %entity.id, "label skipped: no resolvable anchor");
            return;
        };
        self.labels.insert(
            entity.id.clone(),
            Label {
                entity_id: entity.id.clone(),
                text: entity.display_name.clone(),
                anchor,
            },
        );
    }

    /// Recompute every anchor after a zoom or resize.
    ///
    /// Labels whose anchor no longer resolves keep their previous position.
    pub fn reposition_all(&mut self, scene: &MapScene, targets: &HitTargetOverlay) {
        for (id, label) in &mut self.labels {
            if let Some(anchor) = anchor_for(scene, targets, id) {
                label.anchor = anchor;
            }
        }
    }

    /// Remove all labels.
    pub fn clear(&mut self) {
        self.labels.clear();
    }

    /// Label for `entity_id`, if present.
    pub fn get(&self, entity_id: &str) -> Option<&Label> {
        self.labels.get(entity_id)
    }

    /// Labels in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Label> {
        self.labels.values()
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the overlay holds no labels.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

fn anchor_for(scene: &MapScene, targets: &HitTargetOverlay, entity_id: &str) -> Option<Point> {
    let root_center = targets
        .get(entity_id)
        .map(|t| t.center)
        .or_else(|| resolve_bounding_box(scene, entity_id).map(|b| b.center()))?;
    scene.view_transform().map(|view| view * root_center)
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/labels.rs"]
mod tests;
