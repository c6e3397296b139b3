use crate::{
    foundation::core::{Rect, invert_affine, map_rect_corners},
    map::scene::MapScene,
};

/// Resolve an entity's axis-aligned bounding box in root coordinate space.
///
/// The entity's local extent is taken in its own geometry space, then mapped
/// through `root_ctm⁻¹ ∘ entity_ctm`, the composition of the entity's
/// mapping to rendered device space with the inverse of the root's own device
/// mapping. All four corners of the extent are transformed and the result is
/// their axis-aligned min/max, so transform chains that rotate or skew still
/// produce a correct box. Without this composition, local-space extents
/// silently misplace entities nested inside transformed groups.
///
/// Returns `None` whenever any transform is unavailable: unknown id, no leaf
/// geometry, a degenerate window, a singular inverse, or a non-finite result.
/// Callers must treat `None` as "exclude from this computation", never crash.
pub fn resolve_bounding_box(scene: &MapScene, entity_id: &str) -> Option<Rect> {
    let node = scene.entity_node(entity_id)?;
    let extent = scene.local_extent(node)?;

    let root_ctm = scene.view_transform()?;
    let root_inv = invert_affine(root_ctm)?;
    let entity_ctm = root_ctm * scene.to_root_transform(node);

    map_rect_corners(root_inv * entity_ctm, extent)
}

/// Union of boxes, skipping `None` entries.
///
/// Returns `None` when nothing resolves at all.
pub fn union_boxes<I>(boxes: I) -> Option<Rect>
where
    I: IntoIterator<Item = Option<Rect>>,
{
    boxes
        .into_iter()
        .flatten()
        .reduce(|acc, b| acc.union(b))
}

/// Expand `r` by `fraction` of its own extent on each axis.
pub fn pad_fraction(r: Rect, fraction: f64) -> Rect {
    r.inflate(r.width() * fraction, r.height() * fraction)
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/resolve.rs"]
mod tests;
