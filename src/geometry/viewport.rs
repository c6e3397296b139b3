use crate::{
    foundation::core::Rect,
    geometry::resolve::{pad_fraction, resolve_bounding_box, union_boxes},
    map::model::{RegionTable, RegionTag},
    map::scene::MapScene,
};

/// Render passes a pending viewport waits out before reading transforms.
///
/// Bounding-box queries require final layout; computing synchronously with the
/// triggering event would read stale transforms, so application is latched
/// until two render passes have completed.
const SETTLE_PASSES: u8 = 2;

#[derive(Clone, Debug)]
struct PendingViewport {
    tag: RegionTag,
    pool: Vec<String>,
    passes_remaining: u8,
}

/// Region Viewport Controller.
///
/// Maintains the currently visible coordinate window on the scene: the "all"
/// sentinel restores the original full window, any other tag zooms to the
/// padded union of its pool's resolved bounding boxes. Requests are deferred
/// (see [`ViewportController::on_render_pass`]) and idempotent; a redundant
/// or superseding request simply overwrites the pending one.
#[derive(Clone, Debug)]
pub struct ViewportController {
    regions: RegionTable,
    active: RegionTag,
    pending: Option<PendingViewport>,
}

impl ViewportController {
    /// Controller starting on the whole-map sentinel.
    pub fn new(regions: RegionTable) -> Self {
        Self {
            regions,
            active: RegionTag::all(),
            pending: None,
        }
    }

    /// The region most recently requested.
    pub fn active_region(&self) -> &RegionTag {
        &self.active
    }

    /// Whether a viewport recomputation is still latched.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Request the viewport for `tag` over `pool` entity ids.
    ///
    /// The window is not touched yet: the recomputation runs once the next
    /// [`SETTLE_PASSES`] render passes complete. Callers are responsible for
    /// rejecting region changes while a session runs; calling redundantly with
    /// the same region is safe.
    pub fn request_region(&mut self, tag: RegionTag, pool: Vec<String>) {
        self.active = tag.clone();
        self.pending = Some(PendingViewport {
            tag,
            pool,
            passes_remaining: SETTLE_PASSES,
        });
    }

    /// Advance one render pass; applies the pending viewport once settled.
    ///
    /// Returns `true` when a window was applied to the scene this pass.
    pub fn on_render_pass(&mut self, scene: &mut MapScene) -> bool {
        let Some(mut pending) = self.pending.take() else {
            return false;
        };
        pending.passes_remaining = pending.passes_remaining.saturating_sub(1);
        if pending.passes_remaining > 0 {
            self.pending = Some(pending);
            return false;
        }

        self.apply(scene, pending);
        true
    }

    fn apply(&self, scene: &mut MapScene, pending: PendingViewport) {
        if pending.tag.is_all() {
            scene.restore_original_window();
            tracing::debug!("viewport restored to original window");
            return;
        }

        let union = union_boxes(
            pending
                .pool
                .iter()
                .map(|id| resolve_bounding_box(scene, id)),
        );
        match union {
            Some(u) if is_usable(u) => {
                let padding = self.regions.padding_for(&pending.tag);
                scene.set_window(pad_fraction(u, padding));
                tracing::debug!(region = %pending.tag, "viewport zoomed to region union");
            }
            _ => {
                // Never leave the viewport undefined.
                scene.restore_original_window();
                tracing::debug!(region = %pending.tag, "degenerate region union; falling back to original window");
            }
        }
    }
}

fn is_usable(r: Rect) -> bool {
    r.width().is_finite() && r.height().is_finite() && r.width() > 0.0 && r.height() > 0.0
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/viewport.rs"]
mod tests;
