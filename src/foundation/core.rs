use crate::foundation::error::{GeoquizError, GeoquizResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Device surface the map is painted to, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Construct a canvas, rejecting zero dimensions.
    pub fn new(width: u32, height: u32) -> GeoquizResult<Self> {
        if width == 0 || height == 0 {
            return Err(GeoquizError::validation("canvas width/height must be > 0"));
        }
        Ok(Self { width, height })
    }
}

/// Uniform-scale, centered mapping from a coordinate `window` onto `canvas`.
///
/// This is the SVG `xMidYMid meet` rule: the window is scaled by the smaller
/// of the two axis ratios and centered on the leftover axis. Returns `None`
/// when the window has non-positive or non-finite extent, matching the
/// resolver's "exclude, never crash" failure policy.
pub fn view_transform(canvas: Canvas, window: Rect) -> Option<Affine> {
    let (w, h) = (window.width(), window.height());
    if !(w.is_finite() && h.is_finite()) || w <= 0.0 || h <= 0.0 {
        return None;
    }

    let cw = f64::from(canvas.width);
    let ch = f64::from(canvas.height);
    let s = (cw / w).min(ch / h);
    if !s.is_finite() || s <= 0.0 {
        return None;
    }

    let tx = (cw - w * s) * 0.5 - window.x0 * s;
    let ty = (ch - h * s) * 0.5 - window.y0 * s;
    Some(Affine::new([s, 0.0, 0.0, s, tx, ty]))
}

/// Map a device-space point back into the window's coordinate space.
pub fn device_to_root(canvas: Canvas, window: Rect, device: Point) -> Option<Point> {
    let view = view_transform(canvas, window)?;
    invert_affine(view).map(|inv| inv * device)
}

/// Inverse of `m`, or `None` when the matrix is singular or non-finite.
pub fn invert_affine(m: Affine) -> Option<Affine> {
    let det = m.determinant();
    if !det.is_finite() || det.abs() < 1e-12 {
        return None;
    }
    Some(m.inverse())
}

/// Axis-aligned bounding box of `r`'s four corners mapped through `m`.
///
/// All four corners are mapped, not just two: the mapping may include rotation
/// or skew, and the min/max of two opposite corners would misplace the box.
/// Returns `None` when any mapped coordinate is non-finite.
pub fn map_rect_corners(m: Affine, r: Rect) -> Option<Rect> {
    let corners = [
        Point::new(r.x0, r.y0),
        Point::new(r.x1, r.y0),
        Point::new(r.x1, r.y1),
        Point::new(r.x0, r.y1),
    ];

    let mut min = Point::new(f64::INFINITY, f64::INFINITY);
    let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    for corner in corners {
        let p = m * corner;
        if !(p.x.is_finite() && p.y.is_finite()) {
            return None;
        }
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    Some(Rect::new(min.x, min.y, max.x, max.y))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
