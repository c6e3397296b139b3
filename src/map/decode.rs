use crate::{
    foundation::core::{Affine, BezPath, Canvas, Point, Rect},
    foundation::error::{GeoquizError, GeoquizResult},
    map::scene::{MapScene, SceneBuilder},
};

/// Decode an SVG map document into a scene arena.
///
/// Element ids become entity registrations (exact identifier match, both on
/// groups and on paths); nested group transforms are preserved as-is so the
/// resolver sees the same transform chains the renderer does. The document's
/// size becomes the original coordinate window. Elements the quiz does not
/// understand (text, images) are skipped.
pub fn decode_svg_map(bytes: &[u8], canvas: Canvas) -> GeoquizResult<MapScene> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts)
        .map_err(|e| GeoquizError::asset(format!("parse svg map: {e}")))?;

    let size = tree.size();
    let window = Rect::new(
        0.0,
        0.0,
        f64::from(size.width()),
        f64::from(size.height()),
    );
    if !(window.width() > 0.0 && window.height() > 0.0) {
        return Err(GeoquizError::asset("svg map has a degenerate size"));
    }

    let mut builder = SceneBuilder::new(canvas, window);
    builder.begin_group(affine_from_usvg(tree.root().transform()), None);
    walk_group(&mut builder, tree.root());
    builder.end_group();
    Ok(builder.finish())
}

fn walk_group(builder: &mut SceneBuilder, group: &usvg::Group) {
    for node in group.children() {
        match node {
            usvg::Node::Group(g) => {
                builder.begin_group(affine_from_usvg(g.transform()), non_empty(g.id()));
                walk_group(builder, g.as_ref());
                builder.end_group();
            }
            usvg::Node::Path(p) => {
                builder.path(bez_from_tiny(p.data()), non_empty(p.id()));
            }
            _ => {}
        }
    }
}

fn non_empty(id: &str) -> Option<&str> {
    if id.is_empty() { None } else { Some(id) }
}

fn affine_from_usvg(t: usvg::Transform) -> Affine {
    Affine::new([
        f64::from(t.sx),
        f64::from(t.ky),
        f64::from(t.kx),
        f64::from(t.sy),
        f64::from(t.tx),
        f64::from(t.ty),
    ])
}

fn bez_from_tiny(path: &usvg::tiny_skia_path::Path) -> BezPath {
    use usvg::tiny_skia_path::PathSegment;

    let mut out = BezPath::new();
    for segment in path.segments() {
        match segment {
            PathSegment::MoveTo(p) => out.move_to(pt(p)),
            PathSegment::LineTo(p) => out.line_to(pt(p)),
            PathSegment::QuadTo(p1, p2) => out.quad_to(pt(p1), pt(p2)),
            PathSegment::CubicTo(p1, p2, p3) => out.curve_to(pt(p1), pt(p2), pt(p3)),
            PathSegment::Close => out.close_path(),
        }
    }
    out
}

fn pt(p: usvg::tiny_skia_path::Point) -> Point {
    Point::new(f64::from(p.x), f64::from(p.y))
}

#[cfg(test)]
#[path = "../../tests/unit/map/decode.rs"]
mod tests;
