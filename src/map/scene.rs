use std::collections::{BTreeSet, HashMap};

use kurbo::Shape;

use crate::foundation::core::{
    Affine, BezPath, Canvas, Point, Rect, invert_affine, map_rect_corners, view_transform,
};

/// Index of a node in the scene arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// Presentation classes toggled by the core and interpreted by hosts.
///
/// The core never styles anything itself; it records which entities are
/// correct, locked, transiently wrong, or dimmed, and the host paints
/// accordingly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum StyleClass {
    /// Entity was answered correctly.
    Correct,
    /// Entity was just clicked wrongly (transient; hosts clear after a flash).
    Wrong,
    /// Entity no longer participates in prompts this session.
    Locked,
    /// Entity sits outside the active sub-region pool.
    Dimmed,
}

/// One node in the scene arena.
///
/// `transform` maps the node's content space into its parent's content space;
/// a leaf's `shape` is expressed in the node's own content space.
#[derive(Clone, Debug)]
pub struct SceneNode {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) transform: Affine,
    pub(crate) shape: Option<BezPath>,
    pub(crate) entity_id: Option<String>,
    pub(crate) classes: BTreeSet<StyleClass>,
}

impl SceneNode {
    /// Local transform into the parent's content space.
    pub fn transform(&self) -> Affine {
        self.transform
    }

    /// Entity id this node is registered under, if any.
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Leaf geometry, if this node is a shape.
    pub fn shape(&self) -> Option<&BezPath> {
        self.shape.as_ref()
    }

    /// Presentation classes currently set on this node.
    pub fn classes(&self) -> impl Iterator<Item = StyleClass> + '_ {
        self.classes.iter().copied()
    }
}

/// Scene arena plus the entity registry built once at load time.
///
/// The arena holds the map's grouping structure with per-node local
/// transforms; `ids_by_entity` is the immutable id -> node lookup the rest of
/// the core resolves through, instead of re-querying the asset tree on every
/// interaction. The scene also owns the current visible coordinate window and
/// the device canvas it is projected onto.
#[derive(Clone, Debug)]
pub struct MapScene {
    canvas: Canvas,
    original_window: Rect,
    window: Rect,
    nodes: Vec<SceneNode>,
    ids_by_entity: HashMap<String, NodeId>,
    entity_order: Vec<NodeId>,
}

impl MapScene {
    /// Device canvas the map is projected onto.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Update the device canvas (host resize).
    pub fn set_canvas(&mut self, canvas: Canvas) {
        self.canvas = canvas;
    }

    /// Currently visible coordinate window.
    pub fn window(&self) -> Rect {
        self.window
    }

    /// The document's original full window.
    pub fn original_window(&self) -> Rect {
        self.original_window
    }

    /// Replace the visible coordinate window.
    pub fn set_window(&mut self, window: Rect) {
        self.window = window;
    }

    /// Restore the original full window.
    pub fn restore_original_window(&mut self) {
        self.window = self.original_window;
    }

    /// Mapping from the current window onto the device canvas, or `None` when
    /// the window is degenerate.
    pub fn view_transform(&self) -> Option<Affine> {
        view_transform(self.canvas, self.window)
    }

    /// Map a device-space point into root coordinate space.
    pub fn device_to_root(&self, device: Point) -> Option<Point> {
        let view = self.view_transform()?;
        invert_affine(view).map(|inv| inv * device)
    }

    /// Node registered for `entity_id`, if the map document contains one.
    pub fn entity_node(&self, entity_id: &str) -> Option<NodeId> {
        self.ids_by_entity.get(entity_id).copied()
    }

    /// Whether the registry contains `entity_id`.
    pub fn contains_entity(&self, entity_id: &str) -> bool {
        self.ids_by_entity.contains_key(entity_id)
    }

    /// Registered entity ids in document order.
    pub fn entity_ids(&self) -> impl Iterator<Item = &str> {
        self.entity_order
            .iter()
            .filter_map(|id| self.nodes[id.0].entity_id.as_deref())
    }

    /// Number of registered entities.
    pub fn entity_count(&self) -> usize {
        self.entity_order.len()
    }

    /// Access a node by id.
    pub fn node(&self, id: NodeId) -> &SceneNode {
        &self.nodes[id.0]
    }

    /// Mapping from `node`'s content space into root coordinate space
    /// (the product of local transforms down from the root, own inclusive).
    pub(crate) fn to_root_transform(&self, node: NodeId) -> Affine {
        let mut chain = Vec::new();
        let mut cur = Some(node);
        while let Some(id) = cur {
            chain.push(self.nodes[id.0].transform);
            cur = self.nodes[id.0].parent;
        }
        chain.iter().rev().fold(Affine::IDENTITY, |acc, t| acc * *t)
    }

    /// Extent of `node`'s subtree geometry in the node's own content space,
    /// or `None` when the subtree has no usable geometry.
    pub(crate) fn local_extent(&self, node: NodeId) -> Option<Rect> {
        let mut acc = None;
        self.accumulate_extent(node, Affine::IDENTITY, &mut acc);
        acc
    }

    fn accumulate_extent(&self, node: NodeId, rel: Affine, acc: &mut Option<Rect>) {
        let n = &self.nodes[node.0];
        if let Some(shape) = &n.shape
            && !shape.elements().is_empty()
            && let Some(mapped) = map_rect_corners(rel, shape.bounding_box())
        {
            *acc = Some(match acc.take() {
                Some(prev) => prev.union(mapped),
                None => mapped,
            });
        }
        for &child in &n.children {
            self.accumulate_extent(child, rel * self.nodes[child.0].transform, acc);
        }
    }

    /// Topmost entity whose native geometry contains `root_pt`.
    ///
    /// Entities are tested in reverse document order, matching paint order:
    /// later shapes sit on top.
    pub fn hit_test_native(&self, root_pt: Point) -> Option<&str> {
        for &node in self.entity_order.iter().rev() {
            let to_root = self.to_root_transform(node);
            if self.subtree_hit(node, to_root, root_pt) {
                return self.nodes[node.0].entity_id.as_deref();
            }
        }
        None
    }

    fn subtree_hit(&self, node: NodeId, to_root: Affine, pt: Point) -> bool {
        let n = &self.nodes[node.0];
        if let Some(shape) = &n.shape
            && !shape.elements().is_empty()
            && let Some(inv) = invert_affine(to_root)
            && shape.contains(inv * pt)
        {
            return true;
        }
        n.children
            .iter()
            .any(|&c| self.subtree_hit(c, to_root * self.nodes[c.0].transform, pt))
    }

    /// Set a presentation class on an entity; returns whether the entity exists.
    pub fn set_style(&mut self, entity_id: &str, class: StyleClass) -> bool {
        match self.ids_by_entity.get(entity_id).copied() {
            Some(node) => {
                self.nodes[node.0].classes.insert(class);
                true
            }
            None => false,
        }
    }

    /// Clear a presentation class on an entity; returns whether it was set.
    pub fn clear_style(&mut self, entity_id: &str, class: StyleClass) -> bool {
        match self.ids_by_entity.get(entity_id).copied() {
            Some(node) => self.nodes[node.0].classes.remove(&class),
            None => false,
        }
    }

    /// Whether an entity currently carries `class`.
    pub fn has_style(&self, entity_id: &str, class: StyleClass) -> bool {
        self.ids_by_entity
            .get(entity_id)
            .is_some_and(|node| self.nodes[node.0].classes.contains(&class))
    }

    /// Remove every presentation class from every node.
    pub fn clear_all_styles(&mut self) {
        for node in &mut self.nodes {
            node.classes.clear();
        }
    }
}

/// Programmatic scene construction.
///
/// Groups nest via [`SceneBuilder::begin_group`]/[`SceneBuilder::end_group`];
/// leaf paths attach to the innermost open group. Either kind of node may be
/// registered as an entity. The SVG decoder drives this same builder.
#[derive(Debug)]
pub struct SceneBuilder {
    canvas: Canvas,
    window: Rect,
    nodes: Vec<SceneNode>,
    stack: Vec<NodeId>,
    entity_order: Vec<NodeId>,
}

impl SceneBuilder {
    /// Start a scene over `window` (the document's full coordinate window)
    /// projected onto `canvas`.
    pub fn new(canvas: Canvas, window: Rect) -> Self {
        Self {
            canvas,
            window,
            nodes: Vec::new(),
            stack: Vec::new(),
            entity_order: Vec::new(),
        }
    }

    /// Open a group with a local transform, optionally registered as an entity.
    pub fn begin_group(&mut self, transform: Affine, entity: Option<&str>) -> &mut Self {
        let id = self.push_node(transform, None, entity);
        self.stack.push(id);
        self
    }

    /// Close the innermost open group.
    pub fn end_group(&mut self) -> &mut Self {
        debug_assert!(!self.stack.is_empty(), "end_group without begin_group");
        self.stack.pop();
        self
    }

    /// Add a leaf path, optionally registered as an entity.
    pub fn path(&mut self, shape: BezPath, entity: Option<&str>) -> &mut Self {
        self.push_node(Affine::IDENTITY, Some(shape), entity);
        self
    }

    fn push_node(
        &mut self,
        transform: Affine,
        shape: Option<BezPath>,
        entity: Option<&str>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        let parent = self.stack.last().copied();
        self.nodes.push(SceneNode {
            parent,
            children: Vec::new(),
            transform,
            shape,
            entity_id: entity.map(str::to_string),
            classes: BTreeSet::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        if entity.is_some() {
            self.entity_order.push(id);
        }
        id
    }

    /// Finalize the scene and build the entity registry.
    ///
    /// When the document carries the same id twice, the first occurrence wins
    /// (each configured id maps to exactly one shape handle).
    pub fn finish(self) -> MapScene {
        let mut ids_by_entity = HashMap::new();
        let mut entity_order = Vec::new();
        for node in self.entity_order {
            let Some(id) = self.nodes[node.0].entity_id.clone() else {
                continue;
            };
            if ids_by_entity.contains_key(&id) {
                tracing::debug!(entity = %id, "duplicate entity id in map document; keeping first");
                continue;
            }
            ids_by_entity.insert(id, node);
            entity_order.push(node);
        }

        MapScene {
            canvas: self.canvas,
            original_window: self.window,
            window: self.window,
            nodes: self.nodes,
            ids_by_entity,
            entity_order,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/map/scene.rs"]
mod tests;
