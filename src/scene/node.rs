use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::animation::target::Animatable;
use crate::foundation::core::{Affine, BezPath, Transform2D, Vec2};
use crate::foundation::error::{KinemaError, KinemaResult};

/// Deeper group nesting than this is treated as a cycle in the scene graph.
pub(crate) const MAX_GROUP_DEPTH: usize = 64;

/// Shared handle to a scene node. Coerces to [`crate::Target`].
pub type NodeRef = Rc<RefCell<Node>>;

/// Paint state of a node.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Style {
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: f64,
    pub opacity: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: Some("#ffffff".to_string()),
            stroke: None,
            stroke_width: 2.0,
            opacity: 1.0,
        }
    }
}

/// One shaped glyph of a text node, positioned relative to the node origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedGlyph {
    pub id: u32,
    pub x: f32,
    pub y: f32,
}

/// A single laid-out character.
#[derive(Clone)]
pub struct Glyph {
    pub ch: char,
    pub font: vello_cpu::peniko::FontData,
    pub font_size: f32,
    pub glyphs: Vec<PlacedGlyph>,
    pub advance: f32,
}

impl fmt::Debug for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Glyph")
            .field("ch", &self.ch)
            .field("font_size", &self.font_size)
            .field("glyphs", &self.glyphs)
            .field("advance", &self.advance)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
pub enum NodeKind {
    /// Vector outline in local coordinates.
    Shape(BezPath),
    /// Children drawn in order, under this node's transform and opacity.
    Group(Vec<NodeRef>),
    /// One character of a text node.
    Glyph(Glyph),
}

/// A drawable element of a [`crate::Scene`].
#[derive(Clone, Debug)]
pub struct Node {
    pub name: String,
    pub transform: Transform2D,
    pub style: Style,
    pub kind: NodeKind,
}

impl Node {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            transform: Transform2D::default(),
            style: Style::default(),
            kind,
        }
    }

    /// A group of existing nodes. Groups carry no paint of their own; only their opacity and
    /// transform apply to the children.
    pub fn group(name: impl Into<String>, children: Vec<NodeRef>) -> Self {
        Self::new(name, NodeKind::Group(children))
    }

    pub fn into_ref(self) -> NodeRef {
        Rc::new(RefCell::new(self))
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.transform.translate = position;
        self
    }

    pub fn with_rotation(mut self, radians: f64) -> Self {
        self.transform.rotation_rad = radians;
        self
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.transform.scale = scale;
        self
    }

    pub fn with_anchor(mut self, anchor: Vec2) -> Self {
        self.transform.anchor = anchor;
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_fill(mut self, color: impl Into<String>) -> Self {
        self.style.fill = Some(color.into());
        self
    }

    pub fn with_stroke(mut self, color: impl Into<String>, width: f64) -> Self {
        self.style.stroke = Some(color.into());
        self.style.stroke_width = width;
        self
    }

    pub fn local_affine(&self) -> Affine {
        self.transform.to_affine()
    }

    /// Children of a group; empty for other kinds.
    pub fn children(&self) -> &[NodeRef] {
        match &self.kind {
            NodeKind::Group(children) => children,
            _ => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.children().len()
    }

    pub fn is_empty(&self) -> bool {
        self.children().is_empty()
    }

    /// The `i`-th child of a group.
    pub fn at(&self, i: usize) -> KinemaResult<NodeRef> {
        let NodeKind::Group(children) = &self.kind else {
            return Err(KinemaError::validation(format!(
                "node '{}' is not a group and has no children",
                self.name
            )));
        };
        children.get(i).cloned().ok_or_else(|| {
            KinemaError::validation(format!(
                "index {i} out of range for node '{}' with {} children",
                self.name,
                children.len()
            ))
        })
    }

    /// The `i`-th character of a text node.
    pub fn char_at(&self, i: usize) -> KinemaResult<NodeRef> {
        let child = self.at(i)?;
        if !matches!(child.borrow().kind, NodeKind::Glyph(_)) {
            return Err(KinemaError::validation(format!(
                "child {i} of node '{}' is not a character",
                self.name
            )));
        }
        Ok(child)
    }

    /// Depth-first search of this node and its descendants by name.
    ///
    /// Groups nested deeper than [`MAX_GROUP_DEPTH`] are not searched, so a group that contains
    /// itself ends the walk instead of overflowing the stack.
    pub(crate) fn find(this: &NodeRef, name: &str) -> Option<NodeRef> {
        Self::find_within(this, name, 0)
    }

    fn find_within(this: &NodeRef, name: &str, depth: usize) -> Option<NodeRef> {
        let node = this.borrow();
        if node.name == name {
            return Some(Rc::clone(this));
        }
        if depth >= MAX_GROUP_DEPTH {
            tracing::warn!(node = %node.name, "group nesting limit reached during lookup");
            return None;
        }
        node.children()
            .iter()
            .find_map(|c| Self::find_within(c, name, depth + 1))
    }
}

impl Animatable for Node {
    fn position(&self) -> Vec2 {
        self.transform.translate
    }

    fn set_position(&mut self, position: Vec2) {
        self.transform.translate = position;
    }

    fn rotation(&self) -> f64 {
        self.transform.rotation_rad
    }

    fn set_rotation(&mut self, radians: f64) {
        self.transform.rotation_rad = radians;
    }

    fn scale(&self) -> Vec2 {
        self.transform.scale
    }

    fn set_scale(&mut self, scale: Vec2) {
        self.transform.scale = scale;
    }

    fn opacity(&self) -> f64 {
        self.style.opacity
    }

    fn set_opacity(&mut self, opacity: f64) {
        self.style.opacity = opacity;
    }

    fn fill_color(&self) -> Option<String> {
        self.style.fill.clone()
    }

    fn set_fill_color(&mut self, color: Option<String>) {
        self.style.fill = color;
    }

    fn stroke_color(&self) -> Option<String> {
        self.style.stroke.clone()
    }

    fn set_stroke_color(&mut self, color: Option<String>) {
        self.style.stroke = color;
    }

    fn stroke_width(&self) -> f64 {
        self.style.stroke_width
    }

    fn set_stroke_width(&mut self, width: f64) {
        self.style.stroke_width = width;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/node.rs"]
mod tests;
