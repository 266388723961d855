use std::rc::Rc;

use crate::foundation::core::Canvas;
use crate::scene::node::{Node, NodeRef};

/// Root of the scene graph: top-level nodes drawn in insertion order over a background.
///
/// Coordinates are pixels with the origin at the top-left corner of the canvas.
#[derive(Debug)]
pub struct Scene {
    pub canvas: Canvas,
    pub background: Option<String>,
    nodes: Vec<NodeRef>,
}

impl Scene {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            background: None,
            nodes: Vec::new(),
        }
    }

    pub fn with_background(mut self, color: impl Into<String>) -> Self {
        self.background = Some(color.into());
        self
    }

    /// Add a node on top of everything added so far and return its shared handle.
    pub fn add(&mut self, node: Node) -> NodeRef {
        let node = node.into_ref();
        self.nodes.push(Rc::clone(&node));
        node
    }

    /// Add an already shared node.
    pub fn add_ref(&mut self, node: NodeRef) {
        self.nodes.push(node);
    }

    pub fn nodes(&self) -> &[NodeRef] {
        &self.nodes
    }

    /// First node named `name`, searching top-level nodes in order and groups depth-first.
    pub fn find(&self, name: &str) -> Option<NodeRef> {
        self.nodes.iter().find_map(|n| Node::find(n, name))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
