use std::collections::HashMap;
use std::fmt;

use crate::script::model::{AnimDef, NodeDef, OpDef, SceneDef, StepDef};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PathElem {
    Field(&'static str),
    Index(usize),
}

#[derive(Debug, Clone)]
pub struct ScriptError {
    path: Vec<PathElem>,
    pub message: String,
}

impl ScriptError {
    fn at(path: &[PathElem], message: impl Into<String>) -> Self {
        Self {
            path: path.to_vec(),
            message: message.into(),
        }
    }

    /// JSONPath-like location, e.g. `$.timeline[1].play[0]`.
    pub fn path(&self) -> String {
        format_path(&self.path)
    }
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            return write!(f, "{}", self.message);
        }
        write!(f, "{}: {}", format_path(&self.path), self.message)
    }
}

fn format_path(path: &[PathElem]) -> String {
    let mut s = String::from("$");
    for p in path {
        match *p {
            PathElem::Field(name) => {
                s.push('.');
                s.push_str(name);
            }
            PathElem::Index(i) => {
                s.push('[');
                s.push_str(&i.to_string());
                s.push(']');
            }
        }
    }
    s
}

/// Every problem found in one script, in document order.
#[derive(Debug, Clone)]
pub struct ScriptErrors {
    pub errors: Vec<ScriptError>,
}

impl fmt::Display for ScriptErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ScriptErrors {}

/// What an animation may address on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeShape {
    Leaf,
    /// Group or text with this many children.
    Indexed(usize),
}

pub fn validate_scene(def: &SceneDef) -> Result<(), ScriptErrors> {
    let mut errors = Vec::new();

    if def.canvas.width == 0 || def.canvas.height == 0 {
        errors.push(ScriptError::at(
            &[PathElem::Field("canvas")],
            "canvas width/height must be > 0",
        ));
    } else if def.canvas.width > u32::from(u16::MAX) || def.canvas.height > u32::from(u16::MAX) {
        errors.push(ScriptError::at(
            &[PathElem::Field("canvas")],
            "canvas width/height must fit in 16 bits",
        ));
    }
    if def.fps.num == 0 || def.fps.den == 0 {
        errors.push(ScriptError::at(
            &[PathElem::Field("fps")],
            "fps num/den must be > 0",
        ));
    }

    // Pass 1: node names and node-local invariants.
    let mut names = HashMap::<String, NodeShape>::new();
    let mut path = vec![PathElem::Field("nodes")];
    for (i, node) in def.nodes.iter().enumerate() {
        path.push(PathElem::Index(i));
        validate_node(def, node, &mut path, &mut names, &mut errors);
        path.pop();
    }

    // Pass 2: the timeline against the collected names.
    let mut path = vec![PathElem::Field("timeline")];
    for (i, step) in def.timeline.iter().enumerate() {
        path.push(PathElem::Index(i));
        match step {
            StepDef::Play(anims) => {
                path.push(PathElem::Field("play"));
                if anims.is_empty() {
                    errors.push(ScriptError::at(&path, "play needs at least one animation"));
                }
                for (j, anim) in anims.iter().enumerate() {
                    path.push(PathElem::Index(j));
                    validate_anim(anim, &names, &mut path, &mut errors);
                    path.pop();
                }
                path.pop();
            }
            StepDef::Wait(secs) => {
                if !secs.is_finite() || *secs < 0.0 {
                    path.push(PathElem::Field("wait"));
                    errors.push(ScriptError::at(&path, "wait must be finite and >= 0"));
                    path.pop();
                }
            }
        }
        path.pop();
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ScriptErrors { errors })
    }
}

fn validate_node(
    def: &SceneDef,
    node: &NodeDef,
    path: &mut Vec<PathElem>,
    names: &mut HashMap<String, NodeShape>,
    errors: &mut Vec<ScriptError>,
) {
    if node.name.is_empty() {
        path.push(PathElem::Field("name"));
        errors.push(ScriptError::at(path, "node name must be non-empty"));
        path.pop();
    }

    let kinds = [
        node.shape.is_some(),
        node.text.is_some(),
        node.group.is_some(),
    ]
    .into_iter()
    .filter(|&k| k)
    .count();
    if kinds != 1 {
        errors.push(ScriptError::at(
            path,
            format!(
                "node '{}' must set exactly one of shape, text or group",
                node.name
            ),
        ));
    }

    let shape = if let Some(text) = &node.text {
        path.push(PathElem::Field("text"));
        if text.content.is_empty() {
            path.push(PathElem::Field("content"));
            errors.push(ScriptError::at(path, "text content must be non-empty"));
            path.pop();
        }
        if !def.fonts.contains_key(&text.font) {
            path.push(PathElem::Field("font"));
            errors.push(ScriptError::at(
                path,
                format!("unknown font key '{}'", text.font),
            ));
            path.pop();
        }
        if !text.size.is_finite() || text.size <= 0.0 {
            path.push(PathElem::Field("size"));
            errors.push(ScriptError::at(path, "text size must be finite and > 0"));
            path.pop();
        }
        path.pop();
        NodeShape::Indexed(text.content.chars().count())
    } else if let Some(group) = &node.group {
        NodeShape::Indexed(group.children.len())
    } else {
        NodeShape::Leaf
    };

    if let Some(style) = &node.style
        && let Some(opacity) = style.opacity
        && !(0.0..=1.0).contains(&opacity)
    {
        path.push(PathElem::Field("style"));
        path.push(PathElem::Field("opacity"));
        errors.push(ScriptError::at(path, "opacity must be within [0, 1]"));
        path.truncate(path.len() - 2);
    }

    if names.insert(node.name.clone(), shape).is_some() {
        path.push(PathElem::Field("name"));
        errors.push(ScriptError::at(
            path,
            format!("duplicate node name '{}'", node.name),
        ));
        path.pop();
    }

    if let Some(group) = &node.group {
        path.push(PathElem::Field("group"));
        path.push(PathElem::Field("children"));
        for (i, child) in group.children.iter().enumerate() {
            path.push(PathElem::Index(i));
            validate_node(def, child, path, names, errors);
            path.pop();
        }
        path.truncate(path.len() - 2);
    }
}

fn validate_anim(
    anim: &AnimDef,
    names: &HashMap<String, NodeShape>,
    path: &mut Vec<PathElem>,
    errors: &mut Vec<ScriptError>,
) {
    if let Some(d) = anim.duration
        && !d.is_finite()
    {
        path.push(PathElem::Field("duration"));
        errors.push(ScriptError::at(path, "duration must be finite"));
        path.pop();
    }

    if let Some(children) = anim.op.children() {
        if children.is_empty() {
            errors.push(ScriptError::at(
                path,
                format!("{} needs at least one child", anim.op.name()),
            ));
        }
        path.push(PathElem::Field("children"));
        for (i, child) in children.iter().enumerate() {
            path.push(PathElem::Index(i));
            validate_anim(child, names, path, errors);
            path.pop();
        }
        path.pop();
        return;
    }

    let Some(target) = anim.target.as_deref() else {
        errors.push(ScriptError::at(
            path,
            format!("{} requires a target", anim.op.name()),
        ));
        return;
    };
    path.push(PathElem::Field("target"));
    match (names.get(target), anim.index) {
        (None, _) => {
            errors.push(ScriptError::at(path, format!("unknown node '{target}'")));
        }
        (Some(NodeShape::Leaf), Some(_)) => {
            errors.push(ScriptError::at(
                path,
                format!("node '{target}' has no children to index"),
            ));
        }
        (Some(NodeShape::Indexed(len)), Some(i)) if i >= *len => {
            errors.push(ScriptError::at(
                path,
                format!("index {i} out of range for '{target}' with {len} children"),
            ));
        }
        _ => {}
    }
    path.pop();

    if let OpDef::OpacityTo { to } = anim.op
        && !to.is_finite()
    {
        errors.push(ScriptError::at(path, "opacity_to needs a finite value"));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/script/validate.rs"]
mod tests;
