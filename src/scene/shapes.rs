//! Shape constructors. Every outline is centred on the node's local origin, so a node's position
//! is the shape's centre and rotation/scale pivot around it.

use kurbo::Shape;

use crate::foundation::core::{BezPath, Point, Rect, Vec2};
use crate::foundation::error::{KinemaError, KinemaResult};
use crate::scene::node::{Node, NodeKind};

const CURVE_TOLERANCE: f64 = 0.1;

pub fn rect(name: impl Into<String>, width: f64, height: f64) -> Node {
    let (hw, hh) = (width.abs() / 2.0, height.abs() / 2.0);
    let path = Rect::new(-hw, -hh, hw, hh).to_path(CURVE_TOLERANCE);
    Node::new(name, NodeKind::Shape(path))
}

pub fn square(name: impl Into<String>, side: f64) -> Node {
    rect(name, side, side)
}

pub fn circle(name: impl Into<String>, radius: f64) -> Node {
    let path = kurbo::Circle::new(Point::ORIGIN, radius.abs()).to_path(CURVE_TOLERANCE);
    Node::new(name, NodeKind::Shape(path))
}

pub fn ellipse(name: impl Into<String>, rx: f64, ry: f64) -> Node {
    let path = kurbo::Ellipse::new(Point::ORIGIN, Vec2::new(rx.abs(), ry.abs()), 0.0)
        .to_path(CURVE_TOLERANCE);
    Node::new(name, NodeKind::Shape(path))
}

/// Closed polygon through `points`, recentred on their centroid.
pub fn polygon(name: impl Into<String>, points: &[Vec2]) -> KinemaResult<Node> {
    if points.len() < 3 {
        return Err(KinemaError::validation(format!(
            "polygon needs at least 3 points, got {}",
            points.len()
        )));
    }
    let centroid = points.iter().fold(Vec2::ZERO, |acc, p| acc + *p) / points.len() as f64;
    Ok(Node::new(
        name,
        NodeKind::Shape(closed_path(points.iter().map(|p| *p - centroid))),
    ))
}

/// Regular polygon with one vertex pointing up.
pub fn regular_polygon(name: impl Into<String>, sides: u32, radius: f64) -> KinemaResult<Node> {
    if sides < 3 {
        return Err(KinemaError::validation(format!(
            "regular polygon needs at least 3 sides, got {sides}"
        )));
    }
    let step = std::f64::consts::TAU / f64::from(sides);
    let start = -std::f64::consts::FRAC_PI_2;
    let verts = (0..sides).map(|k| Vec2::from_angle(start + step * f64::from(k)) * radius);
    Ok(Node::new(name, NodeKind::Shape(closed_path(verts))))
}

/// Segment from `from` to `to`, recentred on its midpoint. Lines are stroked only.
pub fn line(name: impl Into<String>, from: Vec2, to: Vec2) -> Node {
    let mid = (from + to) / 2.0;
    let mut path = BezPath::new();
    path.move_to((from - mid).to_point());
    path.line_to((to - mid).to_point());
    let mut node = Node::new(name, NodeKind::Shape(path));
    node.style.fill = None;
    node.style.stroke = Some("#ffffff".to_string());
    node
}

/// Outline from SVG path data. Coordinates are used as given, not recentred.
pub fn path_from_svg(name: impl Into<String>, d: &str) -> KinemaResult<Node> {
    let path = BezPath::from_svg(d.trim())
        .map_err(|e| KinemaError::validation(format!("invalid svg path data: {e}")))?;
    Ok(Node::new(name, NodeKind::Shape(path)))
}

fn closed_path(points: impl Iterator<Item = Vec2>) -> BezPath {
    let mut path = BezPath::new();
    for (i, p) in points.enumerate() {
        if i == 0 {
            path.move_to(p.to_point());
        } else {
            path.line_to(p.to_point());
        }
    }
    path.close_path();
    path
}

#[cfg(test)]
#[path = "../../tests/unit/scene/shapes.rs"]
mod tests;
