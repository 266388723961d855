use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::foundation::core::Vec2;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CanvasDef {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FpsDef {
    pub num: u32,
    pub den: u32,
}

impl Default for FpsDef {
    fn default() -> Self {
        Self { num: 30, den: 1 }
    }
}

/// A 2D value written as `[x, y]`, `{"x": .., "y": ..}` or a single number for both axes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Vec2Def {
    pub x: f64,
    pub y: f64,
}

impl<'de> Deserialize<'de> for Vec2Def {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Arr([f64; 2]),
            Obj { x: f64, y: f64 },
            Uniform(f64),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Arr([x, y]) => Ok(Self { x, y }),
            Repr::Obj { x, y } => Ok(Self { x, y }),
            Repr::Uniform(v) => Ok(Self { x: v, y: v }),
        }
    }
}

impl From<Vec2Def> for Vec2 {
    fn from(v: Vec2Def) -> Self {
        Vec2::new(v.x, v.y)
    }
}

/// Root of a scene script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneDef {
    pub canvas: CanvasDef,
    #[serde(default)]
    pub fps: FpsDef,
    #[serde(default)]
    pub background: Option<String>,
    /// Font key to font file path, relative to the script's directory.
    #[serde(default)]
    pub fonts: BTreeMap<String, String>,
    #[serde(default)]
    pub nodes: Vec<NodeDef>,
    #[serde(default)]
    pub timeline: Vec<StepDef>,
}

/// One node. Exactly one of `shape`, `text` or `group` must be set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDef {
    pub name: String,
    #[serde(default)]
    pub shape: Option<ShapeDef>,
    #[serde(default)]
    pub text: Option<TextDef>,
    #[serde(default)]
    pub group: Option<GroupDef>,

    #[serde(default)]
    pub position: Option<Vec2Def>,
    #[serde(default)]
    pub rotation: Option<f64>,
    #[serde(default)]
    pub scale: Option<Vec2Def>,
    #[serde(default)]
    pub anchor: Option<Vec2Def>,
    #[serde(default)]
    pub style: Option<StyleDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeDef {
    Rect { width: f64, height: f64 },
    Square { size: f64 },
    Circle { radius: f64 },
    Ellipse { rx: f64, ry: f64 },
    Polygon { points: Vec<Vec2Def> },
    RegularPolygon { sides: u32, radius: f64 },
    Line { from: Vec2Def, to: Vec2Def },
    Path { d: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextDef {
    pub content: String,
    /// Key into [`SceneDef::fonts`].
    pub font: String,
    pub size: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupDef {
    #[serde(default)]
    pub children: Vec<NodeDef>,
}

/// Style overrides; unset fields keep the constructor's defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StyleDef {
    #[serde(default)]
    pub fill: Option<String>,
    #[serde(default)]
    pub stroke: Option<String>,
    #[serde(default)]
    pub stroke_width: Option<f64>,
    #[serde(default)]
    pub opacity: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepDef {
    /// Animations played concurrently.
    Play(Vec<AnimDef>),
    /// Seconds to hold the scene.
    Wait(f64),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimDef {
    #[serde(flatten)]
    pub op: OpDef,
    /// Node name; required by every op except `sequence` and `parallel`.
    #[serde(default)]
    pub target: Option<String>,
    /// Child (or character) of the target node.
    #[serde(default)]
    pub index: Option<usize>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub ease: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum OpDef {
    MoveTo { to: Vec2Def },
    MoveBy { by: Vec2Def },
    RotateTo { to: f64 },
    RotateBy { by: f64 },
    ScaleTo { to: Vec2Def },
    ScaleBy { by: Vec2Def },
    OpacityTo { to: f64 },
    FadeIn,
    FadeOut,
    FillColorTo { to: String },
    StrokeColorTo { to: String },
    StrokeWidthTo { to: f64 },
    Sequence { children: Vec<AnimDef> },
    Parallel { children: Vec<AnimDef> },
}

impl OpDef {
    pub fn name(&self) -> &'static str {
        match self {
            Self::MoveTo { .. } => "move_to",
            Self::MoveBy { .. } => "move_by",
            Self::RotateTo { .. } => "rotate_to",
            Self::RotateBy { .. } => "rotate_by",
            Self::ScaleTo { .. } => "scale_to",
            Self::ScaleBy { .. } => "scale_by",
            Self::OpacityTo { .. } => "opacity_to",
            Self::FadeIn => "fade_in",
            Self::FadeOut => "fade_out",
            Self::FillColorTo { .. } => "fill_color_to",
            Self::StrokeColorTo { .. } => "stroke_color_to",
            Self::StrokeWidthTo { .. } => "stroke_width_to",
            Self::Sequence { .. } => "sequence",
            Self::Parallel { .. } => "parallel",
        }
    }

    /// Child animations of a composite op.
    pub fn children(&self) -> Option<&[AnimDef]> {
        match self {
            Self::Sequence { children } | Self::Parallel { children } => Some(children),
            _ => None,
        }
    }
}
