use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use crate::animation::base::{Animation, AnimationExt};
use crate::animation::parallel::Parallel;
use crate::animation::sequence::Sequence;
use crate::animation::target::Target;
use crate::animation::transforms;
use crate::encode::sink::{FrameSink, InMemorySink};
use crate::foundation::core::{Canvas, Fps, FrameIndex, Vec2};
use crate::foundation::error::{KinemaError, KinemaResult};
use crate::playback::player::{PlaybackStats, Player, PlayerOpts};
use crate::render::backend::{FrameRGBA, RenderBackend};
use crate::scene::model::Scene;
use crate::scene::node::{Node, NodeRef, Style};
use crate::scene::shapes;
use crate::script::model::{AnimDef, NodeDef, OpDef, SceneDef, ShapeDef, StepDef, StyleDef};
use crate::script::validate::validate_scene;
use crate::text::layout::{Text, TextLayoutEngine};

/// One timeline step, ready to play.
pub enum Step {
    Play(Vec<Box<dyn Animation>>),
    Wait(f64),
}

impl std::fmt::Debug for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Play(anims) => f
                .debug_tuple("Play")
                .field(&anims.iter().map(|a| a.label()).collect::<Vec<_>>())
                .finish(),
            Self::Wait(secs) => f.debug_tuple("Wait").field(secs).finish(),
        }
    }
}

/// A scene script turned into a live scene graph plus its animation timeline.
///
/// Animations capture their start state when played, so a script runs once.
#[derive(Debug)]
pub struct Script {
    pub scene: Scene,
    pub fps: Fps,
    steps: Vec<Step>,
}

impl Script {
    /// Parse a script document without building it.
    pub fn parse_reader<R: std::io::Read>(r: R) -> KinemaResult<SceneDef> {
        serde_json::from_reader(r)
            .map_err(|e| KinemaError::serde(format!("parse scene script JSON: {e}")))
    }

    /// Load a script from disk. Font paths resolve against the script's directory.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_path(path: impl AsRef<Path>, engine: &mut TextLayoutEngine) -> KinemaResult<Self> {
        let path = path.as_ref();
        let f = std::fs::File::open(path).map_err(|e| {
            KinemaError::validation(format!("open scene script '{}': {e}", path.display()))
        })?;
        let def = Self::parse_reader(std::io::BufReader::new(f))?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_def(def, base, engine)
    }

    /// Load a script from a JSON string, resolving font paths against `base_dir`.
    pub fn from_json_str(
        json: &str,
        base_dir: &Path,
        engine: &mut TextLayoutEngine,
    ) -> KinemaResult<Self> {
        Self::from_def(Self::parse_reader(json.as_bytes())?, base_dir, engine)
    }

    /// Validate and build a parsed script.
    #[tracing::instrument(skip_all, fields(nodes = def.nodes.len(), steps = def.timeline.len()))]
    pub fn from_def(
        def: SceneDef,
        base_dir: &Path,
        engine: &mut TextLayoutEngine,
    ) -> KinemaResult<Self> {
        validate_scene(&def)
            .map_err(|e| KinemaError::validation(format!("scene script validation failed: {e}")))?;

        let canvas = Canvas::new(def.canvas.width, def.canvas.height)?;
        let fps = Fps::new(def.fps.num, def.fps.den)?;
        let mut scene = Scene::new(canvas);
        scene.background = def.background.clone();

        let fonts: BTreeMap<&str, PathBuf> = def
            .fonts
            .iter()
            .map(|(key, p)| (key.as_str(), base_dir.join(p)))
            .collect();
        let mut builder = NodeBuilder {
            engine,
            fonts: &fonts,
            texts: HashSet::new(),
        };
        for node in &def.nodes {
            let node = builder.build(node)?;
            scene.add(node);
        }
        let texts = builder.texts;

        let mut steps = Vec::with_capacity(def.timeline.len());
        for step in &def.timeline {
            steps.push(match step {
                StepDef::Play(anims) => Step::Play(
                    anims
                        .iter()
                        .map(|a| build_anim(a, &scene, &texts))
                        .collect::<KinemaResult<_>>()?,
                ),
                StepDef::Wait(secs) => Step::Wait(*secs),
            });
        }
        tracing::debug!(steps = steps.len(), "scene script built");

        Ok(Self { scene, fps, steps })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Total number of frames [`Script::run`] will emit.
    pub fn frame_count(&self, final_frame: bool) -> u64 {
        let body: u64 = self
            .steps
            .iter()
            .map(|step| match step {
                Step::Play(anims) => {
                    let longest = anims.iter().map(|a| a.duration()).fold(0.0f64, f64::max);
                    self.fps.secs_to_frames_ceil(longest)
                }
                Step::Wait(secs) => self.fps.secs_to_frames_ceil(*secs),
            })
            .sum();
        body + u64::from(final_frame)
    }

    /// Play the whole timeline into `sink`.
    #[tracing::instrument(skip_all, fields(steps = self.steps.len()))]
    pub fn run<B: RenderBackend, S: FrameSink>(
        self,
        backend: B,
        sink: S,
        final_frame: bool,
    ) -> KinemaResult<PlaybackStats> {
        let opts = PlayerOpts {
            fps: self.fps,
            final_frame,
            only_frame: None,
        };
        self.drive(backend, sink, opts)
    }

    /// Play the timeline (terminal frame included) but rasterize only frame `idx`.
    #[tracing::instrument(skip(self, backend))]
    pub fn render_frame<B: RenderBackend>(
        self,
        backend: B,
        idx: FrameIndex,
    ) -> KinemaResult<FrameRGBA> {
        let total = self.frame_count(true);
        if idx.0 >= total {
            return Err(KinemaError::validation(format!(
                "frame {} out of range: timeline has {total} frames",
                idx.0
            )));
        }
        let opts = PlayerOpts {
            fps: self.fps,
            final_frame: true,
            only_frame: Some(idx),
        };
        let mut sink = InMemorySink::new();
        self.drive(backend, &mut sink, opts)?;
        sink.frames
            .pop()
            .map(|(_, frame)| frame)
            .ok_or_else(|| KinemaError::render(format!("frame {} was not rendered", idx.0)))
    }

    fn drive<B: RenderBackend, S: FrameSink>(
        self,
        backend: B,
        sink: S,
        opts: PlayerOpts,
    ) -> KinemaResult<PlaybackStats> {
        let Self { scene, steps, .. } = self;
        let mut player = Player::new(&scene, backend, sink, opts);
        for step in steps {
            match step {
                Step::Play(mut anims) => player.play(&mut anims)?,
                Step::Wait(secs) => player.wait(secs)?,
            }
        }
        player.finish()
    }
}

struct NodeBuilder<'a> {
    engine: &'a mut TextLayoutEngine,
    fonts: &'a BTreeMap<&'a str, PathBuf>,
    texts: HashSet<String>,
}

impl NodeBuilder<'_> {
    fn build(&mut self, def: &NodeDef) -> KinemaResult<Node> {
        let mut node = if let Some(shape) = &def.shape {
            build_shape(&def.name, shape)?
        } else if let Some(text) = &def.text {
            let font = self.fonts.get(text.font.as_str()).ok_or_else(|| {
                KinemaError::validation(format!("unknown font key '{}'", text.font))
            })?;
            let mut node = Text::build(self.engine, &text.content, font, text.size)?;
            node.name = def.name.clone();
            for (i, child) in node.children().iter().enumerate() {
                let mut child = child.borrow_mut();
                child.name = format!("{}[{i}]", def.name);
                if let Some(style) = &def.style {
                    apply_paint(&mut child.style, style);
                }
            }
            self.texts.insert(def.name.clone());
            node
        } else if let Some(group) = &def.group {
            let children = group
                .children
                .iter()
                .map(|c| self.build(c).map(Node::into_ref))
                .collect::<KinemaResult<Vec<_>>>()?;
            Node::group(&def.name, children)
        } else {
            return Err(KinemaError::validation(format!(
                "node '{}' has no shape, text or group",
                def.name
            )));
        };

        if let Some(p) = def.position {
            node.transform.translate = p.into();
        }
        if let Some(r) = def.rotation {
            node.transform.rotation_rad = r;
        }
        if let Some(s) = def.scale {
            node.transform.scale = s.into();
        }
        if let Some(a) = def.anchor {
            node.transform.anchor = a.into();
        }
        if let Some(style) = &def.style {
            if def.text.is_none() {
                apply_paint(&mut node.style, style);
            }
            if let Some(opacity) = style.opacity {
                node.style.opacity = opacity;
            }
        }
        Ok(node)
    }
}

fn build_shape(name: &str, def: &ShapeDef) -> KinemaResult<Node> {
    Ok(match def {
        ShapeDef::Rect { width, height } => shapes::rect(name, *width, *height),
        ShapeDef::Square { size } => shapes::square(name, *size),
        ShapeDef::Circle { radius } => shapes::circle(name, *radius),
        ShapeDef::Ellipse { rx, ry } => shapes::ellipse(name, *rx, *ry),
        ShapeDef::Polygon { points } => {
            let points: Vec<Vec2> = points.iter().map(|&p| p.into()).collect();
            shapes::polygon(name, &points)?
        }
        ShapeDef::RegularPolygon { sides, radius } => {
            shapes::regular_polygon(name, *sides, *radius)?
        }
        ShapeDef::Line { from, to } => shapes::line(name, (*from).into(), (*to).into()),
        ShapeDef::Path { d } => shapes::path_from_svg(name, d)?,
    })
}

fn apply_paint(style: &mut Style, def: &StyleDef) {
    if let Some(fill) = &def.fill {
        style.fill = Some(fill.clone());
    }
    if let Some(stroke) = &def.stroke {
        style.stroke = Some(stroke.clone());
    }
    if let Some(w) = def.stroke_width {
        style.stroke_width = w;
    }
}

fn build_anim(
    def: &AnimDef,
    scene: &Scene,
    texts: &HashSet<String>,
) -> KinemaResult<Box<dyn Animation>> {
    let mut anim: Box<dyn Animation> = match &def.op {
        OpDef::Sequence { children } => Sequence::new(
            children
                .iter()
                .map(|c| build_anim(c, scene, texts))
                .collect::<KinemaResult<_>>()?,
        )?
        .boxed(),
        OpDef::Parallel { children } => Parallel::new(
            children
                .iter()
                .map(|c| build_anim(c, scene, texts))
                .collect::<KinemaResult<_>>()?,
        )?
        .boxed(),
        op => {
            let name = def.target.as_deref().ok_or_else(|| {
                KinemaError::validation(format!("{} requires a target", op.name()))
            })?;
            let node = scene
                .find(name)
                .ok_or_else(|| KinemaError::validation(format!("unknown node '{name}'")))?;
            let node = match def.index {
                Some(i) => node.borrow().at(i)?,
                None => node,
            };
            // Text paints through its characters.
            if def.index.is_none() && texts.contains(name) && paints_glyphs(op) {
                let per_char = node
                    .borrow()
                    .children()
                    .iter()
                    .map(|c| leaf(op, target_of(c)))
                    .collect::<KinemaResult<_>>()?;
                Parallel::new(per_char)?.boxed()
            } else {
                leaf(op, target_of(&node))?
            }
        }
    };

    if let Some(d) = def.duration {
        anim.set_duration(d);
    }
    if let Some(ease) = &def.ease {
        anim.set_easing(ease);
    }
    Ok(anim)
}

fn target_of(node: &NodeRef) -> Target {
    node.clone()
}

fn paints_glyphs(op: &OpDef) -> bool {
    matches!(
        op,
        OpDef::FillColorTo { .. } | OpDef::StrokeColorTo { .. } | OpDef::StrokeWidthTo { .. }
    )
}

fn leaf(op: &OpDef, target: Target) -> KinemaResult<Box<dyn Animation>> {
    Ok(match op {
        OpDef::MoveTo { to } => transforms::move_to(target, (*to).into()).boxed(),
        OpDef::MoveBy { by } => transforms::move_by(target, (*by).into()).boxed(),
        OpDef::RotateTo { to } => transforms::rotate_to(target, *to).boxed(),
        OpDef::RotateBy { by } => transforms::rotate_by(target, *by).boxed(),
        OpDef::ScaleTo { to } => transforms::scale_to(target, (*to).into()).boxed(),
        OpDef::ScaleBy { by } => transforms::scale_by(target, (*by).into()).boxed(),
        OpDef::OpacityTo { to } => transforms::opacity_to(target, *to).boxed(),
        OpDef::FadeIn => transforms::fade_in(target).boxed(),
        OpDef::FadeOut => transforms::fade_out(target).boxed(),
        OpDef::FillColorTo { to } => transforms::fill_color_to(target, to.clone()).boxed(),
        OpDef::StrokeColorTo { to } => transforms::stroke_color_to(target, to.clone()).boxed(),
        OpDef::StrokeWidthTo { to } => transforms::stroke_width_to(target, *to).boxed(),
        OpDef::Sequence { .. } | OpDef::Parallel { .. } => {
            return Err(KinemaError::animation(format!(
                "{} is not a leaf animation",
                op.name()
            )));
        }
    })
}

#[cfg(test)]
#[path = "../../tests/unit/script/build.rs"]
mod tests;
