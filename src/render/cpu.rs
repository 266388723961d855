use crate::foundation::color::Rgba8;
use crate::foundation::core::{Affine, BezPath};
use crate::foundation::error::{KinemaError, KinemaResult};
use crate::render::backend::{FrameRGBA, RenderBackend, RenderSettings};
use crate::scene::model::Scene;
use crate::scene::node::{MAX_GROUP_DEPTH, Node, NodeKind};

/// CPU rasterizer built on `vello_cpu`.
///
/// The raster context is kept between frames and only rebuilt when the canvas size changes.
pub struct CpuBackend {
    settings: RenderSettings,
    ctx: Option<vello_cpu::RenderContext>,
}

impl CpuBackend {
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            ctx: None,
        }
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut vello_cpu::RenderContext) -> KinemaResult<R>,
    ) -> KinemaResult<R> {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(&mut ctx);
        self.ctx = Some(ctx);
        out
    }

    fn clear_color(&self, scene: &Scene) -> Option<Rgba8> {
        scene
            .background
            .as_deref()
            .and_then(Rgba8::parse)
            .or_else(|| {
                self.settings
                    .clear_rgba
                    .map(|[r, g, b, a]| Rgba8::new(r, g, b, a))
            })
    }
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new(RenderSettings::default())
    }
}

impl RenderBackend for CpuBackend {
    #[tracing::instrument(
        skip_all,
        fields(width = scene.canvas.width, height = scene.canvas.height)
    )]
    fn render_scene(&mut self, scene: &Scene) -> KinemaResult<FrameRGBA> {
        let width: u16 = scene
            .canvas
            .width
            .try_into()
            .map_err(|_| KinemaError::render("canvas width exceeds u16"))?;
        let height: u16 = scene
            .canvas
            .height
            .try_into()
            .map_err(|_| KinemaError::render("canvas height exceeds u16"))?;
        let clear = self.clear_color(scene);

        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        self.with_ctx_mut(width, height, |ctx| {
            if let Some(c) = clear {
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(to_color(c));
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    0.0,
                    0.0,
                    f64::from(width),
                    f64::from(height),
                ));
            }
            for node in scene.nodes() {
                draw_node(ctx, &node.borrow(), Affine::IDENTITY, 0)?;
            }
            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
            Ok(())
        })?;

        Ok(FrameRGBA {
            width: u32::from(width),
            height: u32::from(height),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

fn draw_node(
    ctx: &mut vello_cpu::RenderContext,
    node: &Node,
    parent: Affine,
    depth: usize,
) -> KinemaResult<()> {
    if depth > MAX_GROUP_DEPTH {
        return Err(KinemaError::render(format!(
            "node '{}' is nested deeper than {MAX_GROUP_DEPTH} levels",
            node.name
        )));
    }
    let opacity = node.style.opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 {
        return Ok(());
    }
    let world = parent * node.local_affine();

    let layered = opacity < 1.0;
    if layered {
        ctx.push_opacity_layer(opacity as f32);
    }

    match &node.kind {
        NodeKind::Shape(path) => {
            ctx.set_transform(affine_to_cpu(world));
            let cpu_path = bezpath_to_cpu(path);
            if let Some(fill) = paint(node.style.fill.as_deref()) {
                ctx.set_paint(fill);
                ctx.fill_path(&cpu_path);
            }
            if let Some(stroke) = paint(node.style.stroke.as_deref())
                && node.style.stroke_width > 0.0
            {
                ctx.set_stroke(vello_cpu::kurbo::Stroke::new(node.style.stroke_width));
                ctx.set_paint(stroke);
                ctx.stroke_path(&cpu_path);
            }
        }
        NodeKind::Group(children) => {
            for child in children {
                draw_node(ctx, &child.borrow(), world, depth + 1)?;
            }
        }
        NodeKind::Glyph(glyph) => {
            if let Some(fill) = paint(node.style.fill.as_deref()) {
                ctx.set_transform(affine_to_cpu(world));
                ctx.set_paint(fill);
                let glyphs = glyph.glyphs.iter().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&glyph.font)
                    .font_size(glyph.font_size)
                    .fill_glyphs(glyphs);
            }
        }
    }

    if layered {
        ctx.pop_layer();
    }
    Ok(())
}

fn paint(color: Option<&str>) -> Option<vello_cpu::peniko::Color> {
    color.and_then(Rgba8::parse).map(to_color)
}

fn to_color(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let pt = |p: kurbo::Point| vello_cpu::kurbo::Point::new(p.x, p.y);
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(pt(p)),
            PathEl::LineTo(p) => out.line_to(pt(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(pt(p1), pt(p2)),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(pt(p1), pt(p2), pt(p3)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
