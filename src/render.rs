//! Drawing the lattice.
//!
//! The render pass is backend-agnostic: it emits lines and filled [`Shape`]s
//! to any [`Surface`]. The windowed viewer tessellates them for the GPU
//! ([`crate::gpu::MeshBuilder`]); tests and benchmarks use
//! [`FrameRecorder`], which simply keeps the commands.
//!
//! # Visibility rules
//!
//! - Links are culled when their *first* endpoint is more than
//!   [`LINK_CULL_MARGIN`] outside the viewport, points beyond
//!   [`POINT_CULL_MARGIN`].
//! - In motion-only mode an element is drawn only while it moves; its opacity
//!   grows with how far its speed exceeds 80% of the threshold.
//! - Otherwise elements near the live pointer are emphasised.

use glam::Vec2;

use crate::config::{MotionConfig, SimulationConfig};
use crate::field::FieldSource;
use crate::lattice::{Lattice, MassPoint};
use crate::visuals::{parse_hex_color, resolve_color, ParticleShape, Rgb, Rgba};

/// Links whose first endpoint lies further outside the viewport are skipped.
pub const LINK_CULL_MARGIN: f32 = 100.0;

/// Points further outside the viewport are skipped.
pub const POINT_CULL_MARGIN: f32 = 20.0;

/// Motion opacity gain per unit of speed above the knee.
pub const MOTION_ALPHA_GAIN: f32 = 8.0;

/// Fraction of the speed threshold where motion opacity starts rising.
pub const MOTION_KNEE: f32 = 0.8;

/// Elements fainter than this are not drawn at all in motion-only mode.
pub const MIN_VISIBLE_ALPHA: f32 = 0.05;

/// Smallest particle size ever drawn.
pub const MIN_POINT_SIZE: f32 = 0.1;

const LINK_WIDTH: f32 = 1.0;
const LINK_BASE_ALPHA: f32 = 0.1;
const LINK_HIGHLIGHT_ALPHA: f32 = 0.6;
/// Links are emphasised within this multiple of the interaction radius.
const LINK_HIGHLIGHT_REACH: f32 = 1.5;

const POINT_HIGHLIGHT_SIZE: f32 = 2.0;
const POINT_HIGHLIGHT_ALPHA: f32 = 0.6;
const MOTION_GROWTH: f32 = 1.5;

const OVAL_SQUASH: f32 = 0.6;
const STAR_REACH: f32 = 1.5;
const STAR_PINCH: f32 = 0.1;

/// One segment of a filled outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    MoveTo(Vec2),
    LineTo(Vec2),
    QuadTo { control: Vec2, to: Vec2 },
}

/// A filled primitive in pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle { center: Vec2, radius: f32 },
    Ellipse { center: Vec2, radii: Vec2 },
    Rect { min: Vec2, size: Vec2 },
    /// Convex polygon, vertices in order.
    Polygon(Vec<Vec2>),
    /// Closed outline; the last point connects back to the first.
    Path(Vec<PathSegment>),
}

impl Shape {
    /// Geometry for a particle of the given appearance.
    pub fn particle(shape: ParticleShape, center: Vec2, size: f32) -> Self {
        match shape {
            ParticleShape::Circle => Shape::Circle { center, radius: size },
            ParticleShape::Oval => Shape::Ellipse {
                center,
                radii: Vec2::new(size, size * OVAL_SQUASH),
            },
            ParticleShape::Square => Shape::Rect {
                min: center - Vec2::splat(size),
                size: Vec2::splat(size * 2.0),
            },
            ParticleShape::Diamond => {
                // The square rotated by 45 degrees has its corners on the axes.
                let reach = size * std::f32::consts::SQRT_2;
                Shape::Polygon(vec![
                    center + Vec2::new(0.0, -reach),
                    center + Vec2::new(reach, 0.0),
                    center + Vec2::new(0.0, reach),
                    center + Vec2::new(-reach, 0.0),
                ])
            }
            ParticleShape::Star => {
                let tip = size * STAR_REACH;
                let pinch = size * STAR_PINCH;
                Shape::Path(vec![
                    PathSegment::MoveTo(center + Vec2::new(0.0, -tip)),
                    PathSegment::QuadTo {
                        control: center + Vec2::new(pinch, -pinch),
                        to: center + Vec2::new(tip, 0.0),
                    },
                    PathSegment::QuadTo {
                        control: center + Vec2::new(pinch, pinch),
                        to: center + Vec2::new(0.0, tip),
                    },
                    PathSegment::QuadTo {
                        control: center + Vec2::new(-pinch, pinch),
                        to: center + Vec2::new(-tip, 0.0),
                    },
                    PathSegment::QuadTo {
                        control: center + Vec2::new(-pinch, -pinch),
                        to: center + Vec2::new(0.0, -tip),
                    },
                ])
            }
        }
    }
}

/// A 2D drawing target.
pub trait Surface {
    /// Start a new frame covering `width` x `height` pixels.
    fn clear(&mut self, width: f32, height: f32);

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);

    fn fill(&mut self, shape: &Shape, color: Rgba);
}

/// A recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear { width: f32, height: f32 },
    Line { from: Vec2, to: Vec2, width: f32, color: Rgba },
    Fill { shape: Shape, color: Rgba },
}

/// A [`Surface`] that keeps the last frame's commands.
#[derive(Debug, Clone, Default)]
pub struct FrameRecorder {
    commands: Vec<DrawCommand>,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn line_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count()
    }

    pub fn fill_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Fill { .. }))
            .count()
    }
}

impl Surface for FrameRecorder {
    fn clear(&mut self, width: f32, height: f32) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear { width, height });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn fill(&mut self, shape: &Shape, color: Rgba) {
        self.commands.push(DrawCommand::Fill {
            shape: shape.clone(),
            color,
        });
    }
}

/// Size of the visible area in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether `p` lies inside the viewport grown by `margin` on every side.
    #[inline]
    pub fn contains(&self, p: Vec2, margin: f32) -> bool {
        p.x >= -margin && p.x <= self.width + margin && p.y >= -margin && p.y <= self.height + margin
    }
}

/// Opacity of a moving element in motion-only mode.
///
/// `None` means the element is not drawn: it is both slower and closer to
/// rest than the thresholds, or its opacity falls below
/// [`MIN_VISIBLE_ALPHA`].
pub fn motion_alpha(speed: f32, displacement: f32, motion: &MotionConfig) -> Option<f32> {
    if speed < motion.speed_threshold && displacement < motion.displacement_threshold {
        return None;
    }

    let alpha = ((speed - motion.speed_threshold * MOTION_KNEE) * MOTION_ALPHA_GAIN).min(1.0);
    (alpha >= MIN_VISIBLE_ALPHA).then_some(alpha)
}

/// Draws lattice state onto a [`Surface`].
///
/// Stateless apart from remembering the last custom colour it complained
/// about, so a bad override is logged once instead of every frame.
#[derive(Debug, Default)]
pub struct Renderer {
    rejected_color: Option<String>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw one frame.
    pub fn draw<S: Surface + ?Sized>(
        &mut self,
        lattice: &Lattice,
        source: &FieldSource,
        config: &SimulationConfig,
        viewport: Viewport,
        surface: &mut S,
    ) {
        surface.clear(viewport.width, viewport.height);

        let render = &config.render;
        if render.lines {
            self.draw_links(lattice, source, config, viewport, surface);
        }
        if render.points {
            self.draw_points(lattice, source, config, viewport, surface);
        }
    }

    fn draw_links<S: Surface + ?Sized>(
        &self,
        lattice: &Lattice,
        source: &FieldSource,
        config: &SimulationConfig,
        viewport: Viewport,
        surface: &mut S,
    ) {
        let motion = &config.render.motion;
        let theme = config.render.color_scheme.rgb();
        let reach = config.gravity.radius * LINK_HIGHLIGHT_REACH;
        let points = lattice.points();

        for link in lattice.links() {
            let p1 = &points[link.a()];
            let p2 = &points[link.b()];

            if !viewport.contains(p1.position, LINK_CULL_MARGIN) {
                continue;
            }

            let alpha = if motion.enabled {
                let speed = p1.speed().max(p2.speed());
                let displacement = p1.displacement().max(p2.displacement());
                match motion_alpha(speed, displacement, motion) {
                    Some(alpha) => alpha,
                    None => continue,
                }
            } else {
                let mid = (p1.position + p2.position) * 0.5;
                let dist = mid.distance(source.position());
                if dist < reach {
                    LINK_BASE_ALPHA + (1.0 - dist / reach) * LINK_HIGHLIGHT_ALPHA
                } else {
                    LINK_BASE_ALPHA
                }
            };

            surface.stroke_line(p1.position, p2.position, LINK_WIDTH, theme.with_alpha(alpha));
        }
    }

    fn draw_points<S: Surface + ?Sized>(
        &mut self,
        lattice: &Lattice,
        source: &FieldSource,
        config: &SimulationConfig,
        viewport: Viewport,
        surface: &mut S,
    ) {
        let shape = config.render.particles.shape;
        let base = self.point_color(config);

        for p in lattice.points() {
            if !viewport.contains(p.position, POINT_CULL_MARGIN) {
                continue;
            }

            let Some((size, alpha)) = point_appearance(p, source, config) else {
                continue;
            };

            surface.fill(&Shape::particle(shape, p.position, size), base.with_alpha(alpha));
        }
    }

    fn point_color(&mut self, config: &SimulationConfig) -> Rgb {
        let custom = config.render.particles.color.as_deref();
        if let Some(value) = custom {
            if parse_hex_color(value).is_none() && self.rejected_color.as_deref() != Some(value) {
                log::warn!("Ignoring unparsable particle color {:?}, using theme color", value);
                self.rejected_color = Some(value.to_owned());
            }
        }
        resolve_color(custom, config.render.color_scheme)
    }
}

/// Size and opacity of a point, `None` if motion-only mode hides it.
fn point_appearance(p: &MassPoint, source: &FieldSource, config: &SimulationConfig) -> Option<(f32, f32)> {
    let particles = &config.render.particles;
    let motion = &config.render.motion;
    let radius = config.gravity.radius;

    let centered = p.seed() - 0.5;
    let mut size = (particles.base_size + centered * particles.size_variance * 2.0).max(MIN_POINT_SIZE);
    let mut alpha = particles.base_opacity + centered * particles.opacity_variance;

    if motion.enabled {
        let motion_alpha = motion_alpha(p.speed(), p.displacement(), motion)?;
        alpha *= motion_alpha;
        size += motion_alpha * MOTION_GROWTH;
    } else {
        let dist_sq = p.position.distance_squared(source.position());
        if dist_sq < radius * radius {
            let factor = 1.0 - dist_sq.sqrt() / radius;
            size += factor * POINT_HIGHLIGHT_SIZE;
            alpha += factor * POINT_HIGHLIGHT_ALPHA;
        }
    }

    Some((size, alpha.clamp(0.0, 1.0)))
}
