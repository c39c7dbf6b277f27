//! Triangle tessellation of draw calls.
//!
//! [`MeshBuilder`] is the GPU-side [`Surface`]: every line and shape becomes
//! a run of triangles in a single vertex list, which the backend uploads and
//! draws in one call. Draw order is preserved, so later shapes blend over
//! earlier ones exactly as they would on a canvas.

use glam::Vec2;

use crate::render::{PathSegment, Shape, Surface};
use crate::shader::Vertex;
use crate::visuals::Rgba;

/// Segments per quadratic curve when flattening paths.
const CURVE_STEPS: usize = 8;

const MIN_ROUND_SEGMENTS: usize = 8;
const MAX_ROUND_SEGMENTS: usize = 48;

/// Collects triangles for one frame.
#[derive(Debug, Clone)]
pub struct MeshBuilder {
    vertices: Vec<Vertex>,
    /// Convert colours to linear light for an sRGB render target.
    linearize: bool,
}

impl MeshBuilder {
    pub fn new(linearize: bool) -> Self {
        Self {
            vertices: Vec::new(),
            linearize,
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    fn color(&self, color: Rgba) -> [f32; 4] {
        let [r, g, b, a] = color.to_f32();
        if self.linearize {
            [srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b), a]
        } else {
            [r, g, b, a]
        }
    }

    fn triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) {
        for p in [a, b, c] {
            self.vertices.push(Vertex {
                position: p.to_array(),
                color,
            });
        }
    }

    /// Fan from `center` around a closed outline.
    fn fan(&mut self, center: Vec2, outline: &[Vec2], color: [f32; 4]) {
        if outline.len() < 2 {
            return;
        }
        for (i, &a) in outline.iter().enumerate() {
            let b = outline[(i + 1) % outline.len()];
            self.triangle(center, a, b, color);
        }
    }

    fn ellipse(&mut self, center: Vec2, radii: Vec2, color: [f32; 4]) {
        let segments = round_segments(radii.max_element());
        let outline: Vec<Vec2> = (0..segments)
            .map(|i| {
                let angle = i as f32 / segments as f32 * std::f32::consts::TAU;
                center + Vec2::new(angle.cos(), angle.sin()) * radii
            })
            .collect();
        self.fan(center, &outline, color);
    }
}

impl Default for MeshBuilder {
    fn default() -> Self {
        Self::new(false)
    }
}

impl Surface for MeshBuilder {
    fn clear(&mut self, _width: f32, _height: f32) {
        self.vertices.clear();
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        let Some(dir) = (to - from).try_normalize() else {
            return;
        };
        let half = dir.perp() * (width * 0.5);
        let color = self.color(color);

        self.triangle(from - half, from + half, to + half, color);
        self.triangle(from - half, to + half, to - half, color);
    }

    fn fill(&mut self, shape: &Shape, color: Rgba) {
        let color = self.color(color);
        match shape {
            Shape::Circle { center, radius } => self.ellipse(*center, Vec2::splat(*radius), color),
            Shape::Ellipse { center, radii } => self.ellipse(*center, *radii, color),
            Shape::Rect { min, size } => {
                let max = *min + *size;
                let (tr, bl) = (Vec2::new(max.x, min.y), Vec2::new(min.x, max.y));
                self.triangle(*min, tr, max, color);
                self.triangle(*min, max, bl, color);
            }
            Shape::Polygon(vertices) => {
                if let Some((&first, rest)) = vertices.split_first() {
                    for pair in rest.windows(2) {
                        self.triangle(first, pair[0], pair[1], color);
                    }
                }
            }
            Shape::Path(segments) => {
                let outline = flatten(segments);
                if outline.is_empty() {
                    return;
                }
                // Particle outlines are star-shaped around their centroid.
                let centroid = outline.iter().copied().sum::<Vec2>() / outline.len() as f32;
                self.fan(centroid, &outline, color);
            }
        }
    }
}

/// Turn a path into a closed polyline. A trailing point equal to the start
/// is dropped since the outline closes itself.
pub fn flatten(segments: &[PathSegment]) -> Vec<Vec2> {
    let mut points: Vec<Vec2> = Vec::new();
    let mut cursor = Vec2::ZERO;

    for segment in segments {
        match *segment {
            PathSegment::MoveTo(p) | PathSegment::LineTo(p) => {
                points.push(p);
                cursor = p;
            }
            PathSegment::QuadTo { control, to } => {
                for step in 1..=CURVE_STEPS {
                    let t = step as f32 / CURVE_STEPS as f32;
                    let u = 1.0 - t;
                    points.push(cursor * (u * u) + control * (2.0 * u * t) + to * (t * t));
                }
                cursor = to;
            }
        }
    }

    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    points
}

fn round_segments(radius: f32) -> usize {
    ((radius * 4.0).ceil() as usize).clamp(MIN_ROUND_SEGMENTS, MAX_ROUND_SEGMENTS)
}

/// sRGB transfer function, per channel.
#[inline]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}
