//! The deformable lattice: mass points joined by elastic links.
//!
//! Points live in one contiguous `Vec` in row-major order and links refer to
//! them by index, so a point can be shared by up to four links without any
//! ownership ambiguity.
//!
//! Each step has two phases:
//!
//! 1. [`Lattice::integrate`] - Verlet integration with damping, a weak spring
//!    back to the rest position, then an externally supplied displacement
//!    (the cursor field) applied directly to position.
//! 2. [`Lattice::relax`] - a fixed number of constraint passes pulling every
//!    link back towards its rest length.
//!
//! Pinned points are skipped by both phases.

use glam::Vec2;
use rand::Rng;

/// Margin, in pixels, added on every side of the viewport so the lattice
/// edges never show on screen.
pub const PADDING: f32 = 150.0;

/// Fraction of the offset from rest removed every step, per axis.
pub const RESTORE: f32 = 0.015;

/// Constraint passes per step.
pub const RELAX_ITERATIONS: usize = 3;

/// Largest lattice [`Lattice::build`] will allocate.
pub const MAX_POINTS: usize = 1 << 22;

/// One lattice node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassPoint {
    /// Current position.
    pub position: Vec2,
    /// Position one step ago; the difference is the implicit velocity.
    pub previous: Vec2,
    /// Home position the restoring term pulls towards.
    pub rest: Vec2,
    /// Pinned points are never moved by integration or relaxation.
    pub pinned: bool,
    seed: f32,
}

impl MassPoint {
    fn new(rest: Vec2, seed: f32) -> Self {
        Self {
            position: rest,
            previous: rest,
            rest,
            pinned: false,
            seed,
        }
    }

    /// Per-point random value in `[0, 1)`, fixed at creation.
    #[inline]
    pub fn seed(&self) -> f32 {
        self.seed
    }

    /// Displacement over the last step.
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.position - self.previous
    }

    /// Magnitude of the last step's displacement.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity().length()
    }

    /// Manhattan distance from the rest position.
    #[inline]
    pub fn displacement(&self) -> f32 {
        let d = self.position - self.rest;
        d.x.abs() + d.y.abs()
    }
}

/// An elastic connection between two adjacent points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    a: usize,
    b: usize,
    rest_length: f32,
}

impl Link {
    /// Index of the left/top endpoint.
    #[inline]
    pub fn a(&self) -> usize {
        self.a
    }

    /// Index of the right/bottom endpoint.
    #[inline]
    pub fn b(&self) -> usize {
        self.b
    }

    #[inline]
    pub fn rest_length(&self) -> f32 {
        self.rest_length
    }
}

/// The full grid of points and links.
#[derive(Debug, Clone, Default)]
pub struct Lattice {
    points: Vec<MassPoint>,
    links: Vec<Link>,
    cols: usize,
    rows: usize,
    spacing: f32,
}

impl Lattice {
    /// A lattice with no points.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of columns and rows needed to cover a `width` x `height`
    /// viewport plus [`PADDING`] on every side.
    ///
    /// Returns `None` when any input is non-finite or not strictly positive,
    /// or when the lattice would hold more than [`MAX_POINTS`] points.
    pub fn dimensions(width: f32, height: f32, spacing: f32) -> Option<(usize, usize)> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !(valid(width) && valid(height) && valid(spacing)) {
            return None;
        }

        let cols = ((width + PADDING * 2.0) / spacing).ceil();
        let rows = ((height + PADDING * 2.0) / spacing).ceil();
        // Float-to-int casts saturate, so bound the counts before casting.
        let budget = MAX_POINTS as f32;
        if !(cols <= budget && rows <= budget) {
            return None;
        }

        let (cols, rows) = (cols as usize, rows as usize);
        match cols.checked_mul(rows) {
            Some(total) if total <= MAX_POINTS => Some((cols, rows)),
            _ => None,
        }
    }

    /// Build a fresh lattice covering the viewport.
    ///
    /// Every point starts at rest at `(-PADDING + col * spacing,
    /// -PADDING + row * spacing)`. Each cell links to its right neighbour and
    /// the one below it; there are no diagonals and no wraparound. Invalid
    /// dimensions produce an empty lattice.
    pub fn build<R: Rng + ?Sized>(width: f32, height: f32, spacing: f32, rng: &mut R) -> Self {
        let Some((cols, rows)) = Self::dimensions(width, height, spacing) else {
            return Self::empty();
        };

        let origin = Vec2::splat(-PADDING);
        let mut points = Vec::with_capacity(cols * rows);
        for row in 0..rows {
            for col in 0..cols {
                let rest = origin + Vec2::new(col as f32, row as f32) * spacing;
                points.push(MassPoint::new(rest, rng.gen::<f32>()));
            }
        }

        let mut links = Vec::with_capacity(2 * cols * rows);
        for row in 0..rows {
            for col in 0..cols {
                let index = row * cols + col;
                if col + 1 < cols {
                    links.push(Link {
                        a: index,
                        b: index + 1,
                        rest_length: spacing,
                    });
                }
                if row + 1 < rows {
                    links.push(Link {
                        a: index,
                        b: index + cols,
                        rest_length: spacing,
                    });
                }
            }
        }

        Self {
            points,
            links,
            cols,
            rows,
            spacing,
        }
    }

    #[inline]
    pub fn points(&self) -> &[MassPoint] {
        &self.points
    }

    #[inline]
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Row-major index of the point at `(col, row)`.
    pub fn index(&self, col: usize, row: usize) -> Option<usize> {
        (col < self.cols && row < self.rows).then(|| row * self.cols + col)
    }

    /// Mutable access to a single point, e.g. to perturb it.
    pub fn point_mut(&mut self, index: usize) -> Option<&mut MassPoint> {
        self.points.get_mut(index)
    }

    /// Pin a point in place. Returns false if the index is out of range.
    pub fn pin(&mut self, index: usize) -> bool {
        self.set_pinned(index, true)
    }

    /// Release a pinned point. Returns false if the index is out of range.
    pub fn unpin(&mut self, index: usize) -> bool {
        self.set_pinned(index, false)
    }

    fn set_pinned(&mut self, index: usize, pinned: bool) -> bool {
        match self.points.get_mut(index) {
            Some(p) => {
                p.pinned = pinned;
                true
            }
            None => false,
        }
    }

    /// Advance every free point by one Verlet step.
    ///
    /// `displacement` is called once per point after the inertial and
    /// restoring terms have been applied and returns an offset that is added
    /// straight onto the position.
    pub fn integrate<F>(&mut self, damping: f32, mut displacement: F)
    where
        F: FnMut(&MassPoint) -> Vec2,
    {
        for p in self.points.iter_mut().filter(|p| !p.pinned) {
            let velocity = (p.position - p.previous) * damping;
            p.previous = p.position;
            p.position += velocity;

            p.position += (p.rest - p.position) * RESTORE;

            let offset = displacement(p);
            if offset.is_finite() {
                p.position += offset;
            }
        }
    }

    /// Pull every link towards its rest length.
    ///
    /// Each pass moves both free endpoints by half of `stiffness` times the
    /// length error, treating them as equal masses. Zero-length links are
    /// skipped.
    pub fn relax(&mut self, stiffness: f32) {
        for _ in 0..RELAX_ITERATIONS {
            for link in &self.links {
                let p1 = self.points[link.a];
                let p2 = self.points[link.b];

                let delta = p2.position - p1.position;
                let dist = delta.length();
                if dist == 0.0 || !dist.is_finite() {
                    continue;
                }

                let diff = (link.rest_length - dist) / dist * stiffness;
                let offset = delta * diff * 0.5;

                if !p1.pinned {
                    self.points[link.a].position -= offset;
                }
                if !p2.pinned {
                    self.points[link.b].position += offset;
                }
            }
        }
    }
}
