//! The engine: one lattice, one pointer, one configuration snapshot.
//!
//! A host owns a [`Simulation`] and forwards three kinds of events to it,
//! described by the [`Driver`] trait: frames, pointer moves and resizes.
//! Everything runs on the caller's thread; there is no internal timer.
//!
//! ```
//! use spacetime_fabric::prelude::*;
//!
//! let mut sim = Simulation::new(SimulationConfig::default(), 7);
//! sim.on_resize(800.0, 600.0);
//! sim.on_pointer_move(400.0, 300.0);
//!
//! for _ in 0..60 {
//!     sim.on_frame(1.0 / 60.0);
//! }
//!
//! let mut frame = FrameRecorder::new();
//! sim.render(&mut frame);
//! assert!(frame.fill_count() > 0);
//! ```

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{ConfigDiff, SimulationConfig};
use crate::field::{FieldSource, ForceField, PHASE_RATE};
use crate::lattice::{Lattice, MAX_POINTS};
use crate::render::{Renderer, Surface, Viewport};
use crate::time::clamp_delta;

/// Host-facing event interface.
pub trait Driver {
    /// Advance by `dt` seconds of wall-clock time.
    fn on_frame(&mut self, dt: f32);

    /// The pointer moved to `(x, y)` in viewport pixels.
    fn on_pointer_move(&mut self, x: f32, y: f32);

    /// The viewport changed size.
    fn on_resize(&mut self, width: f32, height: f32);
}

/// The spacetime fabric simulation.
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    lattice: Lattice,
    source: FieldSource,
    renderer: Renderer,
    rng: StdRng,
    viewport: Viewport,
    /// Engine clock in seconds; sum of clamped step deltas.
    elapsed: f64,
    /// Unbounded pulse phase in radians.
    phase: f64,
    steps: u64,
}

impl Simulation {
    /// Create an engine with no lattice yet.
    ///
    /// `seed` drives the per-point jitter seeds, so two engines built with
    /// the same seed and viewport produce identical lattices.
    pub fn new(config: SimulationConfig, seed: u64) -> Self {
        Self {
            config,
            lattice: Lattice::empty(),
            source: FieldSource::new(),
            renderer: Renderer::new(),
            rng: StdRng::seed_from_u64(seed),
            viewport: Viewport::default(),
            elapsed: 0.0,
            phase: 0.0,
            steps: 0,
        }
    }

    /// Rebuild the lattice for a `width` x `height` viewport.
    ///
    /// Non-positive or non-finite sizes, and sizes whose lattice would exceed
    /// [`MAX_POINTS`], are ignored; the previous lattice and viewport stay in
    /// place.
    pub fn rebuild(&mut self, width: f32, height: f32) {
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            log::warn!("Ignoring rebuild for invalid viewport {}x{}", width, height);
            return;
        }

        self.regrid(Viewport::new(width, height));
    }

    /// Rebuild at the current viewport, discarding all motion.
    pub fn reset(&mut self) {
        if self.viewport.width > 0.0 && self.viewport.height > 0.0 {
            self.regrid(self.viewport);
        }
    }

    fn regrid(&mut self, viewport: Viewport) {
        let spacing = self.config.grid.spacing;
        if Lattice::dimensions(viewport.width, viewport.height, spacing).is_none() {
            log::warn!(
                "Ignoring rebuild: {}x{} at spacing {} exceeds {} points",
                viewport.width,
                viewport.height,
                spacing,
                MAX_POINTS
            );
            return;
        }

        self.viewport = viewport;
        self.lattice = Lattice::build(viewport.width, viewport.height, spacing, &mut self.rng);
        log::debug!(
            "Built {}x{} lattice ({} points, {} links) for {}x{} at spacing {}",
            self.lattice.cols(),
            self.lattice.rows(),
            self.lattice.points().len(),
            self.lattice.links().len(),
            self.viewport.width,
            self.viewport.height,
            spacing
        );
    }

    /// Move the gravity well.
    pub fn set_pointer(&mut self, x: f32, y: f32) {
        self.source.move_to(Vec2::new(x, y), self.elapsed);
    }

    /// Swap in a new configuration snapshot.
    ///
    /// A spacing change rebuilds the lattice at the current viewport; every
    /// other change applies from the next step on. The snapshot is expected
    /// to be validated already, see [`SimulationConfig::validate`].
    pub fn set_config(&mut self, config: SimulationConfig) -> ConfigDiff {
        debug_assert!(
            config.validate().is_ok(),
            "unvalidated config passed to set_config: {:?}",
            config.validate()
        );
        let diff = self.config.diff(&config);
        self.config = config;

        if diff.needs_regrid() {
            self.reset();
        }
        if !diff.is_empty() {
            log::debug!("Configuration changed: {:?}", diff.changed);
        }

        diff
    }

    /// Advance the simulation by one step.
    ///
    /// `dt` is clamped to `[0, MAX_DELTA]` and only moves the clock and the
    /// pulse phase; the lattice advances by exactly one step regardless.
    pub fn step(&mut self, dt: f32) {
        let dt = clamp_delta(dt);
        self.elapsed += f64::from(dt);
        self.phase += f64::from(dt * PHASE_RATE * self.config.pulsing.speed);

        self.source.record(self.config.signal.enabled);

        let field = ForceField::new(&self.config, &self.source, self.elapsed, self.phase);
        let source = &self.source;
        self.lattice
            .integrate(self.config.grid.damping, |p| field.displacement(p, source));
        self.lattice.relax(self.config.grid.stiffness);

        self.steps += 1;
    }

    /// Draw the current state onto `surface`.
    pub fn render<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        self.renderer
            .draw(&self.lattice, &self.source, &self.config, self.viewport, surface);
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// Mutable access for pinning or nudging points.
    pub fn lattice_mut(&mut self) -> &mut Lattice {
        &mut self.lattice
    }

    pub fn source(&self) -> &FieldSource {
        &self.source
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Engine clock in seconds.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Pulse phase in radians, never wrapped.
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Steps taken since creation.
    pub fn steps(&self) -> u64 {
        self.steps
    }
}

impl Driver for Simulation {
    fn on_frame(&mut self, dt: f32) {
        self.step(dt);
    }

    fn on_pointer_move(&mut self, x: f32, y: f32) {
        self.set_pointer(x, y);
    }

    fn on_resize(&mut self, width: f32, height: f32) {
        self.rebuild(width, height);
    }
}
