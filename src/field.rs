//! The cursor's gravity well.
//!
//! The field source is the pointer. Every step the engine builds a
//! [`ForceField`] from the current configuration, pointer state, clock and
//! phase, then asks it for a per-point displacement while integrating the
//! lattice.
//!
//! # Evaluation order
//!
//! 1. **Activation latency** - the well stays off until the pointer has been
//!    still for `activationLatency` milliseconds.
//! 2. **Pulsing** - `strength + strength * depth * sin(phase)`.
//! 3. **Delayed propagation** - each point reacts to where the pointer was
//!    `distance / speed` steps ago, read from a bounded history, and to the
//!    pulse phase retarded by the same delay.
//! 4. **Divergence** - the radius wobbles with the angle around the target.
//! 5. **Pull** - inside the radius the point moves by
//!    `(1 - d / radius)^2 * strength` towards the target.

use std::collections::VecDeque;

use glam::Vec2;

use crate::config::{GravityConfig, PulsingConfig, SimulationConfig};
use crate::lattice::MassPoint;

/// Maximum number of past pointer positions kept for delayed propagation.
pub const HISTORY_CAP: usize = 500;

/// Assumed duration of one step when converting a delay to phase.
pub const SECONDS_PER_STEP: f32 = 0.016;

/// Phase advanced per second at pulsing speed 1.
pub const PHASE_RATE: f32 = 1.25;

/// Common period of every phase-dependent term: the pulse and all three
/// divergence lobes repeat after `20π`.
pub const PHASE_PERIOD: f64 = 20.0 * std::f64::consts::PI;

/// Floor on the jittered propagation speed, in pixels per step.
pub const MIN_PROPAGATION_SPEED: f32 = 1.0;

/// Floor on the divergence-modulated radius, as a fraction of the base.
pub const MIN_RADIUS_FACTOR: f32 = 0.1;

/// Where the pointer starts before the first move: far off-screen.
const OFFSCREEN: Vec2 = Vec2::new(-1000.0, -1000.0);

/// The pointer and its recent trail.
#[derive(Debug, Clone)]
pub struct FieldSource {
    position: Vec2,
    /// Most recent first.
    history: VecDeque<Vec2>,
    /// Engine-clock seconds of the last move, `None` until the first one.
    last_move: Option<f64>,
}

impl Default for FieldSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldSource {
    pub fn new() -> Self {
        Self {
            position: OFFSCREEN,
            history: VecDeque::new(),
            last_move: None,
        }
    }

    /// Move the pointer, stamping the move with the engine clock.
    pub fn move_to(&mut self, position: Vec2, now: f64) {
        self.position = position;
        self.last_move = Some(now);
    }

    /// Live pointer position.
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Past positions, most recent first.
    #[inline]
    pub fn history(&self) -> &VecDeque<Vec2> {
        &self.history
    }

    /// Seconds since the pointer last moved, `None` if it never has.
    pub fn time_since_move(&self, now: f64) -> Option<f32> {
        self.last_move.map(|t| (now - t).max(0.0) as f32)
    }

    /// Update the trail for one step.
    ///
    /// With delayed propagation the live position is pushed to the front and
    /// the oldest sample dropped beyond [`HISTORY_CAP`]. Without it the trail
    /// collapses to the live position as soon as it holds more than one entry.
    pub fn record(&mut self, delayed: bool) {
        if delayed {
            self.history.push_front(self.position);
            self.history.truncate(HISTORY_CAP);
        } else if self.history.len() > 1 {
            self.history.clear();
            self.history.push_front(self.position);
        }
    }

    /// Pointer position `delay` steps ago.
    ///
    /// Saturates to the oldest sample when the delay exceeds the recorded
    /// trail and falls back to the live position when there is no trail.
    pub fn sample(&self, delay: usize) -> Vec2 {
        if self.history.is_empty() {
            return self.position;
        }
        let index = delay.min(self.history.len() - 1);
        self.history[index]
    }
}

/// Strength after the activation latency gate.
///
/// The well is suppressed while the pointer moved less than
/// `activation_latency` milliseconds ago.
pub fn active_strength(gravity: &GravityConfig, time_since_move: Option<f32>) -> f32 {
    match time_since_move {
        Some(secs) if gravity.activation_latency > 0.0 && secs * 1000.0 < gravity.activation_latency => 0.0,
        _ => gravity.strength,
    }
}

/// Reduce an unbounded phase into `[0, PHASE_PERIOD)` without changing any
/// phase-dependent term.
pub fn wrap_phase(phase: f64) -> f32 {
    phase.rem_euclid(PHASE_PERIOD) as f32
}

/// Apply the periodic pulse to a base strength.
pub fn modulate(base: f32, phase: f32, pulsing: &PulsingConfig) -> f32 {
    if !pulsing.enabled {
        return base;
    }
    base + base * pulsing.depth * phase.sin()
}

/// Propagation speed seen along `angle` by a point with the given seed.
///
/// Two sinusoids of the direction give an angular texture, the seed adds
/// per-point jitter; the result never drops below [`MIN_PROPAGATION_SPEED`].
pub fn propagation_speed(nominal: f32, randomness: f32, angle: f32, seed: f32) -> f32 {
    if randomness <= 0.0 {
        return nominal;
    }

    let angular = (angle * 3.5).sin() + (angle * 5.2 + 1.2).cos() * 0.7;
    let spatial = (seed - 0.5) * 2.0;
    let noise = (angular + spatial * 0.5) * 0.3;
    (nominal * (1.0 + noise * randomness)).max(MIN_PROPAGATION_SPEED)
}

/// Whole steps a signal needs to cover `distance` at `speed`.
pub fn delay_steps(distance: f32, speed: f32) -> usize {
    // `as` saturates: an infinite delay reads the oldest sample, NaN reads the newest.
    (distance / speed).floor() as usize
}

/// Interaction radius along `angle` at the given phase.
///
/// Three lobes of different frequency drift with the phase; the radius is
/// floored at [`MIN_RADIUS_FACTOR`] of the base.
pub fn effective_radius(base: f32, divergence: f32, angle: f32, phase: f32) -> f32 {
    if divergence <= 0.0 {
        return base;
    }

    let lobe1 = (angle * 3.0 + phase).sin();
    let lobe2 = (angle * 5.0 - phase * 0.7 + 1.5).cos();
    let lobe3 = (angle * 7.3 + phase * 0.2 + 3.0).sin();
    let shape = (lobe1 + lobe2 * 0.7 + lobe3 * 0.4) / 2.1;
    base * (1.0 + shape * divergence).max(MIN_RADIUS_FACTOR)
}

/// Quadratic falloff inside `radius`, `None` outside it.
pub fn pull_factor(distance: f32, radius: f32) -> Option<f32> {
    if !(distance < radius) {
        return None;
    }
    let normalized = distance / radius;
    Some((1.0 - normalized).powi(2))
}

/// The field for a single step.
#[derive(Debug, Clone, Copy)]
pub struct ForceField<'a> {
    config: &'a SimulationConfig,
    phase: f32,
    active_strength: f32,
    global_strength: f32,
}

impl<'a> ForceField<'a> {
    /// Resolve the step-wide strengths.
    ///
    /// `now` and `phase` are the engine clock and the unbounded pulse phase.
    pub fn new(config: &'a SimulationConfig, source: &FieldSource, now: f64, phase: f64) -> Self {
        let phase = wrap_phase(phase);
        let active = active_strength(&config.gravity, source.time_since_move(now));
        Self {
            config,
            phase,
            active_strength: active,
            global_strength: modulate(active, phase, &config.pulsing),
        }
    }

    /// Strength after the latency gate, before pulsing.
    #[inline]
    pub fn active_strength(&self) -> f32 {
        self.active_strength
    }

    /// Pulsed strength at the current phase.
    #[inline]
    pub fn global_strength(&self) -> f32 {
        self.global_strength
    }

    /// Offset to add to `point`'s position this step.
    pub fn displacement(&self, point: &MassPoint, source: &FieldSource) -> Vec2 {
        let gravity = &self.config.gravity;
        let signal = &self.config.signal;
        let pulsing = &self.config.pulsing;

        let mut target = source.position();
        let mut strength = self.global_strength;

        if signal.enabled {
            let offset = point.position - target;
            let speed = propagation_speed(
                signal.speed,
                signal.randomness,
                offset.y.atan2(offset.x),
                point.seed(),
            );
            let delay = delay_steps(offset.length(), speed);
            target = source.sample(delay);

            strength = if pulsing.enabled {
                let retarded = self.phase - delay as f32 * SECONDS_PER_STEP * PHASE_RATE * pulsing.speed;
                modulate(self.active_strength, retarded, pulsing)
            } else {
                self.active_strength
            };
        }

        let offset = point.position - target;
        let angle = offset.y.atan2(offset.x);
        let radius = effective_radius(gravity.radius, gravity.divergence, angle, self.phase);

        match pull_factor(offset.length(), radius) {
            Some(pull) => -Vec2::new(angle.cos(), angle.sin()) * (pull * strength),
            None => Vec2::ZERO,
        }
    }
}
