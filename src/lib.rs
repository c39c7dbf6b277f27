//! # Spacetime Fabric
//!
//! A deformable lattice of mass points bent by a gravity well that follows
//! the cursor.
//!
//! The lattice is a grid of points held together by spring links. Every step
//! each point coasts on its own inertia, is pulled back towards its rest
//! position, and is sucked towards the pointer when inside its radius; the
//! links are then relaxed so neighbours drag each other along. The well can
//! pulse, switch on only once the pointer rests, propagate outwards at a
//! finite speed, and wobble its radius with angle.
//!
//! ## Quick Start
//!
//! ```
//! use spacetime_fabric::prelude::*;
//!
//! let mut sim = Simulation::new(SimulationConfig::default(), 42);
//! sim.on_resize(1280.0, 720.0);
//! sim.on_pointer_move(640.0, 360.0);
//!
//! for _ in 0..120 {
//!     sim.on_frame(1.0 / 60.0);
//! }
//!
//! // Draw into any `Surface`; `FrameRecorder` just keeps the commands.
//! let mut frame = FrameRecorder::new();
//! sim.render(&mut frame);
//! ```
//!
//! ## Configuration
//!
//! A [`SimulationConfig`] snapshot holds every tunable, grouped as the JSON
//! presets are:
//!
//! | Group | Controls |
//! |-------|----------|
//! | `grid` | spacing, link stiffness, velocity damping |
//! | `gravity` | strength, radius, divergence, activation latency |
//! | `pulsing` | sinusoidal strength modulation |
//! | `signal` | delayed propagation speed and randomness |
//! | `render` | points, links, motion-only mode, particle look, theme |
//!
//! Snapshots are swapped whole with [`Simulation::set_config`]; only a
//! spacing change rebuilds the lattice.
//!
//! ## Rendering
//!
//! The draw pass targets the [`Surface`] trait. The bundled viewer
//! ([`window::run`]) tessellates into triangles and presents them with
//! `wgpu`; [`FrameRecorder`] captures commands for tests.

pub mod config;
pub mod error;
pub mod field;
pub mod gpu;
pub mod input;
pub mod lattice;
pub mod render;
pub mod shader;
pub mod simulation;
pub mod time;
pub mod visuals;
pub mod window;

pub use config::{ConfigDiff, ConfigSection, SimulationConfig};
pub use error::{ConfigError, GpuError, ViewerError};
pub use field::{FieldSource, ForceField};
pub use glam::Vec2;
pub use lattice::{Lattice, Link, MassPoint};
pub use render::{DrawCommand, FrameRecorder, Renderer, Shape, Surface, Viewport};
pub use simulation::{Driver, Simulation};
pub use visuals::{ParticleShape, Rgb, Rgba, Theme};

/// Convenient re-exports for common usage.
///
/// ```
/// use spacetime_fabric::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{
        GravityConfig, GridConfig, MotionConfig, ParticleAppearance, PulsingConfig, RenderConfig,
        SignalConfig, SimulationConfig,
    };
    pub use crate::render::{FrameRecorder, Shape, Surface, Viewport};
    pub use crate::simulation::{Driver, Simulation};
    pub use crate::time::Time;
    pub use crate::visuals::{ParticleShape, Rgb, Rgba, Theme};
    pub use crate::Vec2;
}
