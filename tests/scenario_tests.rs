//! End-to-end behaviour of the engine through its public API.

use glam::Vec2;
use spacetime_fabric::config::SimulationConfig;
use spacetime_fabric::field::HISTORY_CAP;
use spacetime_fabric::render::FrameRecorder;
use spacetime_fabric::simulation::{Driver, Simulation};
use spacetime_fabric::visuals::{parse_hex_color, resolve_color, Rgb, Theme};
use spacetime_fabric::ConfigError;

fn simulation(config: SimulationConfig, width: f32, height: f32) -> Simulation {
    let mut sim = Simulation::new(config, 1234);
    sim.on_resize(width, height);
    sim
}

fn max_displacement(sim: &Simulation) -> f32 {
    sim.lattice()
        .points()
        .iter()
        .map(|p| p.displacement())
        .fold(0.0, f32::max)
}

// ============================================================================
// Lattice layout
// ============================================================================

#[test]
fn test_rebuild_layout_for_many_spacings() {
    for spacing in [7.0, 20.0, 35.0, 64.5, 400.0] {
        let mut config = SimulationConfig::default();
        config.grid.spacing = spacing;
        let sim = simulation(config, 1024.0, 768.0);
        let lattice = sim.lattice();

        let cols = ((1024.0f32 + 300.0) / spacing).ceil() as usize;
        let rows = ((768.0f32 + 300.0) / spacing).ceil() as usize;
        assert_eq!(lattice.cols(), cols, "spacing {}", spacing);
        assert_eq!(lattice.rows(), rows, "spacing {}", spacing);
        assert_eq!(lattice.points().len(), cols * rows);
        assert_eq!(lattice.links().len(), (cols - 1) * rows + cols * (rows - 1));

        for link in lattice.links() {
            let a = lattice.points()[link.a()].position;
            let b = lattice.points()[link.b()].position;
            assert!((a.distance(b) - spacing).abs() < 1e-3);
        }
    }
}

// ============================================================================
// Integrator invariants
// ============================================================================

#[test]
fn test_pinned_points_never_move() {
    let mut config = SimulationConfig::default();
    config.signal.enabled = true;
    config.pulsing.enabled = true;
    config.gravity.divergence = 0.5;
    let mut sim = simulation(config, 400.0, 300.0);

    let pinned: Vec<usize> = (0..sim.lattice().points().len()).step_by(7).collect();
    for &i in &pinned {
        assert!(sim.lattice_mut().pin(i));
    }
    let before: Vec<Vec2> = pinned.iter().map(|&i| sim.lattice().points()[i].position).collect();

    for step in 0..300 {
        let t = step as f32 * 0.1;
        sim.on_pointer_move(200.0 + 100.0 * t.cos(), 150.0 + 80.0 * t.sin());
        sim.on_frame(0.016);
    }

    for (&i, &p) in pinned.iter().zip(&before) {
        assert_eq!(sim.lattice().points()[i].position, p);
    }
    assert!(max_displacement(&sim) > 0.0);
}

#[test]
fn test_rest_is_fixed_point_without_field() {
    let mut config = SimulationConfig::default();
    config.grid.damping = 0.0;
    config.gravity.strength = 0.0;
    let mut sim = simulation(config, 300.0, 300.0);
    sim.on_pointer_move(150.0, 150.0);

    for _ in 0..500 {
        sim.on_frame(0.016);
    }
    assert_eq!(max_displacement(&sim), 0.0);
}

// ============================================================================
// Pointer history
// ============================================================================

#[test]
fn test_history_capped_and_collapsed() {
    let mut config = SimulationConfig::default();
    config.signal.enabled = true;
    let mut sim = simulation(config, 200.0, 200.0);

    for i in 0..(HISTORY_CAP + 120) {
        sim.on_pointer_move(i as f32, 0.0);
        sim.on_frame(0.016);
        assert!(sim.source().history().len() <= HISTORY_CAP);
    }
    assert_eq!(sim.source().history().len(), HISTORY_CAP);

    let mut config = sim.config().clone();
    config.signal.enabled = false;
    sim.set_config(config);
    sim.on_frame(0.016);
    assert!(sim.source().history().len() <= 1);
}

// ============================================================================
// Demo preset with a fixed pointer
// ============================================================================

#[test]
fn test_fixed_pointer_stays_bounded() {
    let config = SimulationConfig::default();
    let radius = config.gravity.radius;
    let mut sim = simulation(config, 800.0, 600.0);

    let index = sim.lattice().index(10, 10).unwrap();
    let rest = sim.lattice().points()[index].position;
    sim.on_pointer_move(rest.x, rest.y);

    let mut late_max: f32 = 0.0;
    for step in 0..200 {
        sim.on_frame(1.0 / 60.0);
        let p = sim.lattice().points()[index];
        let offset = p.position.distance(rest);
        assert!(offset.is_finite());
        assert!(offset < radius, "step {}: offset {}", step, offset);
        if step >= 100 {
            late_max = late_max.max(offset);
        }
    }

    assert!(late_max > 0.0);
    assert!(sim.lattice().points().iter().all(|p| p.position.is_finite()));
}

// ============================================================================
// Colours
// ============================================================================

#[test]
fn test_custom_color_parsing() {
    assert_eq!(parse_hex_color("#ff00aa"), Some(Rgb::new(255, 0, 170)));
    assert_eq!(parse_hex_color("notacolor"), None);
    for theme in [Theme::Neon, Theme::Matrix, Theme::Sunset] {
        assert_eq!(resolve_color(Some("notacolor"), theme), theme.rgb());
        assert_eq!(resolve_color(Some("#ff00aa"), theme), Rgb::new(255, 0, 170));
    }
}

// ============================================================================
// Motion-only rendering
// ============================================================================

/// A settled frame needs the pointer outside the radius of every visible
/// point. A pointer held inside the view keeps the points nearest to it
/// oscillating around the well, so they never drop below the thresholds.
#[test]
fn test_motion_only_settled_draws_nothing() {
    let mut config = SimulationConfig::default();
    config.render.motion.enabled = true;
    config.render.motion.speed_threshold = 0.5;
    config.render.motion.displacement_threshold = 0.6;
    let mut sim = simulation(config, 300.0, 200.0);

    // Disturb the lattice, then park the pointer far away and let it settle.
    sim.on_pointer_move(150.0, 100.0);
    for _ in 0..60 {
        sim.on_frame(0.016);
    }
    let mut frame = FrameRecorder::new();
    sim.render(&mut frame);
    assert!(frame.fill_count() > 0);

    sim.on_pointer_move(-1000.0, -1000.0);
    for _ in 0..3000 {
        sim.on_frame(0.016);
    }
    sim.render(&mut frame);
    assert_eq!(frame.fill_count(), 0);
    assert_eq!(frame.line_count(), 0);
}

// ============================================================================
// Configuration boundary
// ============================================================================

#[test]
fn test_minimal_json_preset_runs() {
    let json = r##"{
        "grid": { "spacing": 40, "stiffness": 0.3, "damping": 0.9 },
        "gravity": { "strength": 8, "radius": 200, "activationLatency": 50 },
        "pulsing": { "enabled": true },
        "signal": { "enabled": true, "randomness": 0.5 },
        "render": {
            "points": true, "lines": false, "colorScheme": "matrix",
            "particles": { "baseSize": 2, "baseOpacity": 0.6, "shape": "star", "color": "#00ff00" }
        }
    }"##;
    let config = SimulationConfig::from_json(json).unwrap();
    let mut sim = simulation(config, 640.0, 480.0);

    sim.on_pointer_move(320.0, 240.0);
    for _ in 0..120 {
        sim.on_frame(0.016);
    }
    assert!(max_displacement(&sim) > 0.0);

    let mut frame = FrameRecorder::new();
    sim.render(&mut frame);
    assert_eq!(frame.line_count(), 0);
    assert!(frame.fill_count() > 0);
}

#[test]
fn test_invalid_spacing_rejected() {
    let json = r#"{
        "grid": { "spacing": 0, "stiffness": 0.2, "damping": 0.9 },
        "gravity": { "strength": 10, "radius": 280 },
        "pulsing": { "enabled": false },
        "signal": { "enabled": false },
        "render": {
            "points": true, "lines": true, "colorScheme": "neon",
            "particles": { "baseSize": 1, "baseOpacity": 0.4 }
        }
    }"#;
    assert!(matches!(
        SimulationConfig::from_json(json),
        Err(ConfigError::Invalid { field: "grid.spacing", .. })
    ));
}
