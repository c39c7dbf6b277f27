//! Benchmarks for the per-frame CPU work.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use spacetime_fabric::prelude::*;

fn full_hd(config: SimulationConfig) -> Simulation {
    let mut sim = Simulation::new(config, 7);
    sim.on_resize(1920.0, 1080.0);
    sim.on_pointer_move(960.0, 540.0);
    // Warm up so the lattice is deformed and the history is populated.
    for _ in 0..60 {
        sim.on_frame(1.0 / 60.0);
    }
    sim
}

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("step");

    group.bench_function("demo_preset", |b| {
        let mut sim = full_hd(SimulationConfig::default());
        b.iter(|| sim.on_frame(black_box(1.0 / 60.0)))
    });

    group.bench_function("all_effects", |b| {
        let mut config = SimulationConfig::default();
        config.pulsing.enabled = true;
        config.signal.enabled = true;
        config.signal.randomness = 0.5;
        config.gravity.divergence = 0.4;
        let mut sim = full_hd(config);
        b.iter(|| sim.on_frame(black_box(1.0 / 60.0)))
    });

    for spacing in [20.0f32, 35.0, 60.0] {
        group.bench_with_input(BenchmarkId::new("spacing", spacing), &spacing, |b, &spacing| {
            let mut config = SimulationConfig::default();
            config.grid.spacing = spacing;
            let mut sim = full_hd(config);
            b.iter(|| sim.on_frame(black_box(1.0 / 60.0)))
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    group.bench_function("recorder", |b| {
        let mut sim = full_hd(SimulationConfig::default());
        let mut frame = FrameRecorder::new();
        b.iter(|| {
            sim.render(&mut frame);
            black_box(frame.commands().len())
        })
    });

    group.bench_function("tessellate_star", |b| {
        let mut config = SimulationConfig::default();
        config.render.particles.shape = ParticleShape::Star;
        let mut sim = full_hd(config);
        let mut mesh = spacetime_fabric::gpu::MeshBuilder::new(true);
        b.iter(|| {
            sim.render(&mut mesh);
            black_box(mesh.vertices().len())
        })
    });

    group.finish();
}

criterion_group!(benches, bench_step, bench_render);
criterion_main!(benches);
