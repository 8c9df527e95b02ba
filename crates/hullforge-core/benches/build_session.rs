//! Benchmarks for build-session placement and hull generation

use criterion::{criterion_group, criterion_main, Criterion};
use hullforge_core::generation::{generate_structure, GeneratorConfig};
use hullforge_logic::grid::Position;
use hullforge_logic::session::BuildSession;
use hullforge_logic::structure::Structure;
use hullforge_logic::upgrade::BuildKind;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::hint::black_box;

/// Grow a straight line of `len` cells, one placement per step.
fn grow_line(len: i32) -> Structure {
    let mut session = BuildSession::new(Structure::new(0, 0));
    session.start();
    for i in 0..len {
        // Padding keeps the newest cell one column from the right edge.
        let pos = if i == 0 {
            Position::new(0, 0)
        } else {
            Position::new(1, i + 1)
        };
        session.place(pos, BuildKind::Fuselage);
    }
    session.into_structure()
}

fn bench_session(c: &mut Criterion) {
    c.bench_function("session_line_32", |b| b.iter(|| grow_line(black_box(32))));

    let config = GeneratorConfig {
        max_width: 16,
        max_height: 16,
        cell_count: 100,
        ..Default::default()
    };
    c.bench_function("generate_100_cells", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(black_box(9));
            generate_structure(&config, &mut rng)
        })
    });

    let hull = grow_line(32);
    c.bench_function("recompute_mass_32", |b| {
        b.iter(|| {
            let mut s = hull.clone();
            s.recompute_mass_properties();
            black_box(s.mass())
        })
    });
}

criterion_group!(benches, bench_session);
criterion_main!(benches);
