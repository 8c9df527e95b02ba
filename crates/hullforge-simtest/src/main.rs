//! Hullforge Headless Build Harness
//!
//! Drives the logic and core crates through randomized build sessions and
//! checks structure invariants after every step. Runs entirely in-process,
//! no rendering, no input layer.
//!
//! Usage:
//!   cargo run -p hullforge-simtest
//!   cargo run -p hullforge-simtest -- --verbose
//!   cargo run -p hullforge-simtest -- --seed 1234

use hullforge_core::designs::{load_stock_designs, parse_designs};
use hullforge_core::generation::{generate_structure, GeneratorConfig};
use hullforge_core::prelude::*;
use hullforge_logic::connectivity;
use hullforge_logic::design::ShipDesign;
use hullforge_logic::grid::Position;
use hullforge_logic::session::{BuildSession, SessionState, BUILD_MARGIN};
use hullforge_logic::upgrade::BuildKind;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

const EPS: f32 = 1e-3;
const SESSIONS: u64 = 40;
const STEPS_PER_SESSION: usize = 30;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().any(|a| a == "--verbose");
    let seed = args
        .iter()
        .position(|a| a == "--seed")
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x5EED);

    init_tracing(verbose);
    info!(seed, verbose, "Starting build harness");

    println!("=== Hullforge Build Harness (seed {}) ===\n", seed);

    let mut results = Vec::new();

    // 1. Stock design catalog
    results.extend(validate_stock_designs(verbose));

    // 2. Connectivity reference cases
    results.extend(validate_connectivity(verbose));

    // 3. Randomized build sessions
    results.extend(validate_build_sessions(seed, verbose));

    // 4. Expand / shrink round trips
    results.extend(validate_resizing(seed, verbose));

    // 5. Shipyard commit semantics
    results.extend(validate_shipyard(seed, verbose));

    // 6. Generator sweep
    results.extend(validate_generation(seed, verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        tracing::warn!(failed, "Build harness reported failures");
        std::process::exit(1);
    }
}

/// `RUST_LOG` wins when set; otherwise `--verbose` picks debug output.
/// The subscriber also captures the core crate's `log` records.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

// ── Shared checks ───────────────────────────────────────────────────────

/// Stored mass equals the sum over cells.
fn mass_matches(s: &Structure) -> bool {
    let expected: f32 = s.cells().map(|(_, cell)| cell.mass()).sum();
    (s.mass() - expected).abs() < EPS
}

/// Stored center of mass equals the mass-weighted cell average.
fn com_matches(s: &Structure) -> bool {
    if s.is_empty() {
        return true;
    }
    let (mut row, mut col) = (0.0f32, 0.0f32);
    for (pos, cell) in s.cells() {
        row += pos.row as f32 * cell.mass();
        col += pos.col as f32 * cell.mass();
    }
    let com = s.center_of_mass();
    (com.row - row / s.mass()).abs() < EPS && (com.col - col / s.mass()).abs() < EPS
}

/// Minimal grid: every border row and column holds a cell.
fn is_minimal(s: &Structure) -> bool {
    if s.is_empty() {
        return s.width() == 0 && s.height() == 0;
    }
    let cells: Vec<Position> = s.cells().map(|(pos, _)| pos).collect();
    cells.iter().any(|p| p.row == 0)
        && cells.iter().any(|p| p.col == 0)
        && cells.iter().any(|p| p.row == s.height() - 1)
        && cells.iter().any(|p| p.col == s.width() - 1)
}

fn random_candidate(s: &Structure, kind: BuildKind, rng: &mut impl Rng) -> Option<Position> {
    let candidates: Vec<Position> = s
        .grid()
        .iter_all()
        .map(|(pos, _)| pos)
        .filter(|&pos| s.can_build_at(pos, kind))
        .collect();
    candidates.choose(rng).copied()
}

fn random_kind(rng: &mut impl Rng) -> BuildKind {
    // Bias toward structure so upgrades have somewhere to go
    if rng.gen_bool(0.6) {
        BuildKind::Fuselage
    } else {
        let kinds = BuildKind::all();
        kinds[rng.gen_range(0..kinds.len())]
    }
}

// ── 1. Stock Designs ────────────────────────────────────────────────────

fn validate_stock_designs(verbose: bool) -> Vec<TestResult> {
    println!("--- Stock Designs ---");
    let mut results = Vec::new();

    let loaded = match load_stock_designs() {
        Ok(l) => l,
        Err(e) => {
            results.push(TestResult {
                name: "stock_load".into(),
                passed: false,
                detail: format!("{}", e),
            });
            return results;
        }
    };

    results.push(TestResult {
        name: "stock_not_empty".into(),
        passed: !loaded.is_empty(),
        detail: format!("{} designs loaded", loaded.len()),
    });

    for design in &loaded {
        let s = &design.structure;
        let ok = s.is_connected() && mass_matches(s) && com_matches(s);
        if verbose {
            println!(
                "  {:<10} {}x{} cells={} mass={:.2} value={}",
                design.name,
                s.width(),
                s.height(),
                s.cell_count(),
                s.mass(),
                s.resource_value()
            );
        }
        results.push(TestResult {
            name: format!("stock_{}_valid", design.name.to_lowercase()),
            passed: ok,
            detail: format!("connected={} mass={:.2}", s.is_connected(), s.mass()),
        });

        // Serialize back to design form and rebuild
        let rebuilt = ShipDesign::from_structure(s)
            .build()
            .map(|r| r.grid_snapshot() == s.grid_snapshot());
        results.push(TestResult {
            name: format!("stock_{}_roundtrip", design.name.to_lowercase()),
            passed: matches!(rebuilt, Ok(true)),
            detail: format!("{:?}", rebuilt.map_err(|e| e.to_string())),
        });
    }

    let bad = r#"[{ "name": "Gap", "width": 3, "height": 1,
        "components": [ { "x": 0, "y": 0 }, { "x": 2, "y": 0 } ] }]"#;
    let rejected = parse_designs(bad)
        .map(|d| d.iter().all(|s| s.design.build().is_err()))
        .unwrap_or(false);
    results.push(TestResult {
        name: "design_rejects_disconnected".into(),
        passed: rejected,
        detail: "two cells with a gap".into(),
    });

    results
}

// ── 2. Connectivity ─────────────────────────────────────────────────────

fn validate_connectivity(_verbose: bool) -> Vec<TestResult> {
    println!("--- Connectivity ---");
    let p = |r, c| Position::new(r, c);
    let cases: Vec<(&str, Vec<Position>, bool)> = vec![
        ("empty", vec![], false),
        ("single", vec![p(0, 0)], true),
        ("pair", vec![p(0, 0), p(0, 1)], true),
        ("diagonal", vec![p(0, 0), p(1, 1)], false),
        ("l_shape", vec![p(0, 0), p(1, 0), p(1, 1)], true),
        ("gap", vec![p(0, 0), p(0, 2)], false),
        ("repeated_position", vec![p(3, 3), p(3, 3), p(3, 4)], false),
    ];

    cases
        .into_iter()
        .map(|(name, positions, expected)| {
            let got = connectivity::is_connected(&positions);
            TestResult {
                name: format!("connectivity_{}", name),
                passed: got == expected,
                detail: format!("expected {}, got {}", expected, got),
            }
        })
        .collect()
}

// ── 3. Build Sessions ───────────────────────────────────────────────────

fn validate_build_sessions(seed: u64, verbose: bool) -> Vec<TestResult> {
    println!("--- Build Sessions ---");
    let mut results = Vec::new();
    let mut rng = StdRng::seed_from_u64(seed);

    let mut placements = 0usize;
    let mut rejected = 0usize;
    let mut failures: Vec<String> = Vec::new();

    for session_idx in 0..SESSIONS {
        let mut session = BuildSession::new(Structure::new(0, 0));
        session.start();

        for step in 0..STEPS_PER_SESSION {
            let kind = random_kind(&mut rng);
            let Some(pos) = random_candidate(session.structure(), kind, &mut rng) else {
                rejected += 1;
                continue;
            };
            if !session.place(pos, kind) {
                failures.push(format!("s{} step {}: valid {:?} at {:?} refused", session_idx, step, kind, pos));
                continue;
            }
            placements += 1;

            let s = session.structure();
            if session.state() != SessionState::Expanded {
                failures.push(format!("s{} step {}: not expanded after place", session_idx, step));
            }
            if !s.is_connected() || !mass_matches(s) || !com_matches(s) {
                failures.push(format!("s{} step {}: invariant broken", session_idx, step));
            }
        }

        // An invalid placement must leave the structure untouched
        let before = session.structure().clone();
        let outside = Position::new(-1, -1);
        if session.place(outside, BuildKind::Fuselage) || session.structure() != &before {
            failures.push(format!("s{}: off-grid placement changed the structure", session_idx));
        }

        let committed = session.into_structure();
        if !is_minimal(&committed) || !committed.is_connected() {
            failures.push(format!("s{}: committed hull not minimal/connected", session_idx));
        }
        if verbose && session_idx < 3 {
            println!(
                "  session {}: {}x{} cells={} mass={:.2}",
                session_idx,
                committed.width(),
                committed.height(),
                committed.cell_count(),
                committed.mass()
            );
        }
    }

    results.push(TestResult {
        name: "session_invariants".into(),
        passed: failures.is_empty(),
        detail: if failures.is_empty() {
            format!(
                "{} sessions, {} placements, {} steps without a candidate",
                SESSIONS, placements, rejected
            )
        } else {
            format!("{} failures, first: {}", failures.len(), failures[0])
        },
    });

    // Margin: a padded single cell sits in the middle of its grid
    let mut single = Structure::new(1, 1);
    single.set_cell(Position::ORIGIN, None);
    let mut session = BuildSession::new(single);
    session.start();
    let s = session.structure();
    let expected_side = 1 + BUILD_MARGIN;
    results.push(TestResult {
        name: "session_margin".into(),
        passed: s.width() == expected_side
            && s.height() == expected_side
            && s.has_cell(Position::new(1, 1)),
        detail: format!("{}x{} after start", s.width(), s.height()),
    });

    results
}

// ── 4. Resizing ─────────────────────────────────────────────────────────

fn validate_resizing(seed: u64, _verbose: bool) -> Vec<TestResult> {
    println!("--- Resizing ---");
    let mut rng = StdRng::seed_from_u64(seed ^ 0xA5A5);
    let config = GeneratorConfig::default();
    let mut failures = Vec::new();

    for i in 0..30 {
        let s = generate_structure(&config, &mut rng);
        let rows = rng.gen_range(0..5);
        let cols = rng.gen_range(0..5);
        let centered = rng.gen_bool(0.5);

        let expanded = s.expand(rows, cols, centered);
        if expanded.width() != s.width() + cols || expanded.height() != s.height() + rows {
            failures.push(format!("#{}: expand dimensions", i));
        }
        if (expanded.mass() - s.mass()).abs() > EPS || !com_matches(&expanded) {
            failures.push(format!("#{}: expand moved mass", i));
        }

        let mut back = expanded;
        back.shrink_to_fit();
        if back.grid_snapshot() != s.grid_snapshot() {
            failures.push(format!("#{}: expand+shrink not identity", i));
        }
    }

    vec![TestResult {
        name: "expand_shrink_roundtrip".into(),
        passed: failures.is_empty(),
        detail: failures
            .first()
            .cloned()
            .unwrap_or_else(|| "30 random hulls".into()),
    }]
}

// ── 5. Shipyard ─────────────────────────────────────────────────────────

fn validate_shipyard(seed: u64, verbose: bool) -> Vec<TestResult> {
    println!("--- Shipyard ---");
    let mut results = Vec::new();
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(1));
    let mut yard = Shipyard::new();

    let config = GeneratorConfig::default();
    let ships: Vec<_> = (0..5).map(|_| yard.spawn_generated(&config, &mut rng)).collect();
    yard.update();

    let mut frozen = true;
    let mut grew = true;
    for &ship in &ships {
        let committed = yard.mass_properties(ship);
        if yard.begin_build(ship).is_err() {
            frozen = false;
            continue;
        }
        let mut added = 0.0f32;
        for _ in 0..5 {
            let Some(editing) = yard.editing_structure(ship) else {
                break;
            };
            let Some(pos) = random_candidate(&editing, BuildKind::Fuselage, &mut rng) else {
                break;
            };
            if matches!(yard.place(ship, pos, BuildKind::Fuselage), Ok(true)) {
                added += 1.0;
            }
            yard.update();
            frozen &= yard.mass_properties(ship) == committed;
        }
        let _ = yard.finish_build(ship);
        yard.update();
        let before = committed.map(|p| p.mass).unwrap_or(0.0);
        let after = yard.mass_properties(ship).map(|p| p.mass).unwrap_or(0.0);
        grew &= (after - before - added).abs() < EPS;
        if verbose {
            println!(
                "  {:<16} mass {:.2} -> {:.2}",
                yard.ship_name(ship).unwrap_or_default(),
                before,
                after
            );
        }
    }

    results.push(TestResult {
        name: "shipyard_mass_frozen_while_editing".into(),
        passed: frozen,
        detail: format!("{} ships edited", ships.len()),
    });
    results.push(TestResult {
        name: "shipyard_mass_updates_on_finish".into(),
        passed: grew,
        detail: format!("fleet mass {:.2}", yard.fleet_mass()),
    });

    results
}

// ── 6. Generation ───────────────────────────────────────────────────────

fn validate_generation(seed: u64, _verbose: bool) -> Vec<TestResult> {
    println!("--- Generation ---");
    let configs = [
        GeneratorConfig::default(),
        GeneratorConfig {
            max_width: 4,
            max_height: 4,
            cell_count: 16,
            upgrade_chance: 1.0,
            max_stage: 3,
        },
        GeneratorConfig {
            max_width: 20,
            max_height: 3,
            cell_count: 45,
            upgrade_chance: 0.1,
            max_stage: 1,
        },
    ];

    configs
        .iter()
        .enumerate()
        .map(|(i, config)| {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_mul(31).wrapping_add(i as u64));
            let mut bad = 0;
            for _ in 0..20 {
                let s = generate_structure(config, &mut rng);
                let fits = s.width() <= config.max_width && s.height() <= config.max_height;
                if !(fits && s.is_connected() && mass_matches(&s) && is_minimal(&s)) {
                    bad += 1;
                }
            }
            TestResult {
                name: format!("generation_config_{}", i),
                passed: bad == 0,
                detail: format!(
                    "{}x{} target {} cells: {} of 20 bad",
                    config.max_width, config.max_height, config.cell_count, bad
                ),
            }
        })
        .collect()
}
