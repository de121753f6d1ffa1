//! Gauntlet Headless Episode Harness
//!
//! Generates a run of episodes in-process and checks every layout:
//! validation sweep, entity accounting, determinism across engines.
//!
//! Usage:
//!   cargo run -p gauntlet-simtest
//!   cargo run -p gauntlet-simtest -- --seed 7 --episodes 200 --verbose
//!   cargo run -p gauntlet-simtest -- --dump layout.json

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use clap::Parser;
use gauntlet_core::config::ArenaConfig;
use gauntlet_core::engine::ArenaEngine;
use gauntlet_core::snapshot::{ArenaSnapshot, SnapshotError};
use gauntlet_core::validation::{expected_entity_count, validate_snapshot, Severity};
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(name = "gauntlet-simtest")]
#[command(about = "Generate episodes and validate every arena layout")]
struct Args {
    /// Seed for the engine's random stream
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Number of episodes to generate
    #[arg(short, long, default_value = "50")]
    episodes: u32,

    /// Agents in the arena
    #[arg(long, default_value = "2")]
    agents: u32,

    /// Challenge zones along the arena length
    #[arg(long, default_value = "3")]
    challenges: u32,

    /// Arena width; the door width follows as a third of it
    #[arg(long, default_value = "20.0")]
    world_width: f32,

    /// Write the last episode's layout as JSON ("-" for stdout)
    #[arg(long)]
    dump: Option<PathBuf>,

    /// Print every check and debug logs
    #[arg(short, long)]
    verbose: bool,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    println!("=== Gauntlet Episode Harness ===\n");

    let config = ArenaConfig {
        num_agents: args.agents,
        num_challenges: args.challenges,
        world_width: args.world_width,
        door_width: args.world_width / 3.0,
        max_dynamic_entities: (2 * args.challenges).max(ArenaConfig::default().max_dynamic_entities),
        ..Default::default()
    };
    info!(seed = args.seed, episodes = args.episodes, "Starting harness");

    let mut results = Vec::new();

    // 1. Configuration
    let config_ok = validate_config(&config, &mut results);

    if config_ok {
        // 2. Episode sweep
        let last = validate_episodes(&config, &args, &mut results);

        // 3. Determinism across engines
        validate_determinism(&config, &args, &mut results);

        // 4. Snapshot encoding
        if let Some(snapshot) = &last {
            validate_encoding(snapshot, &mut results);
        }

        if let (Some(path), Some(snapshot)) = (&args.dump, &last) {
            dump_layout(path, snapshot, &mut results);
        }
    }

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || args.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Configuration ────────────────────────────────────────────────────

fn validate_config(config: &ArenaConfig, results: &mut Vec<TestResult>) -> bool {
    println!("--- Configuration ---");

    let outcome = config.validate();
    let passed = outcome.is_ok();
    results.push(TestResult {
        name: "config_valid".into(),
        passed,
        detail: match outcome {
            Ok(()) => format!(
                "{} agents, {} challenges, {}x{} arena",
                config.num_agents, config.num_challenges, config.world_width, config.world_length
            ),
            Err(e) => e.to_string(),
        },
    });

    results.push(TestResult {
        name: "challenge_length".into(),
        passed: config.challenge_length() > config.wall_width,
        detail: format!(
            "zone length {:.2}, wall width {:.2}",
            config.challenge_length(),
            config.wall_width
        ),
    });

    passed
}

// ── 2. Episode Sweep ────────────────────────────────────────────────────

fn validate_episodes(
    config: &ArenaConfig,
    args: &Args,
    results: &mut Vec<TestResult>,
) -> Option<ArenaSnapshot> {
    println!("--- Episodes ---");

    let mut engine = match ArenaEngine::new(config.clone(), args.seed) {
        Ok(engine) => engine,
        Err(e) => {
            results.push(TestResult {
                name: "engine_create".into(),
                passed: false,
                detail: e.to_string(),
            });
            return None;
        }
    };

    let expected = expected_entity_count(config);
    let mut hard = 0usize;
    let mut warnings = 0usize;
    let mut first_error = None;
    let mut count_mismatch = None;
    let mut leaf_mismatch = None;
    let mut view_mismatch = None;
    let mut last = None;

    for _ in 0..args.episodes {
        engine.new_episode();
        let snapshot = engine.snapshot();

        for e in validate_snapshot(&snapshot) {
            match e.severity {
                Severity::Error => {
                    hard += 1;
                    if first_error.is_none() {
                        first_error =
                            Some(format!("episode {}: [{}] {}", snapshot.episode, e.category, e.message));
                    }
                }
                Severity::Warning => warnings += 1,
            }
        }

        let entities = engine.world.len() as usize;
        if entities != expected && count_mismatch.is_none() {
            count_mismatch = Some(format!("episode {}: {} entities", snapshot.episode, entities));
        }
        if engine.physics().len() != expected && leaf_mismatch.is_none() {
            leaf_mismatch = Some(format!(
                "episode {}: {} leaves",
                snapshot.episode,
                engine.physics().len()
            ));
        }
        if engine.views().view_count() != config.num_agents as usize && view_mismatch.is_none() {
            view_mismatch = Some(format!(
                "episode {}: {} views",
                snapshot.episode,
                engine.views().view_count()
            ));
        }

        last = Some(snapshot);
    }

    results.push(TestResult {
        name: "layouts_valid".into(),
        passed: hard == 0,
        detail: first_error.unwrap_or_else(|| {
            format!("{} episodes, {} warnings", args.episodes, warnings)
        }),
    });

    results.push(TestResult {
        name: "entity_count_stable".into(),
        passed: count_mismatch.is_none(),
        detail: count_mismatch.unwrap_or_else(|| format!("{} entities every episode", expected)),
    });

    results.push(TestResult {
        name: "broadphase_rebuilt".into(),
        passed: leaf_mismatch.is_none(),
        detail: leaf_mismatch.unwrap_or_else(|| format!("{} leaves every episode", expected)),
    });

    results.push(TestResult {
        name: "one_view_per_agent".into(),
        passed: view_mismatch.is_none(),
        detail: view_mismatch.unwrap_or_else(|| format!("{} views", config.num_agents)),
    });

    if args.verbose {
        if let Some(snapshot) = &last {
            for door in &snapshot.doors {
                println!(
                    "    zone {}: door at x={:+.2}, y={:.2} (walls {:.2} | {:.2})",
                    door.challenge, door.center_x, door.y, door.left_len, door.right_len
                );
            }
        }
    }

    last
}

// ── 3. Determinism ──────────────────────────────────────────────────────

fn validate_determinism(config: &ArenaConfig, args: &Args, results: &mut Vec<TestResult>) {
    println!("--- Determinism ---");

    let engines = (
        ArenaEngine::new(config.clone(), args.seed),
        ArenaEngine::new(config.clone(), args.seed),
    );
    let (mut a, mut b) = match engines {
        (Ok(a), Ok(b)) => (a, b),
        _ => {
            results.push(TestResult {
                name: "same_seed_same_bytes".into(),
                passed: false,
                detail: "engine creation failed".into(),
            });
            return;
        }
    };

    let rounds = args.episodes.min(20);
    let mut divergence = None;
    for _ in 0..rounds {
        a.new_episode();
        b.new_episode();
        let bytes = (a.snapshot().to_bytes(), b.snapshot().to_bytes());
        match bytes {
            (Ok(x), Ok(y)) if x == y => {}
            (Ok(_), Ok(_)) => {
                divergence = Some(format!("episode {} differs", a.episode()));
                break;
            }
            (Err(e), _) | (_, Err(e)) => {
                divergence = Some(format!("encode failed: {}", e));
                break;
            }
        }
    }

    results.push(TestResult {
        name: "same_seed_same_bytes".into(),
        passed: divergence.is_none(),
        detail: divergence.unwrap_or_else(|| format!("{} episodes identical", rounds)),
    });

    // A different seed must produce a different first layout
    let differs = match (
        ArenaEngine::new(config.clone(), args.seed),
        ArenaEngine::new(config.clone(), args.seed.wrapping_add(1)),
    ) {
        (Ok(mut reference), Ok(mut other)) => {
            reference.new_episode();
            other.new_episode();
            reference.snapshot().agents != other.snapshot().agents
        }
        _ => false,
    };
    results.push(TestResult {
        name: "seed_changes_layout".into(),
        passed: differs,
        detail: format!("seed {} vs {}", args.seed, args.seed.wrapping_add(1)),
    });
}

// ── 4. Encoding ─────────────────────────────────────────────────────────

fn validate_encoding(snapshot: &ArenaSnapshot, results: &mut Vec<TestResult>) {
    println!("--- Encoding ---");

    let decoded = snapshot
        .to_bytes()
        .and_then(|bytes| ArenaSnapshot::from_bytes(&bytes).map(|s| (bytes.len(), s)));
    let (passed, detail) = match decoded {
        Ok((len, ref s)) if s == snapshot => (true, format!("{} bytes", len)),
        Ok(_) => (false, "decoded snapshot differs".into()),
        Err(e) => (false, e.to_string()),
    };
    results.push(TestResult {
        name: "snapshot_bytes".into(),
        passed,
        detail,
    });
}

fn dump_layout(path: &PathBuf, snapshot: &ArenaSnapshot, results: &mut Vec<TestResult>) {
    let written = if path.as_os_str() == "-" {
        snapshot.write_json(io::stdout().lock())
    } else {
        File::create(path)
            .map_err(SnapshotError::from)
            .and_then(|file| snapshot.write_json(BufWriter::new(file)))
    };

    results.push(TestResult {
        name: "layout_dump".into(),
        passed: written.is_ok(),
        detail: match written {
            Ok(()) => format!("wrote {}", path.display()),
            Err(e) => e.to_string(),
        },
    });
}
