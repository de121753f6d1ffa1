use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use gauntlet_core::config::ArenaConfig;
use gauntlet_core::engine::ArenaEngine;

fn bench_new_episode(c: &mut Criterion) {
    let mut group = c.benchmark_group("new_episode");

    for (agents, challenges) in [(2_u32, 3_u32), (8, 6), (32, 8)] {
        let config = ArenaConfig {
            num_agents: agents,
            num_challenges: challenges,
            max_dynamic_entities: 2 * challenges,
            ..Default::default()
        };

        group.bench_function(format!("agents{}_challenges{}", agents, challenges), |b| {
            b.iter_batched(
                || ArenaEngine::new(config.clone(), 0xBEEF).expect("bench config is valid"),
                |mut engine| {
                    for _ in 0..16 {
                        engine.new_episode();
                    }
                    black_box(engine.separator_count())
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_new_episode);
criterion_main!(benches);
