use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use scc_replay_core::engine::SccEngine;
use scc_replay_core::graph::GraphGenerator;
use scc_replay_core::playback::Frame;

fn full_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_run");
    for n in [16, 128, 1024] {
        let graph = GraphGenerator::seeded(1).generate(n).expect("graph");
        group.bench_with_input(BenchmarkId::from_parameter(n), &graph, |b, graph| {
            b.iter(|| {
                let mut engine = SccEngine::new();
                engine.start_or_resume(black_box(graph)).expect("run");
                engine.components().len()
            })
        });
    }
    group.finish();
}

fn replay_last_frame(c: &mut Criterion) {
    let graph = GraphGenerator::seeded(2).generate(512).expect("graph");
    let mut engine = SccEngine::new();
    engine.start_or_resume(&graph).expect("run");
    let last = engine.steps_produced().len() - 1;

    c.bench_function("replay_last_frame_512", |b| {
        b.iter(|| Frame::replay(engine.steps_produced(), black_box(last), graph.vertex_count()))
    });
}

criterion_group!(benches, full_run, replay_last_frame);
criterion_main!(benches);
