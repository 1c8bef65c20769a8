//! Per-frame update pass benchmarks.
//!
//! Run with: `cargo bench -p lottie-core --bench animator_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lottie_core::animatable::{Easing, Keyframe, KeyframeSeries};
use lottie_core::AnimationGraph;
use lottie_data::model::LottieJson;
use serde_json::json;

/// One layer holding `groups` groups, each with an animated stroke and a
/// static fill.
fn animation(groups: usize) -> LottieJson {
    let items: Vec<serde_json::Value> = (0..groups)
        .map(|idx| {
            json!({
                "ty": "gr",
                "nm": format!("Group {}", idx + 1),
                "it": [
                    {
                        "ty": "st",
                        "c": { "k": [1, 0, 0, 1] },
                        "o": { "k": 100 },
                        "w": { "a": 1, "k": [
                            { "t": 0, "s": [1], "o": { "x": 0.33, "y": 0 }, "i": { "x": 0.67, "y": 1 } },
                            { "t": 60, "s": [9] }
                        ] },
                        "d": [
                            { "n": "d", "v": { "k": 4 } },
                            { "n": "g", "v": { "k": 2 } }
                        ]
                    },
                    { "ty": "fl", "c": { "k": [0, 0, 1, 1] }, "o": { "k": 100 } },
                    { "ty": "tr", "p": { "k": [idx as f32, 0] } }
                ]
            })
        })
        .collect();

    serde_json::from_value(json!({
        "v": "5.7.0", "ip": 0, "op": 60, "fr": 60, "w": 512, "h": 512,
        "layers": [ { "ty": 4, "nm": "Layer", "shapes": items } ]
    }))
    .expect("valid animation")
}

fn bench_graph_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph_update");

    for size in [10usize, 100, 1000] {
        let mut graph = AnimationGraph::from_model(&animation(size)).expect("graph");
        graph.update(0.0);

        group.bench_with_input(BenchmarkId::new("animated", size), &size, |bench, _| {
            let mut frame = 0.0_f32;
            bench.iter(|| {
                frame = (frame + 1.0) % 60.0;
                black_box(graph.update(black_box(frame)));
            });
        });

        group.bench_with_input(BenchmarkId::new("same_frame", size), &size, |bench, _| {
            graph.update(30.0);
            bench.iter(|| black_box(graph.update(black_box(30.0))));
        });
    }

    group.finish();
}

fn bench_keyframe_evaluate(c: &mut Criterion) {
    let keyframes: Vec<Keyframe<f32>> = (0..64)
        .map(|idx| {
            Keyframe::new(idx as f32 * 10.0, idx as f32).with_easing(Easing::CubicBezier {
                out: glam::Vec2::new(0.42, 0.0),
                inn: glam::Vec2::new(0.58, 1.0),
            })
        })
        .collect();
    let series = KeyframeSeries::new(keyframes).expect("non-empty series");

    c.bench_function("keyframe_evaluate_cubic", |bench| {
        let mut frame = 0.0_f32;
        bench.iter(|| {
            frame = (frame + 3.7) % 640.0;
            black_box(series.evaluate(black_box(frame)))
        });
    });
}

criterion_group!(benches, bench_graph_update, bench_keyframe_evaluate);
criterion_main!(benches);
