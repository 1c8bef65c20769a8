#![allow(dead_code)]

use lottie_core::{AnimationGraph, NodeId};
use lottie_data::model::LottieJson;
use serde_json::json;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn static_layer_transform() -> serde_json::Value {
    json!({
        "o": { "a": 0, "k": 100 },
        "r": { "a": 0, "k": 0 },
        "p": { "a": 0, "k": [250, 250, 0] },
        "a": { "a": 0, "k": [0, 0, 0] },
        "s": { "a": 0, "k": [100, 100, 100] }
    })
}

/// Minimal animation with a single shape layer named "Shape Layer".
pub fn create_test_lottie(shapes: serde_json::Value) -> LottieJson {
    create_test_lottie_with_transform(static_layer_transform(), shapes)
}

pub fn create_test_lottie_with_transform(
    ks: serde_json::Value,
    shapes: serde_json::Value,
) -> LottieJson {
    let json = json!({
        "v": "5.5.0",
        "fr": 60,
        "ip": 0,
        "op": 60,
        "w": 500,
        "h": 500,
        "nm": "Test",
        "layers": [
            {
                "ty": 4,
                "ind": 1,
                "ip": 0,
                "op": 60,
                "nm": "Shape Layer",
                "ks": ks,
                "shapes": shapes
            }
        ],
        "markers": [
            { "cm": "intro", "tm": 0, "dr": 30 }
        ]
    });

    serde_json::from_value(json).expect("Failed to parse test lottie")
}

pub fn build(shapes: serde_json::Value) -> AnimationGraph {
    init_tracing();
    AnimationGraph::from_model(&create_test_lottie(shapes)).expect("graph builds")
}

pub fn id(graph: &AnimationGraph, keypath: &str) -> NodeId {
    graph
        .find_node(keypath)
        .unwrap_or_else(|| panic!("no node at {keypath}"))
}

pub fn stroke(name: &str) -> serde_json::Value {
    json!({
        "ty": "st",
        "nm": name,
        "c": { "a": 0, "k": [1, 0, 0, 1] },
        "o": { "a": 0, "k": 100 },
        "w": { "a": 0, "k": 4 },
        "lc": 2,
        "lj": 2
    })
}

pub fn fill(name: &str) -> serde_json::Value {
    json!({
        "ty": "fl",
        "nm": name,
        "c": { "a": 0, "k": [0, 0, 1, 1] },
        "o": { "a": 0, "k": 50 }
    })
}

/// `Group 1` slides from x = 0 to x = 10 over frames 0..10 and holds an
/// `Inner` group (with `Fill 1`) and `Stroke 1`.
pub fn sliding_group() -> serde_json::Value {
    json!([
        {
            "ty": "gr",
            "nm": "Group 1",
            "it": [
                { "ty": "gr", "nm": "Inner", "it": [ fill("Fill 1") ] },
                stroke("Stroke 1"),
                {
                    "ty": "tr",
                    "p": { "a": 1, "k": [
                        { "t": 0, "s": [0, 0] },
                        { "t": 10, "s": [10, 0] }
                    ] },
                    "a": { "a": 0, "k": [0, 0] },
                    "s": { "a": 0, "k": [100, 100] },
                    "r": { "a": 0, "k": 0 },
                    "o": { "a": 0, "k": 100 }
                }
            ]
        }
    ])
}
