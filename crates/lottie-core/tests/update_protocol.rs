//! Frame update pass: idempotence, propagation, enable/disable.
//! Run with: cargo test -p lottie-core --test update_protocol

mod common;

use common::{
    build, create_test_lottie_with_transform, fill, id, init_tracing, sliding_group,
    static_layer_transform, stroke,
};
use glam::{Vec2, Vec4};
use lottie_core::{AnimationGraph, NodeId, UpdateStats};
use serde_json::json;

fn world_origin(graph: &AnimationGraph, node: NodeId) -> Vec2 {
    graph
        .render_output(node)
        .and_then(|r| r.as_group())
        .map(|g| g.world_transform.transform_point2(Vec2::ZERO))
        .expect("group output")
}

fn last_update(graph: &AnimationGraph, node: NodeId) -> Option<f32> {
    graph.node(node).and_then(|n| n.last_update_frame())
}

mod idempotence {
    use super::*;

    #[test]
    fn test_same_frame_twice_rebuilds_nothing() {
        let mut graph = build(sliding_group());
        assert_eq!(graph.update(5.0), UpdateStats { visited: 5, rebuilt: 5 });

        let stroke = id(&graph, "Shape Layer.Group 1.Stroke 1");
        let before = graph
            .render_output(stroke)
            .and_then(|r| r.as_stroke())
            .cloned()
            .expect("stroke output");

        assert_eq!(graph.update(5.0), UpdateStats { visited: 5, rebuilt: 0 });
        let after = graph
            .render_output(stroke)
            .and_then(|r| r.as_stroke())
            .cloned()
            .expect("stroke output");
        assert_eq!(before, after);
    }

    #[test]
    fn test_static_animation_settles_after_first_frame() {
        let mut graph = build(json!([stroke("Stroke 1")]));
        assert_eq!(graph.update(0.0).rebuilt, 2);
        for frame in [1.0, 17.5, 59.0, 120.0] {
            assert_eq!(graph.update(frame).rebuilt, 0, "frame {frame}");
        }
    }
}

mod propagation {
    use super::*;

    #[test]
    fn test_group_position_permeates_to_child_group_only() {
        let mut graph = build(sliding_group());
        graph.update(0.0);

        let layer = id(&graph, "Shape Layer");
        let group = id(&graph, "Shape Layer.Group 1");
        let inner = id(&graph, "Shape Layer.Group 1.Inner");
        let fill = id(&graph, "Shape Layer.Group 1.Inner.Fill 1");
        let stroke = id(&graph, "Shape Layer.Group 1.Stroke 1");

        assert_eq!(graph.update(5.0), UpdateStats { visited: 5, rebuilt: 2 });
        assert_eq!(last_update(&graph, layer), Some(0.0));
        assert_eq!(last_update(&graph, group), Some(5.0));
        assert_eq!(last_update(&graph, inner), Some(5.0), "static child group still rebuilt");
        assert_eq!(last_update(&graph, fill), Some(0.0));
        assert_eq!(last_update(&graph, stroke), Some(0.0), "contained sibling not rebuilt");

        let stroke_node = graph.node(stroke).expect("stroke");
        assert!(stroke_node.has_upstream_updates());
        assert!(!stroke_node.has_local_updates());

        assert!((world_origin(&graph, inner) - Vec2::new(255.0, 250.0)).length() < 1e-4);
    }

    #[test]
    fn test_position_clamps_past_last_keyframe() {
        let mut graph = build(sliding_group());
        let inner = id(&graph, "Shape Layer.Group 1.Inner");

        graph.update(40.0);
        assert!((world_origin(&graph, inner) - Vec2::new(260.0, 250.0)).length() < 1e-4);
        assert_eq!(graph.update(50.0).rebuilt, 0, "both frames after the last keyframe");
    }

    fn world_opacity(graph: &AnimationGraph, node: NodeId) -> f32 {
        graph
            .render_output(node)
            .and_then(|r| r.as_group())
            .map(|g| g.world_opacity)
            .expect("group output")
    }

    /// Layer > Group 1 > Inner (50% opacity) > Fill 1
    fn faded_layer(layer_opacity: serde_json::Value) -> AnimationGraph {
        init_tracing();
        let mut ks = static_layer_transform();
        ks["o"] = layer_opacity;
        let model = create_test_lottie_with_transform(
            ks,
            json!([
                {
                    "ty": "gr",
                    "nm": "Group 1",
                    "it": [
                        {
                            "ty": "gr",
                            "nm": "Inner",
                            "it": [
                                fill("Fill 1"),
                                { "ty": "tr", "o": { "a": 0, "k": 50 } }
                            ]
                        }
                    ]
                }
            ]),
        );
        AnimationGraph::from_model(&model).expect("graph builds")
    }

    #[test]
    fn test_layer_opacity_composes_through_groups() {
        let mut graph = faded_layer(json!({ "a": 0, "k": 50 }));
        graph.update(0.0);

        let layer = id(&graph, "Shape Layer");
        let group = id(&graph, "Shape Layer.Group 1");
        let inner = id(&graph, "Shape Layer.Group 1.Inner");
        assert!((world_opacity(&graph, layer) - 0.5).abs() < 1e-6);
        assert!((world_opacity(&graph, group) - 0.5).abs() < 1e-6);
        assert!((world_opacity(&graph, inner) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_animated_layer_opacity_rebuilds_descendant_groups() {
        let mut graph = faded_layer(json!({ "a": 1, "k": [
            { "t": 0, "s": [50] },
            { "t": 10, "s": [100] }
        ] }));
        graph.update(0.0);

        let group = id(&graph, "Shape Layer.Group 1");
        let inner = id(&graph, "Shape Layer.Group 1.Inner");
        let fill = id(&graph, "Shape Layer.Group 1.Inner.Fill 1");
        assert!((world_opacity(&graph, inner) - 0.25).abs() < 1e-6);

        let stats = graph.update(5.0);
        assert_eq!(stats.rebuilt, 3, "layer and both groups");
        assert_eq!(last_update(&graph, group), Some(5.0));
        assert_eq!(last_update(&graph, inner), Some(5.0));
        assert_eq!(last_update(&graph, fill), Some(0.0), "fills do not depend on parents");
        assert!((world_opacity(&graph, inner) - 0.375).abs() < 1e-6);
    }
}

mod enable {
    use super::*;

    #[test]
    fn test_disabled_stroke_keeps_cached_values() {
        let mut graph = build(json!([
            {
                "ty": "st",
                "nm": "Stroke 1",
                "c": { "k": [1, 0, 0, 1] },
                "o": { "k": 100 },
                "w": { "a": 1, "k": [ { "t": 0, "s": [2] }, { "t": 10, "s": [12] } ] }
            }
        ]));
        let stroke = id(&graph, "Shape Layer.Stroke 1");
        graph.update(0.0);

        graph.set_enabled(stroke, false).expect("known node");
        graph.update(5.0);
        let render = graph
            .render_output(stroke)
            .and_then(|r| r.as_stroke())
            .expect("stroke output");
        assert!(!render.enabled);
        assert_eq!(render.width, 2.0);
        assert_eq!(graph.value::<f32>("Shape Layer.Stroke 1.Stroke Width"), Some(2.0));
        assert_eq!(last_update(&graph, stroke), Some(0.0));

        graph.set_enabled(stroke, true).expect("known node");
        assert_eq!(graph.update(5.0).rebuilt, 1);
        let render = graph
            .render_output(stroke)
            .and_then(|r| r.as_stroke())
            .expect("stroke output");
        assert!(render.enabled);
        assert_eq!(render.width, 7.0);
    }

    #[test]
    fn test_reenabled_node_rebuilds_at_unchanged_frame() {
        let mut graph = build(json!([stroke("Stroke 1")]));
        let stroke = id(&graph, "Shape Layer.Stroke 1");
        graph.update(0.0);

        graph.set_enabled(stroke, false).expect("known node");
        assert_eq!(graph.update(0.0).rebuilt, 0);
        graph.set_enabled(stroke, true).expect("known node");
        assert_eq!(graph.update(0.0).rebuilt, 1);
        assert_eq!(graph.update(0.0).rebuilt, 0);
    }

    #[test]
    fn test_disabled_group_passes_ancestor_context_through() {
        let mut graph = build(sliding_group());
        let group = id(&graph, "Shape Layer.Group 1");
        let inner = id(&graph, "Shape Layer.Group 1.Inner");

        graph.update(5.0);
        assert!((world_origin(&graph, inner) - Vec2::new(255.0, 250.0)).length() < 1e-4);

        graph.set_enabled(group, false).expect("known node");
        assert_eq!(graph.update(5.0).rebuilt, 1, "only the child group rebuilds");
        assert!((world_origin(&graph, inner) - Vec2::new(250.0, 250.0)).length() < 1e-4);

        assert_eq!(graph.update(8.0).rebuilt, 0, "disabled group skips its animation");

        graph.set_enabled(group, true).expect("known node");
        assert_eq!(graph.update(8.0).rebuilt, 2);
        assert!((world_origin(&graph, inner) - Vec2::new(258.0, 250.0)).length() < 1e-4);
    }
}

mod stroke_output {
    use super::*;

    #[test]
    fn test_solid_stroke_has_no_dash_state() {
        let mut graph = build(json!([stroke("Stroke 1")]));
        let stroke = id(&graph, "Shape Layer.Stroke 1");
        for frame in [0.0, 100.0] {
            graph.update(frame);
            let render = graph
                .render_output(stroke)
                .and_then(|r| r.as_stroke())
                .expect("stroke output");
            assert_eq!(render.dash_lengths, None);
            assert_eq!(render.dash_phase, None);
        }
    }

    #[test]
    fn test_hold_and_linear_keyframes_from_json() {
        let mut graph = build(json!([
            {
                "ty": "st",
                "nm": "Stroke 1",
                "c": { "k": [0, 0, 0, 1] },
                "o": { "a": 1, "k": [ { "t": 0, "s": [0] }, { "t": 10, "s": [100] } ] },
                "w": { "a": 1, "k": [ { "t": 0, "s": [10], "h": 1 }, { "t": 10, "s": [20] } ] },
                "d": [
                    { "n": "d", "nm": "dash", "v": { "k": 6 } },
                    { "n": "g", "nm": "gap", "v": { "k": 2 } },
                    { "n": "o", "nm": "offset", "v": { "a": 1, "k": [ { "t": 0, "s": [0] }, { "t": 10, "s": [8] } ] } }
                ]
            }
        ]));
        let stroke = id(&graph, "Shape Layer.Stroke 1");

        graph.update(5.0);
        let render = graph
            .render_output(stroke)
            .and_then(|r| r.as_stroke())
            .expect("stroke output");
        assert_eq!(render.width, 10.0);
        assert!((render.opacity - 0.5).abs() < 1e-6);
        assert_eq!(render.dash_lengths.as_deref(), Some(&[6.0, 2.0][..]));
        assert_eq!(render.dash_phase, Some(4.0));
        assert_eq!(render.color, Vec4::new(0.0, 0.0, 0.0, 1.0));

        graph.update(10.0);
        let render = graph
            .render_output(stroke)
            .and_then(|r| r.as_stroke())
            .expect("stroke output");
        assert_eq!(render.width, 20.0);
        assert_eq!(render.opacity, 1.0);
    }
}
