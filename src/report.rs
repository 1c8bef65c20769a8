use anyhow::Result;
use lottie_core::{AnimationGraph, LottiePlayer, NodeId, RenderOutput, UpdateStats};
use lottie_data::model::LottieJson;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Serialize)]
struct FrameReport<'a> {
    frame: f32,
    stats: UpdateStats,
    nodes: Vec<NodeReport<'a>>,
}

#[derive(Serialize)]
struct NodeReport<'a> {
    id: NodeId,
    path: String,
    output: RenderOutput<'a>,
}

fn node_path(graph: &AnimationGraph, id: NodeId) -> String {
    graph.name_chain(id).join(".")
}

/// One JSON line for the frame just evaluated.
pub fn print_frame(
    graph: &AnimationGraph,
    frame: f32,
    stats: UpdateStats,
    changed_only: bool,
) -> Result<()> {
    let nodes = graph
        .nodes()
        .filter(|(_, node)| !changed_only || node.last_update_frame() == Some(frame))
        .map(|(id, node)| NodeReport {
            id,
            path: node_path(graph, id),
            output: node.render_output(),
        })
        .collect();

    let report = FrameReport {
        frame,
        stats,
        nodes,
    };
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}

pub fn print_keypaths(graph: &AnimationGraph, filter: Option<&str>) {
    let filter = filter.map(str::to_lowercase);
    for (id, node) in graph.nodes() {
        let path = node_path(graph, id);
        for property in node.kind().property_names() {
            let keypath = format!("{path}.{property}");
            if filter
                .as_deref()
                .map_or(true, |f| keypath.to_lowercase().contains(f))
            {
                println!("{keypath}");
            }
        }
    }
}

pub fn print_info(model: &LottieJson, player: &LottiePlayer) {
    println!("Animation: {}", model.nm.as_deref().unwrap_or("unnamed"));
    if let Some(version) = &model.v {
        println!("  Format version: {version}");
    }
    println!("  Size: {}x{}", model.w, model.h);
    println!(
        "  Frames: {} to {} at {} fps ({:.2}s)",
        player.in_point,
        player.out_point,
        player.frame_rate,
        if player.frame_rate > 0.0 {
            player.duration_frames() / player.frame_rate
        } else {
            0.0
        }
    );
    println!("  Layers: {}", model.layers.len());

    let mut kinds: BTreeMap<&str, usize> = BTreeMap::new();
    for (_, node) in player.graph.nodes() {
        *kinds.entry(node.kind().kind_name()).or_default() += 1;
    }
    println!("  Animator nodes: {}", player.graph.len());
    for (kind, count) in kinds {
        println!("    {kind}: {count}");
    }

    if !player.markers.is_empty() {
        println!("  Markers:");
        for marker in &player.markers {
            println!(
                "    {} at {} ({} frames)",
                marker.cm.as_deref().unwrap_or("unnamed"),
                marker.tm.unwrap_or(0.0),
                marker.dr.unwrap_or(0.0)
            );
        }
    }
}
