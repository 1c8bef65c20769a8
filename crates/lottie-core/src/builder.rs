//! Builds an [`AnimationGraph`] from a parsed animation document.

use crate::error::Result;
use crate::graph::{AnimationGraph, NodeId};
use crate::nodes::{FillNode, GroupNode, NodeKind, PathNode, StrokeNode};
use lottie_data::model::{self as data, LottieJson};

/// Per-parent counters for positional default names.
#[derive(Default)]
struct NameCounter {
    groups: usize,
    strokes: usize,
    fills: usize,
    paths: usize,
}

impl NameCounter {
    fn next(&mut self, label: &'static str, explicit: Option<&str>) -> String {
        let counter = match label {
            "Group" => &mut self.groups,
            "Stroke" => &mut self.strokes,
            "Fill" => &mut self.fills,
            _ => &mut self.paths,
        };
        *counter += 1;
        match explicit {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("{label} {counter}"),
        }
    }
}

#[derive(Default)]
pub struct GraphBuilder {
    graph: AnimationGraph,
    layers: usize,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one layer as a root group. Returns `None` for layers that carry no
    /// shapes the graph understands.
    pub fn add_layer(&mut self, layer: &data::Layer) -> Result<Option<NodeId>> {
        if layer.ty != data::Layer::SHAPE_LAYER {
            tracing::debug!(
                "Layer type {} ({}) has no animator nodes",
                layer.ty,
                layer.nm.as_deref().unwrap_or("unnamed")
            );
            return Ok(None);
        }

        self.layers += 1;
        let name = match layer.nm.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Layer {}", self.layers),
        };
        let root = self
            .graph
            .add_node(None, name, NodeKind::Group(GroupNode::new(Some(&layer.ks))))?;
        if layer.is_hidden() {
            self.graph.set_enabled(root, false)?;
        }

        if let Some(shapes) = &layer.shapes {
            self.add_shapes(root, shapes)?;
        }
        Ok(Some(root))
    }

    fn add_shapes(&mut self, parent: NodeId, shapes: &[data::Shape]) -> Result<()> {
        let mut names = NameCounter::default();
        for shape in shapes {
            let (label, explicit, hidden, kind) = match shape {
                data::Shape::Group(group) => (
                    "Group",
                    group.nm.as_deref(),
                    group.hd,
                    NodeKind::Group(GroupNode::new(group.transform())),
                ),
                data::Shape::Stroke(stroke) => (
                    "Stroke",
                    stroke.nm.as_deref(),
                    stroke.hd,
                    NodeKind::Stroke(StrokeNode::new(stroke)),
                ),
                data::Shape::Fill(fill) => (
                    "Fill",
                    fill.nm.as_deref(),
                    fill.hd,
                    NodeKind::Fill(FillNode::new(fill)),
                ),
                data::Shape::Path(path) => (
                    "Path",
                    path.nm.as_deref(),
                    path.hd,
                    NodeKind::Path(PathNode::new(path)),
                ),
                // Consumed by the enclosing group.
                data::Shape::Transform(_) => continue,
                data::Shape::Unknown => {
                    tracing::debug!("Skipping unsupported shape item under node {:?}", parent);
                    continue;
                }
            };

            let name = names.next(label, explicit);
            let id = self.graph.add_node(Some(parent), name, kind)?;
            if hidden {
                self.graph.set_enabled(id, false)?;
            }
            if let data::Shape::Group(group) = shape {
                self.add_shapes(id, &group.it)?;
            }
        }
        Ok(())
    }

    pub fn build(self) -> AnimationGraph {
        self.graph
    }
}

impl AnimationGraph {
    pub fn from_model(model: &LottieJson) -> Result<Self> {
        let mut builder = GraphBuilder::new();
        for layer in &model.layers {
            builder.add_layer(layer)?;
        }
        let graph = builder.build();
        tracing::debug!(
            "Built animator graph with {} nodes from {} layers",
            graph.len(),
            model.layers.len()
        );
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn model(layers: serde_json::Value) -> LottieJson {
        serde_json::from_value(json!({
            "v": "5.7.0", "ip": 0, "op": 60, "fr": 30, "w": 100, "h": 100,
            "layers": layers
        }))
        .expect("valid animation")
    }

    #[test]
    fn test_unnamed_items_get_positional_names() {
        let model = model(json!([{
            "ty": 4,
            "shapes": [
                { "ty": "st", "c": { "k": [1, 0, 0] }, "w": { "k": 2 } },
                { "ty": "st", "nm": "Outline", "c": { "k": [0, 1, 0] }, "w": { "k": 2 } },
                { "ty": "st", "c": { "k": [0, 0, 1] }, "w": { "k": 2 } },
                { "ty": "gr", "it": [
                    { "ty": "fl", "c": { "k": [1, 1, 1] } },
                    { "ty": "tr", "p": { "k": [0, 0] } }
                ]}
            ]
        }]));
        let graph = AnimationGraph::from_model(&model).expect("graph");
        let names: Vec<Vec<&str>> = graph.nodes().map(|(id, _)| graph.name_chain(id)).collect();
        assert_eq!(
            names,
            vec![
                vec!["Layer 1"],
                vec!["Layer 1", "Stroke 1"],
                vec!["Layer 1", "Outline"],
                vec!["Layer 1", "Stroke 3"],
                vec!["Layer 1", "Group 1"],
                vec!["Layer 1", "Group 1", "Fill 1"],
            ]
        );
    }

    #[test]
    fn test_hidden_items_are_built_disabled() {
        let model = model(json!([{
            "ty": 4, "nm": "Layer",
            "shapes": [
                { "ty": "fl", "nm": "Hidden", "hd": true, "c": { "k": [1, 1, 1] } },
                { "ty": "fl", "nm": "Shown", "c": { "k": [1, 1, 1] } }
            ]
        }]));
        let graph = AnimationGraph::from_model(&model).expect("graph");
        let hidden = graph.find_node("Layer.Hidden").expect("hidden fill");
        let shown = graph.find_node("Layer.Shown").expect("shown fill");
        assert_eq!(graph.node(hidden).map(|n| n.is_enabled()), Some(false));
        assert_eq!(graph.render_output(hidden).map(|r| r.is_enabled()), Some(false));
        assert_eq!(graph.node(shown).map(|n| n.is_enabled()), Some(true));
    }

    #[test]
    fn test_non_shape_layers_and_unknown_items_are_skipped() {
        let model = model(json!([
            { "ty": 3, "nm": "Null" },
            { "ty": 4, "nm": "Shapes", "shapes": [
                { "ty": "rc", "s": { "k": [10, 10] } },
                { "ty": "sh", "ks": { "k": { "c": true, "v": [[0, 0], [1, 0]], "i": [[0, 0], [0, 0]], "o": [[0, 0], [0, 0]] } } }
            ]}
        ]));
        let graph = AnimationGraph::from_model(&model).expect("graph");
        assert_eq!(graph.len(), 2);
        assert!(graph.find_node("Null").is_none());
        assert!(graph.find_node("Shapes.Path 1").is_some());
    }
}
