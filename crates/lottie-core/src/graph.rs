//! The animator node arena and its per-frame update pass.

use crate::error::{Error, Result};
use crate::keypath::{self, Keypath};
use crate::nodes::{NodeKind, ParentContext, Propagation};
use crate::property::{AnimatableValue, AnyNodeProperty};
use crate::provider::ValueProvider;
use crate::render::RenderOutput;
use serde::Serialize;

/// Index of a node in its [`AnimationGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Outcome of one node's step in the update pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeUpdate {
    pub rebuilt: bool,
    /// Signal handed to the children.
    pub downstream: bool,
}

impl NodeUpdate {
    const IDLE: NodeUpdate = NodeUpdate {
        rebuilt: false,
        downstream: false,
    };
}

pub struct AnimatorNode {
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
    has_local_updates: bool,
    has_upstream_updates: bool,
    last_update_frame: Option<f32>,
    is_enabled: bool,
    propagation: Propagation,
    force_update: bool,
}

impl AnimatorNode {
    fn new(name: String, parent: Option<NodeId>, kind: NodeKind) -> Self {
        let propagation = kind.propagation();
        Self {
            name,
            parent,
            children: Vec::new(),
            kind,
            has_local_updates: false,
            has_upstream_updates: false,
            last_update_frame: None,
            is_enabled: true,
            propagation,
            force_update: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn has_local_updates(&self) -> bool {
        self.has_local_updates
    }

    pub fn has_upstream_updates(&self) -> bool {
        self.has_upstream_updates
    }

    pub fn last_update_frame(&self) -> Option<f32> {
        self.last_update_frame
    }

    pub fn is_enabled(&self) -> bool {
        self.is_enabled
    }

    pub fn propagation(&self) -> Propagation {
        self.propagation
    }

    pub fn render_output(&self) -> RenderOutput<'_> {
        self.kind.render_output()
    }

    pub(crate) fn update(&mut self, frame: f32, upstream: bool, parent: &ParentContext) -> NodeUpdate {
        if !self.is_enabled {
            let forced = std::mem::take(&mut self.force_update);
            return NodeUpdate {
                rebuilt: false,
                downstream: upstream || forced,
            };
        }

        let local = self.force_update || self.kind.needs_local_update(frame);
        if !local && !upstream {
            return NodeUpdate::IDLE;
        }
        self.has_upstream_updates = upstream;
        self.has_local_updates = local;

        let permeate = upstream && self.propagation == Propagation::PermeateDownstream;
        if !local && !permeate {
            return NodeUpdate::IDLE;
        }

        self.kind.update_properties(frame);
        self.kind.rebuild_outputs(parent);
        self.has_local_updates = false;
        self.force_update = false;
        self.last_update_frame = Some(frame);
        NodeUpdate {
            rebuilt: true,
            downstream: true,
        }
    }
}

/// Summary of one [`AnimationGraph::update`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UpdateStats {
    pub visited: usize,
    pub rebuilt: usize,
}

/// A property found by keypath resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PropertyRef {
    pub node: NodeId,
    pub property: &'static str,
}

/// Arena of animator nodes. Parents are always stored before their children,
/// so one forward pass visits every node after its parent.
#[derive(Default)]
pub struct AnimationGraph {
    nodes: Vec<AnimatorNode>,
    signals: Vec<bool>,
    contexts: Vec<ParentContext>,
}

impl AnimationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(
        &mut self,
        parent: Option<NodeId>,
        name: impl Into<String>,
        kind: NodeKind,
    ) -> Result<NodeId> {
        let id = NodeId(self.nodes.len());
        if let Some(parent_id) = parent {
            let parent_node = self
                .nodes
                .get_mut(parent_id.0)
                .ok_or(Error::UnknownNode(parent_id))?;
            parent_node.children.push(id);
        }
        self.nodes.push(AnimatorNode::new(name.into(), parent, kind));
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&AnimatorNode> {
        self.nodes.get(id.0)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &AnimatorNode)> {
        self.nodes.iter().enumerate().map(|(idx, node)| (NodeId(idx), node))
    }

    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(id, _)| id)
    }

    pub fn render_output(&self, id: NodeId) -> Option<RenderOutput<'_>> {
        self.node(id).map(AnimatorNode::render_output)
    }

    pub fn render_outputs(&self) -> impl Iterator<Item = (NodeId, RenderOutput<'_>)> {
        self.nodes().map(|(id, node)| (id, node.render_output()))
    }

    /// Run the update pass for `frame`.
    pub fn update(&mut self, frame: f32) -> UpdateStats {
        self.signals.clear();
        self.contexts.clear();
        let mut stats = UpdateStats::default();

        for idx in 0..self.nodes.len() {
            let (upstream, inherited) = match self.nodes[idx].parent {
                Some(parent) => (self.signals[parent.0], self.contexts[parent.0]),
                None => (false, ParentContext::default()),
            };

            let node = &mut self.nodes[idx];
            let outcome = node.update(frame, upstream, &inherited);
            stats.visited += 1;
            if outcome.rebuilt {
                stats.rebuilt += 1;
                tracing::trace!("Rebuilt {} '{}' at frame {}", node.kind.kind_name(), node.name, frame);
            }

            let context = if node.is_enabled {
                node.kind.group_context().unwrap_or(inherited)
            } else {
                inherited
            };
            self.signals.push(outcome.downstream);
            self.contexts.push(context);
        }

        tracing::debug!(
            "Frame {}: rebuilt {} of {} nodes",
            frame,
            stats.rebuilt,
            stats.visited
        );
        stats
    }

    /// Enable or disable a node. Either transition makes the next pass signal
    /// the node's subtree; enabling also rebuilds the node itself.
    pub fn set_enabled(&mut self, id: NodeId, enabled: bool) -> Result<()> {
        let node = self.nodes.get_mut(id.0).ok_or(Error::UnknownNode(id))?;
        if node.is_enabled == enabled {
            return Ok(());
        }
        node.is_enabled = enabled;
        node.force_update = true;
        node.kind.set_render_enabled(enabled);
        Ok(())
    }

    /// Root-first chain of names leading to `id`.
    pub fn name_chain(&self, id: NodeId) -> Vec<&str> {
        let mut chain = Vec::new();
        let mut cursor = self.node(id);
        while let Some(node) = cursor {
            chain.push(node.name.as_str());
            cursor = node.parent.and_then(|parent| self.node(parent));
        }
        chain.reverse();
        chain
    }

    /// First node whose name chain matches `keypath` in full.
    pub fn find_node(&self, keypath: &str) -> Option<NodeId> {
        let keypath = Keypath::parse(keypath).ok()?;
        self.nodes()
            .map(|(id, _)| id)
            .find(|&id| keypath.matches_node(&self.name_chain(id)))
    }

    /// Every property addressed by `keypath`, in node order.
    pub fn resolve(&self, keypath: &str) -> Vec<PropertyRef> {
        match Keypath::parse(keypath) {
            Ok(keypath) => self.resolve_parsed(&keypath),
            Err(err) => {
                tracing::debug!("Ignoring keypath: {}", err);
                Vec::new()
            }
        }
    }

    fn resolve_parsed(&self, keypath: &Keypath) -> Vec<PropertyRef> {
        let Some((pattern, property)) = keypath.split_property() else {
            return Vec::new();
        };
        self.nodes()
            .filter_map(|(id, node)| {
                let name = node
                    .kind
                    .property_names()
                    .into_iter()
                    .find(|name| *name == property)?;
                keypath::matches(pattern, &self.name_chain(id)).then_some(PropertyRef {
                    node: id,
                    property: name,
                })
            })
            .collect()
    }

    fn property(&self, target: PropertyRef) -> Option<&dyn AnyNodeProperty> {
        self.node(target.node)?.kind.keypath_property(target.property)
    }

    /// Install a clone of `provider` on every property matching `keypath`.
    /// Every match is type-checked before anything is installed. Returns the
    /// number of properties overridden.
    pub fn set_value_provider<T, P>(&mut self, keypath: &str, provider: P) -> Result<usize>
    where
        T: AnimatableValue,
        P: ValueProvider<T> + Clone + 'static,
    {
        let parsed = Keypath::parse(keypath)?;
        let targets = self.resolve_parsed(&parsed);

        for &target in &targets {
            let Some(found) = self.property(target).map(|prop| prop.value_kind()) else {
                continue;
            };
            if found != T::KIND {
                tracing::warn!(
                    "Override of '{}' rejected: expected {}, found {}",
                    keypath,
                    T::KIND,
                    found
                );
                return Err(Error::TypeMismatch {
                    keypath: keypath.to_string(),
                    expected: T::KIND,
                    found,
                });
            }
        }

        let mut installed = 0;
        for target in targets {
            let node = &mut self.nodes[target.node.0];
            let Some(slot) = node
                .kind
                .keypath_property_mut(target.property)
                .and_then(|prop| prop.downcast_mut::<T>())
            else {
                continue;
            };
            slot.set_provider(provider.clone());
            node.force_update = true;
            installed += 1;
        }

        tracing::debug!("Installed {} provider(s) at '{}'", installed, keypath);
        Ok(installed)
    }

    /// Cached value of the first property matching `keypath`, as of the last
    /// update.
    pub fn value<T: AnimatableValue>(&self, keypath: &str) -> Option<T> {
        self.resolve(keypath)
            .into_iter()
            .find_map(|target| self.property(target)?.downcast_ref::<T>())
            .map(|prop| prop.value().clone())
    }
}
