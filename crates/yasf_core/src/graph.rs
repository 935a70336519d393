//! Node Graph Builder.
//!
//! Walks the raw `graph` section breadth-first from the root id and builds
//! one [`Node`] per reachable id. Shadow flags are inherited top-down along
//! the first path that reaches a node and are fixed from then on.

use std::collections::{HashMap, VecDeque};

use serde::Deserialize;
use serde_json::Value;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::document::{RawGraph, RawNode, NODES_LIST_KEY};
use crate::node::{Geometry, GeometryParseError, Node, NodeTransform, TransformKind};

/// Flat, id-keyed store of built nodes.
///
/// Nodes are kept in build (BFS) order in an arena; ids map to arena slots.
#[derive(Clone, Debug, Default)]
pub struct NodeDictionary {
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
}

impl NodeDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node unless its id is already present. Returns whether it was inserted.
    pub fn insert(&mut self, node: Node) -> bool {
        if self.index.contains_key(&node.id) {
            return false;
        }
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        true
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Nodes in the order they were built.
    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Work item of the breadth-first walk.
struct Pending {
    id: String,
    cast_shadows: bool,
    receive_shadows: bool,
}

/// Build the node dictionary reachable from `root_id`.
///
/// Each id is built at most once; repeated or cyclic references are skipped
/// when dequeued. Ids without a record are left out and reported by the
/// instantiator when it tries to visit them.
pub fn build_node_graph(
    graph: &RawGraph,
    root_id: &str,
    diagnostics: &mut Diagnostics,
) -> NodeDictionary {
    let mut dictionary = NodeDictionary::new();
    let mut queue = VecDeque::new();
    queue.push_back(Pending {
        id: root_id.to_string(),
        cast_shadows: false,
        receive_shadows: false,
    });

    while let Some(pending) = queue.pop_front() {
        if dictionary.contains(&pending.id) {
            log::debug!("Node '{}' already built, skipping", pending.id);
            continue;
        }

        let Some(record) = graph.record(&pending.id) else {
            log::debug!("Node '{}' has no record in the graph", pending.id);
            continue;
        };

        let raw = match RawNode::deserialize(record) {
            Ok(raw) => raw,
            Err(e) => {
                diagnostics.push_unique(Diagnostic::Malformed {
                    section: "graph",
                    id: pending.id.clone(),
                    message: e.to_string(),
                });
                continue;
            }
        };

        let node = build_node(&pending, raw, &mut queue, diagnostics);
        dictionary.insert(node);
    }

    log::info!(
        "Built {} nodes from {} graph records (root '{}')",
        dictionary.len(),
        graph.len(),
        root_id
    );

    dictionary
}

fn build_node(
    pending: &Pending,
    raw: RawNode,
    queue: &mut VecDeque<Pending>,
    diagnostics: &mut Diagnostics,
) -> Node {
    let id = pending.id.clone();

    let mut transforms = Vec::with_capacity(raw.transforms.len());
    for t in &raw.transforms {
        match TransformKind::parse(&t.kind) {
            Some(kind) => transforms.push(NodeTransform::from_raw(kind, &t.amount)),
            None => diagnostics.push(Diagnostic::UnknownTransform {
                node: id.clone(),
                tag: t.kind.clone(),
            }),
        }
    }

    let cast_shadows = raw.castshadows.unwrap_or(pending.cast_shadows);
    let receive_shadows = raw.receiveshadows.unwrap_or(pending.receive_shadows);

    let mut children: Vec<String> = Vec::new();
    let mut geometry: Option<Geometry> = None;

    for (key, value) in &raw.children {
        if key == NODES_LIST_KEY {
            for child in child_ids(&id, value, diagnostics) {
                if !children.contains(&child) {
                    queue.push_back(Pending {
                        id: child.clone(),
                        cast_shadows,
                        receive_shadows,
                    });
                    children.push(child);
                }
            }
            continue;
        }

        match Geometry::from_declaration(value) {
            Ok(parsed) => {
                if let Some(previous) = &geometry {
                    log::debug!(
                        "Node '{}': '{}' replaces earlier {} payload",
                        id,
                        key,
                        previous.tag()
                    );
                }
                geometry = Some(parsed);
            }
            Err(GeometryParseError::UnknownTag(tag)) => {
                diagnostics.push(Diagnostic::UnknownGeometry {
                    node: id.clone(),
                    tag,
                });
            }
            Err(e) => diagnostics.push(Diagnostic::Malformed {
                section: "graph",
                id: format!("{}/{}", id, key),
                message: e.to_string(),
            }),
        }
    }

    Node {
        id,
        node_type: raw.node_type,
        transforms,
        material_ref: raw.materialref.map(|m| m.material_id.to_lowercase()),
        geometry,
        cast_shadows,
        receive_shadows,
        children,
    }
}

fn child_ids(node: &str, value: &Value, diagnostics: &mut Diagnostics) -> Vec<String> {
    let Some(list) = value.as_array() else {
        diagnostics.push(Diagnostic::Malformed {
            section: "graph",
            id: format!("{}/{}", node, NODES_LIST_KEY),
            message: "expected a list of node ids".to_string(),
        });
        return Vec::new();
    };

    list.iter()
        .filter_map(|entry| match entry.as_str() {
            Some(id) => Some(id.to_string()),
            None => {
                diagnostics.push(Diagnostic::Malformed {
                    section: "graph",
                    id: format!("{}/{}", node, NODES_LIST_KEY),
                    message: format!("child id {} is not a string", entry),
                });
                None
            }
        })
        .collect()
}
