//! Dependency graph index using petgraph.
//!
//! Edges point from **dependent to dependency**: if `b` is saved with a query
//! that reads from `a`, the graph holds `b -> a`. Dependents of a snippet are
//! therefore its incoming neighbours.
//!
//! Dependencies are recorded by name, so a force-deleted snippet that still has
//! dependents stays in the graph as a *tombstone* node. Its dependents keep
//! their edge to it, and saving a snippet under the same name later revives the
//! node with those dependents attached. A tombstone is pruned as soon as its
//! last dependent is removed.
//!
//! A `StableGraph` is used so node indices survive removals.

use petgraph::Direction;
use petgraph::algo;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
struct GraphNode {
    name: String,
    /// `None` for tombstones
    sequence_index: Option<u64>,
}

/// Stack frame for the iterative post-order walk.
struct Frame {
    node: NodeIndex,
    neighbours: Vec<NodeIndex>,
    next: usize,
}

/// Incrementally maintained dependency relation between snippets.
#[derive(Debug, Default)]
pub(crate) struct DependencyGraph {
    graph: StableDiGraph<GraphNode, ()>,
    nodes: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Check whether registering `name` with `dependencies` would close a cycle.
    ///
    /// Only possible when `name` is a tombstone whose dangling dependents are
    /// (transitively) among `dependencies`. Returns the first offending dependency.
    pub(crate) fn find_cycle<'a>(&self, name: &str, dependencies: &'a [String]) -> Option<&'a str> {
        let &node = self.nodes.get(name)?;
        dependencies
            .iter()
            .find(|dep| {
                self.nodes.get(dep.as_str()).is_some_and(|&dep_node| {
                    dep_node == node || algo::has_path_connecting(&self.graph, dep_node, node, None)
                })
            })
            .map(String::as_str)
    }

    /// Register a live snippet and its outgoing dependency edges.
    ///
    /// Every dependency must already be live; callers resolve dependencies
    /// against the registry before inserting.
    pub(crate) fn insert(&mut self, name: &str, sequence_index: u64, dependencies: &[String]) {
        let node = match self.nodes.get(name) {
            Some(&node) => {
                self.graph[node].sequence_index = Some(sequence_index);
                node
            }
            None => {
                let node = self.graph.add_node(GraphNode {
                    name: name.to_string(),
                    sequence_index: Some(sequence_index),
                });
                self.nodes.insert(name.to_string(), node);
                node
            }
        };

        for dep in dependencies {
            if let Some(&dep_node) = self.nodes.get(dep.as_str()) {
                self.graph.update_edge(node, dep_node, ());
            }
        }
    }

    /// Drop a snippet from the index.
    ///
    /// Outgoing edges go away with the snippet. If anything still depends on
    /// it, the node is kept as a tombstone.
    pub(crate) fn remove(&mut self, name: &str) {
        let Some(&node) = self.nodes.get(name) else {
            return;
        };

        let targets: Vec<NodeIndex> = self.graph.neighbors(node).collect();
        let outgoing: Vec<_> = self.graph.edges(node).map(|edge| edge.id()).collect();
        for edge in outgoing {
            self.graph.remove_edge(edge);
        }

        self.graph[node].sequence_index = None;
        self.prune_if_orphaned(node);

        for target in targets {
            self.prune_if_orphaned(target);
        }
    }

    /// Live snippets whose dependencies include `name`, in insertion order.
    pub(crate) fn direct_dependents(&self, name: &str) -> Vec<String> {
        self.nodes
            .get(name)
            .map(|&node| {
                self.sorted_neighbours(node, Direction::Incoming)
                    .into_iter()
                    .map(|dependent| self.graph[dependent].name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Live dependencies of `name`, in insertion order.
    pub(crate) fn direct_dependencies(&self, name: &str) -> Vec<String> {
        self.nodes
            .get(name)
            .map(|&node| {
                self.sorted_neighbours(node, Direction::Outgoing)
                    .into_iter()
                    .map(|dependency| self.graph[dependency].name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every transitive dependent of `name`, deepest first.
    ///
    /// Each dependent appears before anything it depends on. `name` itself is
    /// not included, and diamonds are visited once.
    pub(crate) fn transitive_dependents(&self, name: &str) -> Vec<String> {
        self.post_order(name, Direction::Incoming)
    }

    /// Every transitive dependency of `name`, each one before its own users.
    ///
    /// Tombstones are included so callers can detect dangling references.
    pub(crate) fn transitive_dependencies(&self, name: &str) -> Vec<String> {
        self.post_order(name, Direction::Outgoing)
    }

    /// Returns true if `name` is a tombstone (removed, but still referenced).
    pub(crate) fn is_tombstone(&self, name: &str) -> bool {
        self.nodes
            .get(name)
            .is_some_and(|&node| self.graph[node].sequence_index.is_none())
    }

    #[cfg(test)]
    pub(crate) fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Depth-first post-order walk from `name`, excluding `name`.
    ///
    /// Iterative so deep chains cannot overflow the stack.
    fn post_order(&self, name: &str, direction: Direction) -> Vec<String> {
        let Some(&root) = self.nodes.get(name) else {
            return Vec::new();
        };

        let mut visited = HashSet::from([root]);
        let mut order = Vec::new();
        let mut stack = vec![Frame {
            node: root,
            neighbours: self.sorted_neighbours(root, direction),
            next: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            if let Some(&neighbour) = frame.neighbours.get(frame.next) {
                frame.next += 1;
                if visited.insert(neighbour) {
                    let neighbours = self.sorted_neighbours(neighbour, direction);
                    stack.push(Frame {
                        node: neighbour,
                        neighbours,
                        next: 0,
                    });
                }
            } else {
                let node = frame.node;
                stack.pop();
                if node != root {
                    order.push(self.graph[node].name.clone());
                }
            }
        }

        order
    }

    /// Neighbours ordered by insertion, tombstones last by name.
    fn sorted_neighbours(&self, node: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        let mut neighbours: Vec<NodeIndex> =
            self.graph.neighbors_directed(node, direction).collect();
        neighbours.sort_by(|a, b| {
            let (a, b) = (&self.graph[*a], &self.graph[*b]);
            match (a.sequence_index, b.sequence_index) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => a.name.cmp(&b.name),
            }
        });
        neighbours
    }

    fn prune_if_orphaned(&mut self, node: NodeIndex) {
        let Some(weight) = self.graph.node_weight(node) else {
            return;
        };
        let orphaned = weight.sequence_index.is_none()
            && self
                .graph
                .neighbors_directed(node, Direction::Incoming)
                .next()
                .is_none();

        if orphaned {
            if let Some(removed) = self.graph.remove_node(node) {
                self.nodes.remove(&removed.name);
            }
        }
    }
}
