// Copyright (c) 2018 Jason White
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN
// THE SOFTWARE.

//! A directed graph of named targets.
//!
//! Nodes are kept in insertion order so that enumeration (and therefore
//! traversal tie-breaking) is deterministic within a process. Cycle
//! detection runs once, at construction, so that every other operation can
//! assume the graph is acyclic.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use crate::error::{CircularDependencyError, Error, UnknownTargetError};

pub trait NodeTrait: Eq + Hash + Clone + fmt::Display {}
impl<N> NodeTrait for N where N: Eq + Hash + Clone + fmt::Display {}

/// One or more dependency names for a single target.
///
/// A target's dependency list may be declared as a single name or as a
/// sequence; both convert into this type so that callers can mix the two
/// freely across different targets in the same edge map.
#[derive(Debug, Clone)]
pub enum Dependencies<N> {
    One(N),
    Many(Vec<N>),
}

impl<N> Dependencies<N> {
    fn into_vec(self) -> Vec<N> {
        match self {
            Dependencies::One(n) => vec![n],
            Dependencies::Many(ns) => ns,
        }
    }
}

impl<N> From<N> for Dependencies<N> {
    fn from(n: N) -> Self {
        Dependencies::One(n)
    }
}

impl From<&str> for Dependencies<String> {
    fn from(n: &str) -> Self {
        Dependencies::One(n.to_owned())
    }
}

impl<N> From<Vec<N>> for Dependencies<N> {
    fn from(ns: Vec<N>) -> Self {
        Dependencies::Many(ns)
    }
}

impl From<Vec<&str>> for Dependencies<String> {
    fn from(ns: Vec<&str>) -> Self {
        Dependencies::Many(ns.into_iter().map(str::to_owned).collect())
    }
}

/// Directed graph of targets and their dependency edges.
#[derive(Debug, Clone)]
pub struct Graph<N: NodeTrait> {
    /// Nodes in insertion order. The index into this vector is the node's
    /// internal index, used by `successors`/`predecessors`.
    nodes: Vec<N>,

    /// Node -> internal index, for fast lookup.
    index: HashMap<N, usize>,

    /// Outgoing edges (dependencies) by internal index, in the order they
    /// were declared.
    successors: Vec<Vec<usize>>,

    /// Incoming edges (dependents) by internal index.
    predecessors: Vec<Vec<usize>>,
}

impl<N: NodeTrait> Graph<N> {
    /// Constructs a graph from a set of nodes and a map of dependency
    /// edges.
    ///
    /// Every edge endpoint must already be present in `nodes`, and the
    /// resulting graph must be acyclic; otherwise construction fails and no
    /// traversal may begin.
    pub fn new<I, D>(
        nodes: I,
        edges: HashMap<N, D>,
    ) -> Result<Graph<N>, Error>
    where
        I: IntoIterator<Item = N>,
        D: Into<Dependencies<N>>,
    {
        let mut graph = Graph {
            nodes: Vec::new(),
            index: HashMap::new(),
            successors: Vec::new(),
            predecessors: Vec::new(),
        };

        for node in nodes {
            graph.add_node(node);
        }

        for (node, deps) in edges {
            let a = graph.require_index(&node)?;

            for dep in deps.into().into_vec() {
                let b = graph.require_index(&dep)?;
                graph.successors[a].push(b);
                graph.predecessors[b].push(a);
            }
        }

        if let Some(cycle) = graph.find_cycle() {
            return Err(CircularDependencyError { cycle }.into());
        }

        Ok(graph)
    }

    fn add_node(&mut self, node: N) {
        if self.index.contains_key(&node) {
            return;
        }

        let i = self.nodes.len();
        self.index.insert(node.clone(), i);
        self.nodes.push(node);
        self.successors.push(Vec::new());
        self.predecessors.push(Vec::new());
    }

    fn require_index(&self, node: &N) -> Result<usize, UnknownTargetError> {
        self.index.get(node).copied().ok_or_else(|| {
            UnknownTargetError {
                target: node.to_string(),
                known: self.nodes.iter().map(N::to_string).collect(),
            }
        })
    }

    fn index_of(&self, node: &N) -> Result<usize, Error> {
        Ok(self.require_index(node)?)
    }

    /// Number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes, in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.nodes.iter()
    }

    /// The dependencies of `node` (what it needs), in declaration order.
    pub fn successors(&self, node: &N) -> Result<Vec<&N>, Error> {
        let i = self.index_of(node)?;
        Ok(self.successors[i].iter().map(|&j| &self.nodes[j]).collect())
    }

    /// The dependents of `node` (who needs it).
    pub fn predecessors(&self, node: &N) -> Result<Vec<&N>, Error> {
        let i = self.index_of(node)?;
        Ok(self.predecessors[i]
            .iter()
            .map(|&j| &self.nodes[j])
            .collect())
    }

    /// A valid dependency-first topological order of the graph: for every
    /// edge `a -> b` (`a` depends on `b`), `b` precedes `a`. Computed with
    /// Kahn's algorithm over the reversed edge direction, breaking ties by
    /// insertion order so the result is stable for a given `Graph` value.
    pub fn topological_order(&self) -> Vec<&N> {
        let mut remaining: Vec<usize> =
            self.successors.iter().map(Vec::len).collect();

        let mut ready: Vec<usize> = (0..self.nodes.len())
            .filter(|&i| remaining[i] == 0)
            .collect();

        let mut order = Vec::with_capacity(self.nodes.len());
        let mut cursor = 0;

        while cursor < ready.len() {
            let i = ready[cursor];
            cursor += 1;
            order.push(&self.nodes[i]);

            for &j in &self.predecessors[i] {
                remaining[j] -= 1;
                if remaining[j] == 0 {
                    ready.push(j);
                }
            }
        }

        debug_assert_eq!(
            order.len(),
            self.nodes.len(),
            "topological_order visited fewer nodes than exist; the acyclic \
             invariant established at construction must have been violated"
        );

        order
    }

    /// Finds one cycle in the graph, if any, as a concrete path of node
    /// names starting and ending at the same node (e.g. `[a, b, a]`).
    ///
    /// This is a plain depth-first search that tracks which nodes are on
    /// the current recursion stack (the same bookkeeping Tarjan's
    /// algorithm uses for its `on_stack` flag), but stops at the first
    /// back-edge it finds instead of computing full strongly-connected
    /// components, since all that's needed here is one concrete cycle to
    /// report.
    fn find_cycle(&self) -> Option<Vec<String>> {
        let mut mark = vec![Mark::Unvisited; self.nodes.len()];
        let mut path = Vec::new();

        for start in 0..self.nodes.len() {
            if mark[start] == Mark::Unvisited {
                if let Some(cycle) =
                    self.find_cycle_from(start, &mut mark, &mut path)
                {
                    return Some(cycle);
                }
            }
        }

        None
    }

    fn find_cycle_from(
        &self,
        node: usize,
        mark: &mut [Mark],
        path: &mut Vec<usize>,
    ) -> Option<Vec<String>> {
        mark[node] = Mark::OnStack;
        path.push(node);

        for &next in &self.successors[node] {
            match mark[next] {
                Mark::OnStack => {
                    let start = path.iter().position(|&n| n == next).unwrap();
                    let mut cycle: Vec<String> = path[start..]
                        .iter()
                        .map(|&i| self.nodes[i].to_string())
                        .collect();
                    cycle.push(self.nodes[next].to_string());
                    return Some(cycle);
                }
                Mark::Unvisited => {
                    if let Some(cycle) = self.find_cycle_from(next, mark, path)
                    {
                        return Some(cycle);
                    }
                }
                Mark::Done => {}
            }
        }

        path.pop();
        mark[node] = Mark::Done;
        None
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Unvisited,
    OnStack,
    Done,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edges(pairs: Vec<(&str, Vec<&str>)>) -> HashMap<String, Vec<String>> {
        pairs
            .into_iter()
            .map(|(k, v)| {
                (
                    k.to_owned(),
                    v.into_iter().map(str::to_owned).collect(),
                )
            })
            .collect()
    }

    fn diamond() -> Graph<String> {
        let nodes = vec!["a", "b1", "b2", "c"]
            .into_iter()
            .map(str::to_owned)
            .collect::<Vec<_>>();

        let edges = edges(vec![
            ("b1", vec!["a"]),
            ("b2", vec!["a"]),
            ("c", vec!["b1", "b2"]),
        ]);

        Graph::new(nodes, edges).unwrap()
    }

    fn names<'a>(v: Vec<&'a String>) -> Vec<&'a str> {
        v.into_iter().map(String::as_str).collect()
    }

    #[test]
    fn successors_and_predecessors_are_reverse_symmetric() {
        let g = diamond();

        assert_eq!(
            names(g.successors(&"c".to_owned()).unwrap()),
            vec!["b1", "b2"]
        );
        assert!(names(g.successors(&"a".to_owned()).unwrap()).is_empty());

        assert_eq!(
            names(g.predecessors(&"a".to_owned()).unwrap()),
            vec!["b1", "b2"]
        );
        assert!(names(g.predecessors(&"c".to_owned()).unwrap()).is_empty());
    }

    #[test]
    fn topological_order_respects_edges() {
        let g = diamond();
        let order = g.topological_order();

        let pos = |n: &str| order.iter().position(|&x| x.as_str() == n).unwrap();

        assert!(pos("a") < pos("b1"));
        assert!(pos("a") < pos("b2"));
        assert!(pos("b1") < pos("c"));
        assert!(pos("b2") < pos("c"));
    }

    #[test]
    fn unknown_target_lists_known_names() {
        let nodes = vec!["a".to_owned()];
        let edges = edges(vec![("a", vec!["ghost"])]);

        let err = Graph::new(nodes, edges).unwrap_err();

        match err {
            Error::UnknownTarget(e) => {
                assert_eq!(e.target, "ghost");
                assert_eq!(e.known, vec!["a".to_owned()]);
            }
            _ => panic!("expected UnknownTarget"),
        }
    }

    #[test]
    fn cycle_is_reported_with_a_concrete_path() {
        let nodes = vec!["a", "b", "c"]
            .into_iter()
            .map(str::to_owned)
            .collect::<Vec<_>>();

        let edges = edges(vec![
            ("a", vec!["b"]),
            ("b", vec!["c"]),
            ("c", vec!["a"]),
        ]);

        let err = Graph::new(nodes, edges).unwrap_err();

        match err {
            Error::CircularDependency(e) => {
                let msg = e.to_string();
                assert!(msg.starts_with("Circular dependency found: "));
                assert!(msg.contains("->"));
                assert_eq!(e.cycle.first(), e.cycle.last());
            }
            _ => panic!("expected CircularDependency"),
        }
    }
}
