// Licensed under the Apache License, Version 2.0 (the "License"); you may
// not use this file except in compliance with the License. You may obtain
// a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied. See the
// License for the specific language governing permissions and limitations
// under the License.

use fixedbitset::FixedBitSet;
use num_traits::Zero;

use crate::priority_queue::IndexedPriorityQueue;

/// The predecessor tree built by [`dense_dijkstra`].
///
/// `parents()[v]` is the node `v` was last relaxed from, or `None` if `v`
/// was never reached. When the goal was found the chain of parents from the
/// goal leads back to the start node.
#[derive(Debug, Clone, PartialEq)]
pub struct PathTree<C> {
    start: usize,
    goal: usize,
    parents: Vec<Option<usize>>,
    distance: Option<C>,
}

impl<C: Copy> PathTree<C> {
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn goal(&self) -> usize {
        self.goal
    }

    /// Whether the goal was reached.
    pub fn is_found(&self) -> bool {
        self.distance.is_some()
    }

    /// Cost of the path to the goal, `None` if the goal is unreachable.
    pub fn distance(&self) -> Option<C> {
        self.distance
    }

    pub fn parents(&self) -> &[Option<usize>] {
        &self.parents
    }

    pub fn parent(&self, node: usize) -> Option<usize> {
        self.parents.get(node).copied().flatten()
    }

    /// Arcs `(tail, head)` of the path, walked from the goal back to the
    /// start. Empty if the goal was not found or equals the start.
    pub fn arcs(&self) -> PathArcs<'_, C> {
        PathArcs {
            tree: self,
            node: if self.is_found() { Some(self.goal) } else { None },
        }
    }

    /// Nodes of the path from start to goal, both included.
    pub fn path(&self) -> Option<Vec<usize>> {
        if !self.is_found() {
            return None;
        }
        let mut nodes: Vec<usize> = self.arcs().map(|(tail, _)| tail).collect();
        nodes.reverse();
        nodes.push(self.goal);
        Some(nodes)
    }
}

/// Iterator returned by [`PathTree::arcs`].
pub struct PathArcs<'a, C> {
    tree: &'a PathTree<C>,
    node: Option<usize>,
}

impl<'a, C> Iterator for PathArcs<'a, C> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let head = self.node?;
        if head == self.tree.start {
            self.node = None;
            return None;
        }
        let tail = self.tree.parents[head]?;
        self.node = Some(tail);
        Some((tail, head))
    }
}

/// Dijkstra's algorithm over a dense graph given by callbacks.
///
/// The graph has nodes `0..num_nodes`. `has_arc(i, j)` tells whether the
/// arc `i -> j` exists and `arc_cost(i, j)` gives its cost; `arc_cost` is
/// only called for arcs that exist. Every unvisited node is probed from each
/// settled node, so a search costs `O(num_nodes²)` callback calls.
///
/// The search stops as soon as `goal` is settled, which yields a cheapest
/// path only when every arc cost reachable by the search is non-negative.
/// Negative costs are not detected.
///
/// Arguments:
///
/// * `num_nodes` - The number of nodes in the graph
/// * `start` - The node to search from
/// * `goal` - The node to search for
/// * `has_arc` - Callback returning whether an arc exists
/// * `arc_cost` - Callback returning the cost of an existing arc
///
/// Returns a [`PathTree`]; an unreachable goal is not an error.
///
/// # Panics
///
/// Panics if `start` is not smaller than `num_nodes`.
///
/// # Example
/// ```rust
/// use std::convert::Infallible;
/// use mcmf_core::shortest_path::dense_dijkstra;
///
/// // 0 -> 1 -> 3 costs 2, 0 -> 2 -> 3 costs 5.
/// let costs = [
///     [None, Some(1), Some(1), None],
///     [None, None, None, Some(1)],
///     [None, None, None, Some(4)],
///     [None, None, None, None],
/// ];
/// let tree = dense_dijkstra(
///     4,
///     0,
///     3,
///     |i, j| Ok::<bool, Infallible>(costs[i][j].is_some()),
///     |i, j| Ok(costs[i][j].unwrap_or(0)),
/// )
/// .unwrap();
///
/// assert_eq!(tree.distance(), Some(2));
/// assert_eq!(tree.path(), Some(vec![0, 1, 3]));
/// ```
pub fn dense_dijkstra<C, H, W, E>(
    num_nodes: usize,
    start: usize,
    goal: usize,
    mut has_arc: H,
    mut arc_cost: W,
) -> Result<PathTree<C>, E>
where
    C: Copy + PartialOrd + Zero,
    H: FnMut(usize, usize) -> Result<bool, E>,
    W: FnMut(usize, usize) -> Result<C, E>,
{
    let mut parents = vec![None; num_nodes];
    let mut visited = FixedBitSet::with_capacity(num_nodes);
    let mut queue: IndexedPriorityQueue<usize, C> =
        IndexedPriorityQueue::with_capacity_and_order(num_nodes, Default::default());

    queue.raise_or_insert(start, C::zero());
    while !queue.is_empty() {
        let (node, dist) = queue.pop_best();
        visited.insert(node);
        if node == goal {
            return Ok(PathTree {
                start,
                goal,
                parents,
                distance: Some(dist),
            });
        }
        for next in 0..num_nodes {
            if visited.contains(next) || !has_arc(node, next)? {
                continue;
            }
            let candidate = dist + arc_cost(node, next)?;
            if queue.raise_or_insert(next, candidate) {
                parents[next] = Some(node);
            }
        }
    }

    Ok(PathTree {
        start,
        goal,
        parents,
        distance: None,
    })
}
