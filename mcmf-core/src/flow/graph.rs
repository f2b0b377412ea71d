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

use std::fmt::Debug;
use std::hash::Hash;

use fixedbitset::FixedBitSet;
use hashbrown::HashMap;
use ndarray::Array2;
use num_traits::{PrimInt, Zero};
use petgraph::visit::{EdgeRef, IntoEdgeReferences, NodeIndexable};

use super::min_cost_max_flow;
use crate::FlowError;

/// Run [`min_cost_max_flow`] on a petgraph graph.
///
/// The graph is turned into the dense capacity and cost tables the solver
/// works on, indexed by [`NodeIndexable::to_index`]. ``graph`` is treated as
/// a digraph (the trait bounds don't force it but an undirected edge only
/// yields the arc from its source to its target). Self loops and edges with
/// zero capacity are skipped. Pairs of nodes without an edge cost zero, which
/// is also the price of undoing flow on an edge with no antiparallel twin.
///
/// Arguments:
///
/// * `graph` - The input graph object to run the algorithm on
/// * `source` - The node flow leaves from
/// * `sink` - The node flow arrives at
/// * `capacity` - A function which will receive an edge reference from
///     ``graph`` and is expected to return its non-negative capacity
/// * `cost` - A function which will receive an edge reference from
///     ``graph`` and is expected to return the cost per unit of flow
///
/// Returns the flow on every arc carrying positive flow, keyed by
/// `(tail, head)`. Fails with [`FlowError::ParallelArcs`] if two edges with
/// positive capacity join the same ordered pair of nodes.
///
/// # Example
/// ```rust
/// use std::convert::Infallible;
/// use mcmf_core::petgraph;
/// use mcmf_core::flow::graph_min_cost_max_flow;
///
/// let mut graph = petgraph::graph::DiGraph::<(), (u32, i64)>::new();
/// let s = graph.add_node(());
/// let a = graph.add_node(());
/// let b = graph.add_node(());
/// let t = graph.add_node(());
/// graph.add_edge(s, a, (2, 1));
/// graph.add_edge(s, b, (2, 4));
/// graph.add_edge(a, t, (3, 1));
/// graph.add_edge(b, t, (1, 1));
///
/// let flow = graph_min_cost_max_flow(
///     &graph,
///     s,
///     t,
///     |e| Ok::<u32, Infallible>(e.weight().0),
///     |e| Ok(e.weight().1),
/// )
/// .unwrap();
///
/// assert_eq!(flow[&(s, a)], 2);
/// assert_eq!(flow[&(b, t)], 1);
/// ```
pub fn graph_min_cost_max_flow<G, N, C, F, W, E>(
    graph: G,
    source: G::NodeId,
    sink: G::NodeId,
    mut capacity: F,
    mut cost: W,
) -> Result<HashMap<(G::NodeId, G::NodeId), N>, FlowError<E>>
where
    G: IntoEdgeReferences + NodeIndexable,
    G::NodeId: Eq + Hash,
    N: PrimInt + Debug,
    C: Copy + PartialOrd + Zero + Debug,
    F: FnMut(G::EdgeRef) -> Result<N, E>,
    W: FnMut(G::EdgeRef) -> Result<C, E>,
{
    let num_nodes = graph.node_bound();
    let mut capacities: Array2<N> = Array2::zeros((num_nodes, num_nodes));
    let mut costs: Array2<C> = Array2::from_elem((num_nodes, num_nodes), C::zero());
    let mut seen = FixedBitSet::with_capacity(num_nodes * num_nodes);

    for edge in graph.edge_references() {
        let from = graph.to_index(edge.source());
        let to = graph.to_index(edge.target());
        if from == to {
            continue;
        }
        let cap = capacity(edge).map_err(FlowError::Oracle)?;
        if cap < N::zero() {
            return Err(FlowError::NegativeCapacity { from, to });
        }
        if cap == N::zero() {
            continue;
        }
        if seen.put(from * num_nodes + to) {
            return Err(FlowError::ParallelArcs { from, to });
        }
        capacities[[from, to]] = cap;
        costs[[from, to]] = cost(edge).map_err(FlowError::Oracle)?;
    }

    let flow = min_cost_max_flow(
        num_nodes,
        graph.to_index(source),
        graph.to_index(sink),
        |i, j| Ok::<N, E>(capacities[[i, j]]),
        |i, j| Ok::<C, E>(costs[[i, j]]),
    )?;

    Ok(flow
        .positive_arcs()
        .map(|(from, to, f)| ((graph.from_index(from), graph.from_index(to)), f))
        .collect())
}
