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

use log::{debug, trace};
use num_traits::{PrimInt, Zero};

use super::residual::ResidualNetwork;
use super::FlowMatrix;
use crate::shortest_path::dense_dijkstra;
use crate::FlowError;

/// Find a maximum flow of minimum cost from `source` to `sink`.
///
/// This is the successive shortest paths algorithm: starting from the zero
/// flow, a cheapest `source -> sink` path is searched in the residual graph
/// (an arc exists wherever residual capacity is positive), saturated up to
/// its bottleneck, and the search repeats until the sink is unreachable.
/// Each round adds at least one unit of flow, so the loop terminates.
///
/// The network is dense: nodes are `0..num_nodes` and both callbacks are
/// queried for arbitrary pairs of nodes. `capacity(i, j)` is read once per
/// pair up front; a capacity of zero means there is no arc.
/// `cost(i, j)` is the per-unit cost of `i -> j` and is consulted whenever
/// the search follows that residual arc, including arcs that only exist
/// because flow on `j -> i` can be cancelled. The same callback prices both
/// directions; no negated reverse cost is derived. The result is a minimum
/// cost maximum flow when costs are non-negative and a cheapest path never
/// benefits from undoing flow at a refund, which holds for uniform costs and
/// for networks where no flow is ever cancelled.
///
/// Arguments:
///
/// * `num_nodes` - The number of nodes in the network
/// * `source` - The node flow leaves from
/// * `sink` - The node flow arrives at
/// * `capacity` - Callback returning the non-negative capacity of `i -> j`
/// * `cost` - Callback returning the per-unit cost of traversing `i -> j`
///
/// Returns the net flow on every arc, or an error if `source` or `sink` is
/// out of bounds, they are the same node, a capacity is negative, the
/// capacities of two antiparallel arcs add up past `N::max_value()` or a
/// callback fails.
///
/// # Example
/// ```rust
/// use std::convert::Infallible;
/// use mcmf_core::flow::min_cost_max_flow;
///
/// // Two parallel routes from 0 to 3: through 1 (capacity 2) and 2 (capacity 3).
/// let capacities = [
///     [0, 2, 3, 0],
///     [0, 0, 0, 2],
///     [0, 0, 0, 3],
///     [0, 0, 0, 0],
/// ];
/// let flow = min_cost_max_flow(
///     4,
///     0,
///     3,
///     |i, j| Ok::<u32, Infallible>(capacities[i][j]),
///     |_, _| Ok(1.0),
/// )
/// .unwrap();
///
/// assert_eq!(flow.value(0), 5);
/// assert_eq!(flow.get(1, 3), 2);
/// assert_eq!(flow.get(2, 3), 3);
/// ```
pub fn min_cost_max_flow<N, C, F, W, E>(
    num_nodes: usize,
    source: usize,
    sink: usize,
    capacity: F,
    mut cost: W,
) -> Result<FlowMatrix<N>, FlowError<E>>
where
    N: PrimInt + Debug,
    C: Copy + PartialOrd + Zero + Debug,
    F: FnMut(usize, usize) -> Result<N, E>,
    W: FnMut(usize, usize) -> Result<C, E>,
{
    FlowError::<E>::check_node("source", source, num_nodes)?;
    FlowError::<E>::check_node("sink", sink, num_nodes)?;
    if source == sink {
        return Err(FlowError::SourceIsSink(source));
    }

    let mut network = ResidualNetwork::from_capacities(num_nodes, capacity)?;
    let mut augmentations = 0usize;

    loop {
        let path = dense_dijkstra(
            num_nodes,
            source,
            sink,
            |i, j| Ok(network.has_arc(i, j)),
            &mut cost,
        )
        .map_err(FlowError::Oracle)?;
        if !path.is_found() {
            break;
        }
        let bottleneck = match network.bottleneck(&path) {
            Some(bottleneck) => bottleneck,
            None => break,
        };
        trace!(
            "augmenting path {:?}: bottleneck {:?}, cost {:?}",
            path.path(),
            bottleneck,
            path.distance()
        );
        network.augment(&path, bottleneck);
        augmentations += 1;
    }

    let flow = network.into_flow();
    debug!(
        "min_cost_max_flow: {} nodes, {} augmentations, flow value {:?}",
        num_nodes,
        augmentations,
        flow.value(source)
    );
    Ok(flow)
}
