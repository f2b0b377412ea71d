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

//! Minimum cost maximum flow on dense networks.
//!
//! Networks are described by capacity and cost callbacks over node indices
//! `0..num_nodes` instead of an explicit graph structure; see
//! [`min_cost_max_flow`]. [`graph_min_cost_max_flow`] adapts a petgraph graph
//! to the same solver.

mod flow_matrix;
mod graph;
mod residual;
mod successive_shortest_paths;

pub use flow_matrix::FlowMatrix;
pub use graph::graph_min_cost_max_flow;
pub use successive_shortest_paths::min_cost_max_flow;
