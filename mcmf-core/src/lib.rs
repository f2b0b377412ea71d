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

//! # mcmf-core
//!
//! Minimum cost maximum flow on small dense networks, and the minimum cost
//! assignment problem built on top of it.
//!
//! Networks are not stored as graphs. A network on `num_nodes` nodes is
//! described by callbacks over node indices: a capacity for every ordered
//! pair (zero when there is no arc) and a cost per unit of flow. Every
//! callback returns a `Result` so a failure on the caller's side is passed
//! through; use [`std::convert::Infallible`] when nothing can fail.
//!
//! ## Modules
//!
//! - [`priority_queue`] - a binary heap whose priorities can be raised in place
//! - [`shortest_path`] - Dijkstra's algorithm over a dense, callback-described graph
//! - [`flow`] - successive shortest paths minimum cost maximum flow
//! - [`matching`] - the assignment problem reduced to flow
//!
//! ## Example
//!
//! ```rust
//! use std::convert::Infallible;
//! use mcmf_core::matching::{assignment_cost, min_cost_assignment};
//!
//! // Three workers, two jobs.
//! let costs = [[11.123, 8.7], [104.7, 6.42], [65.93, 2.42]];
//! let matching = min_cost_assignment(
//!     3,
//!     2,
//!     |_, _| Ok::<bool, Infallible>(true),
//!     |i, j| Ok(costs[i][j]),
//! )
//! .unwrap();
//! let total = assignment_cost(&matching, |i, j| Ok::<f64, Infallible>(costs[i][j])).unwrap();
//!
//! assert_eq!(matching, vec![Some(0), None, Some(1)]);
//! assert!((total - 13.543).abs() < 1e-9);
//! ```

mod error;

pub mod flow;
pub mod matching;
pub mod priority_queue;
pub mod shortest_path;

// Re-export the graph and array crates so callers use the same versions
pub use ndarray;
pub use petgraph;

pub use error::FlowError;
