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

use thiserror::Error;

/// Error returned by the flow and assignment solvers.
///
/// `E` is the error type of the caller's oracle callbacks. Callers whose
/// callbacks cannot fail use [`std::convert::Infallible`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlowError<E> {
    #[error("{role} index {index} out of bounds for a network of {num_nodes} nodes")]
    NodeOutOfBounds {
        role: &'static str,
        index: usize,
        num_nodes: usize,
    },
    #[error("source and sink are the same node ({0})")]
    SourceIsSink(usize),
    #[error("negative capacity on arc ({from}, {to})")]
    NegativeCapacity { from: usize, to: usize },
    #[error("capacities of arcs ({from}, {to}) and ({to}, {from}) together overflow the capacity type")]
    CapacityOverflow { from: usize, to: usize },
    #[error("more than one arc from node {from} to node {to}")]
    ParallelArcs { from: usize, to: usize },
    #[error("oracle callback failed")]
    Oracle(#[source] E),
}

impl<E> FlowError<E> {
    pub(crate) fn check_node(role: &'static str, index: usize, num_nodes: usize) -> Result<(), Self> {
        if index < num_nodes {
            Ok(())
        } else {
            Err(FlowError::NodeOutOfBounds {
                role,
                index,
                num_nodes,
            })
        }
    }
}
