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

use ndarray::Array2;
use num_traits::PrimInt;

use super::FlowMatrix;
use crate::shortest_path::PathTree;
use crate::FlowError;

/// Residual capacities and net flow of a dense network, both indexed by
/// `[[tail, head]]`.
///
/// `residual[[i, j]]` always equals `capacity(i, j) - flow[[i, j]] +
/// flow[[j, i]]`, and at most one of `flow[[i, j]]` and `flow[[j, i]]` is
/// positive.
#[derive(Debug, Clone)]
pub(crate) struct ResidualNetwork<N> {
    residual: Array2<N>,
    flow: Array2<N>,
}

impl<N: PrimInt> ResidualNetwork<N> {
    /// Start from the zero flow, so the residual graph is the capacity graph.
    ///
    /// Fails if a capacity is negative or if `capacity(i, j) + capacity(j, i)`
    /// does not fit in `N`.
    pub(crate) fn from_capacities<F, E>(
        num_nodes: usize,
        mut capacity: F,
    ) -> Result<Self, FlowError<E>>
    where
        F: FnMut(usize, usize) -> Result<N, E>,
    {
        let mut residual = Array2::zeros((num_nodes, num_nodes));
        for ((from, to), slot) in residual.indexed_iter_mut() {
            let cap = capacity(from, to).map_err(FlowError::Oracle)?;
            if cap < N::zero() {
                return Err(FlowError::NegativeCapacity { from, to });
            }
            *slot = cap;
        }
        // A residual never exceeds the capacities of both directions combined.
        for from in 0..num_nodes {
            for to in from + 1..num_nodes {
                if residual[[from, to]].checked_add(&residual[[to, from]]).is_none() {
                    return Err(FlowError::CapacityOverflow { from, to });
                }
            }
        }
        Ok(ResidualNetwork {
            residual,
            flow: Array2::zeros((num_nodes, num_nodes)),
        })
    }

    #[inline]
    pub(crate) fn has_arc(&self, from: usize, to: usize) -> bool {
        self.residual[[from, to]] > N::zero()
    }

    #[cfg(test)]
    pub(crate) fn residual(&self, from: usize, to: usize) -> N {
        self.residual[[from, to]]
    }

    /// Smallest residual capacity on the path, `None` for an empty path.
    pub(crate) fn bottleneck<C: Copy>(&self, path: &PathTree<C>) -> Option<N> {
        path.arcs().map(|(tail, head)| self.residual[[tail, head]]).min()
    }

    /// Push `amount` units along every arc of `path`.
    ///
    /// `amount` must not exceed the path's bottleneck. Flow pushed along
    /// `tail -> head` first cancels flow recorded on `head -> tail`.
    pub(crate) fn augment<C: Copy>(&mut self, path: &PathTree<C>, amount: N) {
        for (tail, head) in path.arcs() {
            self.residual[[tail, head]] = self.residual[[tail, head]] - amount;
            self.residual[[head, tail]] = self.residual[[head, tail]] + amount;

            let opposing = self.flow[[head, tail]];
            if amount >= opposing {
                self.flow[[head, tail]] = N::zero();
                self.flow[[tail, head]] = self.flow[[tail, head]] + (amount - opposing);
            } else {
                self.flow[[head, tail]] = opposing - amount;
            }
        }
    }

    pub(crate) fn into_flow(self) -> FlowMatrix<N> {
        FlowMatrix::new(self.flow)
    }
}
