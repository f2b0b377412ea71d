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

use std::ops::Mul;

use ndarray::{Array2, ArrayView1};
use num_traits::{PrimInt, Zero};

/// Net flow on every arc of a dense network.
///
/// `get(i, j)` is the flow routed along `i -> j`. Flow is stored net of
/// cancellation: `get(i, j)` and `get(j, i)` are never both positive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowMatrix<N> {
    flow: Array2<N>,
}

impl<N: PrimInt> FlowMatrix<N> {
    pub(crate) fn new(flow: Array2<N>) -> Self {
        FlowMatrix { flow }
    }

    pub fn num_nodes(&self) -> usize {
        self.flow.nrows()
    }

    /// Flow on the arc `from -> to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> N {
        self.flow[[from, to]]
    }

    pub fn as_array(&self) -> &Array2<N> {
        &self.flow
    }

    pub fn into_inner(self) -> Array2<N> {
        self.flow
    }

    /// Arcs carrying positive flow as `(from, to, flow)`, in row-major order.
    pub fn positive_arcs(&self) -> impl Iterator<Item = (usize, usize, N)> + '_ {
        self.flow
            .indexed_iter()
            .filter(|(_, f)| **f > N::zero())
            .map(|((from, to), &f)| (from, to, f))
    }

    /// Total flow leaving `node` minus the flow entering it, saturating at zero.
    ///
    /// For the source of a solved network this is the value of the flow. The
    /// sums are taken in `u128` since a node's throughput may not fit in `N`
    /// even when every arc's flow does.
    pub fn value(&self, node: usize) -> u128 {
        let (out, into) = self.throughput(node);
        out.saturating_sub(into)
    }

    /// Flow leaving and entering `node`.
    fn throughput(&self, node: usize) -> (u128, u128) {
        (wide_sum(self.flow.row(node)), wide_sum(self.flow.column(node)))
    }

    /// Sum of `flow(i, j) * cost(i, j)` over the arcs carrying flow.
    ///
    /// `cost` is only called for arcs with positive flow.
    pub fn total_cost<C, W, E>(&self, mut cost: W) -> Result<C, E>
    where
        C: Copy + Zero + Mul<Output = C> + From<N>,
        W: FnMut(usize, usize) -> Result<C, E>,
    {
        let mut total = C::zero();
        for (from, to, f) in self.positive_arcs() {
            total = total + C::from(f) * cost(from, to)?;
        }
        Ok(total)
    }

    /// Whether inflow equals outflow at every node other than `source` and
    /// `sink`.
    pub fn is_conserved(&self, source: usize, sink: usize) -> bool {
        (0..self.num_nodes())
            .filter(|&node| node != source && node != sink)
            .all(|node| {
                let (out, into) = self.throughput(node);
                out == into
            })
    }

    /// Whether every arc carries at most its capacity and no pair of nodes
    /// carries flow in both directions.
    pub fn respects_capacities<F, E>(&self, mut capacity: F) -> Result<bool, E>
    where
        F: FnMut(usize, usize) -> Result<N, E>,
    {
        for ((from, to), &f) in self.flow.indexed_iter() {
            if f > capacity(from, to)? {
                return Ok(false);
            }
            if f > N::zero() && self.flow[[to, from]] > N::zero() {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

fn wide_sum<N: PrimInt>(flows: ArrayView1<N>) -> u128 {
    flows
        .iter()
        .map(|f| f.to_u128().unwrap_or(0))
        .fold(0, u128::saturating_add)
}
