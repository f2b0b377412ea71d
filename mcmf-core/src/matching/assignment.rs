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

use std::convert::Infallible;
use std::fmt::Debug;

use log::debug;
use ndarray::ArrayView2;
use num_traits::{PrimInt, Zero};

use crate::flow::{min_cost_max_flow, FlowMatrix};
use crate::FlowError;

/// The flow network an assignment problem is reduced to.
///
/// With `left` nodes on one side and `right` nodes on the other, node
/// indices are laid out as:
///
/// * `0..left` - the left nodes
/// * `left..left + right` - the right nodes, right node `j` is `left + j`
/// * `left + right` - the source
/// * `left + right + 1` - the sink
///
/// The source feeds every left node and every right node drains into the
/// sink with capacity 1 and cost 0. A left node `i` is joined to right node
/// `j` with capacity 1 when the pair can be matched, at the cost of
/// matching them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchingNetwork {
    left: usize,
    right: usize,
}

impl MatchingNetwork {
    pub fn new(left: usize, right: usize) -> Self {
        MatchingNetwork { left, right }
    }

    pub fn num_nodes(&self) -> usize {
        self.left + self.right + 2
    }

    pub fn source(&self) -> usize {
        self.left + self.right
    }

    pub fn sink(&self) -> usize {
        self.left + self.right + 1
    }

    pub fn is_left(&self, node: usize) -> bool {
        node < self.left
    }

    pub fn is_right(&self, node: usize) -> bool {
        node >= self.left && node < self.left + self.right
    }

    /// Node index of right node `j`.
    pub fn right_node(&self, j: usize) -> usize {
        self.left + j
    }

    /// Capacity of `from -> to`: 1 for an arc of the network, 0 otherwise.
    ///
    /// `match_possible` is called with a left index and a right index, only
    /// for arcs from a left node to a right node.
    pub fn capacity<N, P, E>(&self, from: usize, to: usize, match_possible: &mut P) -> Result<N, E>
    where
        N: PrimInt,
        P: FnMut(usize, usize) -> Result<bool, E>,
    {
        let arc = (from == self.source() && self.is_left(to))
            || (self.is_right(from) && to == self.sink())
            || (self.is_left(from) && self.is_right(to) && match_possible(from, to - self.left)?);
        Ok(if arc { N::one() } else { N::zero() })
    }

    /// Cost of `from -> to`: the matching cost for a left to right arc and
    /// zero for every other pair, including right to left.
    pub fn arc_cost<C, W, E>(&self, from: usize, to: usize, match_cost: &mut W) -> Result<C, E>
    where
        C: Zero,
        W: FnMut(usize, usize) -> Result<C, E>,
    {
        if self.is_left(from) && self.is_right(to) {
            match_cost(from, to - self.left)
        } else {
            Ok(C::zero())
        }
    }

    /// Read the matching off a flow on this network.
    ///
    /// Entry `i` is the first right index `j`, in increasing order, whose arc
    /// from left node `i` carries flow, or `None` if there is none.
    pub fn decode<N: PrimInt>(&self, flow: &FlowMatrix<N>) -> Vec<Option<usize>> {
        (0..self.left)
            .map(|i| (0..self.right).find(|&j| flow.get(i, self.right_node(j)) > N::zero()))
            .collect()
    }
}

/// Solve the minimum cost assignment problem between `left` and `right`
/// elements.
///
/// The problem is reduced to [`min_cost_max_flow`] on a [`MatchingNetwork`]:
/// the result matches as many pairs as possible, one-to-one, and sizes may
/// differ, leaving the excess elements unmatched.
///
/// Costs must be non-negative. The solver prices undoing an earlier match
/// at zero instead of refunding its cost (see [`min_cost_max_flow`]), so the
/// total is minimal whenever the search never has to reassign an already
/// matched right element to reach a cheaper combination.
///
/// Arguments:
///
/// * `left` - Number of elements on the left side
/// * `right` - Number of elements on the right side
/// * `match_possible` - Callback receiving a left and a right index and
///     returning whether the two can be matched
/// * `match_cost` - Callback receiving a left and a right index and returning
///     the cost of matching them. It is only called for pairs
///     `match_possible` accepted.
///
/// Returns, for every left index, the matched right index or `None`.
///
/// # Example
/// ```rust
/// use std::convert::Infallible;
/// use mcmf_core::matching::min_cost_assignment;
///
/// let costs = [[11.123, 8.7], [104.7, 6.42], [65.93, 2.42]];
/// let matching = min_cost_assignment(
///     3,
///     2,
///     |_, _| Ok::<bool, Infallible>(true),
///     |i, j| Ok(costs[i][j]),
/// )
/// .unwrap();
///
/// assert_eq!(matching, vec![Some(0), None, Some(1)]);
/// ```
pub fn min_cost_assignment<C, P, W, E>(
    left: usize,
    right: usize,
    mut match_possible: P,
    mut match_cost: W,
) -> Result<Vec<Option<usize>>, FlowError<E>>
where
    C: Copy + PartialOrd + Zero + Debug,
    P: FnMut(usize, usize) -> Result<bool, E>,
    W: FnMut(usize, usize) -> Result<C, E>,
{
    let network = MatchingNetwork::new(left, right);
    let flow: FlowMatrix<u32> = min_cost_max_flow(
        network.num_nodes(),
        network.source(),
        network.sink(),
        |i, j| network.capacity(i, j, &mut match_possible),
        |i, j| network.arc_cost(i, j, &mut match_cost),
    )?;
    let matching = network.decode(&flow);
    debug!(
        "min_cost_assignment: {} x {}, {} pairs matched",
        left,
        right,
        matching.iter().flatten().count()
    );
    Ok(matching)
}

/// [`min_cost_assignment`] over a dense table of costs, where `None` marks a
/// pair that cannot be matched. Rows are left elements, columns right ones.
///
/// # Example
/// ```rust
/// use mcmf_core::ndarray::array;
/// use mcmf_core::matching::min_cost_assignment_matrix;
///
/// let costs = array![[Some(4), None], [Some(1), Some(3)]];
/// let matching = min_cost_assignment_matrix(costs.view()).unwrap();
/// assert_eq!(matching, vec![Some(0), Some(1)]);
/// ```
pub fn min_cost_assignment_matrix<C>(
    costs: ArrayView2<'_, Option<C>>,
) -> Result<Vec<Option<usize>>, FlowError<Infallible>>
where
    C: Copy + PartialOrd + Zero + Debug,
{
    let (left, right) = costs.dim();
    min_cost_assignment(
        left,
        right,
        |i, j| Ok(costs[[i, j]].is_some()),
        |i, j| Ok(costs[[i, j]].unwrap_or_else(C::zero)),
    )
}

/// Total cost of a matching returned by [`min_cost_assignment`].
pub fn assignment_cost<C, W, E>(matching: &[Option<usize>], mut match_cost: W) -> Result<C, E>
where
    C: Zero,
    W: FnMut(usize, usize) -> Result<C, E>,
{
    let mut total = C::zero();
    for (i, j) in matching.iter().enumerate() {
        if let Some(j) = *j {
            total = total + match_cost(i, j)?;
        }
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::{assignment_cost, min_cost_assignment, min_cost_assignment_matrix, MatchingNetwork};
    use crate::flow::{min_cost_max_flow, FlowMatrix};
    use ndarray::array;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64;
    use rayon::prelude::*;
    use std::convert::Infallible;

    fn all_pairs(_: usize, _: usize) -> Result<bool, Infallible> {
        Ok(true)
    }

    /// Size of a maximum matching, by augmenting paths.
    fn maximum_matching_size(allowed: &[Vec<bool>], right: usize) -> usize {
        fn augment(i: usize, allowed: &[Vec<bool>], seen: &mut [bool], owner: &mut [Option<usize>]) -> bool {
            for j in 0..seen.len() {
                if allowed[i][j] && !seen[j] {
                    seen[j] = true;
                    if owner[j].map_or(true, |k| augment(k, allowed, seen, owner)) {
                        owner[j] = Some(i);
                        return true;
                    }
                }
            }
            false
        }
        let mut owner = vec![None; right];
        (0..allowed.len())
            .filter(|&i| augment(i, allowed, &mut vec![false; right], &mut owner))
            .count()
    }

    #[test]
    fn test_more_left_than_right() {
        let costs = [[11.123, 8.7], [104.7, 6.42], [65.93, 2.42]];
        let matching = min_cost_assignment(3, 2, all_pairs, |i, j| Ok(costs[i][j])).unwrap();
        assert_eq!(matching, vec![Some(0), None, Some(1)]);

        let total = assignment_cost(&matching, |i, j| Ok::<f64, Infallible>(costs[i][j])).unwrap();
        // Cheapest of all matchings with two pairs.
        let mut best = f64::INFINITY;
        for a in 0..3 {
            for b in 0..3 {
                if a != b {
                    best = best.min(costs[a][0] + costs[b][1]);
                }
            }
        }
        assert!((total - best).abs() < 1e-9);
        assert!((total - 13.543).abs() < 1e-9);
    }

    #[test]
    fn test_more_right_than_left() {
        let costs = [[3, 1, 7, 2], [5, 9, 1, 8]];
        let matching = min_cost_assignment(2, 4, all_pairs, |i, j| Ok(costs[i][j])).unwrap();
        assert_eq!(matching, vec![Some(1), Some(2)]);
        assert_eq!(assignment_cost(&matching, |i, j| Ok::<i32, Infallible>(costs[i][j])), Ok(2));
    }

    #[test]
    fn test_infeasible_pairs_are_never_priced() {
        let possible = [[false, true], [true, false], [false, false]];
        let matching = min_cost_assignment(
            3,
            2,
            |i, j| Ok(possible[i][j]),
            |i, j| {
                if possible[i][j] {
                    Ok(1u32)
                } else {
                    Err(format!("priced infeasible pair ({i}, {j})"))
                }
            },
        )
        .unwrap();
        assert_eq!(matching, vec![Some(1), Some(0), None]);
    }

    #[test]
    fn test_nothing_can_be_matched() {
        let matching = min_cost_assignment(
            2,
            2,
            |_, _| Ok(false),
            |_, _| Err::<f64, &str>("no pair is feasible"),
        )
        .unwrap();
        assert_eq!(matching, vec![None, None]);

        let empty = min_cost_assignment(0, 3, all_pairs, |_, _| Ok(1.0)).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_reverse_arcs_are_priced_by_the_forward_oracle() {
        // The first round matches 0 -> 0 (cost 5). Moving it to 0 -> 1 so
        // that 1 takes 0 would total 16, but undoing 0 -> 0 is priced at zero
        // rather than -5, so 1 -> 1 (cost 14) looks cheaper and is kept.
        let costs = [[5, 10], [6, 14]];
        let matching = min_cost_assignment(2, 2, all_pairs, |i, j| Ok(costs[i][j])).unwrap();
        assert_eq!(matching, vec![Some(0), Some(1)]);
        assert_eq!(assignment_cost(&matching, |i, j| Ok::<i32, Infallible>(costs[i][j])), Ok(19));
    }

    #[test]
    fn test_flow_on_network_decodes_to_the_same_matching() {
        let costs = [[4.0, 1.0, 3.0], [2.0, 0.5, 5.0], [3.0, 2.0, 2.0], [7.0, 6.0, 1.5]];
        let possible = |i: usize, j: usize| Ok::<bool, Infallible>((i + j) % 4 != 3);
        let cost = |i: usize, j: usize| Ok::<f64, Infallible>(costs[i][j]);

        let network = MatchingNetwork::new(4, 3);
        let (mut possible_arc, mut arc_cost) = (possible, cost);
        let flow: FlowMatrix<u32> = min_cost_max_flow(
            network.num_nodes(),
            network.source(),
            network.sink(),
            |i, j| network.capacity(i, j, &mut possible_arc),
            |i, j| network.arc_cost(i, j, &mut arc_cost),
        )
        .unwrap();
        let matching = min_cost_assignment(4, 3, possible, cost).unwrap();

        assert_eq!(network.decode(&flow), matching);
        for (i, j) in matching.iter().enumerate() {
            match j {
                Some(j) => assert_eq!(flow.get(i, network.right_node(*j)), 1),
                None => assert!((0..3).all(|j| flow.get(i, network.right_node(j)) == 0)),
            }
        }
        assert!(flow.is_conserved(network.source(), network.sink()));
        assert_eq!(flow.value(network.source()) as usize, matching.iter().flatten().count());
    }

    #[test]
    fn test_network_layout() {
        let network = MatchingNetwork::new(2, 3);
        assert_eq!(network.num_nodes(), 7);
        assert_eq!(network.source(), 5);
        assert_eq!(network.sink(), 6);
        assert!(network.is_left(1) && !network.is_left(2));
        assert!(network.is_right(2) && network.is_right(4) && !network.is_right(5));

        let cap = |from: usize, to: usize| -> u8 {
            let mut never = |_: usize, _: usize| Ok::<bool, Infallible>(false);
            match network.capacity(from, to, &mut never) {
                Ok(cap) => cap,
                Err(never) => match never {},
            }
        };
        assert_eq!(cap(5, 0), 1);
        assert_eq!(cap(0, 5), 0);
        assert_eq!(cap(3, 6), 1);
        assert_eq!(cap(0, 3), 0);
        assert_eq!(cap(5, 6), 0);

        let mut price = |i: usize, j: usize| Ok::<i32, Infallible>(10 * i as i32 + j as i32);
        assert_eq!(network.arc_cost(1, 4, &mut price), Ok(12));
        assert_eq!(network.arc_cost(4, 1, &mut price), Ok(0));
        assert_eq!(network.arc_cost(5, 0, &mut price), Ok(0));
    }

    #[test]
    fn test_matrix_costs() {
        let costs = array![
            [Some(2u32), Some(9), None],
            [None, Some(1), Some(4)],
            [None, None, None],
        ];
        let matching = min_cost_assignment_matrix(costs.view()).unwrap();
        assert_eq!(matching, vec![Some(0), Some(1), None]);
    }

    #[test]
    fn test_random_assignments_are_maximum_and_feasible() {
        let mut rng = Pcg64::seed_from_u64(1234);
        for _ in 0..300 {
            let left = rng.gen_range(0..7);
            let right = rng.gen_range(0..7);
            let allowed: Vec<Vec<bool>> = (0..left)
                .map(|_| (0..right).map(|_| rng.gen_bool(0.5)).collect())
                .collect();
            let costs: Vec<Vec<u32>> = (0..left)
                .map(|_| (0..right).map(|_| rng.gen_range(0..100)).collect())
                .collect();

            let matching = min_cost_assignment(
                left,
                right,
                |i, j| Ok::<bool, Infallible>(allowed[i][j]),
                |i, j| Ok(costs[i][j]),
            )
            .unwrap();

            assert_eq!(matching.len(), left);
            let mut used = vec![false; right];
            for (i, j) in matching.iter().enumerate() {
                if let Some(j) = *j {
                    assert!(allowed[i][j]);
                    assert!(!used[j], "right element {j} matched twice");
                    used[j] = true;
                }
            }
            assert_eq!(
                matching.iter().flatten().count(),
                maximum_matching_size(&allowed, right)
            );
        }
    }

    #[test]
    fn test_concurrent_solves_agree_with_sequential() {
        let instances: Vec<Vec<Vec<i64>>> = (0..32u64)
            .map(|seed| {
                let mut rng = Pcg64::seed_from_u64(seed);
                let size = rng.gen_range(1..9);
                (0..size)
                    .map(|_| (0..size).map(|_| rng.gen_range(0..50)).collect())
                    .collect()
            })
            .collect();
        let solve = |costs: &Vec<Vec<i64>>| {
            min_cost_assignment(costs.len(), costs.len(), all_pairs, |i, j| Ok(costs[i][j])).unwrap()
        };

        let sequential: Vec<_> = instances.iter().map(solve).collect();
        let parallel: Vec<_> = instances.par_iter().map(solve).collect();
        assert_eq!(sequential, parallel);
        assert!(sequential.iter().all(|m| m.iter().all(Option::is_some)));
    }
}
