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

//! A binary heap with mutable priorities.
//!
//! [`IndexedPriorityQueue`] keeps a side table from every queued element to
//! its slot in the heap, so the priority of an element already in the queue
//! can be improved in `O(log n)` without scanning for it.

use std::hash::Hash;

use hashbrown::HashMap;

/// Decides which of two priorities is served first.
///
/// `precedes(a, b)` must be a strict order: it returns `true` only when `a`
/// is strictly better than `b`.
pub trait PriorityOrder<P> {
    fn precedes(&self, a: &P, b: &P) -> bool;
}

/// Lowest priority first.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MinFirst;

/// Highest priority first.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MaxFirst;

/// An order given by a closure `Fn(&P, &P) -> bool` with the semantics of
/// [`PriorityOrder::precedes`].
#[derive(Debug, Clone, Copy)]
pub struct OrderBy<F>(pub F);

impl<P: PartialOrd> PriorityOrder<P> for MinFirst {
    #[inline]
    fn precedes(&self, a: &P, b: &P) -> bool {
        a < b
    }
}

impl<P: PartialOrd> PriorityOrder<P> for MaxFirst {
    #[inline]
    fn precedes(&self, a: &P, b: &P) -> bool {
        a > b
    }
}

impl<P, F> PriorityOrder<P> for OrderBy<F>
where
    F: Fn(&P, &P) -> bool,
{
    #[inline]
    fn precedes(&self, a: &P, b: &P) -> bool {
        (self.0)(a, b)
    }
}

/// A priority queue whose elements are identified by a key and whose
/// priorities can be raised while queued.
///
/// "Raised" is relative to the configured [`PriorityOrder`]: with the default
/// [`MinFirst`] order a raise is a decrease of the stored value, which is the
/// decrease-key operation of Dijkstra's algorithm.
///
/// Each key is present at most once. Popping an element removes it
/// completely, so a later [`raise_or_insert`](Self::raise_or_insert) with the
/// same key inserts it again.
///
/// # Example
/// ```rust
/// use mcmf_core::priority_queue::IndexedPriorityQueue;
///
/// let mut queue: IndexedPriorityQueue<usize, f64> = IndexedPriorityQueue::new();
/// assert!(queue.raise_or_insert(3, 7.5));
/// assert!(queue.raise_or_insert(1, 2.0));
/// // Not an improvement over 7.5, ignored.
/// assert!(!queue.raise_or_insert(3, 9.0));
/// assert!(queue.raise_or_insert(3, 0.5));
///
/// assert_eq!(queue.pop_best(), (3, 0.5));
/// assert_eq!(queue.pop_best(), (1, 2.0));
/// assert!(queue.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct IndexedPriorityQueue<K, P, O = MinFirst> {
    heap: Vec<(K, P)>,
    slots: HashMap<K, usize>,
    order: O,
}

impl<K, P, O> Default for IndexedPriorityQueue<K, P, O>
where
    K: Hash + Eq + Clone,
    O: PriorityOrder<P> + Default,
{
    fn default() -> Self {
        Self::with_order(O::default())
    }
}

impl<K, P, O> IndexedPriorityQueue<K, P, O>
where
    K: Hash + Eq + Clone,
    O: PriorityOrder<P>,
{
    /// Create an empty queue using the default value of the order type.
    pub fn new() -> Self
    where
        O: Default,
    {
        Self::default()
    }

    /// Create an empty queue with an explicit order.
    pub fn with_order(order: O) -> Self {
        IndexedPriorityQueue {
            heap: Vec::new(),
            slots: HashMap::new(),
            order,
        }
    }

    /// Create an empty queue with room for `capacity` elements.
    pub fn with_capacity_and_order(capacity: usize, order: O) -> Self {
        IndexedPriorityQueue {
            heap: Vec::with_capacity(capacity),
            slots: HashMap::with_capacity(capacity),
            order,
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.slots.contains_key(key)
    }

    /// The current priority of `key`, if it is queued.
    pub fn priority(&self, key: &K) -> Option<&P> {
        self.slots.get(key).map(|&slot| &self.heap[slot].1)
    }

    /// The best element and its priority without removing it.
    pub fn peek(&self) -> Option<(&K, &P)> {
        self.heap.first().map(|(key, priority)| (key, priority))
    }

    pub fn clear(&mut self) {
        self.heap.clear();
        self.slots.clear();
    }

    /// Insert `key` with `priority`, or raise the priority of a queued `key`.
    ///
    /// A queued key is only updated when `priority` strictly precedes its
    /// current priority. Returns `true` when the key was inserted or updated
    /// and `false` when the call left the queue untouched.
    pub fn raise_or_insert(&mut self, key: K, priority: P) -> bool {
        let slot = match self.slots.get(&key) {
            Some(&slot) => {
                if !self.order.precedes(&priority, &self.heap[slot].1) {
                    return false;
                }
                self.heap[slot].1 = priority;
                slot
            }
            None => {
                let slot = self.heap.len();
                self.slots.insert(key.clone(), slot);
                self.heap.push((key, priority));
                slot
            }
        };
        self.sift_up(slot);
        true
    }

    /// Remove and return the best element, or `None` if the queue is empty.
    pub fn pop(&mut self) -> Option<(K, P)> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.swap_slots(0, last);
        let (key, priority) = self.heap.pop()?;
        self.slots.remove(&key);
        self.sift_down(0);
        Some((key, priority))
    }

    /// Remove and return the best element.
    ///
    /// # Panics
    ///
    /// Panics if the queue is empty. Check [`is_empty`](Self::is_empty)
    /// first or use [`pop`](Self::pop).
    pub fn pop_best(&mut self) -> (K, P) {
        match self.pop() {
            Some(best) => best,
            None => panic!("pop_best called on an empty priority queue"),
        }
    }

    fn swap_slots(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.heap.swap(a, b);
        if let Some(slot) = self.slots.get_mut(&self.heap[a].0) {
            *slot = a;
        }
        if let Some(slot) = self.slots.get_mut(&self.heap[b].0) {
            *slot = b;
        }
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if !self
                .order
                .precedes(&self.heap[index].1, &self.heap[parent].1)
            {
                break;
            }
            self.swap_slots(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * index + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let mut best = left;
            if right < len
                && self
                    .order
                    .precedes(&self.heap[right].1, &self.heap[left].1)
            {
                best = right;
            }
            if !self.order.precedes(&self.heap[best].1, &self.heap[index].1) {
                break;
            }
            self.swap_slots(index, best);
            index = best;
        }
    }

    #[cfg(test)]
    fn assert_consistent(&self) {
        assert_eq!(self.heap.len(), self.slots.len());
        for (slot, (key, _)) in self.heap.iter().enumerate() {
            assert_eq!(self.slots[key], slot);
            if slot > 0 {
                let parent = (slot - 1) / 2;
                assert!(!self
                    .order
                    .precedes(&self.heap[slot].1, &self.heap[parent].1));
            }
        }
    }
}
