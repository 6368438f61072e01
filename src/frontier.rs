//! Node storage for the backward A* search.
//!
//! Nodes live in an arena indexed by their id, so a node keeps its identity
//! when its scores improve. The open list is a min-heap of `(f, h, id)` keys
//! with lazy invalidation: improving a node pushes a fresh key and the stale
//! one is skipped when it surfaces. Open and explored lookups go through
//! digest buckets and fall back to structural equality inside a bucket.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};

use crate::{Action, PVal, WorldState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeStatus {
    Open,
    Explored,
}

/// A search node: a world state plus how the search reached it.
///
/// G is the accumulated cost from the goal, H the estimated distance to the
/// start, and F their sum.
pub struct IntermediateState<'a> {
    pub(crate) id: usize,
    pub(crate) state: WorldState,
    pub(crate) g: f32,
    pub(crate) h: f32,
    pub(crate) f: f32,
    pub(crate) action: Option<&'a dyn Action>,
    pub(crate) params: Vec<PVal>,
    pub(crate) prev: Option<usize>,
    status: NodeStatus,
}

impl<'a> IntermediateState<'a> {
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn state(&self) -> &WorldState {
        &self.state
    }

    pub fn g(&self) -> f32 {
        self.g
    }

    pub fn h(&self) -> f32 {
        self.h
    }

    pub fn f(&self) -> f32 {
        self.f
    }

    /// The action that leads from this node's state to its predecessor's.
    pub fn action(&self) -> Option<&'a dyn Action> {
        self.action
    }

    pub fn params(&self) -> &[PVal] {
        &self.params
    }

    /// Index of the predecessor in the explored set. `None` for the root.
    pub fn prev(&self) -> Option<usize> {
        self.prev
    }
}

/// Scores and provenance for a node that is about to enter the frontier.
pub(crate) struct Candidate<'a> {
    pub state: WorldState,
    pub g: f32,
    pub h: f32,
    pub action: Option<&'a dyn Action>,
    pub params: Vec<PVal>,
    pub prev: Option<usize>,
}

impl Candidate<'_> {
    fn f(&self) -> f32 {
        self.g + self.h
    }
}

/// Heap key: lower F first, then lower H, then lower id.
#[derive(Debug, Clone, Copy)]
struct OpenKey {
    f: f32,
    h: f32,
    id: usize,
}

impl PartialEq for OpenKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenKey {}

impl PartialOrd for OpenKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f
            .total_cmp(&other.f)
            .then_with(|| self.h.total_cmp(&other.h))
            .then_with(|| self.id.cmp(&other.id))
    }
}

pub(crate) struct Frontier<'a> {
    nodes: Vec<IntermediateState<'a>>,
    heap: BinaryHeap<Reverse<OpenKey>>,
    open: HashMap<u64, Vec<usize>>,
    open_count: usize,
    explored: Vec<usize>,
    explored_by_digest: HashMap<u64, Vec<usize>>,
}

impl<'a> Frontier<'a> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            heap: BinaryHeap::new(),
            open: HashMap::new(),
            open_count: 0,
            explored: Vec::new(),
            explored_by_digest: HashMap::new(),
        }
    }

    /// Drops every node.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.heap.clear();
        self.open.clear();
        self.open_count = 0;
        self.explored.clear();
        self.explored_by_digest.clear();
    }

    pub fn open_len(&self) -> usize {
        self.open_count
    }

    pub fn explored_len(&self) -> usize {
        self.explored.len()
    }

    pub fn node(&self, id: usize) -> &IntermediateState<'a> {
        &self.nodes[id]
    }

    /// The node expanded at position `index` of the explored set.
    pub fn explored_node(&self, index: usize) -> &IntermediateState<'a> {
        &self.nodes[self.explored[index]]
    }

    /// Explored nodes in expansion order.
    pub fn explored(&self) -> impl Iterator<Item = &IntermediateState<'a>> + '_ {
        self.explored.iter().map(move |id| &self.nodes[*id])
    }

    /// Adds a new open node and returns its id. Ids are assigned in push
    /// order starting at 0.
    pub fn push(&mut self, candidate: Candidate<'a>) -> usize {
        let id = self.nodes.len();
        let f = candidate.f();
        let digest = candidate.state.digest();
        self.nodes.push(IntermediateState {
            id,
            state: candidate.state,
            g: candidate.g,
            h: candidate.h,
            f,
            action: candidate.action,
            params: candidate.params,
            prev: candidate.prev,
            status: NodeStatus::Open,
        });
        self.open.entry(digest).or_default().push(id);
        self.open_count += 1;
        self.heap.push(Reverse(OpenKey {
            f,
            h: candidate.h,
            id,
        }));
        id
    }

    /// Id of the open node holding `state`, if any.
    pub fn find_open(&self, state: &WorldState) -> Option<usize> {
        self.find_in(&self.open, state)
    }

    /// Whether a node holding `state` has already been expanded.
    pub fn is_explored(&self, state: &WorldState) -> bool {
        self.find_in(&self.explored_by_digest, state).is_some()
    }

    /// Replaces the scores and provenance of open node `id` when `candidate`
    /// reaches it with a strictly lower F. Returns whether it did.
    pub fn improve(&mut self, id: usize, candidate: Candidate<'a>) -> bool {
        let f = candidate.f();
        let node = &mut self.nodes[id];
        if node.status != NodeStatus::Open || f >= node.f {
            return false;
        }
        node.g = candidate.g;
        node.h = candidate.h;
        node.f = f;
        node.action = candidate.action;
        node.params = candidate.params;
        node.prev = candidate.prev;
        self.heap.push(Reverse(OpenKey {
            f,
            h: candidate.h,
            id,
        }));
        true
    }

    /// Moves the best open node to the explored set and returns its id.
    pub fn pop(&mut self) -> Option<usize> {
        while let Some(Reverse(key)) = self.heap.pop() {
            let node = &self.nodes[key.id];
            if node.status != NodeStatus::Open || node.f.to_bits() != key.f.to_bits() {
                // stale
                continue;
            }
            let digest = node.state.digest();
            if let Some(bucket) = self.open.get_mut(&digest) {
                bucket.retain(|id| *id != key.id);
                if bucket.is_empty() {
                    self.open.remove(&digest);
                }
            }
            self.open_count -= 1;
            self.nodes[key.id].status = NodeStatus::Explored;
            self.explored.push(key.id);
            self.explored_by_digest.entry(digest).or_default().push(key.id);
            return Some(key.id);
        }
        None
    }

    fn find_in(&self, buckets: &HashMap<u64, Vec<usize>>, state: &WorldState) -> Option<usize> {
        buckets
            .get(&state.digest())?
            .iter()
            .copied()
            .find(|id| self.nodes[*id].state == *state)
    }
}
