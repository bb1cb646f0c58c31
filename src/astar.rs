//! Step-wise A* over a [Grid] with 4-directional unit-cost moves.
//!
//! Nodes live in an insertion-ordered arena (an `IndexMap` with the Fx hasher) and refer to
//! their predecessor by arena index, so the predecessor tree never holds references. The
//! frontier is a [BinaryHeap] ordered by `(f, arena index)`: lowest `f` first, ties resolved
//! in favour of the node that was discovered first. A node keeps its arena index when it is
//! re-parented, so its tie-break rank is its first insertion.
use fxhash::FxBuildHasher;
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::IndexMap;
use log::{debug, info};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use crate::coord::Coord;
use crate::grid::Grid;
use crate::observer::NodeKind;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

const NO_PARENT: usize = usize::MAX;

/// Estimate of the remaining distance to the goal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Heuristic {
    /// Admissible and consistent for 4-directional unit-cost movement.
    #[default]
    Manhattan,
    /// Always zero, turning the search into Dijkstra's algorithm.
    Zero,
}

impl Heuristic {
    pub fn estimate(self, from: &Coord, goal: &Coord) -> u32 {
        match self {
            Heuristic::Manhattan => from.manhattan_distance(goal),
            Heuristic::Zero => 0,
        }
    }
}

/// A single observable step of the search, in the order it happened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchEvent {
    /// A node entered the open set or was settled. Never emitted for the start or end cell.
    Node { coord: Coord, kind: NodeKind },
    /// The end was settled; carries the path from start to end inclusive.
    PathFound(Vec<Coord>),
    /// A non-goal node has been fully expanded. This is the only pacing boundary.
    StepComplete { nodes_explored: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FoundPath {
    /// Start to end inclusive.
    pub path: Vec<Coord>,
    /// Nodes settled, counting both the start and the end.
    pub nodes_explored: usize,
}

impl FoundPath {
    /// Number of moves, one less than the number of cells.
    pub fn moves(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// Terminal result of a search. An exhausted frontier is a normal outcome, not an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(FoundPath),
    NoPath { nodes_explored: usize },
    /// The caller stopped the search at a pacing boundary.
    Cancelled { nodes_explored: usize },
}

impl SearchOutcome {
    pub fn path(&self) -> Option<&[Coord]> {
        match self {
            SearchOutcome::Found(found) => Some(&found.path),
            _ => None,
        }
    }

    pub fn into_path(self) -> Option<Vec<Coord>> {
        match self {
            SearchOutcome::Found(found) => Some(found.path),
            _ => None,
        }
    }

    pub fn nodes_explored(&self) -> usize {
        match self {
            SearchOutcome::Found(found) => found.nodes_explored,
            SearchOutcome::NoPath { nodes_explored }
            | SearchOutcome::Cancelled { nodes_explored } => *nodes_explored,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }
}

#[derive(Clone, Copy, Debug)]
struct SearchNode {
    g: u32,
    h: u32,
    parent: usize,
    closed: bool,
}

impl SearchNode {
    fn f(&self) -> u32 {
        self.g + self.h
    }
}

struct SmallestCostHolder {
    estimated_cost: u32,
    index: usize,
}

impl Eq for SmallestCostHolder {}

impl PartialEq for SmallestCostHolder {
    fn eq(&self, other: &Self) -> bool {
        self.estimated_cost == other.estimated_cost && self.index == other.index
    }
}

impl PartialOrd for SmallestCostHolder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SmallestCostHolder {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap: the smallest estimate wins, then the earliest discovered node.
        other
            .estimated_cost
            .cmp(&self.estimated_cost)
            .then_with(|| other.index.cmp(&self.index))
    }
}

/// One A* run over a borrowed grid. Iterating yields [SearchEvent]s; the grid cannot be
/// mutated while the search is alive. Dropping it abandons the search.
///
/// The caller is expected to have checked that `start` and `end` are in bounds and not walls,
/// see [PathSearchEngine::validate](crate::PathSearchEngine::validate). Generated neighbours
/// are always bounds-checked.
pub struct PathSearch<'g> {
    grid: &'g Grid,
    start: Coord,
    end: Coord,
    heuristic: Heuristic,
    nodes: FxIndexMap<Coord, SearchNode>,
    to_see: BinaryHeap<SmallestCostHolder>,
    pending: VecDeque<SearchEvent>,
    nodes_explored: usize,
    outcome: Option<SearchOutcome>,
}

impl<'g> PathSearch<'g> {
    pub fn new(grid: &'g Grid, start: Coord, end: Coord, heuristic: Heuristic) -> PathSearch<'g> {
        debug!(
            "Searching from {} to {} on a {}x{} grid",
            start,
            end,
            grid.size(),
            grid.size()
        );
        let h = heuristic.estimate(&start, &end);
        let mut nodes = FxIndexMap::default();
        nodes.insert(
            start,
            SearchNode {
                g: 0,
                h,
                parent: NO_PARENT,
                closed: false,
            },
        );
        let mut to_see = BinaryHeap::new();
        to_see.push(SmallestCostHolder {
            estimated_cost: h,
            index: 0,
        });
        PathSearch {
            grid,
            start,
            end,
            heuristic,
            nodes,
            to_see,
            pending: VecDeque::new(),
            nodes_explored: 0,
            outcome: None,
        }
    }

    pub fn nodes_explored(&self) -> usize {
        self.nodes_explored
    }

    /// The terminal outcome, once the search has finished.
    pub fn outcome(&self) -> Option<&SearchOutcome> {
        self.outcome.as_ref()
    }

    /// Runs the search to completion without reporting events.
    pub fn finish(mut self) -> SearchOutcome {
        loop {
            if let Some(outcome) = self.outcome.take() {
                return outcome;
            }
            self.expand_next();
        }
    }

    fn notify(&mut self, coord: Coord, kind: NodeKind) {
        if coord != self.start && coord != self.end {
            self.pending.push_back(SearchEvent::Node { coord, kind });
        }
    }

    fn reverse_path(&self, from: usize) -> Vec<Coord> {
        let mut cursor = from;
        let mut path: Vec<Coord> = std::iter::from_fn(|| {
            self.nodes.get_index(cursor).map(|(coord, node)| {
                cursor = node.parent;
                *coord
            })
        })
        .collect();
        path.reverse();
        path
    }

    /// Settles the best frontier node and expands it, queueing the resulting events. Sets the
    /// outcome when the end is settled or the frontier runs dry.
    fn expand_next(&mut self) {
        let (index, coord, g) = loop {
            let Some(SmallestCostHolder {
                estimated_cost,
                index,
            }) = self.to_see.pop()
            else {
                info!(
                    "{} is not reachable from {} ({} nodes explored)",
                    self.end, self.start, self.nodes_explored
                );
                self.outcome = Some(SearchOutcome::NoPath {
                    nodes_explored: self.nodes_explored,
                });
                return;
            };
            let Some((&coord, node)) = self.nodes.get_index_mut(index) else {
                continue;
            };
            // A node re-parented after being pushed leaves a stale, costlier entry behind.
            if node.closed || node.f() != estimated_cost {
                continue;
            }
            node.closed = true;
            break (index, coord, node.g);
        };
        self.nodes_explored += 1;
        self.notify(coord, NodeKind::Closed);

        if coord == self.end {
            let path = self.reverse_path(index);
            info!(
                "Found path of {} moves from {} to {} ({} nodes explored)",
                path.len() - 1,
                self.start,
                self.end,
                self.nodes_explored
            );
            self.pending.push_back(SearchEvent::PathFound(path.clone()));
            self.outcome = Some(SearchOutcome::Found(FoundPath {
                path,
                nodes_explored: self.nodes_explored,
            }));
            return;
        }

        let new_cost = g + 1;
        for successor in coord.neumann_neighborhood() {
            if !self.grid.is_passable(successor) {
                continue;
            }
            match self.nodes.entry(successor) {
                Vacant(e) => {
                    let h = self.heuristic.estimate(e.key(), &self.end);
                    let n = e.index();
                    e.insert(SearchNode {
                        g: new_cost,
                        h,
                        parent: index,
                        closed: false,
                    });
                    self.to_see.push(SmallestCostHolder {
                        estimated_cost: new_cost + h,
                        index: n,
                    });
                    self.notify(successor, NodeKind::Opened);
                }
                Occupied(mut e) => {
                    let n = e.index();
                    let node = e.get_mut();
                    if node.closed || node.g <= new_cost {
                        continue;
                    }
                    debug!("Re-parenting {} (g {} -> {})", successor, node.g, new_cost);
                    node.g = new_cost;
                    node.parent = index;
                    let estimated_cost = node.f();
                    self.to_see.push(SmallestCostHolder {
                        estimated_cost,
                        index: n,
                    });
                }
            }
        }
        self.pending.push_back(SearchEvent::StepComplete {
            nodes_explored: self.nodes_explored,
        });
    }
}

impl Iterator for PathSearch<'_> {
    type Item = SearchEvent;

    fn next(&mut self) -> Option<SearchEvent> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }
            if self.outcome.is_some() {
                return None;
            }
            self.expand_next();
        }
    }
}
