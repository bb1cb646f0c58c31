use std::ops::ControlFlow;

use crate::coord::Coord;

/// Frontier transition reported for a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Discovered and added to the open set.
    Opened,
    /// Selected from the open set and settled.
    Closed,
}

/// Receives progress notifications from [PathSearchEngine](crate::PathSearchEngine). Every
/// method has an empty default so observers only implement what they draw.
///
/// The start and end cells are never reported through [on_node_settled](Self::on_node_settled).
pub trait SearchObserver {
    fn on_node_settled(&mut self, _coord: Coord, _kind: NodeKind) {}

    /// Called once, on success only, with the full start-to-end path.
    fn on_path_found(&mut self, _path: &[Coord]) {}

    /// Called at every pacing boundary, after a frontier node has been fully expanded.
    /// Returning [ControlFlow::Break] abandons the search.
    fn on_step(&mut self, _nodes_explored: usize) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

pub struct NoOpObserver;
impl SearchObserver for NoOpObserver {}

impl<T: SearchObserver + ?Sized> SearchObserver for &mut T {
    fn on_node_settled(&mut self, coord: Coord, kind: NodeKind) {
        (**self).on_node_settled(coord, kind)
    }
    fn on_path_found(&mut self, path: &[Coord]) {
        (**self).on_path_found(path)
    }
    fn on_step(&mut self, nodes_explored: usize) -> ControlFlow<()> {
        (**self).on_step(nodes_explored)
    }
}
