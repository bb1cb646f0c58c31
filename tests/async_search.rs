#![cfg(feature = "tokio")]
use maze_pathfinding::{
    Coord, Grid, NoOpObserver, NodeKind, PathSearchEngine, SearchObserver, SearchOptions,
    SearchOutcome,
};
use std::time::Duration;

#[derive(Default)]
struct Counter {
    opened: usize,
    closed: usize,
    paths: usize,
}

impl SearchObserver for Counter {
    fn on_node_settled(&mut self, _coord: Coord, kind: NodeKind) {
        match kind {
            NodeKind::Opened => self.opened += 1,
            NodeKind::Closed => self.closed += 1,
        }
    }
    fn on_path_found(&mut self, _path: &[Coord]) {
        self.paths += 1;
    }
}

#[tokio::test]
async fn async_matches_sync() {
    let grid: Grid = "
        .....
        .###.
        ...#.
        ##.#.
        .....
    "
    .parse()
    .unwrap();
    let start = Coord::new(0, 0);
    let end = Coord::new(4, 0);
    let engine =
        PathSearchEngine::new(SearchOptions::default().with_step_delay(Duration::from_millis(1)));
    let mut counter = Counter::default();
    let paced = engine
        .find_path_async(&grid, start, end, &mut counter)
        .await
        .unwrap();
    let sync = PathSearchEngine::default()
        .find_path(&grid, start, end, NoOpObserver)
        .unwrap();
    assert_eq!(paced, sync);
    assert_eq!(counter.paths, 1);
    assert_eq!(counter.closed, paced.nodes_explored() - 2);
    assert_eq!(paced.path().map(|p| p.len()), Some(9));
}

#[tokio::test]
async fn zero_delay_runs_through() {
    let grid = Grid::new(20);
    let outcome = PathSearchEngine::default()
        .find_path_async(&grid, Coord::new(0, 0), Coord::new(19, 19), NoOpObserver)
        .await
        .unwrap();
    assert_eq!(outcome.path().map(|p| p.len()), Some(39));
}

#[tokio::test]
async fn dropped_future_is_cancelled() {
    let grid = Grid::new(30);
    let engine =
        PathSearchEngine::new(SearchOptions::default().with_step_delay(Duration::from_secs(1)));
    let search = engine.find_path_async(&grid, Coord::new(0, 0), Coord::new(29, 29), NoOpObserver);
    let result = tokio::time::timeout(Duration::from_millis(20), search).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn unreachable_is_reported() {
    let grid: Grid = ".#.\n.#.\n.#.".parse().unwrap();
    let outcome = PathSearchEngine::default()
        .find_path_async(&grid, Coord::new(0, 0), Coord::new(0, 2), NoOpObserver)
        .await
        .unwrap();
    assert_eq!(outcome, SearchOutcome::NoPath { nodes_explored: 3 });
}
