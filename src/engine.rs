use log::{info, warn};
use std::ops::ControlFlow;
use std::time::Duration;

use crate::astar::{Heuristic, PathSearch, SearchEvent, SearchOutcome};
use crate::coord::Coord;
use crate::error::{SearchError, SearchResult};
use crate::grid::{CellState, Components, Grid};
use crate::observer::SearchObserver;

/// Maps a caller-facing animation speed in percent to the pause taken at each step:
/// `max(1, 101 - speed)` milliseconds, with the speed clamped to `1..=100`.
pub fn step_delay_for_speed(speed_percent: u8) -> Duration {
    let speed = u64::from(speed_percent.clamp(1, 100));
    Duration::from_millis((101 - speed).max(1))
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Pause after each expanded node. Zero runs the search straight through.
    pub step_delay: Duration,
    pub heuristic: Heuristic,
    /// Check connected components first and skip the search when the end cannot be reached.
    /// Off by default so that unreachable searches still report their exploration.
    pub check_reachability: bool,
}

impl SearchOptions {
    pub fn from_animation_speed(speed_percent: u8) -> SearchOptions {
        SearchOptions {
            step_delay: step_delay_for_speed(speed_percent),
            ..SearchOptions::default()
        }
    }

    pub fn with_step_delay(mut self, step_delay: Duration) -> SearchOptions {
        self.step_delay = step_delay;
        self
    }

    pub fn with_heuristic(mut self, heuristic: Heuristic) -> SearchOptions {
        self.heuristic = heuristic;
        self
    }

    pub fn with_reachability_check(mut self, check_reachability: bool) -> SearchOptions {
        self.check_reachability = check_reachability;
        self
    }
}

enum Dispatch {
    Continue,
    Yield,
    Stop,
}

fn dispatch<O: SearchObserver>(observer: &mut O, event: SearchEvent) -> Dispatch {
    match event {
        SearchEvent::Node { coord, kind } => {
            observer.on_node_settled(coord, kind);
            Dispatch::Continue
        }
        SearchEvent::PathFound(path) => {
            observer.on_path_found(&path);
            Dispatch::Continue
        }
        SearchEvent::StepComplete { nodes_explored } => match observer.on_step(nodes_explored) {
            ControlFlow::Continue(()) => Dispatch::Yield,
            ControlFlow::Break(()) => Dispatch::Stop,
        },
    }
}

/// Runs shortest-path searches on maze grids and reports progress to a [SearchObserver].
///
/// The engine only holds immutable options. Each call builds its own [PathSearch], so any
/// number of calls may run at once, on the same grid or on different ones.
#[derive(Clone, Debug, Default)]
pub struct PathSearchEngine {
    options: SearchOptions,
}

impl PathSearchEngine {
    pub fn new(options: SearchOptions) -> PathSearchEngine {
        PathSearchEngine { options }
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Checks that both endpoints are in bounds and not walls.
    pub fn validate(grid: &Grid, start: Coord, end: Coord) -> SearchResult<()> {
        for coord in [start, end] {
            match grid.get(coord) {
                None => {
                    warn!("Rejecting search: {} is out of bounds", coord);
                    return Err(SearchError::OutOfBounds {
                        coord,
                        size: grid.size(),
                    });
                }
                Some(CellState::Wall) => {
                    warn!("Rejecting search: {} is a wall", coord);
                    return Err(SearchError::Blocked { coord });
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Validates the input and returns the raw search, for callers that want to consume the
    /// [SearchEvent] stream themselves. Pacing and the reachability check do not apply.
    pub fn search<'g>(
        &self,
        grid: &'g Grid,
        start: Coord,
        end: Coord,
    ) -> SearchResult<PathSearch<'g>> {
        Self::validate(grid, start, end)?;
        Ok(PathSearch::new(grid, start, end, self.options.heuristic))
    }

    /// Validates the input, then either builds the search or short-circuits with the no-path
    /// outcome when components show the end is unreachable.
    fn prepare<'g>(
        &self,
        grid: &'g Grid,
        start: Coord,
        end: Coord,
    ) -> SearchResult<Result<PathSearch<'g>, SearchOutcome>> {
        Self::validate(grid, start, end)?;
        let unreachable = self.options.check_reachability
            && Components::generate(grid).unreachable(start, end);
        if unreachable {
            info!("{} is not reachable from {}, skipping search", end, start);
            return Ok(Err(SearchOutcome::NoPath { nodes_explored: 0 }));
        }
        Ok(Ok(PathSearch::new(grid, start, end, self.options.heuristic)))
    }

    /// Finds a shortest path from `start` to `end`, blocking the thread for
    /// [step_delay](SearchOptions::step_delay) after each expanded node.
    ///
    /// Errors are only returned for invalid input, before the observer hears anything.
    pub fn find_path<O: SearchObserver>(
        &self,
        grid: &Grid,
        start: Coord,
        end: Coord,
        mut observer: O,
    ) -> SearchResult<SearchOutcome> {
        let mut search = match self.prepare(grid, start, end)? {
            Ok(search) => search,
            Err(outcome) => return Ok(outcome),
        };
        while let Some(event) = search.next() {
            match dispatch(&mut observer, event) {
                Dispatch::Continue => {}
                Dispatch::Yield => {
                    if !self.options.step_delay.is_zero() {
                        std::thread::sleep(self.options.step_delay);
                    }
                }
                Dispatch::Stop => return Ok(Self::cancelled(&search)),
            }
        }
        Ok(search.finish())
    }

    /// Async counterpart of [find_path](Self::find_path): suspends on the tokio timer after
    /// each expanded node instead of blocking. With a zero delay it never suspends. Dropping
    /// the future cancels the search.
    #[cfg(feature = "tokio")]
    pub async fn find_path_async<O: SearchObserver>(
        &self,
        grid: &Grid,
        start: Coord,
        end: Coord,
        mut observer: O,
    ) -> SearchResult<SearchOutcome> {
        let mut search = match self.prepare(grid, start, end)? {
            Ok(search) => search,
            Err(outcome) => return Ok(outcome),
        };
        while let Some(event) = search.next() {
            match dispatch(&mut observer, event) {
                Dispatch::Continue => {}
                Dispatch::Yield => {
                    if !self.options.step_delay.is_zero() {
                        tokio::time::sleep(self.options.step_delay).await;
                    }
                }
                Dispatch::Stop => return Ok(Self::cancelled(&search)),
            }
        }
        Ok(search.finish())
    }

    fn cancelled(search: &PathSearch<'_>) -> SearchOutcome {
        info!(
            "Search cancelled after {} nodes explored",
            search.nodes_explored()
        );
        SearchOutcome::Cancelled {
            nodes_explored: search.nodes_explored(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::{NoOpObserver, NodeKind};
    use crate::FoundPath;

    #[derive(Default)]
    struct Recorder {
        settled: Vec<(Coord, NodeKind)>,
        paths: Vec<Vec<Coord>>,
        steps: usize,
        stop_after: Option<usize>,
    }

    impl SearchObserver for Recorder {
        fn on_node_settled(&mut self, coord: Coord, kind: NodeKind) {
            self.settled.push((coord, kind));
        }
        fn on_path_found(&mut self, path: &[Coord]) {
            self.paths.push(path.to_vec());
        }
        fn on_step(&mut self, nodes_explored: usize) -> ControlFlow<()> {
            self.steps += 1;
            match self.stop_after {
                Some(limit) if nodes_explored >= limit => ControlFlow::Break(()),
                _ => ControlFlow::Continue(()),
            }
        }
    }

    #[test]
    fn speed_mapping() {
        assert_eq!(step_delay_for_speed(50), Duration::from_millis(51));
        assert_eq!(step_delay_for_speed(100), Duration::from_millis(1));
        assert_eq!(step_delay_for_speed(1), Duration::from_millis(100));
        assert_eq!(step_delay_for_speed(0), Duration::from_millis(100));
        assert_eq!(step_delay_for_speed(255), Duration::from_millis(1));
        assert_eq!(
            SearchOptions::from_animation_speed(100).step_delay,
            Duration::from_millis(1)
        );
    }

    #[test]
    fn invalid_input_fails_before_callbacks() {
        let grid: Grid = "..#\n...\n...".parse().unwrap();
        let engine = PathSearchEngine::default();
        let mut recorder = Recorder::default();
        let out_of_bounds =
            engine.find_path(&grid, Coord::new(0, 0), Coord::new(3, 0), &mut recorder);
        assert_eq!(
            out_of_bounds,
            Err(SearchError::OutOfBounds {
                coord: Coord::new(3, 0),
                size: 3
            })
        );
        let blocked = engine.find_path(&grid, Coord::new(0, 2), Coord::new(2, 2), &mut recorder);
        assert_eq!(
            blocked,
            Err(SearchError::Blocked {
                coord: Coord::new(0, 2)
            })
        );
        let negative =
            engine.find_path(&grid, Coord::new(-1, 0), Coord::new(2, 2), &mut recorder);
        assert!(matches!(negative, Err(SearchError::OutOfBounds { .. })));
        assert!(recorder.settled.is_empty());
        assert!(recorder.paths.is_empty());
        assert_eq!(recorder.steps, 0);
    }

    #[test]
    fn observer_sees_every_transition() {
        let grid = Grid::new(5);
        let engine = PathSearchEngine::default();
        let mut recorder = Recorder::default();
        let start = Coord::new(0, 0);
        let end = Coord::new(4, 4);
        let outcome = engine.find_path(&grid, start, end, &mut recorder).unwrap();
        let SearchOutcome::Found(FoundPath {
            path,
            nodes_explored,
        }) = outcome
        else {
            panic!("expected a path");
        };
        assert_eq!(path.len(), 9);
        assert_eq!(recorder.paths, vec![path]);
        // Every settlement except start and end is reported as closed.
        let closed = recorder
            .settled
            .iter()
            .filter(|(_, kind)| *kind == NodeKind::Closed)
            .count();
        assert_eq!(closed, nodes_explored - 2);
        // One pacing boundary per non-goal settlement.
        assert_eq!(recorder.steps, nodes_explored - 1);
        assert!(recorder
            .settled
            .iter()
            .all(|(coord, _)| *coord != start && *coord != end));
    }

    #[test]
    fn no_path_is_not_an_error() {
        let grid: Grid = ".#.\n.#.\n.#.".parse().unwrap();
        let engine = PathSearchEngine::default();
        let mut recorder = Recorder::default();
        let outcome = engine
            .find_path(&grid, Coord::new(0, 0), Coord::new(0, 2), &mut recorder)
            .unwrap();
        assert_eq!(outcome, SearchOutcome::NoPath { nodes_explored: 3 });
        assert!(recorder.paths.is_empty());
    }

    #[test]
    fn reachability_check_skips_search() {
        let grid: Grid = ".#.\n.#.\n.#.".parse().unwrap();
        let engine = PathSearchEngine::new(SearchOptions::default().with_reachability_check(true));
        let mut recorder = Recorder::default();
        let outcome = engine
            .find_path(&grid, Coord::new(0, 0), Coord::new(0, 2), &mut recorder)
            .unwrap();
        assert_eq!(outcome, SearchOutcome::NoPath { nodes_explored: 0 });
        assert!(recorder.settled.is_empty());

        let reachable = engine
            .find_path(&grid, Coord::new(0, 0), Coord::new(2, 0), NoOpObserver)
            .unwrap();
        assert_eq!(reachable.path().map(|p| p.len()), Some(3));
    }

    #[test]
    fn cancel_at_step_boundary() {
        let grid = Grid::new(10);
        let engine = PathSearchEngine::default();
        let mut recorder = Recorder {
            stop_after: Some(3),
            ..Recorder::default()
        };
        let outcome = engine
            .find_path(&grid, Coord::new(0, 0), Coord::new(9, 9), &mut recorder)
            .unwrap();
        assert_eq!(outcome, SearchOutcome::Cancelled { nodes_explored: 3 });
        assert_eq!(recorder.steps, 3);
        assert!(recorder.paths.is_empty());
    }

    #[test]
    fn raw_search_is_validated() {
        let grid = Grid::new(2);
        let engine = PathSearchEngine::default();
        assert!(engine.search(&grid, Coord::new(0, 0), Coord::new(0, 2)).is_err());
        let events: Vec<_> = engine
            .search(&grid, Coord::new(0, 0), Coord::new(1, 1))
            .unwrap()
            .collect();
        assert!(matches!(events.last(), Some(SearchEvent::PathFound(p)) if p.len() == 3));
    }

    #[test]
    fn paced_search_matches_unpaced() {
        let grid: Grid = "....\n.##.\n....\n....".parse().unwrap();
        let start = Coord::new(0, 0);
        let end = Coord::new(3, 3);
        let paced = PathSearchEngine::new(
            SearchOptions::default().with_step_delay(Duration::from_millis(1)),
        )
        .find_path(&grid, start, end, NoOpObserver)
        .unwrap();
        let unpaced = PathSearchEngine::default()
            .find_path(&grid, start, end, NoOpObserver)
            .unwrap();
        assert_eq!(paced, unpaced);
    }
}
