use maze_pathfinding::{Coord, Grid, NoOpObserver, PathSearchEngine};

// In this example a path is found on a 3x3 grid with shape
//  ___
// |S  |
// | # |
// |  E|
//  ___
// where
// - # marks an obstacle
// - S marks the start
// - E marks the end
//
// Nodes have a 4-neighborhood

fn main() {
    let grid: Grid = "S..\n.#.\n..E".parse().unwrap();
    println!("{}", grid);
    let start = Coord::new(0, 0);
    let end = Coord::new(2, 2);
    let outcome = PathSearchEngine::default()
        .find_path(&grid, start, end, NoOpObserver)
        .unwrap();
    println!("Nodes explored: {}", outcome.nodes_explored());
    println!("Path:");
    for p in outcome.into_path().unwrap() {
        println!("{}", p);
    }
}
