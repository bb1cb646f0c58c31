use maze_pathfinding::{Coord, Maze, PathSearchEngine, SearchOptions, Tool, DEFAULT_ANIMATION_SPEED};

// Draws a small maze with the editing tools and solves it with pacing, the way the editor
// would animate a search. Prints the painted maze and the recorded stats.
fn main() {
    let mut maze = Maze::new(12);
    maze.apply_tool(Coord::new(1, 1), Tool::Start);
    maze.apply_tool(Coord::new(10, 10), Tool::End);
    for i in 0..9 {
        maze.apply_tool(Coord::new(4, i), Tool::Wall);
        maze.apply_tool(Coord::new(8, 11 - i), Tool::Wall);
    }
    println!("{}", maze);

    let engine = PathSearchEngine::new(SearchOptions::from_animation_speed(
        DEFAULT_ANIMATION_SPEED,
    ));
    match maze.solve(&engine) {
        Ok(outcome) if outcome.is_found() => println!("Path found:\n{}", maze),
        Ok(_) => println!("No path between start and end:\n{}", maze),
        Err(e) => println!("Search failed: {}", e),
    }
    println!("{:?}", maze.stats());
}
