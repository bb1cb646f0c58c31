use criterion::{criterion_group, criterion_main, Criterion};
use maze_pathfinding::{CellState, Coord, Grid, Heuristic, PathSearch};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::hint::black_box;

fn random_maze(n: usize, density: f64, rng: &mut StdRng) -> Grid {
    let mut grid = Grid::new(n);
    let coords: Vec<Coord> = grid.coords().collect();
    for coord in coords {
        if rng.gen_bool(density) {
            grid.set(coord, CellState::Wall);
        }
    }
    grid
}

fn maze_bench(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    for n in [50, 200] {
        let mut grid = random_maze(n, 0.3, &mut rng);
        let start = Coord::new(0, 0);
        let end = Coord::new(n as i32 - 1, n as i32 - 1);
        grid.set(start, CellState::Empty);
        grid.set(end, CellState::Empty);
        for (heuristic, name) in [(Heuristic::Manhattan, "astar"), (Heuristic::Zero, "dijkstra")] {
            c.bench_function(format!("{n}x{n} maze, {name}").as_str(), |b| {
                b.iter(|| black_box(PathSearch::new(&grid, start, end, heuristic).finish()))
            });
        }
    }
}

fn event_stream_bench(c: &mut Criterion) {
    let grid = Grid::new(100);
    let start = Coord::new(0, 0);
    let end = Coord::new(99, 99);
    c.bench_function("100x100 open grid, event stream", |b| {
        b.iter(|| black_box(PathSearch::new(&grid, start, end, Heuristic::Manhattan).count()))
    });
}

criterion_group!(benches, maze_bench, event_stream_bench);
criterion_main!(benches);
