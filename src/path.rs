use std::collections::VecDeque;

use crate::grid::{Dir, Grid, Pos};

/// Minimum-hop path from `start` to `goal` over 4-connected open cells.
///
/// The result excludes `start`, so the first element is the next cell to
/// step onto and the last is `goal`. Empty when no path exists or when
/// `start == goal`. All edges cost one, so a breadth-first frontier
/// finalizes cells in distance order; the search stops as soon as the goal
/// is reached. Neighbors expand in the fixed `Dir::ALL` order, which keeps
/// tie-breaking among equal-length paths deterministic for a given grid.
pub fn shortest_path(grid: &Grid, start: Pos, goal: Pos) -> Vec<Pos> {
    if start == goal {
        return Vec::new();
    }

    let size = grid.size();
    let mut prev: Vec<Vec<Option<Pos>>> = vec![vec![None; size]; size];
    let mut seen = vec![vec![false; size]; size];
    let mut queue = VecDeque::new();
    seen[start.y][start.x] = true;
    queue.push_back(start);

    'search: while let Some(pos) = queue.pop_front() {
        for dir in Dir::ALL {
            let Some(next) = grid.step(pos, dir) else {
                continue;
            };
            if seen[next.y][next.x] || !grid.is_open(next) {
                continue;
            }
            seen[next.y][next.x] = true;
            prev[next.y][next.x] = Some(pos);
            if next == goal {
                break 'search;
            }
            queue.push_back(next);
        }
    }

    if prev[goal.y][goal.x].is_none() {
        return Vec::new();
    }

    let mut path = vec![goal];
    let mut cur = goal;
    while let Some(p) = prev[cur.y][cur.x] {
        if p == start {
            break;
        }
        path.push(p);
        cur = p;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    // Independent reference: plain BFS distance, no early exit.
    fn bfs_distance(grid: &Grid, start: Pos, goal: Pos) -> Option<usize> {
        let size = grid.size();
        let mut dist = vec![vec![None; size]; size];
        let mut queue = VecDeque::new();
        dist[start.y][start.x] = Some(0);
        queue.push_back(start);
        while let Some(pos) = queue.pop_front() {
            let base = dist[pos.y][pos.x].unwrap();
            for dir in Dir::ALL {
                if let Some(next) = grid.step(pos, dir) {
                    if grid.is_open(next) && dist[next.y][next.x].is_none() {
                        dist[next.y][next.x] = Some(base + 1);
                        queue.push_back(next);
                    }
                }
            }
        }
        dist[goal.y][goal.x]
    }

    fn assert_valid_path(grid: &Grid, start: Pos, path: &[Pos]) {
        let mut cur = start;
        for &pos in path {
            assert!(grid.is_open(pos));
            let dx = pos.x.abs_diff(cur.x);
            let dy = pos.y.abs_diff(cur.y);
            assert_eq!(dx + dy, 1, "non-adjacent step {cur:?} -> {pos:?}");
            cur = pos;
        }
    }

    #[test]
    fn open_grid_path_has_manhattan_length() {
        let grid = Grid::parse(&[".....", ".....", ".....", ".....", "....."]);
        let path = shortest_path(&grid, Pos { x: 4, y: 4 }, Pos { x: 0, y: 0 });
        assert_eq!(path.len(), 8);
        assert_eq!(path.last(), Some(&Pos { x: 0, y: 0 }));
        assert_valid_path(&grid, Pos { x: 4, y: 4 }, &path);
    }

    #[test]
    fn path_routes_around_obstacles() {
        let grid = Grid::parse(&[
            ".....", //
            ".###.", //
            ".#...", //
            ".#.#.", //
            "...#.",
        ]);
        let start = Pos { x: 2, y: 2 };
        let goal = Pos { x: 0, y: 0 };
        let path = shortest_path(&grid, start, goal);
        assert_eq!(path.len(), bfs_distance(&grid, start, goal).unwrap());
        assert_valid_path(&grid, start, &path);
        assert_eq!(path.last(), Some(&goal));
    }

    #[test]
    fn disconnected_cells_yield_an_empty_path() {
        let grid = Grid::parse(&[
            "..#..", //
            "..#..", //
            "..#..", //
            "..#..", //
            "..#..",
        ]);
        let path = shortest_path(&grid, Pos { x: 0, y: 2 }, Pos { x: 4, y: 2 });
        assert!(path.is_empty());
    }

    #[test]
    fn start_equals_goal_yields_an_empty_path() {
        let grid = Grid::parse(&["...", "...", "..."]);
        assert!(shortest_path(&grid, Pos { x: 1, y: 1 }, Pos { x: 1, y: 1 }).is_empty());
    }

    #[test]
    fn adjacent_goal_is_a_single_step() {
        let grid = Grid::parse(&["...", "...", "..."]);
        let path = shortest_path(&grid, Pos { x: 0, y: 0 }, Pos { x: 1, y: 0 });
        assert_eq!(path, vec![Pos { x: 1, y: 0 }]);
    }

    #[test]
    fn matches_reference_distance_on_random_grids() {
        let mut rng = StdRng::seed_from_u64(23);
        for _ in 0..5 {
            let grid = Grid::generate(&mut rng, 9, 0.3);
            let open = grid.open_cells();
            for &start in &open {
                for &goal in &open {
                    let path = shortest_path(&grid, start, goal);
                    match bfs_distance(&grid, start, goal) {
                        Some(0) => assert!(path.is_empty()),
                        Some(d) => {
                            assert_eq!(path.len(), d, "{start:?} -> {goal:?}");
                            assert_valid_path(&grid, start, &path);
                        }
                        None => assert!(path.is_empty()),
                    }
                }
            }
        }
    }
}
