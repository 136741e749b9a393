//! Maze generation

use anyhow::bail;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::{Cell, Grid};

/// Random maze generator
///
/// Carves a perfect maze (a single spanning tree, exactly one route
/// between any two open cells) with the recursive backtracker, on the
/// usual encoding where odd-indexed cells are junctions and even-indexed
/// cells are the walls between them.
pub struct MazeGenerator {
    random: StdRng,
}

impl MazeGenerator {
    const DIRECTIONS: [(i32, i32); 4] = [(0, 2), (2, 0), (0, -2), (-2, 0)];

    pub fn new(seed: Option<u64>) -> Self {
        Self {
            random: if let Some(state) = seed {
                StdRng::seed_from_u64(state)
            } else {
                StdRng::from_entropy()
            },
        }
    }

    /// Generate a maze board of `rows` × `cols` cells
    ///
    /// Dimensions must be odd and at least 5. The start cell (1,1) is
    /// always open and the goal sits at (cols-2, rows-2); because the
    /// carve spans every junction, the goal is always reachable from the
    /// start.
    pub fn generate(&mut self, rows: usize, cols: usize) -> anyhow::Result<Grid> {
        if rows < 5 || cols < 5 {
            bail!("Board dimensions must be at least 5x5, got {rows}x{cols}");
        }
        if rows % 2 == 0 || cols % 2 == 0 {
            bail!("Board dimensions must be odd, got {rows}x{cols}");
        }

        let mut cells = vec![vec![Cell::Wall; cols]; rows];
        let mut visited = vec![vec![false; cols]; rows];
        self.carve(&mut cells, &mut visited, 1, 1);

        // Start and goal are forced regardless of how the carve went
        cells[1][1] = Cell::Path;
        cells[rows - 2][cols - 2] = Cell::Goal;

        Grid::from_cells(cells)
    }

    /// Carve open cells recursively
    ///
    /// From the current junction, visit the four two-step neighbors in
    /// random order; for each unvisited one inside the border, open the
    /// wall between and recurse. Recursion depth is bounded by the
    /// junction count, roughly rows*cols/4.
    fn carve(&mut self, cells: &mut [Vec<Cell>], visited: &mut [Vec<bool>], x: usize, y: usize) {
        let rows = cells.len();
        let cols = cells[0].len();

        visited[y][x] = true;
        cells[y][x] = Cell::Path;

        let mut directions = Self::DIRECTIONS.to_vec();
        directions.shuffle(&mut self.random);

        for (dx, dy) in directions {
            let nx = x as i32 + dx;
            let ny = y as i32 + dy;

            if nx <= 0 || ny <= 0 || nx >= cols as i32 - 1 || ny >= rows as i32 - 1 {
                continue;
            }
            let (nx, ny) = (nx as usize, ny as usize);
            if visited[ny][nx] {
                continue;
            }

            // Open the wall between the current junction and the neighbor
            cells[(y as i32 + dy / 2) as usize][(x as i32 + dx / 2) as usize] = Cell::Path;
            self.carve(cells, visited, nx, ny);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Point;

    #[test]
    fn generated_board_has_start_and_goal() {
        let grid = MazeGenerator::new(Some(0)).generate(7, 7).unwrap();

        assert_eq!(grid.start(), Point { y: 1, x: 1 });
        assert_eq!(grid.goal(), Point { y: 5, x: 5 });
        assert_eq!(grid.cell(grid.start()), Cell::Path);
        assert_eq!(grid.cell(grid.goal()), Cell::Goal);
    }

    #[test]
    fn generated_board_is_walled_in() {
        let grid = MazeGenerator::new(Some(1)).generate(9, 11).unwrap();

        for x in 0..grid.cols() {
            assert_eq!(grid.cell(Point { y: 0, x }), Cell::Wall);
            assert_eq!(grid.cell(Point { y: grid.rows() - 1, x }), Cell::Wall);
        }
        for y in 0..grid.rows() {
            assert_eq!(grid.cell(Point { y, x: 0 }), Cell::Wall);
            assert_eq!(grid.cell(Point { y, x: grid.cols() - 1 }), Cell::Wall);
        }
    }

    #[test]
    fn start_connects_to_goal() {
        for (rows, cols) in [(5, 5), (5, 9), (7, 7), (9, 5), (11, 13)] {
            for seed in 0..3 {
                let grid = MazeGenerator::new(Some(seed)).generate(rows, cols).unwrap();
                assert!(
                    grid.shortest_path_len(grid.start(), grid.goal()).is_some(),
                    "no path in {rows}x{cols} board with seed {seed}"
                );
            }
        }
    }

    #[test]
    fn every_junction_is_carved() {
        // Perfect-maze property: the carve reaches all odd-indexed cells
        let grid = MazeGenerator::new(Some(7)).generate(9, 9).unwrap();

        for y in (1..grid.rows()).step_by(2) {
            for x in (1..grid.cols()).step_by(2) {
                assert_ne!(grid.cell(Point { y, x }), Cell::Wall, "wall at y={y}, x={x}");
            }
        }
    }

    #[test]
    fn same_seed_same_board() {
        let first = MazeGenerator::new(Some(99)).generate(7, 7).unwrap();
        let second = MazeGenerator::new(Some(99)).generate(7, 7).unwrap();

        assert_eq!(first.to_string(), second.to_string());
    }

    #[test]
    fn rejects_even_dimensions() {
        assert!(MazeGenerator::new(Some(0)).generate(6, 7).is_err());
        assert!(MazeGenerator::new(Some(0)).generate(7, 8).is_err());
    }

    #[test]
    fn rejects_undersized_dimensions() {
        assert!(MazeGenerator::new(Some(0)).generate(3, 7).is_err());
        assert!(MazeGenerator::new(Some(0)).generate(7, 3).is_err());
    }
}
