//! Prove you are human by walking a maze
//!
//! The challenge presents a small randomly generated maze. The visitor
//! must steer the marker from the start cell to the goal cell before the
//! countdown runs out. Visitors who would rather not play can instead
//! type the magic word in the fallback text challenge.
//!
//! # Examples
//! ```
//! use maze_captcha::maze_generator::MazeGenerator;
//! use maze_captcha::{ChallengeState, MazeChallenge};
//!
//! let mut generator = MazeGenerator::new(Some(42));
//! let grid = generator.generate(7, 7).unwrap();
//!
//! let mut challenge = MazeChallenge::new(grid, 30);
//! assert_eq!(challenge.state(), ChallengeState::Playing);
//!
//! challenge.tick();
//! assert_eq!(challenge.remaining_seconds(), 29);
//! ```

use std::collections::VecDeque;
use std::fmt;

use anyhow::{anyhow, bail};
use itertools::Itertools;

#[cfg(feature = "tui")]
pub mod app;
pub mod maze_generator;
#[cfg(feature = "tui")]
pub mod render;
pub mod text_challenge;

/// Location on the board
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct Point {
    pub y: usize,
    pub x: usize,
}

/// Contents of a single board cell
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Cell {
    Wall,
    Path,
    Goal,
}

impl Cell {
    fn to_emoji(self) -> char {
        match self {
            Cell::Wall => Grid::S_WALL,
            Cell::Path => Grid::S_PATH,
            Cell::Goal => Grid::S_GOAL,
        }
    }
}

/// Direction of a single player step
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit (dx, dy) offset of one step in this direction
    fn offset(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// The maze board: a rectangular matrix of cells, immutable after
/// generation
///
/// The player starts at (1,1); the goal is the single [`Cell::Goal`]
/// cell. Both are located during construction, so every `Grid` in
/// circulation has a valid start and goal.
pub struct Grid {
    squares: Vec<Vec<Cell>>,
    start: Point,
    goal: Point,
}

impl Grid {
    const S_WALL: char = '🟫';
    const S_PATH: char = '🟩';
    const S_GOAL: char = '❎';

    /// Build a board from raw cells
    ///
    /// Returns an error when the matrix is ragged, the start cell (1,1)
    /// is not open, or there is not exactly one goal cell.
    pub fn from_cells(squares: Vec<Vec<Cell>>) -> anyhow::Result<Self> {
        if squares.is_empty() || squares[0].is_empty() {
            bail!("Board is empty");
        }
        let cols = squares[0].len();
        if squares.iter().any(|row| row.len() != cols) {
            bail!("Board rows have unequal lengths");
        }

        let mut goal = None;
        for (y, row) in squares.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                if *cell == Cell::Goal {
                    if goal.is_some() {
                        bail!("More than one goal in board");
                    }
                    goal = Some(Point { y, x });
                }
            }
        }
        let goal = goal.ok_or_else(|| anyhow!("Goal not found in board"))?;

        if squares.len() < 3 || cols < 3 || squares[1][1] != Cell::Path {
            bail!("Start cell (1,1) is not open");
        }

        Ok(Grid {
            squares,
            start: Point { y: 1, x: 1 },
            goal,
        })
    }

    /// Parse a board from its emoji representation
    ///
    /// # Examples
    /// ```
    /// use maze_captcha::Grid;
    ///
    /// let board = "
    /// 🟫🟫🟫🟫🟫
    /// 🟫🟩🟩🟩🟫
    /// 🟫🟩🟫🟩🟫
    /// 🟫🟩🟫❎🟫
    /// 🟫🟫🟫🟫🟫";
    /// let grid = Grid::parse_emojis(board.trim()).unwrap();
    /// assert_eq!(grid.shortest_path_len(grid.start(), grid.goal()), Some(4));
    /// ```
    pub fn parse_emojis(emojis: &str) -> anyhow::Result<Self> {
        let squares = emojis
            .split('\n')
            .enumerate()
            .map(|(y, row)| {
                row.chars()
                    .enumerate()
                    .map(|(x, c)| match c {
                        Self::S_WALL => Ok(Cell::Wall),
                        Self::S_PATH => Ok(Cell::Path),
                        Self::S_GOAL => Ok(Cell::Goal),
                        val => Err(anyhow!("Unexpected character `{val}` at y={y}, x={x}")),
                    })
                    .collect::<anyhow::Result<Vec<_>>>()
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        Self::from_cells(squares)
    }

    pub fn rows(&self) -> usize {
        self.squares.len()
    }

    pub fn cols(&self) -> usize {
        self.squares[0].len()
    }

    /// Cell where the player begins, always (1,1)
    pub fn start(&self) -> Point {
        self.start
    }

    /// Cell that ends the challenge when reached
    pub fn goal(&self) -> Point {
        self.goal
    }

    pub fn cell(&self, point: Point) -> Cell {
        self.squares[point.y][point.x]
    }

    /// Length of the shortest walk between two open cells, in steps
    ///
    /// Breadth-first search over Path/Goal cells. Returns `None` when the
    /// cells are not connected, or when either endpoint is a wall.
    pub fn shortest_path_len(&self, from: Point, to: Point) -> Option<usize> {
        if self.cell(from) == Cell::Wall || self.cell(to) == Cell::Wall {
            return None;
        }
        let mut seen = vec![vec![false; self.cols()]; self.rows()];
        seen[from.y][from.x] = true;
        let mut queue = VecDeque::from([(from, 0)]);

        while let Some((point, steps)) = queue.pop_front() {
            if point == to {
                return Some(steps);
            }
            for (dx, dy) in [(0, -1), (0, 1), (-1, 0), (1, 0)] {
                let nx = point.x as isize + dx;
                let ny = point.y as isize + dy;
                if nx < 0 || ny < 0 || nx as usize >= self.cols() || ny as usize >= self.rows() {
                    continue;
                }
                let next = Point {
                    y: ny as usize,
                    x: nx as usize,
                };
                if seen[next.y][next.x] || self.cell(next) == Cell::Wall {
                    continue;
                }
                seen[next.y][next.x] = true;
                queue.push_back((next, steps + 1));
            }
        }
        None
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self
            .squares
            .iter()
            .map(|row| row.iter().map(|cell| cell.to_emoji()).join(""))
            .join("\n");
        write!(f, "{rows}")
    }
}

/// Progress of one challenge session
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum ChallengeState {
    /// Accepting moves and counting down
    Playing,
    /// The goal was reached in time
    Won,
    /// The countdown expired
    Lost,
}

/// What happened to an attempted step
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum MoveOutcome {
    /// The player advanced to an open cell
    Moved,
    /// The target cell is a wall or outside the board; position unchanged
    Blocked,
    /// The player stepped onto the goal; the session is won
    Won,
    /// The session is already over; input discarded
    Ignored,
}

/// One maze CAPTCHA session: board, player position and countdown
///
/// The session owns all game state. It changes only through
/// [`Self::try_move`] and [`Self::tick`]; [`ChallengeState::Won`] and
/// [`ChallengeState::Lost`] are terminal, so further moves and ticks are
/// ignored.
pub struct MazeChallenge {
    grid: Grid,
    position: Point,
    remaining_seconds: u32,
    state: ChallengeState,
}

impl MazeChallenge {
    /// Start a session on `grid` with `time_limit` seconds on the clock
    pub fn new(grid: Grid, time_limit: u32) -> Self {
        let position = grid.start();
        MazeChallenge {
            grid,
            position,
            remaining_seconds: time_limit,
            state: ChallengeState::Playing,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Current player position; always an open cell
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn state(&self) -> ChallengeState {
        self.state
    }

    /// Attempt one step
    ///
    /// Steps into walls or off the board are rejected silently and leave
    /// the position unchanged. Stepping onto the goal wins the session
    /// and stops the countdown.
    pub fn try_move(&mut self, direction: Direction) -> MoveOutcome {
        if self.state != ChallengeState::Playing {
            return MoveOutcome::Ignored;
        }
        let (dx, dy) = direction.offset();
        let nx = self.position.x as isize + dx;
        let ny = self.position.y as isize + dy;
        if nx < 0 || ny < 0 || nx as usize >= self.grid.cols() || ny as usize >= self.grid.rows() {
            return MoveOutcome::Blocked;
        }
        let candidate = Point {
            y: ny as usize,
            x: nx as usize,
        };
        match self.grid.cell(candidate) {
            Cell::Wall => MoveOutcome::Blocked,
            Cell::Path => {
                self.position = candidate;
                MoveOutcome::Moved
            }
            Cell::Goal => {
                self.position = candidate;
                self.state = ChallengeState::Won;
                MoveOutcome::Won
            }
        }
    }

    /// Advance the countdown by one second
    ///
    /// At zero the session is lost. Ticks in a terminal state do
    /// nothing, so the remaining time never drops below zero.
    pub fn tick(&mut self) {
        if self.state != ChallengeState::Playing {
            return;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.state = ChallengeState::Lost;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOARD: &str = "
🟫🟫🟫🟫🟫🟫🟫
🟫🟩🟩🟩🟩🟩🟫
🟫🟩🟫🟫🟫🟩🟫
🟫🟩🟫🟩🟫🟩🟫
🟫🟩🟫🟩🟫🟩🟫
🟫🟩🟩🟩🟫❎🟫
🟫🟫🟫🟫🟫🟫🟫";

    fn board() -> Grid {
        Grid::parse_emojis(BOARD.trim()).unwrap()
    }

    #[test]
    fn parse_board_layout() {
        let grid = board();
        assert_eq!(grid.rows(), 7);
        assert_eq!(grid.cols(), 7);
        assert_eq!(grid.start(), Point { y: 1, x: 1 });
        assert_eq!(grid.goal(), Point { y: 5, x: 5 });
        assert_eq!(grid.cell(Point { y: 0, x: 0 }), Cell::Wall);
        assert_eq!(grid.cell(Point { y: 1, x: 1 }), Cell::Path);
        assert_eq!(grid.cell(Point { y: 5, x: 5 }), Cell::Goal);
    }

    #[test]
    fn display_round_trips() {
        assert_eq!(board().to_string(), BOARD.trim());
    }

    #[test]
    fn parse_rejects_unknown_characters() {
        let result = Grid::parse_emojis("🟫🟩🐉\n🟫🟩🟫");
        assert!(result.is_err());
    }

    #[test]
    fn parse_rejects_board_without_goal() {
        let board = "
🟫🟫🟫🟫🟫
🟫🟩🟩🟩🟫
🟫🟫🟫🟫🟫";
        assert!(Grid::parse_emojis(board.trim()).is_err());
    }

    #[test]
    fn shortest_path_from_start_to_goal() {
        let grid = board();
        assert_eq!(grid.shortest_path_len(grid.start(), grid.goal()), Some(8));
    }

    #[test]
    fn shortest_path_to_wall_is_none() {
        let grid = board();
        assert_eq!(
            grid.shortest_path_len(grid.start(), Point { y: 0, x: 0 }),
            None
        );
    }

    #[test]
    fn blocked_moves_leave_position_unchanged() {
        let mut challenge = MazeChallenge::new(board(), 30);

        assert_eq!(challenge.try_move(Direction::Up), MoveOutcome::Blocked);
        assert_eq!(challenge.try_move(Direction::Left), MoveOutcome::Blocked);
        assert_eq!(challenge.position(), Point { y: 1, x: 1 });
        assert_eq!(challenge.state(), ChallengeState::Playing);
    }

    #[test]
    fn moves_off_the_board_are_blocked() {
        // Start cell has an opening to the board edge at (1,0).
        let board = "
🟫🟩🟫🟫🟫
🟫🟩🟩🟩🟫
🟫🟫🟫🟩🟫
🟫❎🟩🟩🟫
🟫🟫🟫🟫🟫";
        let mut challenge = MazeChallenge::new(Grid::parse_emojis(board.trim()).unwrap(), 30);

        assert_eq!(challenge.try_move(Direction::Up), MoveOutcome::Moved);
        assert_eq!(challenge.position(), Point { y: 0, x: 1 });
        assert_eq!(challenge.try_move(Direction::Up), MoveOutcome::Blocked);
        assert_eq!(challenge.position(), Point { y: 0, x: 1 });
    }

    #[test]
    fn reaching_goal_wins_exactly_once() {
        let mut challenge = MazeChallenge::new(board(), 30);

        for _ in 0..4 {
            assert_eq!(challenge.try_move(Direction::Right), MoveOutcome::Moved);
        }
        for _ in 0..3 {
            assert_eq!(challenge.try_move(Direction::Down), MoveOutcome::Moved);
        }
        assert_eq!(challenge.try_move(Direction::Down), MoveOutcome::Won);
        assert_eq!(challenge.state(), ChallengeState::Won);
        assert_eq!(challenge.position(), Point { y: 5, x: 5 });

        // Terminal state: input and ticks are ignored
        assert_eq!(challenge.try_move(Direction::Up), MoveOutcome::Ignored);
        assert_eq!(challenge.position(), Point { y: 5, x: 5 });
        let remaining = challenge.remaining_seconds();
        challenge.tick();
        assert_eq!(challenge.remaining_seconds(), remaining);
        assert_eq!(challenge.state(), ChallengeState::Won);
    }

    #[test]
    fn countdown_expires_into_lost() {
        let mut challenge = MazeChallenge::new(board(), 30);

        for _ in 0..29 {
            challenge.tick();
        }
        assert_eq!(challenge.state(), ChallengeState::Playing);
        assert_eq!(challenge.remaining_seconds(), 1);

        challenge.tick();
        assert_eq!(challenge.state(), ChallengeState::Lost);
        assert_eq!(challenge.remaining_seconds(), 0);

        // No decrements below zero, no way out of Lost
        challenge.tick();
        challenge.tick();
        assert_eq!(challenge.remaining_seconds(), 0);
        assert_eq!(challenge.state(), ChallengeState::Lost);
        assert_eq!(challenge.try_move(Direction::Right), MoveOutcome::Ignored);
    }
}
