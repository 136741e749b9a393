//! Board rendering
//!
//! [`MazeView`] is a pure function of (grid, player position): rendering
//! the same pair into an empty buffer always produces the same cells,
//! and every call repaints the whole board.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::widgets::Widget;

use crate::{Cell, Grid, Point};

/// Light gray, as on the original board
pub const WALL_COLOR: Color = Color::Rgb(0xe0, 0xe0, 0xe0);
pub const PATH_COLOR: Color = Color::Rgb(0xff, 0xff, 0xff);
/// Soft green
pub const GOAL_COLOR: Color = Color::Rgb(0xa4, 0xe9, 0xa7);
/// Soft blue
pub const PLAYER_COLOR: Color = Color::Rgb(0x19, 0x76, 0xd2);

/// Two terminal columns per board cell, so cells come out square-ish
pub const CELL_WIDTH: u16 = 2;

/// Widget painting the board and the player marker
pub struct MazeView<'a> {
    grid: &'a Grid,
    player: Point,
}

impl<'a> MazeView<'a> {
    pub fn new(grid: &'a Grid, player: Point) -> Self {
        Self { grid, player }
    }

    /// On-screen (width, height) of the rendered board
    pub fn size(grid: &Grid) -> (u16, u16) {
        (grid.cols() as u16 * CELL_WIDTH, grid.rows() as u16)
    }

    fn fill_color(&self, cell: Cell) -> Color {
        match cell {
            Cell::Wall => WALL_COLOR,
            Cell::Path => PATH_COLOR,
            Cell::Goal => GOAL_COLOR,
        }
    }
}

impl Widget for MazeView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for y in 0..self.grid.rows() {
            let sy = area.y + y as u16;
            if sy >= area.bottom() {
                break;
            }
            for x in 0..self.grid.cols() {
                let color = self.fill_color(self.grid.cell(Point { y, x }));
                for dx in 0..CELL_WIDTH {
                    let sx = area.x + x as u16 * CELL_WIDTH + dx;
                    if sx >= area.right() {
                        break;
                    }
                    if let Some(cell) = buf.cell_mut((sx, sy)) {
                        cell.set_char(' ').set_bg(color);
                    }
                }
            }
        }

        // Player marker over its (always open) cell
        let sy = area.y + self.player.y as u16;
        let sx = area.x + self.player.x as u16 * CELL_WIDTH;
        for (dx, marker) in ['(', ')'].into_iter().enumerate() {
            let sx = sx + dx as u16;
            if sx >= area.right() || sy >= area.bottom() {
                continue;
            }
            if let Some(cell) = buf.cell_mut((sx, sy)) {
                cell.set_char(marker).set_fg(PLAYER_COLOR);
            }
        }
    }
}
