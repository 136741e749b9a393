//! Interactive terminal challenge
//!
//! One logical thread drives everything: keyboard events and a 1 Hz
//! countdown tick, multiplexed through the [`event::poll`] timeout. The
//! caller owns terminal setup and restore (`ratatui::init` /
//! `ratatui::restore`), so the raw-mode guard is released on every exit
//! path.

use std::time::{Duration, Instant};

use ratatui::crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Clear, Paragraph};
use ratatui::{DefaultTerminal, Frame};

use crate::render::MazeView;
use crate::text_challenge::{TextChallenge, INCORRECT_MESSAGE};
use crate::{ChallengeState, Direction, MazeChallenge, MoveOutcome};

const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Terminal front-end for one CAPTCHA session
///
/// Holds the maze session plus the fallback text challenge and its
/// overlay state. The pass verdict is recorded at most once, whichever
/// challenge the visitor completes first.
pub struct App {
    challenge: MazeChallenge,
    text: TextChallenge,
    overlay_open: bool,
    answer: String,
    error: Option<&'static str>,
    passed: bool,
    exit: bool,
}

impl App {
    pub fn new(challenge: MazeChallenge) -> Self {
        Self {
            challenge,
            text: TextChallenge::default(),
            overlay_open: false,
            answer: String::new(),
            error: None,
            passed: false,
            exit: false,
        }
    }

    /// Whether the visitor passed either challenge
    pub fn passed(&self) -> bool {
        self.passed
    }

    /// Run the event loop until the visitor leaves
    ///
    /// # Errors
    ///
    /// - [`std::io::Error`] from the terminal backend
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> anyhow::Result<()> {
        let mut next_tick = Instant::now() + TICK_INTERVAL;
        while !self.exit {
            terminal.draw(|frame| self.draw(frame))?;

            let timeout = next_tick.saturating_duration_since(Instant::now());
            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            } else {
                next_tick += TICK_INTERVAL;
                self.on_tick();
            }
        }
        Ok(())
    }

    fn on_tick(&mut self) {
        self.challenge.tick();
    }

    fn handle_key(&mut self, code: KeyCode) {
        if self.overlay_open {
            return self.handle_overlay_key(code);
        }
        match code {
            KeyCode::Up => self.step(Direction::Up),
            KeyCode::Down => self.step(Direction::Down),
            KeyCode::Left => self.step(Direction::Left),
            KeyCode::Right => self.step(Direction::Right),
            KeyCode::Char('t') if !self.passed => self.overlay_open = true,
            KeyCode::Char('q') | KeyCode::Esc => self.exit = true,
            KeyCode::Enter if self.passed => self.exit = true,
            _ => {}
        }
    }

    fn handle_overlay_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.overlay_open = false;
                self.answer.clear();
                self.error = None;
            }
            KeyCode::Enter => {
                if self.text.verify(&self.answer) {
                    self.mark_passed();
                    self.overlay_open = false;
                    self.error = None;
                } else {
                    self.error = Some(INCORRECT_MESSAGE);
                }
            }
            KeyCode::Backspace => {
                self.answer.pop();
            }
            KeyCode::Char(c) => self.answer.push(c),
            _ => {}
        }
    }

    fn step(&mut self, direction: Direction) {
        if self.challenge.try_move(direction) == MoveOutcome::Won {
            self.mark_passed();
        }
    }

    fn mark_passed(&mut self) {
        self.passed = true;
    }

    fn draw(&self, frame: &mut Frame) {
        let (maze_width, maze_height) = MazeView::size(self.challenge.grid());
        let [title_area, maze_area, status_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(maze_height),
            Constraint::Length(4),
        ])
        .flex(Flex::Center)
        .areas(frame.area());
        let [maze_area] = Layout::horizontal([Constraint::Length(maze_width)])
            .flex(Flex::Center)
            .areas(maze_area);

        let title = format!("Time left: {}s", self.challenge.remaining_seconds());
        frame.render_widget(Paragraph::new(title).alignment(Alignment::Center), title_area);
        frame.render_widget(
            MazeView::new(self.challenge.grid(), self.challenge.position()),
            maze_area,
        );

        let mut lines = Vec::new();
        if self.passed {
            let message = match self.challenge.state() {
                ChallengeState::Won => "You reached the goal!",
                _ => "CAPTCHA passed!",
            };
            lines.push(Line::styled(message, Style::default().fg(Color::Green)));
        } else if self.challenge.state() == ChallengeState::Lost {
            lines.push(Line::styled(
                "Time's up! Press t to try the text challenge.",
                Style::default().fg(Color::Red),
            ));
        }
        lines.push(Line::from("(arrows) move / (t) text challenge / (q) quit"));
        frame.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center),
            status_area,
        );

        if self.overlay_open {
            self.draw_overlay(frame);
        }
    }

    fn draw_overlay(&self, frame: &mut Frame) {
        let area = Self::popup_area(frame.area(), 46, 4);
        frame.render_widget(Clear, area);

        let block = Block::bordered()
            .title(format!(
                "Type the word \"{}\" to continue",
                self.text.prompt_word()
            ))
            .title_bottom("(Enter) submit / (Esc) back")
            .title_alignment(Alignment::Center)
            .border_type(BorderType::Rounded);

        let mut lines = vec![Line::from(format!("> {}", self.answer))];
        if let Some(message) = self.error {
            lines.push(Line::styled(message, Style::default().fg(Color::Red)));
        }
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    /// Centered popup rectangle of at most `width` × `height`
    fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
        let [area] = Layout::horizontal([Constraint::Max(width)])
            .flex(Flex::Center)
            .areas(area);
        let [area] = Layout::vertical([Constraint::Max(height)])
            .flex(Flex::Center)
            .areas(area);
        area
    }
}
