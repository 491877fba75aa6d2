use super::{line_text, View};
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyEvent};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Padding, Paragraph, Wrap};
use ratatui::Terminal;
use std::collections::VecDeque;
use std::io;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum UiError {
    #[error("failed to {action}: {source}")]
    Io {
        action: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("scripted input ran out of keys")]
    ScriptExhausted,
}

fn io_err(action: &'static str) -> impl FnOnce(io::Error) -> UiError {
    move |source| UiError::Io { action, source }
}

/// Where a running flow draws its screens and reads its keys from.
pub trait FlowTerminal {
    fn draw(&mut self, view: &View, status: Option<&str>) -> Result<(), UiError>;
    fn next_key(&mut self) -> Result<KeyEvent, UiError>;
}

/// Raw-mode alternate screen on stdout.
pub struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    /// Enters the alternate screen, runs `body`, then restores the terminal
    /// whether or not `body` succeeded.
    pub fn run<T>(body: impl FnOnce(&mut TerminalSession) -> T) -> Result<T, UiError> {
        let mut stdout = io::stdout();
        enable_raw_mode().map_err(io_err("enable raw mode"))?;
        execute!(stdout, EnterAlternateScreen, Hide).map_err(io_err("enter flow screen"))?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).map_err(io_err("create terminal"))?;
        let mut session = TerminalSession { terminal };
        let result = body(&mut session);
        disable_raw_mode().map_err(io_err("disable raw mode"))?;
        execute!(session.terminal.backend_mut(), Show, LeaveAlternateScreen)
            .map_err(io_err("leave flow screen"))?;
        Ok(result)
    }
}

impl FlowTerminal for TerminalSession {
    fn draw(&mut self, view: &View, status: Option<&str>) -> Result<(), UiError> {
        self.terminal
            .draw(|frame| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Min(8),
                        Constraint::Length(4),
                    ])
                    .split(frame.area());
                let header = Paragraph::new(Line::from(Span::raw(view.title.clone())))
                    .block(Block::default().borders(Borders::ALL));
                frame.render_widget(header, chunks[0]);

                let body = Paragraph::new(view.lines.clone())
                    .wrap(Wrap { trim: false })
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .padding(Padding::new(2, 2, 1, 1)),
                    );
                frame.render_widget(body, chunks[1]);

                let footer = Paragraph::new(vec![
                    Line::from(view.hint.clone()),
                    Line::from(format!("Status: {}", status.unwrap_or(""))),
                ])
                .block(Block::default().borders(Borders::ALL));
                frame.render_widget(footer, chunks[2]);
            })
            .map_err(io_err("render flow screen"))?;
        Ok(())
    }

    fn next_key(&mut self) -> Result<KeyEvent, UiError> {
        loop {
            if !event::poll(Duration::from_millis(250)).map_err(io_err("poll input"))? {
                continue;
            }
            if let Event::Key(key) = event::read().map_err(io_err("read input"))? {
                return Ok(key);
            }
        }
    }
}

/// Feeds a fixed key sequence and keeps the last frame as plain text.
#[derive(Debug, Default)]
pub struct ScriptedTerminal {
    keys: VecDeque<KeyEvent>,
    last_frame: String,
    frames: usize,
}

impl ScriptedTerminal {
    pub fn new(keys: Vec<KeyEvent>) -> Self {
        Self {
            keys: keys.into(),
            last_frame: String::new(),
            frames: 0,
        }
    }

    pub fn last_frame(&self) -> &str {
        &self.last_frame
    }

    pub fn frames_drawn(&self) -> usize {
        self.frames
    }

    pub fn remaining_keys(&self) -> usize {
        self.keys.len()
    }
}

impl FlowTerminal for ScriptedTerminal {
    fn draw(&mut self, view: &View, status: Option<&str>) -> Result<(), UiError> {
        let mut text = vec![view.title.clone()];
        text.extend(view.lines.iter().map(line_text));
        text.push(view.hint.clone());
        if let Some(status) = status {
            text.push(format!("Status: {status}"));
        }
        self.last_frame = text.join("\n");
        self.frames += 1;
        Ok(())
    }

    fn next_key(&mut self) -> Result<KeyEvent, UiError> {
        self.keys.pop_front().ok_or(UiError::ScriptExhausted)
    }
}
