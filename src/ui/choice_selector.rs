use super::keys::{is_confirm, is_interrupt};
use super::{Theme, View};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use std::collections::HashMap;

/// Tokens chosen on the way from the root prompt down to a leaf.
pub type ChoicePath = Vec<String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoicePrompt {
    pub label: String,
    pub choices: Vec<String>,
}

impl ChoicePrompt {
    pub fn new(label: impl Into<String>, choices: Vec<String>) -> Self {
        Self {
            label: label.into(),
            choices,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceEvent {
    Moved,
    /// A choice with a registered sub-prompt was taken.
    Descended(String),
    Completed(ChoicePath),
    Cancelled,
    Ignored,
}

#[derive(Debug, Clone)]
pub struct ChoiceSelector {
    root: ChoicePrompt,
    sub_prompts: HashMap<String, ChoicePrompt>,
    current: ChoicePrompt,
    path: ChoicePath,
    cursor: usize,
    completed: bool,
    theme: Theme,
}

impl ChoiceSelector {
    pub fn new(root: ChoicePrompt, theme: Theme) -> Self {
        Self {
            current: root.clone(),
            root,
            sub_prompts: HashMap::new(),
            path: Vec::new(),
            cursor: 0,
            completed: false,
            theme,
        }
    }

    /// Registers the prompt shown after `token` is chosen.
    pub fn with_sub_prompt(mut self, token: impl Into<String>, prompt: ChoicePrompt) -> Self {
        self.sub_prompts.insert(token.into(), prompt);
        self
    }

    pub fn prompt(&self) -> &ChoicePrompt {
        &self.current
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Returns to the root prompt with an empty path.
    pub fn reset(&mut self) {
        self.current = self.root.clone();
        self.path.clear();
        self.cursor = 0;
        self.completed = false;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> ChoiceEvent {
        if self.completed {
            return ChoiceEvent::Ignored;
        }
        if is_interrupt(&key) {
            return ChoiceEvent::Cancelled;
        }
        if is_confirm(&key) {
            return self.choose();
        }
        let len = self.current.choices.len();
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => ChoiceEvent::Cancelled,
            KeyCode::Down | KeyCode::Char('j') if len > 0 => {
                self.cursor = (self.cursor + 1) % len;
                ChoiceEvent::Moved
            }
            KeyCode::Up | KeyCode::Char('k') if len > 0 => {
                self.cursor = (self.cursor + len - 1) % len;
                ChoiceEvent::Moved
            }
            _ => ChoiceEvent::Ignored,
        }
    }

    fn choose(&mut self) -> ChoiceEvent {
        let Some(choice) = self.current.choices.get(self.cursor).cloned() else {
            return ChoiceEvent::Ignored;
        };
        self.path.push(choice.clone());
        if let Some(next) = self.sub_prompts.get(&choice) {
            self.current = next.clone();
            self.cursor = 0;
            return ChoiceEvent::Descended(choice);
        }
        self.completed = true;
        ChoiceEvent::Completed(self.path.clone())
    }

    pub fn view(&self) -> View {
        let mut lines = vec![
            Line::from(Span::styled(self.current.label.clone(), self.theme.label)),
            Line::from(String::new()),
        ];
        if !self.path.is_empty() {
            lines.insert(
                1,
                Line::from(Span::styled(
                    format!("Path: {}", self.path.join(" > ")),
                    self.theme.muted,
                )),
            );
        }
        if self.current.choices.is_empty() {
            lines.push(Line::from(Span::styled(
                "No choices available.".to_string(),
                self.theme.muted,
            )));
        }
        for (idx, choice) in self.current.choices.iter().enumerate() {
            let (marker, style) = if idx == self.cursor {
                ("(•) ", self.theme.selected)
            } else {
                ("( ) ", Style::default())
            };
            lines.push(Line::from(vec![
                Span::raw(marker.to_string()),
                Span::styled(choice.clone(), style),
            ]));
        }
        View {
            title: self.root.label.clone(),
            lines,
            hint: "up/down move | enter choose | q quit".to_string(),
        }
    }

    pub fn render(&self) -> String {
        self.view().plain_lines().join("\n")
    }
}
