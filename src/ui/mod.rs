pub mod choice_selector;
pub mod form;
pub mod keys;
pub mod list_selector;
pub mod terminal;
pub mod theme;

pub use choice_selector::{ChoiceEvent, ChoicePath, ChoicePrompt, ChoiceSelector};
pub use form::{Form, FormEvent, FormField};
pub use keys::{parse_scripted_keys, KeyBinding, KeyPress};
pub use list_selector::{ListEntry, ListEvent, ListItem, ListSelector};
pub use terminal::{FlowTerminal, ScriptedTerminal, TerminalSession, UiError};
pub use theme::Theme;

use ratatui::text::Line;

/// What one primitive contributes to the screen.
#[derive(Debug, Clone, Default)]
pub struct View {
    pub title: String,
    pub lines: Vec<Line<'static>>,
    pub hint: String,
}

impl View {
    pub fn plain_lines(&self) -> Vec<String> {
        self.lines.iter().map(line_text).collect()
    }
}

pub fn line_text(line: &Line<'_>) -> String {
    line.spans
        .iter()
        .map(|span| span.content.as_ref())
        .collect::<String>()
}

/// Keeps the last `max_chars` characters of `value`.
pub fn tail_for_display(value: &str, max_chars: usize) -> String {
    if max_chars == 0 {
        return String::new();
    }
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= max_chars {
        return value.to_string();
    }
    chars[chars.len() - max_chars..].iter().collect()
}
