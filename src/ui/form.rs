use super::keys::{is_confirm, is_interrupt, typed_char};
use super::{tail_for_display, Theme, View};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::text::{Line, Span};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub placeholder: String,
    pub char_limit: usize,
    pub width: usize,
    pub label: String,
    /// Payload key the value is submitted under.
    pub original_key: String,
}

impl FormField {
    pub fn new(label: impl Into<String>, placeholder: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            original_key: label.clone(),
            label,
            placeholder: placeholder.into(),
            char_limit: 20,
            width: 20,
        }
    }

    pub fn with_limits(mut self, char_limit: usize, width: usize) -> Self {
        self.char_limit = char_limit;
        self.width = width;
        self
    }

    pub fn with_key(mut self, original_key: impl Into<String>) -> Self {
        self.original_key = original_key.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    Edited,
    FocusMoved(usize),
    /// Confirm on the last field; values in declaration order.
    Submitted(Vec<String>),
    Cancelled,
    Ignored,
}

#[derive(Debug, Clone)]
pub struct Form {
    prompt: Option<String>,
    fields: Vec<FormField>,
    values: Vec<String>,
    focused: usize,
    theme: Theme,
}

impl Form {
    pub fn new(fields: Vec<FormField>, theme: Theme) -> Self {
        Self {
            prompt: None,
            values: vec![String::new(); fields.len()],
            fields,
            focused: 0,
            theme,
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn focused(&self) -> usize {
        self.focused
    }

    /// Overwrites a field value, truncated to the field's limit.
    pub fn set_value(&mut self, index: usize, value: &str) {
        let Some(field) = self.fields.get(index) else {
            return;
        };
        self.values[index] = value.chars().take(field.char_limit).collect();
    }

    pub fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + 1) % self.fields.len();
        }
    }

    pub fn prev_field(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + self.fields.len() - 1) % self.fields.len();
        }
    }

    fn on_last_field(&self) -> bool {
        self.fields.is_empty() || self.focused == self.fields.len() - 1
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormEvent {
        if is_interrupt(&key) || key.code == KeyCode::Esc {
            return FormEvent::Cancelled;
        }
        if is_confirm(&key) {
            if self.on_last_field() {
                return FormEvent::Submitted(self.values.clone());
            }
            self.next_field();
            return FormEvent::FocusMoved(self.focused);
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Tab => {
                self.next_field();
                FormEvent::FocusMoved(self.focused)
            }
            KeyCode::Char('n') if ctrl => {
                self.next_field();
                FormEvent::FocusMoved(self.focused)
            }
            KeyCode::BackTab => {
                self.prev_field();
                FormEvent::FocusMoved(self.focused)
            }
            KeyCode::Char('p') if ctrl => {
                self.prev_field();
                FormEvent::FocusMoved(self.focused)
            }
            KeyCode::Backspace => match self.values.get_mut(self.focused) {
                Some(value) => {
                    value.pop();
                    FormEvent::Edited
                }
                None => FormEvent::Ignored,
            },
            _ => {
                let Some(ch) = typed_char(&key) else {
                    return FormEvent::Ignored;
                };
                let Some(field) = self.fields.get(self.focused) else {
                    return FormEvent::Ignored;
                };
                let value = &mut self.values[self.focused];
                if value.chars().count() >= field.char_limit {
                    return FormEvent::Ignored;
                }
                value.push(ch);
                FormEvent::Edited
            }
        }
    }

    /// Pairs submitted values with each field's `original_key`.
    pub fn payload(&self, values: &[String]) -> BTreeMap<String, String> {
        self.fields
            .iter()
            .zip(values)
            .map(|(field, value)| (field.original_key.clone(), value.clone()))
            .collect()
    }

    pub fn view(&self) -> View {
        let mut lines = Vec::new();
        for (idx, field) in self.fields.iter().enumerate() {
            let focused = idx == self.focused;
            lines.push(Line::from(Span::styled(field.label.clone(), self.theme.label)));
            let value = &self.values[idx];
            let marker = if focused { "> " } else { "  " };
            let shown = if value.is_empty() {
                Span::styled(
                    tail_for_display(&field.placeholder, field.width),
                    self.theme.placeholder,
                )
            } else {
                Span::raw(tail_for_display(value, field.width))
            };
            let mut spans = vec![Span::raw(marker.to_string()), shown];
            if focused {
                spans.push(Span::styled("_".to_string(), self.theme.selected));
            }
            lines.push(Line::from(spans));
            lines.push(Line::from(String::new()));
        }
        lines.push(Line::from(Span::styled(
            "Continue ->".to_string(),
            self.theme.muted,
        )));
        View {
            title: self.prompt.clone().unwrap_or_default(),
            lines,
            hint: "tab/shift+tab move | enter next/submit | esc cancel".to_string(),
        }
    }

    pub fn render(&self) -> String {
        self.view().plain_lines().join("\n")
    }
}
