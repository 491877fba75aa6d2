use super::keys::{is_confirm, typed_char, KeyBinding};
use super::{Theme, View};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::text::{Line, Span};
use std::collections::HashMap;

const DEFAULT_PAGE_SIZE: usize = 8;

/// Accessors the list needs from an entry.
pub trait ListEntry {
    fn title(&self) -> &str;
    fn description(&self) -> &str;
    fn filter_value(&self) -> &str {
        self.title()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub id: i64,
    pub title: String,
    pub description: String,
}

impl ListItem {
    pub fn new(id: i64, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
        }
    }
}

impl ListEntry for ListItem {
    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> &str {
        &self.description
    }
}

pub fn ids_of(items: &[ListItem]) -> Vec<i64> {
    items.iter().map(|item| item.id).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent<T, A> {
    /// A registered binding fired; carries the highlighted entry, if any.
    Action { action: A, selected: Option<T> },
    /// Built-in navigation, filtering or toggles changed the view.
    Handled,
    Cancelled,
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterState {
    Unfiltered,
    Filtering,
    Applied,
}

#[derive(Debug, Clone)]
pub struct ListSelector<T, A> {
    title: String,
    items: Vec<T>,
    by_title: HashMap<String, T>,
    bindings: Vec<(KeyBinding, A)>,
    cursor: usize,
    filter: String,
    filter_state: FilterState,
    page_size: usize,
    show_status_bar: bool,
    show_pagination: bool,
    show_help: bool,
    theme: Theme,
}

impl<T, A> ListSelector<T, A>
where
    T: ListEntry + Clone,
    A: Copy,
{
    pub fn new(
        title: impl Into<String>,
        items: Vec<T>,
        bindings: Vec<(KeyBinding, A)>,
        theme: Theme,
    ) -> Self {
        let mut list = Self {
            title: title.into(),
            items: Vec::new(),
            by_title: HashMap::new(),
            bindings,
            cursor: 0,
            filter: String::new(),
            filter_state: FilterState::Unfiltered,
            page_size: DEFAULT_PAGE_SIZE,
            show_status_bar: true,
            show_pagination: true,
            show_help: true,
            theme,
        };
        list.replace(items);
        list
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Replaces every entry and rebuilds the title index. Duplicate titles
    /// resolve to the last entry carrying them.
    pub fn replace(&mut self, items: Vec<T>) {
        self.by_title = HashMap::with_capacity(items.len());
        for item in &items {
            self.by_title.insert(item.title().to_string(), item.clone());
        }
        self.items = items;
        self.clamp_cursor();
    }

    pub fn lookup(&self, title: &str) -> Option<&T> {
        self.by_title.get(title)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected(&self) -> Option<&T> {
        let index = *self.visible_indices().get(self.cursor)?;
        self.items.get(index)
    }

    /// Removes the highlighted entry from the displayed items. The title
    /// index keeps it until the next `replace`.
    pub fn remove_selected(&mut self) -> Option<T> {
        let index = *self.visible_indices().get(self.cursor)?;
        let removed = self.items.remove(index);
        self.clamp_cursor();
        Some(removed)
    }

    pub fn filter(&self) -> Option<&str> {
        match self.filter_state {
            FilterState::Unfiltered => None,
            FilterState::Filtering | FilterState::Applied => Some(&self.filter),
        }
    }

    pub fn is_filtering(&self) -> bool {
        self.filter_state == FilterState::Filtering
    }

    fn visible_indices(&self) -> Vec<usize> {
        if self.filter_state == FilterState::Unfiltered || self.filter.is_empty() {
            return (0..self.items.len()).collect();
        }
        let needle = self.filter.to_lowercase();
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.filter_value().to_lowercase().contains(&needle))
            .map(|(idx, _)| idx)
            .collect()
    }

    fn clamp_cursor(&mut self) {
        let visible = self.visible_indices().len();
        if visible == 0 {
            self.cursor = 0;
        } else {
            self.cursor = self.cursor.min(visible - 1);
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        let visible = self.visible_indices().len();
        if visible == 0 {
            self.cursor = 0;
            return;
        }
        let max = (visible - 1) as isize;
        self.cursor = (self.cursor as isize + delta).clamp(0, max) as usize;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> ListEvent<T, A> {
        if self.filter_state == FilterState::Filtering {
            return self.handle_filter_key(key);
        }

        if let Some(action) = self
            .bindings
            .iter()
            .find(|(binding, _)| binding.matches(&key))
            .map(|(_, action)| *action)
        {
            return ListEvent::Action {
                action,
                selected: self.selected().cloned(),
            };
        }

        let page = self.page_size as isize;
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
            KeyCode::PageUp | KeyCode::Left | KeyCode::Char('h') => self.move_cursor(-page),
            KeyCode::PageDown | KeyCode::Right | KeyCode::Char('l') => self.move_cursor(page),
            KeyCode::Home | KeyCode::Char('g') => self.cursor = 0,
            KeyCode::End | KeyCode::Char('G') => {
                self.cursor = self.visible_indices().len().saturating_sub(1)
            }
            KeyCode::Char('/') => {
                self.filter_state = FilterState::Filtering;
                self.filter.clear();
                self.cursor = 0;
            }
            KeyCode::Char('S') => self.show_status_bar = !self.show_status_bar,
            KeyCode::Char('P') => self.show_pagination = !self.show_pagination,
            KeyCode::Char('H') => self.show_help = !self.show_help,
            KeyCode::Esc if self.filter_state == FilterState::Applied => self.clear_filter(),
            KeyCode::Esc | KeyCode::Char('q') => return ListEvent::Cancelled,
            _ => return ListEvent::Ignored,
        }
        ListEvent::Handled
    }

    fn handle_filter_key(&mut self, key: KeyEvent) -> ListEvent<T, A> {
        if is_confirm(&key) {
            self.filter_state = if self.filter.is_empty() {
                FilterState::Unfiltered
            } else {
                FilterState::Applied
            };
            self.clamp_cursor();
            return ListEvent::Handled;
        }
        match key.code {
            KeyCode::Esc => self.clear_filter(),
            KeyCode::Backspace => {
                self.filter.pop();
                self.cursor = 0;
            }
            _ => match typed_char(&key) {
                Some(ch) => {
                    self.filter.push(ch);
                    self.cursor = 0;
                }
                None => return ListEvent::Ignored,
            },
        }
        ListEvent::Handled
    }

    fn clear_filter(&mut self) {
        self.filter.clear();
        self.filter_state = FilterState::Unfiltered;
        self.clamp_cursor();
    }

    pub fn hint(&self) -> String {
        if self.filter_state == FilterState::Filtering {
            return "type to filter | enter apply | esc clear".to_string();
        }
        let mut entries: Vec<String> = self
            .bindings
            .iter()
            .map(|(binding, _)| binding.help_entry())
            .collect();
        entries.push("/ filter".to_string());
        entries.push("q quit".to_string());
        entries.join(" | ")
    }

    pub fn view(&self) -> View {
        let mut lines = Vec::new();
        if let Some(filter) = self.filter() {
            let cursor = if self.is_filtering() { "_" } else { "" };
            lines.push(Line::from(Span::styled(
                format!("Filter: {filter}{cursor}"),
                self.theme.label,
            )));
        }

        let visible = self.visible_indices();
        if visible.is_empty() {
            lines.push(Line::from(Span::styled(
                "No items.".to_string(),
                self.theme.muted,
            )));
        }
        let page = self.cursor / self.page_size;
        let pages = visible.len().div_ceil(self.page_size).max(1);
        let start = page * self.page_size;
        for (offset, index) in visible
            .iter()
            .skip(start)
            .take(self.page_size)
            .enumerate()
        {
            let item = &self.items[*index];
            let is_selected = start + offset == self.cursor;
            let (marker, style) = if is_selected {
                ("> ", self.theme.selected)
            } else {
                ("  ", ratatui::style::Style::default())
            };
            lines.push(Line::from(vec![
                Span::raw(marker.to_string()),
                Span::styled(item.title().to_string(), style),
            ]));
            if !item.description().is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("    {}", item.description()),
                    self.theme.description,
                )));
            }
        }

        if self.show_status_bar || self.show_pagination {
            lines.push(Line::from(String::new()));
        }
        if self.show_status_bar {
            let count = if visible.len() == self.items.len() {
                format!("{} items", self.items.len())
            } else {
                format!("{} of {} items", visible.len(), self.items.len())
            };
            lines.push(Line::from(Span::styled(count, self.theme.muted)));
        }
        if self.show_pagination && pages > 1 {
            lines.push(Line::from(Span::styled(
                format!("page {}/{}", page + 1, pages),
                self.theme.muted,
            )));
        }

        View {
            title: self.title.clone(),
            lines,
            hint: if self.show_help {
                self.hint()
            } else {
                String::new()
            },
        }
    }

    /// Plain-text rendering of `view`.
    pub fn render(&self) -> String {
        self.view().plain_lines().join("\n")
    }
}
