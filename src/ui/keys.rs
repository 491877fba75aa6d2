use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// A single physical key press a binding reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyPress {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        if self.code != key.code {
            return false;
        }
        // Terminals report SHIFT alongside upper-case characters.
        if let KeyCode::Char(_) = key.code {
            return strip_shift(self.modifiers) == strip_shift(key.modifiers);
        }
        self.modifiers == key.modifiers
    }
}

fn strip_shift(modifiers: KeyModifiers) -> KeyModifiers {
    modifiers.difference(KeyModifiers::SHIFT)
}

/// Keys plus the short help shown for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    keys: Vec<KeyPress>,
    help_key: String,
    help: String,
}

impl KeyBinding {
    /// Builds a binding from key names such as `enter`, `a` or `ctrl+c`.
    /// Unknown names are dropped.
    pub fn new(keys: &[&str], help_key: &str, help: &str) -> Self {
        Self {
            keys: keys.iter().filter_map(|name| parse_key_name(name)).collect(),
            help_key: help_key.to_string(),
            help: help.to_string(),
        }
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        self.keys.iter().any(|press| press.matches(key))
    }

    pub fn help_key(&self) -> &str {
        &self.help_key
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn help_entry(&self) -> String {
        format!("{} {}", self.help_key, self.help)
    }
}

pub fn key_event(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

pub fn is_release(key: &KeyEvent) -> bool {
    key.kind == KeyEventKind::Release
}

pub fn is_interrupt(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

pub fn is_confirm(key: &KeyEvent) -> bool {
    matches!(
        key.code,
        KeyCode::Enter | KeyCode::Char('\n') | KeyCode::Char('\r')
    )
}

/// Plain character input, without control or alt chords.
pub fn typed_char(key: &KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Char(ch)
            if !key.modifiers.contains(KeyModifiers::CONTROL)
                && !key.modifiers.contains(KeyModifiers::ALT)
                && ch != '\n'
                && ch != '\r' =>
        {
            Some(ch)
        }
        _ => None,
    }
}

pub fn parse_key_name(name: &str) -> Option<KeyPress> {
    let normalized = name.trim();
    if normalized.chars().count() == 1 {
        let ch = normalized.chars().next()?;
        return Some(KeyPress::new(KeyCode::Char(ch), KeyModifiers::NONE));
    }
    let lowered = normalized.to_ascii_lowercase();
    if let Some(rest) = lowered
        .strip_prefix("ctrl+")
        .or_else(|| lowered.strip_prefix("ctrl-"))
    {
        let mut chars = rest.chars();
        let ch = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        return Some(KeyPress::new(KeyCode::Char(ch), KeyModifiers::CONTROL));
    }
    let code = match lowered.as_str() {
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "enter" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "backtab" | "shift+tab" | "shift-tab" => {
            return Some(KeyPress::new(KeyCode::BackTab, KeyModifiers::SHIFT))
        }
        "backspace" => KeyCode::Backspace,
        "space" => KeyCode::Char(' '),
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pgup" | "pageup" => KeyCode::PageUp,
        "pgdown" | "pagedown" => KeyCode::PageDown,
        _ => return None,
    };
    Some(KeyPress::new(code, KeyModifiers::NONE))
}

/// Parses a comma-separated key script. `type:TEXT` expands to one key per
/// character of TEXT.
pub fn parse_scripted_keys(raw: &str) -> Result<Vec<KeyEvent>, String> {
    let mut keys = Vec::new();
    for token in raw.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        if let Some(text) = token.strip_prefix("type:") {
            keys.extend(
                text.chars()
                    .map(|ch| KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE)),
            );
            continue;
        }
        let Some(press) = parse_key_name(token) else {
            return Err(format!(
                "invalid SCANPREP_SCRIPT_KEYS token `{token}`; use key names \
                 (up,down,enter,esc,tab,backtab,backspace,ctrl-c), single characters or type:TEXT"
            ));
        };
        keys.push(KeyEvent::new(press.code, press.modifiers));
    }
    Ok(keys)
}
