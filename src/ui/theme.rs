use ratatui::style::{Color, Modifier, Style};

/// Styling handed to each primitive when it is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub title: Style,
    pub label: Style,
    pub selected: Style,
    pub description: Style,
    pub placeholder: Style,
    pub muted: Style,
}

const TITLE_FG: Color = Color::Rgb(0xFF, 0xFD, 0xF5);
const HOT_PINK: Color = Color::Rgb(0xFF, 0x06, 0xB7);
const DARK_GRAY: Color = Color::Rgb(0x76, 0x76, 0x76);

impl Theme {
    pub fn with_accent(accent: Color) -> Self {
        Self {
            title: Style::default()
                .fg(TITLE_FG)
                .bg(accent)
                .add_modifier(Modifier::BOLD),
            label: Style::default().fg(HOT_PINK),
            selected: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            description: Style::default().fg(DARK_GRAY),
            placeholder: Style::default().fg(DARK_GRAY),
            muted: Style::default().fg(DARK_GRAY),
        }
    }

    pub fn workspace() -> Self {
        Self::with_accent(Color::Rgb(0xA8, 0x46, 0xA0))
    }

    pub fn project() -> Self {
        Self::with_accent(Color::Rgb(0x0F, 0x52, 0x57))
    }

    pub fn template_playlist() -> Self {
        Self::with_accent(Color::Rgb(0x25, 0xA0, 0x65))
    }

    pub fn asset_playlist() -> Self {
        Self::with_accent(Color::Rgb(0x1C, 0x77, 0xC3))
    }

    pub fn datasource() -> Self {
        Self::with_accent(Color::Rgb(0x3A, 0x43, 0x5E))
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::with_accent(Color::Cyan)
    }
}
