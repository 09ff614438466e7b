use ratatui::style::{Color, Modifier, Style};

use libdesk_core::lifecycle::ActivationState;
use libdesk_core::NoticeLevel;

// Reading-room palette
pub const CATALOGUE: Color = Color::Rgb(72, 160, 160);
pub const SHELVED: Color = Color::Rgb(120, 168, 96);
pub const STAMP: Color = Color::Rgb(212, 168, 80);
pub const BRICK: Color = Color::Rgb(200, 88, 72);
pub const FADED_INK: Color = Color::Rgb(136, 132, 124);
pub const PAPER: Color = Color::Rgb(232, 226, 212);
pub const DESK: Color = Color::Rgb(36, 34, 32);
pub const CURSOR: Color = Color::Rgb(56, 72, 72);

pub fn title_style() -> Style {
    Style::default().fg(CATALOGUE).add_modifier(Modifier::BOLD)
}

pub fn selected_style() -> Style {
    Style::default().bg(CURSOR).fg(PAPER).add_modifier(Modifier::BOLD)
}

pub fn list_item_style() -> Style {
    Style::default().fg(PAPER)
}

pub fn muted_style() -> Style {
    Style::default().fg(FADED_INK)
}

pub fn highlight_style() -> Style {
    Style::default().fg(STAMP)
}

pub fn error_style() -> Style {
    Style::default().fg(BRICK)
}

pub fn tab_style(selected: bool) -> Style {
    if selected {
        Style::default()
            .fg(CATALOGUE)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    } else {
        muted_style()
    }
}

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(CATALOGUE)
    } else {
        muted_style()
    }
}

pub fn status_bar_style() -> Style {
    Style::default().bg(DESK).fg(PAPER)
}

pub fn help_key_style() -> Style {
    Style::default().fg(STAMP).add_modifier(Modifier::BOLD)
}

pub fn help_desc_style() -> Style {
    list_item_style()
}

/// Border and message colours of a notice overlay.
pub fn notice_styles(level: NoticeLevel) -> (Style, Style) {
    match level {
        NoticeLevel::Info => (border_style(true), list_item_style()),
        NoticeLevel::Error => (error_style(), error_style().add_modifier(Modifier::BOLD)),
    }
}

/// Colour for the load-state indicator in the status bar.
pub fn load_state_style(state: ActivationState) -> Style {
    match state {
        ActivationState::Inactive => muted_style(),
        ActivationState::Loading => highlight_style(),
        ActivationState::Loaded => Style::default().fg(SHELVED),
        ActivationState::Failed => error_style(),
    }
}
