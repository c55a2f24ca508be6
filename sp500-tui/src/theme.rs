//! Color and style tokens for the dashboard.
//!
//! Neon accents on a dark background. Chart series use a bright line over
//! a dimmed area fill of the same hue: purple for closing prices, sky blue
//! for volume.

use ratatui::style::{Color, Modifier, Style};

pub const ACCENT: Color = Color::Rgb(0, 255, 255);
pub const POSITIVE: Color = Color::Rgb(0, 255, 128);
pub const NEGATIVE: Color = Color::Rgb(255, 20, 147);
pub const WARNING: Color = Color::Rgb(255, 140, 0);
pub const NEUTRAL: Color = Color::Rgb(147, 112, 219);
pub const MUTED: Color = Color::Rgb(100, 149, 237);
pub const TEXT: Color = Color::White;

pub const CLOSE_LINE: Color = Color::Rgb(160, 32, 240);
pub const CLOSE_FILL: Color = Color::Rgb(72, 24, 104);
pub const VOLUME_LINE: Color = Color::Rgb(135, 206, 235);
pub const VOLUME_FILL: Color = Color::Rgb(44, 70, 84);

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn positive() -> Style {
    Style::default().fg(POSITIVE)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn neutral() -> Style {
    Style::default().fg(NEUTRAL)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn text() -> Style {
    Style::default().fg(TEXT)
}

/// Row under the cursor in a focused list.
pub fn cursor(focused: bool) -> Style {
    if focused {
        accent().add_modifier(Modifier::REVERSED)
    } else {
        text().add_modifier(Modifier::UNDERLINED)
    }
}

pub fn panel_border(focused: bool) -> Style {
    if focused {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(focused: bool) -> Style {
    if focused {
        accent_bold()
    } else {
        muted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_changes_border() {
        assert_ne!(panel_border(true), panel_border(false));
        assert_eq!(panel_border(true).fg, Some(ACCENT));
    }

    #[test]
    fn series_fill_is_dimmer_than_line() {
        fn luma(c: Color) -> u32 {
            match c {
                Color::Rgb(r, g, b) => r as u32 + g as u32 + b as u32,
                _ => 0,
            }
        }
        assert!(luma(CLOSE_FILL) < luma(CLOSE_LINE));
        assert!(luma(VOLUME_FILL) < luma(VOLUME_LINE));
    }
}
