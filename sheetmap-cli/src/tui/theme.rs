use ratatui::style::Color;

/// Colors used by the shell
#[derive(Debug, Clone)]
pub struct Theme {
    pub accent_primary: Color,
    pub accent_secondary: Color,
    pub accent_success: Color,
    pub accent_warning: Color,
    pub accent_error: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_tertiary: Color,
    pub bg_surface: Color,
    pub border_primary: Color,
    pub border_secondary: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent_primary: Color::Cyan,
            accent_secondary: Color::Magenta,
            accent_success: Color::Green,
            accent_warning: Color::Yellow,
            accent_error: Color::Red,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            text_tertiary: Color::DarkGray,
            bg_surface: Color::Rgb(40, 44, 52),
            border_primary: Color::Cyan,
            border_secondary: Color::DarkGray,
        }
    }
}
