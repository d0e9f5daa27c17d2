//! Process-wide presentation settings, registered once at startup.

use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    color: bool,
}

impl Theme {
    pub fn plain() -> Self {
        Self { color: false }
    }

    pub fn ansi() -> Self {
        Self { color: true }
    }

    pub fn heading(&self, text: &str) -> String {
        self.paint("1", text)
    }

    pub fn muted(&self, text: &str) -> String {
        self.paint("2", text)
    }

    pub fn correct(&self, text: &str) -> String {
        self.paint("32", text)
    }

    pub fn wrong(&self, text: &str) -> String {
        self.paint("31", text)
    }

    pub fn badge(&self, text: &str) -> String {
        self.paint("35", &format!("[{text}]"))
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }
}

/// Registers the theme for the process. Only the first call has any effect.
pub fn register(theme: Theme) -> &'static Theme {
    THEME.get_or_init(|| theme)
}

/// The registered theme, or the plain theme if none was registered.
pub fn current() -> &'static Theme {
    THEME.get_or_init(Theme::plain)
}
