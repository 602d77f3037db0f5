//! Color theme system for revdash.
//!
//! A `Theme` holds named `ratatui::style::Color` fields covering every UI
//! surface revdash renders. Two built-in themes are provided:
//!
//! - `dark` — uses ANSI 16 colors (`Color::Reset`, `Color::DarkGray`, etc.)
//!   so it works on any terminal including 256-color SSH sessions with no
//!   truecolor support.
//! - `catppuccin_mocha` — Catppuccin Mocha palette in RGB; requires truecolor.

use ratatui::style::Color;

/// All color values used across revdash's UI surfaces.
///
/// Every field is a `ratatui::style::Color`. Callers use `theme.field`
/// directly inside `Style::default().fg(theme.border_active)`.
#[derive(Debug, Clone)]
pub struct Theme {
    // Chrome
    /// Border color for the active panel or modal.
    pub border_active: Color,
    /// Border color for everything else.
    pub border_inactive: Color,
    /// Foreground for the selected tab in the tab bar.
    pub tab_active: Color,
    /// Foreground for unselected tabs.
    pub tab_inactive: Color,

    // Review status badges
    /// Badge color for `success`.
    pub status_success: Color,
    /// Badge color for `partial_failure`.
    pub status_warning: Color,
    /// Badge color for `failure`.
    pub status_failure: Color,
    /// Badge color for unrecognized status values (neutral, no icon).
    pub status_neutral: Color,

    // Trends
    /// Trend color when the change is favorable.
    pub trend_favorable: Color,
    /// Trend color when the change is unfavorable.
    pub trend_unfavorable: Color,

    // Comment severity badges (review detail overlay)
    /// Badge color for critical severity.
    pub severity_critical: Color,
    /// Badge color for warning severity.
    pub severity_warning: Color,
    /// Badge color for info severity.
    pub severity_info: Color,

    // Content
    /// Large stat-card values.
    pub value_emphasis: Color,
    /// Secondary text: labels, hints, timestamps.
    pub text_dim: Color,
    /// Skeleton placeholder blocks shown while a first fetch is in flight.
    pub skeleton: Color,
    /// Selection highlight in tables and form rows.
    pub selection: Color,

    // Status bar & toasts
    /// Status bar background.
    pub status_bar_bg: Color,
    /// Status bar foreground (general text).
    pub status_bar_fg: Color,
    /// Toast color for informational messages.
    pub toast_info: Color,
    /// Toast color for success messages.
    pub toast_success: Color,
    /// Toast color for error messages.
    pub toast_error: Color,

    // General
    /// Application background (used for clearing areas).
    pub background: Color,
}

impl Theme {
    /// Returns the built-in dark theme using ANSI 16 colors.
    ///
    /// Works on all terminals: 16-color, 256-color, and truecolor. Suitable
    /// as the default when no config is present or color capability is
    /// unknown.
    pub fn dark() -> Self {
        Self {
            border_active: Color::Cyan,
            border_inactive: Color::DarkGray,
            tab_active: Color::Cyan,
            tab_inactive: Color::DarkGray,

            status_success: Color::Green,
            status_warning: Color::Yellow,
            status_failure: Color::Red,
            status_neutral: Color::DarkGray,

            trend_favorable: Color::Green,
            trend_unfavorable: Color::Red,

            severity_critical: Color::Red,
            severity_warning: Color::Yellow,
            severity_info: Color::DarkGray,

            value_emphasis: Color::White,
            text_dim: Color::DarkGray,
            skeleton: Color::DarkGray,
            selection: Color::Cyan,

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            toast_info: Color::Cyan,
            toast_success: Color::Green,
            toast_error: Color::Red,

            background: Color::Reset,
        }
    }

    /// Returns the Catppuccin Mocha theme using RGB truecolor values.
    ///
    /// Requires a truecolor terminal. Colors degrade to the nearest ANSI
    /// 256-color approximation on non-truecolor terminals, but visual
    /// fidelity is reduced. Use `dark()` on SSH or 256-color terminals.
    ///
    /// Palette source: <https://github.com/catppuccin/catppuccin> Mocha variant.
    pub fn catppuccin_mocha() -> Self {
        // Catppuccin Mocha palette (selected subset)
        let green = Color::Rgb(166, 227, 161);    // #a6e3a1
        let red = Color::Rgb(243, 139, 168);      // #f38ba8
        let yellow = Color::Rgb(249, 226, 175);   // #f9e2af
        let lavender = Color::Rgb(180, 190, 254); // #b4befe
        let overlay1 = Color::Rgb(127, 132, 156); // #7f849c
        let surface1 = Color::Rgb(69, 71, 90);    // #45475a
        let base = Color::Rgb(30, 30, 46);        // #1e1e2e
        let text = Color::Rgb(205, 214, 244);     // #cdd6f4
        let peach = Color::Rgb(250, 179, 135);    // #fab387
        let teal = Color::Rgb(148, 226, 213);     // #94e2d5

        Self {
            border_active: lavender,
            border_inactive: overlay1,
            tab_active: lavender,
            tab_inactive: overlay1,

            status_success: green,
            status_warning: yellow,
            status_failure: red,
            status_neutral: overlay1,

            trend_favorable: green,
            trend_unfavorable: red,

            severity_critical: red,
            severity_warning: peach,
            severity_info: overlay1,

            value_emphasis: text,
            text_dim: overlay1,
            skeleton: surface1,
            selection: teal,

            status_bar_bg: surface1,
            status_bar_fg: text,
            toast_info: teal,
            toast_success: green,
            toast_error: red,

            background: base,
        }
    }

    /// Resolves a theme name string to the corresponding built-in theme.
    ///
    /// Unknown names fall back to `dark()` so a typo in config never prevents
    /// startup. The fallback is logged to stderr (not a hard error).
    ///
    /// # Arguments
    ///
    /// * `name` — theme name from config, e.g. `"dark"` or `"catppuccin-mocha"`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "catppuccin-mocha" | "catppuccin_mocha" => Self::catppuccin_mocha(),
            "dark" => Self::dark(),
            other => {
                eprintln!("revdash: unknown theme '{}', falling back to 'dark'", other);
                Self::dark()
            }
        }
    }
}
