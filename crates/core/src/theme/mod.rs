//! Application theme: stored preference, resolved appearance and the color palette.

mod palette;
mod preference;
mod service;

use std::sync::Arc;

pub use palette::{Color, ColorRole, Palette};
pub use preference::{Appearance, ThemePreference, UnknownThemePreference};
pub use service::{THEME_MODE_KEY, ThemeContext, ThemeService};

/// Shared handle injected into every view.
pub type ThemeHandle = Arc<ThemeService>;
