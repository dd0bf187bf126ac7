use gpui::{App, Rgba, Window, WindowAppearance, rgb};
use gpui_component::{Theme, ThemeMode};
use parley_core::{Appearance, Color, ThemeContext};

pub fn appearance_from_window(appearance: WindowAppearance) -> Appearance {
    match appearance {
        WindowAppearance::Dark | WindowAppearance::VibrantDark => Appearance::Dark,
        WindowAppearance::Light | WindowAppearance::VibrantLight => Appearance::Light,
    }
}

pub fn color(color: Color) -> Rgba {
    rgb(color.hex())
}

/// Keeps gpui-component widgets (inputs, buttons) on the same light/dark mode as the palette.
pub fn sync_component_theme(context: &ThemeContext, window: Option<&mut Window>, cx: &mut App) {
    let mode = if context.is_dark_mode {
        ThemeMode::Dark
    } else {
        ThemeMode::Light
    };
    Theme::change(mode, window, cx);
}

#[cfg(test)]
mod tests {
    use parley_core::Palette;

    use super::*;

    #[test]
    fn vibrant_appearances_collapse_to_light_or_dark() {
        assert_eq!(appearance_from_window(WindowAppearance::VibrantDark), Appearance::Dark);
        assert_eq!(appearance_from_window(WindowAppearance::VibrantLight), Appearance::Light);
    }

    #[test]
    fn chrome_colors_follow_the_active_palette() {
        assert_eq!(color(Palette::LIGHT.border), rgb(0xE5E5E5));
        assert_eq!(color(Palette::DARK.border), rgb(0x2C2C2C));
        assert_ne!(
            color(Palette::for_dark_mode(false).background),
            color(Palette::for_dark_mode(true).background)
        );
    }
}
