use std::fmt;

/// 24-bit sRGB color stored as `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

impl Color {
    pub const fn rgb(hex: u32) -> Self {
        Self(hex & 0x00FF_FFFF)
    }

    pub const fn hex(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "#{:06X}", self.0)
    }
}

/// Semantic color roles. Views reference roles only, never literal colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorRole {
    Primary,
    Background,
    Surface,
    Text,
    TextSecondary,
    Border,
    Danger,
    Success,
    MessageBubble,
    MessageText,
}

impl ColorRole {
    pub const ALL: [ColorRole; 10] = [
        ColorRole::Primary,
        ColorRole::Background,
        ColorRole::Surface,
        ColorRole::Text,
        ColorRole::TextSecondary,
        ColorRole::Border,
        ColorRole::Danger,
        ColorRole::Success,
        ColorRole::MessageBubble,
        ColorRole::MessageText,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub primary: Color,
    pub background: Color,
    pub surface: Color,
    pub text: Color,
    pub text_secondary: Color,
    pub border: Color,
    pub danger: Color,
    pub success: Color,
    pub message_bubble: Color,
    pub message_text: Color,
}

impl Palette {
    pub const LIGHT: Palette = Palette {
        primary: Color::rgb(0x128C7E),
        background: Color::rgb(0xF0F2F5),
        surface: Color::rgb(0xFFFFFF),
        text: Color::rgb(0x000000),
        text_secondary: Color::rgb(0x8E8E93),
        border: Color::rgb(0xE5E5E5),
        danger: Color::rgb(0xFF3B30),
        success: Color::rgb(0x34C759),
        message_bubble: Color::rgb(0xE7FFDB),
        message_text: Color::rgb(0x000000),
    };

    pub const DARK: Palette = Palette {
        primary: Color::rgb(0x128C7E),
        background: Color::rgb(0x121212),
        surface: Color::rgb(0x1E1E1E),
        text: Color::rgb(0xFFFFFF),
        text_secondary: Color::rgb(0x8E8E93),
        border: Color::rgb(0x2C2C2C),
        danger: Color::rgb(0xFF453A),
        success: Color::rgb(0x32D74B),
        message_bubble: Color::rgb(0x056162),
        message_text: Color::rgb(0xFFFFFF),
    };

    pub fn for_dark_mode(is_dark_mode: bool) -> &'static Palette {
        if is_dark_mode { &Self::DARK } else { &Self::LIGHT }
    }

    pub fn color(&self, role: ColorRole) -> Color {
        match role {
            ColorRole::Primary => self.primary,
            ColorRole::Background => self.background,
            ColorRole::Surface => self.surface,
            ColorRole::Text => self.text,
            ColorRole::TextSecondary => self.text_secondary,
            ColorRole::Border => self.border,
            ColorRole::Danger => self.danger,
            ColorRole::Success => self.success,
            ColorRole::MessageBubble => self.message_bubble,
            ColorRole::MessageText => self.message_text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_render_as_hex() {
        assert_eq!(Palette::LIGHT.primary.to_string(), "#128C7E");
        assert_eq!(Color::rgb(0xFF05_0607).to_string(), "#050607");
    }

    #[test]
    fn palettes_differ_on_surfaces_but_share_brand() {
        assert_eq!(
            Palette::LIGHT.color(ColorRole::Primary),
            Palette::DARK.color(ColorRole::Primary)
        );
        assert_ne!(
            Palette::LIGHT.color(ColorRole::Background),
            Palette::DARK.color(ColorRole::Background)
        );
        assert_eq!(Palette::for_dark_mode(true), &Palette::DARK);
    }

    #[test]
    fn border_role_switches_with_the_mode() {
        let light = Palette::for_dark_mode(false).color(ColorRole::Border);
        let dark = Palette::for_dark_mode(true).color(ColorRole::Border);
        assert_eq!(light, Color::rgb(0xE5E5E5));
        assert_eq!(dark, Color::rgb(0x2C2C2C));
        assert_ne!(light, dark);
    }
}
