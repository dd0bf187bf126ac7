use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use snafu::Snafu;

/// Stored user choice, distinct from the resolved light/dark flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    System,
    Light,
    Dark,
}

impl ThemePreference {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Parses a stored value; anything unrecognized follows the system.
    pub fn parse_lossy(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }

    pub fn resolve(self, system: Appearance) -> Appearance {
        match self {
            Self::System => system,
            Self::Light => Appearance::Light,
            Self::Dark => Appearance::Dark,
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(display("unknown theme preference '{raw}'"))]
pub struct UnknownThemePreference {
    raw: String,
}

impl UnknownThemePreference {
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl FromStr for ThemePreference {
    type Err = UnknownThemePreference;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let value = raw.trim();
        if value.eq_ignore_ascii_case("system") {
            Ok(Self::System)
        } else if value.eq_ignore_ascii_case("light") {
            Ok(Self::Light)
        } else if value.eq_ignore_ascii_case("dark") {
            Ok(Self::Dark)
        } else {
            UnknownThemePreferenceSnafu { raw }.fail()
        }
    }
}

/// Appearance reported by the operating system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Appearance {
    #[default]
    Light,
    Dark,
}

impl Appearance {
    pub fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_values_parse_case_insensitively() {
        assert_eq!("Dark".parse::<ThemePreference>(), Ok(ThemePreference::Dark));
        assert_eq!(ThemePreference::parse_lossy(" light "), ThemePreference::Light);
        assert_eq!(ThemePreference::parse_lossy("sepia"), ThemePreference::System);
    }

    #[test]
    fn unknown_values_report_the_raw_input() {
        let error = "sepia".parse::<ThemePreference>().unwrap_err();
        assert_eq!(error.raw(), "sepia");
        assert_eq!(error.to_string(), "unknown theme preference 'sepia'");
    }

    #[test]
    fn explicit_preferences_ignore_system_appearance() {
        assert_eq!(ThemePreference::Dark.resolve(Appearance::Light), Appearance::Dark);
        assert_eq!(ThemePreference::System.resolve(Appearance::Dark), Appearance::Dark);
    }
}
