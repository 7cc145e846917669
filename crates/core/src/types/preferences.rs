//! Roles and display preferences.

use serde::{Deserialize, Serialize};

/// Account role assigned at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Regular customer account.
    #[default]
    User,
    /// Back-office account.
    Admin,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}

/// Locally persisted light/dark preference.
///
/// Stored as the plain strings `"dark"` and `"light"`. Anything else read from
/// storage counts as light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
}

impl ThemePreference {
    /// The storage value for this preference.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Interpret a stored value. Only `"dark"` selects the dark theme.
    #[must_use]
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("dark") => Self::Dark,
            _ => Self::Light,
        }
    }

    /// The opposite preference.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl std::fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Theme choice stored server-side in the user's settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SettingsTheme {
    Light,
    Dark,
    /// Follow the operating system.
    #[default]
    System,
}

impl std::str::FromStr for SettingsTheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            _ => Err(format!("invalid theme: {s} (expected light, dark or system)")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!(UserRole::User.to_string(), "user");
        assert!("root".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_theme_from_stored() {
        assert_eq!(ThemePreference::from_stored(Some("dark")), ThemePreference::Dark);
        assert_eq!(ThemePreference::from_stored(Some("light")), ThemePreference::Light);
        assert_eq!(ThemePreference::from_stored(Some("DARK")), ThemePreference::Light);
        assert_eq!(ThemePreference::from_stored(None), ThemePreference::Light);
    }

    #[test]
    fn test_theme_toggle() {
        assert_eq!(ThemePreference::Light.toggled(), ThemePreference::Dark);
        assert_eq!(ThemePreference::Dark.toggled().as_str(), "light");
    }

    #[test]
    fn test_settings_theme_serde() {
        let json = serde_json::to_string(&SettingsTheme::System).unwrap();
        assert_eq!(json, "\"system\"");
        assert_eq!("dark".parse::<SettingsTheme>().unwrap(), SettingsTheme::Dark);
    }
}
