//! Visitor preferences persisted alongside the cart.
//!
//! Three keys are used:
//!
//! - `darkMode` holds the literal `"true"` or `"false"`
//! - `themeColors` holds a JSON object with `primary`, `secondary` and
//!   `accent` hex colors
//! - `cookiesAccepted` is set once the visitor answers the cookie banner
//!
//! All are read fail-soft: anything unexpected falls back to the default.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::notify::Notification;
use crate::store::{KeyValueStore, StoreError};

/// Store key for the dark mode flag.
pub const DARK_MODE_KEY: &str = "darkMode";
/// Store key for the theme palette.
pub const THEME_COLORS_KEY: &str = "themeColors";
/// Store key for the cookie banner answer.
pub const COOKIES_ACCEPTED_KEY: &str = "cookiesAccepted";

/// How far the `-dark` and `-light` variants sit from a base color.
pub const SHADE_PERCENT: u8 = 20;

static HEX_COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("Invalid regex"));

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("{field} is not a #rrggbb color: {value}")]
    InvalidColor { field: &'static str, value: String },
    #[error("unknown theme preset: {0}")]
    UnknownPreset(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to encode theme colors: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Site palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            primary: "#7038ff".to_string(),
            secondary: "#4f8dff".to_string(),
            accent: "#ff4b6e".to_string(),
        }
    }
}

impl ThemeColors {
    /// Check every color is `#` followed by six hex digits.
    ///
    /// # Errors
    ///
    /// Returns the first field that is not a valid color.
    pub fn validate(&self) -> Result<(), PreferencesError> {
        for (field, value) in [
            ("primary", &self.primary),
            ("secondary", &self.secondary),
            ("accent", &self.accent),
        ] {
            if !is_hex_color(value) {
                return Err(PreferencesError::InvalidColor {
                    field,
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }

    /// Colors of the preset called `name` (case-insensitive).
    #[must_use]
    pub fn preset(name: &str) -> Option<Self> {
        THEME_PRESETS
            .iter()
            .find(|preset| preset.name.eq_ignore_ascii_case(name))
            .map(ThemePreset::colors)
    }

    /// CSS custom properties for this palette: each base color with its
    /// `-dark` and `-light` shades, plus the primary gradient.
    #[must_use]
    pub fn css_variables(&self) -> Vec<(String, String)> {
        let mut vars = Vec::with_capacity(10);
        for (name, color) in [
            ("primary", &self.primary),
            ("secondary", &self.secondary),
            ("accent", &self.accent),
        ] {
            let dark = darken(color, SHADE_PERCENT).unwrap_or_else(|| color.clone());
            let light = lighten(color, SHADE_PERCENT).unwrap_or_else(|| color.clone());
            vars.push((format!("--{name}"), color.clone()));
            vars.push((format!("--{name}-dark"), dark));
            vars.push((format!("--{name}-light"), light));
        }
        vars.push((
            "--gradient-primary".to_string(),
            format!(
                "linear-gradient(135deg, {} 0%, {} 100%)",
                self.primary, self.secondary
            ),
        ));
        vars
    }
}

fn is_hex_color(value: &str) -> bool {
    HEX_COLOR_RE.is_match(value)
}

/// A named palette offered as a one-click theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemePreset {
    pub name: &'static str,
    pub primary: &'static str,
    pub secondary: &'static str,
    pub accent: &'static str,
}

impl ThemePreset {
    /// The preset as a palette.
    #[must_use]
    pub fn colors(&self) -> ThemeColors {
        ThemeColors {
            primary: self.primary.to_string(),
            secondary: self.secondary.to_string(),
            accent: self.accent.to_string(),
        }
    }
}

/// Quick themes, the first being the default palette.
pub const THEME_PRESETS: [ThemePreset; 4] = [
    ThemePreset {
        name: "default",
        primary: "#7038ff",
        secondary: "#4f8dff",
        accent: "#ff4b6e",
    },
    ThemePreset {
        name: "sunset",
        primary: "#ff4b6e",
        secondary: "#ff8b3d",
        accent: "#7038ff",
    },
    ThemePreset {
        name: "meadow",
        primary: "#2ecc71",
        secondary: "#3498db",
        accent: "#e74c3c",
    },
    ThemePreset {
        name: "royal",
        primary: "#9b59b6",
        secondary: "#3498db",
        accent: "#e67e22",
    },
];

/// Darken a `#rrggbb` color by `percent` of full scale per channel.
///
/// Returns `None` if `color` is not `#rrggbb`.
#[must_use]
pub fn darken(color: &str, percent: u8) -> Option<String> {
    shift(color, -i32::from(shade_amount(percent)))
}

/// Lighten a `#rrggbb` color by `percent` of full scale per channel.
///
/// Returns `None` if `color` is not `#rrggbb`.
#[must_use]
pub fn lighten(color: &str, percent: u8) -> Option<String> {
    shift(color, i32::from(shade_amount(percent)))
}

/// `round(2.55 * percent)`, capped at a full channel.
fn shade_amount(percent: u8) -> u8 {
    let amount = (u32::from(percent.min(100)) * 255 + 50) / 100;
    u8::try_from(amount).unwrap_or(u8::MAX)
}

fn shift(color: &str, amount: i32) -> Option<String> {
    if !is_hex_color(color) {
        return None;
    }
    let rgb = u32::from_str_radix(color.get(1..)?, 16).ok()?;

    let channel = |offset: u32| {
        let value = i32::try_from((rgb >> offset) & 0xff).unwrap_or(0);
        u8::try_from((value + amount).clamp(0, 255)).unwrap_or(u8::MAX)
    };

    Some(format!(
        "#{:02x}{:02x}{:02x}",
        channel(16),
        channel(8),
        channel(0)
    ))
}

/// Answer given on the cookie banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentChoice {
    /// Accept all cookies.
    Accept,
    /// Keep only the essential ones.
    Minimal,
}

impl ConsentChoice {
    /// Toast confirming the choice.
    #[must_use]
    pub fn confirmation(self) -> Notification {
        Notification::new(match self {
            Self::Accept => "Cookies preferences saved!",
            Self::Minimal => "Cookie preferences set to minimal!",
        })
    }
}

/// Loaded preference values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Preferences {
    pub dark_mode: bool,
    pub theme_colors: ThemeColors,
    /// The visitor answered the cookie banner.
    pub cookies_accepted: bool,
}

impl Preferences {
    /// Read preferences from `store`, falling back to defaults.
    pub fn load(store: &impl KeyValueStore) -> Self {
        let dark_mode = match store.get(DARK_MODE_KEY) {
            Ok(value) => value.as_deref() == Some("true"),
            Err(e) => {
                warn!(error = %e, "Failed to read dark mode preference");
                false
            }
        };

        let theme_colors = match store.get(THEME_COLORS_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<ThemeColors>(&raw)
                .ok()
                .filter(|colors| colors.validate().is_ok())
                .unwrap_or_else(|| {
                    warn!("Stored theme colors are invalid, using defaults");
                    ThemeColors::default()
                }),
            Ok(None) => ThemeColors::default(),
            Err(e) => {
                warn!(error = %e, "Failed to read theme colors");
                ThemeColors::default()
            }
        };

        let cookies_accepted = match store.get(COOKIES_ACCEPTED_KEY) {
            Ok(value) => value.is_some_and(|v| !v.is_empty()),
            Err(e) => {
                warn!(error = %e, "Failed to read cookie consent");
                false
            }
        };

        Self {
            dark_mode,
            theme_colors,
            cookies_accepted,
        }
    }

    /// Whether the cookie banner should still be shown.
    #[must_use]
    pub const fn needs_consent(&self) -> bool {
        !self.cookies_accepted
    }

    /// Persist the visitor's cookie banner answer and return the toast to
    /// show. Both answers dismiss the banner for good.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the write.
    pub fn record_consent(
        &mut self,
        store: &mut impl KeyValueStore,
        choice: ConsentChoice,
    ) -> Result<Notification, PreferencesError> {
        store.set(COOKIES_ACCEPTED_KEY, "true")?;
        self.cookies_accepted = true;
        debug!(?choice, "Cookie consent recorded");
        Ok(choice.confirmation())
    }

    /// Persist the dark mode flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the write.
    pub fn set_dark_mode(
        &mut self,
        store: &mut impl KeyValueStore,
        enabled: bool,
    ) -> Result<(), PreferencesError> {
        store.set(DARK_MODE_KEY, if enabled { "true" } else { "false" })?;
        self.dark_mode = enabled;
        debug!(enabled, "Dark mode updated");
        Ok(())
    }

    /// Flip and persist the dark mode flag, returning the new value.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the write.
    pub fn toggle_dark_mode(
        &mut self,
        store: &mut impl KeyValueStore,
    ) -> Result<bool, PreferencesError> {
        let enabled = !self.dark_mode;
        self.set_dark_mode(store, enabled)?;
        Ok(enabled)
    }

    /// Validate and persist a new palette.
    ///
    /// # Errors
    ///
    /// Returns an error if a color is malformed or the store rejects the
    /// write. Nothing is changed on error.
    pub fn set_theme_colors(
        &mut self,
        store: &mut impl KeyValueStore,
        colors: ThemeColors,
    ) -> Result<(), PreferencesError> {
        colors.validate()?;
        store.set(THEME_COLORS_KEY, &serde_json::to_string(&colors)?)?;
        debug!(?colors, "Theme colors updated");
        self.theme_colors = colors;
        Ok(())
    }

    /// Apply and persist the preset called `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if no preset has that name or the store rejects the
    /// write.
    pub fn apply_preset(
        &mut self,
        store: &mut impl KeyValueStore,
        name: &str,
    ) -> Result<(), PreferencesError> {
        let colors =
            ThemeColors::preset(name).ok_or_else(|| PreferencesError::UnknownPreset(name.to_string()))?;
        self.set_theme_colors(store, colors)
    }

    /// Restore and persist the default palette.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the write.
    pub fn reset_theme_colors(
        &mut self,
        store: &mut impl KeyValueStore,
    ) -> Result<(), PreferencesError> {
        self.set_theme_colors(store, ThemeColors::default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_defaults_on_empty_store() {
        let prefs = Preferences::load(&MemoryStore::new());
        assert!(!prefs.dark_mode);
        assert_eq!(prefs.theme_colors, ThemeColors::default());
    }

    #[test]
    fn test_dark_mode_only_exact_true() {
        let mut store = MemoryStore::new();
        store.set(DARK_MODE_KEY, "TRUE").unwrap();
        assert!(!Preferences::load(&store).dark_mode);

        store.set(DARK_MODE_KEY, "true").unwrap();
        assert!(Preferences::load(&store).dark_mode);
    }

    #[test]
    fn test_toggle_persists() {
        let mut store = MemoryStore::new();
        let mut prefs = Preferences::load(&store);

        assert!(prefs.toggle_dark_mode(&mut store).unwrap());
        assert_eq!(store.get(DARK_MODE_KEY).unwrap().as_deref(), Some("true"));
        assert!(!prefs.toggle_dark_mode(&mut store).unwrap());
        assert_eq!(store.get(DARK_MODE_KEY).unwrap().as_deref(), Some("false"));
    }

    #[test]
    fn test_theme_colors_roundtrip() {
        let mut store = MemoryStore::new();
        let mut prefs = Preferences::default();
        let colors = ThemeColors {
            primary: "#000000".to_string(),
            secondary: "#ABCDEF".to_string(),
            accent: "#123abc".to_string(),
        };

        prefs.set_theme_colors(&mut store, colors.clone()).unwrap();
        assert_eq!(Preferences::load(&store).theme_colors, colors);

        prefs.reset_theme_colors(&mut store).unwrap();
        assert_eq!(Preferences::load(&store).theme_colors, ThemeColors::default());
    }

    #[test]
    fn test_invalid_color_rejected_without_write() {
        let mut store = MemoryStore::new();
        let mut prefs = Preferences::default();
        let colors = ThemeColors {
            accent: "red".to_string(),
            ..ThemeColors::default()
        };

        let err = prefs.set_theme_colors(&mut store, colors).unwrap_err();
        assert!(matches!(
            err,
            PreferencesError::InvalidColor {
                field: "accent",
                ..
            }
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_corrupt_theme_colors_fall_back() {
        let mut store = MemoryStore::new();
        store.set(THEME_COLORS_KEY, r##"{"primary":"#fff"}"##).unwrap();
        assert_eq!(Preferences::load(&store).theme_colors, ThemeColors::default());

        store
            .set(
                THEME_COLORS_KEY,
                r##"{"primary":"#zzzzzz","secondary":"#4f8dff","accent":"#ff4b6e"}"##,
            )
            .unwrap();
        assert_eq!(Preferences::load(&store).theme_colors, ThemeColors::default());
    }

    #[test]
    fn test_shades_match_site_palette() {
        assert_eq!(darken("#7038ff", 20).unwrap(), "#3d05cc");
        assert_eq!(lighten("#7038ff", 20).unwrap(), "#a36bff");
        assert_eq!(darken("#101010", 20).unwrap(), "#000000");
        assert_eq!(lighten("#FFFFFF", 20).unwrap(), "#ffffff");
        assert_eq!(lighten("#000000", 10).unwrap(), "#1a1a1a");
        assert!(darken("purple", 20).is_none());
    }

    #[test]
    fn test_css_variables() {
        let vars = ThemeColors::default().css_variables();
        assert_eq!(vars.len(), 10);
        assert_eq!(vars[0], ("--primary".to_string(), "#7038ff".to_string()));
        assert_eq!(vars[1], ("--primary-dark".to_string(), "#3d05cc".to_string()));
        assert_eq!(vars[2], ("--primary-light".to_string(), "#a36bff".to_string()));
        assert_eq!(
            vars[9].1,
            "linear-gradient(135deg, #7038ff 0%, #4f8dff 100%)"
        );
    }

    #[test]
    fn test_presets() {
        assert_eq!(ThemeColors::preset("default"), Some(ThemeColors::default()));
        assert_eq!(ThemeColors::preset("MEADOW").unwrap().primary, "#2ecc71");
        assert!(ThemeColors::preset("neon").is_none());
        for preset in THEME_PRESETS {
            assert!(preset.colors().validate().is_ok(), "{}", preset.name);
        }
    }

    #[test]
    fn test_apply_preset_persists() {
        let mut store = MemoryStore::new();
        let mut prefs = Preferences::default();

        prefs.apply_preset(&mut store, "royal").unwrap();
        assert_eq!(Preferences::load(&store).theme_colors.accent, "#e67e22");

        let err = prefs.apply_preset(&mut store, "neon").unwrap_err();
        assert!(matches!(err, PreferencesError::UnknownPreset(name) if name == "neon"));
        assert_eq!(prefs.theme_colors.primary, "#9b59b6");
    }

    #[test]
    fn test_consent_recorded_once_for_either_choice() {
        for (choice, message) in [
            (ConsentChoice::Accept, "Cookies preferences saved!"),
            (ConsentChoice::Minimal, "Cookie preferences set to minimal!"),
        ] {
            let mut store = MemoryStore::new();
            let mut prefs = Preferences::load(&store);
            assert!(prefs.needs_consent());

            let toast = prefs.record_consent(&mut store, choice).unwrap();
            assert_eq!(toast.message, message);
            assert_eq!(
                store.get(COOKIES_ACCEPTED_KEY).unwrap().as_deref(),
                Some("true")
            );
            assert!(!Preferences::load(&store).needs_consent());
        }
    }

    #[test]
    fn test_empty_consent_value_still_pending() {
        let mut store = MemoryStore::new();
        store.set(COOKIES_ACCEPTED_KEY, "").unwrap();
        assert!(Preferences::load(&store).needs_consent());
    }
}
