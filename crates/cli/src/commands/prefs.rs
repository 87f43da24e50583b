//! Preference commands.

use jblinx_storefront::StorefrontConfig;
use jblinx_storefront::preferences::{ConsentChoice, Preferences, THEME_PRESETS, ThemeColors};
use tracing::info;

use super::{emit, open_store};

/// Colors to change; unset fields keep their current value.
#[derive(Debug, Default)]
pub struct ThemeUpdate {
    pub primary: Option<String>,
    pub secondary: Option<String>,
    pub accent: Option<String>,
}

impl ThemeUpdate {
    fn apply(self, current: &ThemeColors) -> ThemeColors {
        ThemeColors {
            primary: self.primary.unwrap_or_else(|| current.primary.clone()),
            secondary: self.secondary.unwrap_or_else(|| current.secondary.clone()),
            accent: self.accent.unwrap_or_else(|| current.accent.clone()),
        }
    }
}

/// How to change the palette.
#[derive(Debug)]
pub enum ThemeChange {
    Colors(ThemeUpdate),
    Preset(String),
    Reset,
}

fn describe(prefs: &Preferences) -> Vec<String> {
    vec![
        format!("Dark mode: {}", if prefs.dark_mode { "on" } else { "off" }),
        format!("Primary:   {}", prefs.theme_colors.primary),
        format!("Secondary: {}", prefs.theme_colors.secondary),
        format!("Accent:    {}", prefs.theme_colors.accent),
        format!(
            "Cookies:   {}",
            if prefs.needs_consent() { "not answered" } else { "answered" }
        ),
    ]
}

/// Print current preferences.
pub fn show(config: &StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(config)?;
    emit(describe(&Preferences::load(&store)))?;
    Ok(())
}

/// Set dark mode, or toggle it when `enabled` is `None`.
pub fn dark_mode(
    config: &StorefrontConfig,
    enabled: Option<bool>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store(config)?;
    let mut prefs = Preferences::load(&store);

    let enabled = match enabled {
        Some(enabled) => {
            prefs.set_dark_mode(&mut store, enabled)?;
            enabled
        }
        None => prefs.toggle_dark_mode(&mut store)?,
    };

    info!(enabled, "Dark mode updated");
    emit(describe(&prefs))?;
    Ok(())
}

/// Change palette colors, apply a preset, or restore the defaults.
pub fn theme(config: &StorefrontConfig, change: ThemeChange) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store(config)?;
    let mut prefs = Preferences::load(&store);

    match change {
        ThemeChange::Colors(update) => {
            let colors = update.apply(&prefs.theme_colors);
            prefs.set_theme_colors(&mut store, colors)?;
        }
        ThemeChange::Preset(name) => prefs.apply_preset(&mut store, &name)?,
        ThemeChange::Reset => prefs.reset_theme_colors(&mut store)?,
    }

    emit(describe(&prefs))?;
    Ok(())
}

fn preset_lines() -> Vec<String> {
    THEME_PRESETS
        .iter()
        .map(|p| format!("{:<10} {} {} {}", p.name, p.primary, p.secondary, p.accent))
        .collect()
}

/// List the quick theme presets.
pub fn presets() -> Result<(), Box<dyn std::error::Error>> {
    emit(preset_lines())?;
    Ok(())
}

fn css_lines(colors: &ThemeColors) -> Vec<String> {
    colors
        .css_variables()
        .into_iter()
        .map(|(name, value)| format!("{name}: {value};"))
        .collect()
}

/// Print the CSS custom properties for the current palette.
pub fn css(config: &StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(config)?;
    emit(css_lines(&Preferences::load(&store).theme_colors))?;
    Ok(())
}

/// Answer the cookie banner.
pub fn cookies(config: &StorefrontConfig, choice: ConsentChoice) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store(config)?;
    let mut prefs = Preferences::load(&store);

    let toast = prefs.record_consent(&mut store, choice)?;
    info!(?choice, "Cookie consent recorded");
    emit([toast.message])?;
    Ok(())
}
