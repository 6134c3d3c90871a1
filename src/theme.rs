//! Color theme for the scene renderer
//!
//! Themes are TOML files with an optional `[metadata]` table and a `[colors]`
//! table of token → color. Tokens missing from a theme fall back to the
//! built-in palette, so a theme only needs to override what it changes.
//!
//! Tokens whose alpha is computed at render time (`grid-stroke`, `number`,
//! `fallback-group`) must be `#rrggbb` or `#rgb` hex colors.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading or parsing themes
#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("failed to read theme file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse theme TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A palette mapping color tokens to concrete values
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: Option<String>,
    pub description: Option<String>,
    pub colors: HashMap<String, String>,
}

#[derive(Deserialize)]
struct TomlTheme {
    metadata: Option<TomlMetadata>,
    #[serde(default)]
    colors: HashMap<String, String>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
    description: Option<String>,
}

/// Built-in dark palette
const DEFAULT_PALETTE: &str = r##"
[metadata]
name = "Night"

[colors]
background = "#0f0f1a"

# Selected cells
selection = "#00e5ff"
selection-fill = "rgba(0, 229, 255, 0.4)"

hover-fill = "rgba(255, 255, 255, 0.12)"

# Plain grid lines and cell numbers; alpha follows the grid opacity
grid-stroke = "#ffffff"
number = "#ffffff"
number-shadow = "rgba(0, 0, 0, 0.8)"

# Zone labels
label = "#ffffff"
label-shadow = "rgba(0, 0, 0, 0.9)"

# Used when an assignment points at an unknown group
fallback-group = "#888888"
"##;

impl Theme {
    /// Load a theme from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ThemeError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse a theme from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ThemeError> {
        let parsed: TomlTheme = toml::from_str(content)?;

        Ok(Theme {
            name: parsed.metadata.as_ref().and_then(|m| m.name.clone()),
            description: parsed.metadata.as_ref().and_then(|m| m.description.clone()),
            colors: parsed.colors,
        })
    }

    /// Look up a token in this theme only
    pub fn resolve(&self, token: &str) -> Option<&str> {
        self.colors.get(token).map(|s| s.as_str())
    }

    /// Look up a token, falling back to the built-in palette and then to
    /// white
    pub fn color(&self, token: &str) -> String {
        if let Some(color) = self.resolve(token) {
            return color.to_string();
        }
        if let Some(color) = Self::default().resolve(token) {
            return color.to_string();
        }
        "#ffffff".to_string()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_toml(DEFAULT_PALETTE).expect("Default palette should be valid TOML")
    }
}
