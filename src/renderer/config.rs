//! Configuration for scene rendering

use crate::theme::Theme;

/// Configuration options for SVG frame output
#[derive(Debug, Clone)]
pub struct SceneConfig {
    /// Whether to include the XML declaration
    pub standalone: bool,

    /// Whether to format output with indentation
    pub pretty_print: bool,

    /// Prefix for CSS class names (e.g., "iso-" for "iso-cell")
    pub class_prefix: Option<String>,

    /// Palette for background, selection, hover and label colors
    pub theme: Theme,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            standalone: true,
            pretty_print: true,
            class_prefix: Some("iso-".to_string()),
            theme: Theme::default(),
        }
    }
}

impl SceneConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether output is standalone
    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }

    /// Set whether to pretty-print output
    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    /// Set the CSS class prefix
    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = Some(prefix.into());
        self
    }

    /// Remove the CSS class prefix
    pub fn without_class_prefix(mut self) -> Self {
        self.class_prefix = None;
        self
    }

    /// Set the color theme
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SceneConfig::default();
        assert!(config.standalone);
        assert!(config.pretty_print);
        assert_eq!(config.class_prefix, Some("iso-".to_string()));
        assert_eq!(config.theme.resolve("background"), Some("#0f0f1a"));
    }

    #[test]
    fn test_builder_pattern() {
        let config = SceneConfig::new()
            .with_standalone(false)
            .with_pretty_print(false)
            .with_class_prefix("map-");

        assert!(!config.standalone);
        assert!(!config.pretty_print);
        assert_eq!(config.class_prefix, Some("map-".to_string()));
        assert_eq!(config.without_class_prefix().class_prefix, None);
    }
}
