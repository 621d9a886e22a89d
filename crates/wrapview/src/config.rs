//! TOML configuration for wrap-lists and thumbnail items.
//!
//! Every field has a default, so a config file only needs the keys it
//! changes:
//!
//! ```toml
//! mode = "column-major"
//! row_spacing = 12
//! unit_scrolling = true
//!
//! [item]
//! width = 160
//! shadow = true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use wrapview_core::logging::targets::CONFIG;

use crate::error::{WrapViewError, WrapViewResult};
use crate::view::{LayoutMode, Spacing};

/// Settings of one wrap-list view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WrapListConfig {
    pub mode: LayoutMode,
    pub row_spacing: u32,
    pub col_spacing: u32,
    /// Snap scrolling to whole blocks.
    pub unit_scrolling: bool,
    pub item: ItemConfig,
}

impl Default for WrapListConfig {
    fn default() -> Self {
        Self {
            mode: LayoutMode::RowMajor,
            row_spacing: 6,
            col_spacing: 6,
            unit_scrolling: false,
            item: ItemConfig::default(),
        }
    }
}

/// Cell geometry of thumbnail items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemConfig {
    pub width: u32,
    pub height: u32,
    /// Frame thickness around the image; zero disables the frame.
    pub border: u32,
    pub shadow: bool,
    pub caption_height: u32,
    pub caption_spacing: u32,
    pub glyph_width: u32,
}

impl Default for ItemConfig {
    fn default() -> Self {
        Self {
            width: 116,
            height: 136,
            border: 2,
            shadow: false,
            caption_height: 14,
            caption_spacing: 4,
            glyph_width: 7,
        }
    }
}

impl WrapListConfig {
    /// Spacing as the layout consumes it.
    pub fn spacing(&self) -> Spacing {
        Spacing::new(self.row_spacing, self.col_spacing)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> WrapViewResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> WrapViewResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| WrapViewError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(
            target: CONFIG,
            path = %path.display(),
            mode = ?config.mode,
            "loaded wrap-list config"
        );
        Ok(config)
    }

    pub fn to_toml_string(&self) -> WrapViewResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject item sizes that cannot hold anything.
    pub fn validate(&self) -> WrapViewResult<()> {
        if self.item.width == 0 || self.item.height == 0 {
            return Err(WrapViewError::InvalidItemSize {
                width: self.item.width,
                height: self.item.height,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_document_is_default() {
        let config = WrapListConfig::from_toml_str("").unwrap();
        assert_eq!(config, WrapListConfig::default());
    }

    #[test]
    fn test_partial_document() {
        let config = WrapListConfig::from_toml_str(
            r#"
            mode = "column-major"
            row_spacing = 12
            unit_scrolling = true

            [item]
            width = 160
            shadow = true
            "#,
        )
        .unwrap();

        assert_eq!(config.mode, LayoutMode::ColumnMajor);
        assert_eq!(config.spacing(), Spacing::new(12, 6));
        assert!(config.unit_scrolling);
        assert_eq!(config.item.width, 160);
        assert_eq!(config.item.height, ItemConfig::default().height);
        assert!(config.item.shadow);
    }

    #[test]
    fn test_manual_mode_name() {
        let config = WrapListConfig::from_toml_str("mode = \"manual\"").unwrap();
        assert_eq!(config.mode, LayoutMode::Manual);
    }

    #[test]
    fn test_rejects_unknown_mode() {
        let err = WrapListConfig::from_toml_str("mode = \"diagonal\"").unwrap_err();
        assert!(matches!(err, WrapViewError::ConfigParse(_)));
    }

    #[test]
    fn test_rejects_zero_item() {
        let err = WrapListConfig::from_toml_str("[item]\nheight = 0").unwrap_err();
        assert!(matches!(
            err,
            WrapViewError::InvalidItemSize {
                width: 116,
                height: 0
            }
        ));
    }

    #[test]
    fn test_toml_string_reloads() {
        let config = WrapListConfig {
            mode: LayoutMode::Manual,
            col_spacing: 0,
            ..Default::default()
        };
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("mode = \"manual\""));
        assert_eq!(WrapListConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "col_spacing = 20").unwrap();
        writeln!(file, "[item]").unwrap();
        writeln!(file, "border = 0").unwrap();

        let config = WrapListConfig::load(file.path()).unwrap();
        assert_eq!(config.col_spacing, 20);
        assert_eq!(config.item.border, 0);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = WrapListConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, WrapViewError::ConfigRead { .. }));
    }
}
