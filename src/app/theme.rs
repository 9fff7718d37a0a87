use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use super::color::Rgb;
use super::error::AppError;

/// The three user-configurable display colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default = "default_text_color")]
    pub text_color: Rgb,

    #[serde(default = "default_background_color")]
    pub background_color: Rgb,

    #[serde(default = "default_preview_color")]
    pub preview_color: Rgb,
}

fn default_text_color() -> Rgb {
    Rgb::new(0xcd, 0xd6, 0xf4)
}

fn default_background_color() -> Rgb {
    Rgb::new(0x1e, 0x1e, 0x2e)
}

fn default_preview_color() -> Rgb {
    Rgb::new(0xef, 0xf1, 0xf5)
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            text_color: default_text_color(),
            background_color: default_background_color(),
            preview_color: default_preview_color(),
        }
    }
}

impl Theme {
    /// Load the theme from disk, or create default if not exists
    pub fn load() -> Self {
        let config_path = Self::get_config_path();

        match fs::read_to_string(&config_path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(theme) => theme,
                Err(e) => {
                    log::warn!("Failed to parse theme file: {}. Using defaults.", e);
                    Self::default()
                }
            },
            Err(_) => {
                // File doesn't exist, use defaults
                let default = Self::default();
                // Try to save defaults for next time
                let _ = default.save();
                default
            }
        }
    }

    /// Save the theme to disk
    pub fn save(&self) -> Result<(), AppError> {
        let config_path = Self::get_config_path();

        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::Theme(format!("could not create config dir: {}", e)))?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Theme(e.to_string()))?;
        fs::write(&config_path, json).map_err(|e| AppError::Theme(e.to_string()))?;

        Ok(())
    }

    /// Get config file path (cross-platform)
    pub fn get_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("markpad");
        path.push("theme.json");
        path
    }
}
