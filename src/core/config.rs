//=========================================================================
// Settings
//=========================================================================
//
// User-configurable settings persisted as TOML.
//
// Every field has a default so partial files load cleanly. Some values are
// normalized by the engine and written back (negotiated display size,
// relaxed pixel format, detected controller axes, window position).
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use crate::core::error::ConfigError;

//=== Settings ============================================================

/// Complete settings tree.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub display: DisplaySettings,
    #[serde(default)]
    pub renderer: RendererSettings,
    #[serde(default)]
    pub gui: GuiSettings,
    #[serde(default)]
    pub audio: AudioSettings,
    #[serde(default)]
    pub controls: ControlSettings,
    #[serde(default)]
    pub debug: DebugSettings,
}

/// Window and graphics context settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Requested width in pixels (0 selects a default).
    pub screen_width: u32,
    /// Requested height in pixels (0 selects a default).
    pub screen_height: u32,
    pub fullscreen: bool,
    pub window_x: i32,
    pub window_y: i32,
    pub vsync: bool,
    /// Stencil-based reflections.
    pub reflection: bool,
    /// Multisample count (0 disables multisampling).
    pub multisample: u32,
    pub mipmap: bool,
    pub anisotropy: u32,
    /// Texture quality level (1 = full resolution).
    pub textures: u32,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            screen_width: 0,
            screen_height: 0,
            fullscreen: false,
            window_x: 0,
            window_y: 0,
            vsync: true,
            reflection: true,
            multisample: 0,
            mipmap: true,
            anisotropy: 0,
            textures: 1,
        }
    }
}

/// 3D renderer resource settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererSettings {
    pub background: bool,
    pub shadow: bool,
    pub view_fov: u32,
    /// Ball skin path relative to the data folder.
    pub ball_path: String,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            background: true,
            shadow: true,
            view_fov: 50,
            ball_path: "ball/basic-ball/basic-ball".to_string(),
        }
    }
}

/// GUI resource settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuiSettings {
    pub theme: String,
}

impl Default for GuiSettings {
    fn default() -> Self {
        Self {
            theme: "classic".to_string(),
        }
    }
}

/// Audio device settings. Volumes range 0-10.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    pub buffer: u32,
    pub sound_volume: u8,
    pub music_volume: u8,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            buffer: 2048,
            sound_volume: 10,
            music_volume: 6,
        }
    }
}

/// Mouse and controller settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlSettings {
    pub mouse_invert: bool,
    pub controller: ControllerSettings,
}

/// Controller selection and axis/button bindings.
///
/// Axes left unset are auto-detected when the controller is acquired.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerSettings {
    pub enabled: bool,
    pub index: usize,
    pub axis_x: Option<usize>,
    pub axis_y: Option<usize>,
    pub axis_z: Option<usize>,
    pub invert_x: bool,
    pub invert_y: bool,
    pub invert_z: bool,
    pub button_exit: Option<usize>,
}

/// Debug and diagnostics settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugSettings {
    /// Enables cheat hotkeys (wireframe toggle).
    pub cheat: bool,
    /// Shows the FPS overlay.
    pub fps: bool,
    /// Logs frame statistics once per measuring period.
    pub stats: bool,
}

//=== Persistence =========================================================

impl Settings {
    /// Loads settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads settings, falling back to defaults if the file is missing or
    /// unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            info!("No settings file at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }

    /// Writes settings as TOML, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let text = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_fills_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [display]
            screen_width = 1024
            screen_height = 768

            [controls.controller]
            enabled = true
            axis_x = 3
            "#,
        )
        .unwrap();

        assert_eq!(settings.display.screen_width, 1024);
        assert_eq!(settings.display.screen_height, 768);
        assert!(settings.display.vsync);
        assert!(settings.controls.controller.enabled);
        assert_eq!(settings.controls.controller.axis_x, Some(3));
        assert_eq!(settings.controls.controller.axis_y, None);
        assert_eq!(settings.audio, AudioSettings::default());
    }

    #[test]
    fn save_then_load_preserves_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.toml");

        let mut settings = Settings::default();
        settings.debug.fps = true;
        settings.gui.theme = "neon".to_string();
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn load_or_default_tolerates_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "display = [[[").unwrap();

        assert!(matches!(Settings::load(&path), Err(ConfigError::Parse { .. })));
        assert_eq!(Settings::load_or_default(&path), Settings::default());
    }

    #[test]
    fn load_or_default_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_or_default(&dir.path().join("missing.toml"));
        assert_eq!(settings, Settings::default());
    }
}
