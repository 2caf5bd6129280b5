// ============================================================================
// SETTINGS — key=value config file in the platform config directory
// ============================================================================

use std::path::PathBuf;

use crate::canvas::{Color, DEFAULT_CANVAS_SIZE, MAX_CANVAS_DIM};
use crate::components::history::DEFAULT_HISTORY_DEPTH;
use crate::render::{CHECKER_DARK, CHECKER_LIGHT};

/// Editor defaults persisted between sessions.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    /// Extent of freshly created canvases.
    pub default_canvas_width: u32,
    pub default_canvas_height: u32,
    /// Maximum number of undo steps
    pub max_undo_steps: usize,
    /// Checkerboard colors shown behind transparent cells.
    pub checker_light: Color,
    pub checker_dark: Color,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_canvas_width: DEFAULT_CANVAS_SIZE,
            default_canvas_height: DEFAULT_CANVAS_SIZE,
            max_undo_steps: DEFAULT_HISTORY_DEPTH,
            checker_light: CHECKER_LIGHT,
            checker_dark: CHECKER_DARK,
        }
    }
}

impl Settings {
    /// Path to the settings file.
    /// On Linux:   ~/.config/pixelpad/pixelpad_settings.cfg  (XDG_CONFIG_HOME respected)
    /// On Windows: %APPDATA%\pixelpad\pixelpad_settings.cfg
    /// On macOS:   ~/Library/Application Support/pixelpad/pixelpad_settings.cfg
    pub(crate) fn settings_path() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        let base = std::env::var("APPDATA").ok().map(PathBuf::from);
        #[cfg(target_os = "macos")]
        let base = std::env::var("HOME")
            .ok()
            .map(|h| PathBuf::from(h).join("Library").join("Application Support"));
        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        let base = std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| std::env::var("HOME").ok().map(|h| PathBuf::from(h).join(".config")));

        let dir = base?.join("pixelpad");
        let _ = std::fs::create_dir_all(&dir);
        Some(dir.join("pixelpad_settings.cfg"))
    }

    /// Serialize a Color as "r,g,b,a"
    fn color_to_str(c: Color) -> String {
        format!("{},{},{},{}", c.r, c.g, c.b, c.a)
    }

    /// Parse a Color from "r,g,b,a"
    fn str_to_color(s: &str) -> Option<Color> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 4 {
            return None;
        }
        let r = parts[0].trim().parse::<u8>().ok()?;
        let g = parts[1].trim().parse::<u8>().ok()?;
        let b = parts[2].trim().parse::<u8>().ok()?;
        let a = parts[3].trim().parse::<u8>().ok()?;
        Some(Color::rgba(r, g, b, a))
    }

    /// Save settings to disk. I/O failures are ignored — settings are
    /// convenience state, never worth interrupting the session over.
    pub fn save(&self) {
        let Some(path) = Self::settings_path() else { return };
        let content = self.to_config_string();
        let _ = std::fs::write(path, content);
    }

    fn to_config_string(&self) -> String {
        format!(
            "default_canvas_width={}\n\
             default_canvas_height={}\n\
             max_undo_steps={}\n\
             checker_light={}\n\
             checker_dark={}\n",
            self.default_canvas_width,
            self.default_canvas_height,
            self.max_undo_steps,
            Self::color_to_str(self.checker_light),
            Self::color_to_str(self.checker_dark),
        )
    }

    /// Load settings from disk (returns defaults if the file is missing or
    /// corrupt; unknown keys are ignored).
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else { return Self::default() };
        let Ok(content) = std::fs::read_to_string(&path) else { return Self::default() };
        Self::from_config_str(&content)
    }

    fn from_config_str(content: &str) -> Self {
        let mut s = Self::default();
        for line in content.lines() {
            let Some((key, val)) = line.split_once('=') else { continue };
            let key = key.trim();
            let val = val.trim();
            match key {
                "default_canvas_width" => {
                    if let Ok(v) = val.parse::<u32>()
                        && v > 0
                        && v <= MAX_CANVAS_DIM
                    {
                        s.default_canvas_width = v;
                    }
                }
                "default_canvas_height" => {
                    if let Ok(v) = val.parse::<u32>()
                        && v > 0
                        && v <= MAX_CANVAS_DIM
                    {
                        s.default_canvas_height = v;
                    }
                }
                "max_undo_steps" => {
                    if let Ok(v) = val.parse::<usize>()
                        && v > 0
                    {
                        s.max_undo_steps = v;
                    }
                }
                "checker_light" => {
                    if let Some(c) = Self::str_to_color(val) {
                        s.checker_light = c;
                    }
                }
                "checker_dark" => {
                    if let Some(c) = Self::str_to_color(val) {
                        s.checker_dark = c;
                    }
                }
                _ => {}
            }
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_string_round_trips() {
        let mut s = Settings::default();
        s.default_canvas_width = 32;
        s.default_canvas_height = 24;
        s.max_undo_steps = 99;
        s.checker_light = Color::rgb(1, 2, 3);
        let parsed = Settings::from_config_str(&s.to_config_string());
        assert_eq!(parsed, s);
    }

    #[test]
    fn garbage_lines_fall_back_to_defaults() {
        let parsed = Settings::from_config_str("default_canvas_width=zero\nnot a line\nmystery_key=5\n");
        assert_eq!(parsed, Settings::default());
    }

    #[test]
    fn out_of_range_dimension_is_ignored() {
        let parsed = Settings::from_config_str("default_canvas_width=0\ndefault_canvas_height=999999\n");
        assert_eq!(parsed.default_canvas_width, DEFAULT_CANVAS_SIZE);
        assert_eq!(parsed.default_canvas_height, DEFAULT_CANVAS_SIZE);
    }
}
