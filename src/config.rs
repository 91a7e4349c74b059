use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::provider::default_layout_path;

// ---------------------------------------------------------------------------
// Behavior
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct Behavior {
    /// Delta applied by `expand` / `contract`, in the layout's own unit.
    pub resize_step: f64,
    /// Equalize splits whenever the host reports a focus change.
    pub equalize_on_focus_change: bool,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            resize_step: 0.1,
            equalize_on_focus_change: false,
        }
    }
}

// ---------------------------------------------------------------------------
// LayoutSource
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutSource {
    pub path: PathBuf,
}

impl Default for LayoutSource {
    fn default() -> Self {
        Self {
            path: default_layout_path(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Config {
    pub behavior: Behavior,
    pub layout: LayoutSource,
}

pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("pane-balance").join("config.toml"))
        .unwrap_or_default()
}

impl Config {
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Missing files yield defaults; unparsable files are reported and also
    /// yield defaults.
    pub fn load_from(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return Self::default(),
        };

        let raw: RawConfig = match toml::from_str(&content) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("invalid config at {}: {}", path.display(), e);
                return Self::default();
            }
        };

        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Self {
        let mut config = Self::default();

        // Behavior
        if let Some(b) = raw.behavior {
            if let Some(v) = b.resize_step {
                if v.is_finite() && v > 0.0 {
                    config.behavior.resize_step = v;
                } else {
                    tracing::warn!("ignoring resize_step = {v}: must be a positive number");
                }
            }
            if let Some(v) = b.equalize_on_focus_change {
                config.behavior.equalize_on_focus_change = v;
            }
        }

        // Layout
        if let Some(l) = raw.layout {
            if let Some(p) = l.path {
                config.layout.path = p;
            }
        }

        config
    }
}

// ---------------------------------------------------------------------------
// Raw TOML structs (all-optional for merge)
// ---------------------------------------------------------------------------

#[derive(Deserialize, Default)]
struct RawConfig {
    behavior: Option<RawBehavior>,
    layout: Option<RawLayout>,
}

#[derive(Deserialize, Default)]
struct RawBehavior {
    resize_step: Option<f64>,
    equalize_on_focus_change: Option<bool>,
}

#[derive(Deserialize, Default)]
struct RawLayout {
    path: Option<PathBuf>,
}
