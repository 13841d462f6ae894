use bevy::prelude::*;
use serde::Deserialize;
use std::{fs, path::Path, path::PathBuf, time::Duration};

/// Default layer list; the `.local` file is optional per-machine overrides.
pub const DEFAULT_CONFIG_LAYERS: [&str; 2] = [
    "assets/config/sdf_maker.ron",
    "assets/config/sdf_maker.local.ron",
];

pub fn default_config_layers() -> Vec<PathBuf> {
    DEFAULT_CONFIG_LAYERS.iter().map(PathBuf::from).collect()
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
}
impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            title: "SDF Texture Maker".into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct WatchConfig {
    /// Start watching the source as soon as one is loaded.
    pub auto_update: bool,
    /// Change events closer than this to the last accepted one are dropped.
    pub debounce_secs: f32,
    /// Wait after an accepted change before reading the file (lets the writer finish).
    pub settle_secs: f32,
}
impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            auto_update: true,
            debounce_secs: 1.0,
            settle_secs: 0.5,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Appended to the source stem for the derived output name.
    pub suffix: String,
    /// When false, interactive saves over an existing file ask first.
    /// Automatic (watch-triggered) saves always overwrite.
    pub overwrite_existing: bool,
}
impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            suffix: "_SDF".into(),
            overwrite_existing: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PreviewConfig {
    /// Longest side of a preview panel image in pixels.
    pub thumbnail_size: u32,
    /// Show the isolated R / G panels next to the original and combined ones.
    pub show_channels: bool,
}
impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            thumbnail_size: 200,
            show_channels: false,
        }
    }
}

#[derive(Debug, Deserialize, Resource, Clone, PartialEq, Default)]
#[serde(default)]
pub struct SdfConfig {
    pub window: WindowConfig,
    pub watch: WatchConfig,
    pub output: OutputConfig,
    pub preview: PreviewConfig,
}

impl SdfConfig {
    /// Merge each readable layer over the previous ones field by field, then
    /// deserialize. Returns `(config, layers_used, errors)`; unreadable layers
    /// are skipped and reported, never fatal.
    pub fn load_layered<P, I>(paths: I) -> (Self, Vec<String>, Vec<String>)
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        use ron::value::Value;
        let mut merged: Option<Value> = None;
        let mut used = Vec::new();
        let mut errors = Vec::new();
        fn merge_value(base: &mut Value, overlay: Value) {
            match (base, overlay) {
                (Value::Map(bm), Value::Map(om)) => {
                    for (k, v) in om.into_iter() {
                        let mut incoming = Some(v);
                        for (ek, ev) in bm.iter_mut() {
                            if *ek == k {
                                if let Some(val) = incoming.take() {
                                    merge_value(ev, val);
                                }
                                break;
                            }
                        }
                        if let Some(val) = incoming {
                            bm.insert(k, val);
                        }
                    }
                }
                (b, o) => *b = o,
            }
        }
        for p in paths {
            let path_ref = p.as_ref();
            match fs::read_to_string(path_ref) {
                Ok(txt) => match ron::from_str::<Value>(&txt) {
                    Ok(val) => {
                        if let Some(cur) = &mut merged {
                            merge_value(cur, val);
                        } else {
                            merged = Some(val);
                        }
                        used.push(path_ref.as_os_str().to_string_lossy().to_string());
                    }
                    Err(e) => errors.push(format!("{}: parse error: {e}", path_ref.display())),
                },
                Err(e) => errors.push(format!("{}: read error: {e}", path_ref.display())),
            }
        }
        let Some(val) = merged else {
            return (SdfConfig::default(), used, errors);
        };
        match val.into_rust::<SdfConfig>() {
            Ok(cfg) => (cfg, used, errors),
            Err(e) => {
                errors.push(format!("failed to deserialize merged config; using defaults: {e}"));
                (SdfConfig::default(), used, errors)
            }
        }
    }

    /// Debounce window; unusable values fall back to the default.
    pub fn debounce(&self) -> Duration {
        watch_duration(self.watch.debounce_secs, WatchConfig::default().debounce_secs)
    }
    /// Settle delay; unusable values fall back to the default.
    pub fn settle(&self) -> Duration {
        watch_duration(self.watch.settle_secs, WatchConfig::default().settle_secs)
    }

    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            w.push("window dimensions must be > 0".into());
        }
        if !usable_watch_secs(self.watch.debounce_secs) {
            w.push(format!(
                "watch.debounce_secs {} unusable (max {MAX_WATCH_SECS}s) -> using default {}",
                self.watch.debounce_secs,
                WatchConfig::default().debounce_secs
            ));
        } else if self.watch.debounce_secs < 0.0 {
            w.push(format!(
                "watch.debounce_secs {} negative -> treated as 0 (every event regenerates)",
                self.watch.debounce_secs
            ));
        }
        if !usable_watch_secs(self.watch.settle_secs) {
            w.push(format!(
                "watch.settle_secs {} unusable (max {MAX_WATCH_SECS}s) -> using default {}",
                self.watch.settle_secs,
                WatchConfig::default().settle_secs
            ));
        } else if self.watch.settle_secs < 0.0 {
            w.push(format!(
                "watch.settle_secs {} negative -> treated as 0",
                self.watch.settle_secs
            ));
        } else if self.watch.settle_secs > 10.0 {
            w.push(format!(
                "watch.settle_secs {} very long; auto-update will feel unresponsive",
                self.watch.settle_secs
            ));
        }
        if self.output.suffix.is_empty() {
            w.push("output.suffix is empty; derived output would overwrite a .png source".into());
        }
        if self.preview.thumbnail_size == 0 {
            w.push("preview.thumbnail_size must be > 0".into());
        }
        w
    }
}

/// Longest debounce window or settle delay accepted from config.
pub const MAX_WATCH_SECS: f32 = 3600.0;

fn usable_watch_secs(secs: f32) -> bool {
    secs.is_finite() && secs <= MAX_WATCH_SECS
}

fn watch_duration(secs: f32, fallback: f32) -> Duration {
    let secs = if usable_watch_secs(secs) { secs.max(0.0) } else { fallback };
    Duration::try_from_secs_f32(secs).unwrap_or_default()
}
