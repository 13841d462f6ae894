pub mod config;

pub use config::{
    default_config_layers, OutputConfig, PreviewConfig, SdfConfig, WatchConfig, WindowConfig,
    DEFAULT_CONFIG_LAYERS, MAX_WATCH_SECS,
};
