pub mod app;
pub mod core;
pub mod watch;

// Curated re-exports
pub use crate::app::{SdfCorePlugin, SdfMakerPlugin, SdfUiPlugin};
pub use crate::core::config::SdfConfig;
pub use crate::core::{generate, split_channels, GradientImage, SdfError, SdfResult, SdfSession};
pub use crate::watch::WatchController;
