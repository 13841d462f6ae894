pub mod pipeline;
pub mod state;
pub mod ui;

use bevy::prelude::*;

pub use pipeline::SdfCorePlugin;
pub use state::{LaunchOptions, SdfRequest, SdfWorkspace, StatusLevel, StatusLine};
pub use ui::{PreviewSettings, SdfUiPlugin};

/// Full desktop tool: pipeline + preview window. Needs `DefaultPlugins`.
pub struct SdfMakerPlugin;

impl Plugin for SdfMakerPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((SdfCorePlugin, SdfUiPlugin));
    }
}
