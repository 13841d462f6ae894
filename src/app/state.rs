use std::path::PathBuf;

use bevy::prelude::*;

use crate::core::session::SdfSession;

/// Everything the tool is currently working on. Only main-thread systems
/// mutate it; the watch notifier never sees it.
#[derive(Resource, Debug, Default)]
pub struct SdfWorkspace {
    pub session: SdfSession,
    pub output_path: Option<PathBuf>,
    /// Set once the user chose an output explicitly; loading a new source then
    /// stops re-deriving `<stem>_SDF.png`.
    pub output_pinned: bool,
    /// The auto-update toggle. Forced back to false when watching cannot start.
    pub auto_update: bool,
    /// Interactive save waiting for a yes/no on overwriting this file.
    pub awaiting_overwrite: Option<PathBuf>,
}

/// Requests from the UI (or the launcher) into the pipeline.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub enum SdfRequest {
    /// Load a gradient image, generate, auto-save, and start watching if enabled.
    Load(PathBuf),
    /// Re-read the current source and regenerate.
    Generate,
    /// Save to the current output path, asking first if overwriting is not allowed.
    Save,
    /// Make `path` the output path and save there. There is no file dialog, so
    /// the window never sends this; it is for embedders and scripted runs. The
    /// desktop app pins its output with `--output` instead.
    SaveAs(PathBuf),
    /// Answer to a pending overwrite question.
    ConfirmOverwrite(bool),
    SetAutoUpdate(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusLevel {
    #[default]
    Info,
    Warning,
    Error,
}

/// Last user-facing message.
#[derive(Resource, Debug, Clone, Default)]
pub struct StatusLine {
    pub level: StatusLevel,
    pub message: String,
}

impl StatusLine {
    pub fn info(&mut self, msg: impl Into<String>) {
        self.set(StatusLevel::Info, msg.into());
    }
    pub fn warning(&mut self, msg: impl Into<String>) {
        self.set(StatusLevel::Warning, msg.into());
    }
    pub fn error(&mut self, msg: impl Into<String>) {
        self.set(StatusLevel::Error, msg.into());
    }
    fn set(&mut self, level: StatusLevel, message: String) {
        self.level = level;
        self.message = message;
    }
}

/// Command-line choices applied once at startup.
#[derive(Resource, Debug, Clone, Default)]
pub struct LaunchOptions {
    pub source: Option<PathBuf>,
    pub output: Option<PathBuf>,
    /// Overrides `watch.auto_update` from the config when set.
    pub auto_update: Option<bool>,
}
