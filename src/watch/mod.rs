//! Auto-update: regenerate the texture when the source file changes on disk.

mod controller;
mod debounce;

pub use controller::{regenerate, CycleReport, WatchController, WatchSignal, WatchState};
pub use debounce::Debouncer;
