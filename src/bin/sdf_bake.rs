//! Headless SDF texture baker
//!
//! One-shot: decode a gradient mask, generate the lighting texture, write PNG.
//! With `--watch` it keeps running and regenerates whenever the input changes.
//!
//! Example:
//!   cargo run --bin sdf_bake -- textures/face_mask.png
//!   cargo run --bin sdf_bake -- textures/face_mask.png --output out/face.png --watch

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use clap::Parser;

use sdf_texture_maker::app::{LaunchOptions, SdfCorePlugin};
use sdf_texture_maker::core::config::{default_config_layers, SdfConfig};
use sdf_texture_maker::core::{default_output_path, SdfSession};
use sdf_texture_maker::watch::WatchController;

#[derive(Parser, Debug)]
#[command(author, version, about = "Bake a gradient mask into a left/right lighting texture", long_about = None)]
struct Args {
    input: PathBuf,
    /// Output PNG. Defaults to `<input_stem><suffix>.png` next to the input.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Keep running and re-bake when the input file changes.
    #[arg(long)]
    watch: bool,
    #[arg(long = "config")]
    config: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let layers = if args.config.is_empty() { default_config_layers() } else { args.config.clone() };
    let (cfg, _used, errors) = SdfConfig::load_layered(&layers);
    for e in errors.iter().filter(|e| !e.contains(".local.ron")) {
        eprintln!("warning: {e}");
    }
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input, &cfg.output.suffix));

    if !args.watch {
        let mut session = SdfSession::new();
        session
            .load_source(&args.input)
            .with_context(|| format!("load {:?}", args.input))?;
        let result = session.generate()?;
        println!("Generated {}x{} texture", result.width(), result.height());
        session.save(&output, false).with_context(|| format!("write {:?}", output))?;
        println!("Wrote {}", output.display());
        return Ok(());
    }

    let exit = App::new()
        .add_plugins((
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_millis(50))),
            LogPlugin::default(),
        ))
        .insert_resource(cfg)
        .insert_resource(LaunchOptions {
            source: Some(args.input),
            output: Some(output),
            auto_update: Some(true),
        })
        .add_plugins(SdfCorePlugin)
        .add_systems(PostUpdate, exit_when_not_watching)
        .run();
    if exit.is_error() {
        anyhow::bail!("watch loop exited with {exit:?}");
    }
    Ok(())
}

/// Nothing left to do once the watch could not start (bad input, notifier failure).
fn exit_when_not_watching(watch: NonSend<WatchController>, mut exit: EventWriter<AppExit>) {
    if !watch.is_watching() {
        error!(target: "watch", "not watching anything; exiting");
        exit.write(AppExit::error());
    }
}
