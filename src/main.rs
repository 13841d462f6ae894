use std::path::PathBuf;

use bevy::prelude::*;
use clap::Parser;

use sdf_texture_maker::app::{LaunchOptions, SdfMakerPlugin};
use sdf_texture_maker::core::config::{default_config_layers, SdfConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Turn a gradient mask into a left/right lighting texture", long_about = None)]
struct Args {
    /// Gradient image to open at startup (can also be dropped onto the window).
    input: Option<PathBuf>,
    /// Output PNG. Defaults to `<input_stem>_SDF.png` next to the input.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Start with auto-update off.
    #[arg(long)]
    no_watch: bool,
    /// Config layers, later ones override earlier ones. Defaults to assets/config/sdf_maker(.local).ron.
    #[arg(long = "config")]
    config: Vec<PathBuf>,
}

fn main() -> AppExit {
    let args = Args::parse();
    let layers = if args.config.is_empty() { default_config_layers() } else { args.config.clone() };
    // Logging is not up yet; problems are reported once the app starts.
    let (cfg, _used, errors) = SdfConfig::load_layered(&layers);

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: cfg.window.title.clone(),
                resolution: (cfg.window.width, cfg.window.height).into(),
                resizable: true,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ConfigLoadErrors(errors))
        .insert_resource(cfg)
        .insert_resource(LaunchOptions {
            source: args.input,
            output: args.output,
            auto_update: args.no_watch.then_some(false),
        })
        .add_systems(Startup, log_config_errors)
        .add_plugins(SdfMakerPlugin)
        .run()
}

#[derive(Resource)]
struct ConfigLoadErrors(Vec<String>);

fn log_config_errors(errors: Res<ConfigLoadErrors>) {
    for e in &errors.0 {
        // The .local layer is optional, so read errors for it are expected.
        if e.contains(".local.ron") {
            debug!(target: "sdf", "config: {e}");
        } else {
            warn!(target: "sdf", "config: {e}");
        }
    }
}
