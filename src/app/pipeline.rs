// Headless half of the app: request handling and the auto-update pump.
// Both run on the main thread; the watch controller is a non-send resource
// so Bevy never schedules it anywhere else.

use std::path::{Path, PathBuf};
use std::time::Instant;

use bevy::prelude::*;

use super::state::{LaunchOptions, SdfRequest, SdfWorkspace, StatusLine};
use crate::core::config::SdfConfig;
use crate::core::error::SdfError;
use crate::core::session::{default_output_path, SaveOutcome};
use crate::watch::{CycleReport, WatchController};

pub struct SdfCorePlugin;

impl Plugin for SdfCorePlugin {
    fn build(&self, app: &mut App) {
        let cfg = app.world().get_resource::<SdfConfig>().cloned().unwrap_or_default();
        for w in cfg.validate() {
            warn!(target: "sdf", "config: {w}");
        }
        app.insert_resource(SdfWorkspace {
            auto_update: cfg.watch.auto_update,
            ..default()
        })
        .init_resource::<StatusLine>()
        .insert_non_send_resource(WatchController::from_config(&cfg))
        .insert_resource(cfg)
        .add_event::<SdfRequest>()
        .add_systems(Startup, apply_launch_options)
        .add_systems(Update, (handle_requests, drive_auto_update).chain())
        .add_systems(Last, stop_watch_on_exit);
    }
}

fn apply_launch_options(
    opts: Option<Res<LaunchOptions>>,
    mut ws: ResMut<SdfWorkspace>,
    mut requests: EventWriter<SdfRequest>,
) {
    let Some(opts) = opts else { return; };
    if let Some(out) = &opts.output {
        ws.output_path = Some(out.clone());
        ws.output_pinned = true;
    }
    if let Some(auto) = opts.auto_update {
        ws.auto_update = auto;
    }
    if let Some(src) = &opts.source {
        requests.write(SdfRequest::Load(src.clone()));
    }
}

fn handle_requests(
    mut requests: EventReader<SdfRequest>,
    mut ws: ResMut<SdfWorkspace>,
    mut watch: NonSendMut<WatchController>,
    cfg: Res<SdfConfig>,
    mut status: ResMut<StatusLine>,
) {
    for req in requests.read() {
        match req {
            SdfRequest::Load(path) => load(&mut ws, &mut watch, &cfg, &mut status, path),
            SdfRequest::Generate => {
                let outcome = ws.session.reload_source().and_then(|_| ws.session.generate().map(|_| ()));
                match outcome {
                    Ok(()) => status.info("Texture generated"),
                    Err(e) => report(&mut status, "generate", &e),
                }
            }
            SdfRequest::Save => match ws.output_path.clone() {
                Some(out) => save(&mut ws, &mut status, &out, !cfg.output.overwrite_existing),
                None => status.error("Set an output path before saving"),
            },
            SdfRequest::SaveAs(out) => {
                ws.output_path = Some(out.clone());
                ws.output_pinned = true;
                save(&mut ws, &mut status, out, !cfg.output.overwrite_existing);
            }
            SdfRequest::ConfirmOverwrite(yes) => match ws.awaiting_overwrite.take() {
                Some(out) if *yes => save(&mut ws, &mut status, &out, false),
                Some(_) => status.info("Save cancelled"),
                None => {}
            },
            SdfRequest::SetAutoUpdate(true) => enable_auto_update(&mut ws, &mut watch, &mut status),
            SdfRequest::SetAutoUpdate(false) => {
                ws.auto_update = false;
                watch.stop();
                status.info("Auto-update off");
            }
        }
    }
}

fn load(
    ws: &mut SdfWorkspace,
    watch: &mut WatchController,
    cfg: &SdfConfig,
    status: &mut StatusLine,
    path: &Path,
) {
    if let Err(e) = ws.session.load_source(path) {
        report(status, "load", &e);
        return;
    }
    info!(target: "sdf", "loaded gradient {}", path.display());
    if !ws.output_pinned {
        ws.output_path = Some(default_output_path(path, &cfg.output.suffix));
    }
    // The watch follows the session source before anything below can bail out.
    let wants_watch = ws.auto_update;
    if wants_watch {
        enable_auto_update(ws, watch, status);
    } else {
        watch.stop();
    }
    // A freshly picked source is generated and written straight away.
    if let Err(e) = ws.session.generate() {
        report(status, "generate", &e);
        return;
    }
    let mut msg = format!("Loaded {}", path.display());
    if let Some(out) = ws.output_path.clone() {
        match ws.session.save(&out, false) {
            Ok(_) => msg = format!("{msg}; saved {}", out.display()),
            Err(e) => {
                report(status, "auto-save", &e);
                return;
            }
        }
    }
    if wants_watch && !ws.auto_update {
        // keep the "auto-update disabled" warning visible
        return;
    }
    if ws.auto_update {
        msg = format!("{msg}; watching for changes");
    }
    status.info(msg);
}

fn save(ws: &mut SdfWorkspace, status: &mut StatusLine, out: &Path, confirm_overwrite: bool) {
    match ws.session.save(out, confirm_overwrite) {
        Ok(SaveOutcome::Written(p)) => {
            info!(target: "sdf", "saved {}", p.display());
            status.info(format!("Saved {}", p.display()));
        }
        Ok(SaveOutcome::NeedsConfirmation(p)) => {
            status.warning(format!("{} already exists. Overwrite? [Y/N]", p.display()));
            ws.awaiting_overwrite = Some(p);
        }
        Err(e) => report(status, "save", &e),
    }
}

fn enable_auto_update(ws: &mut SdfWorkspace, watch: &mut WatchController, status: &mut StatusLine) {
    let path: Option<PathBuf> = ws.session.source_path().map(Path::to_path_buf);
    let started = match path {
        Some(p) => watch.start(&p).map(|_| p),
        None => Err(SdfError::invalid_path(PathBuf::new(), "no gradient image selected")),
    };
    match started {
        Ok(p) => {
            ws.auto_update = true;
            status.info(format!("Auto-update: watching {}", p.display()));
        }
        Err(e) => {
            ws.auto_update = false;
            warn!(target: "watch", "auto-update disabled: {e}");
            status.warning(format!("Auto-update disabled: {e}"));
        }
    }
}

fn drive_auto_update(
    mut ws: ResMut<SdfWorkspace>,
    mut watch: NonSendMut<WatchController>,
    mut status: ResMut<StatusLine>,
) {
    if !watch.is_watching() {
        return;
    }
    let ws = &mut *ws;
    let report = watch.tick(&mut ws.session, ws.output_path.as_deref(), Instant::now());
    match report {
        Some(CycleReport::Regenerated { saved: Some(p) }) => status.info(format!("Auto-updated {}", p.display())),
        Some(CycleReport::Regenerated { saved: None }) => status.info("Auto-updated preview"),
        Some(CycleReport::Failed(e)) => status.warning(format!("Auto-update failed: {e}")),
        None => {}
    }
}

fn stop_watch_on_exit(mut exits: EventReader<AppExit>, mut watch: NonSendMut<WatchController>) {
    if exits.read().next().is_some() {
        watch.stop();
    }
}

fn report(status: &mut StatusLine, action: &str, e: &SdfError) {
    warn!(target: "sdf", "{action} failed: {e}");
    status.error(format!("{action} failed: {e}"));
}
