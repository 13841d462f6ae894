use std::path::Path;
use std::thread::sleep;
use std::time::{Duration, Instant};

use image::{Rgba, RgbaImage};
use sdf_texture_maker::core::SdfSession;
use sdf_texture_maker::watch::{CycleReport, WatchController, WatchState};

fn write_mask(path: &Path, value: u8) {
    RgbaImage::from_pixel(4, 4, Rgba([value, value, value, 255])).save(path).unwrap();
}

#[test]
fn start_stop_and_repoint() {
    let tmp = tempfile::tempdir().unwrap();
    let a = tmp.path().join("a.png");
    let b = tmp.path().join("b.png");
    write_mask(&a, 10);
    write_mask(&b, 20);

    let mut ctl = WatchController::default();
    assert_eq!(ctl.state(), WatchState::Idle);
    ctl.start(&a).unwrap();
    assert_eq!(ctl.watched_path(), Some(a.as_path()));
    ctl.start(&b).unwrap();
    assert_eq!(ctl.watched_path(), Some(b.as_path()));
    ctl.stop();
    assert_eq!(ctl.state(), WatchState::Idle);
    // stopping twice is harmless
    ctl.stop();
}

#[test]
fn repointing_to_missing_file_leaves_controller_idle() {
    let tmp = tempfile::tempdir().unwrap();
    let a = tmp.path().join("a.png");
    write_mask(&a, 10);
    let mut ctl = WatchController::default();
    ctl.start(&a).unwrap();
    assert!(ctl.start(tmp.path().join("gone.png")).is_err());
    assert_eq!(ctl.state(), WatchState::Idle);
}

#[test]
fn editing_the_source_regenerates_and_saves() {
    let tmp = tempfile::tempdir().unwrap();
    let src = tmp.path().join("mask.png");
    let out = tmp.path().join("mask_SDF.png");
    write_mask(&src, 0);

    let mut session = SdfSession::new();
    session.load_source(&src).unwrap();
    session.generate().unwrap();

    let mut ctl = WatchController::new(Duration::from_millis(100), Duration::from_millis(200));
    ctl.start(&src).unwrap();
    // give the notifier a moment to register before the edit
    sleep(Duration::from_millis(100));
    write_mask(&src, 255);

    let deadline = Instant::now() + Duration::from_secs(10);
    let mut report = None;
    while Instant::now() < deadline {
        if let Some(r) = ctl.tick(&mut session, Some(&out), Instant::now()) {
            report = Some(r);
            if out.is_file() && session.result().map(|r| r.image().get_pixel(0, 0)[1]) == Some(255) {
                break;
            }
        }
        sleep(Duration::from_millis(20));
    }
    assert!(matches!(report, Some(CycleReport::Regenerated { .. })), "{report:?}");
    assert_eq!(session.result().unwrap().image().get_pixel(0, 0).0, [255, 255, 0, 255]);
    let saved = image::open(&out).unwrap().into_rgba8();
    assert_eq!(saved.get_pixel(0, 0).0, [255, 255, 0, 255]);
    assert_eq!(ctl.state(), WatchState::Watching);
    ctl.stop();
}
