use std::fs;

use sdf_texture_maker::core::config::{SdfConfig, DEFAULT_CONFIG_LAYERS};

#[test]
fn shipped_config_loads_without_warnings() {
    let (cfg, used, errors) = SdfConfig::load_layered([DEFAULT_CONFIG_LAYERS[0]]);
    assert_eq!(used.len(), 1, "errors: {errors:?}");
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(cfg, SdfConfig::default());
    assert!(cfg.validate().is_empty());
}

#[test]
fn local_layer_overrides_single_fields() {
    let tmp = tempfile::tempdir().unwrap();
    let base = tmp.path().join("sdf_maker.ron");
    let local = tmp.path().join("sdf_maker.local.ron");
    fs::write(
        &base,
        r#"(
            watch: (auto_update: true, debounce_secs: 1.0, settle_secs: 0.5),
            output: (suffix: "_SDF", overwrite_existing: true),
        )"#,
    )
    .unwrap();
    fs::write(&local, r#"( output: (overwrite_existing: false), watch: (settle_secs: 0.25) )"#).unwrap();

    let (cfg, used, errors) = SdfConfig::load_layered([&base, &local]);
    assert_eq!(used.len(), 2);
    assert!(errors.is_empty(), "{errors:?}");
    assert!(!cfg.output.overwrite_existing);
    assert_eq!(cfg.output.suffix, "_SDF");
    assert_eq!(cfg.watch.settle_secs, 0.25);
    assert_eq!(cfg.watch.debounce_secs, 1.0);
    // untouched section falls back to defaults
    assert_eq!(cfg.preview.thumbnail_size, 200);
}

#[test]
fn missing_and_broken_layers_are_reported_not_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let broken = tmp.path().join("broken.ron");
    fs::write(&broken, "( watch: ( ").unwrap();
    let missing = tmp.path().join("missing.ron");

    let (cfg, used, errors) = SdfConfig::load_layered([&broken, &missing]);
    assert!(used.is_empty());
    assert_eq!(errors.len(), 2, "{errors:?}");
    assert!(errors[0].contains("parse error"));
    assert!(errors[1].contains("read error"));
    assert_eq!(cfg, SdfConfig::default());
}
