use image::{Rgba, RgbaImage};
use sdf_texture_maker::core::{generate, split_channels, GradientImage, SdfSession};

/// Deterministic noisy mask so every pixel differs from its mirror.
fn noisy_mask(w: u32, h: u32) -> RgbaImage {
    let mut state: u32 = 0x1234_5678;
    let mut next = || {
        state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        (state >> 24) as u8
    };
    let mut img = RgbaImage::new(w, h);
    for p in img.pixels_mut() {
        *p = Rgba([next(), next(), next(), next()]);
    }
    img
}

fn expected(p: &Rgba<u8>) -> u8 {
    let mean = (p[0] as f64 + p[1] as f64 + p[2] as f64) / 3.0;
    (mean / 255.0 * 255.0).round() as u8
}

#[test]
fn every_pixel_follows_the_remap() {
    let src = noisy_mask(17, 9);
    let out = generate(&GradientImage::from_rgba(src.clone()));
    assert_eq!(out.image().dimensions(), src.dimensions());
    let w = src.width();
    for (x, y, o) in out.image().enumerate_pixels() {
        let here = src.get_pixel(x, y);
        let mirrored = src.get_pixel(w - 1 - x, y);
        assert_eq!(o[0], expected(mirrored), "red at {x},{y}");
        assert_eq!(o[1], expected(here), "green at {x},{y}");
        assert_eq!(o[2], 0, "blue at {x},{y}");
        assert_eq!(o[3], here[3], "alpha at {x},{y}");
    }
}

#[test]
fn generation_is_deterministic() {
    let src = GradientImage::from_rgba(noisy_mask(32, 32));
    assert_eq!(generate(&src), generate(&src));
}

#[test]
fn png_round_trip_is_lossless() {
    let tmp = tempfile::tempdir().unwrap();
    let src_path = tmp.path().join("mask.png");
    let out_path = tmp.path().join("mask_SDF.png");
    noisy_mask(20, 12).save(&src_path).unwrap();

    let mut session = SdfSession::new();
    session.load_source(&src_path).unwrap();
    let generated = session.generate().unwrap().clone();
    session.save(&out_path, false).unwrap();

    let decoded = image::open(&out_path).unwrap();
    assert_eq!(decoded.color(), image::ColorType::Rgba8);
    assert_eq!(&decoded.into_rgba8(), generated.image());
}

#[test]
fn non_ascii_paths_and_mislabelled_extensions_load() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("テクスチャ");
    std::fs::create_dir(&dir).unwrap();
    // PNG bytes behind a .jpg name: the decoder sniffs the content.
    let path = dir.join("グラデーション.jpg");
    RgbaImage::from_pixel(3, 3, Rgba([90, 90, 90, 255]))
        .save_with_format(&path, image::ImageFormat::Png)
        .unwrap();
    let mut session = SdfSession::new();
    session.load_source(&path).unwrap();
    let out = session.generate().unwrap();
    assert!(out.image().pixels().all(|p| p.0 == [90, 90, 0, 255]));
}

#[test]
fn channel_views_of_generated_texture() {
    let result = generate(&GradientImage::from_rgba(noisy_mask(8, 5)));
    let views = split_channels(&result);
    assert!(views.red.pixels().all(|p| p[1] == 0 && p[2] == 0));
    assert!(views.green.pixels().all(|p| p[0] == 0 && p[2] == 0));
    for (v, r) in views.red.pixels().zip(result.image().pixels()) {
        assert_eq!((v[0], v[3]), (r[0], r[3]));
    }
    for (v, r) in views.green.pixels().zip(result.image().pixels()) {
        assert_eq!((v[1], v[3]), (r[1], r[3]));
    }
    assert_eq!(&views.combined, result.image());
}
