use std::ffi::OsString;
use std::path::{Path, PathBuf};

use image::ImageFormat;

use super::error::SdfError;
use super::preview::{split_channels, PreviewChannels};
use super::texture::{generate, GradientImage, SdfResult};

/// The one piece of mutable state the tool works on: current source mask and
/// the last generated texture. Failed operations leave both untouched.
#[derive(Debug, Default)]
pub struct SdfSession {
    source: Option<GradientImage>,
    source_path: Option<PathBuf>,
    result: Option<SdfResult>,
    revision: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Written(PathBuf),
    /// Target exists and the caller asked to be consulted first. Nothing was written.
    NeedsConfirmation(PathBuf),
}

impl SdfSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(&self) -> Option<&GradientImage> {
        self.source.as_ref()
    }
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }
    pub fn result(&self) -> Option<&SdfResult> {
        self.result.as_ref()
    }
    /// Bumped on every successful generation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Decode `path` and make it the current source. The previous source (and
    /// result) survive a decode failure.
    pub fn load_source(&mut self, path: impl AsRef<Path>) -> Result<(), SdfError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(SdfError::invalid_path(path, "no such file"));
        }
        let image = GradientImage::open(path)?;
        self.source = Some(image);
        self.source_path = Some(path.to_path_buf());
        Ok(())
    }

    /// Re-read the current source path from disk.
    pub fn reload_source(&mut self) -> Result<(), SdfError> {
        let path = self
            .source_path
            .clone()
            .ok_or(SdfError::InvalidState("no gradient image has been loaded"))?;
        self.load_source(path)
    }

    pub fn generate(&mut self) -> Result<&SdfResult, SdfError> {
        let source = self
            .source
            .as_ref()
            .ok_or(SdfError::InvalidState("no gradient image has been loaded"))?;
        let result = generate(source);
        self.revision += 1;
        Ok(&*self.result.insert(result))
    }

    /// Write the current result as PNG.
    ///
    /// With `confirm_overwrite` set, an existing file is left alone and
    /// `NeedsConfirmation` is returned; call again with `false` once the user agreed.
    pub fn save(&self, path: impl AsRef<Path>, confirm_overwrite: bool) -> Result<SaveOutcome, SdfError> {
        let path = path.as_ref();
        let result = self
            .result
            .as_ref()
            .ok_or(SdfError::InvalidState("nothing to save; generate a texture first"))?;
        if path.as_os_str().is_empty() {
            return Err(SdfError::invalid_path(path, "output path is empty"));
        }
        if path.is_dir() {
            return Err(SdfError::invalid_path(path, "output path is a directory"));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.is_dir() {
                return Err(SdfError::invalid_path(path, "parent directory does not exist"));
            }
        }
        if confirm_overwrite && path.exists() {
            return Ok(SaveOutcome::NeedsConfirmation(path.to_path_buf()));
        }
        result
            .image()
            .save_with_format(path, ImageFormat::Png)
            .map_err(|e| SdfError::EncodeFailure { path: path.to_path_buf(), reason: e.to_string() })?;
        Ok(SaveOutcome::Written(path.to_path_buf()))
    }

    pub fn preview_channels(&self) -> Option<PreviewChannels> {
        self.result.as_ref().map(split_channels)
    }
}

/// `<dir>/<stem><suffix>.png` next to the input, e.g. `mask.jpg` -> `mask_SDF.png`.
pub fn default_output_path(input: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = input.file_stem().map(|s| s.to_os_string()).unwrap_or_default();
    name.push(suffix);
    name.push(".png");
    match input.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn write_png(dir: &Path, name: &str, px: [u8; 4]) -> PathBuf {
        let path = dir.join(name);
        RgbaImage::from_pixel(4, 4, Rgba(px)).save(&path).unwrap();
        path
    }

    #[test]
    fn generate_without_source_is_invalid_state() {
        let mut s = SdfSession::new();
        assert!(matches!(s.generate(), Err(SdfError::InvalidState(_))));
        assert!(s.preview_channels().is_none());
        assert_eq!(s.revision(), 0);
    }

    #[test]
    fn failed_load_keeps_previous_source() {
        let tmp = tempfile::tempdir().unwrap();
        let good = write_png(tmp.path(), "good.png", [255, 255, 255, 255]);
        let bad = tmp.path().join("bad.png");
        std::fs::write(&bad, b"definitely not a png").unwrap();

        let mut s = SdfSession::new();
        s.load_source(&good).unwrap();
        s.generate().unwrap();
        let err = s.load_source(&bad).unwrap_err();
        assert!(matches!(err, SdfError::DecodeFailure { .. }), "{err}");
        assert_eq!(s.source_path(), Some(good.as_path()));
        assert!(s.result().is_some());
    }

    #[test]
    fn missing_source_is_invalid_path() {
        let mut s = SdfSession::new();
        let err = s.load_source("/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, SdfError::InvalidPath { .. }));
    }

    #[test]
    fn confirmation_blocks_overwrite_until_waived() {
        let tmp = tempfile::tempdir().unwrap();
        let src = write_png(tmp.path(), "mask.png", [255, 255, 255, 255]);
        let out = write_png(tmp.path(), "mask_SDF.png", [1, 2, 3, 4]);
        let before = std::fs::read(&out).unwrap();

        let mut s = SdfSession::new();
        s.load_source(&src).unwrap();
        s.generate().unwrap();
        assert_eq!(s.save(&out, true).unwrap(), SaveOutcome::NeedsConfirmation(out.clone()));
        assert_eq!(std::fs::read(&out).unwrap(), before);
        assert_eq!(s.save(&out, false).unwrap(), SaveOutcome::Written(out.clone()));
        assert_ne!(std::fs::read(&out).unwrap(), before);
    }

    #[test]
    fn save_rejects_bad_targets() {
        let tmp = tempfile::tempdir().unwrap();
        let src = write_png(tmp.path(), "mask.png", [0, 0, 0, 255]);
        let mut s = SdfSession::new();
        assert!(matches!(s.save(tmp.path().join("x.png"), false), Err(SdfError::InvalidState(_))));
        s.load_source(&src).unwrap();
        s.generate().unwrap();
        assert!(matches!(s.save("", false), Err(SdfError::InvalidPath { .. })));
        assert!(matches!(s.save(tmp.path(), false), Err(SdfError::InvalidPath { .. })));
        assert!(matches!(
            s.save(tmp.path().join("nope").join("x.png"), false),
            Err(SdfError::InvalidPath { .. })
        ));
    }

    #[test]
    fn default_output_sits_next_to_input() {
        assert_eq!(
            default_output_path(Path::new("/tex/face_mask.jpg"), "_SDF"),
            PathBuf::from("/tex/face_mask_SDF.png")
        );
        assert_eq!(
            default_output_path(Path::new("顔マスク.png"), "_SDF"),
            PathBuf::from("顔マスク_SDF.png")
        );
    }
}
