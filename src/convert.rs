//! Wallpaper normalisation.
//!
//! Files picked as wallpapers are collected into one directory as JPEGs:
//! existing JPEGs are moved, anything else the `image` crate can decode is
//! re-encoded as RGB JPEG next to them.

use std::fs;
use std::path::{Path, PathBuf};

use image::ImageFormat;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{MatuError, Result};

/// What happened to each input file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertReport {
    /// `(source, written)` pairs for re-encoded files.
    pub converted: Vec<(PathBuf, PathBuf)>,
    /// `(source, destination)` pairs for JPEGs moved as-is.
    pub moved: Vec<(PathBuf, PathBuf)>,
    /// Files that could not be decoded or written, with the reason.
    pub skipped: Vec<(PathBuf, String)>,
}

impl ConvertReport {
    pub fn total(&self) -> usize {
        self.converted.len() + self.moved.len() + self.skipped.len()
    }
}

fn is_jpeg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"))
        .unwrap_or(false)
}

fn io_error(path: &Path, e: impl ToString) -> MatuError {
    MatuError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

/// Rename, falling back to copy + remove across filesystems.
fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    fs::copy(from, to)?;
    fs::remove_file(from)
}

fn reencode(from: &Path, to: &Path) -> std::result::Result<(), String> {
    let image = image::open(from).map_err(|e| e.to_string())?;
    image
        .to_rgb8()
        .save_with_format(to, ImageFormat::Jpeg)
        .map_err(|e| e.to_string())
}

/// Move or convert every regular file directly inside `input_dir` into
/// `output_dir`, creating it if needed.
pub fn convert_images(input_dir: &Path, output_dir: &Path) -> Result<ConvertReport> {
    if !input_dir.is_dir() {
        return Err(io_error(input_dir, "input directory does not exist"));
    }
    fs::create_dir_all(output_dir).map_err(|e| io_error(output_dir, e))?;

    let mut report = ConvertReport::default();

    for entry in WalkDir::new(input_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let source = entry.path();
        let Some(stem) = source.file_stem() else {
            continue;
        };

        if is_jpeg(source) {
            let Some(name) = source.file_name() else {
                continue;
            };
            let target = output_dir.join(name);
            match move_file(source, &target) {
                Ok(()) => {
                    debug!("moved {} -> {}", source.display(), target.display());
                    report.moved.push((source.to_path_buf(), target));
                }
                Err(e) => {
                    warn!("skipping {}: {}", source.display(), e);
                    report.skipped.push((source.to_path_buf(), e.to_string()));
                }
            }
            continue;
        }

        let mut target = output_dir.join(stem);
        target.set_extension("jpg");
        match reencode(source, &target) {
            Ok(()) => {
                debug!("converted {} -> {}", source.display(), target.display());
                report.converted.push((source.to_path_buf(), target));
            }
            Err(message) => {
                warn!("skipping {}: {}", source.display(), message);
                report.skipped.push((source.to_path_buf(), message));
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_convert_and_move() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();

        RgbaImage::from_pixel(4, 4, Rgba([10, 200, 30, 128]))
            .save(input.path().join("a.png"))
            .unwrap();
        RgbImage::from_pixel(4, 4, Rgb([1, 2, 3]))
            .save(input.path().join("b.jpg"))
            .unwrap();
        fs::write(input.path().join("c.txt"), "hello").unwrap();
        fs::create_dir(input.path().join("nested")).unwrap();

        let report = convert_images(input.path(), output.path()).unwrap();

        assert_eq!(report.converted.len(), 1);
        assert_eq!(report.moved.len(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.total(), 3);

        let converted = output.path().join("a.jpg");
        assert!(converted.exists());
        assert_eq!(
            image::ImageFormat::from_path(&converted).unwrap(),
            ImageFormat::Jpeg
        );
        assert_eq!(image::open(&converted).unwrap().color(), image::ColorType::Rgb8);

        assert!(output.path().join("b.jpg").exists());
        assert!(!input.path().join("b.jpg").exists());
        // Converted sources stay where they were
        assert!(input.path().join("a.png").exists());
        assert_eq!(report.skipped[0].0, input.path().join("c.txt"));
    }

    #[test]
    fn test_failed_move_is_skipped() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();

        for name in ["a.jpg", "b.jpg", "c.jpg"] {
            RgbImage::from_pixel(2, 2, Rgb([9, 9, 9]))
                .save(input.path().join(name))
                .unwrap();
        }
        // A directory where b.jpg should land blocks the move
        fs::create_dir(output.path().join("b.jpg")).unwrap();

        let report = convert_images(input.path(), output.path()).unwrap();

        assert_eq!(report.moved.len(), 2);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].0, input.path().join("b.jpg"));
        assert!(input.path().join("b.jpg").exists());
        assert!(output.path().join("a.jpg").is_file());
        assert!(output.path().join("c.jpg").is_file());
    }

    #[test]
    fn test_creates_output_dir() {
        let input = tempdir().unwrap();
        let root = tempdir().unwrap();
        let output = root.path().join("wallpapers");

        let report = convert_images(input.path(), &output).unwrap();

        assert!(output.is_dir());
        assert_eq!(report, ConvertReport::default());
    }

    #[test]
    fn test_missing_input_dir() {
        let root = tempdir().unwrap();
        let err = convert_images(&root.path().join("nope"), &root.path().join("out")).unwrap_err();
        assert!(matches!(err, MatuError::Io { .. }));
    }

    #[test]
    fn test_is_jpeg() {
        assert!(is_jpeg(Path::new("x.JPG")));
        assert!(is_jpeg(Path::new("x.jpeg")));
        assert!(!is_jpeg(Path::new("x.png")));
        assert!(!is_jpeg(Path::new("jpg")));
    }
}
