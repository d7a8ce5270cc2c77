use arboard::Clipboard;
use chrono::{DateTime, Local};
use image::{DynamicImage, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const FILE_PREFIX: &str = "SSOCR";
const MAX_IMAGE_DIMENSION: u32 = 32768;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("clipboard unavailable: {0}")]
    Clipboard(#[from] arboard::Error),
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
    #[error("{} is not a valid image file: {source}", .path.display())]
    InvalidImage {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to encode image: {0}")]
    ImageEncoding(#[from] image::ImageError),
    #[error("image has invalid dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

pub type OutputResult<T> = std::result::Result<T, OutputError>;

pub struct ClipboardManager {
    clipboard: Clipboard,
}

impl ClipboardManager {
    pub fn new() -> OutputResult<Self> {
        let clipboard = Clipboard::new()?;
        Ok(Self { clipboard })
    }

    /// Returns `false` without touching the clipboard when `text` is empty.
    pub fn copy_text(&mut self, text: &str) -> OutputResult<bool> {
        if text.is_empty() {
            return Ok(false);
        }
        self.clipboard.set_text(text.to_string())?;
        Ok(true)
    }
}

/// `SSOCR-<date>-<time>-<microseconds>`, shared by text and image output.
pub fn timestamp_name(now: DateTime<Local>) -> String {
    format!("{FILE_PREFIX}-{}", now.format("%Y%m%d-%H%M%S-%6f"))
}

/// Resolves a configured save folder, creating it when needed. An empty
/// setting means the working directory.
pub fn resolve_folder(configured: &Path) -> OutputResult<PathBuf> {
    if configured.as_os_str().is_empty() {
        return Ok(PathBuf::from("."));
    }
    if !configured.exists() {
        fs::create_dir_all(configured)?;
        tracing::debug!(folder = %configured.display(), "created save folder");
    }
    Ok(configured.to_path_buf())
}

/// Writes recognized text as UTF-8. Empty text is not saved.
pub fn save_text(text: &str, folder: &Path) -> OutputResult<Option<PathBuf>> {
    save_text_at(text, folder, Local::now())
}

fn save_text_at(text: &str, folder: &Path, now: DateTime<Local>) -> OutputResult<Option<PathBuf>> {
    if text.is_empty() {
        return Ok(None);
    }
    let path = resolve_folder(folder)?.join(format!("{}.txt", timestamp_name(now)));
    fs::write(&path, text.as_bytes())?;
    tracing::info!(path = %path.display(), "saved recognized text");
    Ok(Some(path))
}

pub fn save_snippet_image(image: &RgbaImage, folder: &Path) -> OutputResult<PathBuf> {
    save_snippet_image_at(image, folder, Local::now())
}

fn save_snippet_image_at(image: &RgbaImage, folder: &Path, now: DateTime<Local>) -> OutputResult<PathBuf> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 || width > MAX_IMAGE_DIMENSION || height > MAX_IMAGE_DIMENSION {
        return Err(OutputError::InvalidDimensions { width, height });
    }
    let path = resolve_folder(folder)?.join(format!("{}.png", timestamp_name(now)));
    image.save_with_format(&path, image::ImageFormat::Png)?;
    tracing::info!(path = %path.display(), "saved snippet image");
    Ok(path)
}

pub fn load_image_file(path: &Path) -> OutputResult<DynamicImage> {
    image::open(path).map_err(|source| OutputError::InvalidImage {
        path: path.to_path_buf(),
        source,
    })
}
