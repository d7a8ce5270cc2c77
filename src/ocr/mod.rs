use image::DynamicImage;
use std::io::{self, Cursor, Write};
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use thiserror::Error;

const LANGUAGE_LIST_HEADER: &str = "List of available languages";

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Tesseract not found at {}", .path.display())]
    EngineNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode image for OCR: {0}")]
    ImageEncoding(#[from] image::ImageError),
    #[error("Tesseract exited with {status}: {stderr}")]
    EngineFailed { status: String, stderr: String },
    #[error("failed to communicate with Tesseract: {0}")]
    Io(#[from] io::Error),
}

pub type OcrResult<T> = std::result::Result<T, OcrError>;

pub trait OcrEngine {
    fn installed_languages(&self) -> OcrResult<Vec<String>>;
    /// `languages` is a `+`-joined list of engine codes, main language first.
    fn recognize_text(&self, image: &DynamicImage, languages: &str) -> OcrResult<String>;
}

/// Runs the Tesseract command-line tool.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    command: PathBuf,
}

impl TesseractEngine {
    pub fn new(command: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Checks that the configured executable runs, returning its version line.
    pub fn verify(&self) -> OcrResult<String> {
        let output = self.run(&["--version"], None)?;
        let version = first_line(&output.stdout)
            .or_else(|| first_line(&output.stderr))
            .unwrap_or_default();
        tracing::info!(command = %self.command.display(), %version, "found Tesseract");
        Ok(version)
    }

    fn base_command(&self) -> Command {
        let mut command = Command::new(&self.command);
        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            const CREATE_NO_WINDOW: u32 = 0x0800_0000;
            command.creation_flags(CREATE_NO_WINDOW);
        }
        command
    }

    fn run(&self, args: &[&str], input: Option<Vec<u8>>) -> OcrResult<Output> {
        let mut command = self.base_command();
        command
            .args(args)
            .stdin(if input.is_some() { Stdio::piped() } else { Stdio::null() })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = command.spawn().map_err(|source| match source.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => OcrError::EngineNotFound {
                path: self.command.clone(),
                source,
            },
            _ => OcrError::Io(source),
        })?;

        let writer = match (input, child.stdin.take()) {
            (Some(bytes), Some(mut stdin)) => Some(std::thread::spawn(move || stdin.write_all(&bytes))),
            _ => None,
        };

        let output = child.wait_with_output()?;
        if let Some(writer) = writer {
            match writer.join() {
                Ok(result) => result?,
                Err(_) => {
                    return Err(OcrError::Io(io::Error::other("stdin writer thread panicked")));
                }
            }
        }

        if !output.status.success() {
            return Err(OcrError::EngineFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output)
    }
}

impl OcrEngine for TesseractEngine {
    fn installed_languages(&self) -> OcrResult<Vec<String>> {
        let output = self.run(&["--list-langs"], None)?;
        let mut languages = parse_language_list(&String::from_utf8_lossy(&output.stdout));
        if languages.is_empty() {
            // Tesseract 3 prints the list on stderr.
            languages = parse_language_list(&String::from_utf8_lossy(&output.stderr));
        }
        tracing::debug!(count = languages.len(), "listed installed languages");
        Ok(languages)
    }

    fn recognize_text(&self, image: &DynamicImage, languages: &str) -> OcrResult<String> {
        let mut png = Vec::new();
        image.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)?;

        tracing::debug!(
            width = image.width(),
            height = image.height(),
            languages,
            "running OCR"
        );
        let output = self.run(&["stdin", "stdout", "-l", languages], Some(png))?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

fn parse_language_list(listing: &str) -> Vec<String> {
    listing
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(LANGUAGE_LIST_HEADER))
        .map(str::to_string)
        .collect()
}

fn first_line(bytes: &[u8]) -> Option<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}
