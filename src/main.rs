#![windows_subsystem = "windows"]

mod capture;
mod config;
mod language;
mod ocr;
mod output;
mod overlay;
mod shortcuts;
mod ui;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::config::{SettingsStore, StrKey};
use crate::language::{Catalog, LanguageModel};
use crate::ocr::{OcrEngine, OcrError, TesseractEngine};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut settings = match SettingsStore::open() {
        Ok(settings) => settings,
        Err(err) => {
            tracing::warn!(error = %err, "settings unavailable, using defaults for this session");
            SettingsStore::in_memory()
        }
    };

    let Some(engine) = locate_engine(&mut settings) else {
        tracing::info!("no Tesseract executable configured, exiting");
        return Ok(());
    };

    let languages = match load_languages(&engine, &settings) {
        Ok(languages) => languages,
        Err(err) => {
            let message = format!("{err:#}");
            tracing::error!(error = %message, "startup failed");
            ui::report_startup_error(&message);
            return Err(err);
        }
    };

    iced::daemon(ui::App::title, ui::App::update, ui::App::view)
        .subscription(ui::App::subscription)
        .theme(ui::App::theme)
        .style(ui::App::style)
        .run_with(move || ui::App::new(settings, engine, languages))
        .context("application error")
}

fn load_languages(engine: &impl OcrEngine, settings: &SettingsStore) -> anyhow::Result<LanguageModel> {
    let codes = engine
        .installed_languages()
        .context("failed to list installed OCR languages")?;
    let catalog = Catalog::build(codes);
    LanguageModel::new(catalog, settings).context("no usable OCR language installed")
}

/// Resolves a runnable Tesseract executable, asking the user for a path until
/// one works or they decline.
fn locate_engine(settings: &mut SettingsStore) -> Option<TesseractEngine> {
    loop {
        let engine = TesseractEngine::new(settings.user().tesseract_path.clone());
        let reason = match engine.verify() {
            Ok(_) => return Some(engine),
            Err(err @ OcrError::EngineNotFound { .. }) => err.to_string(),
            Err(err) => {
                tracing::warn!(error = %err, "configured Tesseract failed to run");
                err.to_string()
            }
        };

        let path = ui::ask_for_engine_path(&reason)?;
        settings.set_str(StrKey::TesseractPath, path.to_string_lossy());
        if let Err(err) = settings.save() {
            tracing::warn!(error = %err, "failed to save Tesseract path");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::DynamicImage;

    struct FixedLanguages(Vec<&'static str>);

    impl OcrEngine for FixedLanguages {
        fn installed_languages(&self) -> ocr::OcrResult<Vec<String>> {
            Ok(self.0.iter().map(|code| code.to_string()).collect())
        }

        fn recognize_text(&self, _image: &DynamicImage, _languages: &str) -> ocr::OcrResult<String> {
            Ok(String::new())
        }
    }

    #[test]
    fn languages_load_from_the_engine() {
        let model = load_languages(&FixedLanguages(vec!["fra", "eng"]), &SettingsStore::in_memory()).unwrap();
        assert_eq!(model.parameter(), "eng");
    }

    #[test]
    fn missing_languages_produce_a_reportable_error() {
        let err = load_languages(&FixedLanguages(Vec::new()), &SettingsStore::in_memory()).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.starts_with("no usable OCR language installed"));
        assert!(message.contains("no OCR languages are installed"));
    }

    #[test]
    fn unreachable_engine_is_reported_with_its_cause() {
        let engine = TesseractEngine::new(std::env::temp_dir().join("snipocr-no-such-tesseract"));
        let err = load_languages(&engine, &SettingsStore::in_memory()).unwrap_err();
        assert!(format!("{err:#}").starts_with("failed to list installed OCR languages"));
    }
}
