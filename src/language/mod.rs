mod catalog;
mod model;
mod selection;

pub use catalog::{Catalog, NameCollision};
pub use model::LanguageModel;

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum LanguageError {
    #[error("language code {0:?} is not installed")]
    UnknownCode(String),
    #[error("language {0:?} is not installed")]
    UnknownLanguage(String),
    #[error("combination {0:?} contains no language codes")]
    EmptyCombination(String),
    #[error("no OCR languages are installed")]
    NoLanguagesInstalled,
    #[error(transparent)]
    Settings(#[from] ConfigError),
}

pub type LanguageResult<T> = std::result::Result<T, LanguageError>;
