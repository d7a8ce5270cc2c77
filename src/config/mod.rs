use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const FALLBACK_MAIN_LANGUAGE: &str = "English";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings file is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("no configuration directory available on this platform")]
    NoConfigDir,
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub user: UserConfig,
    /// Keys are serialized combinations; values are unused.
    #[serde(default)]
    pub saved_lang_combos: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    pub tesseract_path: PathBuf,
    pub default_lang_main: String,
    pub default_is_combo: bool,
    pub default_lang_combo: String,
    pub last_dir: PathBuf,
    pub auto_save_text: bool,
    pub auto_save_image: bool,
    pub auto_copy: bool,
    pub disable_shortcuts: bool,
    /// Empty means the working directory.
    pub save_text_path: PathBuf,
    pub save_image_path: PathBuf,
    pub theme: Theme,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            tesseract_path: default_tesseract_path(),
            default_lang_main: FALLBACK_MAIN_LANGUAGE.to_string(),
            default_is_combo: false,
            default_lang_combo: String::new(),
            last_dir: default_last_dir(),
            auto_save_text: false,
            auto_save_image: false,
            auto_copy: false,
            disable_shortcuts: false,
            save_text_path: PathBuf::new(),
            save_image_path: PathBuf::new(),
            theme: Theme::Dark,
        }
    }
}

#[cfg(windows)]
pub fn default_tesseract_path() -> PathBuf {
    PathBuf::from(r"C:\Program Files\Tesseract-OCR\tesseract.exe")
}

#[cfg(not(windows))]
pub fn default_tesseract_path() -> PathBuf {
    PathBuf::from("tesseract")
}

fn default_last_dir() -> PathBuf {
    directories::UserDirs::new()
        .and_then(|d| d.desktop_dir().map(|p| p.to_path_buf()))
        .or_else(|| directories::BaseDirs::new().map(|b| b.home_dir().to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// String-valued entries of the user settings section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrKey {
    TesseractPath,
    DefaultLangMain,
    DefaultLangCombo,
    LastDir,
    SaveTextPath,
    SaveImagePath,
}

/// Boolean entries of the user settings section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolKey {
    DefaultIsCombo,
    AutoSaveText,
    AutoSaveImage,
    AutoCopy,
    DisableShortcuts,
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "snipocr", "snipocr").map(|p| p.config_dir().to_path_buf())
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.toml"))
    }

    fn sanitize(&mut self) {
        if self.user.tesseract_path.as_os_str().is_empty() {
            self.user.tesseract_path = default_tesseract_path();
        }
        if self.user.default_lang_main.trim().is_empty() {
            self.user.default_lang_main = FALLBACK_MAIN_LANGUAGE.to_string();
        }
        if self.user.default_is_combo && self.user.default_lang_combo.is_empty() {
            self.user.default_is_combo = false;
        }
        self.saved_lang_combos.retain(|key, _| !key.trim().is_empty());
    }
}

/// Persisted settings shared by the UI and the language model.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: Option<PathBuf>,
    config: Config,
}

impl SettingsStore {
    /// Opens the settings file in the platform configuration directory.
    pub fn open() -> ConfigResult<Self> {
        let path = Config::config_path().ok_or(ConfigError::NoConfigDir)?;
        Self::open_at(path)
    }

    /// Loads `path`, or starts from defaults when it does not exist yet.
    pub fn open_at(path: impl Into<PathBuf>) -> ConfigResult<Self> {
        let path = path.into();
        let config = if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.sanitize();
            config
        } else {
            tracing::info!(path = %path.display(), "no settings file, using defaults");
            Config::default()
        };
        Ok(Self {
            path: Some(path),
            config,
        })
    }

    /// A store that is never written to disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            config: Config::default(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn user(&self) -> &UserConfig {
        &self.config.user
    }

    pub fn save(&self) -> ConfigResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let content = toml::to_string_pretty(&self.config)?;
        fs::write(path, content)?;
        tracing::debug!(path = %path.display(), "settings saved");
        Ok(())
    }

    pub fn get_str(&self, key: StrKey) -> String {
        let user = &self.config.user;
        match key {
            StrKey::TesseractPath => user.tesseract_path.to_string_lossy().into_owned(),
            StrKey::DefaultLangMain => user.default_lang_main.clone(),
            StrKey::DefaultLangCombo => user.default_lang_combo.clone(),
            StrKey::LastDir => user.last_dir.to_string_lossy().into_owned(),
            StrKey::SaveTextPath => user.save_text_path.to_string_lossy().into_owned(),
            StrKey::SaveImagePath => user.save_image_path.to_string_lossy().into_owned(),
        }
    }

    pub fn set_str(&mut self, key: StrKey, value: impl Into<String>) {
        let value = value.into();
        let user = &mut self.config.user;
        match key {
            StrKey::TesseractPath => user.tesseract_path = PathBuf::from(value),
            StrKey::DefaultLangMain => user.default_lang_main = value,
            StrKey::DefaultLangCombo => user.default_lang_combo = value,
            StrKey::LastDir => user.last_dir = PathBuf::from(value),
            StrKey::SaveTextPath => user.save_text_path = PathBuf::from(value),
            StrKey::SaveImagePath => user.save_image_path = PathBuf::from(value),
        }
    }

    pub fn get_bool(&self, key: BoolKey) -> bool {
        let user = &self.config.user;
        match key {
            BoolKey::DefaultIsCombo => user.default_is_combo,
            BoolKey::AutoSaveText => user.auto_save_text,
            BoolKey::AutoSaveImage => user.auto_save_image,
            BoolKey::AutoCopy => user.auto_copy,
            BoolKey::DisableShortcuts => user.disable_shortcuts,
        }
    }

    pub fn set_bool(&mut self, key: BoolKey, value: bool) {
        let user = &mut self.config.user;
        match key {
            BoolKey::DefaultIsCombo => user.default_is_combo = value,
            BoolKey::AutoSaveText => user.auto_save_text = value,
            BoolKey::AutoSaveImage => user.auto_save_image = value,
            BoolKey::AutoCopy => user.auto_copy = value,
            BoolKey::DisableShortcuts => user.disable_shortcuts = value,
        }
    }

    /// Saved combination keys in ascending order.
    pub fn combo_keys(&self) -> Vec<String> {
        self.config.saved_lang_combos.keys().cloned().collect()
    }

    pub fn insert_combo(&mut self, key: impl Into<String>) -> bool {
        self.config
            .saved_lang_combos
            .insert(key.into(), String::new())
            .is_none()
    }

    pub fn remove_combo(&mut self, key: &str) -> bool {
        self.config.saved_lang_combos.remove(key).is_some()
    }

    /// Resets user settings to defaults. Saved combinations and the verified
    /// engine path are kept.
    pub fn restore_defaults(&mut self) {
        let tesseract_path = std::mem::take(&mut self.config.user.tesseract_path);
        self.config.user = UserConfig {
            tesseract_path,
            ..UserConfig::default()
        };
        tracing::info!("user settings restored to defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_settings_path(name: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        std::env::temp_dir()
            .join(format!("snipocr-config-{name}-{}-{nanos}", std::process::id()))
            .join("config.toml")
    }

    #[test]
    fn default_main_language_is_english() {
        let store = SettingsStore::in_memory();
        assert_eq!(store.get_str(StrKey::DefaultLangMain), "English");
        assert!(!store.get_bool(BoolKey::DefaultIsCombo));
        assert!(store.combo_keys().is_empty());
    }

    #[test]
    fn toml_round_trip_through_disk() {
        let path = temp_settings_path("round-trip");
        let mut store = SettingsStore::open_at(&path).expect("open fresh store");
        store.set_str(StrKey::DefaultLangCombo, "eng+fra");
        store.set_bool(BoolKey::DefaultIsCombo, true);
        store.set_bool(BoolKey::AutoCopy, true);
        store.insert_combo("eng+fra");
        store.insert_combo("deu+eng");
        store.save().expect("save store");

        let reloaded = SettingsStore::open_at(&path).expect("reload store");
        assert_eq!(reloaded.config(), store.config());
        assert_eq!(reloaded.combo_keys(), vec!["deu+eng", "eng+fra"]);

        if let Some(dir) = path.parent() {
            let _ = fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config: Config = toml::from_str("[user]\nauto_copy = true\n").expect("parse partial");
        assert!(config.user.auto_copy);
        assert_eq!(config.user.default_lang_main, FALLBACK_MAIN_LANGUAGE);
        assert!(config.saved_lang_combos.is_empty());
    }

    #[test]
    fn sanitize_repairs_inconsistent_values() {
        let mut config = Config::default();
        config.user.tesseract_path = PathBuf::new();
        config.user.default_lang_main = "  ".to_string();
        config.user.default_is_combo = true;
        config.saved_lang_combos.insert(" ".to_string(), String::new());

        config.sanitize();

        assert_eq!(config.user.tesseract_path, default_tesseract_path());
        assert_eq!(config.user.default_lang_main, FALLBACK_MAIN_LANGUAGE);
        assert!(!config.user.default_is_combo);
        assert!(config.saved_lang_combos.is_empty());
    }

    #[test]
    fn restore_defaults_keeps_combinations_and_engine_path() {
        let mut store = SettingsStore::in_memory();
        store.set_bool(BoolKey::DisableShortcuts, true);
        store.set_str(StrKey::SaveTextPath, "/tmp/out");
        store.set_str(StrKey::TesseractPath, "/opt/tesseract/bin/tesseract");
        store.insert_combo("eng+jpn");

        store.restore_defaults();

        assert!(!store.get_bool(BoolKey::DisableShortcuts));
        assert_eq!(store.get_str(StrKey::SaveTextPath), "");
        assert_eq!(store.get_str(StrKey::TesseractPath), "/opt/tesseract/bin/tesseract");
        assert_eq!(store.combo_keys(), vec!["eng+jpn"]);
    }

    #[test]
    fn combo_insert_and_remove_report_changes() {
        let mut store = SettingsStore::in_memory();
        assert!(store.insert_combo("eng+fra"));
        assert!(!store.insert_combo("eng+fra"));
        assert_eq!(store.combo_keys(), vec!["eng+fra"]);
        assert!(store.remove_combo("eng+fra"));
        assert!(!store.remove_combo("eng+fra"));
    }

    #[test]
    fn in_memory_store_save_is_a_no_op() {
        let store = SettingsStore::in_memory();
        assert!(store.path().is_none());
        assert!(store.save().is_ok());
    }

    #[test]
    fn file_dialogs_start_on_the_desktop() {
        let desktop = directories::UserDirs::new().and_then(|d| d.desktop_dir().map(|p| p.to_path_buf()));
        if let Some(desktop) = desktop {
            assert_eq!(UserConfig::default().last_dir, desktop);
        }
    }
}
