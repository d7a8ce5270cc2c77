use crate::config::{BoolKey, SettingsStore, StrKey, FALLBACK_MAIN_LANGUAGE};

use super::catalog::{Catalog, Language};
use super::selection::LanguageSelection;
use super::{LanguageError, LanguageResult};

/// Current language choice backed by the installed catalog and the saved
/// combinations in the settings store.
#[derive(Debug, Clone)]
pub struct LanguageModel {
    catalog: Catalog,
    selection: LanguageSelection,
}

impl LanguageModel {
    pub fn new(catalog: Catalog, store: &SettingsStore) -> LanguageResult<Self> {
        let selection = startup_selection(&catalog, store)?;
        Ok(Self { catalog, selection })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn selection(&self) -> &LanguageSelection {
        &self.selection
    }

    /// Engine parameter string for the current selection.
    pub fn parameter(&self) -> String {
        self.selection.serialize()
    }

    /// Replaces the main language. A matching entry in the additional list is
    /// dropped so the code never appears twice; returns whether that happened.
    pub fn set_main_language(&mut self, name: &str) -> LanguageResult<bool> {
        let language = self.catalog.language(name)?;
        let removed = self.selection.remove_additional(&language.name);
        self.selection.set_main_language(language);
        Ok(removed)
    }

    pub fn add_additional(&mut self, name: &str) -> LanguageResult<Option<usize>> {
        let language = self.catalog.language(name)?;
        Ok(self.selection.add_additional(language))
    }

    pub fn remove_additional(&mut self, name: &str) -> bool {
        self.selection.remove_additional(name)
    }

    /// Saves the current combination under its own serialized string. Returns
    /// the saved key, or `None` when there are no additional languages.
    pub fn save_combination(&self, store: &mut SettingsStore) -> LanguageResult<Option<String>> {
        if !self.selection.is_combination() {
            return Ok(None);
        }
        let key = self.selection.serialize();
        if store.insert_combo(key.clone()) {
            store.save()?;
            tracing::info!(combination = %key, "saved language combination");
        }
        Ok(Some(key))
    }

    /// Removes a saved combination. When none remain and the startup default
    /// was a combination, the default falls back to the current main language.
    /// The selection is then reset to the configured default.
    pub fn delete_combination(&mut self, name: &str, store: &mut SettingsStore) -> LanguageResult<bool> {
        let removed = store.remove_combo(name);
        if store.combo_keys().is_empty() && store.get_bool(BoolKey::DefaultIsCombo) {
            self.selection.clear_additional();
            self.write_main_default(store);
            tracing::info!("last saved combination removed, startup default reset");
        }
        store.save()?;
        self.reset_to_defaults(store)?;
        Ok(removed)
    }

    /// Makes the current main language (without additions) the startup default.
    pub fn set_as_default(&self, store: &mut SettingsStore) -> LanguageResult<()> {
        self.write_main_default(store);
        store.save()?;
        Ok(())
    }

    /// Makes the current combination the startup default. Does nothing unless
    /// at least one combination has been saved.
    pub fn set_combo_as_default(&self, store: &mut SettingsStore) -> LanguageResult<bool> {
        if store.combo_keys().is_empty() {
            return Ok(false);
        }
        store.set_bool(BoolKey::DefaultIsCombo, true);
        store.set_str(StrKey::DefaultLangCombo, self.selection.serialize());
        store.save()?;
        Ok(true)
    }

    /// Replaces the main and additional languages with a saved combination.
    pub fn apply_combination(&mut self, combo: &str) -> LanguageResult<()> {
        self.selection = LanguageSelection::deserialize(combo, &self.catalog)?;
        Ok(())
    }

    /// Saved combinations usable with the installed languages.
    pub fn saved_combinations(&self, store: &SettingsStore) -> Vec<String> {
        store
            .combo_keys()
            .into_iter()
            .filter(|key| match LanguageSelection::deserialize(key, &self.catalog) {
                Ok(_) => true,
                Err(err) => {
                    tracing::warn!(combination = %key, error = %err, "skipping saved combination");
                    false
                }
            })
            .collect()
    }

    pub fn reset_to_defaults(&mut self, store: &SettingsStore) -> LanguageResult<()> {
        self.selection = startup_selection(&self.catalog, store)?;
        Ok(())
    }

    fn write_main_default(&self, store: &mut SettingsStore) {
        store.set_str(StrKey::DefaultLangMain, self.selection.main().name.clone());
        store.set_bool(BoolKey::DefaultIsCombo, false);
        store.set_str(StrKey::DefaultLangCombo, "");
    }
}

/// The selection to show at startup. A stale default combination or main
/// language falls back to "English", then to the first installed language.
pub fn startup_selection(catalog: &Catalog, store: &SettingsStore) -> LanguageResult<LanguageSelection> {
    if store.get_bool(BoolKey::DefaultIsCombo) {
        let combo = store.get_str(StrKey::DefaultLangCombo);
        match LanguageSelection::deserialize(&combo, catalog) {
            Ok(selection) => return Ok(selection),
            Err(err) => {
                tracing::warn!(combination = %combo, error = %err, "default combination unavailable");
            }
        }
    }

    let main = store.get_str(StrKey::DefaultLangMain);
    let language = match catalog.language(&main) {
        Ok(language) => language,
        Err(_) => fallback_language(catalog, &main)?,
    };
    Ok(LanguageSelection::new(language))
}

fn fallback_language(catalog: &Catalog, configured: &str) -> LanguageResult<Language> {
    tracing::warn!(language = %configured, "default language is not installed");
    catalog
        .language(FALLBACK_MAIN_LANGUAGE)
        .ok()
        .or_else(|| catalog.first())
        .ok_or(LanguageError::NoLanguagesInstalled)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(store: &SettingsStore) -> LanguageModel {
        let catalog = Catalog::build(["eng", "fra", "deu", "jpn"]);
        LanguageModel::new(catalog, store).unwrap()
    }

    #[test]
    fn starts_with_configured_main_language() {
        let mut store = SettingsStore::in_memory();
        store.set_str(StrKey::DefaultLangMain, "German");
        let model = model(&store);
        assert_eq!(model.parameter(), "deu");
    }

    #[test]
    fn promoting_an_additional_language_removes_it_from_the_list() {
        let mut store = SettingsStore::in_memory();
        let mut model = model(&store);
        model.add_additional("French").unwrap();
        model.add_additional("German").unwrap();

        assert!(model.set_main_language("French").unwrap());
        assert_eq!(model.parameter(), "fra+deu");

        let key = model.save_combination(&mut store).unwrap().unwrap();
        let saved = model.selection().clone();
        model.reset_to_defaults(&store).unwrap();
        model.apply_combination(&key).unwrap();
        assert_eq!(model.selection(), &saved);
    }

    #[test]
    fn promoting_the_only_additional_language_leaves_nothing_to_save() {
        let mut store = SettingsStore::in_memory();
        let mut model = model(&store);
        model.add_additional("French").unwrap();

        assert!(model.set_main_language("French").unwrap());
        assert_eq!(model.parameter(), "fra");
        assert_eq!(model.save_combination(&mut store).unwrap(), None);
        assert!(store.combo_keys().is_empty());
        assert!(!model.set_main_language("German").unwrap());
    }

    #[test]
    fn save_without_additional_languages_is_a_no_op() {
        let mut store = SettingsStore::in_memory();
        let model = model(&store);

        assert_eq!(model.save_combination(&mut store).unwrap(), None);
        assert!(store.combo_keys().is_empty());
    }

    #[test]
    fn saved_combination_restores_selection_after_reset() {
        let mut store = SettingsStore::in_memory();
        let mut model = model(&store);
        model.set_main_language("French").unwrap();
        model.add_additional("Japanese").unwrap();
        model.add_additional("English").unwrap();

        let key = model.save_combination(&mut store).unwrap().unwrap();
        assert_eq!(key, "fra+eng+jpn");
        let saved = model.selection().clone();

        model.reset_to_defaults(&store).unwrap();
        assert_eq!(model.parameter(), "eng");

        model.apply_combination(&key).unwrap();
        assert_eq!(model.selection(), &saved);
    }

    #[test]
    fn combo_default_requires_a_saved_combination() {
        let mut store = SettingsStore::in_memory();
        let mut model = model(&store);
        model.add_additional("French").unwrap();

        assert!(!model.set_combo_as_default(&mut store).unwrap());
        assert!(!store.get_bool(BoolKey::DefaultIsCombo));

        model.save_combination(&mut store).unwrap();
        assert!(model.set_combo_as_default(&mut store).unwrap());
        assert!(store.get_bool(BoolKey::DefaultIsCombo));
        assert_eq!(store.get_str(StrKey::DefaultLangCombo), "eng+fra");

        let restarted = LanguageModel::new(model.catalog().clone(), &store).unwrap();
        assert_eq!(restarted.parameter(), "eng+fra");
    }

    #[test]
    fn set_as_default_clears_combo_default() {
        let mut store = SettingsStore::in_memory();
        let mut model = model(&store);
        model.add_additional("French").unwrap();
        model.save_combination(&mut store).unwrap();
        model.set_combo_as_default(&mut store).unwrap();

        model.set_main_language("German").unwrap();
        model.set_as_default(&mut store).unwrap();

        assert!(!store.get_bool(BoolKey::DefaultIsCombo));
        assert_eq!(store.get_str(StrKey::DefaultLangCombo), "");
        assert_eq!(store.get_str(StrKey::DefaultLangMain), "German");
    }

    #[test]
    fn deleting_last_default_combination_resets_default() {
        let mut store = SettingsStore::in_memory();
        let mut model = model(&store);
        model.set_main_language("Japanese").unwrap();
        model.add_additional("French").unwrap();
        model.save_combination(&mut store).unwrap();
        model.set_combo_as_default(&mut store).unwrap();

        assert!(model.delete_combination("jpn+fra", &mut store).unwrap());

        assert!(store.combo_keys().is_empty());
        assert!(!store.get_bool(BoolKey::DefaultIsCombo));
        assert_eq!(store.get_str(StrKey::DefaultLangMain), "Japanese");
        assert_eq!(model.parameter(), "jpn");
    }

    #[test]
    fn deleting_one_of_several_combinations_keeps_default() {
        let mut store = SettingsStore::in_memory();
        store.insert_combo("eng+fra");
        store.insert_combo("eng+deu");
        store.set_bool(BoolKey::DefaultIsCombo, true);
        store.set_str(StrKey::DefaultLangCombo, "eng+fra");
        let mut model = model(&store);

        model.delete_combination("eng+deu", &mut store).unwrap();

        assert!(store.get_bool(BoolKey::DefaultIsCombo));
        assert_eq!(model.parameter(), "eng+fra");
    }

    #[test]
    fn stale_combinations_are_skipped() {
        let mut store = SettingsStore::in_memory();
        store.insert_combo("eng+fra");
        store.insert_combo("eng+kor");
        let model = model(&store);

        assert_eq!(model.saved_combinations(&store), vec!["eng+fra"]);
    }

    #[test]
    fn stale_default_falls_back_to_english_then_first() {
        let mut store = SettingsStore::in_memory();
        store.set_bool(BoolKey::DefaultIsCombo, true);
        store.set_str(StrKey::DefaultLangCombo, "kor+eng");
        store.set_str(StrKey::DefaultLangMain, "Korean");
        assert_eq!(model(&store).parameter(), "eng");

        let no_english = Catalog::build(["fra", "deu"]);
        let selection = startup_selection(&no_english, &store).unwrap();
        assert_eq!(selection.main().name, "French");
    }

    #[test]
    fn empty_catalog_is_an_error() {
        let store = SettingsStore::in_memory();
        let err = LanguageModel::new(Catalog::build(Vec::<String>::new()), &store).unwrap_err();
        assert!(matches!(err, LanguageError::NoLanguagesInstalled));
    }

    #[test]
    fn unknown_names_are_rejected() {
        let store = SettingsStore::in_memory();
        let mut model = model(&store);
        assert!(model.set_main_language("Klingon").is_err());
        assert!(model.add_additional("Klingon").is_err());
        assert_eq!(model.parameter(), "eng");
    }
}
