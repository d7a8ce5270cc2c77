use super::catalog::{compare_names, Catalog, Language};
use super::{LanguageError, LanguageResult};

const SEPARATOR: char = '+';

/// A main OCR language plus additional languages kept in display-name order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageSelection {
    main: Language,
    additional: Vec<Language>,
}

impl LanguageSelection {
    pub fn new(main: Language) -> Self {
        Self {
            main,
            additional: Vec::new(),
        }
    }

    pub fn main(&self) -> &Language {
        &self.main
    }

    pub fn additional(&self) -> &[Language] {
        &self.additional
    }

    pub fn additional_names(&self) -> impl Iterator<Item = &str> {
        self.additional.iter().map(|l| l.name.as_str())
    }

    pub fn is_combination(&self) -> bool {
        !self.additional.is_empty()
    }

    /// Replaces the main language. The additional list is left untouched even
    /// if it already holds `main`.
    pub fn set_main_language(&mut self, main: Language) {
        self.main = main;
    }

    /// Inserts `language` in order and returns its position, or `None` when it
    /// is the main language or already present.
    pub fn add_additional(&mut self, language: Language) -> Option<usize> {
        if language.name == self.main.name {
            return None;
        }
        match self
            .additional
            .binary_search_by(|probe| compare_names(&probe.name, &language.name))
        {
            Ok(_) => None,
            Err(index) => {
                self.additional.insert(index, language);
                Some(index)
            }
        }
    }

    pub fn remove_additional(&mut self, name: &str) -> bool {
        match self.additional.iter().position(|l| l.name == name) {
            Some(index) => {
                self.additional.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear_additional(&mut self) {
        self.additional.clear();
    }

    /// Engine parameter string: the main code, then `+code` per additional
    /// language.
    pub fn serialize(&self) -> String {
        let mut param = self.main.code.clone();
        for language in &self.additional {
            param.push(SEPARATOR);
            param.push_str(&language.code);
        }
        param
    }

    /// Parses a parameter string produced by [`LanguageSelection::serialize`]
    /// against the currently installed languages.
    pub fn deserialize(combo: &str, catalog: &Catalog) -> LanguageResult<Self> {
        let mut codes = combo
            .split(SEPARATOR)
            .map(str::trim)
            .filter(|code| !code.is_empty());

        let main_code = codes
            .next()
            .ok_or_else(|| LanguageError::EmptyCombination(combo.to_string()))?;
        let mut selection = Self::new(catalog.language_by_code(main_code)?);
        for code in codes {
            selection.add_additional(catalog.language_by_code(code)?);
        }
        Ok(selection)
    }
}
