use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::{LanguageError, LanguageResult};

/// Friendly names for the language packs Tesseract ships.
static LANGUAGE_NAMES: &[(&str, &str)] = &[
    ("afr", "Afrikaans"),
    ("amh", "Amharic"),
    ("ara", "Arabic"),
    ("asm", "Assamese"),
    ("aze", "Azerbaijani"),
    ("aze_cyrl", "Azerbaijani - Cyrilic"),
    ("bel", "Belarusian"),
    ("ben", "Bengali"),
    ("bod", "Tibetan"),
    ("bos", "Bosnian"),
    ("bre", "Breton"),
    ("bul", "Bulgarian"),
    ("cat", "Catalan; Valencian"),
    ("ceb", "Cebuano"),
    ("ces", "Czech"),
    ("chi_sim", "Chinese - Simplified"),
    ("chi_tra", "Chinese - Traditional"),
    ("chr", "Cherokee"),
    ("cos", "Corsican"),
    ("cym", "Welsh"),
    ("dan", "Danish"),
    ("dan_frak", "Danish - Fraktur (contrib)"),
    ("deu", "German"),
    ("deu_frak", "German - Fraktur (contrib)"),
    ("dzo", "Dzongkha"),
    ("ell", "Greek, Modern (1453-)"),
    ("eng", "English"),
    ("enm", "English, Middle (1100-1500)"),
    ("epo", "Esperanto"),
    ("equ", "Math / equation detection module"),
    ("est", "Estonian"),
    ("eus", "Basque"),
    ("fao", "Faroese"),
    ("fas", "Persian"),
    ("fil", "Filipino (old - Tagalog)"),
    ("fin", "Finnish"),
    ("fra", "French"),
    ("frk", "German - Fraktur"),
    ("frm", "French, Middle (ca.1400-1600)"),
    ("fry", "Western Frisian"),
    ("gla", "Scottish Gaelic"),
    ("gle", "Irish"),
    ("glg", "Galician"),
    ("grc", "Greek, Ancient (to 1453) (contrib)"),
    ("guj", "Gujarati"),
    ("hat", "Haitian; Haitian Creole"),
    ("heb", "Hebrew"),
    ("hin", "Hindi"),
    ("hrv", "Croatian"),
    ("hun", "Hungarian"),
    ("hye", "Armenian"),
    ("iku", "Inuktitut"),
    ("ind", "Indonesian"),
    ("isl", "Icelandic"),
    ("ita", "Italian"),
    ("ita_old", "Italian - Old"),
    ("jav", "Javanese"),
    ("jpn", "Japanese"),
    ("kan", "Kannada"),
    ("kat", "Georgian"),
    ("kat_old", "Georgian - Old"),
    ("kaz", "Kazakh"),
    ("khm", "Central Khmer"),
    ("kir", "Kirghiz; Kyrgyz"),
    ("kmr", "Kurmanji (Kurdish - Latin Script)"),
    ("kor", "Korean"),
    ("kor_vert", "Korean (vertical)"),
    ("kur", "Kurdish (Arabic Script)"),
    ("lao", "Lao"),
    ("lat", "Latin"),
    ("lav", "Latvian"),
    ("lit", "Lithuanian"),
    ("ltz", "Luxembourgish"),
    ("mal", "Malayalam"),
    ("mar", "Marathi"),
    ("mkd", "Macedonian"),
    ("mlt", "Maltese"),
    ("mon", "Mongolian"),
    ("mri", "Maori"),
    ("msa", "Malay"),
    ("mya", "Burmese"),
    ("nep", "Nepali"),
    ("nld", "Dutch; Flemish"),
    ("nor", "Norwegian"),
    ("oci", "Occitan (post 1500)"),
    ("ori", "Oriya"),
    ("osd", "Orientation and script detection module"),
    ("pan", "Panjabi; Punjabi"),
    ("pol", "Polish"),
    ("por", "Portuguese"),
    ("pus", "Pushto; Pashto"),
    ("que", "Quechua"),
    ("ron", "Romanian; Moldavian; Moldovan"),
    ("rus", "Russian"),
    ("san", "Sanskrit"),
    ("sin", "Sinhala; Sinhalese"),
    ("slk", "Slovak"),
    ("slk_frak", "Slovak - Fraktur (contrib)"),
    ("slv", "Slovenian"),
    ("snd", "Sindhi"),
    ("spa", "Spanish; Castilian"),
    ("spa_old", "Spanish; Castilian - Old"),
    ("sqi", "Albanian"),
    ("srp", "Serbian"),
    ("srp_latn", "Serbian - Latin"),
    ("sun", "Sundanese"),
    ("swa", "Swahili"),
    ("swe", "Swedish"),
    ("syr", "Syriac"),
    ("tam", "Tamil"),
    ("tat", "Tatar"),
    ("tel", "Telugu"),
    ("tgk", "Tajik"),
    ("tgl", "Tagalog (new - Filipino)"),
    ("tha", "Thai"),
    ("tir", "Tigrinya"),
    ("ton", "Tonga"),
    ("tur", "Turkish"),
    ("uig", "Uighur; Uyghur"),
    ("ukr", "Ukrainian"),
    ("urd", "Urdu"),
    ("uzb", "Uzbek"),
    ("uzb_cyrl", "Uzbek - Cyrilic"),
    ("vie", "Vietnamese"),
    ("yid", "Yiddish"),
    ("yor", "Yoruba"),
];

fn known_display_name(code: &str) -> Option<&'static str> {
    LANGUAGE_NAMES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, name)| *name)
}

/// Case-insensitive ordering used for every list of display names.
pub(crate) fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Language {
    pub code: String,
    pub name: String,
}

/// Two installed codes that resolved to the same display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameCollision {
    pub name: String,
    pub kept_code: String,
    pub renamed_code: String,
    pub renamed_to: String,
}

/// Installed engine languages with a 1:1 code/display-name mapping.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    by_code: BTreeMap<String, String>,
    by_name: BTreeMap<String, String>,
    names: Vec<String>,
    collisions: Vec<NameCollision>,
}

impl Catalog {
    /// Builds the catalog, resolving duplicate display names deterministically.
    /// Codes from the known-language table are visited first, then the rest,
    /// each group in case-insensitive order. The first code keeps the name and
    /// later ones become `"Name (code)"`.
    pub fn build<I, S>(installed_codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut catalog = Self::default();
        for code in sorted_codes(installed_codes) {
            let name = resolve_name(&code);
            if catalog.by_name.contains_key(&name) {
                let renamed_to = catalog.unique_name(&name, &code);
                let kept_code = catalog.by_name[&name].clone();
                tracing::warn!(
                    %name,
                    %kept_code,
                    renamed_code = %code,
                    %renamed_to,
                    "installed languages share a display name"
                );
                catalog.collisions.push(NameCollision {
                    name,
                    kept_code,
                    renamed_code: code.clone(),
                    renamed_to: renamed_to.clone(),
                });
                catalog.insert(code, renamed_to);
            } else {
                catalog.insert(code, name);
            }
        }
        catalog.names.sort_by(|a, b| compare_names(a, b));
        tracing::debug!(languages = catalog.len(), "built language catalog");
        catalog
    }

    fn insert(&mut self, code: String, name: String) {
        self.by_name.insert(name.clone(), code.clone());
        self.by_code.insert(code, name.clone());
        self.names.push(name);
    }

    fn unique_name(&self, name: &str, code: &str) -> String {
        let mut candidate = format!("{name} ({code})");
        while self.by_name.contains_key(&candidate) {
            candidate = format!("{candidate} ({code})");
        }
        candidate
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }

    /// Display names, sorted case-insensitively.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn collisions(&self) -> &[NameCollision] {
        &self.collisions
    }

    pub fn name_for(&self, code: &str) -> Option<&str> {
        self.by_code.get(code).map(String::as_str)
    }

    pub fn code_for(&self, name: &str) -> Option<&str> {
        self.by_name.get(name).map(String::as_str)
    }

    pub fn language(&self, name: &str) -> LanguageResult<Language> {
        self.code_for(name)
            .map(|code| Language {
                code: code.to_string(),
                name: name.to_string(),
            })
            .ok_or_else(|| LanguageError::UnknownLanguage(name.to_string()))
    }

    pub fn language_by_code(&self, code: &str) -> LanguageResult<Language> {
        self.name_for(code)
            .map(|name| Language {
                code: code.to_string(),
                name: name.to_string(),
            })
            .ok_or_else(|| LanguageError::UnknownCode(code.to_string()))
    }

    pub fn first(&self) -> Option<Language> {
        self.names.first().and_then(|name| self.language(name).ok())
    }
}

fn sorted_codes<I, S>(codes: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut codes: Vec<String> = codes
        .into_iter()
        .map(|c| c.as_ref().trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();
    codes.sort_by(|a, b| compare_names(a, b));
    codes.dedup();
    let (known, custom): (Vec<String>, Vec<String>) = codes
        .into_iter()
        .partition(|code| known_display_name(code).is_some());
    known.into_iter().chain(custom).collect()
}

fn resolve_name(code: &str) -> String {
    known_display_name(code)
        .map(str::to_string)
        .unwrap_or_else(|| code.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_resolve_to_friendly_names() {
        let catalog = Catalog::build(["eng", "fra"]);
        assert_eq!(catalog.name_for("eng"), Some("English"));
        assert_eq!(catalog.name_for("fra"), Some("French"));
        assert_eq!(catalog.code_for("French"), Some("fra"));
    }

    #[test]
    fn unknown_code_falls_back_to_itself() {
        let catalog = Catalog::build(["eng", "xyz_custom"]);
        assert_eq!(catalog.name_for("xyz_custom"), Some("xyz_custom"));
        assert_eq!(catalog.code_for("xyz_custom"), Some("xyz_custom"));
    }

    #[test]
    fn forward_and_inverse_maps_agree() {
        let catalog = Catalog::build(["eng", "deu", "chi_sim", "osd", "jpn"]);
        for name in catalog.names() {
            let code = catalog.code_for(name).expect("inverse entry");
            assert_eq!(catalog.name_for(code), Some(name.as_str()));
        }
        assert_eq!(catalog.len(), 5);
    }

    #[test]
    fn names_are_sorted_case_insensitively() {
        let catalog = Catalog::build(["eng", "aaa", "Zed", "bul"]);
        assert_eq!(catalog.names(), &["aaa", "Bulgarian", "English", "Zed"]);
    }

    #[test]
    fn duplicate_and_blank_codes_are_ignored() {
        let catalog = Catalog::build(["eng", "eng", " ", "fra "]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.code_for("French"), Some("fra"));
    }

    #[test]
    fn known_code_keeps_its_name_over_a_custom_code() {
        // An unlisted code spelled "English" resolves to itself and would sort
        // before "eng" byte-wise.
        for codes in [["eng", "English"], ["English", "eng"]] {
            let catalog = Catalog::build(codes);
            assert_eq!(catalog.len(), 2);
            assert_eq!(catalog.code_for("English"), Some("eng"));
            assert_eq!(catalog.name_for("English"), Some("English (English)"));
            assert_eq!(
                catalog.collisions(),
                &[NameCollision {
                    name: "English".to_string(),
                    kept_code: "eng".to_string(),
                    renamed_code: "English".to_string(),
                    renamed_to: "English (English)".to_string(),
                }]
            );
        }
    }

    #[test]
    fn custom_codes_collide_in_case_insensitive_order() {
        // "French" is the table name for "fra"; both custom spellings lose to it.
        let catalog = Catalog::build(["french", "French", "fra"]);
        assert_eq!(catalog.code_for("French"), Some("fra"));
        assert_eq!(catalog.name_for("French"), Some("French (French)"));
        assert_eq!(catalog.name_for("french"), Some("french"));
    }

    #[test]
    fn lookups_report_unknown_entries() {
        let catalog = Catalog::build(["eng"]);
        assert!(matches!(catalog.language("Klingon"), Err(LanguageError::UnknownLanguage(_))));
        assert!(matches!(catalog.language_by_code("tlh"), Err(LanguageError::UnknownCode(_))));
    }

    #[test]
    fn table_has_no_duplicate_codes() {
        let mut codes: Vec<&str> = LANGUAGE_NAMES.iter().map(|(code, _)| *code).collect();
        let total = codes.len();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), total);
    }
}
