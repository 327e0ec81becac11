use std::collections::HashMap;

/// Fixed language name to two-letter code mapping.
///
/// The table ships with a built-in set of entries and can be extended with
/// `insert` without changing any call sites that hold a `LanguageTable`.
#[derive(Debug, Clone)]
pub struct LanguageTable {
    names: HashMap<String, String>,
}

impl Default for LanguageTable {
    fn default() -> Self {
        let mut names = HashMap::new();
        for (name, code) in [
            ("english", "en"),
            ("hebrew", "he"),
            ("spanish", "es"),
            ("french", "fr"),
            ("german", "de"),
            ("italian", "it"),
            ("portuguese", "pt"),
            ("chinese", "zh"),
        ] {
            names.insert(name.to_string(), code.to_string());
        }
        Self { names }
    }
}

impl LanguageTable {
    /// Add or replace a name-to-code mapping.
    pub fn insert<S1: Into<String>, S2: Into<String>>(&mut self, name: S1, code: S2) {
        self.names.insert(name.into().to_lowercase(), code.into().to_lowercase());
    }

    /// Normalize a language identifier to a canonical two-letter code.
    ///
    /// Lower-cases and trims the input; recognized two-letter codes pass
    /// through; locale-qualified codes (`en-US`) truncate to the prefix;
    /// full names resolve through the table. Unknown inputs pass through
    /// lower-cased and trimmed rather than erroring.
    pub fn normalize(&self, lang: &str) -> String {
        let mut lang = lang.trim().to_lowercase();

        if lang.len() == 2 && self.names.values().any(|code| code == &lang) {
            return lang;
        }

        if let Some((prefix, _)) = lang.split_once('-') {
            lang = prefix.to_string();
        }

        self.names.get(&lang).cloned().unwrap_or(lang)
    }
}

/// Normalize a language identifier using the built-in table.
pub fn normalize_lang_code(lang: &str) -> String {
    LanguageTable::default().normalize(lang)
}

/// Convert a two-letter code to a full language name for prompts.
pub fn language_name(code: &str) -> String {
    match code.to_lowercase().as_str() {
        "en" => "English".to_string(),
        "he" => "Hebrew".to_string(),
        "es" => "Spanish".to_string(),
        "fr" => "French".to_string(),
        "de" => "German".to_string(),
        "it" => "Italian".to_string(),
        "pt" => "Portuguese".to_string(),
        "zh" => "Chinese".to_string(),
        "ja" => "Japanese".to_string(),
        "ko" => "Korean".to_string(),
        "ar" => "Arabic".to_string(),
        "ru" => "Russian".to_string(),
        _ => code.to_string(),
    }
}
