//! # Proper-Noun Dictionary
//!
//! Known names whose spelling no phonetic rule reproduces (दिल्ली, not
//! देल्हि). A hit is returned verbatim and wins over every other step.
//!
//! Keys may span several words (`Chitra Mandir`). Whitespace inside a key is
//! collapsed to single spaces when it is stored.

use std::collections::HashMap;

/// Built-in entries: cities and names that recur on distribution invoices.
const BUILTIN: &[(&str, &str)] = &[
    ("Mumbai", "मुंबई"),
    ("Delhi", "दिल्ली"),
    ("Pune", "पुणे"),
    ("Nagpur", "नागपूर"),
    ("Nashik", "नाशिक"),
    ("Bhaskar", "भास्कर"),
    ("Kolhapur", "कोल्हापूर"),
    ("Aurangabad", "औरंगाबाद"),
    ("Thane", "ठाणे"),
    ("Satara", "सातारा"),
    ("Sangli", "सांगली"),
    ("Solapur", "सोलापूर"),
    ("Maharashtra", "महाराष्ट्र"),
];

/// Immutable lookup table of proper nouns.
///
/// Entries are stored under their original spelling and under their
/// lowercase form, so `Mumbai`, `mumbai` and `MUMBAI` all hit.
#[derive(Debug, Clone)]
pub struct Dictionary {
    exact: HashMap<String, String>,
    folded: HashMap<String, String>,
    max_phrase_words: usize,
}

/// Collapses whitespace runs to single spaces and trims the ends.
pub fn normalize_phrase(phrase: &str) -> String {
    phrase.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl Dictionary {
    /// Dictionary holding only the built-in entries.
    pub fn builtin() -> Self {
        Self::with_entries(std::iter::empty::<(String, String)>())
    }

    /// Built-in entries plus `extra`, which override built-ins on conflict.
    pub fn with_entries<I, K, V>(extra: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut dict = Dictionary {
            exact: HashMap::new(),
            folded: HashMap::new(),
            max_phrase_words: 1,
        };
        for (k, v) in BUILTIN {
            dict.insert(*k, *v);
        }
        for (k, v) in extra {
            dict.insert(k, v);
        }
        dict
    }

    fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = normalize_phrase(&key.into());
        let value = value.into();
        self.max_phrase_words = self.max_phrase_words.max(key.split(' ').count());
        self.folded.insert(key.to_lowercase(), value.clone());
        self.exact.insert(key, value);
    }

    /// Exact-case lookup first, then lowercase.
    pub fn lookup(&self, word: &str) -> Option<&str> {
        self.exact
            .get(word)
            .or_else(|| self.folded.get(&word.to_lowercase()))
            .map(String::as_str)
    }

    /// Word count of the longest key.
    pub fn max_phrase_words(&self) -> usize {
        self.max_phrase_words
    }

    pub fn len(&self) -> usize {
        self.exact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup_is_case_insensitive() {
        let dict = Dictionary::builtin();
        assert_eq!(dict.lookup("Mumbai"), Some("मुंबई"));
        assert_eq!(dict.lookup("mumbai"), Some("मुंबई"));
        assert_eq!(dict.lookup("DELHI"), Some("दिल्ली"));
        assert_eq!(dict.lookup("Goa"), None);
        assert_eq!(dict.len(), BUILTIN.len());
    }

    #[test]
    fn test_extra_entries_override_builtin() {
        let dict = Dictionary::with_entries([("Pune", "पुणें"), ("Prabhat", "प्रभात")]);
        assert_eq!(dict.lookup("pune"), Some("पुणें"));
        assert_eq!(dict.lookup("PRABHAT"), Some("प्रभात"));
        assert_eq!(dict.lookup("Thane"), Some("ठाणे"));
    }

    #[test]
    fn test_exact_case_wins_over_folded() {
        let dict = Dictionary::with_entries([("sangli", "सांगलि")]);
        assert_eq!(dict.lookup("Sangli"), Some("सांगली"));
        assert_eq!(dict.lookup("sangli"), Some("सांगलि"));
    }

    #[test]
    fn test_phrase_keys_are_normalized() {
        let dict = Dictionary::builtin();
        assert_eq!(dict.max_phrase_words(), 1);

        let dict = Dictionary::with_entries([("  Chitra \t Mandir ", "चित्र मंदिर")]);
        assert_eq!(dict.lookup("Chitra Mandir"), Some("चित्र मंदिर"));
        assert_eq!(dict.lookup("chitra mandir"), Some("चित्र मंदिर"));
        assert_eq!(dict.max_phrase_words(), 2);
        assert_eq!(normalize_phrase(" a \n b  c"), "a b c");
    }
}
