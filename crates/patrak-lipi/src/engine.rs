//! # Transliteration Engine
//!
//! Orchestrates dictionary, external backend and phonetic fallback over
//! whole strings.
//!
//! ## Per-Word Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  word                                                                   │
//! │   │                                                                     │
//! │   ├─► 1. Dictionary (exact, then lowercase) ──hit──► Dictionary         │
//! │   │                                                                     │
//! │   ├─► 2. Any Devanagari code point? ─────────yes──► Native              │
//! │   │                                                                     │
//! │   ├─► 3. External backend (async path only) ─ok───► External           │
//! │   │       disabled / timed out / failed / no improvement                │
//! │   │                                                                     │
//! │   └─► 4. Local phonetic rules ────────────────────► Phonetic           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Whole Text
//! Digits are converted to Devanagari first. The text is then split into
//! word runs and separator runs (whitespace, punctuation, digits); only word
//! runs are transliterated and the pieces are joined back in order, so
//! separators survive byte for byte. A run of words joined by whitespace
//! that matches a multi-word dictionary entry is replaced as one unit; the
//! longest match wins.
//!
//! Nothing here returns an error. The worst case is the digit-converted
//! input.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use ts_rs::TS;

use patrak_core::numerals::{is_devanagari, to_devanagari_digits, NumeralScript};

use crate::backend::BackendService;
use crate::config::LipiConfig;
use crate::dictionary::{normalize_phrase, Dictionary};
use crate::phonetic::transliterate_phonetic;

// =============================================================================
// Result Types
// =============================================================================

/// Where a transliteration came from, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// No step could improve the input; it is returned as typed.
    Unchanged,
    /// Local phonetic rules.
    Phonetic,
    /// External backend.
    External,
    /// Already in Devanagari, or no words to transliterate.
    Native,
    /// Known proper noun.
    Dictionary,
}

/// Transliterated text plus the weakest confidence among its words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TransliterationResult {
    pub text: String,
    pub confidence: Confidence,
}

impl TransliterationResult {
    fn new(text: impl Into<String>, confidence: Confidence) -> Self {
        TransliterationResult {
            text: text.into(),
            confidence,
        }
    }
}

// =============================================================================
// Tokenizer
// =============================================================================

/// A run of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Word(&'a str),
    Separator(&'a str),
}

const DANDA: char = '\u{0964}';
const DOUBLE_DANDA: char = '\u{0965}';

fn is_word_char(c: char) -> bool {
    if NumeralScript::of(c).is_some() || c == DANDA || c == DOUBLE_DANDA {
        return false;
    }
    c.is_alphabetic() || is_devanagari(c)
}

/// Splits `text` into alternating word and separator runs.
///
/// Concatenating the runs gives back `text` exactly.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_word: Option<bool> = None;

    for (idx, c) in text.char_indices() {
        let word = is_word_char(c);
        match in_word {
            Some(prev) if prev != word => {
                tokens.push(make_token(&text[start..idx], prev));
                start = idx;
            }
            _ => {}
        }
        in_word = Some(word);
    }
    if let Some(word) = in_word {
        tokens.push(make_token(&text[start..], word));
    }
    tokens
}

impl<'a> Token<'a> {
    pub fn as_str(&self) -> &'a str {
        match self {
            Token::Word(s) | Token::Separator(s) => s,
        }
    }
}

fn make_token(run: &str, word: bool) -> Token<'_> {
    if word {
        Token::Word(run)
    } else {
        Token::Separator(run)
    }
}

// =============================================================================
// Transliterator
// =============================================================================

/// The engine. Cheap to clone; clones share the dictionary and the backend
/// load state.
#[derive(Debug, Clone)]
pub struct Transliterator {
    dictionary: Arc<Dictionary>,
    backend: BackendService,
}

impl Default for Transliterator {
    fn default() -> Self {
        Self::local()
    }
}

impl Transliterator {
    pub fn new(dictionary: Dictionary, backend: BackendService) -> Self {
        Transliterator {
            dictionary: Arc::new(dictionary),
            backend,
        }
    }

    /// Built-in dictionary and no backend.
    pub fn local() -> Self {
        Self::new(Dictionary::builtin(), BackendService::disabled())
    }

    /// Dictionary additions and backend settings from `config`.
    pub fn from_config(config: &LipiConfig) -> Self {
        Self::new(
            Dictionary::with_entries(config.dictionary.entries.clone()),
            BackendService::from_config(config),
        )
    }

    pub fn backend(&self) -> &BackendService {
        &self.backend
    }

    /// Steps 1 and 2: answers that need no transliteration work.
    fn resolve_fixed(&self, word: &str) -> Option<TransliterationResult> {
        if let Some(hit) = self.dictionary.lookup(word) {
            debug!(word = %word, "Dictionary hit");
            return Some(TransliterationResult::new(hit, Confidence::Dictionary));
        }
        if word.chars().any(is_devanagari) {
            return Some(TransliterationResult::new(word, Confidence::Native));
        }
        None
    }

    fn phonetic(word: &str) -> TransliterationResult {
        let out = transliterate_phonetic(word);
        if out == word {
            TransliterationResult::new(out, Confidence::Unchanged)
        } else {
            TransliterationResult::new(out, Confidence::Phonetic)
        }
    }

    /// Transliterates one word without consulting the backend.
    pub fn transliterate_word_local(&self, word: &str) -> TransliterationResult {
        self.resolve_fixed(word)
            .unwrap_or_else(|| Self::phonetic(word))
    }

    /// Transliterates one word, trying the backend before the local rules.
    pub async fn transliterate_word(&self, word: &str) -> TransliterationResult {
        if let Some(fixed) = self.resolve_fixed(word) {
            return fixed;
        }

        if self.backend.is_enabled() {
            match self.backend.best_attempt(word).await {
                Ok(Some(out)) => return TransliterationResult::new(out, Confidence::External),
                Ok(None) => debug!(word = %word, "Backend gave no improvement, using phonetic rules"),
                Err(e) => debug!(word = %word, error = %e, "Backend unavailable, using phonetic rules"),
            }
        }

        Self::phonetic(word)
    }

    /// Splits `text` into verbatim separators, dictionary phrases and single
    /// words left for the per-word pipeline.
    fn segments<'a>(&self, text: &'a str) -> Vec<Segment<'a>> {
        let tokens = tokenize(text);
        let mut starts = Vec::with_capacity(tokens.len());
        let mut pos = 0;
        for token in &tokens {
            starts.push(pos);
            pos += token.as_str().len();
        }

        let mut segments = Vec::with_capacity(tokens.len());
        let mut i = 0;
        while i < tokens.len() {
            match tokens[i] {
                Token::Separator(s) => {
                    segments.push(Segment::Verbatim(s));
                    i += 1;
                }
                Token::Word(w) => match self.phrase_at(text, &tokens, &starts, i) {
                    Some((hit, next)) => {
                        segments.push(Segment::Phrase(hit));
                        i = next;
                    }
                    None => {
                        segments.push(Segment::Word(w));
                        i += 1;
                    }
                },
            }
        }
        segments
    }

    /// Longest multi-word dictionary entry starting at word token `i`.
    ///
    /// Words may only be joined by whitespace. Returns the entry and the
    /// index of the first token after the phrase.
    fn phrase_at(
        &self,
        text: &str,
        tokens: &[Token<'_>],
        starts: &[usize],
        i: usize,
    ) -> Option<(String, usize)> {
        let max_words = self.dictionary.max_phrase_words();
        let mut last_words = Vec::new();
        let mut j = i;
        while last_words.len() + 1 < max_words {
            match (tokens.get(j + 1), tokens.get(j + 2)) {
                (Some(Token::Separator(sep)), Some(Token::Word(_)))
                    if sep.chars().all(char::is_whitespace) =>
                {
                    j += 2;
                    last_words.push(j);
                }
                _ => break,
            }
        }

        last_words.into_iter().rev().find_map(|j| {
            let end = starts[j] + tokens[j].as_str().len();
            let phrase = normalize_phrase(&text[starts[i]..end]);
            self.dictionary.lookup(&phrase).map(|hit| {
                debug!(phrase = %phrase, "Dictionary phrase hit");
                (hit.to_string(), j + 1)
            })
        })
    }

    /// Transliterates a whole string using only local steps.
    ///
    /// ## Example
    /// ```rust
    /// use patrak_lipi::engine::{Confidence, Transliterator};
    ///
    /// let t = Transliterator::local();
    /// let r = t.transliterate_text_local("Mumbai, Screen 2");
    /// assert!(r.text.starts_with("मुंबई, "));
    /// assert!(r.text.ends_with(" २"));
    /// assert_eq!(r.confidence, Confidence::Phonetic);
    /// ```
    pub fn transliterate_text_local(&self, text: &str) -> TransliterationResult {
        let converted = to_devanagari_digits(text);
        let mut out = Assembled::with_capacity(converted.len() * 2);

        for segment in self.segments(&converted) {
            match segment {
                Segment::Verbatim(s) => out.text.push_str(s),
                Segment::Phrase(hit) => out.push(TransliterationResult::new(hit, Confidence::Dictionary)),
                Segment::Word(w) => out.push(self.transliterate_word_local(w)),
            }
        }

        out.finish()
    }

    /// Transliterates a whole string, consulting the backend when it is
    /// configured and ready within its load timeout.
    pub async fn transliterate_text(&self, text: &str) -> TransliterationResult {
        let converted = to_devanagari_digits(text);
        let mut out = Assembled::with_capacity(converted.len() * 2);

        for segment in self.segments(&converted) {
            match segment {
                Segment::Verbatim(s) => out.text.push_str(s),
                Segment::Phrase(hit) => out.push(TransliterationResult::new(hit, Confidence::Dictionary)),
                Segment::Word(w) => out.push(self.transliterate_word(w).await),
            }
        }

        out.finish()
    }
}

/// A piece of the digit-converted input.
enum Segment<'a> {
    Verbatim(&'a str),
    Phrase(String),
    Word(&'a str),
}

/// Output text plus the weakest confidence seen so far.
struct Assembled {
    text: String,
    confidence: Option<Confidence>,
}

impl Assembled {
    fn with_capacity(capacity: usize) -> Self {
        Assembled {
            text: String::with_capacity(capacity),
            confidence: None,
        }
    }

    fn push(&mut self, word: TransliterationResult) {
        self.text.push_str(&word.text);
        self.confidence = Some(self.confidence.map_or(word.confidence, |c| c.min(word.confidence)));
    }

    /// Text without any words reports `Native`.
    fn finish(self) -> TransliterationResult {
        TransliterationResult::new(self.text, self.confidence.unwrap_or(Confidence::Native))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendLoader, TransliterateOptions, TransliterationBackend};
    use crate::config::BackendSettings;
    use crate::error::LipiResult;
    use async_trait::async_trait;
    use std::time::Duration;

    fn join(tokens: &[Token<'_>]) -> String {
        tokens.iter().map(Token::as_str).collect()
    }

    #[test]
    fn test_tokenize_preserves_input() {
        let text = "Bhaskar Talkies, Pune-411 002 (मुंबई)";
        let tokens = tokenize(text);
        assert_eq!(join(&tokens), text);
        assert_eq!(tokens[0], Token::Word("Bhaskar"));
        assert_eq!(tokens[1], Token::Separator(" "));
        assert!(tokens.contains(&Token::Word("मुंबई")));
        assert!(tokens.contains(&Token::Separator("-411 002 (")));
    }

    #[test]
    fn test_tokenize_digits_are_separators() {
        assert_eq!(
            tokenize("शो४ab"),
            vec![Token::Word("शो"), Token::Separator("४"), Token::Word("ab")]
        );
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_word_pipeline_order() {
        let t = Transliterator::local();

        let r = t.transliterate_word_local("delhi");
        assert_eq!(r, TransliterationResult::new("दिल्ली", Confidence::Dictionary));

        let r = t.transliterate_word_local("नाशिक");
        assert_eq!(r.confidence, Confidence::Native);

        let r = t.transliterate_word_local("Puneमध्ये");
        assert_eq!(r.text, "Puneमध्ये");
        assert_eq!(r.confidence, Confidence::Native);

        let r = t.transliterate_word_local("Ganesh");
        assert_eq!(r, TransliterationResult::new("गनेश", Confidence::Phonetic));
    }

    #[test]
    fn test_text_keeps_separators_and_converts_digits() {
        let t = Transliterator::local();
        let r = t.transliterate_text_local("Pune - 411002, Maharashtra.");
        assert_eq!(r.text, "पुणे - ४११००२, महाराष्ट्र.");
        assert_eq!(r.confidence, Confidence::Dictionary);
    }

    #[test]
    fn test_text_confidence_is_weakest() {
        let t = Transliterator::local();
        assert_eq!(
            t.transliterate_text_local("Mumbai Ganesh").confidence,
            Confidence::Phonetic
        );
        assert_eq!(
            t.transliterate_text_local("१२, ३४").confidence,
            Confidence::Native
        );
        assert_eq!(t.transliterate_text_local("").text, "");
    }

    #[test]
    fn test_confidence_order() {
        assert!(Confidence::Unchanged < Confidence::Phonetic);
        assert!(Confidence::Phonetic < Confidence::External);
        assert!(Confidence::External < Confidence::Native);
        assert!(Confidence::Native < Confidence::Dictionary);
    }

    #[test]
    fn test_devanagari_text_outranks_phonetic() {
        let t = Transliterator::local();
        let r = t.transliterate_text_local("बाळासाहेब ठाकरे");
        assert_eq!(r, TransliterationResult::new("बाळासाहेब ठाकरे", Confidence::Native));

        assert_eq!(
            t.transliterate_text_local("नाशिक Ganesh").confidence,
            Confidence::Phonetic
        );
        assert_eq!(
            t.transliterate_text_local("नाशिक, Pune").confidence,
            Confidence::Native
        );
    }

    #[test]
    fn test_unconvertible_word_is_unchanged() {
        let t = Transliterator::local();
        assert_eq!(
            t.transliterate_word_local("Ω"),
            TransliterationResult::new("Ω", Confidence::Unchanged)
        );
        assert_eq!(
            t.transliterate_text_local("नाशिक Ω").confidence,
            Confidence::Unchanged
        );
    }

    #[test]
    fn test_extra_dictionary_entries() {
        let mut config = LipiConfig::default();
        config
            .dictionary
            .entries
            .insert("Prabhat".to_string(), "प्रभात".to_string());
        let t = Transliterator::from_config(&config);

        let r = t.transliterate_text_local("Prabhat Chitra");
        assert!(r.text.starts_with("प्रभात "));
    }

    fn with_phrases() -> Transliterator {
        let mut config = LipiConfig::default();
        for (key, value) in [
            ("Chitra Mandir", "चित्र मंदिर"),
            ("Navin Chitra Mandir", "नवीन चित्र मंदिर"),
        ] {
            config.dictionary.entries.insert(key.to_string(), value.to_string());
        }
        Transliterator::from_config(&config)
    }

    #[test]
    fn test_multi_word_entry_replaces_phrase() {
        let t = with_phrases();

        let r = t.transliterate_text_local("Chitra Mandir");
        assert_eq!(r, TransliterationResult::new("चित्र मंदिर", Confidence::Dictionary));

        let r = t.transliterate_text_local("chitra  mandir, Pune");
        assert_eq!(r, TransliterationResult::new("चित्र मंदिर, पुणे", Confidence::Dictionary));
    }

    #[test]
    fn test_multi_word_entry_longest_match() {
        let t = with_phrases();
        let r = t.transliterate_text_local("Navin Chitra Mandir 2");
        assert_eq!(r.text, "नवीन चित्र मंदिर २");
        assert_eq!(r.confidence, Confidence::Dictionary);
    }

    #[test]
    fn test_multi_word_entry_needs_whitespace_join() {
        let t = with_phrases();

        let r = t.transliterate_text_local("Chitra, Mandir");
        assert_ne!(r.text, "चित्र मंदिर");
        assert_eq!(r.confidence, Confidence::Phonetic);

        let r = t.transliterate_text_local("Chitra");
        assert_eq!(r.confidence, Confidence::Phonetic);
    }

    #[tokio::test]
    async fn test_multi_word_entry_on_async_path() {
        let t = with_phrases();
        let r = t.transliterate_text("Chitra Mandir").await;
        assert_eq!(r, TransliterationResult::new("चित्र मंदिर", Confidence::Dictionary));
    }

    #[tokio::test]
    async fn test_async_path_without_backend_matches_local() {
        let t = Transliterator::local();
        let text = "Sairat @ Kolhapur 3";
        assert_eq!(t.transliterate_text(text).await, t.transliterate_text_local(text));
    }

    // ===== External backend =====

    /// Writes every word as "गणेश" regardless of input.
    struct FixedBackend;

    #[async_trait]
    impl TransliterationBackend for FixedBackend {
        async fn transliterate(
            &self,
            _scheme: &str,
            _target: &str,
            _text: &str,
            _options: TransliterateOptions,
        ) -> LipiResult<String> {
            Ok("गणेश".to_string())
        }
    }

    struct SlowLoader {
        delay: Duration,
    }

    #[async_trait]
    impl BackendLoader for SlowLoader {
        async fn load(&self) -> LipiResult<Arc<dyn TransliterationBackend>> {
            tokio::time::sleep(self.delay).await;
            Ok(Arc::new(FixedBackend))
        }
    }

    fn with_backend(delay: Duration) -> Transliterator {
        let settings = BackendSettings {
            enabled: true,
            url: Some("http://stub".into()),
            load_timeout_ms: 800,
            ..BackendSettings::default()
        };
        Transliterator::new(
            Dictionary::builtin(),
            BackendService::new(Arc::new(SlowLoader { delay }), &settings),
        )
    }

    #[tokio::test]
    async fn test_backend_answer_used_after_dictionary() {
        let t = with_backend(Duration::ZERO);

        let r = t.transliterate_text("Ganesh, Pune").await;
        assert_eq!(r.text, "गणेश, पुणे");
        assert_eq!(r.confidence, Confidence::External);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_backend_falls_back_then_catches_up() {
        let t = with_backend(Duration::from_secs(5));

        let first = t.transliterate_text("Ganesh").await;
        assert_eq!(first, TransliterationResult::new("गनेश", Confidence::Phonetic));

        tokio::time::sleep(Duration::from_secs(10)).await;

        let later = t.transliterate_text("Ganesh").await;
        assert_eq!(later, TransliterationResult::new("गणेश", Confidence::External));
    }

    #[test]
    fn test_local_path_never_uses_backend() {
        let t = with_backend(Duration::ZERO);
        let r = t.transliterate_text_local("Ganesh");
        assert_eq!(r.confidence, Confidence::Phonetic);
    }
}
