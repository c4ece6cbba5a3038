//! # Local Phonetic Transducer
//!
//! Deterministic Latin → Devanagari fallback used whenever the external
//! backend is absent, slow, or unhelpful.
//!
//! ## Matching Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  At each position of the lowercased input, first match wins:            │
//! │                                                                         │
//! │   1. chh                          छ                                     │
//! │   2. special clusters             mb  → ंब  (म्ब at word start)          │
//! │                                   ll  → ल्ल                              │
//! │                                   sk  → स्क                              │
//! │                                   ai  → ई   (only at word end)          │
//! │   3. consonant digraphs           kh gh ch jh th dh ph bh sh            │
//! │   4. long vowels                  aa ee ii oo uu ai au                  │
//! │   5. single letters               k g c j t d n p b m y r l v w s h ... │
//! │   6. anything else                copied through, ends the word         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Consonant State
//! ```text
//!   "delhi"
//!    d   → द          bare consonant
//!    e   → े          vowel after consonant becomes a matra
//!    l   → ल          bare consonant
//!    h   → ्ह         consonant after bare consonant gets a virama
//!    i   → ि
//!   = देल्हि
//! ```
//! A bare consonant at the end of a word keeps its inherent vowel.
//!
//! The table is a practical starting point for names on invoices, not a
//! phonology; known exceptions belong in the dictionary.

const VIRAMA: char = '\u{094D}';

/// A vowel in its two written forms.
#[derive(Debug, Clone, Copy)]
struct Vowel {
    independent: &'static str,
    /// Empty for the inherent `a`.
    matra: &'static str,
}

const fn vowel(independent: &'static str, matra: &'static str) -> Vowel {
    Vowel { independent, matra }
}

// =============================================================================
// Pattern Tables
// =============================================================================

const CONSONANT_TRIGRAPHS: &[(&str, &str)] = &[("chh", "छ")];

const CONSONANT_DIGRAPHS: &[(&str, &str)] = &[
    ("kh", "ख"),
    ("gh", "घ"),
    ("ch", "च"),
    ("jh", "झ"),
    ("th", "थ"),
    ("dh", "ध"),
    ("ph", "फ"),
    ("bh", "भ"),
    ("sh", "श"),
];

/// Conjuncts that are written as one unit.
const CLUSTERS: &[(&str, &str)] = &[("ll", "ल्ल"), ("sk", "स्क")];

const LONG_VOWELS: &[(&str, Vowel)] = &[
    ("aa", vowel("आ", "ा")),
    ("ee", vowel("ई", "ी")),
    ("ii", vowel("ई", "ी")),
    ("oo", vowel("ऊ", "ू")),
    ("uu", vowel("ऊ", "ू")),
    ("ai", vowel("ऐ", "ै")),
    ("au", vowel("औ", "ौ")),
];

const SINGLE_CONSONANTS: &[(char, &str)] = &[
    ('k', "क"),
    ('g', "ग"),
    ('c', "क"),
    ('j', "ज"),
    ('t', "त"),
    ('d', "द"),
    ('n', "न"),
    ('p', "प"),
    ('b', "ब"),
    ('m', "म"),
    ('y', "य"),
    ('r', "र"),
    ('l', "ल"),
    ('v', "व"),
    ('w', "व"),
    ('s', "स"),
    ('h', "ह"),
    ('f', "फ"),
    ('z', "झ"),
    ('x', "क्स"),
    ('q', "क"),
];

const SHORT_VOWELS: &[(char, Vowel)] = &[
    ('a', vowel("अ", "")),
    ('i', vowel("इ", "ि")),
    ('u', vowel("उ", "ु")),
    ('e', vowel("ए", "े")),
    ('o', vowel("ओ", "ो")),
];

// =============================================================================
// Transducer
// =============================================================================

/// One matched unit of input.
#[derive(Debug, Clone, Copy)]
enum Unit {
    /// Consonant or conjunct; takes a virama after a bare consonant.
    Consonant(&'static str),
    /// Anusvara + consonant (`ंब`); never takes a virama.
    Nasal(&'static str),
    Vowel(Vowel),
    /// Always written in independent form.
    WordFinalVowel(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    WordStart,
    BareConsonant,
    AfterVowel,
}

fn matches_at(chars: &[char], i: usize, pattern: &str) -> bool {
    let mut idx = i;
    for p in pattern.chars() {
        if chars.get(idx) != Some(&p) {
            return false;
        }
        idx += 1;
    }
    true
}

fn is_word_char(c: Option<&char>) -> bool {
    matches!(c, Some(c) if c.is_ascii_alphabetic())
}

/// Matches the unit at `i`, returning it with its length in chars.
fn next_unit(chars: &[char], i: usize, state: State) -> Option<(Unit, usize)> {
    for (pat, out) in CONSONANT_TRIGRAPHS {
        if matches_at(chars, i, pat) {
            return Some((Unit::Consonant(*out), 3));
        }
    }

    if matches_at(chars, i, "mb") {
        let unit = if state == State::WordStart {
            Unit::Consonant("म्ब")
        } else {
            Unit::Nasal("ंब")
        };
        return Some((unit, 2));
    }
    for (pat, out) in CLUSTERS {
        if matches_at(chars, i, pat) {
            return Some((Unit::Consonant(*out), 2));
        }
    }
    if matches_at(chars, i, "ai") && !is_word_char(chars.get(i + 2)) {
        return Some((Unit::WordFinalVowel("ई"), 2));
    }

    for (pat, out) in CONSONANT_DIGRAPHS {
        if matches_at(chars, i, pat) {
            return Some((Unit::Consonant(*out), 2));
        }
    }
    for (pat, v) in LONG_VOWELS {
        if matches_at(chars, i, pat) {
            return Some((Unit::Vowel(*v), 2));
        }
    }

    let c = *chars.get(i)?;
    if let Some((_, out)) = SINGLE_CONSONANTS.iter().find(|(k, _)| *k == c) {
        return Some((Unit::Consonant(*out), 1));
    }
    if let Some((_, v)) = SHORT_VOWELS.iter().find(|(k, _)| *k == c) {
        return Some((Unit::Vowel(*v), 1));
    }
    None
}

/// Transliterates Latin letters to Devanagari by local rules.
///
/// ASCII letters match case-insensitively. Everything else (digits,
/// punctuation, whitespace, Devanagari, other scripts) is copied through
/// exactly as typed and ends the current word.
///
/// ## Example
/// ```rust
/// use patrak_lipi::phonetic::transliterate_phonetic;
///
/// assert_eq!(transliterate_phonetic("Mumbai"), "मुंबई");
/// assert_eq!(transliterate_phonetic("Delhi"), "देल्हि");
/// assert_eq!(transliterate_phonetic("Pune 2"), "पुने 2");
/// ```
pub fn transliterate_phonetic(input: &str) -> String {
    let typed: Vec<char> = input.chars().collect();
    let chars: Vec<char> = typed.iter().map(char::to_ascii_lowercase).collect();
    let mut out = String::with_capacity(input.len() * 3);
    let mut state = State::WordStart;
    let mut i = 0;

    while i < chars.len() {
        let Some((unit, len)) = next_unit(&chars, i, state) else {
            out.push(typed[i]);
            state = State::WordStart;
            i += 1;
            continue;
        };

        match unit {
            Unit::Consonant(c) => {
                if state == State::BareConsonant {
                    out.push(VIRAMA);
                }
                out.push_str(c);
                state = State::BareConsonant;
            }
            Unit::Nasal(c) => {
                out.push_str(c);
                state = State::BareConsonant;
            }
            Unit::Vowel(v) => {
                if state == State::BareConsonant {
                    out.push_str(v.matra);
                } else {
                    out.push_str(v.independent);
                }
                state = State::AfterVowel;
            }
            Unit::WordFinalVowel(v) => {
                out.push_str(v);
                state = State::AfterVowel;
            }
        }
        i += len;
    }

    out
}
