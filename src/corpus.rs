//! Token-corpus extraction from bill text.
//!
//! Tokens are classified in-process with closed-class lexicons plus character
//! checks, and every closed-class tag is dropped: adpositions, auxiliaries,
//! determiners, numerals, punctuation, symbols, whitespace. What remains is
//! the open-class vocabulary the topic model trains on.

use crate::types::BillRow;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// English adpositions (prepositions)
const ADPOSITIONS: &[&str] = &[
    "aboard", "about", "above", "across", "after", "against", "along", "amid",
    "among", "amongst", "around", "at", "atop", "before", "behind", "below",
    "beneath", "beside", "besides", "between", "beyond", "by", "concerning",
    "despite", "down", "during", "except", "for", "from", "in", "inside",
    "into", "near", "of", "off", "on", "onto", "out", "outside", "over",
    "past", "per", "regarding", "since", "through", "throughout", "till",
    "to", "toward", "towards", "under", "underneath", "until", "unto", "up",
    "upon", "via", "with", "within", "without",
];

/// Auxiliary verbs, including modals
const AUXILIARIES: &[&str] = &[
    "am", "are", "be", "been", "being", "can", "could", "did", "do", "does",
    "doing", "had", "has", "have", "having", "is", "may", "might", "must",
    "ought", "shall", "should", "was", "were", "will", "would",
];

/// Determiners, including possessives
const DETERMINERS: &[&str] = &[
    "a", "all", "an", "another", "any", "both", "each", "either", "every",
    "few", "her", "his", "its", "many", "much", "my", "neither", "no",
    "other", "our", "several", "some", "such", "that", "the", "their",
    "these", "this", "those", "what", "which", "whose", "your",
];

/// Spelled-out cardinal numerals
const NUMERAL_WORDS: &[&str] = &[
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight",
    "nine", "ten", "eleven", "twelve", "twenty", "thirty", "forty", "fifty",
    "sixty", "seventy", "eighty", "ninety", "hundred", "thousand", "million",
    "billion", "trillion",
];

const PUNCT_CHARS: &str = ".,;:!?\"'`()[]{}-\u{2013}\u{2014}\u{2026}/\\";
const SYM_CHARS: &str = "$%&+=<>#@^~|*_\u{a7}\u{a9}\u{ae}\u{b0}";

/// Part-of-speech tag assigned by the lexicon classifier. Closed classes
/// mirror the excluded set; everything else is Open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartOfSpeech {
    Adposition,
    Auxiliary,
    Determiner,
    Numeral,
    Punctuation,
    Symbol,
    Whitespace,
    Open,
}

fn lexicon(words: &'static [&'static str]) -> HashSet<&'static str> {
    words.iter().copied().collect()
}

fn adpositions() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| lexicon(ADPOSITIONS))
}

fn auxiliaries() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| lexicon(AUXILIARIES))
}

fn determiners() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| lexicon(DETERMINERS))
}

fn numeral_words() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| lexicon(NUMERAL_WORDS))
}

/// Classify one raw token
pub fn classify(token: &str) -> PartOfSpeech {
    if token.chars().all(char::is_whitespace) {
        return PartOfSpeech::Whitespace;
    }
    if token.chars().next().map(|c| c.is_ascii_digit()).unwrap_or(false) {
        return PartOfSpeech::Numeral;
    }
    if token.chars().all(|c| PUNCT_CHARS.contains(c)) {
        return PartOfSpeech::Punctuation;
    }
    if token.chars().all(|c| SYM_CHARS.contains(c)) {
        return PartOfSpeech::Symbol;
    }

    let lower = token.to_lowercase();
    if adpositions().contains(lower.as_str()) {
        PartOfSpeech::Adposition
    } else if auxiliaries().contains(lower.as_str()) {
        PartOfSpeech::Auxiliary
    } else if determiners().contains(lower.as_str()) {
        PartOfSpeech::Determiner
    } else if numeral_words().contains(lower.as_str()) {
        PartOfSpeech::Numeral
    } else {
        PartOfSpeech::Open
    }
}

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // words (with optional apostrophe suffix), digit runs, single marks
    RE.get_or_init(|| {
        Regex::new(r"[A-Za-z]+(?:'[A-Za-z]+)?|[0-9][0-9,./-]*|[^\sA-Za-z0-9]").expect("static regex")
    })
}

/// Tokenize text and keep only open-class tokens, lowercased
pub fn filter_tokens(text: &str) -> Vec<String> {
    token_regex()
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|token| classify(token) == PartOfSpeech::Open)
        .map(|token| token.to_lowercase())
        .collect()
}

/// One bill's contribution to the corpus
#[derive(Debug, Clone)]
pub struct CorpusEntry {
    pub bill_id: u64,
    pub tokens: Vec<String>,
}

/// Derive the corpus from the bill table. Rows lacking a title or a
/// description are dropped from this output, not mutated in place.
///
/// An empty or whitespace-only field counts as absent: the CSV table stores
/// missing text as an empty field, so the two are indistinguishable after a
/// reload anyway.
pub fn extract_corpus(rows: &[BillRow]) -> Vec<CorpusEntry> {
    rows.iter()
        .filter_map(|row| {
            let title = row.title.as_deref().filter(|t| !t.trim().is_empty())?;
            let description = row.description.as_deref().filter(|d| !d.trim().is_empty())?;
            let text = format!("{}. {}", title, description);
            Some(CorpusEntry {
                bill_id: row.bill_id,
                tokens: filter_tokens(&text),
            })
        })
        .collect()
}
