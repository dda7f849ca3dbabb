//! # Hyphenator interface
//!
//! External collaborator: takes paragraph text, returns an equivalent
//! string with U+00AD (SOFT HYPHEN) inserted at hyphenation points, which
//! the item generator treats as discretionary-break hints (spec.md §4.5).
//! `HypherHyphenator` is the shipped implementation, ported from
//! `original_source/typesetting/hyphenation.py`, using the `hypher` crate
//! `danmolitor-forme`'s `knuth_plass.rs` already depends on for the same
//! purpose.

use unicode_segmentation::UnicodeSegmentation;

use crate::segment::{Segmenter, UnicodeSegmenter};

const SOFT_HYPHEN: char = '\u{00AD}';

/// Maximum word length (in code points) eligible for hyphenation. Longer
/// words are passed through unhyphenated — a guard against pathological
/// input, per spec.md §4.5.
const MAX_HYPHENATABLE_WORD_LEN: usize = 100;

/// External collaborator: inserts soft hyphens at discretionary break points.
pub trait Hyphenator {
    fn hyphenate(&self, text: &str) -> String;
}

/// A `Hyphenator` backed by the `hypher` crate's Knuth-Liang hyphenation
/// patterns.
pub struct HypherHyphenator {
    lang: hypher::Lang,
}

impl HypherHyphenator {
    pub fn new(lang: hypher::Lang) -> Self {
        HypherHyphenator { lang }
    }
}

impl Default for HypherHyphenator {
    fn default() -> Self {
        HypherHyphenator::new(hypher::Lang::English)
    }
}

impl Hyphenator for HypherHyphenator {
    fn hyphenate(&self, text: &str) -> String {
        let segmenter = UnicodeSegmenter;
        let mut out = String::with_capacity(text.len());
        for word in segmenter.words(text) {
            out.push_str(&hyphenate_word(word, self.lang));
        }
        out
    }
}

fn hyphenate_word(word: &str, lang: hypher::Lang) -> String {
    if word.chars().count() >= MAX_HYPHENATABLE_WORD_LEN || !is_hyphenatable(word) {
        return word.to_string();
    }

    let syllables: Vec<&str> = hypher::hyphenate(word, lang).collect();
    if syllables.len() < 2 {
        return word.to_string();
    }

    let joined: String = syllables.concat();
    if joined != word {
        // The hyphenator mangled the word somehow; don't trust its split
        // (mirrors the original's `"".join(syllables) == word` sanity check).
        return word.to_string();
    }

    syllables.join(&SOFT_HYPHEN.to_string())
}

fn is_hyphenatable(word: &str) -> bool {
    word.chars().all(|c| c.is_alphabetic())
}

/// Resolve a BCP 47 language tag to a [`hypher::Lang`]. Returns `None` for
/// unsupported tags (callers should then skip hyphenation entirely, or fall
/// back to [`HypherHyphenator::default`]).
pub fn resolve_lang(tag: Option<&str>) -> Option<hypher::Lang> {
    let tag = tag?;
    let primary = tag.split('-').next().unwrap_or(tag).to_lowercase();
    match primary.as_str() {
        "af" => Some(hypher::Lang::Afrikaans),
        "sq" => Some(hypher::Lang::Albanian),
        "be" => Some(hypher::Lang::Belarusian),
        "bg" => Some(hypher::Lang::Bulgarian),
        "ca" => Some(hypher::Lang::Catalan),
        "hr" => Some(hypher::Lang::Croatian),
        "cs" => Some(hypher::Lang::Czech),
        "da" => Some(hypher::Lang::Danish),
        "nl" => Some(hypher::Lang::Dutch),
        "en" => Some(hypher::Lang::English),
        "et" => Some(hypher::Lang::Estonian),
        "fi" => Some(hypher::Lang::Finnish),
        "fr" => Some(hypher::Lang::French),
        "ka" => Some(hypher::Lang::Georgian),
        "de" => Some(hypher::Lang::German),
        "el" => Some(hypher::Lang::Greek),
        "hu" => Some(hypher::Lang::Hungarian),
        "is" => Some(hypher::Lang::Icelandic),
        "it" => Some(hypher::Lang::Italian),
        "ku" => Some(hypher::Lang::Kurmanji),
        "la" => Some(hypher::Lang::Latin),
        "lt" => Some(hypher::Lang::Lithuanian),
        "mn" => Some(hypher::Lang::Mongolian),
        "nb" | "nn" | "no" => Some(hypher::Lang::Norwegian),
        "pl" => Some(hypher::Lang::Polish),
        "pt" => Some(hypher::Lang::Portuguese),
        "ru" => Some(hypher::Lang::Russian),
        "sr" => Some(hypher::Lang::Serbian),
        "sk" => Some(hypher::Lang::Slovak),
        "sl" => Some(hypher::Lang::Slovenian),
        "es" => Some(hypher::Lang::Spanish),
        "sv" => Some(hypher::Lang::Swedish),
        "tr" => Some(hypher::Lang::Turkish),
        "tk" => Some(hypher::Lang::Turkmen),
        "uk" => Some(hypher::Lang::Ukrainian),
        _ => None,
    }
}
