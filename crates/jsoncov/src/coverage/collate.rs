//! Locale-aware filename ordering
//!
//! Files in a report are ordered the way a root-locale collator orders
//! them, not by raw bytes. Each string is decomposed (NFD) into base
//! characters and combining marks, then compared in three levels:
//!
//! 1. **Primary**: base letters, case and accents folded. Whitespace sorts
//!    before punctuation, punctuation before digits, digits before letters.
//!    Stroked and ligature letters (`ł`, `ø`, `æ`) sort right after their
//!    base letter.
//! 2. **Secondary**: accents, unaccented first, then acute before grave
//!    before breve and so on (`e` < `é` < `è`).
//! 3. **Tertiary**: lowercase before uppercase (`a` < `A`).
//!
//! Strings equal on all three levels fall back to code point order so the
//! result is a total order.

use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// ASCII punctuation and symbols in root collation order
const PUNCTUATION_ORDER: &str = "_-,;:!?.'\"()[]{}@*/\\&#%`^+<=>|~$";

/// Combining marks in root secondary order
const ACCENT_ORDER: [char; 13] = [
    '\u{0301}', // acute
    '\u{0300}', // grave
    '\u{0306}', // breve
    '\u{0302}', // circumflex
    '\u{030C}', // caron
    '\u{030A}', // ring above
    '\u{0308}', // diaeresis
    '\u{030B}', // double acute
    '\u{0303}', // tilde
    '\u{0307}', // dot above
    '\u{0327}', // cedilla
    '\u{0328}', // ogonek
    '\u{0304}', // macron
];

/// Compare two strings with root-locale collation rules
#[must_use]
pub fn locale_compare(left: &str, right: &str) -> Ordering {
    let left_elements = collation_elements(left);
    let right_elements = collation_elements(right);

    primary_key(&left_elements)
        .cmp(&primary_key(&right_elements))
        .then_with(|| secondary_key(&left_elements).cmp(&secondary_key(&right_elements)))
        .then_with(|| tertiary_key(&left_elements).cmp(&tertiary_key(&right_elements)))
        .then_with(|| left.cmp(right))
}

/// Character class at the primary level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum CharClass {
    Whitespace,
    Punctuation,
    Digit,
    Letter,
}

/// One weighted unit of a decomposed string
///
/// Combining marks carry no primary weight and only add a secondary one.
#[derive(Debug, Clone, Copy)]
struct Element {
    primary: Option<(CharClass, u32)>,
    secondary: u32,
    tertiary: u8,
}

impl Element {
    fn base(class: CharClass, weight: u32, tertiary: u8) -> Self {
        Self {
            primary: Some((class, weight)),
            secondary: 0,
            tertiary,
        }
    }

    fn accent(mark: char) -> Self {
        Self {
            primary: None,
            secondary: accent_weight(mark),
            tertiary: 0,
        }
    }
}

fn collation_elements(s: &str) -> Vec<Element> {
    let mut elements = Vec::with_capacity(s.len());
    for ch in s.nfd() {
        if is_combining_mark(ch) {
            elements.push(Element::accent(ch));
            continue;
        }

        let tertiary = u8::from(ch.is_uppercase()) * 2;
        let folded = fold_case(ch);
        if folded == '\u{00DF}' {
            // sharp s expands to "ss", a tertiary variant of it
            let ss = letter_weight('s', 0);
            elements.push(Element::base(CharClass::Letter, ss, 1));
            elements.push(Element::base(CharClass::Letter, ss, 1));
            continue;
        }

        let element = match classify(ch) {
            CharClass::Punctuation => Element::base(
                CharClass::Punctuation,
                PUNCTUATION_ORDER.find(ch).map_or_else(
                    || PUNCTUATION_ORDER.len() as u32 + u32::from(ch),
                    |position| position as u32,
                ),
                tertiary,
            ),
            CharClass::Letter => {
                let (base, rank) = own_letter(folded).unwrap_or((folded, 0));
                Element::base(CharClass::Letter, letter_weight(base, rank), tertiary)
            }
            class => Element::base(class, u32::from(ch), tertiary),
        };
        elements.push(element);
    }
    elements
}

fn classify(ch: char) -> CharClass {
    if ch.is_whitespace() {
        CharClass::Whitespace
    } else if ch.is_numeric() {
        CharClass::Digit
    } else if ch.is_alphabetic() {
        CharClass::Letter
    } else {
        CharClass::Punctuation
    }
}

/// Letter weight leaving room for up to three letters after each base
fn letter_weight(base: char, rank: u32) -> u32 {
    u32::from(base) * 4 + rank
}

/// Letters with no canonical decomposition that sort as their own letter
/// right after a base letter
fn own_letter(lower: char) -> Option<(char, u32)> {
    let entry = match lower {
        '\u{00E6}' => ('a', 1), // æ
        '\u{0111}' => ('d', 1), // đ
        '\u{00F0}' => ('d', 2), // ð
        '\u{0127}' => ('h', 1), // ħ
        '\u{0131}' => ('i', 1), // dotless ı
        '\u{0142}' => ('l', 1), // ł
        '\u{00F8}' => ('o', 1), // ø
        '\u{0153}' => ('o', 2), // œ
        '\u{0167}' => ('t', 1), // ŧ
        '\u{00FE}' => ('z', 1), // þ
        _ => return None,
    };
    Some(entry)
}

fn accent_weight(mark: char) -> u32 {
    ACCENT_ORDER
        .iter()
        .position(|accent| *accent == mark)
        .map_or_else(
            || ACCENT_ORDER.len() as u32 + 1 + u32::from(mark),
            |position| position as u32 + 1,
        )
}

fn primary_key(elements: &[Element]) -> Vec<(CharClass, u32)> {
    elements.iter().filter_map(|element| element.primary).collect()
}

fn secondary_key(elements: &[Element]) -> Vec<u32> {
    elements.iter().map(|element| element.secondary).collect()
}

fn tertiary_key(elements: &[Element]) -> Vec<u8> {
    elements.iter().map(|element| element.tertiary).collect()
}

fn fold_case(ch: char) -> char {
    ch.to_lowercase().next().unwrap_or(ch)
}
