// 🔎 Keyword Scanner
//
// The keyword set is the flat union of every configured surface form: bank
// names and aliases, card names and aliases, category terms and aliases, and
// every merged phrase. Denylisted surfaces are removed.
//
// Scanning keeps token order and duplicates; an empty result is reported as
// "no match" (None) so batch callers can skip the unit entirely.

use crate::entities::{normalize_surface, BankRegistry, CardRegistry, CategoryRegistry};
use crate::phrases::PhraseSet;
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    words: HashSet<String>,
}

impl KeywordSet {
    pub fn build<S: AsRef<str>>(
        banks: &BankRegistry,
        cards: &CardRegistry,
        categories: &CategoryRegistry,
        phrases: &PhraseSet,
        denylist: &[S],
    ) -> Self {
        let mut words: HashSet<String> = HashSet::new();

        for bank in banks.banks() {
            words.extend(bank.all_names());
        }
        for card in cards.cards() {
            words.extend(card.all_names());
        }
        for category in categories.categories() {
            for term in &category.terms {
                words.extend(term.all_names());
            }
        }
        words.extend(phrases.iter().map(|phrase| phrase.joined()));

        for denied in denylist {
            words.remove(&normalize_surface(denied.as_ref()));
        }

        KeywordSet { words }
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        KeywordSet {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    pub fn sorted(&self) -> Vec<&str> {
        let mut words: Vec<&str> = self.iter().collect();
        words.sort_unstable();
        words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Tokens present in the keyword set, in token order, duplicates kept.
/// `None` when nothing matched.
pub fn scan<S: AsRef<str>>(tokens: &[S], keywords: &KeywordSet) -> Option<Vec<String>> {
    let hits: Vec<String> = tokens
        .iter()
        .map(|token| token.as_ref())
        .filter(|token| keywords.contains(token))
        .map(str::to_string)
        .collect();

    if hits.is_empty() {
        None
    } else {
        Some(hits)
    }
}

// ============================================================================
// TESTS
// ============================================================================
