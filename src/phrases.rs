// 🧩 Multi-Word Phrases
//
// Phrases are token tuples the tokenizer must merge into one compound token.
// They are derived from the registries, never authored:
// - multi-word bank aliases
// - issuer + card (and issuer alias + card, issuer + card alias, ...)
// - category term + category tag, and alias + category tag
// - multi-word names, aliases and terms on their own

use crate::entities::{is_multi_word, BankRegistry, CardRegistry, CategoryRegistry};
use crate::error::DictionaryError;
use std::collections::BTreeSet;

/// An ordered tuple of two or more base tokens
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Phrase(Vec<String>);

impl Phrase {
    /// Split every part on whitespace and concatenate; `None` below two tokens
    pub fn from_parts<S: AsRef<str>>(parts: &[S]) -> Option<Self> {
        let tokens: Vec<String> = parts
            .iter()
            .flat_map(|part| part.as_ref().split_whitespace())
            .map(str::to_string)
            .collect();

        if tokens.len() < 2 {
            None
        } else {
            Some(Phrase(tokens))
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    /// The compound token this phrase merges into
    pub fn joined(&self) -> String {
        self.0.join(" ")
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Deduplicated phrase set, ordered for deterministic output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhraseSet {
    phrases: BTreeSet<Phrase>,
}

impl PhraseSet {
    /// Adding an existing phrase is a no-op
    pub fn emit<S: AsRef<str>>(&mut self, parts: &[S]) {
        if let Some(phrase) = Phrase::from_parts(parts) {
            self.phrases.insert(phrase);
        }
    }

    pub fn contains(&self, phrase: &Phrase) -> bool {
        self.phrases.contains(phrase)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Phrase> {
        self.phrases.iter()
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}

/// Derive every multi-word phrase from the three registries
pub fn build_phrases(
    banks: &BankRegistry,
    cards: &CardRegistry,
    categories: &CategoryRegistry,
) -> Result<PhraseSet, DictionaryError> {
    let mut set = PhraseSet::default();

    // bank names and aliases
    for bank in banks.banks() {
        for name in bank.all_names() {
            if is_multi_word(&name) {
                set.emit(&[name]);
            }
        }
    }

    // issuer + card combinations
    for issuer in cards.issuers() {
        let issuer_alts = &banks
            .get(&issuer.name)
            .ok_or_else(|| DictionaryError::UnknownIssuer {
                issuer: issuer.name.clone(),
            })?
            .alts;

        for card in &issuer.cards {
            set.emit(&[&issuer.name, &card.name]);
            for alt in issuer_alts {
                set.emit(&[alt, &card.name]);
            }
            if is_multi_word(&card.name) {
                set.emit(&[&card.name]);
            }

            for card_alt in &card.alts {
                if is_multi_word(card_alt) {
                    set.emit(&[card_alt]);
                } else {
                    set.emit(&[&issuer.name, card_alt]);
                    for alt in issuer_alts {
                        set.emit(&[alt, card_alt]);
                    }
                }
            }
        }
    }

    // category terms
    for category in categories.categories() {
        for term in &category.terms {
            if category.is_tagged() {
                set.emit(&[&term.term, &category.tag]);
            }
            if is_multi_word(&term.term) {
                set.emit(&[&term.term]);
            }

            for alt in &term.alts {
                if category.is_tagged() {
                    set.emit(&[alt, &category.tag]);
                }
                if is_multi_word(alt) {
                    set.emit(&[alt]);
                }
            }
        }
    }

    Ok(set)
}

// ============================================================================
// TESTS
// ============================================================================
