// 🏷️ Tag Resolver - matched surface tokens → canonical tags
//
// Two independent passes over the same matched tokens:
// - Entity pass: bank remap + card remap. A card hit also yields its issuing
//   bank, so "SAPPHIRE" → {"CHASE", "CHASE_SAPPHIRE"}.
// - Category pass: category remap. Each canonical tag keeps the distinct
//   surface tokens that produced it as evidence.
//
// Tokens resolving nowhere are skipped; that is routine, not an error.

use crate::remap::{CardTag, RemapTable};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Resolved tags for one text unit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedText {
    pub id: String,

    /// Bank tags and `ISSUER_CARD` tags
    pub entities: BTreeSet<String>,

    /// Category tag → evidence string (distinct surface tokens, joined)
    pub categories: BTreeMap<String, String>,
}

impl TaggedText {
    pub fn has_entities(&self) -> bool {
        !self.entities.is_empty()
    }

    pub fn has_categories(&self) -> bool {
        !self.categories.is_empty()
    }

    /// Nothing resolved in either pass; the writer skips such units
    pub fn is_empty(&self) -> bool {
        !self.has_entities() && !self.has_categories()
    }
}

/// Entity pass
pub fn resolve_entities<S: AsRef<str>>(
    tokens: &[S],
    banks: &RemapTable<String>,
    cards: &RemapTable<CardTag>,
) -> BTreeSet<String> {
    let mut tags = BTreeSet::new();

    for token in tokens {
        let token = token.as_ref();
        if let Some(bank) = banks.get(token) {
            tags.insert(bank.clone());
        }
        if let Some(card) = cards.get(token) {
            tags.insert(card.issuer.clone());
            tags.insert(card.tag.clone());
        }
    }

    tags
}

/// Category pass: canonical tag → distinct surface tokens, first-seen order
pub fn resolve_categories<S: AsRef<str>>(tokens: &[S], categories: &RemapTable<String>) -> BTreeMap<String, Vec<String>> {
    let mut evidence: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for token in tokens {
        let token = token.as_ref();
        if let Some(tag) = categories.get(token) {
            let witnesses = evidence.entry(tag.clone()).or_default();
            if !witnesses.iter().any(|w| w == token) {
                witnesses.push(token.to_string());
            }
        }
    }

    evidence
}

/// Join each tag's witnesses into its evidence string
pub fn evidence_strings(evidence: BTreeMap<String, Vec<String>>, separator: &str) -> BTreeMap<String, String> {
    evidence
        .into_iter()
        .map(|(tag, witnesses)| (tag, witnesses.join(separator)))
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
