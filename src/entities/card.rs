// 💳 Card Entity - card products grouped under their issuer
//
// A card's tag is always "ISSUER_CARD" (e.g. "CHASE_SAPPHIRE"), so the same
// product name under two issuers yields two distinct tags.
//
// Registry document shape:
// {"issuer": [{"name": "CHASE", "cards": [{"name": "SAPPHIRE", "alts": [...]}]}]}

use super::{normalize_aliases, parse_registry, read_registry, required, RegistryKind};
use crate::error::DictionaryError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

// ============================================================================
// CARD ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Canonical name of the issuing bank (non-owning back-reference)
    pub issuer: String,

    /// Canonical card name
    pub name: String,

    /// Alternative names for the card
    pub alts: Vec<String>,
}

impl Card {
    /// Composite tag: `issuer_card`
    pub fn tag(&self) -> String {
        format!("{}_{}", self.issuer, self.name)
    }

    /// Canonical name followed by aliases
    pub fn all_names(&self) -> Vec<String> {
        let mut names = vec![self.name.clone()];
        names.extend(self.alts.iter().cloned());
        names
    }
}

/// One issuer and the cards it owns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issuer {
    pub name: String,
    pub cards: Vec<Card>,
}

#[derive(Debug, Deserialize)]
struct CardDocument {
    issuer: Vec<RawIssuer>,
}

#[derive(Debug, Deserialize)]
struct RawIssuer {
    name: Option<String>,
    cards: Option<Vec<RawCard>>,
}

#[derive(Debug, Deserialize)]
struct RawCard {
    name: Option<String>,
    #[serde(default)]
    alts: Option<Vec<String>>,
}

// ============================================================================
// CARD REGISTRY
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct CardRegistry {
    issuers: Vec<Issuer>,
}

impl CardRegistry {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DictionaryError> {
        let document: CardDocument = read_registry(RegistryKind::Card, path.as_ref())?;
        Self::from_document(document)
    }

    pub fn from_json(content: &str, origin: &str) -> Result<Self, DictionaryError> {
        let document: CardDocument = parse_registry(RegistryKind::Card, content, origin)?;
        Self::from_document(document)
    }

    fn from_document(document: CardDocument) -> Result<Self, DictionaryError> {
        let kind = RegistryKind::Card;
        let mut issuers = Vec::with_capacity(document.issuer.len());

        for (i, raw) in document.issuer.into_iter().enumerate() {
            let issuer = required(raw.name, kind, || format!("issuer[{}]", i), "name")?;
            let raw_cards = raw.cards.ok_or_else(|| DictionaryError::MissingField {
                kind,
                location: format!("issuer[{}]", i),
                field: "cards",
            })?;

            let mut cards = Vec::with_capacity(raw_cards.len());
            for (j, raw_card) in raw_cards.into_iter().enumerate() {
                let name = required(raw_card.name, kind, || format!("issuer[{}].cards[{}]", i, j), "name")?;
                let alts = normalize_aliases(raw_card.alts, &name);
                cards.push(Card {
                    issuer: issuer.clone(),
                    name,
                    alts,
                });
            }

            issuers.push(Issuer { name: issuer, cards });
        }

        Self::from_issuers(issuers)
    }

    /// Issuer names must be unique, card names unique within an issuer
    pub fn from_issuers(issuers: Vec<Issuer>) -> Result<Self, DictionaryError> {
        let mut seen_issuers = HashSet::new();
        for issuer in &issuers {
            if !seen_issuers.insert(issuer.name.as_str()) {
                return Err(DictionaryError::DuplicateName {
                    kind: RegistryKind::Card,
                    name: issuer.name.clone(),
                });
            }

            let mut seen_cards = HashSet::new();
            for card in &issuer.cards {
                if !seen_cards.insert(card.name.as_str()) {
                    return Err(DictionaryError::DuplicateName {
                        kind: RegistryKind::Card,
                        name: card.tag(),
                    });
                }
            }
        }
        Ok(CardRegistry { issuers })
    }

    pub fn issuers(&self) -> &[Issuer] {
        &self.issuers
    }

    /// All cards across all issuers, in configuration order
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.issuers.iter().flat_map(|issuer| issuer.cards.iter())
    }

    pub fn len(&self) -> usize {
        self.cards().count()
    }

    pub fn is_empty(&self) -> bool {
        self.cards().next().is_none()
    }
}

// ============================================================================
// TESTS
// ============================================================================
