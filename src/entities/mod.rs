// Entity Registries - banks, card issuers, keyword categories
//
// Each registry is decoded once from its JSON document into validated,
// explicitly typed records:
// - Mandatory fields (`name`, `term`, `tag`, `cards`) fail fast when absent
// - Optional `alts` default to an empty list
// - Every string is trimmed, whitespace-collapsed and upper-cased so it lines
//   up with the tokenizer's case folding

pub mod bank;
pub mod card;
pub mod category;

pub use bank::{Bank, BankRegistry};
pub use card::{Card, CardRegistry, Issuer};
pub use category::{CategoryNaming, CategoryRegistry, KeywordCategory, NamingRules, Term};

use crate::error::DictionaryError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

// ============================================================================
// REGISTRY TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegistryKind {
    Bank,
    Card,
    KeywordCategory,
}

impl RegistryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistryKind::Bank => "bank",
            RegistryKind::Card => "card",
            RegistryKind::KeywordCategory => "keyword-category",
        }
    }
}

impl fmt::Display for RegistryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SHARED HELPERS
// ============================================================================

/// Canonical surface form: upper-case, single spaces, no outer whitespace.
///
/// Example: `"  Chase   bank "` → `"CHASE BANK"`
pub fn normalize_surface(raw: &str) -> String {
    raw.split_whitespace()
        .map(|part| part.to_uppercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// True when the surface form spans more than one base token
pub fn is_multi_word(surface: &str) -> bool {
    surface.split_whitespace().nth(1).is_some()
}

/// Read and decode one registry document
pub(crate) fn read_registry<T: DeserializeOwned>(
    kind: RegistryKind,
    path: &Path,
) -> Result<T, DictionaryError> {
    let content = fs::read_to_string(path).map_err(|source| DictionaryError::Io {
        kind,
        path: path.to_path_buf(),
        source,
    })?;

    parse_registry(kind, &content, &path.display().to_string())
}

pub(crate) fn parse_registry<T: DeserializeOwned>(
    kind: RegistryKind,
    content: &str,
    origin: &str,
) -> Result<T, DictionaryError> {
    serde_json::from_str(content).map_err(|source| DictionaryError::Malformed {
        kind,
        origin: origin.to_string(),
        source,
    })
}

/// Validate a mandatory string field and normalize it
pub(crate) fn required(
    value: Option<String>,
    kind: RegistryKind,
    location: impl FnOnce() -> String,
    field: &'static str,
) -> Result<String, DictionaryError> {
    match value.as_deref().map(normalize_surface) {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(DictionaryError::MissingField {
            kind,
            location: location(),
            field,
        }),
    }
}

/// Normalize an alias list, dropping blanks, repeats and the canonical name itself
pub(crate) fn normalize_aliases(alts: Option<Vec<String>>, canonical: &str) -> Vec<String> {
    let mut aliases: Vec<String> = Vec::new();
    for alt in alts.unwrap_or_default() {
        let alt = normalize_surface(&alt);
        if !alt.is_empty() && alt != canonical && !aliases.contains(&alt) {
            aliases.push(alt);
        }
    }
    aliases
}

// ============================================================================
// TESTS
// ============================================================================
