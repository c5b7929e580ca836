// 🏦 Bank Entity - canonical bank names + aliases
//
// "CHASE", "CHASE BANK", "JPMORGAN CHASE" → All the same bank tag
//
// Registry document shape:
// {"banks": [{"name": "CHASE", "alts": ["CHASE BANK"]}, ...]}

use super::{normalize_aliases, parse_registry, read_registry, required, RegistryKind};
use crate::error::DictionaryError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

// ============================================================================
// BANK ENTITY
// ============================================================================

/// One bank (or card issuer) as registered in the bank registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
    /// Canonical name, used as the bank tag
    pub name: String,

    /// Alternative names that map to this bank
    /// Example: ["CHASE BANK", "JPMORGAN CHASE"]
    pub alts: Vec<String>,
}

impl Bank {
    pub fn new(name: impl Into<String>) -> Self {
        Bank {
            name: super::normalize_surface(&name.into()),
            alts: Vec::new(),
        }
    }

    /// Builder: add an alias
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.add_alias(alias.into());
        self
    }

    /// Add an alias to this bank (ignores repeats and the canonical name)
    pub fn add_alias(&mut self, alias: String) {
        let alias = super::normalize_surface(&alias);
        if !alias.is_empty() && !self.alts.contains(&alias) && alias != self.name {
            self.alts.push(alias);
        }
    }

    /// Get all names (canonical + aliases)
    pub fn all_names(&self) -> Vec<String> {
        let mut names = vec![self.name.clone()];
        names.extend(self.alts.iter().cloned());
        names
    }
}

#[derive(Debug, Deserialize)]
struct BankDocument {
    banks: Vec<RawBank>,
}

#[derive(Debug, Deserialize)]
struct RawBank {
    name: Option<String>,
    #[serde(default)]
    alts: Option<Vec<String>>,
}

// ============================================================================
// BANK REGISTRY
// ============================================================================

/// Registry of all configured banks, in configuration order
#[derive(Debug, Clone, Default)]
pub struct BankRegistry {
    banks: Vec<Bank>,
}

impl BankRegistry {
    /// Load the registry from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DictionaryError> {
        let document: BankDocument = read_registry(RegistryKind::Bank, path.as_ref())?;
        Self::from_document(document)
    }

    /// Parse the registry from JSON text (`origin` labels errors)
    pub fn from_json(content: &str, origin: &str) -> Result<Self, DictionaryError> {
        let document: BankDocument = parse_registry(RegistryKind::Bank, content, origin)?;
        Self::from_document(document)
    }

    fn from_document(document: BankDocument) -> Result<Self, DictionaryError> {
        let mut banks = Vec::with_capacity(document.banks.len());
        for (index, raw) in document.banks.into_iter().enumerate() {
            let name = required(raw.name, RegistryKind::Bank, || format!("banks[{}]", index), "name")?;
            let alts = normalize_aliases(raw.alts, &name);
            banks.push(Bank { name, alts });
        }
        Self::from_banks(banks)
    }

    /// Create registry from already-built banks; canonical names must be unique
    pub fn from_banks(banks: Vec<Bank>) -> Result<Self, DictionaryError> {
        let mut seen = HashSet::new();
        for bank in &banks {
            if bank.name.is_empty() {
                return Err(DictionaryError::MissingField {
                    kind: RegistryKind::Bank,
                    location: "banks".to_string(),
                    field: "name",
                });
            }
            if !seen.insert(bank.name.as_str()) {
                return Err(DictionaryError::DuplicateName {
                    kind: RegistryKind::Bank,
                    name: bank.name.clone(),
                });
            }
        }
        Ok(BankRegistry { banks })
    }

    /// Find bank by canonical name
    pub fn get(&self, name: &str) -> Option<&Bank> {
        self.banks.iter().find(|b| b.name == name)
    }

    pub fn banks(&self) -> &[Bank] {
        &self.banks
    }

    pub fn len(&self) -> usize {
        self.banks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.banks.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================
