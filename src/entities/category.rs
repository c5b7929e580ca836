// 🏷️ Keyword Categories - topical tag groups (FEE, REWARDS, INTEREST, untagged)
//
// The category tag decides how its terms are named in the output:
// - Suffixed  (FEE, REWARDS): term "ANNUAL FEE" under FEE → "ANNUAL FEE_FEE"
// - Collapsed (INTEREST):     every term → "INTEREST"
// - Bare      (anything else, including ""): term → itself
//
// Registry document shape:
// {"keywords": [{"tag": "FEE", "terms": [{"term": "ANNUAL FEE", "alts": ["AF"]}]}]}

use super::{normalize_aliases, normalize_surface, parse_registry, read_registry, required, RegistryKind};
use crate::error::DictionaryError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

// ============================================================================
// TERM + CATEGORY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub term: String,
    pub alts: Vec<String>,
}

impl Term {
    pub fn all_names(&self) -> Vec<String> {
        let mut names = vec![self.term.clone()];
        names.extend(self.alts.iter().cloned());
        names
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCategory {
    /// Category tag; empty string means "no suffixing"
    pub tag: String,
    pub terms: Vec<Term>,
}

impl KeywordCategory {
    pub fn is_tagged(&self) -> bool {
        !self.tag.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct KeywordDocument {
    keywords: Vec<RawCategory>,
}

#[derive(Debug, Deserialize)]
struct RawCategory {
    tag: Option<String>,
    terms: Option<Vec<RawTerm>>,
}

#[derive(Debug, Deserialize)]
struct RawTerm {
    term: Option<String>,
    #[serde(default)]
    alts: Option<Vec<String>>,
}

// ============================================================================
// NAMING RULES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryNaming {
    /// `term_TAG`
    Suffixed,
    /// `TAG`, whatever the term
    Collapsed,
    /// the term itself
    Bare,
}

/// Which category tags are suffixed and which collapse to a single tag
#[derive(Debug, Clone, Default)]
pub struct NamingRules {
    suffixed: HashSet<String>,
    collapsed: HashSet<String>,
}

impl NamingRules {
    pub fn new<S: AsRef<str>>(suffixed: &[S], collapsed: &[S]) -> Self {
        NamingRules {
            suffixed: suffixed.iter().map(|t| normalize_surface(t.as_ref())).collect(),
            collapsed: collapsed.iter().map(|t| normalize_surface(t.as_ref())).collect(),
        }
    }

    pub fn naming_for(&self, tag: &str) -> CategoryNaming {
        if tag.is_empty() {
            CategoryNaming::Bare
        } else if self.collapsed.contains(tag) {
            CategoryNaming::Collapsed
        } else if self.suffixed.contains(tag) {
            CategoryNaming::Suffixed
        } else {
            CategoryNaming::Bare
        }
    }

    /// Canonical output tag for `term` filed under category `tag`
    pub fn canonical_tag(&self, tag: &str, term: &str) -> String {
        match self.naming_for(tag) {
            CategoryNaming::Suffixed => format!("{}_{}", term, tag),
            CategoryNaming::Collapsed => tag.to_string(),
            CategoryNaming::Bare => term.to_string(),
        }
    }
}

// ============================================================================
// CATEGORY REGISTRY
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct CategoryRegistry {
    categories: Vec<KeywordCategory>,
}

impl CategoryRegistry {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DictionaryError> {
        let document: KeywordDocument = read_registry(RegistryKind::KeywordCategory, path.as_ref())?;
        Self::from_document(document)
    }

    pub fn from_json(content: &str, origin: &str) -> Result<Self, DictionaryError> {
        let document: KeywordDocument = parse_registry(RegistryKind::KeywordCategory, content, origin)?;
        Self::from_document(document)
    }

    fn from_document(document: KeywordDocument) -> Result<Self, DictionaryError> {
        let kind = RegistryKind::KeywordCategory;
        let mut categories = Vec::with_capacity(document.keywords.len());

        for (i, raw) in document.keywords.into_iter().enumerate() {
            // an empty tag is valid, an absent one is not
            let tag = raw.tag.map(|t| normalize_surface(&t)).ok_or_else(|| DictionaryError::MissingField {
                kind,
                location: format!("keywords[{}]", i),
                field: "tag",
            })?;
            let raw_terms = raw.terms.ok_or_else(|| DictionaryError::MissingField {
                kind,
                location: format!("keywords[{}]", i),
                field: "terms",
            })?;

            let mut terms = Vec::with_capacity(raw_terms.len());
            for (j, raw_term) in raw_terms.into_iter().enumerate() {
                let term = required(raw_term.term, kind, || format!("keywords[{}].terms[{}]", i, j), "term")?;
                let alts = normalize_aliases(raw_term.alts, &term);
                terms.push(Term { term, alts });
            }

            categories.push(KeywordCategory { tag, terms });
        }

        Self::from_categories(categories)
    }

    /// Terms must be unique within their category
    pub fn from_categories(categories: Vec<KeywordCategory>) -> Result<Self, DictionaryError> {
        for category in &categories {
            let mut seen = HashSet::new();
            for term in &category.terms {
                if !seen.insert(term.term.as_str()) {
                    return Err(DictionaryError::DuplicateName {
                        kind: RegistryKind::KeywordCategory,
                        name: format!("{}/{}", category.tag, term.term),
                    });
                }
            }
        }
        Ok(CategoryRegistry { categories })
    }

    pub fn categories(&self) -> &[KeywordCategory] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================
