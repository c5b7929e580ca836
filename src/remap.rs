// 🔁 Remap Tables - surface form → canonical tag
//
// Three tables are built from the registries:
// - Entity:   bank name / bank alias            → bank tag
// - Card:     card name / alias / "ISSUER CARD" → issuer + "ISSUER_CARD" tag
// - Category: term / alias / "TERM TAG" forms   → category tag (naming rules)
//
// A surface claimed by two different targets is an alias collision. The
// configured policy either logs it and keeps the later assignment, or aborts
// the build.

use crate::config::CollisionPolicy;
use crate::entities::{BankRegistry, CardRegistry, CategoryNaming, CategoryRegistry, NamingRules};
use crate::error::DictionaryError;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use tracing::warn;

// ============================================================================
// REMAP KIND + COLLISIONS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RemapKind {
    Entity,
    Card,
    Category,
}

impl RemapKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemapKind::Entity => "entity",
            RemapKind::Card => "card",
            RemapKind::Category => "category",
        }
    }
}

impl fmt::Display for RemapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A surface form claimed by two different canonical targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasCollision {
    pub table: RemapKind,
    pub surface: String,
    pub existing: String,
    pub incoming: String,
}

impl fmt::Display for AliasCollision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} remap: {:?} claimed by {:?} and {:?}",
            self.table, self.surface, self.existing, self.incoming
        )
    }
}

// ============================================================================
// CARD TARGET
// ============================================================================

/// What a card surface resolves to: the composite tag and its issuing bank
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CardTag {
    pub issuer: String,
    pub tag: String,
}

impl fmt::Display for CardTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)
    }
}

// ============================================================================
// REMAP TABLE
// ============================================================================

#[derive(Debug, Clone)]
pub struct RemapTable<V> {
    kind: RemapKind,
    entries: HashMap<String, V>,
}

impl<V: Clone + PartialEq + fmt::Display> RemapTable<V> {
    pub fn new(kind: RemapKind) -> Self {
        RemapTable {
            kind,
            entries: HashMap::new(),
        }
    }

    /// Map `surface` to `target`, checking for a conflicting earlier assignment
    pub fn insert(
        &mut self,
        surface: String,
        target: V,
        policy: CollisionPolicy,
        collisions: &mut Vec<AliasCollision>,
    ) -> Result<(), DictionaryError> {
        if let Some(existing) = self.entries.get(&surface) {
            if *existing != target {
                let collision = AliasCollision {
                    table: self.kind,
                    surface: surface.clone(),
                    existing: existing.to_string(),
                    incoming: target.to_string(),
                };
                match policy {
                    CollisionPolicy::Fail => return Err(DictionaryError::AliasCollision(collision)),
                    CollisionPolicy::Warn => {
                        warn!(
                            table = %collision.table,
                            surface = %collision.surface,
                            existing = %collision.existing,
                            incoming = %collision.incoming,
                            "alias collision, later assignment wins"
                        );
                        collisions.push(collision);
                    }
                }
            }
        }
        self.entries.insert(surface, target);
        Ok(())
    }
}

impl<V> RemapTable<V> {
    pub fn get(&self, surface: &str) -> Option<&V> {
        self.entries.get(surface)
    }

    pub fn kind(&self) -> RemapKind {
        self.kind
    }

    pub fn surfaces(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries sorted by surface
    pub fn sorted_entries(&self) -> Vec<(&str, &V)> {
        let mut entries: Vec<(&str, &V)> = self.entries.iter().map(|(k, v)| (k.as_str(), v)).collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// BUILDERS
// ============================================================================

/// Every bank name and alias → the bank's canonical name
pub fn build_entity_remap(
    banks: &BankRegistry,
    policy: CollisionPolicy,
    collisions: &mut Vec<AliasCollision>,
) -> Result<RemapTable<String>, DictionaryError> {
    let mut table = RemapTable::new(RemapKind::Entity);
    for bank in banks.banks() {
        for surface in bank.all_names() {
            table.insert(surface, bank.name.clone(), policy, collisions)?;
        }
    }
    Ok(table)
}

/// Card names, card aliases and every "issuer-name card-name" compound
/// (issuer aliases included) → composite card tag
pub fn build_card_remap(
    banks: &BankRegistry,
    cards: &CardRegistry,
    policy: CollisionPolicy,
    collisions: &mut Vec<AliasCollision>,
) -> Result<RemapTable<CardTag>, DictionaryError> {
    let mut table = RemapTable::new(RemapKind::Card);

    for issuer in cards.issuers() {
        let issuer_names = banks
            .get(&issuer.name)
            .map(|bank| bank.all_names())
            .ok_or_else(|| DictionaryError::UnknownIssuer {
                issuer: issuer.name.clone(),
            })?;

        for card in &issuer.cards {
            let target = CardTag {
                issuer: issuer.name.clone(),
                tag: card.tag(),
            };
            let card_names = card.all_names();

            for issuer_name in &issuer_names {
                for card_name in &card_names {
                    table.insert(format!("{} {}", issuer_name, card_name), target.clone(), policy, collisions)?;
                }
            }
            for card_name in card_names {
                table.insert(card_name, target.clone(), policy, collisions)?;
            }
        }
    }

    Ok(table)
}

/// Category surfaces → canonical category tag
///
/// Any category with a non-empty tag also accepts "SURFACE TAG" forms
/// (e.g. "ANNUAL FEE FEE", "APR INTEREST", "LOUNGE TRAVEL"); untagged
/// categories accept only the term and its aliases.
pub fn build_category_remap(
    categories: &CategoryRegistry,
    rules: &NamingRules,
    policy: CollisionPolicy,
    collisions: &mut Vec<AliasCollision>,
) -> Result<RemapTable<String>, DictionaryError> {
    let mut table = RemapTable::new(RemapKind::Category);

    for category in categories.categories() {
        let naming = rules.naming_for(&category.tag);
        for term in &category.terms {
            let target = rules.canonical_tag(&category.tag, &term.term);

            let mut surfaces = Vec::new();
            if naming == CategoryNaming::Collapsed {
                surfaces.push(category.tag.clone());
            }
            for name in term.all_names() {
                // every tagged category emits (term, TAG) phrases, so the
                // merged form must resolve even under bare naming
                if category.is_tagged() {
                    surfaces.push(format!("{} {}", name, category.tag));
                }
                surfaces.push(name);
            }

            for surface in surfaces {
                table.insert(surface, target.clone(), policy, collisions)?;
            }
        }
    }

    Ok(table)
}

// ============================================================================
// TAG CATALOG
// ============================================================================

/// Every canonical tag a run can emit, for downstream storage layout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TagCatalog {
    pub entity_tags: BTreeSet<String>,
    pub category_tags: BTreeSet<String>,
}

impl TagCatalog {
    pub fn build(banks: &BankRegistry, cards: &CardRegistry, categories: &CategoryRegistry, rules: &NamingRules) -> Self {
        let mut entity_tags: BTreeSet<String> = banks.banks().iter().map(|b| b.name.clone()).collect();
        entity_tags.extend(cards.cards().map(|c| c.tag()));

        let category_tags = categories
            .categories()
            .iter()
            .flat_map(|category| {
                category
                    .terms
                    .iter()
                    .map(move |term| rules.canonical_tag(&category.tag, &term.term))
            })
            .collect();

        TagCatalog {
            entity_tags,
            category_tags,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn banks() -> BankRegistry {
        BankRegistry::from_json(
            r#"{"banks": [
                {"name": "CHASE", "alts": ["CHASE BANK"]},
                {"name": "AMEX", "alts": ["AMERICAN EXPRESS"]}
            ]}"#,
            "inline",
        )
        .unwrap()
    }

    fn cards() -> CardRegistry {
        CardRegistry::from_json(
            r#"{"issuer": [
                {"name": "CHASE", "cards": [{"name": "SAPPHIRE", "alts": ["CSR"]}]},
                {"name": "AMEX", "cards": [{"name": "GOLD"}]}
            ]}"#,
            "inline",
        )
        .unwrap()
    }

    fn categories() -> CategoryRegistry {
        CategoryRegistry::from_json(
            r#"{"keywords": [
                {"tag": "FEE", "terms": [{"term": "ANNUAL FEE", "alts": ["AF"]}]},
                {"tag": "INTEREST", "terms": [{"term": "APR", "alts": ["PURCHASE APR"]}, {"term": "INTEREST RATE"}]},
                {"tag": "", "terms": [{"term": "CREDIT SCORE", "alts": ["FICO"]}]}
            ]}"#,
            "inline",
        )
        .unwrap()
    }

    fn rules() -> NamingRules {
        NamingRules::new(&["FEE", "REWARDS"], &["INTEREST"])
    }

    #[test]
    fn test_entity_remap() {
        let mut collisions = Vec::new();
        let table = build_entity_remap(&banks(), CollisionPolicy::Warn, &mut collisions).unwrap();

        assert_eq!(table.get("CHASE").map(String::as_str), Some("CHASE"));
        assert_eq!(table.get("CHASE BANK").map(String::as_str), Some("CHASE"));
        assert_eq!(table.get("AMERICAN EXPRESS").map(String::as_str), Some("AMEX"));
        assert!(table.get("SAPPHIRE").is_none());
        assert!(collisions.is_empty());
    }

    #[test]
    fn test_card_remap_covers_issuer_compounds() {
        let mut collisions = Vec::new();
        let table = build_card_remap(&banks(), &cards(), CollisionPolicy::Warn, &mut collisions).unwrap();

        for surface in ["SAPPHIRE", "CSR", "CHASE SAPPHIRE", "CHASE CSR", "CHASE BANK SAPPHIRE", "CHASE BANK CSR"] {
            let hit = table.get(surface).unwrap_or_else(|| panic!("missing {surface}"));
            assert_eq!(hit.tag, "CHASE_SAPPHIRE");
            assert_eq!(hit.issuer, "CHASE");
        }
        assert_eq!(table.get("AMERICAN EXPRESS GOLD").unwrap().tag, "AMEX_GOLD");
        assert!(table.get("CHASE").is_none());
    }

    #[test]
    fn test_card_remap_unknown_issuer_fails() {
        let cards = CardRegistry::from_json(r#"{"issuer": [{"name": "CITI", "cards": [{"name": "DOUBLE CASH"}]}]}"#, "inline")
            .unwrap();
        let err = build_card_remap(&banks(), &cards, CollisionPolicy::Warn, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, DictionaryError::UnknownIssuer { issuer } if issuer == "CITI"));
    }

    #[test]
    fn test_category_remap_naming() {
        let mut collisions = Vec::new();
        let table = build_category_remap(&categories(), &rules(), CollisionPolicy::Warn, &mut collisions).unwrap();

        assert_eq!(table.get("ANNUAL FEE").unwrap(), "ANNUAL FEE_FEE");
        assert_eq!(table.get("ANNUAL FEE FEE").unwrap(), "ANNUAL FEE_FEE");
        assert_eq!(table.get("AF").unwrap(), "ANNUAL FEE_FEE");
        assert_eq!(table.get("AF FEE").unwrap(), "ANNUAL FEE_FEE");

        for surface in ["APR", "PURCHASE APR", "APR INTEREST", "INTEREST RATE", "INTEREST"] {
            assert_eq!(table.get(surface).unwrap(), "INTEREST", "surface {surface}");
        }

        assert_eq!(table.get("CREDIT SCORE").unwrap(), "CREDIT SCORE");
        assert_eq!(table.get("FICO").unwrap(), "CREDIT SCORE");
        assert!(table.get("FICO ").is_none());
        assert!(collisions.is_empty());
    }

    #[test]
    fn test_category_remap_unruled_tag_accepts_tag_suffix() {
        let categories = CategoryRegistry::from_json(
            r#"{"keywords": [{"tag": "TRAVEL", "terms": [{"term": "LOUNGE", "alts": ["PRIORITY PASS"]}]}]}"#,
            "inline",
        )
        .unwrap();

        let mut collisions = Vec::new();
        let table = build_category_remap(&categories, &rules(), CollisionPolicy::Warn, &mut collisions).unwrap();

        // TRAVEL has no naming rule, so the term itself is the tag
        for surface in ["LOUNGE", "LOUNGE TRAVEL", "PRIORITY PASS", "PRIORITY PASS TRAVEL"] {
            assert_eq!(table.get(surface).unwrap(), "LOUNGE", "surface {surface}");
        }
        assert!(table.get("TRAVEL").is_none());
        assert!(collisions.is_empty());
    }

    #[test]
    fn test_collision_warn_keeps_later_assignment() {
        let banks = BankRegistry::from_json(
            r#"{"banks": [
                {"name": "CITI", "alts": ["CITIBANK"]},
                {"name": "CITIGROUP", "alts": ["CITIBANK"]}
            ]}"#,
            "inline",
        )
        .unwrap();

        let mut collisions = Vec::new();
        let table = build_entity_remap(&banks, CollisionPolicy::Warn, &mut collisions).unwrap();

        assert_eq!(table.get("CITIBANK").map(String::as_str), Some("CITIGROUP"));
        assert_eq!(
            collisions,
            vec![AliasCollision {
                table: RemapKind::Entity,
                surface: "CITIBANK".to_string(),
                existing: "CITI".to_string(),
                incoming: "CITIGROUP".to_string(),
            }]
        );
    }

    #[test]
    fn test_collision_fail_policy_aborts() {
        let banks = BankRegistry::from_json(
            r#"{"banks": [
                {"name": "CITI", "alts": ["CITIBANK"]},
                {"name": "CITIGROUP", "alts": ["CITIBANK"]}
            ]}"#,
            "inline",
        )
        .unwrap();

        let err = build_entity_remap(&banks, CollisionPolicy::Fail, &mut Vec::new()).unwrap_err();
        match err {
            DictionaryError::AliasCollision(collision) => assert_eq!(collision.surface, "CITIBANK"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_tag_catalog() {
        let catalog = TagCatalog::build(&banks(), &cards(), &categories(), &rules());

        let entities: Vec<&str> = catalog.entity_tags.iter().map(String::as_str).collect();
        assert_eq!(entities, vec!["AMEX", "AMEX_GOLD", "CHASE", "CHASE_SAPPHIRE"]);

        let categories: Vec<&str> = catalog.category_tags.iter().map(String::as_str).collect();
        assert_eq!(categories, vec!["ANNUAL FEE_FEE", "CREDIT SCORE", "INTEREST"]);
    }
}
