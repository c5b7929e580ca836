// 📚 Dictionary - the immutable tagging context
//
// Built once from the three registries, then shared read-only by every
// tokenize / scan / resolve call:
// - keyword set (flat, denylist applied)
// - phrase set + its longest-match trie
// - entity, card and category remap tables
// - tag catalog, stopwords, lemmatizer
//
// Building must finish before any text is tagged. Nothing here mutates after
// `build` returns, so a `&Dictionary` can cross threads freely.

use crate::config::TaggerConfig;
use crate::entities::{BankRegistry, CardRegistry, CategoryRegistry, NamingRules};
use crate::error::DictionaryError;
use crate::lemmatizer::Lemmatizer;
use crate::phrases::{build_phrases, PhraseSet};
use crate::remap::{
    build_card_remap, build_category_remap, build_entity_remap, AliasCollision, CardTag, RemapTable, TagCatalog,
};
use crate::resolver::{evidence_strings, resolve_categories, resolve_entities, TaggedText};
use crate::scanner::{scan, KeywordSet};
use crate::stopwords::StopwordFilter;
use crate::tokenizer::{tokenize, PhraseTrie};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

// ============================================================================
// REGISTRIES
// ============================================================================

/// The three decoded configuration sources
#[derive(Debug, Clone, Default)]
pub struct Registries {
    pub banks: BankRegistry,
    pub cards: CardRegistry,
    pub categories: CategoryRegistry,
}

impl Registries {
    pub fn load(config: &TaggerConfig) -> Result<Self, DictionaryError> {
        Ok(Registries {
            banks: BankRegistry::from_file(&config.banks)?,
            cards: CardRegistry::from_file(&config.cards)?,
            categories: CategoryRegistry::from_file(&config.keywords)?,
        })
    }
}

// ============================================================================
// DICTIONARY
// ============================================================================

#[derive(Debug, Clone)]
pub struct Dictionary {
    keywords: KeywordSet,
    phrases: PhraseSet,
    trie: PhraseTrie,
    entity_remap: RemapTable<String>,
    card_remap: RemapTable<CardTag>,
    category_remap: RemapTable<String>,
    catalog: TagCatalog,
    collisions: Vec<AliasCollision>,
    stopwords: Option<StopwordFilter>,
    lemmatizer: Option<Lemmatizer>,
    evidence_separator: String,
}

impl Dictionary {
    /// Load the registries named by `config` and build from them
    pub fn from_config(config: &TaggerConfig) -> Result<Self, DictionaryError> {
        let registries = Registries::load(config)?;
        Self::build(&registries, config)
    }

    pub fn build(registries: &Registries, config: &TaggerConfig) -> Result<Self, DictionaryError> {
        let Registries { banks, cards, categories } = registries;
        let policy = config.on_alias_collision;
        let rules = NamingRules::new(&config.suffixed_categories, &config.collapsed_categories);

        let phrases = build_phrases(banks, cards, categories)?;
        let trie = PhraseTrie::from_phrases(phrases.iter());
        let keywords = KeywordSet::build(banks, cards, categories, &phrases, &config.denylist);

        let mut collisions = Vec::new();
        let entity_remap = build_entity_remap(banks, policy, &mut collisions)?;
        let card_remap = build_card_remap(banks, cards, policy, &mut collisions)?;
        let category_remap = build_category_remap(categories, &rules, policy, &mut collisions)?;

        let catalog = TagCatalog::build(banks, cards, categories, &rules);

        // configured vocabulary is never a stopword
        let stopwords = config.stopwords.then(|| {
            let mut filter = StopwordFilter::english(&config.extra_stopwords);
            filter.remove_stopwords(keywords.iter());
            filter
        });

        // lemmas may only land on single-word keywords, never on a phrase fragment
        let lemmatizer = config.lemmatize.then(|| {
            Lemmatizer::new(keywords.iter().filter(|word| !word.contains(' ')))
        });

        let dictionary = Dictionary {
            keywords,
            phrases,
            trie,
            entity_remap,
            card_remap,
            category_remap,
            catalog,
            collisions,
            stopwords,
            lemmatizer,
            evidence_separator: config.evidence_separator.clone(),
        };

        for (table, surface) in dictionary.unreachable_surfaces() {
            debug!(table = %table, surface, "remap surface absent from keyword set");
        }

        info!(
            keywords = dictionary.keywords.len(),
            phrases = dictionary.phrases.len(),
            entity_surfaces = dictionary.entity_remap.len(),
            card_surfaces = dictionary.card_remap.len(),
            category_surfaces = dictionary.category_remap.len(),
            collisions = dictionary.collisions.len(),
            "dictionary built"
        );

        Ok(dictionary)
    }

    // ========================================================================
    // PER-TEXT OPERATIONS
    // ========================================================================

    /// Tokenize with this dictionary's phrases, stopwords and lemmatizer
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        tokenize(text, &self.trie, self.stopwords.as_ref(), self.lemmatizer.as_ref())
    }

    /// Matched surface tokens, or `None` when nothing matched
    pub fn scan<S: AsRef<str>>(&self, tokens: &[S]) -> Option<Vec<String>> {
        scan(tokens, &self.keywords)
    }

    pub fn resolve_entities<S: AsRef<str>>(&self, matched: &[S]) -> BTreeSet<String> {
        resolve_entities(matched, &self.entity_remap, &self.card_remap)
    }

    /// Category tag → evidence string
    pub fn resolve_categories<S: AsRef<str>>(&self, matched: &[S]) -> BTreeMap<String, String> {
        evidence_strings(resolve_categories(matched, &self.category_remap), &self.evidence_separator)
    }

    /// Both resolution passes for one text unit
    pub fn resolve<S: AsRef<str>>(&self, id: &str, matched: &[S]) -> TaggedText {
        TaggedText {
            id: id.to_string(),
            entities: self.resolve_entities(matched),
            categories: self.resolve_categories(matched),
        }
    }

    // ========================================================================
    // INSPECTION
    // ========================================================================

    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    pub fn phrases(&self) -> &PhraseSet {
        &self.phrases
    }

    pub fn entity_remap(&self) -> &RemapTable<String> {
        &self.entity_remap
    }

    pub fn card_remap(&self) -> &RemapTable<CardTag> {
        &self.card_remap
    }

    pub fn category_remap(&self) -> &RemapTable<String> {
        &self.category_remap
    }

    pub fn catalog(&self) -> &TagCatalog {
        &self.catalog
    }

    /// Collisions tolerated under the `warn` policy
    pub fn collisions(&self) -> &[AliasCollision] {
        &self.collisions
    }

    /// Remap surfaces the scanner can never produce (denylisted or otherwise
    /// missing from the keyword set), sorted by table then surface
    pub fn unreachable_surfaces(&self) -> Vec<(&'static str, &str)> {
        let mut missing: Vec<(&'static str, &str)> = Vec::new();
        let tables = [
            (self.entity_remap.kind().as_str(), self.entity_remap.surfaces().collect::<Vec<_>>()),
            (self.card_remap.kind().as_str(), self.card_remap.surfaces().collect()),
            (self.category_remap.kind().as_str(), self.category_remap.surfaces().collect()),
        ];
        for (table, surfaces) in tables {
            missing.extend(
                surfaces
                    .into_iter()
                    .filter(|surface| !self.keywords.contains(surface))
                    .map(|surface| (table, surface)),
            );
        }
        missing.sort_unstable();
        missing
    }

    /// SHA-256 over the sorted keyword set, phrases and remap entries
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();

        for word in self.keywords.sorted() {
            hasher.update(format!("K\t{}\n", word));
        }
        for phrase in self.phrases.iter() {
            hasher.update(format!("P\t{}\n", phrase.tokens().join("\t")));
        }
        for (surface, bank) in self.entity_remap.sorted_entries() {
            hasher.update(format!("E\t{}\t{}\n", surface, bank));
        }
        for (surface, card) in self.card_remap.sorted_entries() {
            hasher.update(format!("C\t{}\t{}\t{}\n", surface, card.issuer, card.tag));
        }
        for (surface, tag) in self.category_remap.sorted_entries() {
            hasher.update(format!("T\t{}\t{}\n", surface, tag));
        }

        format!("{:x}", hasher.finalize())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CollisionPolicy;

    fn registries() -> Registries {
        Registries {
            banks: BankRegistry::from_json(
                r#"{"banks": [
                    {"name": "CHASE", "alts": ["CHASE BANK"]},
                    {"name": "AMEX", "alts": ["AMERICAN EXPRESS"]}
                ]}"#,
                "inline",
            )
            .unwrap(),
            cards: CardRegistry::from_json(
                r#"{"issuer": [
                    {"name": "CHASE", "cards": [{"name": "SAPPHIRE", "alts": ["SAPPHIRE RESERVE"]}]},
                    {"name": "AMEX", "cards": [{"name": "GOLD"}, {"name": "PLATINUM", "alts": ["PLAT"]}]}
                ]}"#,
                "inline",
            )
            .unwrap(),
            categories: CategoryRegistry::from_json(
                r#"{"keywords": [
                    {"tag": "FEE", "terms": [{"term": "ANNUAL FEE"}, {"term": "FOREIGN TRANSACTION", "alts": ["FTF"]}]},
                    {"tag": "REWARDS", "terms": [{"term": "POINTS"}]},
                    {"tag": "INTEREST", "terms": [{"term": "APR"}, {"term": "INTEREST RATE"}]},
                    {"tag": "", "terms": [{"term": "CREDIT LIMIT", "alts": ["CL"]}]}
                ]}"#,
                "inline",
            )
            .unwrap(),
        }
    }

    fn dictionary() -> Dictionary {
        Dictionary::build(&registries(), &TaggerConfig::default()).unwrap()
    }

    #[test]
    fn test_denylisted_name_is_not_a_keyword() {
        let dict = dictionary();
        assert!(!dict.keywords().contains("GOLD"));
        assert!(dict.keywords().contains("AMEX GOLD"));

        let unreachable = dict.unreachable_surfaces();
        assert!(unreachable.contains(&("card", "GOLD")));
    }

    #[test]
    fn test_tokens_never_dropped_as_stopwords_when_configured() {
        let dict = dictionary();
        // "CL" and "APR" are vocabulary even if a stopword list carries them
        let tokens = dict.tokenize("The CL and the APR");
        assert_eq!(tokens, vec!["CL", "APR"]);
    }

    #[test]
    fn test_resolve_full_text() {
        let dict = dictionary();
        let tokens = dict.tokenize("Got the Amex Platinum, the points are great but the APR and interest rate hurt");
        let matched = dict.scan(&tokens).unwrap();
        let tagged = dict.resolve("t3_abc", &matched);

        assert_eq!(tagged.id, "t3_abc");
        assert_eq!(
            tagged.entities.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["AMEX", "AMEX_PLATINUM"]
        );
        assert_eq!(tagged.categories["POINTS_REWARDS"], "POINTS");
        assert_eq!(tagged.categories["INTEREST"], "APR,INTEREST RATE");
    }

    #[test]
    fn test_suffix_phrase_resolves_to_same_tag() {
        let dict = dictionary();
        let tokens = dict.tokenize("no ftf fee abroad");
        let matched = dict.scan(&tokens).unwrap();

        assert_eq!(matched, vec!["FTF FEE"]);
        assert_eq!(dict.resolve_categories(&matched)["FOREIGN TRANSACTION_FEE"], "FTF FEE");
    }

    #[test]
    fn test_fingerprint_is_deterministic() {
        let a = dictionary();
        let b = dictionary();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);

        let mut config = TaggerConfig::default();
        config.denylist.clear();
        let c = Dictionary::build(&registries(), &config).unwrap();
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn test_catalog() {
        let dict = dictionary();
        let catalog = dict.catalog();
        assert!(catalog.entity_tags.contains("AMEX_GOLD"));
        assert!(catalog.category_tags.contains("ANNUAL FEE_FEE"));
        assert!(catalog.category_tags.contains("INTEREST"));
        assert!(catalog.category_tags.contains("CREDIT LIMIT"));
        assert!(!catalog.category_tags.contains("APR"));
    }

    #[test]
    fn test_collision_policy_applies() {
        let mut registries = registries();
        registries.banks = BankRegistry::from_json(
            r#"{"banks": [
                {"name": "CHASE", "alts": ["CHASE BANK", "JPM"]},
                {"name": "AMEX", "alts": ["JPM"]}
            ]}"#,
            "inline",
        )
        .unwrap();

        let dict = Dictionary::build(&registries, &TaggerConfig::default()).unwrap();
        assert_eq!(dict.collisions().len(), 1);

        let config = TaggerConfig {
            on_alias_collision: CollisionPolicy::Fail,
            ..TaggerConfig::default()
        };
        assert!(matches!(
            Dictionary::build(&registries, &config),
            Err(DictionaryError::AliasCollision(_))
        ));
    }

    #[test]
    fn test_unruled_tag_phrase_still_resolves() {
        let mut registries = registries();
        registries.categories = CategoryRegistry::from_json(
            r#"{"keywords": [{"tag": "TRAVEL", "terms": [{"term": "LOUNGE"}]}]}"#,
            "inline",
        )
        .unwrap();
        let dict = Dictionary::build(&registries, &TaggerConfig::default()).unwrap();

        let tokens = dict.tokenize("lounge travel perks");
        let matched = dict.scan(&tokens).unwrap();
        assert_eq!(matched, vec!["LOUNGE TRAVEL"]);
        assert_eq!(
            dict.resolve_categories(&matched),
            BTreeMap::from([("LOUNGE".to_string(), "LOUNGE TRAVEL".to_string())])
        );
        assert!(!dict.unreachable_surfaces().contains(&("category", "LOUNGE TRAVEL")));
    }

    #[test]
    fn test_lemmatizer_only_targets_single_word_keywords() {
        let registries = Registries {
            banks: BankRegistry::from_json(r#"{"banks": [{"name": "US BANK"}]}"#, "inline").unwrap(),
            cards: CardRegistry::default(),
            categories: CategoryRegistry::from_json(
                r#"{"keywords": [{"tag": "", "terms": [{"term": "FEE"}, {"term": "FOREIGN TRANSACTION"}]}]}"#,
                "inline",
            )
            .unwrap(),
        };
        let config = TaggerConfig {
            lemmatize: true,
            stopwords: false,
            ..TaggerConfig::default()
        };
        let dict = Dictionary::build(&registries, &config).unwrap();

        // BANK and TRANSACTION only occur inside phrases
        let tokens = dict.tokenize("banks charge fees on transactions");
        assert_eq!(tokens, vec!["BANKS", "CHARGE", "FEE", "ON", "TRANSACTIONS"]);
        assert_eq!(dict.scan(&tokens), Some(vec!["FEE".to_string()]));
    }

    #[test]
    fn test_sample_registries_build() {
        let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
        let config = TaggerConfig::from_file(dir.join("tagger.json")).unwrap();
        let dict = Dictionary::from_config(&config).unwrap();

        assert!(!dict.keywords().is_empty());
        assert!(!dict.phrases().is_empty());
        assert!(dict.catalog().entity_tags.contains("CHASE_SAPPHIRE"));
    }
}
