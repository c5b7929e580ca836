// Mention Index - Core Library
// Tags free text with bank, card and keyword-category mentions from a
// curated dictionary. Exposes every stage for the CLI and for tests.

pub mod config;
pub mod dictionary;
pub mod entities;
pub mod error;
pub mod lemmatizer;
pub mod phrases;
pub mod pipeline;
pub mod remap;
pub mod resolver;
pub mod scanner;
pub mod stopwords;
pub mod texts;
pub mod tokenizer;

// Re-export commonly used types
pub use config::{CollisionPolicy, TaggerConfig};
pub use dictionary::{Dictionary, Registries};
pub use entities::{
    Bank, BankRegistry,
    Card, CardRegistry, Issuer,
    CategoryNaming, CategoryRegistry, KeywordCategory, NamingRules, Term,
    RegistryKind,
};
pub use error::DictionaryError;
pub use lemmatizer::Lemmatizer;
pub use phrases::{build_phrases, Phrase, PhraseSet};
pub use pipeline::{find_keywords, tag_batch, tag_text, BatchReport, BatchSummary, KeywordHits};
pub use remap::{AliasCollision, CardTag, RemapKind, RemapTable, TagCatalog};
pub use resolver::TaggedText;
pub use scanner::{scan, KeywordSet};
pub use stopwords::StopwordFilter;
pub use texts::{load_texts, write_tagged, TextUnit};
pub use tokenizer::{base_tokens, merge_phrases, retokenize, tokenize, PhraseTrie};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
