// ⚙️ Tagger Configuration - Rules as Data
// Registry locations, denylist and naming rules live in one JSON document

use serde::{Deserialize, Serialize};
use anyhow::{Result, Context as AnyhowContext};
use std::fs;
use std::path::{Path, PathBuf};

/// What to do when two entities claim the same surface form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Log the collision and keep the later assignment
    #[default]
    Warn,
    /// Abort the dictionary build
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggerConfig {
    /// Bank registry (`{"banks": [...]}`)
    pub banks: PathBuf,

    /// Card-issuer registry (`{"issuer": [...]}`)
    pub cards: PathBuf,

    /// Keyword-category registry (`{"keywords": [...]}`)
    pub keywords: PathBuf,

    /// Surfaces removed from the keyword set (short or ambiguous words)
    pub denylist: Vec<String>,

    /// Category tags whose terms are tagged `TERM_TAG`
    pub suffixed_categories: Vec<String>,

    /// Category tags whose terms all collapse to the tag itself
    pub collapsed_categories: Vec<String>,

    pub on_alias_collision: CollisionPolicy,

    /// Drop English stopwords while tokenizing
    pub stopwords: bool,

    /// Appended to the English stopword list
    pub extra_stopwords: Vec<String>,

    pub lemmatize: bool,

    /// Joins the distinct surface tokens backing one category tag
    pub evidence_separator: String,
}

pub fn default_denylist() -> Vec<String> {
    [
        "CARD",
        "DC",
        "FREEDOM",
        "GOLD",
        "GREEN",
        "INFINITE",
        "IT",
        "OPEN",
        "JOURNEY",
        "SPARK",
        "AF FEE",
        "INTEREST INTEREST",
        "GRACE PERIOD FEE",
        "MINIMUM PAYMENT PAYMENT",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

pub fn default_extra_stopwords() -> Vec<String> {
    ["COM", "HTTP", "HTTPS", "WWW", "AMP", "GT", "LT", "LE"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for TaggerConfig {
    fn default() -> Self {
        TaggerConfig {
            banks: PathBuf::from("banks.json"),
            cards: PathBuf::from("cards.json"),
            keywords: PathBuf::from("keywords.json"),
            denylist: default_denylist(),
            suffixed_categories: vec!["FEE".to_string(), "REWARDS".to_string()],
            collapsed_categories: vec!["INTEREST".to_string()],
            on_alias_collision: CollisionPolicy::Warn,
            stopwords: true,
            extra_stopwords: default_extra_stopwords(),
            lemmatize: false,
            evidence_separator: ",".to_string(),
        }
    }
}

impl TaggerConfig {
    /// Load config from JSON file; registry paths resolve against its directory
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: TaggerConfig = serde_json::from_str(&content)
            .context("Failed to parse config JSON")?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.relative_to(base))
    }

    /// `path` is either a config file or a directory holding the registries
    /// under their default names
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.is_dir() {
            Ok(TaggerConfig::in_dir(path))
        } else {
            TaggerConfig::from_file(path)
        }
    }

    /// Config whose registries sit in `dir` under their default file names
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        TaggerConfig::default().relative_to(dir.as_ref())
    }

    fn relative_to(mut self, base: &Path) -> Self {
        for path in [&mut self.banks, &mut self.cards, &mut self.keywords] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
        self
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = TaggerConfig::default();
        assert!(config.denylist.contains(&"GOLD".to_string()));
        assert_eq!(config.suffixed_categories, vec!["FEE", "REWARDS"]);
        assert_eq!(config.collapsed_categories, vec!["INTEREST"]);
        assert_eq!(config.on_alias_collision, CollisionPolicy::Warn);
        assert!(config.stopwords);
        assert!(!config.lemmatize);
        assert_eq!(config.evidence_separator, ",");
    }

    #[test]
    fn test_from_file_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tagger.json");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"{{"banks": "registries/banks.json", "cards": "/abs/cards.json", "on_alias_collision": "fail", "lemmatize": true}}"#
        )
        .unwrap();

        let config = TaggerConfig::from_file(&path).unwrap();
        assert_eq!(config.banks, dir.path().join("registries/banks.json"));
        assert_eq!(config.cards, PathBuf::from("/abs/cards.json"));
        assert_eq!(config.keywords, dir.path().join("keywords.json"));
        assert_eq!(config.on_alias_collision, CollisionPolicy::Fail);
        assert!(config.lemmatize);
        // untouched fields keep their defaults
        assert_eq!(config.denylist, default_denylist());
    }

    #[test]
    fn test_from_file_rejects_bad_policy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tagger.json");
        fs::write(&path, r#"{"on_alias_collision": "ignore"}"#).unwrap();
        assert!(TaggerConfig::from_file(&path).is_err());
    }

    #[test]
    fn test_load_directory_uses_default_names() {
        let dir = tempfile::tempdir().unwrap();

        let config = TaggerConfig::load(dir.path()).unwrap();
        assert_eq!(config.banks, dir.path().join("banks.json"));
        assert_eq!(config.cards, dir.path().join("cards.json"));
        assert_eq!(config.keywords, dir.path().join("keywords.json"));
        assert_eq!(config.denylist, default_denylist());
    }

    #[test]
    fn test_load_file_delegates_to_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tagger.json");
        fs::write(&path, r#"{"keywords": "categories.json"}"#).unwrap();

        let config = TaggerConfig::load(&path).unwrap();
        assert_eq!(config.keywords, dir.path().join("categories.json"));
        assert_eq!(config.banks, dir.path().join("banks.json"));
    }

    #[test]
    fn test_missing_file_fails() {
        assert!(TaggerConfig::from_file("/definitely/not/here.json").is_err());
    }
}
