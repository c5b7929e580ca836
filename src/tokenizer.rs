// ✂️ Tokenizer - upper-case word tokens with multi-word phrases merged
//
// 1. case-fold to upper-case
// 2. base tokens = maximal runs of word characters (\w+)
// 3. greedy left-to-right merge: at each position take the LONGEST phrase
//    starting there, join its tokens with a single space
// 4. drop stopwords (optional)
// 5. lemmatize, verb pass then noun pass (optional)

use crate::lemmatizer::Lemmatizer;
use crate::phrases::Phrase;
use crate::stopwords::StopwordFilter;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// PHRASE TRIE
// ============================================================================

#[derive(Debug, Clone, Default)]
struct TrieNode {
    children: HashMap<String, TrieNode>,
    terminal: bool,
}

/// Token-level trie over the phrase set, for longest-match lookup
#[derive(Debug, Clone, Default)]
pub struct PhraseTrie {
    root: TrieNode,
    phrases: usize,
}

impl PhraseTrie {
    pub fn from_phrases<'a, I>(phrases: I) -> Self
    where
        I: IntoIterator<Item = &'a Phrase>,
    {
        let mut trie = PhraseTrie::default();
        for phrase in phrases {
            trie.insert(phrase.tokens());
        }
        trie
    }

    pub fn insert<S: AsRef<str>>(&mut self, tokens: &[S]) {
        let mut node = &mut self.root;
        for token in tokens {
            node = node.children.entry(token.as_ref().to_string()).or_default();
        }
        if !node.terminal {
            node.terminal = true;
            self.phrases += 1;
        }
    }

    /// End index (exclusive) of the longest phrase starting at `start`
    pub fn longest_match<S: AsRef<str>>(&self, tokens: &[S], start: usize) -> Option<usize> {
        let mut node = &self.root;
        let mut last_match = None;

        for (offset, token) in tokens[start..].iter().enumerate() {
            match node.children.get(token.as_ref()) {
                Some(next) => {
                    node = next;
                    if node.terminal {
                        last_match = Some(start + offset + 1);
                    }
                }
                None => break,
            }
        }

        last_match
    }

    pub fn len(&self) -> usize {
        self.phrases
    }

    pub fn is_empty(&self) -> bool {
        self.phrases == 0
    }
}

// ============================================================================
// TOKENIZATION STEPS
// ============================================================================

fn word_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\w+").expect("word pattern is valid"))
}

/// Upper-cased runs of word characters; everything else is discarded
pub fn base_tokens(text: &str) -> Vec<String> {
    let upper = text.to_uppercase();
    word_regex()
        .find_iter(&upper)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Greedy longest-match merge of phrase runs into compound tokens
///
/// Tokens that already contain a space never start or continue a phrase, so
/// merging an already-merged sequence leaves it unchanged.
pub fn merge_phrases<S: AsRef<str>>(tokens: &[S], trie: &PhraseTrie) -> Vec<String> {
    let mut merged = Vec::with_capacity(tokens.len());
    let mut i = 0;

    while i < tokens.len() {
        match trie.longest_match(tokens, i) {
            Some(end) => {
                let compound: Vec<&str> = tokens[i..end].iter().map(|t| t.as_ref()).collect();
                merged.push(compound.join(" "));
                i = end;
            }
            None => {
                merged.push(tokens[i].as_ref().to_string());
                i += 1;
            }
        }
    }

    merged
}

/// Full tokenization of one text
pub fn tokenize(
    text: &str,
    trie: &PhraseTrie,
    stopwords: Option<&StopwordFilter>,
    lemmatizer: Option<&Lemmatizer>,
) -> Vec<String> {
    let tokens = merge_phrases(&base_tokens(text), trie);
    finish(tokens, stopwords, lemmatizer)
}

/// Re-run merging, stopword removal and lemmatization over existing tokens
pub fn retokenize<S: AsRef<str>>(
    tokens: &[S],
    trie: &PhraseTrie,
    stopwords: Option<&StopwordFilter>,
    lemmatizer: Option<&Lemmatizer>,
) -> Vec<String> {
    finish(merge_phrases(tokens, trie), stopwords, lemmatizer)
}

fn finish(tokens: Vec<String>, stopwords: Option<&StopwordFilter>, lemmatizer: Option<&Lemmatizer>) -> Vec<String> {
    let tokens = tokens
        .into_iter()
        .filter(|token| stopwords.map_or(true, |filter| !filter.is_stopword(token)));

    match lemmatizer {
        Some(lemmatizer) => tokens.map(|token| lemmatizer.lemmatize(&token)).collect(),
        None => tokens.collect(),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn trie(phrases: &[&[&str]]) -> PhraseTrie {
        let mut trie = PhraseTrie::default();
        for &phrase in phrases {
            trie.insert(phrase);
        }
        trie
    }

    #[test]
    fn test_base_tokens() {
        assert_eq!(
            base_tokens("I love my chase-sapphire, it's great! snake_case 42"),
            vec!["I", "LOVE", "MY", "CHASE", "SAPPHIRE", "IT", "S", "GREAT", "SNAKE_CASE", "42"]
        );
        assert!(base_tokens("   ...!!  ").is_empty());
    }

    #[test]
    fn test_longest_match_precedence() {
        let trie = trie(&[&["CHASE", "SAPPHIRE"], &["CHASE", "SAPPHIRE", "RESERVE"]]);
        let tokens = ["CHASE", "SAPPHIRE", "RESERVE", "CARD"];

        assert_eq!(merge_phrases(&tokens, &trie), vec!["CHASE SAPPHIRE RESERVE", "CARD"]);
    }

    #[test]
    fn test_falls_back_to_shorter_match() {
        let trie = trie(&[&["CHASE", "SAPPHIRE"], &["CHASE", "SAPPHIRE", "RESERVE", "CARD"]]);
        let tokens = ["CHASE", "SAPPHIRE", "RESERVE", "FEE"];

        assert_eq!(merge_phrases(&tokens, &trie), vec!["CHASE SAPPHIRE", "RESERVE", "FEE"]);
    }

    #[test]
    fn test_partial_prefix_is_not_merged() {
        let trie = trie(&[&["ANNUAL", "PERCENTAGE", "RATE"]]);
        let tokens = ["ANNUAL", "PERCENTAGE", "FEE"];

        assert_eq!(merge_phrases(&tokens, &trie), vec!["ANNUAL", "PERCENTAGE", "FEE"]);
    }

    #[test]
    fn test_phrase_at_end_of_input() {
        let trie = trie(&[&["ANNUAL", "FEE"]]);
        assert_eq!(merge_phrases(&["NO", "ANNUAL", "FEE"], &trie), vec!["NO", "ANNUAL FEE"]);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let trie = trie(&[&["CHASE", "SAPPHIRE"], &["SAPPHIRE", "RESERVE"], &["ANNUAL", "FEE"]]);
        let once = tokenize("chase sapphire reserve annual fee", &trie, None, None);
        let twice = retokenize(&once, &trie, None, None);

        assert_eq!(once, vec!["CHASE SAPPHIRE", "RESERVE", "ANNUAL FEE"]);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_stopwords_dropped_after_merge() {
        let trie = trie(&[&["BANK", "OF", "AMERICA"]]);
        let stops = StopwordFilter::from_list(&["OF", "MY", "IS"]);

        let tokens = tokenize("My Bank of America card is fine", &trie, Some(&stops), None);
        assert_eq!(tokens, vec!["BANK OF AMERICA", "CARD", "FINE"]);
    }

    #[test]
    fn test_lemmatize_after_stopwords() {
        let trie = PhraseTrie::default();
        let lemmatizer = Lemmatizer::new(["FEE", "CHARGE"]);
        let stops = StopwordFilter::from_list(&["FEES", "CHARGE"]);

        let tokens = tokenize("charged fees", &trie, None, Some(&lemmatizer));
        assert_eq!(tokens, vec!["CHARGE", "FEE"]);

        // filtering sees surface forms: FEES is dropped, CHARGED survives and
        // only then becomes CHARGE
        let tokens = tokenize("charged fees", &trie, Some(&stops), Some(&lemmatizer));
        assert_eq!(tokens, vec!["CHARGE"]);
    }

    #[test]
    fn test_empty_text() {
        let trie = trie(&[&["ANNUAL", "FEE"]]);
        assert!(tokenize("", &trie, None, None).is_empty());
    }

    #[test]
    fn test_trie_counts_unique_phrases() {
        let trie = trie(&[&["A", "B"], &["A", "B"], &["A", "B", "C"]]);
        assert_eq!(trie.len(), 2);
        assert!(trie.longest_match(&["X"], 0).is_none());
    }
}
