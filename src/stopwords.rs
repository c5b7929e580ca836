//! Stopword filtering
//!
//! English stopwords from the `stop-words` crate plus configured extras,
//! stored upper-case to match tokenizer output.

use std::collections::HashSet;
use stop_words::{get, LANGUAGE};

#[derive(Debug, Clone, Default)]
pub struct StopwordFilter {
    stopwords: HashSet<String>,
}

impl StopwordFilter {
    /// English stopwords plus `extra`
    pub fn english<S: AsRef<str>>(extra: &[S]) -> Self {
        let mut filter = Self {
            stopwords: get(LANGUAGE::English).iter().map(|s| s.to_uppercase()).collect(),
        };
        filter.add_stopwords(extra);
        filter
    }

    /// Create a stopword filter from a custom list
    pub fn from_list<S: AsRef<str>>(words: &[S]) -> Self {
        let mut filter = Self::default();
        filter.add_stopwords(words);
        filter
    }

    /// Add additional stopwords to the filter
    pub fn add_stopwords<S: AsRef<str>>(&mut self, words: &[S]) {
        for word in words {
            self.stopwords.insert(word.as_ref().to_uppercase());
        }
    }

    /// Remove stopwords from the filter
    pub fn remove_stopwords<'a, I>(&mut self, words: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for word in words {
            self.stopwords.remove(word);
        }
    }

    /// Check if a token is a stopword (tokens are already upper-case)
    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    pub fn len(&self) -> usize {
        self.stopwords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stopwords.is_empty()
    }
}
