//! Dictionary-constrained lemmatizer
//!
//! Two passes per token, verb rules first, then noun rules. A suffix rule only
//! fires when its result is a known word (a dictionary keyword token or an
//! irregular base form), so unknown words pass through untouched. Compound
//! tokens (merged phrases) are never altered.

use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pos {
    Verb,
    Noun,
}

const VERB_RULES: &[(&str, &str)] = &[
    ("IES", "Y"),
    ("ES", "E"),
    ("ES", ""),
    ("ED", "E"),
    ("ED", ""),
    ("ING", "E"),
    ("ING", ""),
    ("S", ""),
];

const NOUN_RULES: &[(&str, &str)] = &[
    ("SSES", "SS"),
    ("SES", "S"),
    ("XES", "X"),
    ("ZES", "Z"),
    ("CHES", "CH"),
    ("SHES", "SH"),
    ("MEN", "MAN"),
    ("IES", "Y"),
    ("S", ""),
];

const VERB_IRREGULAR: &[(&str, &str)] = &[
    ("PAID", "PAY"),
    ("SPENT", "SPEND"),
    ("BOUGHT", "BUY"),
    ("GOT", "GET"),
    ("GOTTEN", "GET"),
    ("MADE", "MAKE"),
    ("KEPT", "KEEP"),
    ("LENT", "LEND"),
    ("WENT", "GO"),
    ("GAVE", "GIVE"),
    ("GIVEN", "GIVE"),
    ("TOOK", "TAKE"),
    ("TAKEN", "TAKE"),
    ("SAID", "SAY"),
    ("HAD", "HAVE"),
    ("HAS", "HAVE"),
    ("WAS", "BE"),
    ("WERE", "BE"),
    ("IS", "BE"),
    ("ARE", "BE"),
];

const NOUN_IRREGULAR: &[(&str, &str)] = &[
    ("CHILDREN", "CHILD"),
    ("FEET", "FOOT"),
    ("TEETH", "TOOTH"),
    ("MICE", "MOUSE"),
    ("CRITERIA", "CRITERION"),
];

#[derive(Debug, Clone)]
pub struct Lemmatizer {
    lexicon: HashSet<String>,
    verb_exceptions: HashMap<&'static str, &'static str>,
    noun_exceptions: HashMap<&'static str, &'static str>,
}

impl Lemmatizer {
    /// `vocabulary` is the set of words a suffix rule may produce
    pub fn new<I, S>(vocabulary: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut lexicon: HashSet<String> = vocabulary.into_iter().map(Into::into).collect();
        lexicon.extend(VERB_IRREGULAR.iter().map(|(_, base)| base.to_string()));
        lexicon.extend(NOUN_IRREGULAR.iter().map(|(_, base)| base.to_string()));

        Lemmatizer {
            lexicon,
            verb_exceptions: VERB_IRREGULAR.iter().copied().collect(),
            noun_exceptions: NOUN_IRREGULAR.iter().copied().collect(),
        }
    }

    /// Verb pass, then noun pass
    pub fn lemmatize(&self, token: &str) -> String {
        let verb = self.lemma(token, Pos::Verb);
        self.lemma(&verb, Pos::Noun)
    }

    /// Base form of `token` for one part of speech, or the token unchanged
    pub fn lemma(&self, token: &str, pos: Pos) -> String {
        if token.contains(' ') || self.lexicon.contains(token) {
            return token.to_string();
        }

        let (exceptions, rules) = match pos {
            Pos::Verb => (&self.verb_exceptions, VERB_RULES),
            Pos::Noun => (&self.noun_exceptions, NOUN_RULES),
        };

        if let Some(base) = exceptions.get(token) {
            return base.to_string();
        }

        rules
            .iter()
            .filter_map(|(suffix, replacement)| {
                token
                    .strip_suffix(suffix)
                    .filter(|stem| !stem.is_empty())
                    .map(|stem| format!("{}{}", stem, replacement))
            })
            .find(|candidate| self.lexicon.contains(candidate))
            .unwrap_or_else(|| token.to_string())
    }
}
