// 🚀 Tagging Pipeline - tokenize → scan → resolve, per text unit
//
// Each unit is independent: no shared mutable state, no ordering between
// units. `tag_batch` fans units out over rayon when the feature is on and
// keeps input order in the output either way.

use crate::dictionary::Dictionary;
use crate::resolver::TaggedText;
use crate::texts::TextUnit;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Matched surface tokens for one unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordHits {
    pub id: String,
    pub tokens: Vec<String>,
}

/// Tokenize and scan one unit; `None` means no configured vocabulary occurs
pub fn find_keywords(dictionary: &Dictionary, unit: &TextUnit) -> Option<KeywordHits> {
    let tokens = dictionary.tokenize(&unit.body);
    dictionary.scan(&tokens).map(|tokens| KeywordHits {
        id: unit.id.clone(),
        tokens,
    })
}

/// Full pipeline for one unit; `None` when nothing matched or nothing resolved
pub fn tag_text(dictionary: &Dictionary, unit: &TextUnit) -> Option<TaggedText> {
    let hits = find_keywords(dictionary, unit)?;
    let tagged = dictionary.resolve(&hits.id, &hits.tokens);
    if tagged.is_empty() {
        debug!(id = %hits.id, tokens = ?hits.tokens, "keyword hits without resolved tags");
        None
    } else {
        Some(tagged)
    }
}

// ============================================================================
// BATCH
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub dictionary_fingerprint: String,
    pub units: usize,
    pub with_keywords: usize,
    pub with_entities: usize,
    pub with_categories: usize,
}

#[derive(Debug, Clone)]
pub struct BatchReport {
    pub summary: BatchSummary,
    /// Units with at least one resolved tag, in input order
    pub tagged: Vec<TaggedText>,
}

enum UnitOutcome {
    NoMatch,
    Unresolved,
    Tagged(TaggedText),
}

fn process(dictionary: &Dictionary, unit: &TextUnit) -> UnitOutcome {
    match find_keywords(dictionary, unit) {
        None => UnitOutcome::NoMatch,
        Some(hits) => {
            let tagged = dictionary.resolve(&hits.id, &hits.tokens);
            if tagged.is_empty() {
                UnitOutcome::Unresolved
            } else {
                UnitOutcome::Tagged(tagged)
            }
        }
    }
}

#[cfg(feature = "rayon")]
fn process_all(dictionary: &Dictionary, units: &[TextUnit]) -> Vec<UnitOutcome> {
    units.par_iter().map(|unit| process(dictionary, unit)).collect()
}

#[cfg(not(feature = "rayon"))]
fn process_all(dictionary: &Dictionary, units: &[TextUnit]) -> Vec<UnitOutcome> {
    units.iter().map(|unit| process(dictionary, unit)).collect()
}

/// Tag every unit against one frozen dictionary
pub fn tag_batch(dictionary: &Dictionary, units: &[TextUnit]) -> BatchReport {
    let started_at = Utc::now();
    let outcomes = process_all(dictionary, units);

    let mut with_keywords = 0;
    let mut tagged = Vec::new();
    for outcome in outcomes {
        match outcome {
            UnitOutcome::NoMatch => {}
            UnitOutcome::Unresolved => with_keywords += 1,
            UnitOutcome::Tagged(item) => {
                with_keywords += 1;
                tagged.push(item);
            }
        }
    }

    let summary = BatchSummary {
        run_id: uuid::Uuid::new_v4().to_string(),
        started_at,
        dictionary_fingerprint: dictionary.fingerprint(),
        units: units.len(),
        with_keywords,
        with_entities: tagged.iter().filter(|t| t.has_entities()).count(),
        with_categories: tagged.iter().filter(|t| t.has_categories()).count(),
    };

    BatchReport { summary, tagged }
}

// ============================================================================
// TESTS
// ============================================================================
