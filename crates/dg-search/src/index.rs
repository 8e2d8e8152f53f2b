//! Inverted full-text index over search records.
//!
//! Each record is indexed under three fields (title, section breadcrumb and
//! text). A query term matches an indexed term exactly, as a prefix, or
//! within a small edit distance; matches are weighted in that order and
//! scaled by the field boost and term frequency.

use std::collections::{BTreeMap, HashMap};

use dg_graph::DocsGraph;
use serde::{Deserialize, Serialize};

use crate::record::{SearchRecord, build_records};

const EXACT_WEIGHT: f64 = 1.0;
const PREFIX_WEIGHT: f64 = 0.5;
const FUZZY_WEIGHT: f64 = 0.25;

/// How per-term results are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombineWith {
    /// Every query term must match.
    #[default]
    #[serde(rename = "AND")]
    And,
    /// Any query term may match.
    #[serde(rename = "OR")]
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldBoost {
    pub title: f64,
    pub section: f64,
    pub text: f64,
}

impl Default for FieldBoost {
    fn default() -> Self {
        Self {
            title: 4.0,
            section: 2.0,
            text: 1.0,
        }
    }
}

/// Index and query settings, serialized with the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchOptions {
    /// Allowed edit distance as a fraction of the query term length.
    pub fuzzy: f64,
    pub prefix: bool,
    pub combine_with: CombineWith,
    /// Character limit for indexed text.
    pub max_index_text_length: usize,
    pub boost: FieldBoost,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            fuzzy: 0.15,
            prefix: true,
            combine_with: CombineWith::And,
            max_index_text_length: 600,
            boost: FieldBoost::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Title,
    Text,
    Section,
}

/// Occurrences of a term in one field of one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub id: u32,
    pub field: Field,
    pub tf: u32,
}

/// A scored query result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit<'a> {
    #[serde(flatten)]
    pub record: &'a SearchRecord,
    pub score: f64,
}

/// Serializable search index with stored records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchIndex {
    pub options: SearchOptions,
    pub document_count: usize,
    /// Stored fields, sorted by id.
    pub records: Vec<SearchRecord>,
    pub index: BTreeMap<String, Vec<Posting>>,
}

impl SearchIndex {
    /// Index the given records.
    #[must_use]
    pub fn build(records: Vec<SearchRecord>, options: SearchOptions) -> Self {
        let mut index: BTreeMap<String, Vec<Posting>> = BTreeMap::new();

        for record in &records {
            for (field, value) in [
                (Field::Title, &record.title),
                (Field::Text, &record.text),
                (Field::Section, &record.section),
            ] {
                let mut counts: BTreeMap<String, u32> = BTreeMap::new();
                for term in tokenize(value) {
                    *counts.entry(term).or_default() += 1;
                }
                for (term, tf) in counts {
                    index.entry(term).or_default().push(Posting {
                        id: record.id,
                        field,
                        tf,
                    });
                }
            }
        }

        tracing::debug!(
            document_count = records.len(),
            term_count = index.len(),
            "Search index built"
        );

        Self {
            options,
            document_count: records.len(),
            records,
            index,
        }
    }

    /// Build records from a graph and index them.
    #[must_use]
    pub fn from_graph(graph: &DocsGraph, options: SearchOptions) -> Self {
        let records = build_records(graph, options.max_index_text_length);
        Self::build(records, options)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Look up a stored record.
    #[must_use]
    pub fn record(&self, id: u32) -> Option<&SearchRecord> {
        self.records
            .binary_search_by_key(&id, |r| r.id)
            .ok()
            .map(|idx| &self.records[idx])
    }

    /// Run a query with the index options.
    ///
    /// Results are ordered by score, best first, ties by record id.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<SearchHit<'_>> {
        let terms = tokenize(query);
        if terms.is_empty() {
            return Vec::new();
        }

        let mut combined: Option<HashMap<u32, f64>> = None;
        for term in &terms {
            let scores = self.term_scores(term);
            combined = Some(match (combined, self.options.combine_with) {
                (None, _) => scores,
                (Some(mut acc), CombineWith::And) => {
                    acc.retain(|id, _| scores.contains_key(id));
                    for (id, score) in &mut acc {
                        *score += scores[id];
                    }
                    acc
                }
                (Some(mut acc), CombineWith::Or) => {
                    for (id, score) in scores {
                        *acc.entry(id).or_default() += score;
                    }
                    acc
                }
            });
        }

        let mut hits: Vec<SearchHit<'_>> = combined
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(id, score)| self.record(id).map(|record| SearchHit { record, score }))
            .collect();
        hits.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.record.id.cmp(&b.record.id))
        });
        hits
    }

    /// Scores of every record matching one query term.
    fn term_scores(&self, term: &str) -> HashMap<u32, f64> {
        let max_distance = max_edit_distance(term, self.options.fuzzy);
        let mut scores: HashMap<u32, f64> = HashMap::new();

        for (indexed, postings) in &self.index {
            let Some(weight) = self.match_weight(term, indexed, max_distance) else {
                continue;
            };
            for posting in postings {
                let boost = match posting.field {
                    Field::Title => self.options.boost.title,
                    Field::Section => self.options.boost.section,
                    Field::Text => self.options.boost.text,
                };
                *scores.entry(posting.id).or_default() += boost * f64::from(posting.tf) * weight;
            }
        }
        scores
    }

    #[allow(clippy::cast_precision_loss)]
    fn match_weight(&self, term: &str, indexed: &str, max_distance: usize) -> Option<f64> {
        if indexed == term {
            return Some(EXACT_WEIGHT);
        }
        if self.options.prefix && indexed.starts_with(term) {
            return Some(PREFIX_WEIGHT);
        }
        if max_distance == 0 {
            return None;
        }
        let len_diff = indexed.chars().count().abs_diff(term.chars().count());
        if len_diff > max_distance {
            return None;
        }
        let distance = levenshtein(term, indexed);
        (distance <= max_distance).then(|| FUZZY_WEIGHT / (1.0 + distance as f64))
    }
}

/// Lowercased alphanumeric runs.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn max_edit_distance(term: &str, fuzzy: f64) -> usize {
    (term.chars().count() as f64 * fuzzy).round() as usize
}

fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != *cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}
