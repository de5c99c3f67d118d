use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::{resolve_domain, JobRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    TitleAsc,
    TitleDesc,
    AgencyAsc,
    AgencyDesc,
}

impl SortOrder {
    fn is_descending(self) -> bool {
        matches!(self, SortOrder::TitleDesc | SortOrder::AgencyDesc)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub search_query: String,
    /// `exclude` stores words trimmed and lowercased; `matches` folds them
    /// again for sets built by hand.
    pub excluded_words: BTreeSet<String>,
    pub sort_order: Option<SortOrder>,
}

impl FilterState {
    /// Returns false for blank words and words already present.
    pub fn exclude(&mut self, word: &str) -> bool {
        let word = word.trim().to_lowercase();
        if word.is_empty() {
            return false;
        }
        self.excluded_words.insert(word)
    }

    pub fn include(&mut self, word: &str) -> bool {
        self.excluded_words.remove(&word.trim().to_lowercase())
    }

    pub fn excluded_list(&self) -> Vec<String> {
        self.excluded_words.iter().cloned().collect()
    }

    pub fn matches(&self, record: &JobRecord) -> bool {
        let title = record.title.to_lowercase();
        let location = record.location_or_empty().to_lowercase();

        let query = self.search_query.trim().to_lowercase();
        let matches_query = title.contains(&query) || location.contains(&query);
        if !matches_query {
            return false;
        }

        !self.excluded_words.iter().any(|word| {
            let word = word.trim().to_lowercase();
            !word.is_empty() && (title.contains(&word) || location.contains(&word))
        })
    }
}

/// Filters then sorts `records`; fetch order is kept when no sort is chosen and
/// for ties.
pub fn apply(records: &[JobRecord], state: &FilterState) -> Vec<JobRecord> {
    let filtered = records.iter().filter(|record| state.matches(record));

    let Some(order) = state.sort_order else {
        return filtered.cloned().collect();
    };

    let mut keyed: Vec<(String, &JobRecord)> = filtered
        .map(|record| (sort_key(record, order), record))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| {
        let ord = collation_cmp(a, b);
        if order.is_descending() {
            ord.reverse()
        } else {
            ord
        }
    });
    keyed.into_iter().map(|(_, record)| record.clone()).collect()
}

fn sort_key(record: &JobRecord, order: SortOrder) -> String {
    match order {
        SortOrder::TitleAsc | SortOrder::TitleDesc => record.title.clone(),
        SortOrder::AgencyAsc | SortOrder::AgencyDesc => {
            resolve_domain(&record.link).unwrap_or_default()
        }
    }
}

/// Locale-aware string comparison: case and Latin diacritics are ignored
/// first, the raw strings only break remaining ties.
pub fn collation_cmp(a: &str, b: &str) -> Ordering {
    fold(a).cmp(&fold(b)).then_with(|| a.cmp(b))
}

fn fold(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars().flat_map(char::to_lowercase) {
        match ch {
            'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => out.push('a'),
            'ç' => out.push('c'),
            'è' | 'é' | 'ê' | 'ë' => out.push('e'),
            'ì' | 'í' | 'î' | 'ï' => out.push('i'),
            'ñ' => out.push('n'),
            'ò' | 'ó' | 'ô' | 'õ' | 'ö' => out.push('o'),
            'ù' | 'ú' | 'û' | 'ü' => out.push('u'),
            'ý' | 'ÿ' => out.push('y'),
            'æ' => out.push_str("ae"),
            'œ' => out.push_str("oe"),
            other => out.push(other),
        }
    }
    out
}
