// src/domain/pastry/similarity.rs
use crate::domain::pastry::{
    entity::Pastry,
    query::{PastryCondition, PastryQuery, PastrySearch, SearchFilters},
};

/// Lower-cased, whitespace-split words of a name, first occurrence kept.
pub fn name_tokens(name: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for word in name.split_whitespace() {
        let word = word.to_lowercase();
        if !tokens.contains(&word) {
            tokens.push(word);
        }
    }
    tokens
}

impl PastryCondition {
    /// Exclude the reference itself, require a shared category or a shared
    /// name token, then narrow with the regular filters.
    pub fn similar_to(reference: &Pastry, filters: &SearchFilters) -> Self {
        let mut bias = Vec::new();
        if !reference.categories.is_empty() {
            bias.push(PastryCondition::CategoryIn(reference.categories.clone()));
        }
        bias.extend(
            name_tokens(reference.name.as_str())
                .into_iter()
                .map(PastryCondition::NameContains),
        );

        let mut terms = vec![
            PastryCondition::NotId(reference.id),
            PastryCondition::Any(bias),
        ];
        terms.extend(PastryCondition::filter_terms(filters));
        PastryCondition::All(terms)
    }
}

impl PastryQuery {
    pub fn similar_to(reference: &Pastry, search: &PastrySearch) -> Self {
        Self {
            condition: PastryCondition::similar_to(reference, &search.filters),
            order: search.order,
            slice: search.pagination.slice(),
        }
    }
}

/// Groups in ranking order; derives `Ord` from declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Relevance {
    CategoryAndName,
    CategoryOnly,
    NameOnly,
    Unrelated,
}

pub struct RelevanceScorer {
    reference: Pastry,
    tokens: Vec<String>,
}

impl RelevanceScorer {
    pub fn new(reference: &Pastry) -> Self {
        Self {
            tokens: name_tokens(reference.name.as_str()),
            reference: reference.clone(),
        }
    }

    pub fn score(&self, candidate: &Pastry) -> Relevance {
        let shares_category = !candidate.categories.is_disjoint(&self.reference.categories);
        let name = candidate.name.as_str().to_lowercase();
        let shares_token = self.tokens.iter().any(|token| name.contains(token.as_str()));

        match (shares_category, shares_token) {
            (true, true) => Relevance::CategoryAndName,
            (true, false) => Relevance::CategoryOnly,
            (false, true) => Relevance::NameOnly,
            (false, false) => Relevance::Unrelated,
        }
    }
}

/// Stable re-sort of one fetched page by [`Relevance`]. Rows on other pages
/// are not considered, so ranking is page-local.
pub fn rank_by_relevance(reference: &Pastry, page: &mut [Pastry]) {
    let scorer = RelevanceScorer::new(reference);
    page.sort_by_cached_key(|candidate| scorer.score(candidate));
}
