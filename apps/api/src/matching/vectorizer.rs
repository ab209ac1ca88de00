//! Text vectorizer: the two views of the language model the ranking engine uses:
//! a dense vector for similarity and a lemma set for keyword overlap.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;

use crate::nlp::{DenseVector, LanguageModel};

/// Normalized, lowercase lemmas of the content-bearing words of a text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeywordSet(BTreeSet<String>);

impl KeywordSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.0.contains(keyword)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().map(String::as_str)
    }

    pub fn intersection_len(&self, other: &KeywordSet) -> usize {
        self.0.intersection(&other.0).count()
    }

    pub fn union_len(&self, other: &KeywordSet) -> usize {
        self.0.union(&other.0).count()
    }
}

impl<S: Into<String>> FromIterator<S> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Cheap to clone; every clone shares the one process-wide model.
#[derive(Clone)]
pub struct TextVectorizer {
    model: Arc<dyn LanguageModel>,
}

impl TextVectorizer {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub fn vectorize(&self, text: &str) -> DenseVector {
        self.model.vector(text)
    }

    /// Lowercased lemmas of nouns, proper nouns and adjectives, skipping stop
    /// words and tokens that are not purely alphabetic.
    pub fn keywords(&self, text: &str) -> KeywordSet {
        self.model
            .analyze(text)
            .into_iter()
            .filter(|t| t.pos.is_content() && !t.is_stop && t.is_alpha)
            .map(|t| t.lemma.to_lowercase())
            .collect()
    }
}
