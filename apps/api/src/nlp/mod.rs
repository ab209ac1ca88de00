//! Language model: tokens, part-of-speech tags, lemmas and word vectors.
//!
//! Everything that needs linguistic annotations goes through the `LanguageModel`
//! trait. The model is built once at startup and shared as `Arc<dyn LanguageModel>`;
//! nothing on a request path ever loads or reloads it.
//!
//! Default: `EmbeddingLanguageModel` (fastembed sentence embeddings). With a
//! word-vector file configured, `LexicalModel` averages GloVe vectors instead.
//! Both annotate tokens with the rules in `tokenizer`, `tagger` and `lemmatizer`.

pub mod embedding;
#[cfg(test)]
pub mod hashed;
pub mod lemmatizer;
pub mod lexical;
pub mod stop_words;
pub mod tagger;
pub mod tokenizer;
pub mod vectors;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use embedding::EmbeddingLanguageModel;
pub use lexical::LexicalModel;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Language model unavailable: {0}")]
    ModelUnavailable(String),
}

/// Universal part-of-speech tags assigned by the tagger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Pos {
    Noun,
    Propn,
    Adj,
    Verb,
    Adv,
    Aux,
    Det,
    Pron,
    Adp,
    Cconj,
    Sconj,
    Part,
    Num,
    Punct,
    Sym,
    Other,
}

impl Pos {
    /// Content-bearing tags: the only ones that contribute keywords.
    pub fn is_content(self) -> bool {
        matches!(self, Pos::Noun | Pos::Propn | Pos::Adj)
    }
}

/// A single annotated token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub lemma: String,
    pub pos: Pos,
    pub is_alpha: bool,
    pub is_stop: bool,
}

/// Dense document representation. Compared by cosine similarity.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DenseVector(Vec<f32>);

impl DenseVector {
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    pub fn zeros(dims: usize) -> Self {
        Self(vec![0.0; dims])
    }

    pub fn values(&self) -> &[f32] {
        &self.0
    }

    pub fn dims(&self) -> usize {
        self.0.len()
    }

    pub fn norm(&self) -> f64 {
        self.0
            .iter()
            .map(|&v| f64::from(v) * f64::from(v))
            .sum::<f64>()
            .sqrt()
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&v| v == 0.0)
    }

    /// Cosine similarity in f64. Returns `None` when either side has no magnitude
    /// or the dimensions disagree.
    pub fn cosine(&self, other: &DenseVector) -> Option<f64> {
        if self.dims() != other.dims() {
            return None;
        }
        let (na, nb) = (self.norm(), other.norm());
        if na == 0.0 || nb == 0.0 {
            return None;
        }
        let dot: f64 = self
            .0
            .iter()
            .zip(&other.0)
            .map(|(&a, &b)| f64::from(a) * f64::from(b))
            .sum();
        Some(dot / (na * nb))
    }
}

/// The process-wide NLP model contract.
///
/// Implementations must be read-only after construction so a single instance can
/// be shared across handlers without locking.
pub trait LanguageModel: Send + Sync {
    /// Short identifier for logs.
    fn name(&self) -> &str;

    /// Vector dimensionality.
    fn dims(&self) -> usize;

    /// Tokenizes and annotates `text`.
    fn analyze(&self, text: &str) -> Vec<Token>;

    /// Document vector of `text`. Zero vector when the text has no words the
    /// model can represent.
    fn vector(&self, text: &str) -> DenseVector;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_of_parallel_vectors_is_one() {
        let a = DenseVector::new(vec![1.0, 2.0, 3.0]);
        let b = DenseVector::new(vec![2.0, 4.0, 6.0]);
        let cos = a.cosine(&b).unwrap();
        assert!((cos - 1.0).abs() < 1e-12, "cos was {cos}");
    }

    #[test]
    fn test_cosine_of_orthogonal_vectors_is_zero() {
        let a = DenseVector::new(vec![1.0, 0.0]);
        let b = DenseVector::new(vec![0.0, 1.0]);
        assert_eq!(a.cosine(&b), Some(0.0));
    }

    #[test]
    fn test_cosine_with_zero_vector_is_none() {
        let a = DenseVector::zeros(3);
        let b = DenseVector::new(vec![1.0, 1.0, 1.0]);
        assert!(a.cosine(&b).is_none());
        assert!(a.is_zero());
    }

    #[test]
    fn test_cosine_dimension_mismatch_is_none() {
        let a = DenseVector::new(vec![1.0]);
        let b = DenseVector::new(vec![1.0, 1.0]);
        assert!(a.cosine(&b).is_none());
    }

    #[test]
    fn test_content_tags() {
        assert!(Pos::Noun.is_content());
        assert!(Pos::Propn.is_content());
        assert!(Pos::Adj.is_content());
        assert!(!Pos::Verb.is_content());
        assert!(!Pos::Adv.is_content());
    }
}
