//! Rule-based token annotation, and `LexicalModel`: annotation plus averaged
//! vectors from a word-vector file.

use std::path::Path;

use crate::nlp::lemmatizer::{noun_lemma, verb_lemma};
use crate::nlp::stop_words::is_stop_word;
use crate::nlp::tagger::{is_verb_base, tag};
use crate::nlp::tokenizer::tokenize;
use crate::nlp::vectors::WordVectors;
use crate::nlp::{DenseVector, LanguageModel, ModelError, Pos, Token};

pub struct LexicalModel {
    vectors: WordVectors,
}

impl LexicalModel {
    /// Builds the model once for the whole process. Any problem with the vector
    /// file is `ModelUnavailable`.
    pub fn load(vectors_path: &Path) -> Result<Self, ModelError> {
        Ok(Self::with_vectors(WordVectors::from_path(vectors_path)?))
    }

    pub fn with_vectors(vectors: WordVectors) -> Self {
        Self { vectors }
    }
}

fn lemma_for(text: &str, pos: Pos) -> String {
    let lower = text.to_lowercase();
    match pos {
        Pos::Propn => text.to_string(),
        Pos::Noun => noun_lemma(&lower),
        Pos::Verb | Pos::Aux => verb_lemma(&lower, is_verb_base),
        _ => lower,
    }
}

/// Tokenizes `text` and tags, lemmatizes and flags every token.
pub fn annotate(text: &str) -> Vec<Token> {
    let raw = tokenize(text);
    let tags = tag(&raw);

    raw.iter()
        .zip(tags)
        .map(|(t, pos)| Token {
            text: t.text.to_string(),
            lemma: lemma_for(t.text, pos),
            pos,
            is_alpha: t.text.chars().all(char::is_alphabetic),
            is_stop: is_stop_word(&t.text.to_lowercase()),
        })
        .collect()
}

/// True when `text` has at least one word token.
pub fn has_words(text: &str) -> bool {
    tokenize(text).iter().any(|t| t.is_word())
}

/// Mean of the vectors `lookup` yields for the word tokens of `text`.
/// Zero vector when no word has one.
pub fn mean_word_vector<F, V>(text: &str, dims: usize, lookup: F) -> DenseVector
where
    F: Fn(&str) -> Option<V>,
    V: AsRef<[f32]>,
{
    let mut acc = vec![0.0_f64; dims];
    let mut count = 0usize;

    for token in tokenize(text).iter().filter(|t| t.is_word()) {
        if let Some(v) = lookup(token.text) {
            for (slot, x) in acc.iter_mut().zip(v.as_ref()) {
                *slot += f64::from(*x);
            }
            count += 1;
        }
    }

    if count == 0 {
        return DenseVector::zeros(dims);
    }
    DenseVector::new(acc.into_iter().map(|v| (v / count as f64) as f32).collect())
}

impl LanguageModel for LexicalModel {
    fn name(&self) -> &str {
        "lexical+table"
    }

    fn dims(&self) -> usize {
        self.vectors.dims()
    }

    fn analyze(&self, text: &str) -> Vec<Token> {
        annotate(text)
    }

    fn vector(&self, text: &str) -> DenseVector {
        mean_word_vector(text, self.vectors.dims(), |w| self.vectors.lookup(w))
    }
}
