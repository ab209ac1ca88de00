//! Deterministic in-process model for tests: rule-based annotation plus vectors
//! hashed from each word's character trigrams. Needs no model download, but only
//! captures spelling overlap, so it never backs a running service.

use crate::nlp::lexical::{annotate, mean_word_vector};
use crate::nlp::{DenseVector, LanguageModel, Token};

pub const HASHED_DIMS: usize = 300;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

#[derive(Debug, Default)]
pub struct HashedModel;

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, &b| {
        (hash ^ u64::from(b)).wrapping_mul(FNV_PRIME)
    })
}

fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Unit-length sum of pseudo-random vectors seeded by the boundary-marked
/// trigrams of `word` and by the whole word.
pub fn trigram_vector(word: &str) -> Vec<f32> {
    let marked: Vec<char> = format!("<{}>", word.to_lowercase()).chars().collect();
    let mut grams: Vec<String> = marked.windows(3).map(|w| w.iter().collect()).collect();
    grams.push(marked.iter().collect());

    let mut acc = vec![0.0_f64; HASHED_DIMS];
    for gram in &grams {
        let mut state = fnv1a(gram.as_bytes());
        for slot in acc.iter_mut() {
            let bits = splitmix64(&mut state) >> 11;
            *slot += (bits as f64 / (1u64 << 53) as f64) * 2.0 - 1.0;
        }
    }

    let norm = acc.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm == 0.0 {
        return vec![0.0; HASHED_DIMS];
    }
    acc.iter().map(|v| (v / norm) as f32).collect()
}

impl LanguageModel for HashedModel {
    fn name(&self) -> &str {
        "hashed-trigram"
    }

    fn dims(&self) -> usize {
        HASHED_DIMS
    }

    fn analyze(&self, text: &str) -> Vec<Token> {
        annotate(text)
    }

    fn vector(&self, text: &str) -> DenseVector {
        mean_word_vector(text, HASHED_DIMS, |w| Some(trigram_vector(w)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigram_vectors_are_deterministic_and_unit_length() {
        let a = trigram_vector("engineer");
        assert_eq!(a, trigram_vector("Engineer"));
        assert_eq!(a.len(), HASHED_DIMS);
        let norm: f64 = a.iter().map(|v| f64::from(*v).powi(2)).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5, "norm was {norm}");
    }

    #[test]
    fn test_shared_trigrams_point_the_same_way() {
        let engineer = DenseVector::new(trigram_vector("engineer"));
        let engineers = DenseVector::new(trigram_vector("engineers"));
        let banana = DenseVector::new(trigram_vector("banana"));
        assert!(engineer.cosine(&engineers).unwrap() > engineer.cosine(&banana).unwrap());
    }
}
