//! `EmbeddingLanguageModel`, the default `LanguageModel`: document vectors from a
//! local fastembed sentence-embedding model, annotations from the lexical rules.

use std::path::Path;

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tracing::{info, warn};

use crate::nlp::lexical::{annotate, has_words};
use crate::nlp::{DenseVector, LanguageModel, ModelError, Token};

pub const DEFAULT_EMBEDDING_MODEL: &str = "all-minilm-l6-v2";

/// Supported models: config name, fastembed model, output dimensions.
const SUPPORTED_MODELS: &[(&str, EmbeddingModel, usize)] = &[
    ("all-minilm-l6-v2", EmbeddingModel::AllMiniLML6V2, 384),
    ("bge-small-en-v1.5", EmbeddingModel::BGESmallENV15, 384),
    ("bge-base-en-v1.5", EmbeddingModel::BGEBaseENV15, 768),
];

fn resolve_model(name: &str) -> Result<(&'static str, EmbeddingModel, usize), ModelError> {
    let wanted = name.trim().to_lowercase();
    SUPPORTED_MODELS
        .iter()
        .find(|(id, _, _)| *id == wanted)
        .cloned()
        .ok_or_else(|| {
            let known: Vec<&str> = SUPPORTED_MODELS.iter().map(|(id, _, _)| *id).collect();
            ModelError::ModelUnavailable(format!(
                "unknown embedding model '{name}' (supported: {})",
                known.join(", ")
            ))
        })
}

pub struct EmbeddingLanguageModel {
    name: &'static str,
    dims: usize,
    embedder: TextEmbedding,
}

impl EmbeddingLanguageModel {
    /// Loads (downloading on first use) the named model into `cache_dir`.
    /// Failure to resolve or initialise it is `ModelUnavailable`.
    pub fn load(model_name: &str, cache_dir: Option<&Path>) -> Result<Self, ModelError> {
        let (name, model, dims) = resolve_model(model_name)?;

        let mut options = InitOptions::new(model).with_show_download_progress(false);
        if let Some(dir) = cache_dir {
            options = options.with_cache_dir(dir.to_path_buf());
        }

        let embedder = TextEmbedding::try_new(options).map_err(|e| {
            ModelError::ModelUnavailable(format!("cannot initialise {name}: {e}"))
        })?;
        info!(model = name, dims, "Loaded embedding model");

        Ok(Self {
            name,
            dims,
            embedder,
        })
    }
}

impl LanguageModel for EmbeddingLanguageModel {
    fn name(&self) -> &str {
        self.name
    }

    fn dims(&self) -> usize {
        self.dims
    }

    fn analyze(&self, text: &str) -> Vec<Token> {
        annotate(text)
    }

    fn vector(&self, text: &str) -> DenseVector {
        if !has_words(text) {
            return DenseVector::zeros(self.dims);
        }
        match self.embedder.embed(vec![text], None) {
            Ok(mut embeddings) => match embeddings.pop() {
                Some(values) if values.len() == self.dims => DenseVector::new(values),
                Some(values) => {
                    warn!(
                        model = self.name,
                        got = values.len(),
                        expected = self.dims,
                        "Embedding has unexpected dimensions"
                    );
                    DenseVector::zeros(self.dims)
                }
                None => DenseVector::zeros(self.dims),
            },
            Err(e) => {
                warn!(model = self.name, error = %e, "Embedding failed, treating text as empty");
                DenseVector::zeros(self.dims)
            }
        }
    }
}
