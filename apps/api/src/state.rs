use std::sync::Arc;

use crate::config::Config;
use crate::matching::resume::ResumeMatcher;
use crate::matching::similarity::SimilarityEngine;
use crate::matching::vectorizer::TextVectorizer;
use crate::nlp::LanguageModel;
use crate::pipeline::Aggregator;
use crate::sources::{PageScraper, SearchProvider};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub aggregator: Arc<Aggregator>,
    pub similarity: SimilarityEngine,
    pub matcher: ResumeMatcher,
}

impl AppState {
    /// Wires the engine around one shared model instance.
    pub fn new(
        config: Config,
        model: Arc<dyn LanguageModel>,
        search: Arc<dyn SearchProvider>,
        scraper: Arc<dyn PageScraper>,
    ) -> Self {
        let vectorizer = TextVectorizer::new(model);
        AppState {
            config,
            aggregator: Arc::new(Aggregator::new(search, scraper)),
            similarity: SimilarityEngine::new(vectorizer.clone()),
            matcher: ResumeMatcher::new(vectorizer),
        }
    }
}
