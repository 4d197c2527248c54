//! Text processing, skill matching and fit prediction

pub mod text_processor;
pub mod skills;
pub mod explanation;
pub mod reconciler;
pub mod tfidf;
pub mod embeddings;
pub mod embedding_manager;
pub mod predictor;
pub mod analyzer;
