//! Fit classifier: dataset preparation, training, persistence and evaluation

pub mod dataset;
pub mod logistic;
pub mod metrics;
pub mod model;
pub mod training;
