pub mod request_builder;
pub mod token_classifier;
