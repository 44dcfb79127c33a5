pub mod classifier;
pub mod extractor;
pub mod fetcher;
