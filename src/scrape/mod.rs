//! Scraping pipeline pieces: the remote fetch boundary and the pure record
//! extractor. Neither holds shared mutable state.

pub mod extract;
pub mod fetch;

pub use extract::{Candidate, extract};
pub use fetch::{HttpFetcher, SourceFetcher};
