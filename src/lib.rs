pub mod config;
pub mod coordinator;
pub mod db;
pub mod error;
pub mod notify;
pub mod scrape;
pub mod server;

pub use error::PatchwatchError;
pub use scrape::Candidate;
