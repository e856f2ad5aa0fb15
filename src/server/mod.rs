pub mod router;
pub mod routes;
pub mod rss;
