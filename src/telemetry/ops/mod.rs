pub mod crawl;
pub mod aggregate;
pub mod export;
pub mod upload;
pub mod stats;
