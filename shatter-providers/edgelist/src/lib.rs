//! Edge-list provider loading crawled peer graphs from CSV.

mod errors;
mod provider;

pub use errors::EdgeListProviderError;
pub use provider::{EdgeListProvider, crawl_id};
