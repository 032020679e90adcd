pub mod newsapi;

pub use newsapi::{build_query, NewsApiClient};
