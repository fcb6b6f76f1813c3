pub mod config;
pub mod error;
pub mod fetcher;
pub mod parser;
pub mod payload;
pub mod url;

pub use config::{FetcherConfig, FetcherConfigBuilder};
pub use error::FetcherError;
pub use fetcher::{Fetcher, classify};
pub use parser::{NOT_AVAILABLE, ResponseParser};
pub use payload::OmdbPayload;
pub use url::RequestBuilder;
