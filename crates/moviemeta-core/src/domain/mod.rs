pub mod candidate;
pub mod record;
pub mod request;

pub use candidate::MediaCandidate;
pub use record::{FetchErrorKind, FetchFailure, MetadataRecord, MovieMetadata, Rating};
pub use request::FetchRequest;
