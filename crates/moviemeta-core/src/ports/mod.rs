pub mod fetch;
pub mod guesser;
pub mod runner;
pub mod scanner;

pub use fetch::{QueryBuilder, RequestProcessor};
pub use guesser::{GuessedName, NameGuesser};
pub use runner::{BatchOutcome, BatchRunner};
pub use scanner::{CandidateScanner, ScanError, ScanIssue, ScanOutcome};
