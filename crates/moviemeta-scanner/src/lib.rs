pub mod adapter;
pub mod config;
pub mod fs_scanner;
pub mod guesser;

pub use adapter::FsScanner;
pub use config::ScannerConfig;
pub use fs_scanner::{ScannerError, scan_tree};
pub use guesser::FilenameGuesser;
