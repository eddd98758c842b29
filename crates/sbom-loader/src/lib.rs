#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`error`]: Domain error types (`SbomLoaderError`)
//! - [`config`]: Loader configuration (`SbomLoaderConfig`, builder)
//! - [`types`]: Domain types (`SbomFormat`, `ScannedFile`, `ExtractedDocument`, `LoadOutput`, `LoadOutcome`)
//! - [`fs`]: Filesystem abstraction (`FileSystem` trait, `OsFileSystem`, `MemoryFileSystem`)
//! - [`format`]: Content sniffing and decoders (`SbomDecoder` trait, `FormatDetector`)
//! - [`aggregate`]: Deduplication of purls and licenses
//! - [`loader`]: Path resolver (`SbomLoader`)
//! - [`ignore`]: Newline-delimited ignore list loader
//! - [`suppression`]: YAML suppression document loader with expiry
//!
//! # Architecture
//!
//! ```text
//! inputs (file | dir | "-") --> SbomLoader --> bytes --> ScannedFile
//!                                                |
//!                                         FormatDetector
//!                                                |
//!        +-------------------+-------------------+-------------------+
//!        |                   |                   |                   |
//!  CycloneDxXml        CycloneDxJson         SpdxJson            SyftJson
//!        |                   |                   |                   |
//!        +-------------------+---------+---------+-------------------+
//!                                      |
//!                              aggregate (dedup) --> LoadOutput
//!
//! ignore file ------> ignore::load_ignore_list ------------> Vec<String>
//! .snyk ------------> suppression::load_suppression_document --> Vec<String>
//! ```

pub mod aggregate;
pub mod config;
pub mod error;
pub mod format;
pub mod fs;
pub mod ignore;
pub mod loader;
pub mod suppression;
pub mod types;

// --- Public API Re-exports ---

// Loader (path resolver)
pub use loader::{STDIN_MARKER, SbomLoader};

// Configuration
pub use config::{SbomLoaderConfig, SbomLoaderConfigBuilder};

// Error
pub use error::SbomLoaderError;

// Types
pub use types::{
    ExtractedDocument, LoadFailure, LoadOutcome, LoadOutput, SbomFormat, ScannedFile,
};

// Filesystem
pub use fs::{DirEntry, FileSystem, MemoryFileSystem, OsFileSystem};

// Format detection
pub use format::{
    CycloneDxJsonDecoder, CycloneDxXmlDecoder, FormatDetector, SbomDecoder, SpdxJsonDecoder,
    SyftJsonDecoder, classify,
};

// Ignore / suppression
pub use ignore::load_ignore_list;
pub use suppression::{
    IgnoreEntry, SuppressionDocument, load_suppression_document, load_suppression_document_at,
};
