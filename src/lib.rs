//! Streaming manifest parser and segment merger.
//!
//! ```text
//! manifest URL + format ──► HlsParser / DashParser ──► ParsedManifest
//!                                                          │ segments
//!                                                          ▼
//!                          MergedMedia ◄── merge ◄── SegmentDownloader
//! ```
//!
//! A manifest is parsed into an ordered segment list, the segments are
//! fetched sequentially (failures are skipped, never retried) and the
//! payloads are concatenated, in manifest order, into one binary object the
//! caller hands to its save-to-disk surface.
//!
//! All network access goes through an explicit [`HttpClient`]; nothing in
//! this crate touches global state.

pub mod dash;
pub mod download;
pub mod error;
pub mod hls;
pub mod manifest;
pub mod merge;
pub mod util;

pub use dash::DashParser;
pub use download::{SegmentDownloader, StreamDownloader};
pub use error::{TsumugiError, TsumugiResult};
pub use hls::HlsParser;
pub use manifest::{ParsedManifest, Segment, StreamFormat, VariantPlaylist};
pub use merge::{MergedMedia, DEFAULT_MIME_TYPE};
pub use util::http::HttpClient;
pub use util::path::{sanitize_filename, suggested_filename};
