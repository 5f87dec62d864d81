//! Error surface for the I/O boundary. The algorithmic core
//! (`geometry`/`beachline`/`events`/`builder`/`cells`/`offset`) stays
//! infallible, per spec.md §7 — sites are assumed well-formed finite
//! points, and malformed input is only possible when it's read from disk.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoronoiError {
    #[error("malformed site line {line}: {text:?}")]
    InvalidSiteLine { line: usize, text: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
