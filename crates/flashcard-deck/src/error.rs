//! Deck and loader error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by [`DeckSession`](crate::DeckSession) operations.
///
/// A failing operation never leaves the session partially updated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    /// The requested 1-based range does not fit `1..=len` or is inverted.
    #[error("invalid range {start}..={end} for {len} cards")]
    Range { start: usize, end: usize, len: usize },

    /// The active deck has no cards.
    #[error("no cards to show")]
    EmptyDeck,
}

/// Result type for deck operations.
pub type DeckResult<T> = Result<T, DeckError>;

/// Errors raised while scanning the data folder.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// `front` or `back` is missing or not a directory.
    #[error("directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),

    /// Both directories exist but no id appears in both.
    #[error("no problem/solution pairs found under {}", .0.display())]
    NoPairs(PathBuf),

    /// Reading a directory failed.
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for loader operations.
pub type LoaderResult<T> = Result<T, LoaderError>;
