//! # flashcard-deck
//!
//! Review state for problem/solution image flashcards.
//!
//! ## Features
//!
//! - Pairs `front`/`back` image files by the numeric id in their names
//! - A [`DeckSession`] that tracks the chosen range, the filtered review
//!   sequence, per-card mastery and the cursor/flip position
//! - Range shuffling with a caller-supplied or thread-local RNG
//!
//! The crate never renders anything. Callers read [`DeckSession::current_pair`]
//! and invoke the session operations in response to user input.

mod error;
mod loader;
mod models;
mod session;

pub use error::{DeckError, DeckResult, LoaderError, LoaderResult};
pub use loader::{extract_id, load_pairs, LoaderOptions, DEFAULT_EXTENSIONS};
pub use models::{CurrentCard, Pair, RangeProgress, Side, Status};
pub use session::{DeckSession, FilterOutcome};
