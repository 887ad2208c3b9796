//! Data models for image flashcards.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A problem image and its matching solution image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    /// Numeric id shared by both file names.
    pub id: u64,
    /// Problem (front) image.
    pub problem: PathBuf,
    /// Solution (back) image.
    pub solution: PathBuf,
}

impl Pair {
    /// Create a new pair.
    pub fn new(id: u64, problem: impl Into<PathBuf>, solution: impl Into<PathBuf>) -> Self {
        Self {
            id,
            problem: problem.into(),
            solution: solution.into(),
        }
    }

    /// Image for the given side.
    pub fn path(&self, side: Side) -> &Path {
        match side {
            Side::Problem => &self.problem,
            Side::Solution => &self.solution,
        }
    }
}

/// Mastery tag recorded per card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Not yet marked.
    #[default]
    Unseen,
    /// Understood; skipped by review filtering.
    Mastered,
    /// Marked for another pass.
    NeedsReview,
}

impl Status {
    /// Get display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unseen => "Unseen",
            Self::Mastered => "Mastered",
            Self::NeedsReview => "Needs review",
        }
    }
}

/// Which image of a pair is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Problem,
    Solution,
}

impl Side {
    pub fn from_flipped(flipped: bool) -> Self {
        if flipped {
            Self::Solution
        } else {
            Self::Problem
        }
    }

    /// Get display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Problem => "Problem",
            Self::Solution => "Solution",
        }
    }
}

/// Snapshot of the card under the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentCard<'a> {
    /// Index into the source sequence.
    pub source_index: usize,
    pub pair: &'a Pair,
    pub status: Status,
    /// Whether the cursor is on the final card of the active sequence.
    pub is_last: bool,
    /// Zero-based cursor position.
    pub position: usize,
    /// Length of the active sequence.
    pub total: usize,
    pub side: Side,
}

impl CurrentCard<'_> {
    /// Image currently shown.
    pub fn visible_path(&self) -> &Path {
        self.pair.path(self.side)
    }
}

/// Mastery counts over the chosen range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RangeProgress {
    pub mastered: usize,
    pub needs_review: usize,
    /// Cards in the chosen range.
    pub total: usize,
}

impl RangeProgress {
    /// Cards in the range still unmarked.
    pub fn unseen(&self) -> usize {
        self.total - self.mastered - self.needs_review
    }

    /// Fraction of the range marked mastered.
    pub fn mastered_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.mastered as f64 / self.total as f64
        }
    }
}
