//! Deck session: range selection, review filtering, cursor and flip state.

use crate::error::{DeckError, DeckResult};
use crate::models::{CurrentCard, Pair, RangeProgress, Side, Status};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, warn};

/// Result of [`DeckSession::filter_for_review`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOutcome {
    /// The active sequence now holds this many unmastered cards.
    Filtered(usize),
    /// Every card in the range is mastered; nothing changed.
    NothingToReview,
}

/// Review state for one user over a fixed source sequence of pairs.
///
/// `master` is the chosen range (possibly shuffled) and `active` is the
/// sequence being paged through, always a subset of `master` in the same
/// relative order. Every operation that replaces `active` resets the
/// position to the first card, problem side up.
#[derive(Debug, Clone)]
pub struct DeckSession {
    pairs: Vec<Pair>,
    statuses: Vec<Status>,
    master: Vec<usize>,
    active: Vec<usize>,
    cursor: usize,
    flipped: bool,
}

impl DeckSession {
    /// Create a session over all pairs in source order.
    pub fn new(pairs: Vec<Pair>) -> Self {
        let all: Vec<usize> = (0..pairs.len()).collect();
        Self {
            statuses: vec![Status::Unseen; pairs.len()],
            pairs,
            master: all.clone(),
            active: all,
            cursor: 0,
            flipped: false,
        }
    }

    // Reconfiguration

    /// Select cards `start..=end` (1-based), optionally shuffled.
    pub fn apply_range(&mut self, start: usize, end: usize, shuffle: bool) -> DeckResult<()> {
        self.apply_range_with_rng(start, end, shuffle, &mut rand::rng())
    }

    /// Same as [`apply_range`](Self::apply_range) with an explicit RNG.
    pub fn apply_range_with_rng<R: Rng + ?Sized>(
        &mut self,
        start: usize,
        end: usize,
        shuffle: bool,
        rng: &mut R,
    ) -> DeckResult<()> {
        let len = self.pairs.len();
        if start == 0 || start - 1 >= end || end > len {
            warn!(start, end, len, "rejected range");
            return Err(DeckError::Range { start, end, len });
        }

        let mut selection: Vec<usize> = (start - 1..end).collect();
        if shuffle {
            selection.shuffle(rng);
        }

        self.master = selection.clone();
        self.active = selection;
        self.reset_position();
        info!(start, end, shuffle, cards = self.active.len(), "applied range");
        Ok(())
    }

    /// Restrict the active sequence to range cards not yet mastered.
    pub fn filter_for_review(&mut self) -> FilterOutcome {
        let review: Vec<usize> = self
            .master
            .iter()
            .copied()
            .filter(|&idx| self.statuses[idx] != Status::Mastered)
            .collect();

        if review.is_empty() {
            info!("nothing to review in range");
            return FilterOutcome::NothingToReview;
        }

        let count = review.len();
        self.active = review;
        self.reset_position();
        info!(cards = count, "filtered for review");
        FilterOutcome::Filtered(count)
    }

    /// Show every card in the chosen range again.
    pub fn reset_to_master(&mut self) {
        self.active = self.master.clone();
        self.reset_position();
        info!(cards = self.active.len(), "reset to full range");
    }

    fn reset_position(&mut self) {
        self.cursor = 0;
        self.flipped = false;
    }

    // Navigation

    /// Advance one card. Returns false at the last card.
    pub fn next(&mut self) -> bool {
        if self.cursor + 1 < self.active.len() {
            self.cursor += 1;
            self.flipped = false;
            debug!(cursor = self.cursor, "next card");
            true
        } else {
            false
        }
    }

    /// Go back one card. Returns false at the first card.
    pub fn prev(&mut self) -> bool {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.flipped = false;
            debug!(cursor = self.cursor, "previous card");
            true
        } else {
            false
        }
    }

    /// Toggle between problem and solution.
    pub fn flip(&mut self) {
        self.flipped = !self.flipped;
    }

    // Status

    /// Tag the card under the cursor. Returns its source index.
    pub fn mark_status(&mut self, status: Status) -> DeckResult<usize> {
        if self.active.is_empty() {
            return Err(DeckError::EmptyDeck);
        }
        self.cursor = self.cursor.min(self.active.len() - 1);

        let source_index = self.active[self.cursor];
        self.statuses[source_index] = status;
        debug!(source_index, status = status.name(), "marked card");
        Ok(source_index)
    }

    /// Forget every mastery tag.
    pub fn reset_progress(&mut self) {
        self.statuses.fill(Status::Unseen);
        info!(cards = self.statuses.len(), "reset progress");
    }

    // Accessors

    /// The card under the cursor.
    pub fn current_pair(&self) -> DeckResult<CurrentCard<'_>> {
        if self.active.is_empty() {
            return Err(DeckError::EmptyDeck);
        }
        let position = self.cursor.min(self.active.len() - 1);
        let source_index = self.active[position];

        Ok(CurrentCard {
            source_index,
            pair: &self.pairs[source_index],
            status: self.statuses[source_index],
            is_last: position == self.active.len() - 1,
            position,
            total: self.active.len(),
            side: Side::from_flipped(self.flipped),
        })
    }

    /// Cards in the active sequence.
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Same as [`len`](Self::len); the count shown as "Card k / total".
    pub fn total_cards(&self) -> usize {
        self.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn at_first(&self) -> bool {
        self.cursor == 0
    }

    pub fn at_last(&self) -> bool {
        self.cursor + 1 >= self.active.len()
    }

    /// Source indices of the chosen range.
    pub fn master(&self) -> &[usize] {
        &self.master
    }

    /// Source indices being paged through.
    pub fn active(&self) -> &[usize] {
        &self.active
    }

    /// Whether the active sequence is a review subset of the range.
    pub fn is_filtered(&self) -> bool {
        self.active != self.master
    }

    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }

    /// Number of loaded pairs.
    pub fn source_len(&self) -> usize {
        self.pairs.len()
    }

    /// Status of a source index.
    pub fn status(&self, source_index: usize) -> Option<Status> {
        self.statuses.get(source_index).copied()
    }

    /// Mastery counts over the chosen range.
    pub fn progress(&self) -> RangeProgress {
        let mut progress = RangeProgress {
            total: self.master.len(),
            ..RangeProgress::default()
        };
        for &idx in &self.master {
            match self.statuses[idx] {
                Status::Mastered => progress.mastered += 1,
                Status::NeedsReview => progress.needs_review += 1,
                Status::Unseen => {}
            }
        }
        progress
    }
}
