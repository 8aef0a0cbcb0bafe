//! Spaced-repetition scheduling for flashcards.
//!
//! A card carries a difficulty in `1..=5`. A correct answer raises it by one
//! and schedules the next review `difficulty * 2` days out; a miss lowers it
//! by one and brings the card back tomorrow.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Lowest difficulty a card can have.
pub const MIN_DIFFICULTY: u8 = 1;

/// Highest difficulty a card can have.
pub const MAX_DIFFICULTY: u8 = 5;

/// Days until the next review after a missed answer.
const MISSED_INTERVAL_DAYS: i64 = 1;

/// Recall strength of a flashcard, always within `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    /// Difficulty assigned to new cards.
    pub const INITIAL: Self = Self(MIN_DIFFICULTY);

    /// Create a difficulty, rejecting values outside `1..=5`.
    #[must_use]
    pub fn new(value: u8) -> Option<Self> {
        (MIN_DIFFICULTY..=MAX_DIFFICULTY)
            .contains(&value)
            .then_some(Self(value))
    }

    /// Create a difficulty, clamping out-of-range values into `1..=5`.
    #[must_use]
    pub fn clamped(value: i64) -> Self {
        let clamped = value.clamp(i64::from(MIN_DIFFICULTY), i64::from(MAX_DIFFICULTY));
        Self(u8::try_from(clamped).unwrap_or(MIN_DIFFICULTY))
    }

    /// Raw value.
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }

    fn raised(self) -> Self {
        Self(self.0.saturating_add(1).min(MAX_DIFFICULTY))
    }

    fn lowered(self) -> Self {
        Self(self.0.saturating_sub(1).max(MIN_DIFFICULTY))
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error for a difficulty outside `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("difficulty must be between 1 and 5, got {0}")]
pub struct InvalidDifficulty(pub u8);

impl TryFrom<u8> for Difficulty {
    type Error = InvalidDifficulty;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(InvalidDifficulty(value))
    }
}

impl From<Difficulty> for u8 {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.0
    }
}

/// New schedule for a card after a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewOutcome {
    /// Updated difficulty.
    pub difficulty: Difficulty,
    /// When the card becomes due again.
    pub next_review: DateTime<Utc>,
}

/// Compute the next schedule for a card reviewed at `now`.
#[must_use]
pub fn review(difficulty: Difficulty, correct: bool, now: DateTime<Utc>) -> ReviewOutcome {
    let (difficulty, days) = if correct {
        let raised = difficulty.raised();
        (raised, i64::from(raised.get()) * 2)
    } else {
        (difficulty.lowered(), MISSED_INTERVAL_DAYS)
    };

    ReviewOutcome {
        difficulty,
        next_review: now + Duration::days(days),
    }
}

/// Whether a card scheduled for `next_review` is due at `now`.
///
/// The boundary is inclusive: a card scheduled exactly at `now` is due.
#[must_use]
pub fn is_due(next_review: &DateTime<Utc>, now: DateTime<Utc>) -> bool {
    *next_review <= now
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn d(value: u8) -> Difficulty {
        Difficulty::new(value).unwrap()
    }

    #[test]
    fn test_difficulty_rejects_out_of_range() {
        assert!(Difficulty::new(0).is_none());
        assert!(Difficulty::new(6).is_none());
        assert_eq!(Difficulty::new(3).map(Difficulty::get), Some(3));
        assert_eq!(Difficulty::try_from(9), Err(InvalidDifficulty(9)));
    }

    #[test]
    fn test_difficulty_clamped() {
        assert_eq!(Difficulty::clamped(-4).get(), 1);
        assert_eq!(Difficulty::clamped(0).get(), 1);
        assert_eq!(Difficulty::clamped(4).get(), 4);
        assert_eq!(Difficulty::clamped(42).get(), 5);
    }

    #[test]
    fn test_difficulty_serde() {
        let parsed: Difficulty = serde_json::from_str("2").unwrap();
        assert_eq!(parsed.get(), 2);
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "2");

        assert!(serde_json::from_str::<Difficulty>("0").is_err());
        assert!(serde_json::from_str::<Difficulty>("7").is_err());
    }

    #[test]
    fn test_correct_review_for_every_difficulty() {
        let now = fixed_now();
        for value in MIN_DIFFICULTY..=MAX_DIFFICULTY {
            let outcome = review(d(value), true, now);
            let expected = (value + 1).min(MAX_DIFFICULTY);
            assert_eq!(outcome.difficulty.get(), expected);
            assert_eq!(
                outcome.next_review - now,
                Duration::days(i64::from(expected) * 2)
            );
        }
    }

    #[test]
    fn test_incorrect_review_for_every_difficulty() {
        let now = fixed_now();
        for value in MIN_DIFFICULTY..=MAX_DIFFICULTY {
            let outcome = review(d(value), false, now);
            assert_eq!(outcome.difficulty.get(), (value - 1).max(MIN_DIFFICULTY));
            assert_eq!(outcome.next_review - now, Duration::days(1));
        }
    }

    #[test]
    fn test_floor_holds_on_repeated_misses() {
        let mut now = fixed_now();
        let mut difficulty = Difficulty::INITIAL;
        for _ in 0..3 {
            let outcome = review(difficulty, false, now);
            assert_eq!(outcome.difficulty.get(), 1);
            difficulty = outcome.difficulty;
            now = outcome.next_review;
        }
    }

    #[test]
    fn test_ceiling_holds_on_repeated_hits() {
        let mut now = fixed_now();
        let mut difficulty = d(5);
        for _ in 0..3 {
            let outcome = review(difficulty, true, now);
            assert_eq!(outcome.difficulty.get(), 5);
            assert_eq!(outcome.next_review - now, Duration::days(10));
            difficulty = outcome.difficulty;
            now = outcome.next_review;
        }
    }

    #[test]
    fn test_difficulty_three_correct() {
        let now = fixed_now();
        let outcome = review(d(3), true, now);
        assert_eq!(outcome.difficulty.get(), 4);
        assert_eq!(outcome.next_review, now + Duration::days(8));
    }

    #[test]
    fn test_difficulty_three_incorrect() {
        let now = fixed_now();
        let outcome = review(d(3), false, now);
        assert_eq!(outcome.difficulty.get(), 2);
        assert_eq!(outcome.next_review, now + Duration::days(1));
    }

    #[test]
    fn test_next_review_never_precedes_review_time() {
        let now = fixed_now();
        for value in MIN_DIFFICULTY..=MAX_DIFFICULTY {
            for correct in [true, false] {
                assert!(review(d(value), correct, now).next_review >= now);
            }
        }
    }

    #[test]
    fn test_is_due_boundary_inclusive() {
        let now = fixed_now();
        assert!(is_due(&now, now));
        assert!(is_due(&(now - Duration::seconds(1)), now));
        assert!(!is_due(&(now + Duration::seconds(1)), now));
    }
}
