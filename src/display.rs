//! Colored CLI display utilities for flashcard output.

use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use uuid::Uuid;

use crate::store::Flashcard;

/// Maximum length for truncated question and answer text.
const DEFAULT_MAX_LEN: usize = 60;

/// Truncate a string to a maximum number of characters, adding an ellipsis
/// if truncated.
#[must_use]
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        "...".to_string()
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{kept}...")
    }
}

/// Describe how overdue a card is, e.g. `due now`, `3h overdue`, `2d overdue`.
#[must_use]
pub fn overdue_label(next_review: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let overdue = now.signed_duration_since(next_review);
    if overdue.num_days() > 0 {
        format!("{}d overdue", overdue.num_days())
    } else if overdue.num_hours() > 0 {
        format!("{}h overdue", overdue.num_hours())
    } else {
        "due now".to_string()
    }
}

/// Collapse whitespace so multi-line text fits on one line.
fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First eight hex digits of an id, as shown in listings.
fn short_id(id: &Uuid) -> String {
    id.simple().to_string()[..8].to_string()
}

/// Print the header for the due list.
fn print_due_header(count: usize, now: DateTime<Utc>) {
    println!(
        "{} {} {} due",
        now.format("%Y-%m-%d %H:%M UTC").dimmed(),
        "[DUE]".blue().bold(),
        count.to_string().cyan()
    );
}

/// Print one due flashcard.
fn print_flashcard(card: &Flashcard, now: DateTime<Utc>) {
    let stars = "*".repeat(usize::from(card.difficulty.get()));
    println!(
        "  {} {:<5} {} {} {}",
        short_id(&card.id).dimmed(),
        stars.yellow(),
        truncate(&single_line(&card.question), DEFAULT_MAX_LEN).bold(),
        "->".dimmed(),
        truncate(&single_line(&card.answer), DEFAULT_MAX_LEN).green()
    );
    println!(
        "           {}",
        overdue_label(card.next_review, now).red()
    );
}

/// Print the due list, or a note when nothing is due.
pub fn print_due_flashcards(cards: &[Flashcard], now: DateTime<Utc>) {
    if cards.is_empty() {
        println!("{} {}", "[DUE]".blue().bold(), "No flashcards due".green());
    } else {
        print_due_header(cards.len(), now);
        for card in cards {
            print_flashcard(card, now);
        }
    }
}
