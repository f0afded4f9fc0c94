//! Plain-text rendering and command parsing for the terminal player.

use std::fmt::Write as _;
use quiz_core::model::OptionSlot;
use quiz_core::{QuestionReview, ReviewStatus};
use services::{PlayEvent, PlayProgress, PlayerInput, SubmitResult};

pub const COMMAND_HINT: &str = "type 1-4 to answer, `n` for next, `f` to finish";

/// Map one line of input to a player command.
pub fn parse_command(line: &str) -> Option<PlayerInput> {
    let line = line.trim().to_ascii_lowercase();
    match line.as_str() {
        "n" | "next" => Some(PlayerInput::Next),
        "f" | "finish" | "submit" => Some(PlayerInput::Finish),
        other => other.parse::<OptionSlot>().ok().map(PlayerInput::Select),
    }
}

/// Text for an event, or `None` when it is not worth a line.
pub fn format_event(event: &PlayEvent) -> Option<String> {
    match event {
        PlayEvent::Question {
            ordinal,
            total,
            text,
            options,
        } => {
            let mut out = format!("\nQuestion {} of {total}\n{text}\n", ordinal + 1);
            for slot in OptionSlot::ALL {
                let _ = writeln!(out, "  {}) {}", slot.number(), options[slot.index()]);
            }
            out.push_str(COMMAND_HINT);
            Some(out)
        }
        PlayEvent::Countdown(progress) => countdown_line(progress),
        PlayEvent::Submitting { .. } => Some("Submitting...".to_string()),
        PlayEvent::Finished(result) => Some(format_result(result)),
    }
}

const BAR_WIDTH: usize = 10;

fn countdown_line(progress: &PlayProgress) -> Option<String> {
    let secs = progress.remaining_secs();
    let notable = secs > 0 && (secs <= 5 || secs % 10 == 0);
    if !notable {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let filled = ((progress.fraction_remaining() * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    Some(format!(
        "  [{}{}] {secs}s left on {}/{}",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        progress.number(),
        progress.total
    ))
}

pub fn format_result(result: &SubmitResult) -> String {
    let mut out = format!("\nYour score: {}", result.score);
    if let Some(warning) = result.warning() {
        let _ = write!(out, "\nwarning: {warning}");
    }
    out
}

pub fn format_review(reviews: &[QuestionReview]) -> String {
    let mut out = String::from("\nReview");
    for review in reviews {
        let mark = match review.status {
            ReviewStatus::Correct => "correct",
            ReviewStatus::Wrong => "wrong",
            ReviewStatus::Unanswered => "unanswered",
        };
        let _ = write!(
            out,
            "\n{}. {} [{mark}]\n   answer: {}",
            review.ordinal + 1,
            review.question,
            review.correct
        );
        if let (ReviewStatus::Wrong, Some(selected)) = (review.status, &review.selected) {
            let _ = write!(out, "\n   you chose: {selected}");
        }
    }
    out
}
