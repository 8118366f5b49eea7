// Tests for prompt assembly: transcript sanitation, the bounded context
// block, and the shape of the user message sent for note generation.

use voxnotes::pipeline::prompts::{
    context_block, final_summary_system_prompt, notes_system_prompt, notes_user_message,
    sanitize_parts, CONTEXT_WINDOW, LATEST_MARKER,
};
use voxnotes::Profile;

fn strings(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|p| p.to_string()).collect()
}

#[test]
fn test_sanitize_drops_empty_and_whitespace_parts() {
    let parts = strings(&["a", "", "  ", " b ", "\n"]);
    assert_eq!(sanitize_parts(&parts), vec!["a", "b"]);
}

#[test]
fn test_context_block_keeps_only_the_most_recent_parts() {
    let parts = strings(&["one", "two", "three", "four"]);

    let block = context_block(&parts, CONTEXT_WINDOW).expect("non-empty context");

    assert!(!block.contains("one"));
    assert!(!block.contains("two"));
    assert!(block.contains("three"));
    assert!(block.contains("four"));
    // Oldest first.
    assert!(block.find("three").unwrap() < block.find("four").unwrap());
}

#[test]
fn test_context_block_skips_empty_transcripts() {
    // Empty parts do not consume window slots.
    let parts = strings(&["one", "", "two", "  "]);

    let block = context_block(&parts, 2).expect("non-empty context");

    assert!(block.contains("one"));
    assert!(block.contains("two"));
}

#[test]
fn test_context_block_is_none_when_nothing_usable() {
    assert_eq!(context_block(&[], 2), None);
    assert_eq!(context_block(&strings(&["", "  "]), 2), None);
}

#[test]
fn test_notes_user_message_marks_the_latest_segment() {
    let message = notes_user_message("current speech", &strings(&["earlier"]));

    assert!(message.contains(LATEST_MARKER));
    assert!(message.contains("current speech"));
    assert!(message.contains("earlier"));
    // Context precedes the marked latest segment.
    assert!(message.find("earlier").unwrap() < message.find(LATEST_MARKER).unwrap());

    // Without context, the message is just the marked segment.
    let bare = notes_user_message("only speech", &[]);
    assert!(bare.starts_with(LATEST_MARKER));
}

#[test]
fn test_system_prompts_vary_by_profile() {
    let meeting = notes_system_prompt(Profile::Meeting);
    let lecture = notes_system_prompt(Profile::Lecture);

    assert_ne!(meeting, lecture);
    assert!(meeting.contains("rollingSummary"));
    assert!(lecture.contains("rollingSummary"));

    let final_meeting = final_summary_system_prompt(Profile::Meeting);
    let final_interview = final_summary_system_prompt(Profile::Interview);
    assert_ne!(final_meeting, final_interview);
    assert!(final_meeting.contains("Action items"));
}
