//! Instruction text for the summarization capability.
//!
//! System prompts hold the stable instructions (cacheable, identical across
//! calls for a given profile); the user message carries the data. Route
//! handlers never embed prompt text directly.

use crate::store::Profile;

/// Marker framing the transcript the notes must be extracted from.
pub const LATEST_MARKER: &str = "=== LATEST SEGMENT ===";

/// Separator between transcript parts in user messages.
pub const PART_SEPARATOR: &str = "\n\n---\n\n";

/// How many prior transcripts the context window may carry.
pub const CONTEXT_WINDOW: usize = 2;

const BASE_INSTRUCTIONS: &str = "\
You are a note-taking assistant.

Write clearly and concisely.
Use correct spelling, punctuation and grammar.

Core rule:
Do not add information that is not present in the input.
Do not guess.
If something is unclear, stay with what can be read from the text.";

fn profile_context(profile: Profile) -> &'static str {
    match profile {
        Profile::Meeting => "\
This is a meeting record or meeting summary.

Prioritize the following:
1. Main discussion topics
2. Decisions that were made
3. Action items
4. Owners, when they are named
5. Dates or deadlines, when they are named
6. Items that need follow-up

Be concise, objective and clear.",

        Profile::Lecture => "\
These are lecture notes.

Prioritize the following:
1. Main ideas
2. Key concepts
3. Examples or explanations
4. Results or conclusions
5. Points worth remembering

Write in an organized and academically clear way.",

        Profile::Interview => "\
This is an interview summary.

Prioritize the following:
1. The main purpose of the interview, if stated
2. The main questions or topics
3. The main answers and information
4. Important facts, viewpoints and conclusions

Keep a clear separation between questions and answers where applicable.",

        Profile::Freeform => "\
This is a general summary.

Bring out:
1. The main points
2. Important facts
3. Conclusions or next steps, if stated

Write in an organized, readable and concise way.",
    }
}

/// Trim transcript parts and drop the empty ones.
pub fn sanitize_parts(parts: &[String]) -> Vec<String> {
    parts
        .iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

/// Build the prior-context block: the last `limit` non-empty transcripts,
/// oldest first. `None` when there is nothing usable.
pub fn context_block(previous: &[String], limit: usize) -> Option<String> {
    let clean = sanitize_parts(previous);
    if clean.is_empty() {
        return None;
    }
    let start = clean.len().saturating_sub(limit);
    Some(clean[start..].join(PART_SEPARATOR))
}

/// User message for note generation: bounded prior context plus the marked
/// latest segment.
pub fn notes_user_message(transcript: &str, previous: &[String]) -> String {
    let mut parts = Vec::new();
    if let Some(context) = context_block(previous, CONTEXT_WINDOW) {
        parts.push(context);
    }
    parts.push(format!("{}\n{}", LATEST_MARKER, transcript.trim()));
    parts.join(PART_SEPARATOR)
}

/// System prompt for per-chunk note extraction. Demands strict JSON with a
/// `notes` array and a `rollingSummary` string.
pub fn notes_system_prompt(profile: Profile) -> String {
    format!(
        "{base}\n\n{profile}\n\n\
You receive text from the user containing:\n\
1. Limited prior context (if present), delimited by \"---\"\n\
2. The latest segment to extract notes from, delimited by \"{marker}\"\n\n\
Task:\n\
Produce notes from the LATEST segment.\n\
Use the prior context only to resolve references, names and continuing discussion.\n\
Do not repeat content from the prior context unless it is needed to explain the latest segment.\n\n\
Return only valid JSON.\n\
No markdown, no code fences, no explanations before or after the JSON.\n\n\
The JSON must have EXACTLY this shape:\n\
{{\n\
  \"notes\": [\n\
    \"Item 1\",\n\
    \"Item 2\"\n\
  ],\n\
  \"rollingSummary\": \"A short, objective summary of everything covered so far.\"\n\
}}\n\n\
Strict rules:\n\
1. \"notes\" must be an array of short, clear items\n\
2. Every item in \"notes\" must be grounded in the text, not guessed\n\
3. \"rollingSummary\" must be short and objective\n\
4. \"rollingSummary\" may integrate prior context and the latest segment, but must not add anything that is not present\n\
5. If the latest segment contains very little material, still return valid JSON\n\
6. If nothing noteworthy appears, \"notes\" may be an empty array\n\n\
Return JSON only.",
        base = BASE_INSTRUCTIONS,
        profile = profile_context(profile),
        marker = LATEST_MARKER,
    )
}

fn final_summary_structure(profile: Profile) -> &'static str {
    match profile {
        Profile::Meeting => "\
Use the following sections where the material supports them:
1. Overview
2. Main discussion topics
3. Main decisions
4. Action items and next steps
5. Follow-up items
6. Unresolved issues or open questions",

        Profile::Lecture => "\
Use the following sections where the material supports them:
1. Overview
2. Main content
3. Key concepts
4. Examples and explanations
5. Main results or takeaways",

        Profile::Interview => "\
Use the following sections where the material supports them:
1. Overview
2. Purpose or context
3. Main questions or topics
4. Main answers and information
5. Key insights or conclusions",

        Profile::Freeform => "\
Use the following sections where the material supports them:
1. Overview
2. Main points
3. Important facts
4. Conclusions or next steps",
    }
}

/// System prompt for the one-time consolidated summary over all transcripts.
pub fn final_summary_system_prompt(profile: Profile) -> String {
    format!(
        "{base}\n\n{profile}\n\n\
You receive a continuous transcript, or a collection of transcript parts, from the user.\n\
The task is to write a polished final summary grounded solely in this material.\n\n\
Structure:\n\
{structure}\n\n\
Strict rules:\n\
1. Do not add information that is not present in the text\n\
2. Do not guess names, dates, ownership or outcomes that are not clearly stated\n\
3. Merge repetition and write clearly without losing meaning\n\
4. When information is missing, leave it out rather than filling gaps\n\
5. Keep the summary useful, organized and readable\n\
6. Use clear headings\n\
7. If action items, owners or deadlines appear, call them out explicitly\n\
8. Where the text is unclear, stay with what is certain\n\n\
Return only the final summary.\n\
No preamble, no notes about how the work was done.",
        base = BASE_INSTRUCTIONS,
        profile = profile_context(profile),
        structure = final_summary_structure(profile),
    )
}
