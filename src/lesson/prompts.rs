//! Fixed model-facing copy: system prompts, the quiz kickoff and the
//! apology used when the tutor cannot be reached.

/// Hidden first user message that asks the tutor to start quizzing.
pub const KICKOFF_MESSAGE: &str = "\
I just finished the intro slides on learning techniques (active recall, spaced \
repetition, feedback loops). Quiz me on them: ask exactly one multiple-choice \
question at a time with options labelled A), B), C), D) on their own lines, \
then wait for my answer.";

/// Synthetic assistant reply recorded when every round trip attempt failed.
/// Worded to carry no verdict cue so it never scores the pending answer.
pub const FALLBACK_REPLY: &str = "\
Sorry, I had trouble reaching the tutor service. Give it a moment and try again.";

pub const TUTOR_SYSTEM_PROMPT: &str = "\
You are the APEX tutor, running a short quiz right after a mini lesson on \
learning techniques (active recall, spaced repetition, feedback loops). Ask \
exactly one multiple-choice question per reply. Put each option on its own \
line in the form \"A) option text\", using capital letters A through D. After \
the learner answers with a letter, open your reply with \"Correct!\" when they \
are right, or with \"Not quite — the correct answer is X)\" when they are \
wrong, then ask the next question. Keep replies short, warm and encouraging.";

/// Deck generation wants nothing but JSON back, so the schema and the
/// no-prose rule both live in the system prompt.
pub const DECK_SYSTEM_PROMPT: &str = "\
You design a personalised APEX course preview from a resume. Reply with a \
single JSON object and nothing else: no prose, no markdown fences. Schema: \
{\"theme\": string, \"title\": string, \"slides\": [{\"id\": string, \
\"type\": \"title\"|\"bullets\"|\"code\"|\"quiz\", \"headline\": string, \
\"bullets\": [string], \"code\": string|null, \"prompt\": string|null, \
\"expected\": string|null}]}. Produce 5 to 8 slides: open with a title slide, \
teach with bullet and code slides drawn from the resume's field, and end with \
one quiz slide whose prompt invites the learner to test themselves.";

/// Base tutor prompt, with adaptive learner context appended when present.
pub fn tutor_system_prompt(adaptive_context: Option<&str>) -> String {
    match adaptive_context {
        Some(ctx) if !ctx.trim().is_empty() => format!(
            "{TUTOR_SYSTEM_PROMPT}\n\nWhat is known about this learner from earlier sessions:\n{ctx}"
        ),
        _ => TUTOR_SYSTEM_PROMPT.to_string(),
    }
}

pub fn deck_user_prompt(resume_text: &str) -> String {
    format!("Build the course preview for this resume:\n\n{resume_text}")
}
