//! Keyword heuristics over tutor feedback: was the learner's pick right?

use std::sync::LazyLock;

use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub verdict: Verdict,
    pub correct_letter_hint: Option<char>,
}

const NEGATIVE_CUES: [&str; 4] = ["incorrect", "not quite", "wrong", "not correct"];
const POSITIVE_CUES: [&str; 6] = ["correct", "right", "exactly", "well done", "great job", "nice"];

static HINT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"correct answer (?:is|was)\s+([a-f])\b").expect("valid answer hint regex")
});

/// Classifies a feedback reply from cue words, case-insensitively.
///
/// Negative cues are checked first, so a reply like "not quite right"
/// classifies as incorrect even though it also contains a positive cue. When
/// the verdict is incorrect and the reply names the answer ("the correct
/// answer is B"), that letter is surfaced as a hint.
pub fn classify_reply(text: &str) -> Classification {
    let lowered = text.to_lowercase();
    if NEGATIVE_CUES.iter().any(|cue| lowered.contains(cue)) {
        let hint = HINT_RE
            .captures(&lowered)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().chars().next())
            .map(|c| c.to_ascii_uppercase());
        return Classification {
            verdict: Verdict::Incorrect,
            correct_letter_hint: hint,
        };
    }
    if POSITIVE_CUES.iter().any(|cue| lowered.contains(cue)) {
        return Classification {
            verdict: Verdict::Correct,
            correct_letter_hint: None,
        };
    }
    Classification {
        verdict: Verdict::Unknown,
        correct_letter_hint: None,
    }
}
