//! Splits a tutor reply into its narrative body and lettered answer options.

use std::sync::LazyLock;

use regex::Regex;

/// A tutor reply after option extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedReply {
    pub body: String,
    pub options: Vec<String>,
}

static OPTION_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-F]\)\s+\S").expect("valid option line regex"));

/// Pulls `A) ...` style option lines out of a reply.
///
/// A line counts as an option when, after trimming, it starts with a capital
/// letter A through F, a closing parenthesis, whitespace and then text.
/// Options keep their order of appearance; every other line stays in the body,
/// minus any blank lines left dangling at the end. Duplicate letters and more
/// than six options are passed through untouched.
pub fn parse_reply(text: &str) -> ParsedReply {
    let mut body_lines: Vec<&str> = Vec::new();
    let mut options = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim();
        if OPTION_LINE_RE.is_match(trimmed) {
            options.push(trimmed.to_string());
        } else {
            body_lines.push(line);
        }
    }
    while body_lines.last().is_some_and(|l| l.trim().is_empty()) {
        body_lines.pop();
    }
    ParsedReply {
        body: body_lines.join("\n"),
        options,
    }
}
