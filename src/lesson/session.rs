//! The quiz session: transcript, stage machine and scoring. At most one
//! answer is in flight at a time, and the tutor's own feedback wording
//! decides whether the pick scored.

use async_trait::async_trait;

use crate::ai::ChatError;
use crate::lesson::classifier::{classify_reply, Verdict};
use crate::lesson::parser::{parse_reply, ParsedReply};
use crate::lesson::prompts::{FALLBACK_REPLY, KICKOFF_MESSAGE};
use crate::lesson::{is_option_letter, Message, Role, PROGRESS_HORIZON, XP_PER_CORRECT};

/// Where the session sits between round trips.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Stage {
    #[default]
    Idle,
    AwaitingFirstQuestion,
    AwaitingPick,
    AwaitingFeedback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizState {
    pub stage: Stage,
    pub picked_letter: Option<char>,
    pub feedback: Option<Feedback>,
    pub xp: u32,
    pub streak: u32,
    pub correct_letter_hint: Option<char>,
}

/// Anything that can produce the tutor's next reply for a transcript.
#[async_trait]
pub trait TutorBackend: Send + Sync {
    async fn reply(&self, messages: &[Message]) -> Result<String, ChatError>;
}

pub struct LessonSession<B> {
    backend: B,
    messages: Vec<Message>,
    state: QuizState,
    latest: ParsedReply,
}

impl<B: TutorBackend> LessonSession<B> {
    pub fn new(backend: B) -> Self {
        LessonSession {
            backend,
            messages: Vec::new(),
            state: QuizState::default(),
            latest: ParsedReply::default(),
        }
    }

    pub fn state(&self) -> &QuizState {
        &self.state
    }

    pub fn latest(&self) -> &ParsedReply {
        &self.latest
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Lesson progress in `[0, 1]`: tutor replies seen so far against a
    /// fixed horizon.
    pub fn progress(&self) -> f64 {
        let replies = self
            .messages
            .iter()
            .filter(|m| m.role == Role::Assistant)
            .count();
        (replies as f64 / PROGRESS_HORIZON as f64).min(1.0)
    }

    /// Opens the quiz: sends the hidden kickoff message and returns the
    /// tutor's first question. Does nothing once the session is running.
    pub async fn start(&mut self) -> &ParsedReply {
        if self.state.stage != Stage::Idle {
            return &self.latest;
        }
        self.messages.push(Message::user(KICKOFF_MESSAGE));
        self.state.stage = Stage::AwaitingFirstQuestion;
        let reply = self.round_trip().await;
        self.receive_reply(reply)
    }

    /// Records an answer pick. Returns false when no pick is being accepted
    /// right now or the letter is outside A..=F; the first accepted pick
    /// locks the question.
    pub fn pick(&mut self, letter: char) -> bool {
        if self.state.stage != Stage::AwaitingPick {
            return false;
        }
        let letter = letter.to_ascii_uppercase();
        if !is_option_letter(letter) {
            return false;
        }
        self.state.picked_letter = Some(letter);
        self.state.feedback = None;
        self.state.correct_letter_hint = None;
        self.state.stage = Stage::AwaitingFeedback;
        true
    }

    /// Sends the locked-in pick to the tutor and scores its feedback.
    pub async fn submit_pick(&mut self) -> &ParsedReply {
        let letter = match (self.state.stage, self.state.picked_letter) {
            (Stage::AwaitingFeedback, Some(letter)) => letter,
            _ => return &self.latest,
        };
        self.messages.push(Message::user(letter.to_string()));
        let reply = self.round_trip().await;
        self.receive_reply(reply)
    }

    /// Free-typed chat to the tutor, allowed while a pick is open.
    pub async fn send_text(&mut self, text: impl Into<String>) -> Option<&ParsedReply> {
        if self.state.stage != Stage::AwaitingPick {
            return None;
        }
        self.messages.push(Message::user(text));
        let reply = self.round_trip().await;
        Some(self.receive_reply(reply))
    }

    /// Folds a tutor reply into the transcript and state. Feedback is only
    /// scored when an answer was in flight; a reply with no readable verdict
    /// leaves XP, streak and feedback untouched.
    pub fn receive_reply(&mut self, text: String) -> &ParsedReply {
        if self.state.stage == Stage::AwaitingFeedback {
            let classification = classify_reply(&text);
            match classification.verdict {
                Verdict::Correct => {
                    self.state.xp += XP_PER_CORRECT;
                    self.state.streak += 1;
                    self.state.feedback = Some(Feedback::Correct);
                    self.state.correct_letter_hint = None;
                }
                Verdict::Incorrect => {
                    self.state.streak = 0;
                    self.state.feedback = Some(Feedback::Incorrect);
                    self.state.correct_letter_hint = classification.correct_letter_hint;
                }
                Verdict::Unknown => {}
            }
        }
        self.latest = parse_reply(&text);
        self.messages.push(Message::assistant(text));
        self.state.stage = Stage::AwaitingPick;
        &self.latest
    }

    async fn round_trip(&mut self) -> String {
        match self.backend.reply(&self.messages).await {
            Ok(reply) => reply,
            Err(err) => {
                log::warn!("tutor round trip failed: {err}");
                FALLBACK_REPLY.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;

    use super::*;

    struct Scripted {
        replies: Mutex<VecDeque<Result<String, ChatError>>>,
    }

    impl Scripted {
        fn new(replies: Vec<Result<&str, ChatError>>) -> Self {
            Scripted {
                replies: Mutex::new(replies.into_iter().map(|r| r.map(str::to_string)).collect()),
            }
        }
    }

    #[async_trait]
    impl TutorBackend for Scripted {
        async fn reply(&self, _messages: &[Message]) -> Result<String, ChatError> {
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(ChatError::NoModels))
        }
    }

    const FIRST_QUESTION: &str =
        "Which habit strengthens memory most?\nA) Re-reading\nB) Retrieval practice\nC) Highlighting";

    #[tokio::test]
    async fn start_sends_kickoff_and_parses_first_question() {
        let mut session = LessonSession::new(Scripted::new(vec![Ok(FIRST_QUESTION)]));
        let first = session.start().await.clone();
        assert_eq!(first.options.len(), 3);
        assert_eq!(first.body, "Which habit strengthens memory most?");
        assert_eq!(session.state().stage, Stage::AwaitingPick);
        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.messages()[0], Message::user(KICKOFF_MESSAGE));
        assert_eq!(session.state().xp, 0);
    }

    #[tokio::test]
    async fn kickoff_reply_is_never_scored() {
        // "Alright" contains a positive cue, so scoring the first reply
        // would award XP here.
        let backend = Scripted::new(vec![Ok(
            "Alright, let's begin!\nA) Re-reading\nB) Retrieval practice",
        )]);
        let mut session = LessonSession::new(backend);
        let first = session.start().await.clone();
        assert_eq!(first.options.len(), 2);
        assert_eq!(session.state().xp, 0);
        assert_eq!(session.state().streak, 0);
        assert_eq!(session.state().feedback, None);
        assert_eq!(session.state().stage, Stage::AwaitingPick);
    }

    #[tokio::test]
    async fn start_is_a_no_op_once_running() {
        let mut session = LessonSession::new(Scripted::new(vec![Ok(FIRST_QUESTION)]));
        session.start().await;
        session.start().await;
        assert_eq!(session.messages().len(), 2);
    }

    #[tokio::test]
    async fn correct_then_incorrect_feedback_moves_xp_and_streak() {
        let backend = Scripted::new(vec![
            Ok(FIRST_QUESTION),
            Ok("Correct! Nice work.\n\nNext one:\nA) Cramming\nB) Spacing"),
            Ok("Not quite — the correct answer is B) Spacing.\nA) Skip sleep\nB) Sleep on it"),
        ]);
        let mut session = LessonSession::new(backend);
        session.start().await;

        assert!(session.pick('b'));
        assert_eq!(session.state().stage, Stage::AwaitingFeedback);
        session.submit_pick().await;
        assert_eq!(session.state().xp, 25);
        assert_eq!(session.state().streak, 1);
        assert_eq!(session.state().feedback, Some(Feedback::Correct));
        assert_eq!(session.state().picked_letter, Some('B'));

        assert!(session.pick('A'));
        session.submit_pick().await;
        assert_eq!(session.state().xp, 25);
        assert_eq!(session.state().streak, 0);
        assert_eq!(session.state().feedback, Some(Feedback::Incorrect));
        assert_eq!(session.state().correct_letter_hint, Some('B'));
    }

    #[tokio::test]
    async fn pick_is_ignored_outside_the_pick_stage() {
        let mut session = LessonSession::new(Scripted::new(vec![Ok(FIRST_QUESTION)]));
        assert!(!session.pick('A'));
        session.start().await;
        assert!(!session.pick('G'));
        assert!(!session.pick('7'));
        assert!(session.pick('A'));
        assert!(!session.pick('B'));
        assert_eq!(session.state().picked_letter, Some('A'));
    }

    #[tokio::test]
    async fn neutral_feedback_changes_nothing() {
        let backend = Scripted::new(vec![
            Ok(FIRST_QUESTION),
            Ok("Let's look at that from another angle.\nA) Again\nB) Differently"),
        ]);
        let mut session = LessonSession::new(backend);
        session.start().await;
        session.pick('A');
        let next = session.submit_pick().await.clone();
        assert_eq!(next.options.len(), 2);
        assert_eq!(session.state().xp, 0);
        assert_eq!(session.state().streak, 0);
        assert_eq!(session.state().feedback, None);
        assert_eq!(session.state().stage, Stage::AwaitingPick);
    }

    #[tokio::test]
    async fn backend_failure_turns_into_a_neutral_apology() {
        let mut session = LessonSession::new(Scripted::new(Vec::new()));
        let first = session.start().await.clone();
        assert_eq!(first.body, FALLBACK_REPLY);
        assert!(first.options.is_empty());
        assert_eq!(session.state().stage, Stage::AwaitingPick);
        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.messages()[1].role, Role::Assistant);
    }

    #[tokio::test]
    async fn failure_while_an_answer_is_in_flight_scores_nothing() {
        let mut session = LessonSession::new(Scripted::new(vec![Ok(FIRST_QUESTION)]));
        session.start().await;
        session.pick('A');
        let reply = session.submit_pick().await.clone();
        assert_eq!(reply.body, FALLBACK_REPLY);
        assert_eq!(session.state().xp, 0);
        assert_eq!(session.state().streak, 0);
        assert_eq!(session.state().feedback, None);
        assert_eq!(session.state().stage, Stage::AwaitingPick);
    }

    #[tokio::test]
    async fn free_text_is_never_scored() {
        let backend = Scripted::new(vec![
            Ok(FIRST_QUESTION),
            Ok("Exactly the right question to ask! Recall means pulling it from memory.\nA) Re-reading\nB) Retrieval practice"),
        ]);
        let mut session = LessonSession::new(backend);
        session.start().await;
        assert!(session.send_text("what does recall mean?").await.is_some());
        assert_eq!(session.state().xp, 0);
        assert_eq!(session.state().feedback, None);
        assert_eq!(session.state().stage, Stage::AwaitingPick);
        assert_eq!(session.messages().len(), 4);

        session.pick('B');
        assert!(session.send_text("wait, one more question").await.is_none());
    }

    #[tokio::test]
    async fn progress_counts_replies_and_caps_at_one() {
        let mut session = LessonSession::new(Scripted::new(Vec::new()));
        assert_eq!(session.progress(), 0.0);
        for _ in 0..5 {
            session.receive_reply("Onward.".to_string());
        }
        assert_eq!(session.progress(), 0.25);
        for _ in 0..20 {
            session.receive_reply("Onward.".to_string());
        }
        assert_eq!(session.progress(), 1.0);
    }
}
