//! Slide deck model shared by the builtin lesson and generated previews,
//! plus the driver that steps through a deck.

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideKind {
    Title,
    Bullets,
    Code,
    Quiz,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SlideKind,
    pub headline: String,
    #[serde(default)]
    pub bullets: Vec<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub expected: Option<String>,
    /// Dwell override in seconds; decks without one fall back to a
    /// per-kind default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seconds: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideDeck {
    pub theme: String,
    pub title: String,
    pub slides: Vec<Slide>,
}

fn bullets_slide(id: &str, headline: &str, bullets: [&str; 3]) -> Slide {
    Slide {
        id: id.to_string(),
        kind: SlideKind::Bullets,
        headline: headline.to_string(),
        bullets: bullets.iter().map(|b| b.to_string()).collect(),
        code: None,
        prompt: None,
        expected: None,
        seconds: None,
    }
}

/// The stock mini lesson played when no resume was supplied.
pub fn builtin_deck() -> SlideDeck {
    let opener = Slide {
        id: "intro".to_string(),
        kind: SlideKind::Title,
        headline: "Learning How to Learn".to_string(),
        bullets: vec!["A five minute APEX preview".to_string()],
        code: None,
        prompt: None,
        expected: None,
        seconds: Some(3),
    };
    let handoff = Slide {
        id: "quiz".to_string(),
        kind: SlideKind::Quiz,
        headline: "Ready to put it to work?".to_string(),
        bullets: Vec::new(),
        code: None,
        prompt: Some("Start the quiz and see how much stuck.".to_string()),
        expected: None,
        seconds: None,
    };
    SlideDeck {
        theme: "foundations".to_string(),
        title: "Learning How to Learn".to_string(),
        slides: vec![
            opener,
            bullets_slide(
                "recall",
                "Active recall",
                [
                    "Closed-book practice beats re-reading",
                    "Each retrieval strengthens the memory trace",
                    "Flashcards work because they force retrieval",
                ],
            ),
            bullets_slide(
                "spacing",
                "Spaced repetition",
                [
                    "Review just before you forget",
                    "Intervals grow as material sticks",
                    "Ten minutes daily beats a weekend binge",
                ],
            ),
            bullets_slide(
                "feedback",
                "Feedback loops",
                [
                    "Mistakes caught early are cheap",
                    "An answer plus a why beats a bare grade",
                    "Your tutor corrects you in real time",
                ],
            ),
            bullets_slide(
                "format",
                "How the preview works",
                [
                    "Short quiz, one question at a time",
                    "Answer with a letter, earn XP",
                    "Streaks grow while you stay sharp",
                ],
            ),
            handoff,
        ],
    }
}

fn default_seconds(kind: SlideKind) -> u64 {
    match kind {
        SlideKind::Title => 4,
        SlideKind::Bullets => 8,
        SlideKind::Code => 10,
        SlideKind::Quiz => 8,
    }
}

/// Cursor over a deck. Navigation clamps at both ends; the deck handed in
/// is never empty.
#[derive(Debug, Clone)]
pub struct SlideDriver {
    deck: SlideDeck,
    index: usize,
}

impl SlideDriver {
    pub fn new(deck: SlideDeck) -> Self {
        debug_assert!(!deck.slides.is_empty(), "a deck must have slides");
        SlideDriver { deck, index: 0 }
    }

    pub fn current(&self) -> &Slide {
        &self.deck.slides[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.deck.slides.len()
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.deck.slides.len()
    }

    /// Steps forward, reporting whether the cursor moved.
    pub fn advance(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.index += 1;
        true
    }

    /// Steps back, reporting whether the cursor moved.
    pub fn retreat(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    /// Jumps straight to the final slide without visiting the ones between.
    pub fn skip_to_end(&mut self) {
        self.index = self.deck.slides.len() - 1;
    }

    /// How long the current slide should stay up before auto-advancing.
    /// The last slide never auto-advances, so it has no dwell.
    pub fn dwell(&self) -> Option<Duration> {
        if self.is_last() {
            return None;
        }
        let slide = self.current();
        let secs = slide.seconds.unwrap_or_else(|| default_seconds(slide.kind));
        Some(Duration::from_secs(secs))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn builtin_deck_opens_on_title_and_ends_on_quiz_handoff() {
        let deck = builtin_deck();
        assert_eq!(deck.slides.len(), 6);
        assert_eq!(deck.slides[0].kind, SlideKind::Title);
        assert_eq!(deck.slides[5].kind, SlideKind::Quiz);
        assert!(deck.slides[5].prompt.is_some());
    }

    #[test]
    fn navigation_clamps_at_both_ends() {
        let mut driver = SlideDriver::new(builtin_deck());
        assert!(!driver.retreat());
        assert_eq!(driver.index(), 0);
        while driver.advance() {}
        assert_eq!(driver.index(), driver.len() - 1);
        assert!(!driver.advance());
        assert_eq!(driver.index(), driver.len() - 1);
    }

    #[test]
    fn skip_goes_straight_to_the_last_slide() {
        let mut driver = SlideDriver::new(builtin_deck());
        driver.skip_to_end();
        assert_eq!(driver.index(), driver.len() - 1);
        assert!(driver.is_last());

        let mut from_middle = SlideDriver::new(builtin_deck());
        from_middle.advance();
        from_middle.advance();
        from_middle.skip_to_end();
        assert_eq!(from_middle.index(), from_middle.len() - 1);
    }

    #[test]
    #[should_panic(expected = "a deck must have slides")]
    fn an_empty_deck_is_refused_up_front() {
        SlideDriver::new(SlideDeck {
            theme: "t".to_string(),
            title: "T".to_string(),
            slides: Vec::new(),
        });
    }

    #[test]
    fn last_slide_has_no_dwell() {
        let mut driver = SlideDriver::new(builtin_deck());
        assert!(driver.dwell().is_some());
        driver.skip_to_end();
        assert_eq!(driver.dwell(), None);
    }

    #[test]
    fn dwell_prefers_the_explicit_override() {
        let mut driver = SlideDriver::new(builtin_deck());
        // Opener carries seconds: Some(3).
        assert_eq!(driver.dwell(), Some(Duration::from_secs(3)));
        driver.advance();
        assert_eq!(driver.dwell(), Some(Duration::from_secs(8)));
    }
}
