//! Terminal rendition of the course preview: intro screen, auto-advancing
//! slides, then the live tutor quiz.

use std::io::Write as _;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use rand::seq::SliceRandom;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;

use crate::ai::ChatClient;
use crate::config::AppConfig;
use crate::deckgen;
use crate::lesson::session::{Feedback, LessonSession};
use crate::lesson::slides::{builtin_deck, SlideDeck, SlideDriver, SlideKind};
use crate::lesson::XP_PER_CORRECT;

/// Pause between locking a pick in and sending it, so the lock-in renders
/// before the feedback arrives.
const PICK_SUBMIT_DELAY: Duration = Duration::from_millis(600);

const CELEBRATION_LINES: [&str; 4] = [
    "Boom! You're on fire.",
    "Sharp as ever.",
    "That's the APEX way.",
    "Climbing fast!",
];

/// One screen of the preview. Each phase owns what the next one needs.
enum Phase {
    Intro { deck: SlideDeck, client: ChatClient },
    Teaching { driver: SlideDriver, client: ChatClient },
    Lesson(Box<LessonSession<ChatClient>>),
    Done,
}

enum SlideCommand {
    Next,
    Back,
    Skip,
    Quit,
    Other,
}

enum SlideOutcome {
    StartQuiz,
    Quit,
}

pub async fn run(config: &AppConfig, resume: Option<PathBuf>) -> anyhow::Result<()> {
    let api_key = config
        .openrouter_api_key
        .clone()
        .context("OPENROUTER_API_KEY must be set for the preview")?;
    let client = ChatClient::new(
        reqwest::Client::new(),
        api_key,
        config.openrouter_base_url.clone(),
    );

    let deck = match resume {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading resume {}", path.display()))?;
            println!("Generating a deck tailored to your resume...");
            deckgen::generate(&client, &text).await?
        }
        None => builtin_deck(),
    };

    let mut input = spawn_input_reader();
    let mut phase = Phase::Intro { deck, client };
    loop {
        phase = match phase {
            Phase::Intro { deck, client } => {
                render_intro(&deck);
                match input.recv().await {
                    None => Phase::Done,
                    Some(line) if line.trim().eq_ignore_ascii_case("q") => Phase::Done,
                    Some(_) => Phase::Teaching {
                        driver: SlideDriver::new(deck),
                        client,
                    },
                }
            }
            Phase::Teaching { mut driver, client } => {
                match run_slides(&mut driver, &mut input).await {
                    SlideOutcome::StartQuiz => Phase::Lesson(Box::new(LessonSession::new(client))),
                    SlideOutcome::Quit => Phase::Done,
                }
            }
            Phase::Lesson(mut session) => {
                run_quiz(&mut session, &mut input).await;
                Phase::Done
            }
            Phase::Done => break,
        };
    }
    println!("Thanks for previewing APEX!");
    Ok(())
}

fn spawn_input_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(8);
    let _reader = tokio::spawn(async move {
        let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(line).await.is_err() {
                break;
            }
        }
    });
    rx
}

fn render_intro(deck: &SlideDeck) {
    println!();
    println!("=== APEX COURSE PREVIEW ===");
    println!("{} ({} slides, theme: {})", deck.title, deck.slides.len(), deck.theme);
    println!();
    println!("Slides advance on their own. Enter moves on early, b goes back,");
    println!("s skips to the end, q quits. Press Enter to begin.");
}

/// Plays the deck until the learner starts the quiz or quits. Each slide
/// arms one auto-advance timer; any command cancels it.
async fn run_slides(
    driver: &mut SlideDriver,
    input: &mut mpsc::Receiver<String>,
) -> SlideOutcome {
    loop {
        render_slide(driver);
        match driver.dwell() {
            Some(dwell) => {
                tokio::select! {
                    _ = tokio::time::sleep(dwell) => {
                        driver.advance();
                    }
                    line = input.recv() => match parse_command(line) {
                        SlideCommand::Quit => return SlideOutcome::Quit,
                        SlideCommand::Next => {
                            driver.advance();
                        }
                        SlideCommand::Back => {
                            driver.retreat();
                        }
                        SlideCommand::Skip => driver.skip_to_end(),
                        SlideCommand::Other => {}
                    },
                }
            }
            // Terminal slide: no timer, the learner decides.
            None => match parse_command(input.recv().await) {
                SlideCommand::Quit => return SlideOutcome::Quit,
                SlideCommand::Back => {
                    driver.retreat();
                }
                _ => return SlideOutcome::StartQuiz,
            },
        }
    }
}

fn parse_command(line: Option<String>) -> SlideCommand {
    let Some(line) = line else {
        return SlideCommand::Quit;
    };
    match line.trim().to_ascii_lowercase().as_str() {
        "" | "n" | "next" => SlideCommand::Next,
        "b" | "back" => SlideCommand::Back,
        "s" | "skip" => SlideCommand::Skip,
        "q" | "quit" => SlideCommand::Quit,
        _ => SlideCommand::Other,
    }
}

fn render_slide(driver: &SlideDriver) {
    let slide = driver.current();
    println!();
    println!(
        "--- Slide {}/{}: {} ---",
        driver.index() + 1,
        driver.len(),
        slide.headline
    );
    match slide.kind {
        SlideKind::Title => {
            for line in &slide.bullets {
                println!("  {line}");
            }
        }
        SlideKind::Bullets => {
            for line in &slide.bullets {
                println!("  * {line}");
            }
        }
        SlideKind::Code => {
            if let Some(code) = &slide.code {
                for line in code.lines() {
                    println!("    {line}");
                }
            }
            for line in &slide.bullets {
                println!("  * {line}");
            }
        }
        SlideKind::Quiz => {
            if let Some(prompt) = &slide.prompt {
                println!("  {prompt}");
            }
        }
    }
    if driver.is_last() {
        println!("[Enter] start the quiz   [b] back   [q] quit");
    }
}

async fn run_quiz(session: &mut LessonSession<ChatClient>, input: &mut mpsc::Receiver<String>) {
    println!();
    println!("Connecting you to your tutor...");
    session.start().await;
    render_reply(session);

    loop {
        prompt();
        let Some(line) = input.recv().await else { break };
        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case("q") || trimmed.eq_ignore_ascii_case("quit") {
            break;
        }
        if trimmed.is_empty() {
            continue;
        }
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(letter), None) if letter.is_ascii_alphabetic() => {
                if session.pick(letter) {
                    println!("Locked in {}.", letter.to_ascii_uppercase());
                    tokio::time::sleep(PICK_SUBMIT_DELAY).await;
                    session.submit_pick().await;
                    render_feedback(session);
                    render_reply(session);
                } else {
                    println!("That letter isn't on offer right now.");
                }
            }
            _ => {
                if session.send_text(trimmed).await.is_none() {
                    println!("Let's settle the current question first.");
                } else {
                    render_reply(session);
                }
            }
        }
    }
}

fn render_feedback(session: &LessonSession<ChatClient>) {
    let state = session.state();
    match state.feedback {
        Some(Feedback::Correct) => {
            let line = CELEBRATION_LINES
                .choose(&mut rand::thread_rng())
                .copied()
                .unwrap_or(CELEBRATION_LINES[0]);
            println!("{line} +{XP_PER_CORRECT} XP (streak {})", state.streak);
        }
        Some(Feedback::Incorrect) => {
            if let Some(hint) = state.correct_letter_hint {
                println!("No luck this time, it was {hint}). Streak reset.");
            } else {
                println!("No luck this time. Streak reset.");
            }
        }
        None => {}
    }
}

fn render_reply(session: &LessonSession<ChatClient>) {
    let reply = session.latest();
    println!();
    if !reply.body.is_empty() {
        println!("{}", reply.body);
    }
    for option in &reply.options {
        println!("  {option}");
    }
    let state = session.state();
    println!(
        "[xp {} | streak {} | lesson {}%]",
        state.xp,
        state.streak,
        (session.progress() * 100.0).round() as u32
    );
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}
