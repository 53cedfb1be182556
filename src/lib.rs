//! Backend and terminal preview for the APEX course: a slide-based mini
//! lesson followed by a multiple-choice quiz held with an LLM tutor.

pub mod ai;
pub mod api;
pub mod config;
pub mod deckgen;
pub mod lesson;
pub mod mail;
pub mod preview;
