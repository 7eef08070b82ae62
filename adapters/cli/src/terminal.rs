//! Plain-text rendering of the board, the tally and session events.

use std::fmt::Write as _;

use goblin_hunt_core::{EndMessage, Event, Outcome, Theme, HIT_GOAL, MISS_LIMIT};
use goblin_hunt_surface::{BoardSurface, HeadlessBoard};

use crate::runner::Game;

const TARGET_GLYPH: char = 'G';
const SELECTED_GLYPH: char = '+';
const EMPTY_GLYPH: char = '.';

/// Draws the board as a grid of glyphs followed by a status line.
pub(crate) fn render(game: &Game) -> String {
    let mut text = render_board(game.board());
    let _ = writeln!(
        text,
        "session {} | hits {}/{HIT_GOAL} | misses {}/{MISS_LIMIT} | t={}ms | {}",
        game.session(),
        game.hits(),
        game.misses(),
        game.now().as_millis(),
        game.board().theme().map_or("undrawn", Theme::as_str),
    );
    text
}

fn render_board(board: &HeadlessBoard) -> String {
    let size = usize::try_from(board.geometry().size()).unwrap_or(1).max(1);
    let mut text = String::new();
    for row in board.cells().chunks(size) {
        let line: Vec<String> = row
            .iter()
            .map(|view| {
                let glyph = if view.has_target() {
                    TARGET_GLYPH
                } else if view.selection().is_some() {
                    SELECTED_GLYPH
                } else {
                    EMPTY_GLYPH
                };
                glyph.to_string()
            })
            .collect();
        text.push_str(&line.join(" "));
        text.push('\n');
    }
    text
}

/// Formats the dialog contents.
pub(crate) fn render_message(message: &EndMessage) -> String {
    format!("{} {}", message.icon().glyph(), message.text())
}

/// One-line human description of an event.
pub(crate) fn describe(event: &Event) -> String {
    match event {
        Event::SessionStarted { session } => format!("session {session} started"),
        Event::TargetSpawned { cell } => format!("a goblin appears at cell {}", cell.get()),
        Event::TargetClaimed { cell, hits } => {
            format!("got it at cell {} ({hits}/{HIT_GOAL})", cell.get())
        }
        Event::ClickMissed { cell, misses } => {
            format!("nothing at cell {} ({misses}/{MISS_LIMIT} misses)", cell.get())
        }
        Event::TargetExpired { cell, misses } => format!(
            "the goblin at cell {} slipped away ({misses}/{MISS_LIMIT} misses)",
            cell.get()
        ),
        Event::ClickIgnored { cell } => format!("click on cell {} ignored", cell.get()),
        Event::SessionEnded {
            outcome,
            hits,
            misses,
        } => {
            let verdict = match outcome {
                Outcome::Won => "won",
                Outcome::Lost => "lost",
            };
            format!("session {verdict} with {hits} hits and {misses} misses")
        }
        Event::SpawnTimerHalted => "spawning halted".to_owned(),
        Event::SafetyTimeoutElapsed => "safety timeout elapsed; spawning paused".to_owned(),
    }
}
