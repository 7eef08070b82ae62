//! Drives a session from parsed steps, interactively or from a script file.

use std::{
    fs,
    io::{BufRead, Write},
    path::Path,
};

use anyhow::{Context, Result};
use goblin_hunt_core::{Command, Event, Outcome, WELCOME_BANNER};
use goblin_hunt_session::SessionController;
use goblin_hunt_surface::{CellEventKind, Container, HeadlessBoard, HeadlessModal};
use tracing::warn;

use crate::{
    config::GameConfig,
    script::{self, ClickAim, Step},
    terminal,
};

/// Session wired to in-memory surfaces.
pub(crate) type Game = SessionController<HeadlessBoard, HeadlessModal>;

const CONTAINER_ID: &str = "game-container";

/// Whether the caller should keep feeding steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Quit,
}

/// Builds, binds and initialises a session for the configuration.
pub(crate) fn start(config: &GameConfig, out_events: &mut Vec<Event>) -> Result<Game> {
    let mut board = HeadlessBoard::new(config.geometry());
    board
        .bind(Container::surface(CONTAINER_ID))
        .context("failed to bind board surface")?;
    let mut game = SessionController::new(config.session(), board, HeadlessModal::new());
    game.init(out_events).context("failed to initialise session")?;
    Ok(game)
}

/// Applies one step to the session.
pub(crate) fn execute(game: &mut Game, step: Step, out_events: &mut Vec<Event>) -> Result<Flow> {
    match step {
        Step::Enter(cell) => game.dispatch(CellEventKind::Enter, cell, out_events)?,
        Step::Leave(cell) => game.dispatch(CellEventKind::Leave, cell, out_events)?,
        Step::Click(aim) => {
            let cell = match aim {
                ClickAim::Cell(cell) => Some(cell),
                ClickAim::Target => game.board().rendered_target(),
            };
            match cell {
                Some(cell) => game.dispatch(CellEventKind::Click, cell, out_events)?,
                None => warn!("no target on the board; click skipped"),
            }
        }
        Step::Wait(dt) => game.apply(Command::Advance { dt }, out_events)?,
        Step::Restart => game.apply(Command::Restart, out_events)?,
        Step::Confirm => game.confirm_restart(out_events)?,
        Step::Close => game.dismiss_dialog(),
        Step::Show => {}
        Step::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

/// Reads steps line by line from `input` until it ends or `quit` arrives.
///
/// Malformed lines and rejected cells are reported and skipped.
pub(crate) fn play(config: &GameConfig, input: impl BufRead, mut output: impl Write) -> Result<()> {
    writeln!(output, "{WELCOME_BANNER}")?;
    let mut events = Vec::new();
    let mut game = start(config, &mut events)?;
    report(&game, &events, &mut output)?;

    for (index, line) in input.lines().enumerate() {
        let line = line.context("failed to read input")?;
        let step = match script::parse_line(index + 1, &line) {
            Ok(Some(step)) => step,
            Ok(None) => continue,
            Err(error) => {
                writeln!(output, "{error}")?;
                continue;
            }
        };

        events.clear();
        match execute(&mut game, step, &mut events) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => report(&game, &events, &mut output)?,
            Err(error) => writeln!(output, "error: {error:#}")?,
        }
    }
    Ok(())
}

/// Runs a script file to completion.
///
/// Prints the final board and session results, or the whole event
/// transcript as JSON lines when `emit_events` is set.
pub(crate) fn replay(
    config: &GameConfig,
    path: &Path,
    emit_events: bool,
    mut output: impl Write,
) -> Result<()> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read script at {}", path.display()))?;
    let steps = script::parse_script(&text)
        .with_context(|| format!("invalid script at {}", path.display()))?;

    let mut transcript = Vec::new();
    let mut game = start(config, &mut transcript)?;
    for (index, step) in steps.into_iter().enumerate() {
        let flow = execute(&mut game, step, &mut transcript)
            .with_context(|| format!("script step {} failed", index + 1))?;
        if flow == Flow::Quit {
            break;
        }
    }

    if emit_events {
        for event in &transcript {
            let line = serde_json::to_string(event).context("failed to encode event")?;
            writeln!(output, "{line}")?;
        }
    } else {
        write!(output, "{}", terminal::render(&game))?;
        let (wins, losses) = results(&transcript);
        writeln!(output, "wins {wins} | losses {losses}")?;
    }
    Ok(())
}

/// Prints event descriptions, the dialog when a session just ended, and the board.
pub(crate) fn report(game: &Game, events: &[Event], output: &mut impl Write) -> Result<()> {
    for event in events {
        writeln!(output, "{}", terminal::describe(event))?;
    }
    let concluded = events
        .iter()
        .any(|event| matches!(event, Event::SessionEnded { .. }));
    if concluded {
        if let Some(message) = game.modal().visible() {
            writeln!(output, "{}", terminal::render_message(message))?;
        }
    }
    write!(output, "{}", terminal::render(game))?;
    Ok(())
}

fn results(events: &[Event]) -> (usize, usize) {
    events.iter().fold((0, 0), |(wins, losses), event| match event {
        Event::SessionEnded {
            outcome: Outcome::Won,
            ..
        } => (wins + 1, losses),
        Event::SessionEnded {
            outcome: Outcome::Lost,
            ..
        } => (wins, losses + 1),
        _ => (wins, losses),
    })
}
