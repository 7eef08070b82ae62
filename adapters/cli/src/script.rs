//! Line grammar shared by interactive play and scripted replays.
//!
//! ```text
//! # comment
//! wait 1000        advance the virtual clock by 1000 ms
//! click 5          click cell 5
//! click target     click wherever the marker is rendered
//! enter 5 / leave 5
//! restart | confirm | close | show | quit
//! ```

use std::time::Duration;

use goblin_hunt_core::CellIndex;
use thiserror::Error;

/// Longest single `wait`, one hour of virtual time.
pub(crate) const MAX_WAIT_MS: u64 = 3_600_000;

/// What a click step aims at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ClickAim {
    /// A fixed cell.
    Cell(CellIndex),
    /// The cell currently showing the target marker.
    Target,
}

/// One parsed instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    Enter(CellIndex),
    Leave(CellIndex),
    Click(ClickAim),
    Wait(Duration),
    Restart,
    Confirm,
    Close,
    Show,
    Quit,
}

/// Rejected script lines.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub(crate) enum ScriptError {
    #[error("line {line}: unknown command `{command}`")]
    UnknownCommand { line: usize, command: String },
    #[error("line {line}: `{command}` expects an argument")]
    MissingArgument { line: usize, command: &'static str },
    #[error("line {line}: `{value}` is not a valid number")]
    InvalidNumber { line: usize, value: String },
    #[error("line {line}: wait of {millis}ms exceeds the {max}ms maximum")]
    WaitTooLong { line: usize, millis: u64, max: u64 },
    #[error("line {line}: unexpected trailing input `{rest}`")]
    TrailingInput { line: usize, rest: String },
}

/// Parses a single line. Blank lines and `#` comments yield `None`.
pub(crate) fn parse_line(line: usize, text: &str) -> Result<Option<Step>, ScriptError> {
    let text = text.split('#').next().unwrap_or_default().trim();
    let mut words = text.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };
    let argument = words.next();
    let rest: Vec<&str> = words.collect();

    let step = match command.to_ascii_lowercase().as_str() {
        "enter" => Step::Enter(cell_argument(line, "enter", argument)?),
        "leave" => Step::Leave(cell_argument(line, "leave", argument)?),
        "click" => match argument {
            Some(word) if word.eq_ignore_ascii_case("target") => Step::Click(ClickAim::Target),
            _ => Step::Click(ClickAim::Cell(cell_argument(line, "click", argument)?)),
        },
        "wait" => Step::Wait(wait_argument(line, argument)?),
        "restart" => bare(line, Step::Restart, argument)?,
        "confirm" => bare(line, Step::Confirm, argument)?,
        "close" => bare(line, Step::Close, argument)?,
        "show" => bare(line, Step::Show, argument)?,
        "quit" | "exit" => bare(line, Step::Quit, argument)?,
        _ => {
            return Err(ScriptError::UnknownCommand {
                line,
                command: command.to_owned(),
            })
        }
    };

    if !rest.is_empty() {
        return Err(ScriptError::TrailingInput {
            line,
            rest: rest.join(" "),
        });
    }
    Ok(Some(step))
}

/// Parses a whole script, numbering lines from one.
pub(crate) fn parse_script(text: &str) -> Result<Vec<Step>, ScriptError> {
    let mut steps = Vec::new();
    for (index, line) in text.lines().enumerate() {
        if let Some(step) = parse_line(index + 1, line)? {
            steps.push(step);
        }
    }
    Ok(steps)
}

fn bare(line: usize, step: Step, argument: Option<&str>) -> Result<Step, ScriptError> {
    match argument {
        Some(word) => Err(ScriptError::TrailingInput {
            line,
            rest: word.to_owned(),
        }),
        None => Ok(step),
    }
}

fn wait_argument(line: usize, argument: Option<&str>) -> Result<Duration, ScriptError> {
    let millis = number(line, "wait", argument)?;
    if millis > MAX_WAIT_MS {
        return Err(ScriptError::WaitTooLong {
            line,
            millis,
            max: MAX_WAIT_MS,
        });
    }
    Ok(Duration::from_millis(millis))
}

fn cell_argument(
    line: usize,
    command: &'static str,
    argument: Option<&str>,
) -> Result<CellIndex, ScriptError> {
    let value = number(line, command, argument)?;
    u32::try_from(value)
        .map(CellIndex::new)
        .map_err(|_| ScriptError::InvalidNumber {
            line,
            value: value.to_string(),
        })
}

fn number(line: usize, command: &'static str, argument: Option<&str>) -> Result<u64, ScriptError> {
    let word = argument.ok_or(ScriptError::MissingArgument { line, command })?;
    word.parse().map_err(|_| ScriptError::InvalidNumber {
        line,
        value: word.to_owned(),
    })
}
