//! Simulated player used to smoke-test the timing engine.

use std::time::Duration;

use anyhow::{bail, Result};
use goblin_hunt_core::{BoardGeometry, CellIndex, Command, Event, Outcome};
use goblin_hunt_surface::CellEventKind;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::runner::Game;

const MAX_ROUNDS: u32 = 100_000;

/// Player that waits a fixed reaction time and then clicks, sometimes wrongly.
#[derive(Debug)]
pub(crate) struct Autoplayer {
    rng: ChaCha8Rng,
    accuracy: f64,
    reaction: Duration,
}

impl Autoplayer {
    /// `accuracy` is the probability, in `[0, 1]`, that a click lands on the target.
    pub(crate) fn new(seed: Option<u64>, accuracy: f64, reaction: Duration) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed.rotate_left(17)),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            rng,
            accuracy,
            reaction,
        }
    }

    /// Plays until the current session concludes and returns its outcome.
    pub(crate) fn play(&mut self, game: &mut Game, out_events: &mut Vec<Event>) -> Result<Outcome> {
        for _ in 0..MAX_ROUNDS {
            let first = out_events.len();
            game.apply(
                Command::Advance {
                    dt: self.reaction,
                },
                out_events,
            )?;
            if let Some(target) = game.board().rendered_target() {
                let cell = self.aim(game.geometry(), target);
                game.dispatch(CellEventKind::Click, cell, out_events)?;
            }

            let concluded = out_events[first..].iter().find_map(|event| match event {
                Event::SessionEnded { outcome, .. } => Some(*outcome),
                _ => None,
            });
            if let Some(outcome) = concluded {
                return Ok(outcome);
            }
        }
        bail!("no session concluded within {MAX_ROUNDS} rounds")
    }

    fn aim(&mut self, geometry: BoardGeometry, target: CellIndex) -> CellIndex {
        let cells = geometry.cell_count();
        if cells <= 1 || self.rng.gen_bool(self.accuracy) {
            return target;
        }
        let offset = self.rng.gen_range(1..cells);
        CellIndex::new((target.get() + offset) % cells)
    }
}

/// Parses an accuracy flag, accepting values in `[0, 1]`.
pub(crate) fn parse_accuracy(value: &str) -> Result<f64, String> {
    let accuracy: f64 = value
        .parse()
        .map_err(|_| format!("`{value}` is not a number"))?;
    if (0.0..=1.0).contains(&accuracy) {
        Ok(accuracy)
    } else {
        Err(format!("accuracy must lie between 0 and 1, got {accuracy}"))
    }
}
