#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state for Goblin Hunt.
//!
//! [`SessionController`] is the single owner of the game state. Every
//! interaction arrives as a [`Command`] through [`SessionController::apply`]:
//! pointer input translated by the board surface's listeners, virtual time
//! advancing the spawn timer, and restart confirmations from the dialog. Each
//! observable consequence is appended to the caller's event buffer.
//!
//! Clicks and timer firings never overlap. Each command runs to completion
//! before the next one is applied, and within a single [`Command::Advance`]
//! timers fire one at a time so a reaction to one firing (a loss resetting the
//! session, for instance) is seen by the next.

use std::time::Duration;

use goblin_hunt_core::{
    BoardError, BoardGeometry, CellIndex, Command, Cursor, EndMessage, Event, Outcome,
    SelectionColor, SessionState, Theme,
};
use goblin_hunt_surface::{BoardSurface, CellEventKind, ModalDialog};
use goblin_hunt_system_positions::PositionGenerator;
use goblin_hunt_system_scheduler::{Config as SchedulerConfig, Signal, SpawnScheduler};
use goblin_hunt_system_tally::HitTally;
use thiserror::Error;
use tracing::{debug, info};

/// Parameters fixed when the session is constructed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionConfig {
    timing: SchedulerConfig,
    seed: Option<u64>,
    theme: Theme,
}

impl SessionConfig {
    /// Creates a configuration with explicit timings and entropy-seeded placement.
    #[must_use]
    pub const fn new(timing: SchedulerConfig) -> Self {
        Self {
            timing,
            seed: None,
            theme: Theme::Prairie,
        }
    }

    /// Makes target placement replayable from `seed`.
    #[must_use]
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..self
        }
    }

    /// Draws the board with `theme` instead of the prairie tiles.
    #[must_use]
    pub fn with_theme(self, theme: Theme) -> Self {
        Self { theme, ..self }
    }

    /// Spawn timer and safety timeout durations.
    #[must_use]
    pub const fn timing(&self) -> SchedulerConfig {
        self.timing
    }

    /// Seed for target placement, if fixed.
    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Theme applied when the board is first drawn.
    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme
    }
}

/// Failures surfaced by the session.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The board surface rejected an operation.
    #[error("board surface failed during {operation}")]
    Board {
        /// Operation the session was performing.
        operation: &'static str,
        /// Failure reported by the surface.
        #[source]
        source: BoardError,
    },
    /// A command arrived before [`SessionController::init`].
    #[error("session has not been initialised")]
    NotInitialised,
    /// [`SessionController::init`] was called twice.
    #[error("session is already initialised")]
    AlreadyInitialised,
}

impl SessionError {
    /// Board failure underlying the error, if any.
    #[must_use]
    pub const fn board_error(&self) -> Option<&BoardError> {
        match self {
            Self::Board { source, .. } => Some(source),
            Self::NotInitialised | Self::AlreadyInitialised => None,
        }
    }
}

trait During<T> {
    fn during(self, operation: &'static str) -> Result<T, SessionError>;
}

impl<T> During<T> for Result<T, BoardError> {
    fn during(self, operation: &'static str) -> Result<T, SessionError> {
        self.map_err(|source| SessionError::Board { operation, source })
    }
}

/// Top-level state machine for one player's sessions.
#[derive(Debug)]
pub struct SessionController<B, M> {
    board: B,
    modal: M,
    geometry: BoardGeometry,
    tally: HitTally,
    positions: PositionGenerator,
    scheduler: SpawnScheduler,
    theme: Theme,
    state: SessionState,
    target: Option<CellIndex>,
    highlighted: Option<CellIndex>,
    session: u32,
    initialised: bool,
}

impl<B, M> SessionController<B, M>
where
    B: BoardSurface,
    M: ModalDialog,
{
    /// Creates a controller around the provided collaborators.
    ///
    /// Nothing is drawn and no timer is armed until [`SessionController::init`].
    #[must_use]
    pub fn new(config: SessionConfig, board: B, modal: M) -> Self {
        let geometry = board.geometry();
        Self {
            board,
            modal,
            geometry,
            tally: HitTally::new(),
            positions: PositionGenerator::new(config.seed()),
            scheduler: SpawnScheduler::new(config.timing()),
            theme: config.theme(),
            state: SessionState::Active,
            target: None,
            highlighted: None,
            session: 0,
            initialised: false,
        }
    }

    /// Subscribes to the collaborators, draws the board and starts spawning.
    ///
    /// Fails without side effects on the session when the board cannot be
    /// drawn, for example because it was never bound to a container.
    pub fn init(&mut self, out_events: &mut Vec<Event>) -> Result<(), SessionError> {
        if self.initialised {
            return Err(SessionError::AlreadyInitialised);
        }

        self.board.draw_ui(self.theme).during("draw_ui")?;
        self.subscribe();
        self.modal.set_restart_hook(Box::new(|out: &mut Vec<Command>| {
            out.push(Command::Restart)
        }));

        self.tally = HitTally::new();
        self.state = SessionState::Active;
        self.target = None;
        self.initialised = true;
        self.begin_session(out_events);
        Ok(())
    }

    /// Applies a single command, appending its consequences to `out_events`.
    pub fn apply(
        &mut self,
        command: Command,
        out_events: &mut Vec<Event>,
    ) -> Result<(), SessionError> {
        self.ensure_initialised()?;
        match command {
            Command::EnterCell { cell } => self.on_cell_enter(cell),
            Command::LeaveCell { cell } => self.on_cell_leave(cell),
            Command::ClickCell { cell } => self.on_cell_click(cell, out_events),
            Command::Advance { dt } => self.advance(dt, out_events),
            Command::Restart => self.reset(out_events),
        }
    }

    /// Feeds raw cell input through the board's listeners and applies the result.
    pub fn dispatch(
        &mut self,
        kind: CellEventKind,
        cell: CellIndex,
        out_events: &mut Vec<Event>,
    ) -> Result<(), SessionError> {
        self.ensure_initialised()?;
        let mut commands = Vec::new();
        self.board
            .dispatch(kind, cell, &mut commands)
            .during("dispatch")?;
        self.apply_all(commands, out_events)
    }

    /// Confirms a new game from the end-of-game dialog.
    pub fn confirm_restart(&mut self, out_events: &mut Vec<Event>) -> Result<(), SessionError> {
        self.ensure_initialised()?;
        let mut commands = Vec::new();
        self.modal.confirm_restart(&mut commands);
        self.apply_all(commands, out_events)
    }

    /// Closes the end-of-game dialog without requesting a new game.
    pub fn dismiss_dialog(&mut self) {
        self.modal.dismiss();
    }

    /// Cancels the timers, zeroes the tally, clears the target and starts over.
    pub fn reset(&mut self, out_events: &mut Vec<Event>) -> Result<(), SessionError> {
        self.ensure_initialised()?;
        self.scheduler.stop_all();
        self.tally.reset();
        self.target = None;
        self.state = SessionState::Active;
        self.board.reset_game().during("reset_game")?;
        self.begin_session(out_events);
        Ok(())
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Cell the session believes carries the target.
    #[must_use]
    pub const fn target(&self) -> Option<CellIndex> {
        self.target
    }

    /// Claimed targets since the last reset.
    #[must_use]
    pub const fn hits(&self) -> u32 {
        self.tally.hits()
    }

    /// Misses since the last reset.
    #[must_use]
    pub const fn misses(&self) -> u32 {
        self.tally.misses()
    }

    /// One-based number of the current session segment; zero before `init`.
    #[must_use]
    pub const fn session(&self) -> u32 {
        self.session
    }

    /// Cell currently highlighted under the pointer.
    #[must_use]
    pub const fn highlighted(&self) -> Option<CellIndex> {
        self.highlighted
    }

    /// Virtual time elapsed since construction.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// Board dimensions.
    #[must_use]
    pub const fn geometry(&self) -> BoardGeometry {
        self.geometry
    }

    /// Reports whether [`SessionController::init`] succeeded.
    #[must_use]
    pub const fn is_initialised(&self) -> bool {
        self.initialised
    }

    /// Read-only view of the spawn scheduler.
    #[must_use]
    pub const fn scheduler(&self) -> &SpawnScheduler {
        &self.scheduler
    }

    /// Board surface.
    #[must_use]
    pub const fn board(&self) -> &B {
        &self.board
    }

    /// Mutable board surface, for adapters that render outside the session.
    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    /// End-of-game dialog.
    #[must_use]
    pub const fn modal(&self) -> &M {
        &self.modal
    }

    fn subscribe(&mut self) {
        self.board.add_cell_listener(
            CellEventKind::Enter,
            Box::new(|cell: CellIndex, out: &mut Vec<Command>| {
                out.push(Command::EnterCell { cell })
            }),
        );
        self.board.add_cell_listener(
            CellEventKind::Leave,
            Box::new(|cell: CellIndex, out: &mut Vec<Command>| {
                out.push(Command::LeaveCell { cell })
            }),
        );
        self.board.add_cell_listener(
            CellEventKind::Click,
            Box::new(|cell: CellIndex, out: &mut Vec<Command>| {
                out.push(Command::ClickCell { cell })
            }),
        );
    }

    fn ensure_initialised(&self) -> Result<(), SessionError> {
        if self.initialised {
            Ok(())
        } else {
            Err(SessionError::NotInitialised)
        }
    }

    fn apply_all(
        &mut self,
        commands: Vec<Command>,
        out_events: &mut Vec<Event>,
    ) -> Result<(), SessionError> {
        for command in commands {
            self.apply(command, out_events)?;
        }
        Ok(())
    }

    fn begin_session(&mut self, out_events: &mut Vec<Event>) {
        self.session = self.session.saturating_add(1);
        self.scheduler.restart();
        info!(session = self.session, "session started");
        out_events.push(Event::SessionStarted {
            session: self.session,
        });
    }

    fn on_cell_enter(&mut self, cell: CellIndex) -> Result<(), SessionError> {
        let cell = self.geometry.check(cell).during("cell_enter")?;
        self.board.set_cursor(Cursor::Hammer).during("set_cursor")?;
        if let Some(previous) = self.highlighted.take() {
            self.board.deselect_cell(previous).during("deselect_cell")?;
        }
        self.board
            .select_cell(cell, SelectionColor::Yellow)
            .during("select_cell")?;
        self.highlighted = Some(cell);
        Ok(())
    }

    fn on_cell_leave(&mut self, cell: CellIndex) -> Result<(), SessionError> {
        let cell = self.geometry.check(cell).during("cell_leave")?;
        self.board
            .hide_cell_tooltip(cell)
            .during("hide_cell_tooltip")?;
        self.board.set_cursor(Cursor::Pointer).during("set_cursor")
    }

    fn on_cell_click(
        &mut self,
        cell: CellIndex,
        out_events: &mut Vec<Event>,
    ) -> Result<(), SessionError> {
        let cell = self.geometry.check(cell).during("cell_click")?;
        if self.state != SessionState::Active {
            out_events.push(Event::ClickIgnored { cell });
            return Ok(());
        }

        // The rendered marker decides, not the stored target.
        let claimed = self
            .board
            .is_target_rendered_at(cell)
            .during("is_target_rendered_at")?;

        if !claimed {
            self.tally.increment_miss();
            debug!(cell = cell.get(), misses = self.tally.misses(), "click missed");
            out_events.push(Event::ClickMissed {
                cell,
                misses: self.tally.misses(),
            });
            return self.conclude_if_lost(out_events).map(|_| ());
        }

        self.tally.increment_hit();
        self.target = None;
        debug!(cell = cell.get(), hits = self.tally.hits(), "target claimed");
        out_events.push(Event::TargetClaimed {
            cell,
            hits: self.tally.hits(),
        });

        self.scheduler.restart();
        self.spawn_target(out_events)?;

        if self.tally.has_won() {
            self.conclude(Outcome::Won, out_events)?;
        }
        Ok(())
    }

    fn advance(&mut self, dt: Duration, out_events: &mut Vec<Event>) -> Result<(), SessionError> {
        let horizon = self.scheduler.now().saturating_add(dt);
        while let Some(signal) = self.scheduler.poll(horizon) {
            match signal {
                Signal::Tick => self.on_tick(out_events)?,
                Signal::SafetyTimeout => out_events.push(Event::SafetyTimeoutElapsed),
            }
        }
        self.scheduler.settle(horizon);
        Ok(())
    }

    fn on_tick(&mut self, out_events: &mut Vec<Event>) -> Result<(), SessionError> {
        if self.state != SessionState::Active {
            self.scheduler.stop();
            out_events.push(Event::SpawnTimerHalted);
            return Ok(());
        }

        if let Some(expired) = self.target.take() {
            self.tally.increment_miss();
            debug!(
                cell = expired.get(),
                misses = self.tally.misses(),
                "target expired"
            );
            out_events.push(Event::TargetExpired {
                cell: expired,
                misses: self.tally.misses(),
            });
            if self.conclude_if_lost(out_events)? {
                return Ok(());
            }
        }

        self.spawn_target(out_events)
    }

    fn spawn_target(&mut self, out_events: &mut Vec<Event>) -> Result<(), SessionError> {
        let cell = self.positions.generate(self.geometry);
        self.board
            .redraw_positions(Some(cell))
            .during("redraw_positions")?;
        self.target = Some(cell);
        debug!(cell = cell.get(), "target spawned");
        out_events.push(Event::TargetSpawned { cell });
        Ok(())
    }

    fn conclude_if_lost(&mut self, out_events: &mut Vec<Event>) -> Result<bool, SessionError> {
        if !self.tally.has_lost() {
            return Ok(false);
        }
        self.conclude(Outcome::Lost, out_events)?;
        Ok(true)
    }

    fn conclude(
        &mut self,
        outcome: Outcome,
        out_events: &mut Vec<Event>,
    ) -> Result<(), SessionError> {
        self.state = SessionState::from(outcome);
        let hits = self.tally.hits();
        let misses = self.tally.misses();
        info!(session = self.session, ?outcome, hits, misses, "session concluded");
        out_events.push(Event::SessionEnded {
            outcome,
            hits,
            misses,
        });
        self.modal
            .show_end_message(&EndMessage::for_outcome(outcome, hits));
        self.reset(out_events)
    }
}
