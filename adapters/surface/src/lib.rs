#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Presentation contracts for Goblin Hunt adapters.
//!
//! The session never draws anything itself. It talks to a [`BoardSurface`]
//! for the grid and to a [`ModalDialog`] for the end-of-game message. Input
//! flows the other way: surfaces keep a [`CellListeners`] registry and, when
//! the player interacts with a cell, every listener registered for that kind
//! of interaction translates it into [`Command`] values for the session.

mod headless;

use std::fmt;

use goblin_hunt_core::{
    BoardError, BoardGeometry, CellIndex, Command, Cursor, EndMessage, SelectionColor, Theme,
};

pub use headless::{CellView, HeadlessBoard, HeadlessModal};

/// Kind of pointer interaction a board cell can report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellEventKind {
    /// The pointer moved onto the cell.
    Enter,
    /// The pointer moved off the cell.
    Leave,
    /// The cell was clicked.
    Click,
}

/// Callback invoked with the index of the cell that raised the interaction.
pub type CellListener = Box<dyn FnMut(CellIndex, &mut Vec<Command>)>;

/// Callback invoked when the player confirms a new game from the dialog.
pub type RestartHook = Box<dyn FnMut(&mut Vec<Command>)>;

/// Observer registry keyed by interaction kind.
///
/// Listeners run synchronously in registration order.
#[derive(Default)]
pub struct CellListeners {
    enter: Vec<CellListener>,
    leave: Vec<CellListener>,
    click: Vec<CellListener>,
}

impl CellListeners {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener for the provided interaction kind.
    pub fn add(&mut self, kind: CellEventKind, listener: CellListener) {
        self.slot_mut(kind).push(listener);
    }

    /// Number of listeners registered for the interaction kind.
    #[must_use]
    pub fn len(&self, kind: CellEventKind) -> usize {
        match kind {
            CellEventKind::Enter => self.enter.len(),
            CellEventKind::Leave => self.leave.len(),
            CellEventKind::Click => self.click.len(),
        }
    }

    /// Invokes every listener registered for `kind`, in registration order.
    pub fn notify(&mut self, kind: CellEventKind, cell: CellIndex, out: &mut Vec<Command>) {
        for listener in self.slot_mut(kind).iter_mut() {
            listener(cell, out);
        }
    }

    fn slot_mut(&mut self, kind: CellEventKind) -> &mut Vec<CellListener> {
        match kind {
            CellEventKind::Enter => &mut self.enter,
            CellEventKind::Leave => &mut self.leave,
            CellEventKind::Click => &mut self.click,
        }
    }
}

impl fmt::Debug for CellListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellListeners")
            .field("enter", &self.enter.len())
            .field("leave", &self.leave.len())
            .field("click", &self.click.len())
            .finish()
    }
}

/// Mount point a board surface can be attached to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Container {
    /// Element able to host the cell grid.
    Surface {
        /// Identifier of the element.
        id: String,
    },
    /// Element that only displays text and cannot host interactive cells.
    Label {
        /// Identifier of the element.
        id: String,
    },
}

impl Container {
    /// Convenience constructor for a grid-capable container.
    #[must_use]
    pub fn surface(id: impl Into<String>) -> Self {
        Self::Surface { id: id.into() }
    }
}

/// Grid surface that renders the board and reports cell interactions.
pub trait BoardSurface {
    /// Dimensions of the rendered grid.
    fn geometry(&self) -> BoardGeometry;

    /// Registers a listener for cell interactions of the provided kind.
    fn add_cell_listener(&mut self, kind: CellEventKind, listener: CellListener);

    /// Runs every listener registered for `kind` against `cell`.
    fn dispatch(
        &mut self,
        kind: CellEventKind,
        cell: CellIndex,
        out: &mut Vec<Command>,
    ) -> Result<(), BoardError>;

    /// Builds the tiles and applies the theme.
    fn draw_ui(&mut self, theme: Theme) -> Result<(), BoardError>;

    /// Removes every target marker and places one at `target`, if provided.
    fn redraw_positions(&mut self, target: Option<CellIndex>) -> Result<(), BoardError>;

    /// Highlights the cell, replacing any highlight it already carries.
    fn select_cell(&mut self, cell: CellIndex, color: SelectionColor) -> Result<(), BoardError>;

    /// Removes every highlight from the cell.
    fn deselect_cell(&mut self, cell: CellIndex) -> Result<(), BoardError>;

    /// Clears the tooltip attached to the cell.
    fn hide_cell_tooltip(&mut self, cell: CellIndex) -> Result<(), BoardError>;

    /// Changes the pointer shown over the board.
    fn set_cursor(&mut self, cursor: Cursor) -> Result<(), BoardError>;

    /// Clears every target marker and dismisses any dialog owned by the surface.
    fn reset_game(&mut self) -> Result<(), BoardError>;

    /// Reports whether the cell currently displays the target marker.
    fn is_target_rendered_at(&self, cell: CellIndex) -> Result<bool, BoardError>;
}

/// Dialog that announces the end of a session.
pub trait ModalDialog {
    /// Presents the message until the player dismisses or confirms it.
    fn show_end_message(&mut self, message: &EndMessage);

    /// Registers the callback run when the player confirms a new game.
    fn set_restart_hook(&mut self, hook: RestartHook);

    /// Confirms a new game: hides the dialog and runs the restart hook.
    fn confirm_restart(&mut self, out: &mut Vec<Command>);

    /// Hides the dialog without requesting a new game.
    fn dismiss(&mut self);
}
