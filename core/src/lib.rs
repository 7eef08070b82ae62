#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Goblin Hunt engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative session, and pure systems. Adapters translate raw board
//! input into [`Command`] values, the session executes those commands via its
//! `apply` entry point, and then reports every observable consequence as an
//! [`Event`]. Systems never see adapters directly; they operate on the plain
//! value types declared here.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Goblin Hunt.";

/// Interval between two firings of the spawn timer.
pub const TICK_INTERVAL: Duration = Duration::from_millis(1_000);

/// Delay after which the safety timeout cancels a runaway spawn timer.
pub const SAFETY_TIMEOUT: Duration = Duration::from_millis(500_000);

/// Number of claimed targets that wins a session.
pub const HIT_GOAL: u32 = 10;

/// Number of misses that loses a session.
pub const MISS_LIMIT: u32 = 5;

/// Board edge length used when no configuration overrides it.
pub const DEFAULT_BOARD_SIZE: u32 = 4;

/// Largest board edge length accepted by [`BoardGeometry`].
pub const MAX_BOARD_SIZE: u32 = 1_024;

/// Commands that express every interaction the session accepts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// The pointer entered a board cell.
    EnterCell {
        /// Cell the pointer moved onto.
        cell: CellIndex,
    },
    /// The pointer left a board cell.
    LeaveCell {
        /// Cell the pointer moved away from.
        cell: CellIndex,
    },
    /// The player clicked a board cell.
    ClickCell {
        /// Cell that received the click.
        cell: CellIndex,
    },
    /// Advances the virtual clock, firing every timer that falls due.
    Advance {
        /// Duration of virtual time that elapsed since the previous advance.
        dt: Duration,
    },
    /// Requests a fresh session, as confirmed from the end-of-game dialog.
    Restart,
}

/// Events reported by the session after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// A session segment began with zeroed tallies.
    SessionStarted {
        /// One-based number of the segment since the program started.
        session: u32,
    },
    /// A target was placed on the board.
    TargetSpawned {
        /// Cell that now carries the target.
        cell: CellIndex,
    },
    /// The player clicked the cell carrying the target.
    TargetClaimed {
        /// Cell that was clicked.
        cell: CellIndex,
        /// Hit count after the claim.
        hits: u32,
    },
    /// The player clicked a cell without a target.
    ClickMissed {
        /// Cell that was clicked.
        cell: CellIndex,
        /// Miss count after the failed click.
        misses: u32,
    },
    /// A target stayed unclaimed for a whole tick and aged out.
    TargetExpired {
        /// Cell that carried the expired target.
        cell: CellIndex,
        /// Miss count after the expiry.
        misses: u32,
    },
    /// A click arrived while the session was not accepting input.
    ClickIgnored {
        /// Cell that was clicked.
        cell: CellIndex,
    },
    /// A threshold was reached and the session segment concluded.
    SessionEnded {
        /// Whether the player won or lost.
        outcome: Outcome,
        /// Hit count at the moment the session ended.
        hits: u32,
        /// Miss count at the moment the session ended.
        misses: u32,
    },
    /// A tick observed an inactive session and cancelled the spawn timer.
    SpawnTimerHalted,
    /// The safety timeout fired and cancelled the spawn timer.
    SafetyTimeoutElapsed,
}

/// Zero-based index of a board cell in row-major order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellIndex(u32);

impl CellIndex {
    /// Creates a new cell index with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Converts the index into a slice position.
    #[must_use]
    pub const fn as_usize(&self) -> usize {
        self.0 as usize
    }
}

/// Square board dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardGeometry {
    size: u32,
}

impl BoardGeometry {
    /// Creates a geometry with `size` cells along each edge.
    pub fn new(size: u32) -> Result<Self, BoardError> {
        if size == 0 {
            return Err(BoardError::ZeroSize);
        }
        if size > MAX_BOARD_SIZE {
            return Err(BoardError::TooLarge {
                size,
                max: MAX_BOARD_SIZE,
            });
        }
        Ok(Self { size })
    }

    /// Number of cells along each edge.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Total number of addressable cells, `size²`.
    #[must_use]
    pub const fn cell_count(&self) -> u32 {
        self.size * self.size
    }

    /// Reports whether the cell lies on the board.
    #[must_use]
    pub const fn contains(&self, cell: CellIndex) -> bool {
        cell.get() < self.cell_count()
    }

    /// Validates that the cell lies on the board.
    pub fn check(&self, cell: CellIndex) -> Result<CellIndex, BoardError> {
        if self.contains(cell) {
            Ok(cell)
        } else {
            Err(BoardError::CellOutOfRange {
                cell: cell.get(),
                cell_count: self.cell_count(),
            })
        }
    }

    /// Iterator over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellIndex> {
        (0..self.cell_count()).map(CellIndex::new)
    }

    /// Zero-based row containing the cell.
    #[must_use]
    pub const fn row(&self, cell: CellIndex) -> u32 {
        cell.get() / self.size
    }

    /// Zero-based column containing the cell.
    #[must_use]
    pub const fn column(&self, cell: CellIndex) -> u32 {
        cell.get() % self.size
    }

    /// Classifies the cell by its position relative to the board edges.
    ///
    /// A single-cell board has no edges and yields [`TileKind::Center`].
    pub fn tile_kind(&self, cell: CellIndex) -> Result<TileKind, BoardError> {
        let cell = self.check(cell)?;
        if self.size == 1 {
            return Ok(TileKind::Center);
        }

        let last = self.size - 1;
        let row = self.row(cell);
        let column = self.column(cell);
        let kind = match (row, column) {
            (0, 0) => TileKind::TopLeft,
            (0, c) if c == last => TileKind::TopRight,
            (0, _) => TileKind::Top,
            (r, 0) if r == last => TileKind::BottomLeft,
            (r, c) if r == last && c == last => TileKind::BottomRight,
            (r, _) if r == last => TileKind::Bottom,
            (_, 0) => TileKind::Left,
            (_, c) if c == last => TileKind::Right,
            _ => TileKind::Center,
        };
        Ok(kind)
    }
}

/// Position of a tile relative to the board edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Upper-left corner.
    TopLeft,
    /// Upper edge between the corners.
    Top,
    /// Upper-right corner.
    TopRight,
    /// Left edge between the corners.
    Left,
    /// Interior tile.
    Center,
    /// Right edge between the corners.
    Right,
    /// Lower-left corner.
    BottomLeft,
    /// Lower edge between the corners.
    Bottom,
    /// Lower-right corner.
    BottomRight,
}

/// Visual theme applied to the whole board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Grassland tiles; the theme every session opens with.
    #[default]
    Prairie,
    /// Sand tiles.
    Desert,
    /// Snow tiles.
    Arctic,
    /// Rock tiles.
    Mountain,
}

impl Theme {
    /// Every theme, in menu order.
    pub const ALL: [Self; 4] = [Self::Prairie, Self::Desert, Self::Arctic, Self::Mountain];

    /// Looks a theme up by its identifier.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|theme| theme.as_str().eq_ignore_ascii_case(name))
    }

    /// Stable theme identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Prairie => "prairie",
            Self::Desert => "desert",
            Self::Arctic => "arctic",
            Self::Mountain => "mountain",
        }
    }
}

/// Pointer appearance requested from the board surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cursor {
    /// Platform default pointer.
    #[default]
    Auto,
    /// Hand pointer shown outside the cells.
    Pointer,
    /// Hammer shown while hovering a cell.
    Hammer,
}

/// Highlight colour applied to a selected cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectionColor {
    /// Hover highlight.
    #[default]
    Yellow,
}

/// Icon displayed next to the end-of-game message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndIcon {
    /// Party popper shown after a win.
    Celebration,
    /// Shrugging figure shown after a loss.
    Shrug,
}

impl EndIcon {
    /// Unicode code point of the icon.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::Celebration => 127_881,
            Self::Shrug => 129_335,
        }
    }

    /// Character rendering of the icon.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Celebration => '\u{1F389}',
            Self::Shrug => '\u{1F937}',
        }
    }
}

/// Result of a concluded session segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The hit goal was reached first.
    Won,
    /// The miss limit was reached first.
    Lost,
}

/// Lifecycle state of the session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// Accepting clicks and spawning targets.
    #[default]
    Active,
    /// The hit goal was reached.
    Won,
    /// The miss limit was reached.
    Lost,
}

impl From<Outcome> for SessionState {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Won => Self::Won,
            Outcome::Lost => Self::Lost,
        }
    }
}

/// Text and icon presented by the modal dialog when a session ends.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EndMessage {
    text: String,
    icon: EndIcon,
}

impl EndMessage {
    /// Creates a message from explicit parts.
    #[must_use]
    pub fn new(text: impl Into<String>, icon: EndIcon) -> Self {
        Self {
            text: text.into(),
            icon,
        }
    }

    /// Builds the canonical message for a concluded session.
    #[must_use]
    pub fn for_outcome(outcome: Outcome, hits: u32) -> Self {
        match outcome {
            Outcome::Won => Self::new(
                format!("You win! Your points are {hits}"),
                EndIcon::Celebration,
            ),
            Outcome::Lost => Self::new("You lose!", EndIcon::Shrug),
        }
    }

    /// Message body.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Icon shown next to the body.
    #[must_use]
    pub const fn icon(&self) -> EndIcon {
        self.icon
    }
}

/// Failures raised when a board surface is misused.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Error)]
pub enum BoardError {
    /// The surface was used before it was attached to a container.
    #[error("board surface is not bound to a container")]
    Unbound,
    /// The surface was attached to something that cannot host a board.
    #[error("container '{container}' cannot host a board surface")]
    InvalidContainer {
        /// Identifier of the rejected container.
        container: String,
    },
    /// A cell index fell outside the board.
    #[error("cell {cell} is outside the board ({cell_count} cells)")]
    CellOutOfRange {
        /// Offending index.
        cell: u32,
        /// Number of cells on the board.
        cell_count: u32,
    },
    /// The surface is bound but its tiles have not been drawn yet.
    #[error("board surface has not been drawn")]
    NotDrawn,
    /// A board must have at least one cell along each edge.
    #[error("board size must be positive")]
    ZeroSize,
    /// The requested board exceeds the supported edge length.
    #[error("board size {size} exceeds the maximum of {max}")]
    TooLarge {
        /// Requested edge length.
        size: u32,
        /// Largest accepted edge length.
        max: u32,
    },
}
