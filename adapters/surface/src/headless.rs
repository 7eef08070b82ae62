//! In-memory surfaces that keep rendered state inspectable.

use goblin_hunt_core::{
    BoardError, BoardGeometry, CellIndex, Command, Cursor, EndMessage, SelectionColor, Theme,
    TileKind,
};

use crate::{
    BoardSurface, CellEventKind, CellListener, CellListeners, Container, ModalDialog, RestartHook,
};

/// Rendered state of a single tile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellView {
    tile: TileKind,
    target: bool,
    selection: Option<SelectionColor>,
    tooltip: Option<String>,
}

impl CellView {
    fn new(tile: TileKind) -> Self {
        Self {
            tile,
            target: false,
            selection: None,
            tooltip: None,
        }
    }

    /// Edge classification used to pick the tile artwork.
    #[must_use]
    pub const fn tile(&self) -> TileKind {
        self.tile
    }

    /// Whether the tile displays the target marker.
    #[must_use]
    pub const fn has_target(&self) -> bool {
        self.target
    }

    /// Highlight currently applied to the tile.
    #[must_use]
    pub const fn selection(&self) -> Option<SelectionColor> {
        self.selection
    }

    /// Tooltip text attached to the tile.
    #[must_use]
    pub fn tooltip(&self) -> Option<&str> {
        self.tooltip.as_deref()
    }
}

/// Board surface that renders into memory.
///
/// Used by the terminal adapter and by tests that need to inspect exactly
/// what the session asked the surface to show.
#[derive(Debug)]
pub struct HeadlessBoard {
    geometry: BoardGeometry,
    container: Option<Container>,
    theme: Option<Theme>,
    cursor: Cursor,
    cells: Vec<CellView>,
    listeners: CellListeners,
}

impl HeadlessBoard {
    /// Creates an unbound board with the provided dimensions.
    #[must_use]
    pub fn new(geometry: BoardGeometry) -> Self {
        Self {
            geometry,
            container: None,
            theme: None,
            cursor: Cursor::Auto,
            cells: Vec::new(),
            listeners: CellListeners::new(),
        }
    }

    /// Attaches the board to a container. Only grid-capable containers qualify.
    pub fn bind(&mut self, container: Container) -> Result<(), BoardError> {
        match container {
            Container::Surface { .. } => {
                self.container = Some(container);
                Ok(())
            }
            Container::Label { id } => Err(BoardError::InvalidContainer { container: id }),
        }
    }

    /// Container the board is attached to.
    #[must_use]
    pub fn container(&self) -> Option<&Container> {
        self.container.as_ref()
    }

    /// Theme applied by the last [`BoardSurface::draw_ui`] call.
    #[must_use]
    pub const fn theme(&self) -> Option<Theme> {
        self.theme
    }

    /// Pointer currently requested for the board.
    #[must_use]
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Every rendered tile in row-major order. Empty until drawn.
    #[must_use]
    pub fn cells(&self) -> &[CellView] {
        &self.cells
    }

    /// Rendered state of a single tile.
    ///
    /// Fails with [`BoardError::NotDrawn`] until [`BoardSurface::draw_ui`] has run.
    pub fn cell(&self, cell: CellIndex) -> Result<&CellView, BoardError> {
        self.check_binding()?;
        let cell = self.geometry.check(cell)?;
        self.cells.get(cell.as_usize()).ok_or(BoardError::NotDrawn)
    }

    /// First tile displaying the target marker.
    #[must_use]
    pub fn rendered_target(&self) -> Option<CellIndex> {
        self.cells
            .iter()
            .position(CellView::has_target)
            .and_then(|position| u32::try_from(position).ok())
            .map(CellIndex::new)
    }

    /// Tiles that currently carry a highlight.
    #[must_use]
    pub fn selected_cells(&self) -> Vec<CellIndex> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, view)| view.selection.is_some())
            .filter_map(|(position, _)| u32::try_from(position).ok())
            .map(CellIndex::new)
            .collect()
    }

    /// Attaches tooltip text to the tile.
    pub fn show_cell_tooltip(
        &mut self,
        cell: CellIndex,
        text: impl Into<String>,
    ) -> Result<(), BoardError> {
        self.cell_mut(cell)?.tooltip = Some(text.into());
        Ok(())
    }

    /// Number of listeners registered for the interaction kind.
    #[must_use]
    pub fn listener_count(&self, kind: CellEventKind) -> usize {
        self.listeners.len(kind)
    }

    fn check_binding(&self) -> Result<(), BoardError> {
        if self.container.is_none() {
            return Err(BoardError::Unbound);
        }
        Ok(())
    }

    fn cell_mut(&mut self, cell: CellIndex) -> Result<&mut CellView, BoardError> {
        self.check_binding()?;
        let cell = self.geometry.check(cell)?;
        self.cells
            .get_mut(cell.as_usize())
            .ok_or(BoardError::NotDrawn)
    }

    fn clear_targets(&mut self) {
        for view in &mut self.cells {
            view.target = false;
        }
    }
}

impl BoardSurface for HeadlessBoard {
    fn geometry(&self) -> BoardGeometry {
        self.geometry
    }

    fn add_cell_listener(&mut self, kind: CellEventKind, listener: CellListener) {
        self.listeners.add(kind, listener);
    }

    fn dispatch(
        &mut self,
        kind: CellEventKind,
        cell: CellIndex,
        out: &mut Vec<Command>,
    ) -> Result<(), BoardError> {
        let cell = self.geometry.check(cell)?;
        self.listeners.notify(kind, cell, out);
        Ok(())
    }

    fn draw_ui(&mut self, theme: Theme) -> Result<(), BoardError> {
        self.check_binding()?;
        let geometry = self.geometry;
        self.cells = geometry
            .cells()
            .map(|cell| geometry.tile_kind(cell).map(CellView::new))
            .collect::<Result<_, _>>()?;
        self.theme = Some(theme);
        Ok(())
    }

    fn redraw_positions(&mut self, target: Option<CellIndex>) -> Result<(), BoardError> {
        self.check_binding()?;
        if let Some(cell) = target {
            let _ = self.geometry.check(cell)?;
        }
        self.clear_targets();
        if let Some(cell) = target {
            self.cell_mut(cell)?.target = true;
        }
        Ok(())
    }

    fn select_cell(&mut self, cell: CellIndex, color: SelectionColor) -> Result<(), BoardError> {
        self.cell_mut(cell)?.selection = Some(color);
        Ok(())
    }

    fn deselect_cell(&mut self, cell: CellIndex) -> Result<(), BoardError> {
        self.cell_mut(cell)?.selection = None;
        Ok(())
    }

    fn hide_cell_tooltip(&mut self, cell: CellIndex) -> Result<(), BoardError> {
        self.cell_mut(cell)?.tooltip = None;
        Ok(())
    }

    fn set_cursor(&mut self, cursor: Cursor) -> Result<(), BoardError> {
        self.check_binding()?;
        self.cursor = cursor;
        Ok(())
    }

    fn reset_game(&mut self) -> Result<(), BoardError> {
        self.check_binding()?;
        self.clear_targets();
        Ok(())
    }

    fn is_target_rendered_at(&self, cell: CellIndex) -> Result<bool, BoardError> {
        self.cell(cell).map(CellView::has_target)
    }
}

/// Dialog that records every message it was asked to show.
#[derive(Default)]
pub struct HeadlessModal {
    shown: Vec<EndMessage>,
    visible: bool,
    restart_hook: Option<RestartHook>,
}

impl HeadlessModal {
    /// Creates a hidden dialog with no restart hook.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every message shown so far, oldest first.
    #[must_use]
    pub fn shown(&self) -> &[EndMessage] {
        &self.shown
    }

    /// Message currently on screen.
    #[must_use]
    pub fn visible(&self) -> Option<&EndMessage> {
        if self.visible {
            self.shown.last()
        } else {
            None
        }
    }

    /// Reports whether a restart hook is registered.
    #[must_use]
    pub const fn has_restart_hook(&self) -> bool {
        self.restart_hook.is_some()
    }
}

impl std::fmt::Debug for HeadlessModal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadlessModal")
            .field("shown", &self.shown)
            .field("visible", &self.visible)
            .field("restart_hook", &self.restart_hook.is_some())
            .finish()
    }
}

impl ModalDialog for HeadlessModal {
    fn show_end_message(&mut self, message: &EndMessage) {
        self.shown.push(message.clone());
        self.visible = true;
    }

    fn set_restart_hook(&mut self, hook: RestartHook) {
        self.restart_hook = Some(hook);
    }

    fn confirm_restart(&mut self, out: &mut Vec<Command>) {
        self.visible = false;
        if let Some(hook) = self.restart_hook.as_mut() {
            hook(out);
        }
    }

    fn dismiss(&mut self) {
        self.visible = false;
    }
}
