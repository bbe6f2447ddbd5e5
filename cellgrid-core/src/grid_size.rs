use crate::CellSize;

/// Size of the rendering surface in physical pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ScreenSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ScreenSize {
    /// Creates a new screen size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Number of whole cells fitting on the screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GridSize {
    /// Number of cell rows.
    pub rows: u16,
    /// Number of cell columns.
    pub columns: u16,
}

impl GridSize {
    /// Total number of cells in the grid.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.columns as usize
    }

    /// Returns true if the grid holds no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cell_count() == 0
    }
}

/// Maps a screen size to the number of whole cells it can hold.
///
/// Both axes use truncating division: a partial trailing row or column is
/// dropped, never rendered. Counts saturate at `u16::MAX`, the largest
/// coordinate a cell record can address.
///
/// The cell size must be positive on both axes.
#[must_use]
pub fn compute_grid_size(screen: ScreenSize, cell: CellSize) -> GridSize {
    debug_assert!(
        cell.width > 0.0 && cell.height > 0.0,
        "cell size must be positive: {cell:?}"
    );

    // f64 keeps the quotient exact for any u32 screen dimension
    let columns = (f64::from(screen.width) / f64::from(cell.width)).floor();
    let rows = (f64::from(screen.height) / f64::from(cell.height)).floor();

    GridSize {
        rows: rows as u16,
        columns: columns as u16,
    }
}
