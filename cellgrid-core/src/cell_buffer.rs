use tracing::{debug, trace};

use crate::{GridSize, error::Error};

/// An RGBA color with 8 bits per channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(C)]
pub struct Rgba {
    /// Red component.
    pub r: u8,
    /// Green component.
    pub g: u8,
    /// Blue component.
    pub b: u8,
    /// Alpha component.
    pub a: u8,
}

impl Rgba {
    /// Creates a color from its components.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color from a packed `0xRRGGBB` value.
    #[must_use]
    pub const fn from_rgb(rgb: u32) -> Self {
        let [_, r, g, b] = rgb.to_be_bytes();
        Self { r, g, b, a: 0xff }
    }

    /// Creates a color from a packed `0xRRGGBBAA` value.
    #[must_use]
    pub const fn from_rgba(rgba: u32) -> Self {
        let [r, g, b, a] = rgba.to_be_bytes();
        Self { r, g, b, a }
    }
}

/// A visible cell as reported by the terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleCell {
    /// Zero-based row, counted from the top.
    pub row: u16,
    /// Zero-based column, counted from the left.
    pub column: u16,
    /// Background color of the cell.
    pub background: Rgba,
}

/// Source of per-cell colors, typically the terminal's screen model.
///
/// `visible_cells` must be restartable: calling it again without changing the
/// underlying state yields the same sequence. Coordinates are expected to lie
/// within the current [`GridSize`].
pub trait TerminalState {
    /// Returns every visible cell in the order they should be uploaded.
    fn visible_cells(&self) -> impl Iterator<Item = VisibleCell> + '_;
}

impl TerminalState for [VisibleCell] {
    fn visible_cells(&self) -> impl Iterator<Item = VisibleCell> + '_ {
        self.iter().copied()
    }
}

impl TerminalState for Vec<VisibleCell> {
    fn visible_cells(&self) -> impl Iterator<Item = VisibleCell> + '_ {
        self.iter().copied()
    }
}

/// Per-instance GPU data for one cell.
///
/// # Memory Layout
/// - Bytes 0-3: grid position as `[column, row]` (`u16` each)
/// - Bytes 4-7: background color as RGBA
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(C, align(4))]
pub struct CellRecord {
    grid_xy: [u16; 2],
    background: Rgba,
}

impl CellRecord {
    /// Creates a record for the cell at `(column, row)`.
    #[must_use]
    pub const fn new(column: u16, row: u16, background: Rgba) -> Self {
        Self { grid_xy: [column, row], background }
    }

    /// Column of the cell.
    #[must_use]
    pub const fn column(&self) -> u16 {
        self.grid_xy[0]
    }

    /// Row of the cell.
    #[must_use]
    pub const fn row(&self) -> u16 {
        self.grid_xy[1]
    }

    /// Background color of the cell.
    #[must_use]
    pub const fn background(&self) -> Rgba {
        self.background
    }
}

impl From<VisibleCell> for CellRecord {
    fn from(cell: VisibleCell) -> Self {
        Self::new(cell.column, cell.row, cell.background)
    }
}

/// The per-cell records uploaded to the GPU each frame.
///
/// Contents are replaced wholesale by [`rebuild`](Self::rebuild), never patched
/// in place.
#[derive(Debug, Default)]
pub struct CellBuffer {
    records: Vec<CellRecord>,
    /// Spare allocation that `rebuild` fills before swapping it in.
    scratch: Vec<CellRecord>,
}

impl CellBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards the current contents and reserves room for `rows * columns`
    /// records.
    ///
    /// The reservation is a capacity hint; a later `rebuild` may supply any
    /// number of cells.
    ///
    /// # Errors
    /// Returns [`Error::OutOfMemory`] if the reservation fails. The buffer is
    /// left empty.
    pub fn resize(&mut self, rows: u16, columns: u16) -> Result<(), Error> {
        let cell_count = rows as usize * columns as usize;

        self.records.clear();
        self.scratch.clear();
        reserve(&mut self.records, cell_count)?;

        debug!(rows, columns, capacity = self.records.capacity(), "resized cell buffer");
        Ok(())
    }

    /// Resizes the buffer for the given grid.
    ///
    /// # Errors
    /// See [`resize`](Self::resize).
    pub fn resize_to(&mut self, grid: GridSize) -> Result<(), Error> {
        self.resize(grid.rows, grid.columns)
    }

    /// Replaces the contents with one record per cell yielded by `source`,
    /// in the order the source yields them.
    ///
    /// # Errors
    /// Returns [`Error::OutOfMemory`] if the records cannot be allocated. The
    /// previous contents are kept in that case.
    pub fn rebuild(&mut self, source: &(impl TerminalState + ?Sized)) -> Result<(), Error> {
        self.scratch.clear();

        let cells = source.visible_cells();
        reserve(&mut self.scratch, cells.size_hint().0)?;
        for cell in cells {
            if self.scratch.len() == self.scratch.capacity() {
                let additional = self.scratch.len().max(1);
                reserve(&mut self.scratch, additional)?;
            }
            self.scratch.push(cell.into());
        }

        std::mem::swap(&mut self.records, &mut self.scratch);
        self.scratch.clear();

        trace!(cells = self.records.len(), "rebuilt cell buffer");
        Ok(())
    }

    /// The current records.
    #[must_use]
    pub fn records(&self) -> &[CellRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records the buffer can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.records.capacity()
    }
}

fn reserve(records: &mut Vec<CellRecord>, additional: usize) -> Result<(), Error> {
    records
        .try_reserve(additional)
        .map_err(|_| Error::out_of_memory(records.len().saturating_add(additional)))
}
