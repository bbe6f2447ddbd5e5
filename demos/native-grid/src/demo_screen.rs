use cellgrid_core::{GridSize, Rgba, TerminalState, VisibleCell};

// dracula
const BG: Rgba = Rgba::from_rgb(0x28_2a_36);
const BG_ALT: Rgba = Rgba::from_rgb(0x2c_2e_3a);
const TITLE_BG: Rgba = Rgba::from_rgb(0x44_47_5a);
const BORDER: Rgba = Rgba::from_rgb(0x62_72_a4);

const PALETTE: [Rgba; 8] = [
    Rgba::from_rgb(0xff_55_55),
    Rgba::from_rgb(0xff_b8_6c),
    Rgba::from_rgb(0xf1_fa_8c),
    Rgba::from_rgb(0x50_fa_7b),
    Rgba::from_rgb(0x8b_e9_fd),
    Rgba::from_rgb(0xbd_93_f9),
    Rgba::from_rgb(0xff_79_c6),
    Rgba::from_rgb(0xf8_f8_f2),
];

/// Width of each palette swatch, in cells.
const SWATCH_WIDTH: u16 = 8;

/// Screen model filling the whole grid with a title bar, a palette strip, a
/// gradient bar, and a bordered checkerboard.
#[derive(Debug, Clone, Copy)]
pub struct DemoScreen {
    grid: GridSize,
}

impl DemoScreen {
    pub fn new(grid: GridSize) -> Self {
        Self { grid }
    }

    fn background(&self, row: u16, column: u16) -> Rgba {
        let last_row = self.grid.rows.saturating_sub(1);
        match row {
            0 => TITLE_BG,
            2 => palette_swatch(column),
            4 => gradient(column, self.grid.columns),
            1 | 3 | 5 => BG,
            r if r == last_row || column == 0 => BORDER,
            _ if (row ^ column) & 1 == 0 => BG,
            _ => BG_ALT,
        }
    }
}

impl TerminalState for DemoScreen {
    fn visible_cells(&self) -> impl Iterator<Item = VisibleCell> + '_ {
        (0..self.grid.rows).flat_map(move |row| {
            (0..self.grid.columns).map(move |column| VisibleCell {
                row,
                column,
                background: self.background(row, column),
            })
        })
    }
}

fn palette_swatch(column: u16) -> Rgba {
    PALETTE
        .get(usize::from(column / SWATCH_WIDTH))
        .copied()
        .unwrap_or(BG)
}

fn gradient(column: u16, columns: u16) -> Rgba {
    let t = f32::from(column) / f32::from(columns.max(1));
    Rgba::new((t * 255.0) as u8, ((1.0 - t) * 200.0) as u8, 180, 0xff)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covers_every_cell_once_in_row_major_order() {
        let grid = GridSize { rows: 12, columns: 40 };
        let cells: Vec<_> = DemoScreen::new(grid).visible_cells().collect();

        assert_eq!(cells.len(), grid.cell_count());
        assert_eq!((cells[0].row, cells[0].column), (0, 0));
        assert_eq!((cells[41].row, cells[41].column), (1, 1));
        assert_eq!(cells.last().map(|c| (c.row, c.column)), Some((11, 39)));
    }

    #[test]
    fn palette_strip_falls_back_to_background() {
        assert_eq!(palette_swatch(0), PALETTE[0]);
        assert_eq!(palette_swatch(SWATCH_WIDTH * 7 + 1), PALETTE[7]);
        assert_eq!(palette_swatch(SWATCH_WIDTH * 8), BG);
    }

    #[test]
    fn empty_grid_has_no_cells() {
        let screen = DemoScreen::new(GridSize::default());
        assert_eq!(screen.visible_cells().count(), 0);
    }
}
