//! Instanced OpenGL rendering of terminal cell backgrounds.
//!
//! The pipeline runs leaf-first: [`CellSizeCalculator`] derives a monospace
//! [`CellSize`] from font metrics, [`compute_grid_size`] fits a [`GridSize`]
//! into the screen, a [`CellBuffer`] collects one [`CellRecord`] per visible
//! cell, and [`GridRenderer`] draws all of them with a single instanced call.

mod cell_buffer;
mod cell_size;
pub mod error;
pub mod gl;
mod grid_size;
mod mat4;

pub use cell_buffer::{CellBuffer, CellRecord, Rgba, TerminalState, VisibleCell};
pub use cell_size::{
    CellSize, CellSizeCalculator, GlyphMetrics, GlyphMetricsSource, PRINTABLE_ASCII,
};
pub use error::Error;
pub use gl::{GlBackend, GridConfig, GridRenderer};
pub use grid_size::{GridSize, ScreenSize, compute_grid_size};

/// GL shader language target for version injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlslVersion {
    /// WebGL2 / OpenGL ES 3.0: `#version 300 es`
    Es300,
    /// OpenGL 3.3 Core: `#version 330 core`
    Gl330,
}

impl GlslVersion {
    /// Preamble prepended to the vertex shader source.
    #[must_use]
    pub fn vertex_preamble(&self) -> &'static str {
        match self {
            Self::Es300 => "#version 300 es\nprecision highp float;\n",
            Self::Gl330 => "#version 330 core\n",
        }
    }

    /// Preamble prepended to the fragment shader source.
    #[must_use]
    pub fn fragment_preamble(&self) -> &'static str {
        match self {
            Self::Es300 => "#version 300 es\nprecision mediump float;\n",
            Self::Gl330 => "#version 330 core\n",
        }
    }
}
