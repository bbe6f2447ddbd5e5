mod backend;
mod buffer;
mod grid_renderer;
mod program;
#[cfg(test)]
pub(crate) mod recording;

pub use backend::GlBackend;
// Crate-internal re-exports
use buffer::*;
pub use grid_renderer::{GridConfig, GridRenderer};
pub(crate) use program::*;
