/// Error categories for the cell grid renderer.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The font could not be read or parsed.
    #[error("Font load error: {0}")]
    FontLoad(String),

    /// A glyph required for sizing cells is not available in the font.
    #[error("Glyph missing: {0:?}")]
    GlyphMissing(char),

    /// Shader compilation, linking, or program creation errors.
    #[error("Shader error: {0}")]
    Shader(String),

    /// GL resource creation or management errors.
    #[error("Resource error: {0}")]
    Resource(String),

    /// Cell buffer growth failed; the previous contents are left untouched.
    #[error("Out of memory: failed to reserve {requested} cell records")]
    OutOfMemory {
        /// Number of records the failed reservation asked for.
        requested: usize,
    },
}

impl Error {
    // Font errors
    /// Creates a [`Error::FontLoad`] with the given detail.
    pub fn font_load_failed(detail: impl std::fmt::Display) -> Self {
        Self::FontLoad(detail.to_string())
    }

    // Shader errors
    pub(crate) fn shader_creation_failed(detail: &str) -> Self {
        Self::Shader(format!("Shader creation failed: {detail}"))
    }

    pub(crate) fn shader_compile_failed(stage: &str, log: &str) -> Self {
        Self::Shader(format!("{stage} shader compilation failed: {log}"))
    }

    pub(crate) fn shader_program_creation_failed(detail: &str) -> Self {
        Self::Shader(format!("Shader program creation failed: {detail}"))
    }

    pub(crate) fn shader_link_failed(log: &str) -> Self {
        Self::Shader(format!("Shader linking failed: {log}"))
    }

    // Resource errors
    pub(crate) fn buffer_creation_failed(buffer_type: &str, detail: &str) -> Self {
        Self::Resource(format!("Failed to create {buffer_type} buffer: {detail}"))
    }

    pub(crate) fn vertex_array_creation_failed(detail: &str) -> Self {
        Self::Resource(format!("Failed to create vertex array object: {detail}"))
    }

    pub(crate) fn uniform_location_failed(name: &str) -> Self {
        Self::Resource(format!("Failed to get uniform location: {name}"))
    }

    pub(crate) fn instance_count_overflow(count: usize) -> Self {
        Self::Resource(format!("Too many cell instances for a single draw call: {count}"))
    }

    pub(crate) fn out_of_memory(requested: usize) -> Self {
        Self::OutOfMemory { requested }
    }
}
