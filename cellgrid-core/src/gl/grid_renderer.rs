use std::fmt::{self, Debug};

use tracing::{debug, info, trace};

use crate::{
    CellBuffer, CellRecord, CellSize, CellSizeCalculator, GlslVersion, GlyphMetricsSource,
    GridSize, ScreenSize, TerminalState, compute_grid_size,
    error::Error,
    gl::{
        BufferBinding, GlBackend, ShaderProgram, VertexArrayScope, buffer_upload_array,
        create_buffer,
    },
    mat4::Mat4,
};

/// Number of indices in the unit quad.
const QUAD_INDEX_COUNT: i32 = 6;

/// Corners of the unit quad, in cell units.
#[rustfmt::skip]
const QUAD_VERTICES: [f32; 8] = [
    //x    y
    1.0, 0.0, // top-right
    1.0, 1.0, // bottom-right
    0.0, 1.0, // bottom-left
    0.0, 0.0, // top-left
];

/// Two triangles covering the unit quad.
const QUAD_INDICES: [u8; QUAD_INDEX_COUNT as usize] = [0, 1, 3, 1, 2, 3];

/// Settings for creating a [`GridRenderer`].
#[derive(Debug, Clone, Copy)]
pub struct GridConfig {
    /// GLSL dialect the shaders are compiled for.
    pub glsl_version: GlslVersion,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { glsl_version: GlslVersion::Gl330 }
    }
}

/// Renders terminal cell backgrounds with a single instanced draw call.
///
/// Every cell is one instance of a shared unit quad. The per-instance data is
/// the cell's grid position and background color, taken from the
/// [`CellBuffer`] owned by the renderer. The vertex shader scales the quad by
/// the cell size and maps it to clip space with an orthographic projection.
///
/// A renderer exists only in the ready state: [`initialize`](Self::initialize)
/// creates it, and [`destroy`](Self::destroy) consumes it after releasing all
/// GPU resources.
#[must_use = "call `destroy(gl)` before dropping to avoid GPU resource leaks"]
pub struct GridRenderer<G: GlBackend> {
    /// GPU resources (shader, buffers, uniform locations)
    gpu: GpuResources<G>,
    /// Per-instance cell data
    cells: CellBuffer,
    /// Cell dimensions derived from the active font
    cell_size: CellSize,
    /// Size of the rendering surface in pixels
    screen_size: ScreenSize,
    /// Number of whole cells fitting on the screen
    grid_size: GridSize,
}

/// GL objects owned by the renderer for its entire lifetime.
struct GpuResources<G: GlBackend> {
    /// Shader program for rendering the cells.
    shader: ShaderProgram<G>,
    /// Unit quad geometry and the per-instance buffer.
    buffers: QuadBuffers<G>,
    /// Uniform locations in `shader`.
    uniforms: CellUniforms<G>,
}

impl<G: GlBackend> GpuResources<G> {
    const FRAGMENT_GLSL: &'static str = include_str!("../shaders/cell.frag");
    const VERTEX_GLSL: &'static str = include_str!("../shaders/cell.vert");

    /// Creates the shader program, quad buffers and vertex layout.
    ///
    /// If any step fails, the objects created by the earlier steps are deleted.
    fn new(gl: &G, glsl_version: GlslVersion) -> Result<Self, Error> {
        let vertex_source = format!("{}{}", glsl_version.vertex_preamble(), Self::VERTEX_GLSL);
        let fragment_source = format!(
            "{}{}",
            glsl_version.fragment_preamble(),
            Self::FRAGMENT_GLSL
        );
        let shader = ShaderProgram::create(gl, &vertex_source, &fragment_source)?;

        let buffers = match QuadBuffers::create(gl) {
            Ok(buffers) => buffers,
            Err(e) => {
                shader.delete(gl);
                return Err(e);
            },
        };

        let uniforms = match CellUniforms::locate(gl, &shader) {
            Ok(uniforms) => uniforms,
            Err(e) => {
                buffers.delete(gl);
                shader.delete(gl);
                return Err(e);
            },
        };

        Ok(Self { shader, buffers, uniforms })
    }

    fn delete(self, gl: &G) {
        self.buffers.delete(gl);
        self.shader.delete(gl);
    }
}

struct CellUniforms<G: GlBackend> {
    cell_size: G::UniformLocation,
    projection: G::UniformLocation,
}

impl<G: GlBackend> CellUniforms<G> {
    fn locate(gl: &G, shader: &ShaderProgram<G>) -> Result<Self, Error> {
        Ok(Self {
            cell_size: shader.uniform_location(gl, "cell_size")?,
            projection: shader.uniform_location(gl, "projection")?,
        })
    }
}

struct QuadBuffers<G: GlBackend> {
    vao: G::VertexArray,
    vertices: G::Buffer,
    indices: G::Buffer,
    instances: G::Buffer,
}

impl<G: GlBackend> QuadBuffers<G> {
    /// Creates the vertex array with the constant unit quad and an empty
    /// per-instance buffer.
    fn create(gl: &G) -> Result<Self, Error> {
        let mut pending = PendingObjects::new(gl);
        let vao = pending.vertex_array()?;
        let buffers = Self {
            vao,
            vertices: pending.buffer("vertex")?,
            indices: pending.buffer("index")?,
            instances: pending.buffer("instance")?,
        };
        pending.disarm();

        buffers.configure_layout(gl);
        Ok(buffers)
    }

    fn configure_layout(&self, gl: &G) {
        let _vao = VertexArrayScope::new(gl, self.vao);

        let vertices = BufferBinding::new(gl, glow::ARRAY_BUFFER, self.vertices);
        vertices.upload(&QUAD_VERTICES, glow::STATIC_DRAW);
        const VERTEX_STRIDE: i32 = 2 * 4; // 2 floats per vertex
        enable_vertex_attrib_f32(gl, attrib::POS, 2, glow::FLOAT, false, 0, VERTEX_STRIDE);
        drop(vertices);

        // the element buffer binding is part of the vertex array state, so it
        // stays bound for as long as the vertex array lives
        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(self.indices));
        buffer_upload_array(gl, glow::ELEMENT_ARRAY_BUFFER, &QUAD_INDICES, glow::STATIC_DRAW);

        let instances = BufferBinding::new(gl, glow::ARRAY_BUFFER, self.instances);
        instances.upload::<CellRecord>(&[], glow::DYNAMIC_DRAW);
        let stride = size_of::<CellRecord>() as i32;
        enable_vertex_attrib_i32(gl, attrib::GRID_XY, 2, glow::UNSIGNED_SHORT, 0, stride);
        gl.vertex_attrib_divisor(attrib::GRID_XY, 1);
        enable_vertex_attrib_f32(gl, attrib::BG_COLOR, 4, glow::UNSIGNED_BYTE, true, 4, stride);
        gl.vertex_attrib_divisor(attrib::BG_COLOR, 1);
    }

    /// Replaces the contents of the instance buffer.
    fn upload_instances(&self, gl: &G, records: &[CellRecord]) {
        let instances = BufferBinding::new(gl, glow::ARRAY_BUFFER, self.instances);
        instances.upload(records, glow::DYNAMIC_DRAW);
    }

    fn delete(self, gl: &G) {
        gl.delete_vertex_array(self.vao);
        gl.delete_buffer(self.vertices);
        gl.delete_buffer(self.indices);
        gl.delete_buffer(self.instances);
    }
}

/// Deletes the GL objects created so far when dropped, unless disarmed.
struct PendingObjects<'gl, G: GlBackend> {
    gl: &'gl G,
    vao: Option<G::VertexArray>,
    buffers: Vec<G::Buffer>,
}

impl<'gl, G: GlBackend> PendingObjects<'gl, G> {
    fn new(gl: &'gl G) -> Self {
        Self { gl, vao: None, buffers: Vec::with_capacity(3) }
    }

    fn vertex_array(&mut self) -> Result<G::VertexArray, Error> {
        let vao = self
            .gl
            .create_vertex_array()
            .map_err(|e| Error::vertex_array_creation_failed(&e))?;
        self.vao = Some(vao);
        Ok(vao)
    }

    fn buffer(&mut self, buffer_type: &str) -> Result<G::Buffer, Error> {
        let buffer = create_buffer(self.gl, buffer_type)?;
        self.buffers.push(buffer);
        Ok(buffer)
    }

    fn disarm(mut self) {
        self.vao = None;
        self.buffers.clear();
    }
}

impl<G: GlBackend> Drop for PendingObjects<'_, G> {
    fn drop(&mut self) {
        for buffer in self.buffers.drain(..) {
            self.gl.delete_buffer(buffer);
        }
        if let Some(vao) = self.vao.take() {
            self.gl.delete_vertex_array(vao);
        }
    }
}

impl<G: GlBackend> GridRenderer<G> {
    /// Creates a renderer for the font behind `font`.
    ///
    /// Derives the cell size from the font (warming its glyph cache), compiles
    /// the shader program, uploads the unit quad, configures the per-instance
    /// vertex layout and binds the cell size uniform. The screen size starts
    /// out empty; call [`set_screen_size`](Self::set_screen_size) before
    /// rendering.
    ///
    /// # Errors
    /// Returns [`Error::GlyphMissing`] if the font cannot size the cells,
    /// [`Error::Shader`] if the shaders fail to compile or link, and
    /// [`Error::Resource`] if GL objects cannot be created. No GL objects are
    /// left behind on failure.
    pub fn initialize(
        gl: &G,
        font: &mut impl GlyphMetricsSource,
        config: &GridConfig,
    ) -> Result<Self, Error> {
        let cell_size = CellSizeCalculator::new().calculate(font)?;
        let gpu = GpuResources::new(gl, config.glsl_version)?;

        let renderer = Self {
            gpu,
            cells: CellBuffer::new(),
            cell_size,
            screen_size: ScreenSize::default(),
            grid_size: GridSize::default(),
        };
        renderer.upload_cell_size(gl);

        info!(
            cell_width = cell_size.width,
            cell_height = cell_size.height,
            glsl = ?config.glsl_version,
            "grid renderer ready"
        );
        Ok(renderer)
    }

    /// Releases all GPU resources owned by this renderer.
    pub fn destroy(self, gl: &G) {
        self.gpu.delete(gl);
        debug!("grid renderer destroyed");
    }

    /// Updates the projection and grid size for a new surface size.
    ///
    /// When the grid dimensions change, the cell buffer is cleared and must be
    /// rebuilt before the next [`render`](Self::render).
    ///
    /// # Errors
    /// Returns [`Error::OutOfMemory`] if the cell buffer cannot reserve room
    /// for the new grid.
    pub fn set_screen_size(&mut self, gl: &G, screen: ScreenSize) -> Result<(), Error> {
        self.screen_size = screen;
        self.upload_projection(gl);
        self.update_grid_size()
    }

    /// Switches to a new font, recomputing the cell size and grid size.
    ///
    /// The current state is kept if the new font cannot size the cells.
    ///
    /// # Errors
    /// Returns the cell size calculation error, or [`Error::OutOfMemory`] if the
    /// cell buffer cannot be resized for the new grid.
    pub fn replace_font(
        &mut self,
        gl: &G,
        font: &mut impl GlyphMetricsSource,
    ) -> Result<(), Error> {
        self.cell_size = CellSizeCalculator::new().calculate(font)?;
        self.upload_cell_size(gl);
        self.update_grid_size()
    }

    /// Rebuilds the cell buffer from the terminal state.
    ///
    /// # Errors
    /// Returns [`Error::OutOfMemory`] if the buffer cannot grow; the previous
    /// contents are kept.
    pub fn rebuild_cells(&mut self, state: &(impl TerminalState + ?Sized)) -> Result<(), Error> {
        self.cells.rebuild(state)
    }

    /// Uploads the cell buffer and draws every cell in one instanced call.
    ///
    /// Does nothing when the cell buffer is empty.
    ///
    /// # Errors
    /// Returns [`Error::Resource`] if the number of cells exceeds what a single
    /// draw call can address.
    pub fn render(&self, gl: &G) -> Result<(), Error> {
        if self.cells.is_empty() {
            trace!("no cells to render");
            return Ok(());
        }

        let instance_count = i32::try_from(self.cells.len())
            .map_err(|_| Error::instance_count_overflow(self.cells.len()))?;

        let _program = self.gpu.shader.activate(gl);
        let _vao = VertexArrayScope::new(gl, self.gpu.buffers.vao);

        self.gpu
            .buffers
            .upload_instances(gl, self.cells.records());
        gl.draw_elements_instanced(
            glow::TRIANGLES,
            QUAD_INDEX_COUNT,
            glow::UNSIGNED_BYTE,
            0,
            instance_count,
        );

        trace!(instances = instance_count, "rendered cell grid");
        Ok(())
    }

    /// Returns the cell dimensions in pixels.
    pub fn cell_size(&self) -> CellSize {
        self.cell_size
    }

    /// Returns the size of the rendering surface in pixels.
    pub fn screen_size(&self) -> ScreenSize {
        self.screen_size
    }

    /// Returns the size of the grid in cells.
    pub fn grid_size(&self) -> GridSize {
        self.grid_size
    }

    /// Returns the cell buffer drawn by [`render`](Self::render).
    pub fn cells(&self) -> &CellBuffer {
        &self.cells
    }

    fn update_grid_size(&mut self) -> Result<(), Error> {
        let grid_size = compute_grid_size(self.screen_size, self.cell_size);
        if grid_size == self.grid_size {
            return Ok(()); // no change in grid size
        }

        debug!(
            rows = grid_size.rows,
            columns = grid_size.columns,
            screen_width = self.screen_size.width,
            screen_height = self.screen_size.height,
            "grid size changed"
        );
        self.grid_size = grid_size;
        self.cells.resize_to(grid_size)
    }

    fn upload_cell_size(&self, gl: &G) {
        let _program = self.gpu.shader.activate(gl);
        gl.uniform_2_f32(
            &self.gpu.uniforms.cell_size,
            self.cell_size.width,
            self.cell_size.height,
        );
    }

    fn upload_projection(&self, gl: &G) {
        // a zero-sized surface would produce a degenerate matrix
        let width = self.screen_size.width.max(1) as f32;
        let height = self.screen_size.height.max(1) as f32;
        let projection = Mat4::orthographic_from_size(width, height);

        let _program = self.gpu.shader.activate(gl);
        gl.uniform_matrix_4_f32(&self.gpu.uniforms.projection, &projection.data);
    }
}

impl<G: GlBackend> Debug for GridRenderer<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridRenderer")
            .field("shader", &self.gpu.shader)
            .field("vao", &self.gpu.buffers.vao)
            .field("cells", &self.cells.len())
            .field("cell_size", &self.cell_size)
            .field("screen_size", &self.screen_size)
            .field("grid_size", &self.grid_size)
            .finish()
    }
}

fn enable_vertex_attrib_f32<G: GlBackend>(
    gl: &G,
    index: u32,
    size: i32,
    type_: u32,
    normalized: bool,
    offset: i32,
    stride: i32,
) {
    gl.enable_vertex_attrib_array(index);
    gl.vertex_attrib_pointer_f32(index, size, type_, normalized, stride, offset);
}

fn enable_vertex_attrib_i32<G: GlBackend>(
    gl: &G,
    index: u32,
    size: i32,
    type_: u32,
    offset: i32,
    stride: i32,
) {
    gl.enable_vertex_attrib_array(index);
    gl.vertex_attrib_pointer_i32(index, size, type_, stride, offset);
}

mod attrib {
    pub const POS: u32 = 0;

    pub const GRID_XY: u32 = 1;
    pub const BG_COLOR: u32 = 2;
}
