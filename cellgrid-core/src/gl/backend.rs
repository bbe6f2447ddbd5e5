use std::fmt::Debug;

use glow::HasContext;

/// The GL entry points used by the grid renderer.
///
/// Mirrors the subset of [`glow::HasContext`] the renderer needs, with safe
/// signatures. Implemented for [`glow::Context`]; any other implementation must
/// uphold the same GL semantics.
pub trait GlBackend {
    /// Shader program handle.
    type Program: Copy + Debug + PartialEq;
    /// Shader object handle.
    type Shader: Copy + Debug;
    /// Buffer object handle.
    type Buffer: Copy + Debug + PartialEq;
    /// Vertex array object handle.
    type VertexArray: Copy + Debug + PartialEq;
    /// Uniform location handle.
    type UniformLocation: Debug;

    // programs and shaders
    /// Creates an empty program object.
    fn create_program(&self) -> Result<Self::Program, String>;
    /// Creates a shader object of the given stage (`VERTEX_SHADER`, ...).
    fn create_shader(&self, shader_type: u32) -> Result<Self::Shader, String>;
    /// Replaces the source code of `shader`.
    fn shader_source(&self, shader: Self::Shader, source: &str);
    /// Compiles the source attached to `shader`.
    fn compile_shader(&self, shader: Self::Shader);
    /// Returns true if the last compilation succeeded.
    fn shader_compile_status(&self, shader: Self::Shader) -> bool;
    /// Compiler output for `shader`.
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    /// Attaches `shader` to `program`.
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    /// Detaches `shader` from `program`.
    fn detach_shader(&self, program: Self::Program, shader: Self::Shader);
    /// Links the attached shaders into `program`.
    fn link_program(&self, program: Self::Program);
    /// Returns true if the last link succeeded.
    fn program_link_status(&self, program: Self::Program) -> bool;
    /// Linker output for `program`.
    fn program_info_log(&self, program: Self::Program) -> String;
    /// Deletes a shader object.
    fn delete_shader(&self, shader: Self::Shader);
    /// Deletes a program object.
    fn delete_program(&self, program: Self::Program);
    /// Makes `program` current; `None` unbinds.
    fn use_program(&self, program: Option<Self::Program>);

    // vertex arrays and buffers
    /// Creates a vertex array object.
    fn create_vertex_array(&self) -> Result<Self::VertexArray, String>;
    /// Binds `vao`; `None` unbinds.
    fn bind_vertex_array(&self, vao: Option<Self::VertexArray>);
    /// Deletes a vertex array object.
    fn delete_vertex_array(&self, vao: Self::VertexArray);
    /// Creates a buffer object.
    fn create_buffer(&self) -> Result<Self::Buffer, String>;
    /// Binds `buffer` to `target`; `None` unbinds.
    fn bind_buffer(&self, target: u32, buffer: Option<Self::Buffer>);
    /// Replaces the data store of the buffer bound to `target`.
    fn buffer_data_u8_slice(&self, target: u32, data: &[u8], usage: u32);
    /// Deletes a buffer object.
    fn delete_buffer(&self, buffer: Self::Buffer);

    // vertex layout
    /// Enables the attribute at `index` for the bound vertex array.
    fn enable_vertex_attrib_array(&self, index: u32);
    /// Describes a float attribute, converting integer data if `data_type` is integral.
    fn vertex_attrib_pointer_f32(
        &self,
        index: u32,
        size: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    );
    /// Describes an integer attribute read without conversion.
    fn vertex_attrib_pointer_i32(
        &self,
        index: u32,
        size: i32,
        data_type: u32,
        stride: i32,
        offset: i32,
    );
    /// Sets how many instances pass before the attribute advances.
    fn vertex_attrib_divisor(&self, index: u32, divisor: u32);

    // uniforms
    /// Looks up a uniform by name; `None` if the program lacks it.
    fn uniform_location(&self, program: Self::Program, name: &str)
    -> Option<Self::UniformLocation>;
    /// Sets a `vec2` uniform on the current program.
    fn uniform_2_f32(&self, location: &Self::UniformLocation, x: f32, y: f32);
    /// Sets a column-major `mat4` uniform on the current program.
    fn uniform_matrix_4_f32(&self, location: &Self::UniformLocation, data: &[f32; 16]);

    // drawing
    /// Draws `instance_count` instances of the bound element range.
    fn draw_elements_instanced(
        &self,
        mode: u32,
        count: i32,
        element_type: u32,
        offset: i32,
        instance_count: i32,
    );
}

impl GlBackend for glow::Context {
    type Program = glow::Program;
    type Shader = glow::Shader;
    type Buffer = glow::Buffer;
    type VertexArray = glow::VertexArray;
    type UniformLocation = glow::UniformLocation;

    fn create_program(&self) -> Result<Self::Program, String> {
        unsafe { HasContext::create_program(self) }
    }

    fn create_shader(&self, shader_type: u32) -> Result<Self::Shader, String> {
        unsafe { HasContext::create_shader(self, shader_type) }
    }

    fn shader_source(&self, shader: Self::Shader, source: &str) {
        unsafe { HasContext::shader_source(self, shader, source) };
    }

    fn compile_shader(&self, shader: Self::Shader) {
        unsafe { HasContext::compile_shader(self, shader) };
    }

    fn shader_compile_status(&self, shader: Self::Shader) -> bool {
        unsafe { self.get_shader_compile_status(shader) }
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        unsafe { self.get_shader_info_log(shader) }
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { HasContext::attach_shader(self, program, shader) };
    }

    fn detach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { HasContext::detach_shader(self, program, shader) };
    }

    fn link_program(&self, program: Self::Program) {
        unsafe { HasContext::link_program(self, program) };
    }

    fn program_link_status(&self, program: Self::Program) -> bool {
        unsafe { self.get_program_link_status(program) }
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        unsafe { self.get_program_info_log(program) }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe { HasContext::delete_shader(self, shader) };
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { HasContext::delete_program(self, program) };
    }

    fn use_program(&self, program: Option<Self::Program>) {
        unsafe { HasContext::use_program(self, program) };
    }

    fn create_vertex_array(&self) -> Result<Self::VertexArray, String> {
        unsafe { HasContext::create_vertex_array(self) }
    }

    fn bind_vertex_array(&self, vao: Option<Self::VertexArray>) {
        unsafe { HasContext::bind_vertex_array(self, vao) };
    }

    fn delete_vertex_array(&self, vao: Self::VertexArray) {
        unsafe { HasContext::delete_vertex_array(self, vao) };
    }

    fn create_buffer(&self) -> Result<Self::Buffer, String> {
        unsafe { HasContext::create_buffer(self) }
    }

    fn bind_buffer(&self, target: u32, buffer: Option<Self::Buffer>) {
        unsafe { HasContext::bind_buffer(self, target, buffer) };
    }

    fn buffer_data_u8_slice(&self, target: u32, data: &[u8], usage: u32) {
        unsafe { HasContext::buffer_data_u8_slice(self, target, data, usage) };
    }

    fn delete_buffer(&self, buffer: Self::Buffer) {
        unsafe { HasContext::delete_buffer(self, buffer) };
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { HasContext::enable_vertex_attrib_array(self, index) };
    }

    fn vertex_attrib_pointer_f32(
        &self,
        index: u32,
        size: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        unsafe {
            HasContext::vertex_attrib_pointer_f32(
                self, index, size, data_type, normalized, stride, offset,
            );
        }
    }

    fn vertex_attrib_pointer_i32(
        &self,
        index: u32,
        size: i32,
        data_type: u32,
        stride: i32,
        offset: i32,
    ) {
        unsafe {
            HasContext::vertex_attrib_pointer_i32(self, index, size, data_type, stride, offset);
        }
    }

    fn vertex_attrib_divisor(&self, index: u32, divisor: u32) {
        unsafe { HasContext::vertex_attrib_divisor(self, index, divisor) };
    }

    fn uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        unsafe { self.get_uniform_location(program, name) }
    }

    fn uniform_2_f32(&self, location: &Self::UniformLocation, x: f32, y: f32) {
        unsafe { HasContext::uniform_2_f32(self, Some(location), x, y) };
    }

    fn uniform_matrix_4_f32(&self, location: &Self::UniformLocation, data: &[f32; 16]) {
        unsafe { self.uniform_matrix_4_f32_slice(Some(location), false, data) };
    }

    fn draw_elements_instanced(
        &self,
        mode: u32,
        count: i32,
        element_type: u32,
        offset: i32,
        instance_count: i32,
    ) {
        unsafe {
            HasContext::draw_elements_instanced(
                self,
                mode,
                count,
                element_type,
                offset,
                instance_count,
            );
        }
    }
}
