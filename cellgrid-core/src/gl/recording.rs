//! A [`GlBackend`] that records calls instead of talking to a driver.

use std::cell::{Cell, RefCell};

use crate::gl::GlBackend;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum GlCall {
    CreateProgram(u32),
    CreateShader(u32),
    CompileShader(u32),
    LinkProgram(u32),
    DeleteShader(u32),
    DeleteProgram(u32),
    UseProgram(Option<u32>),
    CreateVertexArray(u32),
    BindVertexArray(Option<u32>),
    DeleteVertexArray(u32),
    CreateBuffer(u32),
    BindBuffer(u32, Option<u32>),
    BufferData { target: u32, len: usize, usage: u32 },
    DeleteBuffer(u32),
    EnableAttrib(u32),
    AttribPointerF32 { index: u32, size: i32, data_type: u32, normalized: bool },
    AttribPointerI32 { index: u32, size: i32, data_type: u32 },
    AttribDivisor { index: u32, divisor: u32 },
    Uniform2f { location: u32, x: f32, y: f32 },
    UniformMat4 { location: u32, data: [f32; 16] },
    DrawElementsInstanced { mode: u32, count: i32, element_type: u32, instances: i32 },
}

/// Records every GL call and tracks which objects are still alive.
#[derive(Debug, Default)]
pub(crate) struct RecordingGl {
    calls: RefCell<Vec<GlCall>>,
    next_id: Cell<u32>,
    live: RefCell<Vec<u32>>,
    /// Fails buffer creation once this many buffers exist.
    buffer_limit: Option<u32>,
    /// Fails compilation of shaders whose source contains this marker.
    reject_shader_containing: Option<&'static str>,
    /// Uniform names the linked program does not expose.
    missing_uniforms: Vec<&'static str>,
    sources: RefCell<Vec<(u32, String)>>,
    buffers_created: Cell<u32>,
    bound_program: Cell<Option<u32>>,
    bound_vao: Cell<Option<u32>>,
    uniforms: RefCell<Vec<String>>,
}

impl RecordingGl {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_buffer_limit(mut self, limit: u32) -> Self {
        self.buffer_limit = Some(limit);
        self
    }

    pub(crate) fn rejecting_shader(mut self, marker: &'static str) -> Self {
        self.reject_shader_containing = Some(marker);
        self
    }

    pub(crate) fn without_uniform(mut self, name: &'static str) -> Self {
        self.missing_uniforms.push(name);
        self
    }

    pub(crate) fn calls(&self) -> Vec<GlCall> {
        self.calls.borrow().clone()
    }

    pub(crate) fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub(crate) fn live_objects(&self) -> usize {
        self.live.borrow().len()
    }

    pub(crate) fn bound_program(&self) -> Option<u32> {
        self.bound_program.get()
    }

    pub(crate) fn bound_vao(&self) -> Option<u32> {
        self.bound_vao.get()
    }

    pub(crate) fn draw_calls(&self) -> Vec<GlCall> {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, GlCall::DrawElementsInstanced { .. }))
            .cloned()
            .collect()
    }

    /// Every shader source handed to the backend, in submission order.
    pub(crate) fn shader_sources(&self) -> Vec<String> {
        self.sources
            .borrow()
            .iter()
            .map(|(_, source)| source.clone())
            .collect()
    }

    /// Name of the uniform behind a location handed out by this backend.
    pub(crate) fn uniform_name(&self, location: u32) -> String {
        self.uniforms.borrow()[location as usize].clone()
    }

    fn record(&self, call: GlCall) {
        self.calls.borrow_mut().push(call);
    }

    fn alloc(&self) -> u32 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.live.borrow_mut().push(id);
        id
    }

    fn release(&self, id: u32) {
        let mut live = self.live.borrow_mut();
        let idx = live
            .iter()
            .position(|&live_id| live_id == id)
            .unwrap_or_else(|| panic!("object {id} deleted twice or never created"));
        live.remove(idx);
    }
}

impl GlBackend for RecordingGl {
    type Program = u32;
    type Shader = u32;
    type Buffer = u32;
    type VertexArray = u32;
    type UniformLocation = u32;

    fn create_program(&self) -> Result<u32, String> {
        let id = self.alloc();
        self.record(GlCall::CreateProgram(id));
        Ok(id)
    }

    fn create_shader(&self, _shader_type: u32) -> Result<u32, String> {
        let id = self.alloc();
        self.record(GlCall::CreateShader(id));
        Ok(id)
    }

    fn shader_source(&self, shader: u32, source: &str) {
        self.sources
            .borrow_mut()
            .push((shader, source.to_string()));
    }

    fn compile_shader(&self, shader: u32) {
        self.record(GlCall::CompileShader(shader));
    }

    fn shader_compile_status(&self, shader: u32) -> bool {
        let Some(marker) = self.reject_shader_containing else {
            return true;
        };

        !self
            .sources
            .borrow()
            .iter()
            .any(|(id, source)| *id == shader && source.contains(marker))
    }

    fn shader_info_log(&self, shader: u32) -> String {
        format!("0:1({shader}): error: rejected by test")
    }

    fn attach_shader(&self, _program: u32, _shader: u32) {}

    fn detach_shader(&self, _program: u32, _shader: u32) {}

    fn link_program(&self, program: u32) {
        self.record(GlCall::LinkProgram(program));
    }

    fn program_link_status(&self, _program: u32) -> bool {
        true
    }

    fn program_info_log(&self, _program: u32) -> String {
        String::new()
    }

    fn delete_shader(&self, shader: u32) {
        self.release(shader);
        self.record(GlCall::DeleteShader(shader));
    }

    fn delete_program(&self, program: u32) {
        self.release(program);
        self.record(GlCall::DeleteProgram(program));
    }

    fn use_program(&self, program: Option<u32>) {
        self.bound_program.set(program);
        self.record(GlCall::UseProgram(program));
    }

    fn create_vertex_array(&self) -> Result<u32, String> {
        let id = self.alloc();
        self.record(GlCall::CreateVertexArray(id));
        Ok(id)
    }

    fn bind_vertex_array(&self, vao: Option<u32>) {
        self.bound_vao.set(vao);
        self.record(GlCall::BindVertexArray(vao));
    }

    fn delete_vertex_array(&self, vao: u32) {
        self.release(vao);
        self.record(GlCall::DeleteVertexArray(vao));
    }

    fn create_buffer(&self) -> Result<u32, String> {
        if self.buffer_limit == Some(self.buffers_created.get()) {
            return Err("out of buffer objects".to_string());
        }

        self.buffers_created
            .set(self.buffers_created.get() + 1);
        let id = self.alloc();
        self.record(GlCall::CreateBuffer(id));
        Ok(id)
    }

    fn bind_buffer(&self, target: u32, buffer: Option<u32>) {
        self.record(GlCall::BindBuffer(target, buffer));
    }

    fn buffer_data_u8_slice(&self, target: u32, data: &[u8], usage: u32) {
        self.record(GlCall::BufferData { target, len: data.len(), usage });
    }

    fn delete_buffer(&self, buffer: u32) {
        self.release(buffer);
        self.record(GlCall::DeleteBuffer(buffer));
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.record(GlCall::EnableAttrib(index));
    }

    fn vertex_attrib_pointer_f32(
        &self,
        index: u32,
        size: i32,
        data_type: u32,
        normalized: bool,
        _stride: i32,
        _offset: i32,
    ) {
        self.record(GlCall::AttribPointerF32 { index, size, data_type, normalized });
    }

    fn vertex_attrib_pointer_i32(
        &self,
        index: u32,
        size: i32,
        data_type: u32,
        _stride: i32,
        _offset: i32,
    ) {
        self.record(GlCall::AttribPointerI32 { index, size, data_type });
    }

    fn vertex_attrib_divisor(&self, index: u32, divisor: u32) {
        self.record(GlCall::AttribDivisor { index, divisor });
    }

    fn uniform_location(&self, _program: u32, name: &str) -> Option<u32> {
        if self.missing_uniforms.contains(&name) {
            return None;
        }

        let mut uniforms = self.uniforms.borrow_mut();
        uniforms.push(name.to_string());
        Some(uniforms.len() as u32 - 1)
    }

    fn uniform_2_f32(&self, location: &u32, x: f32, y: f32) {
        assert!(self.bound_program.get().is_some(), "uniform set without active program");
        self.record(GlCall::Uniform2f { location: *location, x, y });
    }

    fn uniform_matrix_4_f32(&self, location: &u32, data: &[f32; 16]) {
        assert!(self.bound_program.get().is_some(), "uniform set without active program");
        self.record(GlCall::UniformMat4 { location: *location, data: *data });
    }

    fn draw_elements_instanced(
        &self,
        mode: u32,
        count: i32,
        element_type: u32,
        _offset: i32,
        instance_count: i32,
    ) {
        assert!(self.bound_program.get().is_some(), "draw without active program");
        assert!(self.bound_vao.get().is_some(), "draw without bound vertex array");
        self.record(GlCall::DrawElementsInstanced {
            mode,
            count,
            element_type,
            instances: instance_count,
        });
    }
}
