use std::slice;

use crate::{error::Error, gl::GlBackend};

/// Keeps a buffer bound to `target`; unbinds it when dropped.
#[must_use = "the buffer is unbound as soon as the binding is dropped"]
pub(super) struct BufferBinding<'gl, G: GlBackend> {
    gl: &'gl G,
    target: u32,
}

impl<'gl, G: GlBackend> BufferBinding<'gl, G> {
    pub(super) fn new(gl: &'gl G, target: u32, buffer: G::Buffer) -> Self {
        gl.bind_buffer(target, Some(buffer));
        Self { gl, target }
    }

    /// Replaces the buffer's contents with `data`.
    pub(super) fn upload<T: Copy>(&self, data: &[T], usage: u32) {
        buffer_upload_array(self.gl, self.target, data, usage);
    }
}

impl<G: GlBackend> Drop for BufferBinding<'_, G> {
    fn drop(&mut self) {
        self.gl.bind_buffer(self.target, None);
    }
}

/// Keeps a vertex array bound; unbinds it when dropped.
#[must_use = "the vertex array is unbound as soon as the scope is dropped"]
pub(super) struct VertexArrayScope<'gl, G: GlBackend> {
    gl: &'gl G,
}

impl<'gl, G: GlBackend> VertexArrayScope<'gl, G> {
    pub(super) fn new(gl: &'gl G, vao: G::VertexArray) -> Self {
        gl.bind_vertex_array(Some(vao));
        Self { gl }
    }
}

impl<G: GlBackend> Drop for VertexArrayScope<'_, G> {
    fn drop(&mut self) {
        self.gl.bind_vertex_array(None);
    }
}

pub(super) fn create_buffer<G: GlBackend>(gl: &G, buffer_type: &str) -> Result<G::Buffer, Error> {
    gl.create_buffer()
        .map_err(|e| Error::buffer_creation_failed(buffer_type, &e))
}

/// Uploads an array of elements to a GL buffer as raw bytes.
///
/// `T` must have a stable memory layout (`#[repr(C)]`) without padding bytes.
pub(super) fn buffer_upload_array<G: GlBackend, T: Copy>(
    gl: &G,
    target: u32,
    data: &[T],
    usage: u32,
) {
    let bytes = unsafe {
        let data_ptr = data.as_ptr() as *const u8;
        let size = std::mem::size_of_val(data);
        slice::from_raw_parts(data_ptr, size)
    };
    gl.buffer_data_u8_slice(target, bytes, usage);
}
