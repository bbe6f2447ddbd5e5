use std::fmt::{self, Debug};

use crate::{error::Error, gl::GlBackend};

pub(crate) struct ShaderProgram<G: GlBackend> {
    pub(crate) program: G::Program,
}

impl<G: GlBackend> ShaderProgram<G> {
    /// Compiles and links a program from vertex and fragment sources.
    ///
    /// On failure every GL object created so far is deleted before the error
    /// is returned.
    pub(crate) fn create(
        gl: &G,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Self, Error> {
        let program = gl
            .create_program()
            .map_err(|e| Error::shader_program_creation_failed(&e))?;

        match link_program(gl, program, vertex_source, fragment_source) {
            Ok(()) => Ok(ShaderProgram { program }),
            Err(e) => {
                gl.delete_program(program);
                Err(e)
            },
        }
    }

    /// Activates the program until the returned scope is dropped.
    pub(crate) fn activate<'gl>(&self, gl: &'gl G) -> ProgramScope<'gl, G> {
        gl.use_program(Some(self.program));
        ProgramScope { gl }
    }

    pub(crate) fn uniform_location(&self, gl: &G, name: &str) -> Result<G::UniformLocation, Error> {
        gl.uniform_location(self.program, name)
            .ok_or_else(|| Error::uniform_location_failed(name))
    }

    /// Deletes the program, releasing the GPU resource.
    pub(crate) fn delete(self, gl: &G) {
        gl.delete_program(self.program);
    }
}

impl<G: GlBackend> Debug for ShaderProgram<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderProgram")
            .field("program", &self.program)
            .finish()
    }
}

/// Keeps a shader program bound; unbinds it when dropped.
#[must_use = "the program is unbound as soon as the scope is dropped"]
pub(crate) struct ProgramScope<'gl, G: GlBackend> {
    gl: &'gl G,
}

impl<G: GlBackend> Drop for ProgramScope<'_, G> {
    fn drop(&mut self) {
        self.gl.use_program(None);
    }
}

fn link_program<G: GlBackend>(
    gl: &G,
    program: G::Program,
    vertex_source: &str,
    fragment_source: &str,
) -> Result<(), Error> {
    let vertex_shader = compile_shader(gl, ShaderType::Vertex, vertex_source)?;
    let fragment_shader = match compile_shader(gl, ShaderType::Fragment, fragment_source) {
        Ok(shader) => shader,
        Err(e) => {
            gl.delete_shader(vertex_shader);
            return Err(e);
        },
    };

    // attach shaders and link program
    gl.attach_shader(program, vertex_shader);
    gl.attach_shader(program, fragment_shader);
    gl.link_program(program);
    let linked = check_link_status(gl, program);

    // shaders are no longer needed once linking has been attempted
    for shader in [vertex_shader, fragment_shader] {
        gl.detach_shader(program, shader);
        gl.delete_shader(shader);
    }

    linked
}

fn compile_shader<G: GlBackend>(
    gl: &G,
    shader_type: ShaderType,
    source: &str,
) -> Result<G::Shader, Error> {
    let shader = gl
        .create_shader(shader_type.into())
        .map_err(|e| Error::shader_creation_failed(&e))?;

    gl.shader_source(shader, source);
    gl.compile_shader(shader);

    if !gl.shader_compile_status(shader) {
        let log = gl.shader_info_log(shader);
        gl.delete_shader(shader);
        return Err(Error::shader_compile_failed(shader_type.name(), &log));
    }

    Ok(shader)
}

fn check_link_status<G: GlBackend>(gl: &G, program: G::Program) -> Result<(), Error> {
    if !gl.program_link_status(program) {
        let log = gl.program_info_log(program);
        return Err(Error::shader_link_failed(&log));
    }

    Ok(())
}

/// Enum representing the type of shader.
#[derive(Clone, Copy)]
enum ShaderType {
    Vertex,
    Fragment,
}

impl ShaderType {
    fn name(self) -> &'static str {
        match self {
            ShaderType::Vertex => "Vertex",
            ShaderType::Fragment => "Fragment",
        }
    }
}

impl From<ShaderType> for u32 {
    fn from(val: ShaderType) -> Self {
        use ShaderType::*;

        match val {
            Vertex => glow::VERTEX_SHADER,
            Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gl::recording::{GlCall, RecordingGl};

    #[test]
    fn shaders_are_deleted_after_linking() {
        let gl = RecordingGl::new();
        let program = ShaderProgram::create(&gl, "void main() {}", "void main() {}").unwrap();

        // only the program remains
        assert_eq!(gl.live_objects(), 1);

        program.delete(&gl);
        assert_eq!(gl.live_objects(), 0);
    }

    #[test]
    fn every_created_shader_is_deleted() {
        let gl = RecordingGl::new();
        let program = ShaderProgram::create(&gl, "void main() {}", "void main() {}").unwrap();
        let calls = gl.calls();

        let created: Vec<u32> = calls
            .iter()
            .filter_map(|call| match call {
                GlCall::CreateShader(id) => Some(*id),
                _ => None,
            })
            .collect();
        assert_eq!(created.len(), 2);
        for id in created {
            assert!(calls.contains(&GlCall::DeleteShader(id)), "shader {id} leaked");
        }

        program.delete(&gl);
    }

    #[test]
    fn compile_failure_reports_stage_and_log() {
        let gl = RecordingGl::new().rejecting_shader("frag_color");
        let err = ShaderProgram::create(&gl, "void main() {}", "out vec4 frag_color;").unwrap_err();

        match err {
            Error::Shader(msg) => {
                assert!(msg.starts_with("Fragment shader compilation failed"), "{msg}");
                assert!(msg.contains("rejected by test"), "{msg}");
            },
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(gl.live_objects(), 0);
    }

    #[test]
    fn scope_unbinds_program_on_drop() {
        let gl = RecordingGl::new();
        let program = ShaderProgram::create(&gl, "", "").unwrap();

        {
            let _scope = program.activate(&gl);
            assert_eq!(gl.bound_program(), Some(program.program));
        }

        assert_eq!(gl.bound_program(), None);
        assert_eq!(gl.calls().last(), Some(&GlCall::UseProgram(None)));
        program.delete(&gl);
    }
}
