use std::ffi::CString;
use std::fmt;

use gl::types::{GLchar, GLenum, GLint, GLuint};
use thiserror::Error;

use crate::status::Checked;

pub struct ProgramBuilder<'a> {
    vert: &'a str,
    frag: &'a str,
}

impl<'a> ProgramBuilder<'a> {
    pub fn new(vert_src: &'a str, frag_src: &'a str) -> Self {
        Self {
            vert: vert_src,
            frag: frag_src,
        }
    }

    /// Compiles both stages, links them and makes the program current.
    ///
    /// A program object is returned even if a stage fails, compile and link logs end up
    /// as diagnostics on the [`Checked`] wrapper.
    pub fn build(self) -> Checked<Program, ProgramError> {
        unsafe {
            let vert = compile(gl::VERTEX_SHADER, self.vert);
            let frag = compile(gl::FRAGMENT_SHADER, self.frag);

            let id = gl::CreateProgram();
            let mut checked = Checked::new(Program { id });

            for (shader, stage) in [(vert, ShaderStage::Vertex), (frag, ShaderStage::Fragment)] {
                if let Some(log) = status_log(shader, gl::COMPILE_STATUS, Object::Shader) {
                    checked.push(ProgramError::Compilation { stage, log });
                }
            }

            gl::AttachShader(id, vert);
            gl::AttachShader(id, frag);
            gl::LinkProgram(id);

            if let Some(log) = status_log(id, gl::LINK_STATUS, Object::Program) {
                checked.push(ProgramError::Linking(log));
            }

            gl::DetachShader(id, vert);
            gl::DetachShader(id, frag);
            gl::DeleteShader(vert);
            gl::DeleteShader(frag);

            gl::UseProgram(id);

            checked
        }
    }
}

unsafe fn compile(kind: GLenum, src: &str) -> GLuint {
    let shader = gl::CreateShader(kind);
    let ptr = src.as_ptr() as *const GLchar;
    let len = src.len() as GLint;

    gl::ShaderSource(
        shader,
        1,
        (&ptr) as *const *const GLchar,
        (&len) as *const GLint,
    );
    gl::CompileShader(shader);

    shader
}

#[derive(Copy, Clone)]
enum Object {
    Shader,
    Program,
}

/// Returns the info log when `status` reports failure.
unsafe fn status_log(id: GLuint, status: GLenum, object: Object) -> Option<String> {
    let mut success: GLint = 0;
    let mut len: GLint = 0;

    match object {
        Object::Shader => {
            gl::GetShaderiv(id, status, (&mut success) as *mut GLint);
            gl::GetShaderiv(id, gl::INFO_LOG_LENGTH, (&mut len) as *mut GLint);
        }
        Object::Program => {
            gl::GetProgramiv(id, status, (&mut success) as *mut GLint);
            gl::GetProgramiv(id, gl::INFO_LOG_LENGTH, (&mut len) as *mut GLint);
        }
    }

    if success == gl::TRUE as GLint {
        return None;
    }

    let mut buf = vec![0_u8; len.max(1) as usize];
    let mut written: GLint = 0;

    match object {
        Object::Shader => gl::GetShaderInfoLog(
            id,
            buf.len() as GLint,
            (&mut written) as *mut GLint,
            buf.as_mut_ptr() as *mut GLchar,
        ),
        Object::Program => gl::GetProgramInfoLog(
            id,
            buf.len() as GLint,
            (&mut written) as *mut GLint,
            buf.as_mut_ptr() as *mut GLchar,
        ),
    }

    buf.truncate(written.max(0) as usize);

    Some(String::from_utf8_lossy(&buf).trim_end().to_string())
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ProgramError {
    #[error("{stage} shader failed to compile: {log}")]
    Compilation { stage: ShaderStage, log: String },
    #[error("program failed to link: {0}")]
    Linking(String),
}

/// Location of a uniform in a linked program. `-1` marks a name the linker did not keep,
/// writes to it are silently dropped by GL.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct UniformLocation(pub GLint);

impl UniformLocation {
    pub const INACTIVE: Self = Self(-1);

    pub fn is_active(&self) -> bool {
        self.0 >= 0
    }
}

pub struct Program {
    id: GLuint,
}

impl Program {
    pub fn get_id(&self) -> GLuint {
        self.id
    }

    pub fn uniform_location(&self, name: &str) -> UniformLocation {
        let Ok(name) = CString::new(name) else {
            return UniformLocation::INACTIVE;
        };

        UniformLocation(unsafe { gl::GetUniformLocation(self.id, name.as_ptr()) })
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        unsafe { gl::DeleteProgram(self.id) }
    }
}
