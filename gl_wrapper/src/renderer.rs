use std::ffi::c_void;

use crate::geometry::Geometry;
use crate::program::{Program, UniformLocation};

pub struct GlRenderer {
    current_program: u32,
}

impl GlRenderer {
    pub fn new() -> Self {
        Self { current_program: 0 }
    }

    pub fn use_program(&mut self, program: &Program) {
        let p_id = program.get_id();
        if self.current_program != p_id {
            unsafe { gl::UseProgram(p_id) }
            self.current_program = p_id;
        }
    }

    /// Uniform writes land on the current program, so `program` is bound first.
    pub fn set_f32(&mut self, program: &Program, location: UniformLocation, value: f32) {
        self.use_program(program);

        unsafe {
            gl::Uniform1f(location.0, value);
        }
    }

    pub fn draw(&mut self, geometry: &Geometry, program: &Program) {
        self.use_program(program);

        unsafe {
            gl::BindVertexArray(geometry.vao());
            gl::DrawElements(
                gl::TRIANGLES,
                geometry.indices() as i32,
                gl::UNSIGNED_INT,
                std::ptr::null::<c_void>(),
            );
            gl::BindVertexArray(0);
        }
    }

    pub fn clear(&self) {
        unsafe {
            gl::Clear(gl::COLOR_BUFFER_BIT);
        }
    }

    /// Drops the cached binding, for when the program object is about to be deleted.
    pub fn forget_program(&mut self) {
        self.current_program = 0;
    }
}

impl Default for GlRenderer {
    fn default() -> Self {
        Self::new()
    }
}
