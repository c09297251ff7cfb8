use std::ffi::c_void;
use thiserror::Error;

pub struct GeometryBuilder<'a> {
    attributes: Vec<VertexAttribute>,
    data: &'a [f32],
    indices: &'a [u32],
}

impl<'a> GeometryBuilder<'a> {
    /// Interleaved vertex `data`, drawn as triangles through `indices`.
    pub fn new(data: &'a [f32], indices: &'a [u32]) -> Self {
        Self {
            data,
            attributes: Vec::new(),
            indices,
        }
    }

    pub fn with_attribute(mut self, attr: VertexAttribute) -> Self {
        self.attributes.push(attr);
        self
    }

    fn validate(&self) -> Result<(usize, usize), GBError> {
        let total_len: usize = self.attributes.iter().map(|a| a.size()).sum();

        if total_len == 0 {
            return Err(GBError::NoAttributes);
        }

        if self.data.len() % total_len != 0 {
            return Err(GBError::InvalidDataLength);
        }

        let vertices = self.data.len() / total_len;

        if let Some(&index) = self.indices.iter().find(|&&i| i as usize >= vertices) {
            return Err(GBError::IndexOutOfRange { index, vertices });
        }

        Ok((total_len, vertices))
    }

    pub fn build(self) -> Result<Geometry, GBError> {
        let (total_len, _) = self.validate()?;

        let mut vao = 0;
        let mut vbo = 0;
        let mut ebo = 0;

        unsafe {
            gl::GenVertexArrays(1, (&mut vao) as *mut u32);
            gl::GenBuffers(1, (&mut vbo) as *mut u32);
            gl::GenBuffers(1, (&mut ebo) as *mut u32);

            gl::BindVertexArray(vao);
            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);

            gl::BufferData(
                gl::ARRAY_BUFFER,
                std::mem::size_of_val(self.data) as isize,
                self.data.as_ptr() as *const c_void,
                gl::STATIC_DRAW,
            );

            // element buffer binding is recorded in the VAO
            gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, ebo);
            gl::BufferData(
                gl::ELEMENT_ARRAY_BUFFER,
                std::mem::size_of_val(self.indices) as isize,
                self.indices.as_ptr() as *const c_void,
                gl::STATIC_DRAW,
            );

            let mut offset = 0;

            for (i, attr) in self.attributes.iter().enumerate() {
                gl::VertexAttribPointer(
                    i as u32,
                    attr.size() as i32,
                    gl::FLOAT,
                    gl::FALSE,
                    (total_len * std::mem::size_of::<f32>()) as i32,
                    (offset * std::mem::size_of::<f32>()) as *const c_void,
                );
                offset += attr.size();
                gl::EnableVertexAttribArray(i as u32);
            }

            gl::BindVertexArray(0);
            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
        }

        Ok(Geometry {
            vao,
            vbo,
            ebo,
            indices: self.indices.len(),
        })
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GBError {
    #[error("Geometry needs at least one vertex attribute")]
    NoAttributes,
    #[error("Invalid data length for given attributes")]
    InvalidDataLength,
    #[error("Index {index} points past the last of {vertices} vertices")]
    IndexOutOfRange { index: u32, vertices: usize },
}

pub enum VertexAttribute {
    Vec2,
}

impl VertexAttribute {
    pub fn size(&self) -> usize {
        match self {
            VertexAttribute::Vec2 => 2,
        }
    }
}

pub struct Geometry {
    vao: u32,
    vbo: u32,
    ebo: u32,
    indices: usize,
}

impl Geometry {
    pub fn vao(&self) -> u32 {
        self.vao
    }

    /// Number of indices in the element buffer.
    pub fn indices(&self) -> usize {
        self.indices
    }
}

impl Drop for Geometry {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteVertexArrays(1, (&self.vao) as *const u32);
            gl::DeleteBuffers(1, (&self.vbo) as *const u32);
            gl::DeleteBuffers(1, (&self.ebo) as *const u32);
        }
    }
}
