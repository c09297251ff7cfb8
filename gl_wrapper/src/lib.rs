/// Fullscreen quad in normalized device coordinates, one `vec2` per corner.
#[rustfmt::skip]
pub const QUAD: [f32; 8] = [
    -1.0, -1.0,
    1.0, -1.0,
    1.0, 1.0,
    -1.0, 1.0,
];

/// Two counter-clockwise triangles over [`QUAD`].
#[rustfmt::skip]
pub const QUAD_INDICES: [u32; 6] = [
    0, 1, 2,
    0, 2, 3,
];

pub mod framebuffer;
pub mod geometry;
pub mod program;
pub mod renderer;
pub mod status;
