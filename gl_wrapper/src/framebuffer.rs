use std::ffi::c_void;

/// Reads the bound framebuffer back as tightly packed RGB8, bottom row first.
pub fn read_pixels_rgb(width: u32, height: u32) -> Vec<u8> {
    let mut data = vec![0_u8; width as usize * height as usize * 3];

    unsafe {
        gl::PixelStorei(gl::PACK_ALIGNMENT, 1);
        gl::ReadPixels(
            0,
            0,
            width as i32,
            height as i32,
            gl::RGB,
            gl::UNSIGNED_BYTE,
            data.as_mut_ptr() as *mut c_void,
        );
    }

    data
}
