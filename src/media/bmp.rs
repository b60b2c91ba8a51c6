//! Windows bitmap decoder.
//!
//! ### Supported files
//! * **24-bit, uncompressed** (`BI_RGB`) only.
//! * `BITMAPINFOHEADER`, `BITMAPV4HEADER` and `BITMAPV5HEADER` DIB headers.
//!
//! Rows are stored bottom-up on disk (unless the height is negative) and
//! are flipped into the top-down order used by [`Image`].

use std::{
    fs,
    io::{self, Cursor, Read, Seek, SeekFrom},
    path::Path,
};

use byteorder::{LittleEndian as LE, ReadBytesExt};
use glam::vec4;
use thiserror::Error;

use crate::world::texture::Image;

/// Offset of the pixel-array pointer in the file header.
const PIXEL_OFFSET_POS: u64 = 0x0A;
/// Offset of the DIB header (its size field comes first).
const DIB_HEADER_POS: u64 = 0x0E;

const DIB_INFO: u32 = 40;
const DIB_V4: u32 = 108;
const DIB_V5: u32 = 124;

const BI_RGB: u32 = 0;

#[derive(Error, Debug)]
pub enum BmpError {
    /// Underlying I/O failure – propagated unchanged.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("not a BMP file (bad magic number)")]
    BadMagic,

    #[error("missing pixel array offset")]
    NoPixelOffset,

    #[error("unsupported DIB header size {0}")]
    UnsupportedHeader(u32),

    #[error("unsupported colour depth {0} bpp (only 24-bit is supported)")]
    UnsupportedDepth(u16),

    #[error("compressed bitmaps are not supported (method {0})")]
    Compressed(u32),

    #[error("invalid image size {0}x{1}")]
    BadSize(i32, i32),

    #[error("pixel array extends beyond end of file")]
    Truncated,
}

/// Read and decode a bitmap from disk.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Image, BmpError> {
    let bytes = fs::read(path)?;
    decode(&bytes)
}

/// Decode an in-memory bitmap.
pub fn decode(bytes: &[u8]) -> Result<Image, BmpError> {
    let mut cur = Cursor::new(bytes);

    /*----------- 1. magic ---------------------------------------------*/
    let mut magic = [0u8; 2];
    cur.read_exact(&mut magic)?;
    if &magic != b"BM" {
        return Err(BmpError::BadMagic);
    }

    /*----------- 2. file + DIB header ---------------------------------*/
    cur.seek(SeekFrom::Start(PIXEL_OFFSET_POS))?;
    let pixel_offset = cur.read_u32::<LE>()?;
    if pixel_offset == 0 {
        return Err(BmpError::NoPixelOffset);
    }

    cur.seek(SeekFrom::Start(DIB_HEADER_POS))?;
    let dib_size = cur.read_u32::<LE>()?;
    if !matches!(dib_size, DIB_INFO | DIB_V4 | DIB_V5) {
        return Err(BmpError::UnsupportedHeader(dib_size));
    }

    let width = cur.read_i32::<LE>()?;
    let height = cur.read_i32::<LE>()?;
    let _planes = cur.read_u16::<LE>()?;
    let depth = cur.read_u16::<LE>()?;
    let compression = cur.read_u32::<LE>()?;

    if depth != 24 {
        return Err(BmpError::UnsupportedDepth(depth));
    }
    if compression != BI_RGB {
        return Err(BmpError::Compressed(compression));
    }
    if width <= 0 || height == 0 {
        return Err(BmpError::BadSize(width, height));
    }

    /*----------- 3. pixel rows ----------------------------------------*/
    let top_down = height < 0;
    let w = width as usize;
    let h = height.unsigned_abs() as usize;
    // rows are padded to a 4-byte boundary
    let row_size = (24 * w).div_ceil(32) * 4;

    let start = pixel_offset as usize;
    let end = start + row_size * h;
    let data = bytes.get(start..end).ok_or(BmpError::Truncated)?;

    let mut image = Image::new(w, h);
    for (file_row, row) in data.chunks_exact(row_size).enumerate() {
        let y = if top_down { file_row } else { h - 1 - file_row };
        for (x, bgr) in row[..w * 3].chunks_exact(3).enumerate() {
            let color = vec4(
                bgr[2] as f32 / 255.0,
                bgr[1] as f32 / 255.0,
                bgr[0] as f32 / 255.0,
                1.0,
            );
            image.set_texel(x, y, color);
        }
    }

    Ok(image)
}

/// Encode `rgb` (top-down rows of `[r, g, b]`) as a 24-bit bottom-up BMP.
///
/// Used to write fixtures; the renderer itself never saves images.
pub fn encode_rgb24(width: usize, height: usize, rgb: &[[u8; 3]]) -> Vec<u8> {
    debug_assert_eq!(rgb.len(), width * height);
    let row_size = (24 * width).div_ceil(32) * 4;
    let pixel_offset = 14 + DIB_INFO as usize;
    let file_size = pixel_offset + row_size * height;

    let mut out = Vec::with_capacity(file_size);
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&(file_size as u32).to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&(pixel_offset as u32).to_le_bytes());

    out.extend_from_slice(&DIB_INFO.to_le_bytes());
    out.extend_from_slice(&(width as i32).to_le_bytes());
    out.extend_from_slice(&(height as i32).to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // planes
    out.extend_from_slice(&24u16.to_le_bytes());
    out.extend_from_slice(&BI_RGB.to_le_bytes());
    out.extend_from_slice(&((row_size * height) as u32).to_le_bytes());
    out.resize(pixel_offset, 0); // resolution + palette fields

    for y in (0..height).rev() {
        let row_start = out.len();
        for &[r, g, b] in &rgb[y * width..(y + 1) * width] {
            out.extend_from_slice(&[b, g, r]);
        }
        out.resize(row_start + row_size, 0);
    }
    out
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
