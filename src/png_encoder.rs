//! Minimal truecolor PNG writer
//!
//! Emits the signature, IHDR (8-bit RGB, no interlace), one IDAT holding
//! zlib-compressed scanlines with filter type 0, and IEND. Each chunk is
//! length, type, payload and a CRC-32 over type + payload.

use crate::display::PixelBuffer;
use crate::error::{Error, Result};
use flate2::write::ZlibEncoder;
use flate2::{Compression, Crc};
use std::io::{self, Write};

pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Largest width or height the format allows
const MAX_DIMENSION: u32 = (1 << 31) - 1;

const BIT_DEPTH: u8 = 8;
const COLOR_TYPE_RGB: u8 = 2;

/// Filter type byte at the start of every scanline
const FILTER_NONE: u8 = 0;

/// Encode 0xRRGGBB pixels, `width * height` of them in row-major order
pub fn encode(pixels: &[u32], width: u32, height: u32) -> Result<Vec<u8>> {
    let expected = width as usize * height as usize;
    if pixels.len() != expected {
        return Err(Error::Encode(format!(
            "{} pixels for a {}x{} image",
            pixels.len(),
            width,
            height
        )));
    }
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(Error::Encode(format!("{}x{} exceeds PNG limits", width, height)));
    }

    let idat = compress(&scanlines(pixels, width as usize))
        .map_err(|e| Error::Encode(format!("compress: {}", e)))?;

    let mut ihdr = [0u8; 13];
    ihdr[0..4].copy_from_slice(&width.to_be_bytes());
    ihdr[4..8].copy_from_slice(&height.to_be_bytes());
    ihdr[8] = BIT_DEPTH;
    ihdr[9] = COLOR_TYPE_RGB;
    // compression, filter and interlace methods stay 0

    let mut png = Vec::with_capacity(PNG_SIGNATURE.len() + idat.len() + 3 * 12 + ihdr.len());
    png.extend_from_slice(&PNG_SIGNATURE);
    write_chunk(&mut png, b"IHDR", &ihdr);
    write_chunk(&mut png, b"IDAT", &idat);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

/// Encode a whole pixel buffer
pub fn encode_buffer(buffer: &PixelBuffer) -> Result<Vec<u8>> {
    encode(buffer.pixels(), buffer.width(), buffer.height())
}

/// Unfiltered scanlines: a filter byte then R, G, B per pixel
fn scanlines(pixels: &[u32], width: usize) -> Vec<u8> {
    let stride = 1 + 3 * width;
    let rows = if width == 0 { 0 } else { pixels.len() / width };
    let mut raw = Vec::with_capacity(stride * rows);
    if width == 0 {
        return raw;
    }
    for row in pixels.chunks_exact(width) {
        raw.push(FILTER_NONE);
        for &pixel in row {
            let [_, r, g, b] = pixel.to_be_bytes();
            raw.extend_from_slice(&[r, g, b]);
        }
    }
    raw
}

fn compress(raw: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(raw)?;
    encoder.finish()
}

fn write_chunk(out: &mut Vec<u8>, kind: &[u8; 4], payload: &[u8]) {
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(kind);
    out.extend_from_slice(payload);

    let mut crc = Crc::new();
    crc.update(kind);
    crc.update(payload);
    out.extend_from_slice(&crc.sum().to_be_bytes());
}
