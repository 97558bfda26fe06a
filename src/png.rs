//! PNG serialization for sprite sheets
//!
//! Writes exactly one kind of PNG: 8-bit RGBA truecolor (color type 6), no
//! interlacing, every scanline with filter type 0. The container is built
//! here chunk by chunk; only the deflate stream is delegated to `flate2`.

use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::RgbaImage;
use std::io::{self, Write};
use thiserror::Error;

/// The 8-byte signature every PNG starts with.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

const BIT_DEPTH: u8 = 8;
const COLOR_TYPE_RGBA: u8 = 6;
const FILTER_NONE: u8 = 0;
const BYTES_PER_PIXEL: usize = 4;

/// Highest zlib compression level.
pub const MAX_COMPRESSION: u32 = 9;

/// Error type for PNG encoding
#[derive(Debug, Error)]
pub enum EncodeError {
    /// PNG cannot describe an image with no pixels
    #[error("cannot encode an empty {width}x{height} image")]
    EmptyImage { width: u32, height: u32 },
    /// Compression level outside 0..=9
    #[error("invalid compression level {0}, expected 0-9")]
    InvalidLevel(u32),
    /// Chunk payload longer than a PNG length field can hold
    #[error("{chunk} chunk of {len} bytes exceeds the PNG chunk size limit")]
    ChunkTooLarge { chunk: String, len: usize },
    /// Failure inside the zlib stream
    #[error("compression failed: {0}")]
    Compression(#[from] io::Error),
}

/// Options for [`encode_png`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// zlib level, 0 (stored) to 9 (smallest)
    pub compression: u32,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self { compression: MAX_COMPRESSION }
    }
}

/// CRC-32 (IEEE, reflected polynomial 0xEDB88320) over a chunk's type and data.
pub fn crc32(chunk_type: &[u8; 4], data: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    hasher.finalize()
}

/// Append one chunk: length, type, data, CRC of type‖data.
pub fn write_chunk(out: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) -> Result<(), EncodeError> {
    // PNG caps chunk lengths at 2^31 - 1
    let len = u32::try_from(data.len())
        .ok()
        .filter(|l| *l <= i32::MAX as u32)
        .ok_or_else(|| EncodeError::ChunkTooLarge {
            chunk: String::from_utf8_lossy(chunk_type).into_owned(),
            len: data.len(),
        })?;

    out.reserve(12 + data.len());
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(chunk_type);
    out.extend_from_slice(data);
    out.extend_from_slice(&crc32(chunk_type, data).to_be_bytes());
    Ok(())
}

/// IHDR payload for an RGBA8 image.
fn ihdr(width: u32, height: u32) -> [u8; 13] {
    let mut data = [0u8; 13];
    data[0..4].copy_from_slice(&width.to_be_bytes());
    data[4..8].copy_from_slice(&height.to_be_bytes());
    data[8] = BIT_DEPTH;
    data[9] = COLOR_TYPE_RGBA;
    // compression method, filter method, interlace method: all 0
    data
}

/// Raw scanlines: each row prefixed with its filter type byte.
fn scanlines(image: &RgbaImage) -> Vec<u8> {
    let stride = image.width() as usize * BYTES_PER_PIXEL;
    let mut raw = Vec::with_capacity((stride + 1) * image.height() as usize);
    for row in image.as_raw().chunks_exact(stride) {
        raw.push(FILTER_NONE);
        raw.extend_from_slice(row);
    }
    raw
}

fn deflate(raw: &[u8], level: u32) -> Result<Vec<u8>, EncodeError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(level));
    encoder.write_all(raw)?;
    Ok(encoder.finish()?)
}

/// Encode an RGBA image as PNG bytes.
///
/// The result is assembled fully in memory, so nothing is written anywhere
/// unless encoding succeeds. Output is deterministic for a given image and
/// compression level.
///
/// ```
/// use image::{Rgba, RgbaImage};
/// use pxsheet::png::{encode_png, EncodeOptions, PNG_SIGNATURE};
///
/// let image = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
/// let bytes = encode_png(&image, &EncodeOptions::default()).unwrap();
/// assert_eq!(&bytes[..8], &PNG_SIGNATURE);
/// ```
pub fn encode_png(image: &RgbaImage, options: &EncodeOptions) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(EncodeError::EmptyImage { width, height });
    }
    if options.compression > MAX_COMPRESSION {
        return Err(EncodeError::InvalidLevel(options.compression));
    }

    let compressed = deflate(&scanlines(image), options.compression)?;

    let mut png = Vec::with_capacity(PNG_SIGNATURE.len() + 3 * 12 + 13 + compressed.len());
    png.extend_from_slice(&PNG_SIGNATURE);
    write_chunk(&mut png, b"IHDR", &ihdr(width, height))?;
    write_chunk(&mut png, b"IDAT", &compressed)?;
    write_chunk(&mut png, b"IEND", &[])?;
    Ok(png)
}
