use std::path::Path;

use image::ImageFormat;
use tracing::debug;

use crate::error::{IndexerError, Result};
use crate::types::{ColorSpace, Texture};

/// File header (14 bytes) plus BITMAPINFOHEADER (40 bytes).
const HEADER_LEN: usize = 54;
const OFFSET_BITS_PER_PIXEL: usize = 0x1C;
const OFFSET_COMPRESSION: usize = 0x1E;

/// Read and decode an uncompressed 24-bit BMP file.
pub fn load_bmp(path: &Path) -> Result<Texture> {
    let data = std::fs::read(path).map_err(|e| {
        IndexerError::Input(format!("Failed to read texture {}: {e}", path.display()))
    })?;

    let texture = decode_bmp(&data).map_err(|e| match e {
        IndexerError::Input(msg) => IndexerError::Input(format!("{}: {msg}", path.display())),
        other => other,
    })?;

    debug!(
        path = %path.display(),
        width = texture.width,
        height = texture.height,
        "Loaded texture"
    );

    Ok(texture)
}

/// Decode BMP bytes, accepting only uncompressed 24 bits per pixel.
pub fn decode_bmp(data: &[u8]) -> Result<Texture> {
    let header = data
        .get(..HEADER_LEN)
        .ok_or_else(|| IndexerError::Input("Not a correct BMP file: header truncated".into()))?;

    if &header[..2] != b"BM" {
        return Err(IndexerError::Input(
            "Not a correct BMP file: missing BM signature".into(),
        ));
    }

    let compression = read_u32(header, OFFSET_COMPRESSION);
    if compression != 0 {
        return Err(IndexerError::Input(format!(
            "Unsupported BMP compression {compression}"
        )));
    }

    let bits_per_pixel = read_u16(header, OFFSET_BITS_PER_PIXEL);
    if bits_per_pixel != 24 {
        return Err(IndexerError::Input(format!(
            "Unsupported BMP color depth: {bits_per_pixel} bits per pixel"
        )));
    }

    let img = image::load_from_memory_with_format(data, ImageFormat::Bmp)
        .map_err(|e| IndexerError::Input(format!("Failed to decode BMP: {e}")))?;

    // Bottom-up rows, matching the GL texture origin.
    let mut rgb = img.to_rgb8();
    image::imageops::flip_vertical_in_place(&mut rgb);

    Ok(Texture {
        width: rgb.width(),
        height: rgb.height(),
        pixels: rgb.into_raw(),
        color_space: ColorSpace::Linear,
    })
}

fn read_u16(header: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([header[offset], header[offset + 1]])
}

fn read_u32(header: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        header[offset],
        header[offset + 1],
        header[offset + 2],
        header[offset + 3],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode_bmp(img: &image::RgbImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Bmp)
            .unwrap();
        bytes
    }

    fn gradient(width: u32, height: u32) -> image::RgbImage {
        image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x * 40) as u8, (y * 40) as u8, 200])
        })
    }

    #[test]
    fn decodes_24_bit_bitmap_bottom_up() {
        let img = gradient(3, 2);
        let tex = decode_bmp(&encode_bmp(&img)).unwrap();

        assert_eq!(tex.width, 3);
        assert_eq!(tex.height, 2);
        assert_eq!(tex.pixels.len(), 3 * 2 * 3);
        // Texture row 0 is the image's bottom row.
        assert_eq!(tex.pixel(0, 0), Some(img.get_pixel(0, 1).0));
        assert_eq!(tex.pixel(2, 1), Some(img.get_pixel(2, 0).0));
        assert_eq!(tex.color_space, ColorSpace::Linear);
    }

    #[test]
    fn rejects_truncated_header() {
        let err = decode_bmp(b"BM\x00\x00").unwrap_err();
        assert!(err.to_string().contains("header truncated"));
    }

    #[test]
    fn rejects_bad_signature() {
        let mut bytes = encode_bmp(&gradient(2, 2));
        bytes[0] = b'X';
        let err = decode_bmp(&bytes).unwrap_err();
        assert!(err.to_string().contains("BM signature"));
    }

    #[test]
    fn rejects_other_color_depths() {
        let mut bytes = encode_bmp(&gradient(2, 2));
        bytes[OFFSET_BITS_PER_PIXEL] = 32;
        let err = decode_bmp(&bytes).unwrap_err();
        assert!(err.to_string().contains("32 bits per pixel"));
    }

    #[test]
    fn rejects_compressed_bitmaps() {
        let mut bytes = encode_bmp(&gradient(2, 2));
        bytes[OFFSET_COMPRESSION] = 1;
        let err = decode_bmp(&bytes).unwrap_err();
        assert!(err.to_string().contains("compression"));
    }

    #[test]
    fn rejects_truncated_pixel_data() {
        let bytes = encode_bmp(&gradient(16, 16));
        let err = decode_bmp(&bytes[..HEADER_LEN + 10]).unwrap_err();
        assert!(matches!(err, IndexerError::Input(_)));
    }

    #[test]
    fn load_missing_file() {
        let err = load_bmp(Path::new("/nonexistent/texture.bmp")).unwrap_err();
        assert!(err.to_string().contains("Failed to read texture"));
    }
}
