// Loads images from disk into a PixelBuffer and writes them back out.
// Visual expectation: what you load is exactly what the window shows at 1:1,
// and what you export is that image with the redaction boxes burned in.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

use crate::error::Error;
use crate::types::{Color, PixelBuffer};

/// Decode any format the `image` crate understands into RGBA8 pixels.
pub fn load(path: &Path) -> Result<PixelBuffer, Error> {
    // 1) A clear message for the common typo case, before the decoder gets a say.
    if !path.exists() {
        return Err(Error::MissingInput(path.to_path_buf()));
    }

    // 2) Decode and normalize to RGBA8 (handles gray, RGB, 16-bit, ...).
    let rgba = image::open(path)
        .map_err(|source| Error::ImageLoad { path: path.to_path_buf(), source })?
        .to_rgba8();

    let (w, h) = rgba.dimensions();
    if w == 0 || h == 0 {
        return Err(Error::EmptyImage(path.to_path_buf()));
    }

    // 3) Repack as our own pixel type, row-major.
    let pixels = rgba
        .pixels()
        .map(|p| Color::rgba(p[0], p[1], p[2], p[3]))
        .collect();
    PixelBuffer::from_pixels(w as usize, h as usize, pixels)
        .ok_or_else(|| Error::EmptyImage(path.to_path_buf()))
}

/// Encode `image` to `path`; the format follows the file extension.
/// `quality` (1..=100) only matters for JPEG.
pub fn save(path: &Path, image: &PixelBuffer, quality: u8) -> Result<(), Error> {
    let export_err = |source: image::ImageError| Error::ImageExport { path: path.to_path_buf(), source };

    let rgba = RgbaImage::from_fn(image.width() as u32, image.height() as u32, |x, y| {
        let c = image.get(x as usize, y as usize).unwrap_or(Color::BLANK);
        Rgba([c.r, c.g, c.b, c.a])
    });

    let format = ImageFormat::from_path(path).map_err(export_err)?;
    match format {
        ImageFormat::Jpeg => {
            // JPEG has no alpha channel; flatten to RGB first.
            let file = File::create(path)
                .map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
            let mut out = BufWriter::new(file);
            let rgb = DynamicImage::ImageRgba8(rgba).to_rgb8();
            JpegEncoder::new_with_quality(&mut out, quality)
                .encode_image(&rgb)
                .map_err(export_err)?;
            out.flush()
                .map_err(|source| Error::Io { path: path.to_path_buf(), source })
        }
        _ => rgba.save_with_format(path, format).map_err(export_err),
    }
}
