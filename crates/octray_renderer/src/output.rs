//! Image encoders: plain-text PPM and PNG.
//!
//! Both formats go through [`ImageBuffer::to_rgb8`], so they always agree on
//! the 8-bit value of every pixel.

use crate::{ImageBuffer, OutputError};
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// 8-bit bytes of `image`, checked against its dimensions.
fn rgb8(image: &ImageBuffer) -> Result<Vec<u8>, OutputError> {
    let bytes = image.to_rgb8();
    if bytes.len() != image.width as usize * image.height as usize * 3 {
        return Err(OutputError::BufferSize {
            width: image.width,
            height: image.height,
        });
    }
    Ok(bytes)
}

/// Write `image` as an ASCII `P3` PPM: a `width height` header, a max value
/// of 255, then one line of space-separated RGB triples per row.
pub fn write_ppm<W: Write>(image: &ImageBuffer, mut writer: W) -> Result<(), OutputError> {
    let bytes = rgb8(image)?;

    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    let row_len = image.width as usize * 3;
    if row_len > 0 {
        for row in bytes.chunks_exact(row_len) {
            let line: Vec<String> = row.iter().map(u8::to_string).collect();
            writeln!(writer, "{}", line.join(" "))?;
        }
    }

    writer.flush()?;
    Ok(())
}

pub fn save_ppm(image: &ImageBuffer, path: impl AsRef<Path>) -> Result<(), OutputError> {
    let file = File::create(path)?;
    write_ppm(image, BufWriter::new(file))
}

/// Write `image` as an 8-bit RGB PNG.
pub fn write_png<W: Write>(image: &ImageBuffer, writer: W) -> Result<(), OutputError> {
    let bytes = rgb8(image)?;
    PngEncoder::new(writer).write_image(&bytes, image.width, image.height, ColorType::Rgb8)?;
    Ok(())
}

pub fn save_png(image: &ImageBuffer, path: impl AsRef<Path>) -> Result<(), OutputError> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_png(image, &mut writer)?;
    writer.flush()?;
    Ok(())
}
