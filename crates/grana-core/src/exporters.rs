//! Image exporters
//!
//! Write rendered frames to PNG (8-bit) or TIFF (16-bit). Export always
//! runs the pipeline against the full-resolution source first; these
//! functions only encode the result.

use std::path::Path;

use crate::pipeline::RenderedFrame;

/// Export a rendered frame, dispatching on the output file extension.
pub fn export_image<P: AsRef<Path>>(frame: &RenderedFrame, path: P) -> Result<(), String> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or_else(|| "No file extension found".to_string())?;

    match extension.as_str() {
        "png" => export_png8(frame, path),
        "tif" | "tiff" => export_tiff16(frame, path),
        _ => Err(format!("Unsupported output format: {}", extension)),
    }
}

/// Export a rendered frame to 8-bit PNG.
pub fn export_png8<P: AsRef<Path>>(frame: &RenderedFrame, path: P) -> Result<(), String> {
    use std::fs::File;
    use std::io::BufWriter;

    if frame.channels != 3 {
        return Err(format!(
            "PNG export only supports 3-channel RGB, got {} channels",
            frame.channels
        ));
    }

    let file =
        File::create(path.as_ref()).map_err(|e| format!("Failed to create PNG file: {}", e))?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, frame.width, frame.height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);

    let mut png_writer = encoder
        .write_header()
        .map_err(|e| format!("Failed to write PNG header: {}", e))?;

    // Convert f32 (0.0-1.0) to u8 (0-255)
    let u8_data: Vec<u8> = frame
        .data
        .iter()
        .map(|&v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
        .collect();

    png_writer
        .write_image_data(&u8_data)
        .map_err(|e| format!("Failed to write PNG image: {}", e))
}

/// Export a rendered frame to 16-bit RGB TIFF.
pub fn export_tiff16<P: AsRef<Path>>(frame: &RenderedFrame, path: P) -> Result<(), String> {
    use std::fs::File;
    use std::io::BufWriter;

    if frame.channels != 3 {
        return Err(format!(
            "TIFF export only supports 3-channel RGB, got {} channels",
            frame.channels
        ));
    }

    let file =
        File::create(path.as_ref()).map_err(|e| format!("Failed to create TIFF file: {}", e))?;
    let writer = BufWriter::new(file);

    let mut encoder = tiff::encoder::TiffEncoder::new(writer)
        .map_err(|e| format!("Failed to create TIFF encoder: {}", e))?;

    // Convert f32 (0.0-1.0) to u16 (0-65535)
    let u16_data: Vec<u16> = frame
        .data
        .iter()
        .map(|&v| (v.clamp(0.0, 1.0) * 65535.0).round() as u16)
        .collect();

    encoder
        .write_image::<tiff::encoder::colortype::RGB16>(frame.width, frame.height, &u16_data)
        .map_err(|e| format!("Failed to write TIFF image: {}", e))
}
