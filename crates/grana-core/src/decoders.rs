//! Image decoders
//!
//! PNG and TIFF sources are decoded into normalized f32 RGB. The session
//! works on a display-bounded copy of the source; the full-resolution
//! original is kept only for export.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Decoded image data: interleaved RGB, f32 in [0, 1].
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Interleaved RGB data (3 values per pixel)
    pub data: Vec<f32>,
}

impl DecodedImage {
    /// Construct from raw parts, validating the buffer length.
    pub fn from_rgb(width: u32, height: u32, data: Vec<f32>) -> Result<Self, String> {
        let expected = (width as usize) * (height as usize) * 3;
        if data.len() != expected {
            return Err(format!(
                "RGB buffer length {} does not match {}x{} image",
                data.len(),
                width,
                height
            ));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Longest side in pixels.
    pub fn long_side(&self) -> u32 {
        self.width.max(self.height)
    }

    /// Area-average the image down so its longer side is at most
    /// `max_dim`. Returns a clone when the image already fits.
    pub fn downscale_to(&self, max_dim: u32) -> DecodedImage {
        let long = self.long_side();
        if long <= max_dim || max_dim == 0 {
            return self.clone();
        }

        let scale = max_dim as f64 / long as f64;
        let tw = ((self.width as f64 * scale).round() as u32).max(1);
        let th = ((self.height as f64 * scale).round() as u32).max(1);

        let mut sums = vec![0.0f64; (tw as usize) * (th as usize) * 3];
        let mut counts = vec![0u32; (tw as usize) * (th as usize)];

        for y in 0..self.height {
            let ty = ((y as u64 * th as u64) / self.height as u64).min(th as u64 - 1) as usize;
            for x in 0..self.width {
                let tx = ((x as u64 * tw as u64) / self.width as u64).min(tw as u64 - 1) as usize;
                let src = ((y * self.width + x) * 3) as usize;
                let dst = (ty * tw as usize + tx) * 3;
                sums[dst] += self.data[src] as f64;
                sums[dst + 1] += self.data[src + 1] as f64;
                sums[dst + 2] += self.data[src + 2] as f64;
                counts[ty * tw as usize + tx] += 1;
            }
        }

        let mut data = Vec::with_capacity(sums.len());
        for (i, &count) in counts.iter().enumerate() {
            let n = count.max(1) as f64;
            data.push((sums[i * 3] / n) as f32);
            data.push((sums[i * 3 + 1] / n) as f32);
            data.push((sums[i * 3 + 2] / n) as f32);
        }

        DecodedImage {
            width: tw,
            height: th,
            data,
        }
    }
}

/// Decode an image from a file path, dispatching on extension.
pub fn decode_image<P: AsRef<Path>>(path: P) -> Result<DecodedImage, String> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or_else(|| "No file extension found".to_string())?;

    match extension.as_str() {
        "png" => decode_png(path),
        "tif" | "tiff" => decode_tiff(path),
        _ => Err(format!("Unsupported file format: {}", extension)),
    }
}

fn decode_png(path: &Path) -> Result<DecodedImage, String> {
    let file = File::open(path).map_err(|e| format!("Failed to open PNG file: {}", e))?;
    let decoder = png::Decoder::new(BufReader::new(file));
    let mut reader = decoder
        .read_info()
        .map_err(|e| format!("Failed to read PNG header: {}", e))?;

    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| format!("Failed to decode PNG frame: {}", e))?;
    buf.truncate(info.buffer_size());

    let samples_per_pixel = match info.color_type {
        png::ColorType::Grayscale => 1,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4,
        png::ColorType::Indexed => {
            return Err("Indexed PNG images are not supported".to_string());
        }
    };

    let samples: Vec<f32> = match info.bit_depth {
        png::BitDepth::Eight => buf.iter().map(|&v| v as f32 / 255.0).collect(),
        png::BitDepth::Sixteen => buf
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]) as f32 / 65535.0)
            .collect(),
        other => {
            return Err(format!("Unsupported PNG bit depth: {:?}", other));
        }
    };

    expand_to_rgb(&samples, samples_per_pixel, info.width, info.height)
}

fn decode_tiff(path: &Path) -> Result<DecodedImage, String> {
    let file = File::open(path).map_err(|e| format!("Failed to open TIFF file: {}", e))?;
    let mut decoder = tiff::decoder::Decoder::new(BufReader::new(file))
        .map_err(|e| format!("Failed to read TIFF header: {}", e))?;

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| format!("Failed to read TIFF dimensions: {}", e))?;
    let color_type = decoder
        .colortype()
        .map_err(|e| format!("Failed to read TIFF color type: {}", e))?;

    let samples_per_pixel = match color_type {
        tiff::ColorType::Gray(_) => 1,
        tiff::ColorType::GrayA(_) => 2,
        tiff::ColorType::RGB(_) => 3,
        tiff::ColorType::RGBA(_) => 4,
        other => {
            return Err(format!("Unsupported TIFF color type: {:?}", other));
        }
    };

    let result = decoder
        .read_image()
        .map_err(|e| format!("Failed to decode TIFF image: {}", e))?;

    let samples: Vec<f32> = match result {
        tiff::decoder::DecodingResult::U8(buf) => {
            buf.iter().map(|&v| v as f32 / 255.0).collect()
        }
        tiff::decoder::DecodingResult::U16(buf) => {
            buf.iter().map(|&v| v as f32 / 65535.0).collect()
        }
        tiff::decoder::DecodingResult::F32(buf) => buf,
        other => {
            return Err(format!(
                "Unsupported TIFF sample format: {:?}",
                std::mem::discriminant(&other)
            ));
        }
    };

    expand_to_rgb(&samples, samples_per_pixel, width, height)
}

/// Expand gray / gray-alpha / RGBA sample streams to plain RGB.
fn expand_to_rgb(
    samples: &[f32],
    samples_per_pixel: usize,
    width: u32,
    height: u32,
) -> Result<DecodedImage, String> {
    let pixel_count = (width as usize) * (height as usize);
    if samples.len() < pixel_count * samples_per_pixel {
        return Err(format!(
            "Sample buffer too short: {} for {}x{} with {} samples/pixel",
            samples.len(),
            width,
            height,
            samples_per_pixel
        ));
    }

    let mut data = Vec::with_capacity(pixel_count * 3);
    for px in samples.chunks_exact(samples_per_pixel).take(pixel_count) {
        match samples_per_pixel {
            1 | 2 => {
                data.push(px[0]);
                data.push(px[0]);
                data.push(px[0]);
            }
            _ => {
                data.push(px[0]);
                data.push(px[1]);
                data.push(px[2]);
            }
        }
    }

    DecodedImage::from_rgb(width, height, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_image(width: u32, height: u32) -> DecodedImage {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = (x + y) as f32 / (width + height) as f32;
                data.extend_from_slice(&[v, v * 0.5, 1.0 - v]);
            }
        }
        DecodedImage::from_rgb(width, height, data).unwrap()
    }

    #[test]
    fn test_from_rgb_rejects_wrong_length() {
        assert!(DecodedImage::from_rgb(2, 2, vec![0.0; 11]).is_err());
        assert!(DecodedImage::from_rgb(2, 2, vec![0.0; 12]).is_ok());
    }

    #[test]
    fn test_downscale_bounds_long_side() {
        let img = gradient_image(400, 200);
        let small = img.downscale_to(128);
        assert_eq!(small.long_side(), 128);
        assert_eq!(small.width, 128);
        assert_eq!(small.height, 64);
        assert_eq!(small.data.len(), (small.width * small.height * 3) as usize);
    }

    #[test]
    fn test_downscale_noop_when_already_small() {
        let img = gradient_image(100, 60);
        let same = img.downscale_to(128);
        assert_eq!(same.width, 100);
        assert_eq!(same.height, 60);
        assert_eq!(same.data, img.data);
    }

    #[test]
    fn test_downscale_preserves_flat_color() {
        let img = DecodedImage::from_rgb(64, 64, vec![0.25; 64 * 64 * 3]).unwrap();
        let small = img.downscale_to(16);
        for &v in &small.data {
            assert!((v - 0.25).abs() < 1e-5);
        }
    }

    #[test]
    fn test_expand_gray_to_rgb() {
        let img = expand_to_rgb(&[0.1, 0.9], 1, 2, 1).unwrap();
        assert_eq!(img.data, vec![0.1, 0.1, 0.1, 0.9, 0.9, 0.9]);
    }

    #[test]
    fn test_expand_rgba_drops_alpha() {
        let img = expand_to_rgb(&[0.1, 0.2, 0.3, 1.0], 4, 1, 1).unwrap();
        assert_eq!(img.data, vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_decode_unknown_extension() {
        assert!(decode_image("photo.webp").is_err());
        assert!(decode_image("noextension").is_err());
    }
}
