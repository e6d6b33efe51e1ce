//! Image export: writes image streams to files and returns their names.

use std::fs;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use flate2::read::ZlibDecoder;
use image::{ExtendedColorType, ImageFormat};

use crate::layout::LTImage;
use crate::model::ImageStream;
use crate::{PdfError, Result};

/// Upper bound on decompressed image data.
const MAX_IMAGE_DECODED_BYTES: usize = 256 * 1024 * 1024;

/// Receives images during serialization and returns a reference name for
/// the exported asset.
pub trait ImageExporter {
    fn export_image(&mut self, image: &LTImage) -> Result<String>;
}

/// Image writer for exporting PDF images to files in one directory.
///
/// File names are the sanitized image name plus a running sequence number.
/// Encoded formats are written as-is (`.jpg`, `.jp2`, `.jb2`); 8-bit gray
/// or RGB Flate data becomes PNG; anything else is written raw as `.bin`.
#[derive(Debug)]
pub struct ImageWriter {
    outdir: PathBuf,
    seq: usize,
}

impl ImageWriter {
    pub fn new(outdir: impl AsRef<Path>) -> Result<Self> {
        let outdir = outdir.as_ref().to_path_buf();
        fs::create_dir_all(&outdir)?;
        Ok(Self { outdir, seq: 0 })
    }

    pub fn outdir(&self) -> &Path {
        &self.outdir
    }

    fn next_filename(&mut self, name: &str, ext: &str) -> String {
        let base = name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect::<String>();
        let base = if base.is_empty() {
            "image".to_string()
        } else {
            base
        };
        self.seq += 1;
        format!("{}_{}{}", base, self.seq, ext)
    }

    fn write_file(&mut self, name: &str, ext: &str, data: &[u8]) -> Result<String> {
        let filename = self.next_filename(name, ext);
        fs::write(self.outdir.join(&filename), data)?;
        Ok(filename)
    }

    /// Export a single image stream under `name`.
    pub fn export_stream(&mut self, name: &str, stream: &ImageStream) -> Result<String> {
        match stream.last_filter() {
            Some(f) if is_dct_decode(f) => return self.write_file(name, ".jpg", &stream.data),
            Some(f) if is_jpx_decode(f) => return self.write_file(name, ".jp2", &stream.data),
            Some(f) if is_jbig2_decode(f) => return self.write_file(name, ".jb2", &stream.data),
            _ => {}
        }

        let pixels = match stream.filters.as_slice() {
            [] => Some(stream.data.to_vec()),
            [f] if is_flate_decode(f) => match flate_decode_limited(&stream.data) {
                Ok(data) => Some(data),
                Err(err) => {
                    tracing::debug!(name, error = %err, "image data not decodable");
                    None
                }
            },
            _ => None,
        };
        let Some(pixels) = pixels else {
            return self.write_file(name, ".bin", &stream.data);
        };

        let color = if stream.bits != 8 {
            None
        } else if stream.colorspace.iter().any(|c| is_device_gray_name(c)) {
            Some(ExtendedColorType::L8)
        } else if stream.colorspace.iter().any(|c| is_device_rgb_name(c)) {
            Some(ExtendedColorType::Rgb8)
        } else {
            None
        };
        match color {
            Some(color) if pixels.len() == expected_len(stream, color) => {
                let png = encode_png(&pixels, stream.width, stream.height, color)?;
                self.write_file(name, ".png", &png)
            }
            _ => self.write_file(name, ".bin", &pixels),
        }
    }
}

impl ImageExporter for ImageWriter {
    fn export_image(&mut self, image: &LTImage) -> Result<String> {
        self.export_stream(&image.name, &image.stream)
    }
}

fn expected_len(stream: &ImageStream, color: ExtendedColorType) -> usize {
    let channels = match color {
        ExtendedColorType::Rgb8 => 3,
        _ => 1,
    };
    stream.width as usize * stream.height as usize * channels
}

fn encode_png(pixels: &[u8], width: u32, height: u32, color: ExtendedColorType) -> Result<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    image::write_buffer_with_format(&mut out, pixels, width, height, color, ImageFormat::Png)
        .map_err(|e| PdfError::ImageExport(format!("PNG encoding failed: {}", e)))?;
    Ok(out.into_inner())
}

fn flate_decode_limited(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(data).take(MAX_IMAGE_DECODED_BYTES as u64 + 1);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    if out.len() > MAX_IMAGE_DECODED_BYTES {
        return Err(PdfError::ImageExport(format!(
            "decoded data exceeds {} bytes",
            MAX_IMAGE_DECODED_BYTES
        )));
    }
    Ok(out)
}

const fn is_dct_decode(name: &str) -> bool {
    name.eq_ignore_ascii_case("DCTDecode") || name.eq_ignore_ascii_case("DCT")
}

const fn is_jpx_decode(name: &str) -> bool {
    name.eq_ignore_ascii_case("JPXDecode") || name.eq_ignore_ascii_case("JPX")
}

const fn is_jbig2_decode(name: &str) -> bool {
    name.eq_ignore_ascii_case("JBIG2Decode")
}

const fn is_flate_decode(name: &str) -> bool {
    name.eq_ignore_ascii_case("FlateDecode") || name.eq_ignore_ascii_case("Fl")
}

/// Check if name matches a colorspace (full name or inline abbreviation).
fn matches_colorspace(name: &str, full_name: &str, abbreviation: &str) -> bool {
    name == full_name || name.eq_ignore_ascii_case(abbreviation)
}

fn is_device_gray_name(name: &str) -> bool {
    matches_colorspace(name, "DeviceGray", "G")
}

fn is_device_rgb_name(name: &str) -> bool {
    matches_colorspace(name, "DeviceRGB", "RGB")
}
