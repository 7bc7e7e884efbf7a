//! Decoding of the segmentation image shown on the results screen.

use std::path::Path;

/// RGBA8 pixels ready to be uploaded as a texture.
#[derive(Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// `[width, height]` in pixels.
    pub size: [usize; 2],
    pub rgba: Vec<u8>,
}

impl std::fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedImage")
            .field("size", &self.size)
            .field("bytes", &self.rgba.len())
            .finish()
    }
}

impl DecodedImage {
    /// Convert into an egui image for texture upload.
    pub fn to_color_image(&self) -> egui::ColorImage {
        egui::ColorImage::from_rgba_unmultiplied(self.size, &self.rgba)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ImageLoadError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    #[error("Image download failed: {0}")]
    Fetch(#[from] crate::analysis::AnalysisError),
    #[error("Unsupported image data: {0}")]
    Decode(#[from] image::ImageError),
}

/// Decode PNG/JPEG bytes.
pub fn decode(bytes: &[u8]) -> Result<DecodedImage, ImageLoadError> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(DecodedImage {
        size,
        rgba: rgba.into_raw(),
    })
}

/// Read and decode a local image file.
pub fn load_file(path: &Path) -> Result<DecodedImage, ImageLoadError> {
    let bytes = std::fs::read(path).map_err(|source| ImageLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    decode(&bytes)
}

#[cfg(test)]
pub(crate) fn encode_test_png(width: u32, height: u32) -> Vec<u8> {
    let mut img = image::RgbaImage::new(width, height);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        *pixel = image::Rgba([(x * 40) as u8, (y * 40) as u8, 200, 255]);
    }
    let mut bytes = std::io::Cursor::new(Vec::new());
    img.write_to(&mut bytes, image::ImageFormat::Png)
        .expect("encode png");
    bytes.into_inner()
}
