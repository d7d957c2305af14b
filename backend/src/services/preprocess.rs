//! Image preprocessing for the leaf classifiers
//!
//! Produces an NHWC tensor of shape (1, 180, 180, 3) with values in [0, 1].

use std::path::Path;

use image::{imageops::FilterType, RgbImage};
use ndarray::Array4;

use crate::error::{AppError, AppResult};

/// Side length the classifiers were trained on
pub const INPUT_SIZE: u32 = 180;

/// Decodes, resizes and scales leaf images
#[derive(Debug, Clone, Copy)]
pub struct ImagePreprocessor {
    width: u32,
    height: u32,
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self::new(INPUT_SIZE, INPUT_SIZE)
    }
}

impl ImagePreprocessor {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Tensor shape produced by this preprocessor
    pub fn output_shape(&self) -> [usize; 4] {
        [1, self.height as usize, self.width as usize, 3]
    }

    /// Preprocess an in-memory image
    pub fn preprocess_bytes(&self, bytes: &[u8]) -> AppResult<Array4<f32>> {
        let image = decode(bytes)?;
        Ok(self.to_tensor(&image))
    }

    /// Preprocess an image file resolved by the caller
    pub fn preprocess_file(&self, path: &Path) -> AppResult<Array4<f32>> {
        if !path.exists() {
            return Err(AppError::ImageDecode(format!(
                "Image file not found: {}",
                path.display()
            )));
        }
        let bytes = std::fs::read(path).map_err(|e| {
            AppError::ImageDecode(format!("Failed to read {}: {}", path.display(), e))
        })?;
        self.preprocess_bytes(&bytes)
    }

    /// Resize to the fixed input size, ignoring aspect ratio, and scale by 1/255
    pub fn to_tensor(&self, image: &RgbImage) -> Array4<f32> {
        let resized = image::imageops::resize(image, self.width, self.height, FilterType::Triangle);

        Array4::from_shape_fn(self.output_shape(), |(_, y, x, c)| {
            resized.get_pixel(x as u32, y as u32)[c] as f32 / 255.0
        })
    }
}

/// Decode any supported format into RGB8.
///
/// The decoders always yield RGB channel order, so no BGR swap is needed.
fn decode(bytes: &[u8]) -> AppResult<RgbImage> {
    if bytes.is_empty() {
        return Err(AppError::ImageDecode("image data is empty".to_string()));
    }

    let image = image::load_from_memory(bytes).map_err(|e| {
        AppError::ImageDecode(format!(
            "The file may be corrupted or not a valid image format: {}",
            e
        ))
    })?;

    Ok(image.into_rgb8())
}
