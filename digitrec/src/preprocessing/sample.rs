use crate::error::InferenceError;
use ndarray::Array2;

/// Side length of the square digit grid.
pub const SIDE: usize = 28;
/// Number of pixels in a flattened sample.
pub const PIXELS: usize = SIDE * SIDE;
pub const MAX_PIXEL: f32 = 255.0;

/// A validated, flattened 28x28 grayscale digit.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSample {
    pixels: Vec<f32>,
}

impl ImageSample {
    /// Checks the length and range of `pixels` before anything reaches the model.
    pub fn new(pixels: Vec<f32>) -> Result<Self, InferenceError> {
        if pixels.len() != PIXELS {
            return Err(InferenceError::ShapeMismatch {
                expected: PIXELS,
                got: pixels.len(),
            });
        }

        if let Some((index, &value)) = pixels
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0 || **v > MAX_PIXEL)
        {
            return Err(InferenceError::PixelOutOfRange { index, value });
        }

        Ok(Self { pixels })
    }

    pub fn pixels(&self) -> &[f32] {
        &self.pixels
    }

    /// Row-major pixels multiplied by `scale`, laid out for a `[1, 1, 28, 28]` input.
    pub fn scaled(&self, scale: f32) -> Vec<f32> {
        self.pixels.iter().map(|p| p * scale).collect()
    }
}

/// Flattens a grid row by row.
pub fn flatten<T: Copy>(grid: &Array2<T>) -> Vec<T> {
    grid.iter().copied().collect()
}

/// Inverse of [`flatten`] for a 28x28 grid.
pub fn unflatten<T>(pixels: Vec<T>) -> Result<Array2<T>, InferenceError> {
    if pixels.len() != PIXELS {
        return Err(InferenceError::ShapeMismatch {
            expected: PIXELS,
            got: pixels.len(),
        });
    }
    Ok(Array2::from_shape_vec((SIDE, SIDE), pixels)?)
}
