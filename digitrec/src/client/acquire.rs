//! Turns a drawing or an uploaded file into a 28x28 grayscale digit.

use image::imageops::{self, FilterType};
use image::{GrayImage, ImageFormat};
use ndarray::Array2;
use std::path::Path;

use crate::client::canvas::Canvas;
use crate::client::error::ClientError;
use crate::preprocessing::{flatten, SIDE};

/// Formats the upload path accepts.
pub const UPLOAD_FORMATS: [ImageFormat; 3] = [ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::Bmp];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    Drawing,
    Upload,
}

impl ImageSource {
    /// Whether pixels are inverted before they are sent.
    ///
    /// Only drawings are inverted; uploads go out as-is. The two paths
    /// disagree and this is left unresolved until the expected polarity of
    /// uploaded digits is confirmed.
    pub fn inverts_polarity(self) -> bool {
        matches!(self, ImageSource::Drawing)
    }
}

/// A 28x28 grayscale digit and where it came from.
#[derive(Debug, Clone)]
pub struct DigitImage {
    image: GrayImage,
    source: ImageSource,
}

impl DigitImage {
    /// A blank canvas is still a valid drawing and is sent like any other.
    pub fn from_canvas(canvas: &Canvas) -> Self {
        Self {
            image: shrink(&canvas.render()),
            source: ImageSource::Drawing,
        }
    }

    pub fn from_upload_path(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let bytes = std::fs::read(path)?;
        Self::from_upload_bytes(&bytes)
    }

    pub fn from_upload_bytes(bytes: &[u8]) -> Result<Self, ClientError> {
        let format = image::guess_format(bytes)?;
        if !UPLOAD_FORMATS.contains(&format) {
            return Err(ClientError::UnsupportedFormat(
                format.extensions_str().first().unwrap_or(&"unknown").to_string(),
            ));
        }

        let decoded = image::load_from_memory_with_format(bytes, format)?;
        Ok(Self {
            image: shrink(&decoded.to_luma8()),
            source: ImageSource::Upload,
        })
    }

    pub fn source(&self) -> ImageSource {
        self.source
    }

    /// The pixels that get sent, after the source's polarity rule.
    pub fn normalized(&self) -> GrayImage {
        let mut image = self.image.clone();
        if self.source.inverts_polarity() {
            imageops::invert(&mut image);
        }
        image
    }

    pub fn to_grid(&self) -> Array2<u8> {
        let normalized = self.normalized();
        Array2::from_shape_fn((SIDE, SIDE), |(row, col)| {
            normalized.get_pixel(col as u32, row as u32).0[0]
        })
    }

    /// Row-major pixel values ready for the predict request.
    pub fn to_sample(&self) -> Vec<f32> {
        flatten(&self.to_grid()).into_iter().map(f32::from).collect()
    }

    /// Writes the resized 28x28 grayscale image as a PNG, before any polarity change.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), ClientError> {
        self.image
            .save_with_format(path, ImageFormat::Png)
            .map_err(ClientError::from)
    }
}

fn shrink(image: &GrayImage) -> GrayImage {
    imageops::resize(image, SIDE as u32, SIDE as u32, FilterType::Lanczos3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::{unflatten, PIXELS};
    use image::{Luma, Rgb, RgbImage};
    use std::io::Cursor;

    fn encode(image: &RgbImage, format: ImageFormat) -> Vec<u8> {
        let mut buffer = Vec::new();
        image.write_to(&mut Cursor::new(&mut buffer), format).unwrap();
        buffer
    }

    #[test]
    fn test_upload_is_resized_to_28() {
        let bytes = encode(&RgbImage::new(100, 60), ImageFormat::Png);
        let digit = DigitImage::from_upload_bytes(&bytes).unwrap();

        assert_eq!(digit.source(), ImageSource::Upload);
        assert_eq!(digit.normalized().dimensions(), (28, 28));
        assert_eq!(digit.to_sample().len(), PIXELS);
    }

    #[test]
    fn test_upload_keeps_polarity() {
        let white = RgbImage::from_pixel(56, 56, Rgb([255, 255, 255]));
        for format in UPLOAD_FORMATS {
            let digit = DigitImage::from_upload_bytes(&encode(&white, format)).unwrap();
            assert!(
                digit.to_sample().iter().all(|&p| p > 250.0),
                "{format:?} upload was altered"
            );
        }
    }

    #[test]
    fn test_upload_rejects_other_formats() {
        let bytes = encode(&RgbImage::new(8, 8), ImageFormat::Tiff);
        assert!(matches!(
            DigitImage::from_upload_bytes(&bytes),
            Err(ClientError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_upload_rejects_garbage() {
        assert!(matches!(
            DigitImage::from_upload_bytes(b"definitely not an image"),
            Err(ClientError::Image(_))
        ));
    }

    #[test]
    fn test_drawing_is_inverted() {
        let canvas = Canvas::new(vec![vec![[140.0, 40.0], [140.0, 240.0]]]);
        let digit = DigitImage::from_canvas(&canvas);
        assert_eq!(digit.source(), ImageSource::Drawing);

        let grid = digit.to_grid();
        // Background becomes black, the vertical ink stroke becomes bright.
        assert!(grid[[0, 0]] < 5);
        assert!(grid[[14, 14]] > 200);
    }

    #[test]
    fn test_blank_drawing_is_sent_as_zeros() {
        let digit = DigitImage::from_canvas(&Canvas::default());
        let sample = digit.to_sample();
        assert_eq!(sample.len(), PIXELS);
        assert!(sample.iter().all(|&p| p == 0.0));
    }

    #[test]
    fn test_sample_matches_grid() {
        let canvas = Canvas::new(vec![vec![[20.0, 20.0], [260.0, 260.0]]]);
        let digit = DigitImage::from_canvas(&canvas);

        let grid = digit.to_grid();
        let restored = unflatten(digit.to_sample()).unwrap();
        assert_eq!(restored, grid.mapv(f32::from));
    }

    #[test]
    fn test_drawing_snapshot_is_not_inverted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("digit.png");

        let canvas = Canvas::new(vec![vec![[140.0, 40.0], [140.0, 240.0]]]);
        let digit = DigitImage::from_canvas(&canvas);
        digit.save_png(&path).unwrap();

        let saved = image::open(&path).unwrap().to_luma8();
        // White background and dark ink, as drawn; the sample is the inverse.
        assert!(saved.get_pixel(0, 0).0[0] > 250);
        assert!(saved.get_pixel(14, 14).0[0] < 55);
        assert!(digit.to_grid()[[0, 0]] < 5);
    }

    #[test]
    fn test_save_png_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("digit.png");

        let bytes = encode(&RgbImage::new(28, 28), ImageFormat::Bmp);
        let digit = DigitImage::from_upload_bytes(&bytes).unwrap();
        digit.save_png(&path).unwrap();

        let saved = image::open(&path).unwrap().to_luma8();
        assert_eq!(saved.dimensions(), (28, 28));
        assert_eq!(saved.get_pixel(0, 0), &Luma([0]));
    }
}
