use image::GrayImage;

use crate::client::error::ClientError;

// Darkest to brightest.
const SHADES: [char; 5] = [' ', '.', ':', '*', '#'];

/// The line shown to the user for a prediction attempt.
pub fn render_outcome(outcome: &Result<u8, ClientError>) -> String {
    match outcome {
        Ok(digit) => format!("Predicted Digit: {digit}"),
        Err(ClientError::UnexpectedFormat) => "Unexpected response format".to_string(),
        Err(e) => format!("Prediction failed: {e}"),
    }
}

/// Text preview of a small grayscale image, one character per pixel.
pub fn render_preview(image: &GrayImage) -> String {
    let mut out = String::with_capacity((image.width() as usize + 1) * image.height() as usize);
    for row in image.rows() {
        for pixel in row {
            let level = pixel.0[0] as usize * (SHADES.len() - 1) / 255;
            out.push(SHADES[level]);
        }
        out.push('\n');
    }
    out
}
