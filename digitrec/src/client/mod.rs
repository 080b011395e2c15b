pub mod acquire;
pub mod api;
pub mod canvas;
pub mod error;
pub mod render;

pub use acquire::{DigitImage, ImageSource};
pub use api::PredictClient;
pub use canvas::Canvas;
pub use error::ClientError;
