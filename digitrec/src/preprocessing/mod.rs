pub mod sample;

pub use sample::{flatten, unflatten, ImageSample, PIXELS, SIDE};
