use crate::error::InferenceError;
use crate::model::loader;
use crate::preprocessing::{ImageSample, SIDE};
use ort::session::Session;
use ort::value::Tensor;
use std::path::Path;
use std::sync::Mutex;

/// Number of digit classes the model scores.
pub const NUM_CLASSES: usize = 10;

/// Something that turns a validated sample into a digit label.
///
/// Implementations are loaded once and shared read-only by every request.
pub trait Classifier: Send + Sync {
    fn predict(&self, sample: &ImageSample) -> Result<u8, InferenceError>;
}

/// Digit classifier backed by an ONNX Runtime session.
///
/// The model takes a `[1, 1, 28, 28]` f32 input and yields `[1, 10]` scores.
pub struct OnnxClassifier {
    // `Session::run` needs exclusive access.
    session: Mutex<Session>,
    input_name: String,
    input_scale: f32,
}

impl OnnxClassifier {
    pub fn load(model_path: impl AsRef<Path>, input_scale: f32) -> Result<Self, InferenceError> {
        let session = loader::load_model(model_path)?;
        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| InferenceError::InvalidModel("model declares no inputs".into()))?;

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            input_scale,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, sample: &ImageSample) -> Result<u8, InferenceError> {
        let shape = [1i64, 1, SIDE as i64, SIDE as i64];
        let data = sample.scaled(self.input_scale);
        let input_value = Tensor::from_array((shape, data.into_boxed_slice()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| InferenceError::SessionPoisoned)?;
        let outputs = session.run(ort::inputs![self.input_name.as_str() => input_value])?;

        let (_, scores) = outputs[0].try_extract_tensor::<f32>()?;
        if scores.len() != NUM_CLASSES {
            return Err(InferenceError::UnexpectedOutput(format!(
                "expected {} scores, got {}",
                NUM_CLASSES,
                scores.len()
            )));
        }

        argmax(scores)
            .map(|digit| digit as u8)
            .ok_or_else(|| InferenceError::UnexpectedOutput("empty score vector".into()))
    }
}

/// Index of the highest score. NaN scores never win.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    scores
        .iter()
        .enumerate()
        .filter(|(_, s)| !s.is_nan())
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)
}
