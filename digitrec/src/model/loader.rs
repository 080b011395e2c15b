use crate::error::InferenceError;
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::Path;
use tracing::{debug, info};

// Initialize the global environment for ORT (only needed once)
pub fn init_ort() -> Result<(), InferenceError> {
    ort::init().with_name("digitrec").commit()?;
    Ok(())
}

/// Loads an ONNX classifier from disk and creates an inference session.
///
/// # Arguments
/// * `model_path` - Path to the .onnx file
pub fn load_model(model_path: impl AsRef<Path>) -> Result<Session, InferenceError> {
    let path = model_path.as_ref();
    if !path.exists() {
        return Err(InferenceError::ModelNotFound(path.display().to_string()));
    }

    // A 28x28 CNN gains nothing from wide intra-op parallelism.
    let session = Session::builder()?
        .with_optimization_level(GraphOptimizationLevel::Level3)?
        .with_intra_threads(1)?
        .commit_from_file(path)?;

    info!(model = %path.display(), "loaded classifier");
    for (i, input) in session.inputs.iter().enumerate() {
        debug!(index = i, name = %input.name, input_type = ?input.input_type, "model input");
    }

    Ok(session)
}
