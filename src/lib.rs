//! Object detector post-processing: decodes a raw detection tensor into
//! classified, non-overlapping bounding boxes.

mod utils;
pub mod common;
pub mod data;
pub mod detection_processing;
pub mod detection_runners;
pub mod detectors;

use crate::common::{DetectError, DetectionOutcome, ModelConfig, SenseImage};
use crate::detection_runners::{DetectionSession, OrtDetector};

pub use crate::detection_processing::decode;
pub use crate::detection_runners::nms::suppress;

/// Builds an ONNX Runtime backed session from `model_details` and sets it up.
pub fn init_detector(model_details: &ModelConfig) -> Result<DetectionSession<OrtDetector>, DetectError> {
    log::info!("Initializing ORT session with ({}) execution provider", model_details.inference_device);
    let mut session = DetectionSession::new(model_details.clone());
    session.setup()?;
    Ok(session)
}

pub fn run_detection(session: &mut DetectionSession<OrtDetector>, image: &SenseImage) -> DetectionOutcome {
    let outcome = session.detect(image);
    if let DetectionOutcome::Detections { boxes, elapsed } = &outcome {
        log::debug!("Detected {} objects in {:?}", boxes.len(), elapsed);
    }
    outcome
}
