use anyhow::Result;
use crate::common::{InferenceDevice, ModelConfig};
use crate::detection_runners::inference_process::InferenceProcess;
use crate::detection_runners::input_wrapper::X;
use crate::detection_runners::ort_detector::OrtEngine;

/// Single-output detection model executed by ONNX Runtime.
#[derive(Debug)]
pub struct OrtDetector {
    engine: OrtEngine,
}

impl InferenceProcess for OrtDetector {
    fn new(config: &ModelConfig) -> Result<Self> {
        let engine = OrtEngine::new(config)?;
        Ok(Self { engine })
    }

    fn input_dims(&self) -> &[i64] {
        self.engine.in_dims()
    }

    fn output_dims(&self) -> &[i64] {
        self.engine.out_dims()
    }

    fn inference(&mut self, xs: X) -> Result<X> {
        self.engine.engine_run(xs)
    }

    fn device(&self) -> InferenceDevice {
        *self.engine.device()
    }
}
