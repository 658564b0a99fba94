use std::path::Path;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use crate::common::inference_device::InferenceDevice;

/// Detector settings, fixed once handed to a session.
///
/// Reconfiguring means building a new session from a new config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub weights_path: String,
    /// Optional path to a dynamically loaded ONNX Runtime library.
    pub ort_lib_path: String,
    pub labels_path: String,
    /// Inline class names; when set the label file is not read.
    pub names: Option<Vec<String>>,
    pub inference_device: InferenceDevice,
    pub conf_threshold: f32,
    pub iou_threshold: f32,
    /// Keep at most this many boxes after suppression, 0 keeps all.
    pub max_results: usize,
    pub num_threads: usize,
    pub profile: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            weights_path: "model.onnx".to_string(),
            ort_lib_path: String::new(),
            labels_path: "labels.txt".to_string(),
            names: None,
            inference_device: InferenceDevice::CPU,
            conf_threshold: 0.5,
            iou_threshold: 0.5,
            max_results: 5,
            num_threads: 4,
            profile: false,
        }
    }
}

impl ModelConfig {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("Failed to parse model config")
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read model config {}", path.display()))?;
        Self::from_json_str(&text)
    }

    pub fn with_model(mut self, weights_path: &str) -> Self {
        self.weights_path = weights_path.to_string();
        self
    }

    pub fn with_ort_lib_path(mut self, ort_lib_path: &str) -> Self {
        self.ort_lib_path = ort_lib_path.to_string();
        self
    }

    pub fn with_labels(mut self, labels_path: &str) -> Self {
        self.labels_path = labels_path.to_string();
        self
    }

    pub fn with_names(mut self, names: &[&str]) -> Self {
        self.names = Some(names.iter().map(|x| x.to_string()).collect::<Vec<String>>());
        self
    }

    pub fn with_device(mut self, device: InferenceDevice) -> Self {
        self.inference_device = device;
        self
    }

    pub fn with_conf_threshold(mut self, x: f32) -> Self {
        self.conf_threshold = x;
        self
    }

    pub fn with_iou_threshold(mut self, x: f32) -> Self {
        self.iou_threshold = x;
        self
    }

    pub fn with_max_results(mut self, n: usize) -> Self {
        self.max_results = n;
        self
    }

    pub fn with_num_threads(mut self, n: usize) -> Self {
        self.num_threads = n;
        self
    }

    pub fn with_profile(mut self, profile: bool) -> Self {
        self.profile = profile;
        self
    }

    pub fn summary(&self) -> String {
        format!("Weights File Path: {}\n\
        Labels Path: {}\n\
        OnnxRuntime Lib Path: {}\n\
        Inference Device: {}\n\
        Threads: {}\n\
        Detection Threshold: {} | IoU Threshold: {} | Max Results: {}",
                self.weights_path, self.labels_path, self.ort_lib_path,
                self.inference_device, self.num_threads,
                self.conf_threshold, self.iou_threshold, self.max_results)
    }
}
