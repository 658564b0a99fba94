use serde::{Deserialize, Serialize};

/// Execution backend the model runs on. Only the inference step is affected;
/// decoding and suppression never look at it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InferenceDevice {
    #[default] CPU,
    CUDA(usize),
    TensorRT(usize),
    CoreML(usize),
    NNAPI,
}

// Hardcoded device names. Storing the "proper" spelling and the lowercase version.
const CPU: [&str; 2] = ["CPU", "cpu"];
const CUDA: [&str; 2] = ["CUDA", "cuda"];
const TENSOR_RT: [&str; 2] = ["TensorRT", "tensorrt"];
const CORE_ML: [&str; 2] = ["CoreML", "coreml"];
const NNAPI: [&str; 2] = ["NNAPI", "nnapi"];

impl InferenceDevice {
    /// Parses a device name case-insensitively. `gpu` is an alias for CUDA.
    pub fn from_str(device: &str, device_id: usize) -> Option<Self> {
        match device.trim().to_lowercase().as_str() {
            "cpu" => Some(InferenceDevice::CPU),
            "cuda" | "gpu" => Some(InferenceDevice::CUDA(device_id)),
            "tensorrt" => Some(InferenceDevice::TensorRT(device_id)),
            "coreml" => Some(InferenceDevice::CoreML(device_id)),
            "nnapi" => Some(InferenceDevice::NNAPI),
            _ => None,
        }
    }

    pub fn str(&self) -> &'static str {
        self.names()[0]
    }

    pub fn str_lowercase(&self) -> &'static str {
        self.names()[1]
    }

    pub fn is_accelerator(&self) -> bool {
        !matches!(self, InferenceDevice::CPU)
    }

    pub fn all_inference_devices() -> Vec<String> {
        vec![
            InferenceDevice::CPU.str_lowercase().to_string(),
            InferenceDevice::CUDA(0).str_lowercase().to_string(),
            InferenceDevice::TensorRT(0).str_lowercase().to_string(),
            InferenceDevice::CoreML(0).str_lowercase().to_string(),
            InferenceDevice::NNAPI.str_lowercase().to_string(),
        ]
    }

    pub fn is_valid_inference_device(inference_device: &str) -> bool {
        InferenceDevice::from_str(inference_device, 0).is_some()
    }

    fn names(&self) -> [&'static str; 2] {
        match self {
            InferenceDevice::CPU => CPU,
            InferenceDevice::CUDA(_) => CUDA,
            InferenceDevice::TensorRT(_) => TENSOR_RT,
            InferenceDevice::CoreML(_) => CORE_ML,
            InferenceDevice::NNAPI => NNAPI,
        }
    }
}

impl std::fmt::Display for InferenceDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InferenceDevice::CUDA(id) | InferenceDevice::TensorRT(id) | InferenceDevice::CoreML(id) => {
                write!(f, "{}:{}", self.str(), id)
            }
            _ => write!(f, "{}", self.str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!(InferenceDevice::from_str("CPU", 0), Some(InferenceDevice::CPU));
        assert_eq!(InferenceDevice::from_str("Gpu", 1), Some(InferenceDevice::CUDA(1)));
        assert_eq!(InferenceDevice::from_str("nnapi", 3), Some(InferenceDevice::NNAPI));
        assert_eq!(InferenceDevice::from_str("tpu", 0), None);
        assert!(InferenceDevice::is_valid_inference_device("TensorRT"));
    }

    #[test]
    fn display_includes_device_id() {
        assert_eq!(InferenceDevice::CUDA(2).to_string(), "CUDA:2");
        assert_eq!(InferenceDevice::NNAPI.to_string(), "NNAPI");
        assert!(!InferenceDevice::CPU.is_accelerator());
        assert_eq!(InferenceDevice::all_inference_devices().len(), 5);
    }
}
