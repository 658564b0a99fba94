use anyhow::Result;
use half::f16;
use ort::{
    execution_providers::{ExecutionProvider,
                          CPUExecutionProvider,
                          CUDAExecutionProvider,
                          TensorRTExecutionProvider,
                          CoreMLExecutionProvider,
                          NNAPIExecutionProvider},
    session::builder::{GraphOptimizationLevel, SessionBuilder},
    session::{Session, SessionInputValue},
    tensor::TensorElementType,
    value::{DynValue, Tensor, ValueType},
};
use crate::common::{InferenceDevice, ModelConfig};
use crate::detection_runners::input_wrapper::X;

pub(crate) const CROSS_MARK: &str = "❌";

/// Name, element type and declared dimensions of one model input or output.
#[derive(Debug, Clone)]
pub struct OrtTensorAttr {
    pub name: String,
    pub dtype: Option<TensorElementType>,
    pub dims: Vec<i64>,
}

/// ONNXRuntime Backend
#[derive(Debug)]
pub struct OrtEngine {
    session: Session,
    device: InferenceDevice,
    input_attr: OrtTensorAttr,
    output_attr: OrtTensorAttr,
}

impl OrtEngine {
    pub fn new(config: &ModelConfig) -> Result<Self> {
        if !std::path::Path::new(&config.weights_path).exists() {
            anyhow::bail!("Model file {} not found", config.weights_path);
        }

        let ort_init = if config.ort_lib_path.is_empty() {
            ort::init()
        } else {
            ort::init_from(&config.ort_lib_path)
        };
        if let Err(e) = ort_init.with_name("sense_detect").commit() {
            return Err(anyhow::anyhow!("Failed to commit ORT: {:?}", e));
        }

        let mut builder = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(config.num_threads.max(1))?;

        let mut device = config.inference_device;
        let accelerated = match device {
            InferenceDevice::TensorRT(device_id) => {
                Self::build_trt(&mut builder, device_id)?;
                Ok(())
            }
            InferenceDevice::CUDA(device_id) => Self::register_provider(
                &mut builder,
                CUDAExecutionProvider::default().with_device_id(device_id as i32),
                "CUDA",
            ),
            InferenceDevice::CoreML(_) => Self::register_provider(&mut builder, CoreMLExecutionProvider::default(), "CoreML"),
            InferenceDevice::NNAPI => Self::register_provider(&mut builder, NNAPIExecutionProvider::default(), "NNAPI"),
            InferenceDevice::CPU => Ok(()),
        };
        if let Err(err) = accelerated {
            log::warn!("{err}, Using cpu");
            device = InferenceDevice::CPU;
        }
        if device == InferenceDevice::CPU {
            Self::register_provider(&mut builder, CPUExecutionProvider::default(), "CPU")?;
        }

        let session = builder.commit_from_file(&config.weights_path)?;

        let input_attr = match session.inputs.first() {
            Some(input) => Self::tensor_attr(&input.name, &input.input_type),
            None => anyhow::bail!("Model {} declares no inputs", config.weights_path),
        };
        let output_attr = match session.outputs.first() {
            Some(output) => Self::tensor_attr(&output.name, &output.output_type),
            None => anyhow::bail!("Model {} declares no outputs", config.weights_path),
        };

        log::info!(
            "Backend: ONNXRuntime | Device: {} | Input: {} {:?} | Output: {} {:?}",
            device, input_attr.name, input_attr.dims, output_attr.name, output_attr.dims,
        );

        Ok(Self {
            session,
            device,
            input_attr,
            output_attr,
        })
    }

    fn tensor_attr(name: &str, value_type: &ValueType) -> OrtTensorAttr {
        match value_type {
            ValueType::Tensor { ty, dimensions, .. } => OrtTensorAttr {
                name: name.to_string(),
                dtype: Some(*ty),
                dims: dimensions.clone(),
            },
            _ => OrtTensorAttr {
                name: name.to_string(),
                dtype: None,
                dims: vec![],
            },
        }
    }

    /// Registers `ep` on `builder`, failing when the provider is missing from the runtime.
    fn register_provider<E: ExecutionProvider>(builder: &mut SessionBuilder, ep: E, label: &str) -> Result<()> {
        if !ep.is_available()? {
            anyhow::bail!("{CROSS_MARK} {label} execution provider not available");
        }
        ep.register(builder)
            .map_err(|err| anyhow::anyhow!("{CROSS_MARK} {label} initialization failed: {:?}", err))
    }

    fn build_trt(builder: &mut SessionBuilder, device_id: usize) -> Result<()> {
        let trt = TensorRTExecutionProvider::default()
            .with_device_id(device_id as i32)
            .with_engine_cache(true)
            .with_engine_cache_path("trt-cache");
        Self::register_provider(builder, trt, "TensorRT")?;
        log::info!("First run with TensorRT builds the engine cache, this can be slow");
        Ok(())
    }

    fn tensor_preprocess(x: X, dtype: Option<TensorElementType>) -> Result<DynValue> {
        let x = match dtype {
            Some(TensorElementType::Float16) => Tensor::from_array(x.0.mapv(f16::from_f32))?.into_dyn(),
            Some(TensorElementType::Float32) | None => Tensor::from_array(x.0)?.into_dyn(),
            Some(dtype) => anyhow::bail!("Unsupported ort input type: {:?}", dtype),
        };
        Ok(x)
    }

    fn tensor_postprocess(x: &DynValue, dtype: Option<TensorElementType>) -> Result<X> {
        let y = match dtype {
            Some(TensorElementType::Float16) => x.try_extract_tensor::<f16>()?.mapv(f16::to_f32),
            Some(TensorElementType::Float32) | None => x.try_extract_tensor::<f32>()?.into_owned(),
            Some(dtype) => anyhow::bail!("Unsupported ort output type: {:?}", dtype),
        };
        Ok(X::from(y))
    }

    pub fn engine_run(&mut self, xs: X) -> Result<X> {
        let input = Self::tensor_preprocess(xs, self.input_attr.dtype)?;
        let inputs = vec![SessionInputValue::from(input)];

        let outputs = self.session.run(&inputs[..])?;

        Self::tensor_postprocess(&outputs[self.output_attr.name.as_str()], self.output_attr.dtype)
    }

    pub fn in_dims(&self) -> &[i64] {
        &self.input_attr.dims
    }

    pub fn out_dims(&self) -> &[i64] {
        &self.output_attr.dims
    }

    pub fn device(&self) -> &InferenceDevice {
        &self.device
    }
}
