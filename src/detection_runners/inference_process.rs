use crate::common::{InferenceDevice, ModelConfig, SenseImage, TensorShape};
use crate::detection_runners::image_ops;
use crate::detection_runners::input_wrapper::X;

/// A loaded model that turns an input tensor into a raw detection tensor.
///
/// The session only relies on the declared shapes and on `inference` producing
/// a `[1, num_channels, num_elements]` tensor; what runs underneath is opaque.
pub trait InferenceProcess: Sized {
    /// Loads the model described by `config`.
    fn new(config: &ModelConfig) -> anyhow::Result<Self>;

    /// Declared image input dimensions, non-positive for dynamic axes.
    fn input_dims(&self) -> &[i64];

    /// Declared detection output dimensions, non-positive for dynamic axes.
    fn output_dims(&self) -> &[i64];

    /// Pre-process the input image. Defaults to resize + `[0, 1]` scaling.
    fn preprocess(&self, image: &SenseImage, shape: &TensorShape) -> anyhow::Result<X> {
        image_ops::preprocess(image, shape)
    }

    /// Executes the model on the preprocessed data.
    fn inference(&mut self, xs: X) -> anyhow::Result<X>;

    fn device(&self) -> InferenceDevice {
        InferenceDevice::CPU
    }
}
