mod bounding_box;
mod detection_outcome;
mod inference_device;
mod label_table;
mod model_config;
mod sense_image;
mod tensor_shape;
pub mod geometry;

pub use bounding_box::*;
pub use detection_outcome::*;
pub use inference_device::*;
pub use label_table::*;
pub use model_config::*;
pub use sense_image::*;
pub use tensor_shape::*;
