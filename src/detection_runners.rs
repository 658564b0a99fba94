pub mod detection_session;
pub mod inference_process;
pub mod ort_detector;

pub use detection_session::*;
pub use ort_detector::*;
