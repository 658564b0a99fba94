//! Default image preprocessing: nearest-neighbour resize to the model input,
//! scaling to `[0, 1]` and NHWC/NCHW layout.

use anyhow::Result;
use fast_image_resize::{ResizeAlg, ResizeOptions, Resizer};
use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};
use ndarray::{Array, IxDyn};
use rayon::prelude::*;
use crate::common::{InputLayout, SenseImage, TensorShape};
use crate::detection_runners::input_wrapper::X;

const INPUT_MEAN: f32 = 0.;
const INPUT_STANDARD_DEVIATION: f32 = 255.;

/// Turns a pixel buffer into the model's input tensor.
pub fn preprocess(image: &SenseImage, shape: &TensorShape) -> Result<X> {
    if image.is_empty() {
        anyhow::bail!("Cannot preprocess an empty {}x{} image", image.width(), image.height());
    }

    let resized = resize_image(&image.image, shape.width as u32, shape.height as u32);
    let normalized: Vec<f32> = resized
        .as_raw()
        .par_iter()
        .map(|x| (*x as f32 - INPUT_MEAN) / INPUT_STANDARD_DEVIATION)
        .collect();

    let nhwc = Array::from_shape_vec(IxDyn(&[1, shape.height, shape.width, 3]), normalized)?;
    let input = match shape.layout {
        InputLayout::Nhwc => nhwc,
        InputLayout::Nchw => nhwc.permuted_axes(IxDyn(&[0, 3, 1, 2])).as_standard_layout().into_owned(),
    };

    Ok(X::from(input))
}

fn resize_image(image: &RgbImage, width: u32, height: u32) -> RgbImage {
    if image.dimensions() == (width, height) {
        return image.clone();
    }

    let src = DynamicImage::ImageRgb8(image.clone());
    let mut dst = DynamicImage::new_rgb8(width, height);
    let options = ResizeOptions::new().resize_alg(ResizeAlg::Nearest);

    let mut resizer = Resizer::new();
    if let Err(err) = resizer.resize(&src, &mut dst, &options) {
        log::warn!("Failed to use `fast_image_resize`: {err}. Falling back.");
        return image::imageops::resize(image, width, height, FilterType::Nearest);
    }
    dst.into_rgb8()
}
