use serde::{Deserialize, Serialize};

/// Number of leading geometry channels (`cx, cy, w, h`) in the output tensor.
pub const GEOMETRY_CHANNELS: usize = 4;

/// Memory layout of the model's image input.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputLayout {
    /// `[1, height, width, 3]`
    #[default] Nhwc,
    /// `[1, 3, height, width]`
    Nchw,
}

/// Dimensions derived from the model's declared input and output shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TensorShape {
    pub width: usize,
    pub height: usize,
    pub num_channels: usize,
    pub num_elements: usize,
    pub layout: InputLayout,
}

impl TensorShape {
    pub fn new(width: usize, height: usize, num_channels: usize, num_elements: usize) -> anyhow::Result<Self> {
        if width == 0 || height == 0 || num_channels == 0 || num_elements == 0 {
            anyhow::bail!(
                "Degenerate tensor shape: width={}, height={}, channels={}, elements={}",
                width, height, num_channels, num_elements
            );
        }
        if num_channels <= GEOMETRY_CHANNELS {
            anyhow::bail!(
                "Output tensor has {} channels, at least {} are needed for one class",
                num_channels, GEOMETRY_CHANNELS + 1
            );
        }
        if num_channels.checked_mul(num_elements).is_none() {
            anyhow::bail!("Output tensor of {} x {} values is too large", num_channels, num_elements);
        }
        if width.checked_mul(height).and_then(|x| x.checked_mul(3)).is_none() {
            anyhow::bail!("Input image of {}x{} pixels is too large", width, height);
        }
        Ok(Self {
            width,
            height,
            num_channels,
            num_elements,
            layout: InputLayout::Nhwc,
        })
    }

    pub fn with_layout(mut self, layout: InputLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Derives the shape from a declared image input (`[1,H,W,3]` or `[1,3,H,W]`)
    /// and a declared detection output (`[1, channels, elements]`).
    ///
    /// Dynamic dimensions are reported as non-positive values and rejected.
    pub fn from_model_dims(input: &[i64], output: &[i64]) -> anyhow::Result<Self> {
        if input.len() != 4 {
            anyhow::bail!("Expected a 4-d image input, the model declares {:?}", input);
        }
        if output.len() != 3 {
            anyhow::bail!("Expected a 3-d detection output, the model declares {:?}", output);
        }
        let dim = |x: i64| if x > 0 { x as usize } else { 0 };

        let (layout, height, width) = if input[1] == 3 && input[3] != 3 {
            (InputLayout::Nchw, dim(input[2]), dim(input[3]))
        } else if input[3] == 3 {
            (InputLayout::Nhwc, dim(input[1]), dim(input[2]))
        } else {
            anyhow::bail!("Expected a 3-channel RGB image input, the model declares {:?}", input);
        };

        Ok(Self::new(width, height, dim(output[1]), dim(output[2]))?.with_layout(layout))
    }

    pub fn num_classes(&self) -> usize {
        self.num_channels - GEOMETRY_CHANNELS
    }

    /// Number of values in one output tensor. Bounded by [`TensorShape::new`].
    pub fn output_len(&self) -> usize {
        self.num_channels * self.num_elements
    }

    /// Shape of the preprocessed image input for this layout.
    pub fn input_dims(&self) -> [usize; 4] {
        match self.layout {
            InputLayout::Nhwc => [1, self.height, self.width, 3],
            InputLayout::Nchw => [1, 3, self.height, self.width],
        }
    }
}
