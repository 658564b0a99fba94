use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};

/// RGB8 pixel buffer handed to a detection session.
#[derive(Debug, Clone, Default)]
pub struct SenseImage {
    pub image: RgbImage,
}

impl std::ops::Deref for SenseImage {
    type Target = RgbImage;

    fn deref(&self) -> &Self::Target {
        &self.image
    }
}

impl From<DynamicImage> for SenseImage {
    fn from(image: DynamicImage) -> Self {
        Self {
            image: image.to_rgb8(),
        }
    }
}

impl From<GrayImage> for SenseImage {
    fn from(image: GrayImage) -> Self {
        Self {
            image: DynamicImage::from(image).to_rgb8(),
        }
    }
}

impl From<RgbImage> for SenseImage {
    fn from(image: RgbImage) -> Self {
        Self { image }
    }
}

impl From<RgbaImage> for SenseImage {
    fn from(image: RgbaImage) -> Self {
        Self {
            image: DynamicImage::from(image).to_rgb8(),
        }
    }
}

impl From<SenseImage> for RgbImage {
    fn from(image: SenseImage) -> Self {
        image.image
    }
}

impl SenseImage {
    pub fn new(image: RgbImage) -> Self {
        Self { image }
    }

    /// Wraps raw interleaved RGB bytes, e.g. a decoded camera frame.
    pub fn from_raw_rgb(width: u32, height: u32, pixels: Vec<u8>) -> anyhow::Result<Self> {
        let expected = width as usize * height as usize * 3;
        if pixels.len() != expected {
            anyhow::bail!("Pixel buffer holds {} bytes, {}x{} RGB needs {}", pixels.len(), width, height, expected);
        }
        RgbImage::from_raw(width, height, pixels)
            .map(Self::new)
            .ok_or_else(|| anyhow::anyhow!("Invalid {}x{} RGB buffer", width, height))
    }

    pub fn is_empty(&self) -> bool {
        self.image.width() == 0 || self.image.height() == 0
    }
}
