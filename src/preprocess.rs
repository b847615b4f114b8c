//! Image decoding and model-input preparation.
//!
//! Preprocessing policy: centered letterbox. The image is scaled uniformly
//! by `min(S/w, S/h)`, pasted centered onto an S×S gray canvas, and
//! normalized to a `[1, 3, S, S]` f32 CHW tensor in [0, 1]. The applied
//! scale and padding offsets are returned so postprocessing can invert the
//! exact same transform.

use fast_image_resize::images::Image;
use fast_image_resize::{FilterType, IntoImageView, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::DynamicImage;
use ndarray::Array4;

use crate::error::DetectError;

/// Padding fill used by the detection models we target.
pub const LETTERBOX_FILL: [u8; 3] = [114, 114, 114];

#[derive(Debug, Clone)]
pub struct PreprocessConfig {
    /// Model input is `size × size`.
    pub size: u32,
    pub fill: [u8; 3],
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            size: 640,
            fill: LETTERBOX_FILL,
        }
    }
}

/// The transform applied by [`Preprocessor::preprocess`], recorded so the
/// coordinate mapper can invert it exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LetterboxParams {
    /// Uniform scale from original to model-input space.
    pub scale: f32,
    /// Horizontal padding offset, model-input pixels.
    pub pad_x: f32,
    /// Vertical padding offset, model-input pixels.
    pub pad_y: f32,
}

/// Decodes encoded image bytes into an in-memory image.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, DetectError> {
    let image = image::load_from_memory(bytes).map_err(DetectError::ImageDecode)?;
    if image.width() == 0 || image.height() == 0 {
        return Err(DetectError::InvalidImage {
            message: "image has zero width or height".to_string(),
        });
    }
    Ok(image)
}

#[derive(Debug, Default)]
pub struct Preprocessor {
    pub config: PreprocessConfig,
}

impl Preprocessor {
    pub fn new(config: PreprocessConfig) -> Self {
        Self { config }
    }

    /// Letterboxes `image` into the model input tensor.
    ///
    /// Returns the `[1, 3, S, S]` tensor and the recorded transform.
    pub fn preprocess(
        &self,
        image: &DynamicImage,
    ) -> Result<(Array4<f32>, LetterboxParams), DetectError> {
        let (orig_width, orig_height) = (image.width(), image.height());
        if orig_width == 0 || orig_height == 0 {
            return Err(DetectError::InvalidImage {
                message: "image has zero width or height".to_string(),
            });
        }
        // Layouts fast_image_resize cannot view are not worth special-casing.
        if image.pixel_type().is_none() {
            return Err(DetectError::InvalidImage {
                message: "unsupported pixel layout".to_string(),
            });
        }

        let size = self.config.size;
        let scale = (size as f32 / orig_width as f32).min(size as f32 / orig_height as f32);
        let new_width = ((orig_width as f32 * scale).round() as u32).max(1);
        let new_height = ((orig_height as f32 * scale).round() as u32).max(1);

        let src = DynamicImage::ImageRgb8(image.to_rgb8());
        let mut dst = Image::new(new_width, new_height, PixelType::U8x3);
        let mut resizer = Resizer::new();
        let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear));
        resizer
            .resize(&src, &mut dst, Some(&options))
            .map_err(|e| DetectError::InvalidImage {
                message: format!("resize failed: {e}"),
            })?;
        let resized = image::RgbImage::from_raw(new_width, new_height, dst.buffer().to_vec())
            .ok_or_else(|| DetectError::InvalidImage {
                message: "resized buffer has unexpected length".to_string(),
            })?;

        // Center the resized image on the fill-colored canvas.
        let pad_x = (size - new_width) / 2;
        let pad_y = (size - new_height) / 2;
        let mut canvas =
            image::RgbImage::from_pixel(size, size, image::Rgb(self.config.fill));
        image::imageops::overlay(&mut canvas, &resized, pad_x as i64, pad_y as i64);

        // HWC u8 -> CHW f32 in [0, 1].
        let mut tensor = Array4::<f32>::zeros((1, 3, size as usize, size as usize));
        for (x, y, pixel) in canvas.enumerate_pixels() {
            let (x, y) = (x as usize, y as usize);
            tensor[[0, 0, y, x]] = pixel[0] as f32 / 255.0;
            tensor[[0, 1, y, x]] = pixel[1] as f32 / 255.0;
            tensor[[0, 2, y, x]] = pixel[2] as f32 / 255.0;
        }

        let params = LetterboxParams {
            scale,
            pad_x: pad_x as f32,
            pad_y: pad_y as f32,
        };
        Ok((tensor, params))
    }
}
