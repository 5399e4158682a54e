use crate::config::OcrConfig;
use crate::error::{Result, TutorError};
use image::{DynamicImage, GenericImageView, GrayImage, ImageFormat, ImageReader};
use imageproc::contrast::{otsu_level, threshold, ThresholdType};
use imageproc::distance_transform::Norm;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::close;

/// Preprocess image bytes for OCR
///
/// Applies the following transformations:
/// 1. Validates image dimensions (min check)
/// 2. Resizes large images while maintaining aspect ratio
/// 3. Converts multi-channel images to grayscale
/// 4. Denoises with a fixed-sigma Gaussian blur
/// 5. Binarizes with Otsu's global threshold
/// 6. Closes small speckles with a morphological closing
///
/// # Arguments
/// * `bytes` - Raw image bytes (PNG, JPEG, BMP, TIFF)
/// * `config` - OCR configuration containing dimension limits and filter parameters
///
/// # Returns
/// Binarized image bytes as PNG, ready for the OCR engine
pub fn preprocess_image(bytes: &[u8], config: &OcrConfig) -> Result<Vec<u8>> {
    let img = decode_image(bytes)?;

    let (width, height) = img.dimensions();
    if width < config.min_image_dimension || height < config.min_image_dimension {
        return Err(TutorError::ImageDecode(format!(
            "Image too small: {}x{}, minimum {}x{}",
            width, height, config.min_image_dimension, config.min_image_dimension
        )));
    }

    let img = resize_if_needed(img, config.max_image_dimension);
    let gray = to_grayscale(img);
    let binary = binarize(&gray, config.blur_sigma, config.closing_radius);

    let mut output = Vec::new();
    DynamicImage::ImageLuma8(binary)
        .write_to(&mut std::io::Cursor::new(&mut output), ImageFormat::Png)
        .map_err(|e| TutorError::Ocr(format!("Failed to encode image: {e}")))?;

    Ok(output)
}

fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    if bytes.is_empty() {
        return Err(TutorError::ImageDecode("Image is empty".to_string()));
    }

    ImageReader::new(std::io::Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| TutorError::ImageDecode(format!("Failed to read image: {e}")))?
        .decode()
        .map_err(|e| TutorError::ImageDecode(format!("Failed to decode image: {e}")))
}

/// Resize image if it exceeds maximum dimension while maintaining aspect ratio
///
/// Uses Lanczos3 filter for high-quality downscaling
fn resize_if_needed(img: DynamicImage, max_dim: u32) -> DynamicImage {
    let (width, height) = img.dimensions();

    if width <= max_dim && height <= max_dim {
        return img;
    }

    let ratio = if width > height {
        max_dim as f32 / width as f32
    } else {
        max_dim as f32 / height as f32
    };

    let new_width = ((width as f32 * ratio) as u32).max(1);
    let new_height = ((height as f32 * ratio) as u32).max(1);

    img.resize(new_width, new_height, image::imageops::FilterType::Lanczos3)
}

/// Single-channel images pass through untouched; alpha is discarded.
fn to_grayscale(img: DynamicImage) -> GrayImage {
    match img {
        DynamicImage::ImageLuma8(gray) => gray,
        other => other.to_luma8(),
    }
}

/// Blur, Otsu-threshold and close a grayscale page.
pub(crate) fn binarize(gray: &GrayImage, blur_sigma: f32, closing_radius: u8) -> GrayImage {
    // gaussian_blur_f32 panics on non-positive sigma
    let blurred = if blur_sigma > 0.0 {
        gaussian_blur_f32(gray, blur_sigma)
    } else {
        gray.clone()
    };

    let level = otsu_level(&blurred);
    let binary = threshold(&blurred, level, ThresholdType::Binary);

    if closing_radius == 0 {
        binary
    } else {
        close(&binary, Norm::LInf, closing_radius)
    }
}
