//! Image preprocessing for the insulator classifier

use image::{imageops::FilterType, DynamicImage};
use ndarray::Array4;

use crate::error::ServiceError;

/// Fixed input size of the classifier.
pub const CLASSIFIER_INPUT_SIZE: (u32, u32) = (224, 224);

/// Per-channel normalization constants (RGB order), matching the transform
/// the model was trained with.
pub const CHANNEL_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
pub const CHANNEL_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Decode image bytes with EXIF orientation handling.
///
/// Phone cameras often store rotation as an EXIF tag instead of rotating
/// pixels; applying it here keeps the tensor deterministic per blob.
pub fn decode_image(data: &[u8]) -> Result<DynamicImage, ServiceError> {
    let image = image::load_from_memory(data).map_err(ServiceError::Decode)?;
    Ok(apply_exif_orientation(data, image))
}

/// Build the classifier input tensor from a decoded image.
///
/// The resize is unconditional to 224x224 regardless of aspect ratio; the
/// bilinear filter matches the training-time transform. Any alpha or
/// grayscale source is forced to three channels.
pub fn to_model_input(image: &DynamicImage) -> Array4<f32> {
    let (target_w, target_h) = CLASSIFIER_INPUT_SIZE;
    let resized = image.resize_exact(target_w, target_h, FilterType::Triangle);

    let rgb = resized.to_rgb8();
    let mut tensor = Array4::<f32>::zeros((1, 3, target_h as usize, target_w as usize));

    for y in 0..target_h {
        for x in 0..target_w {
            let pixel = rgb.get_pixel(x, y);
            for c in 0..3 {
                let value = pixel[c] as f32 / 255.0;
                tensor[[0, c, y as usize, x as usize]] =
                    (value - CHANNEL_MEAN[c]) / CHANNEL_STD[c];
            }
        }
    }

    tensor
}

/// Apply EXIF orientation to correct image rotation.
fn apply_exif_orientation(data: &[u8], image: DynamicImage) -> DynamicImage {
    use std::io::Cursor;

    let orientation = match exif::Reader::new().read_from_container(&mut Cursor::new(data)) {
        Ok(exif_data) => exif_data
            .get_field(exif::Tag::Orientation, exif::In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .unwrap_or(1) as u8,
        Err(_) => 1,
    };

    match orientation {
        1 => image,
        2 => image.fliph(),
        3 => image.rotate180(),
        4 => image.flipv(),
        5 => image.rotate90().fliph(),
        6 => image.rotate90(),
        7 => image.rotate270().fliph(),
        8 => image.rotate270(),
        _ => image,
    }
}
