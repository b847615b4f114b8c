//! Mapping boxes from model-input space back to the original image.

use crate::error::DetectError;
use crate::preprocess::LetterboxParams;
use crate::types::BBox;

/// Inverts the recorded letterbox transform: subtract the padding offsets,
/// divide by the scale, then clamp to the original image bounds.
///
/// Boxes that degenerate under clamping (for example a detection entirely
/// inside the padding) fail with [`DetectError::InvalidGeometry`]; callers
/// drop them rather than returning them.
pub fn map_to_original(
    bbox: BBox,
    params: &LetterboxParams,
    original_width: u32,
    original_height: u32,
) -> Result<BBox, DetectError> {
    let max_x = original_width as f32;
    let max_y = original_height as f32;

    let x1 = ((bbox.x1 - params.pad_x) / params.scale).clamp(0.0, max_x);
    let y1 = ((bbox.y1 - params.pad_y) / params.scale).clamp(0.0, max_y);
    let x2 = ((bbox.x2 - params.pad_x) / params.scale).clamp(0.0, max_x);
    let y2 = ((bbox.y2 - params.pad_y) / params.scale).clamp(0.0, max_y);

    if x1 >= x2 || y1 >= y2 {
        return Err(DetectError::InvalidGeometry);
    }
    Ok(BBox::new(x1, y1, x2, y2))
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1280×720 letterboxed into 640×640: scale 0.5, pad (0, 140).
    const PARAMS: LetterboxParams = LetterboxParams {
        scale: 0.5,
        pad_x: 0.0,
        pad_y: 140.0,
    };

    #[test]
    fn inverts_the_letterbox_transform() {
        let mapped =
            map_to_original(BBox::new(100.0, 200.0, 200.0, 300.0), &PARAMS, 1280, 720).unwrap();
        assert_eq!(mapped, BBox::new(200.0, 120.0, 400.0, 320.0));
    }

    #[test]
    fn clamps_to_original_bounds() {
        // y1 lands in the top padding band and clamps to 0.
        let mapped =
            map_to_original(BBox::new(100.0, 100.0, 200.0, 200.0), &PARAMS, 1280, 720).unwrap();
        assert_eq!(mapped, BBox::new(200.0, 0.0, 400.0, 120.0));
    }

    #[test]
    fn round_trips_with_the_forward_transform() {
        // Forward-map original-space corners, then invert.
        let original = BBox::new(40.0, 60.0, 600.0, 700.0);
        let forward = BBox::new(
            original.x1 * PARAMS.scale + PARAMS.pad_x,
            original.y1 * PARAMS.scale + PARAMS.pad_y,
            original.x2 * PARAMS.scale + PARAMS.pad_x,
            original.y2 * PARAMS.scale + PARAMS.pad_y,
        );
        let back = map_to_original(forward, &PARAMS, 1280, 720).unwrap();
        assert!((back.x1 - original.x1).abs() < 1e-4);
        assert!((back.y1 - original.y1).abs() < 1e-4);
        assert!((back.x2 - original.x2).abs() < 1e-4);
        assert!((back.y2 - original.y2).abs() < 1e-4);
    }

    #[test]
    fn box_entirely_in_padding_is_degenerate() {
        // The top padding band is y < 140 in model space.
        let result = map_to_original(BBox::new(100.0, 10.0, 200.0, 120.0), &PARAMS, 1280, 720);
        assert!(matches!(result, Err(DetectError::InvalidGeometry)));
    }
}
