use std::path::Path;

use image::{imageops, RgbImage, RgbaImage};
use tracing::debug;

use crate::config::ComposeConfig;
use crate::error::{ComposeError, Result};

/// Stitch two images vertically into one flattened RGB buffer
///
/// Both images are decoded, converted to RGBA, resized to the smaller of the
/// two widths (aspect preserved, `new_h = round(h * w / w_orig)`), stacked
/// top-over-bottom on a shared canvas, and flattened against the configured
/// opaque background.
pub(crate) fn stitch_pair(
    top_path: &Path,
    bottom_path: &Path,
    config: &ComposeConfig,
) -> Result<RgbImage> {
    let top = decode_rgba(top_path)?;
    let bottom = decode_rgba(bottom_path)?;

    let width = top.width().min(bottom.width());
    let filter = config.filter.to_filter_type();

    let top = resize_to_width(top, width, filter);
    let bottom = resize_to_width(bottom, width, filter);

    let mut canvas = RgbaImage::new(width, top.height() + bottom.height());
    imageops::replace(&mut canvas, &top, 0, 0);
    imageops::replace(&mut canvas, &bottom, 0, i64::from(top.height()));

    debug!(
        "stitched {:?} + {:?} -> {}x{}",
        top_path.file_name(),
        bottom_path.file_name(),
        canvas.width(),
        canvas.height()
    );

    Ok(flatten(&canvas, config.background))
}

fn decode_rgba(path: &Path) -> Result<RgbaImage> {
    let image = image::open(path).map_err(|_| ComposeError::DecodeFailed {
        path: path.display().to_string(),
    })?;

    Ok(image.to_rgba8())
}

fn resize_to_width(image: RgbaImage, width: u32, filter: imageops::FilterType) -> RgbaImage {
    if image.width() == width {
        return image;
    }

    let height = ((image.height() as f64 * width as f64 / image.width() as f64).round() as u32)
        .max(1);

    imageops::resize(&image, width, height, filter)
}

/// Alpha-blend every pixel over an opaque background color
fn flatten(canvas: &RgbaImage, background: [u8; 3]) -> RgbImage {
    let mut out = RgbImage::new(canvas.width(), canvas.height());

    for (x, y, pixel) in canvas.enumerate_pixels() {
        let alpha = pixel[3] as u16;
        let blend = |channel: u8, bg: u8| {
            ((channel as u16 * alpha + bg as u16 * (255 - alpha)) / 255) as u8
        };

        out.put_pixel(
            x,
            y,
            image::Rgb([
                blend(pixel[0], background[0]),
                blend(pixel[1], background[1]),
                blend(pixel[2], background[2]),
            ]),
        );
    }

    out
}
