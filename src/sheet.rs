//! Contact-sheet assembly for grid and gallery consumers.
//!
//! Takes the composites produced by a grid batch and lays them out row-major
//! on a single canvas, one fixed-width column per cell. Cells skipped by the
//! batch (decode failures) are simply absent, so a sheet may be shorter than
//! the requested grid.

use image::{imageops, Rgb, RgbImage};
use tracing::debug;

use crate::imaging::Composite;

/// Assemble composites into one sheet image, `cols` cells per row
///
/// Every cell is scaled to `cell_width` preserving aspect ratio; row height
/// is the tallest cell in that row, with the remainder filled by
/// `background`. Returns `None` when there is nothing to lay out.
pub fn contact_sheet(
    cells: &[Composite],
    cols: usize,
    cell_width: u32,
    background: [u8; 3],
) -> Option<RgbImage> {
    if cells.is_empty() || cols == 0 || cell_width == 0 {
        return None;
    }

    let thumbs: Vec<RgbImage> = cells
        .iter()
        .map(|cell| scale_to_width(cell.as_image(), cell_width))
        .collect();

    let rows: Vec<&[RgbImage]> = thumbs.chunks(cols).collect();
    let row_heights: Vec<u32> = rows
        .iter()
        .map(|row| row.iter().map(RgbImage::height).max().unwrap_or(0))
        .collect();

    let sheet_width = cols.min(thumbs.len()) as u32 * cell_width;
    let sheet_height = row_heights.iter().sum::<u32>();

    debug!(
        "contact sheet: {} cells -> {}x{}",
        thumbs.len(),
        sheet_width,
        sheet_height
    );

    let mut sheet = RgbImage::from_pixel(sheet_width, sheet_height, Rgb(background));

    let mut y = 0u32;
    for (row, height) in rows.iter().zip(&row_heights) {
        for (col, thumb) in row.iter().enumerate() {
            let x = col as u32 * cell_width;
            imageops::replace(&mut sheet, thumb, i64::from(x), i64::from(y));
        }
        y += height;
    }

    Some(sheet)
}

fn scale_to_width(image: &RgbImage, width: u32) -> RgbImage {
    if image.width() == width {
        return image.clone();
    }

    let height = ((image.height() as f64 * width as f64 / image.width() as f64).round() as u32)
        .max(1);

    imageops::resize(image, width, height, imageops::FilterType::Lanczos3)
}
